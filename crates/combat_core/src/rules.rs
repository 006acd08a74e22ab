//! Alliance and attack-permission policy.
//!
//! Ally/enemy determination is injected: there is no team system yet, so the
//! default is the single-owner-or-self heuristic and hosts replace the
//! predicates wholesale when one lands.

use crate::actor::{Actor, ActorKind};

type Predicate = Box<dyn Fn(&Actor, &Actor) -> bool + Send + Sync>;

pub struct CombatRules {
    allies: Predicate,
    attack_allowed: Predicate,
}

impl CombatRules {
    pub fn new(
        allies: impl Fn(&Actor, &Actor) -> bool + Send + Sync + 'static,
        attack_allowed: impl Fn(&Actor, &Actor) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            allies: Box::new(allies),
            attack_allowed: Box::new(attack_allowed),
        }
    }

    /// Default survival-mode policy: same-owner-or-self alliance; damage
    /// between differently-owned players is gated by the PvP switch.
    pub fn survival_default(pvp_enabled: bool) -> Self {
        Self::new(same_owner_or_self, move |a, b| {
            pvp_enabled
                || a.id == b.id
                || a.kind != ActorKind::Player
                || b.kind != ActorKind::Player
                || a.owner == b.owner
        })
    }

    #[inline]
    pub fn are_allies(&self, a: &Actor, b: &Actor) -> bool {
        (self.allies)(a, b)
    }

    #[inline]
    pub fn is_attack_allowed(&self, attacker: &Actor, target: &Actor) -> bool {
        (self.attack_allowed)(attacker, target)
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::survival_default(false)
    }
}

/// Two combatants are allied when they share an owning player (all unowned
/// creatures count as sharing "no owner") or are the same combatant.
pub fn same_owner_or_self(a: &Actor, b: &Actor) -> bool {
    a.id == b.id || a.owner == b.owner
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, Health, OwnerId, Stats, Transform};
    use glam::Vec3;

    fn actor(id: u32, kind: ActorKind, owner: Option<u32>) -> Actor {
        Actor {
            id: ActorId(id),
            kind,
            owner: owner.map(OwnerId),
            tr: Transform {
                pos: Vec3::ZERO,
                yaw: 0.0,
                radius: 0.5,
            },
            hp: Health { hp: 10, max: 10 },
            stats: Stats::default(),
        }
    }

    #[test]
    fn same_owner_allies_creatures_band_together() {
        let p1 = actor(1, ActorKind::Player, Some(7));
        let p2 = actor(2, ActorKind::Player, Some(7));
        let p3 = actor(3, ActorKind::Player, Some(8));
        let c1 = actor(4, ActorKind::Creature, None);
        let c2 = actor(5, ActorKind::Creature, None);
        assert!(same_owner_or_self(&p1, &p2));
        assert!(!same_owner_or_self(&p1, &p3));
        assert!(same_owner_or_self(&c1, &c2));
        assert!(!same_owner_or_self(&p1, &c1));
        assert!(same_owner_or_self(&p1, &p1));
    }

    #[test]
    fn pvp_switch_gates_player_on_player_only() {
        let rules = CombatRules::survival_default(false);
        let p1 = actor(1, ActorKind::Player, Some(1));
        let p2 = actor(2, ActorKind::Player, Some(2));
        let c = actor(3, ActorKind::Creature, None);
        assert!(!rules.is_attack_allowed(&p1, &p2));
        assert!(rules.is_attack_allowed(&p1, &c));
        assert!(rules.is_attack_allowed(&c, &p1));
        assert!(rules.is_attack_allowed(&p1, &p1));
        let rules = CombatRules::survival_default(true);
        assert!(rules.is_attack_allowed(&p1, &p2));
    }
}
