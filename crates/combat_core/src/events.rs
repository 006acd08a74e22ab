//! Outcome events pushed to the host-drained channel.

use crate::actor::ActorId;

/// One resolution outcome for one (attempted) target. Consumed by feedback,
/// HUD and progression layers.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeEvent {
    pub attacker: ActorId,
    pub target: Option<ActorId>,
    pub weapon: String,
    /// Signed health delta; negative healed.
    pub delta: i32,
    pub was_hit: bool,
    pub was_critical: bool,
    pub was_evaded: bool,
    pub blocked_by_invuln: bool,
    pub hp_before: i32,
    pub hp_after: i32,
    pub fatal: bool,
}

impl OutcomeEvent {
    /// Target slipped out of reach during the telegraph window.
    pub(crate) fn evaded(attacker: ActorId, target: ActorId, weapon: &str, hp: i32) -> Self {
        Self {
            attacker,
            target: Some(target),
            weapon: weapon.to_string(),
            delta: 0,
            was_hit: false,
            was_critical: false,
            was_evaded: true,
            blocked_by_invuln: false,
            hp_before: hp,
            hp_after: hp,
            fatal: false,
        }
    }

    /// Absorbed by an active invulnerability window.
    pub(crate) fn blocked(attacker: ActorId, target: ActorId, weapon: &str, hp: i32) -> Self {
        Self {
            attacker,
            target: Some(target),
            weapon: weapon.to_string(),
            delta: 0,
            was_hit: false,
            was_critical: false,
            was_evaded: false,
            blocked_by_invuln: true,
            hp_before: hp,
            hp_after: hp,
            fatal: false,
        }
    }

    /// Lost to the hit-chance roll.
    pub(crate) fn missed(attacker: ActorId, target: ActorId, weapon: &str, hp: i32) -> Self {
        Self {
            attacker,
            target: Some(target),
            weapon: weapon.to_string(),
            delta: 0,
            was_hit: false,
            was_critical: false,
            was_evaded: false,
            blocked_by_invuln: false,
            hp_before: hp,
            hp_after: hp,
            fatal: false,
        }
    }

    /// Free-aim ray found nothing (or terrain) within range.
    pub(crate) fn no_target(attacker: ActorId, weapon: &str) -> Self {
        Self {
            attacker,
            target: None,
            weapon: weapon.to_string(),
            delta: 0,
            was_hit: false,
            was_critical: false,
            was_evaded: false,
            blocked_by_invuln: false,
            hp_before: 0,
            hp_after: 0,
            fatal: false,
        }
    }
}
