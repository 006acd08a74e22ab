//! Authoritative combatant types.

use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

/// Owning player for player-controlled combatants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u32);

/// Control category, resolved once at spawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Creature,
}

#[derive(Copy, Clone, Debug)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
    #[inline]
    pub fn clamp(&mut self) {
        if self.hp > self.max {
            self.hp = self.max;
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Transform {
    pub pos: Vec3,
    pub yaw: f32,
    pub radius: f32,
}

/// Modifier stats consumed by the damage pipeline. Zero means "no effect".
#[derive(Copy, Clone, Debug, Default)]
pub struct Stats {
    pub strength: f32,
    pub defense: f32,
    pub accuracy: f32,
    pub agility: f32,
    pub critical: f32,
}

#[derive(Copy, Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub owner: Option<OwnerId>,
    pub tr: Transform,
    pub hp: Health,
    pub stats: Stats,
}
