//! Ordered combat systems run by `CombatState::step_authoritative`.

pub mod projectiles;
pub mod telegraph;
pub mod zones;
