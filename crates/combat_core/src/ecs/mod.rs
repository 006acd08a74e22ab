//! Minimal server-side actor store.
//!
//! A tiny ECS-like world specialized for authoritative combatants. Combat
//! systems read it through `CombatState`; health is mutated only by the
//! resolver and the zone scheduler.

pub mod geom;

use crate::actor::{Actor, ActorId, ActorKind, Health, OwnerId, Stats, Transform};

#[derive(Default, Debug)]
pub struct WorldEcs {
    next_id: u32,
    ents: Vec<Actor>,
}

impl WorldEcs {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ents.is_empty()
    }

    pub fn spawn(
        &mut self,
        kind: ActorKind,
        owner: Option<OwnerId>,
        tr: Transform,
        hp: Health,
        stats: Stats,
    ) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.ents.push(Actor {
            id,
            kind,
            owner,
            tr,
            hp,
            stats,
        });
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.ents.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.ents.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.ents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.ents.iter_mut()
    }

    /// Remove an actor outright (despawn). Returns whether it existed.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let before = self.ents.len();
        self.ents.retain(|a| a.id != id);
        self.ents.len() != before
    }

    pub fn remove_dead(&mut self) {
        self.ents.retain(|a| a.hp.alive());
    }
}
