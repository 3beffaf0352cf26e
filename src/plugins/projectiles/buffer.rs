//! First qualifying collision per projectile, held until the next tick resolves it.

use std::sync::{Mutex, PoisonError};

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::plugins::physics::Collision;
use crate::plugins::world::Block;

use super::components::Projectile;

#[derive(Resource, Debug, Default)]
pub struct CollisionBuffer {
    slots: Mutex<HashMap<Entity, Collision>>,
}

impl CollisionBuffer {
    /// Keep `collision` unless its projectile already has one buffered.
    ///
    /// Returns whether it was stored. Safe to call from several threads at once.
    pub fn record_first(&self, collision: Collision) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.contains_key(&collision.entity) {
            return false;
        }
        slots.insert(collision.entity, collision);
        true
    }

    /// Take every buffered collision, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Collision> {
        self.slots
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, collision)| collision)
            .collect()
    }

    pub fn get(&self, projectile: Entity) -> Option<Collision> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&projectile)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A collision counts for the resolver only if it struck terrain that actually stops things.
#[inline]
pub fn qualifies(other: Option<&Block>) -> bool {
    other.is_some_and(|block| block.stops_projectiles())
}

pub fn buffer_projectile_collisions(
    mut collisions: MessageReader<Collision>,
    buffer: Res<CollisionBuffer>,
    projectiles: Query<&Projectile>,
    blocks: Query<&Block>,
) {
    for ev in collisions.read() {
        let Ok(projectile) = projectiles.get(ev.entity) else {
            continue;
        };
        if projectile.frozen || !qualifies(blocks.get(ev.other).ok()) {
            continue;
        }
        if !buffer.record_first(*ev) {
            trace!("{:?} already has a collision this tick, dropping {:?}", ev.entity, ev.other);
        }
    }
}
