//! The set of projectiles the integrator moves.
//!
//! Nothing touches the active set directly: activation, removal, pierce and the
//! kinematic switch only enqueue, and `apply_pending` folds the queues in at the
//! start of each tick. The queues take `&self` so contact handlers running on
//! other threads can push into them.

use std::sync::{Mutex, PoisonError};

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::Projectile;

#[derive(Resource, Debug, Default)]
pub struct ProjectileRegistry {
    active: Vec<Entity>,
    /// Same entities as `active`, for membership checks.
    members: HashSet<Entity>,
    pending_add: Mutex<Vec<Entity>>,
    pending_remove: Mutex<Vec<Entity>>,
}

impl ProjectileRegistry {
    pub fn enqueue_add(&self, entity: Entity) {
        self.pending_add
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entity);
    }

    pub fn enqueue_remove(&self, entity: Entity) {
        self.pending_remove
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entity);
    }

    /// Adds first, then removals. An entity queued both ways in the same window ends up inactive.
    pub fn apply_pending(&mut self) {
        let adds = std::mem::take(
            self.pending_add
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for entity in adds {
            if self.members.insert(entity) {
                self.active.push(entity);
            }
        }

        let removes = std::mem::take(
            self.pending_remove
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let mut removed = false;
        for entity in removes {
            removed |= self.members.remove(&entity);
        }
        if removed {
            let members = &self.members;
            self.active.retain(|e| members.contains(e));
        }
    }

    /// Active projectiles in activation order.
    #[inline]
    pub fn active(&self) -> &[Entity] {
        &self.active
    }

    #[inline]
    pub fn is_active(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

pub fn on_projectile_added(add: On<Add, Projectile>, registry: Res<ProjectileRegistry>) {
    registry.enqueue_add(add.entity);
}

pub fn on_projectile_removed(remove: On<Remove, Projectile>, registry: Res<ProjectileRegistry>) {
    registry.enqueue_remove(remove.entity);
}

pub fn apply_pending_projectiles(mut registry: ResMut<ProjectileRegistry>) {
    let before = registry.len();
    registry.apply_pending();
    if registry.len() != before {
        trace!("active projectiles: {before} -> {}", registry.len());
    }
}
