//! Collision responses, applied at the start of the tick after the collision.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::math::reflect;
use crate::common::tunables::Tunables;

use super::buffer::CollisionBuffer;
use super::components::{Projectile, ProjectileFlags, TriggerVolume};
use super::registry::ProjectileRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResponse {
    /// Mirror about the hit normal, keep the speed.
    Ricochet,
    /// Stick into the struck volume and stop being simulated.
    Pierce,
    /// Turn straight back, whatever the normal.
    Reflect,
    /// Ricochet, then lose most of the speed.
    Bounce,
}

impl CollisionResponse {
    /// One response per collision: ricochet, then pierce, then reflect, then bounce.
    pub fn select(flags: ProjectileFlags) -> Option<Self> {
        if flags.ricochets {
            Some(Self::Ricochet)
        } else if flags.pierces {
            Some(Self::Pierce)
        } else if flags.reflects {
            Some(Self::Reflect)
        } else if flags.affected_by_gravity || flags.bounces {
            Some(Self::Bounce)
        } else {
            None
        }
    }

    /// Velocity after the response. A pierce stops the projectile.
    pub fn velocity_after(self, velocity: Vec3, normal: Vec3, restitution: f32) -> Vec3 {
        match self {
            Self::Ricochet => reflect(velocity, normal.normalize_or_zero()),
            Self::Bounce => reflect(velocity, normal.normalize_or_zero()) * restitution,
            Self::Reflect => -velocity,
            Self::Pierce => Vec3::ZERO,
        }
    }
}

/// Stop a projectile in place.
///
/// A dynamic body is turned kinematic with its velocity cleared so the solver
/// does not keep moving it.
pub fn freeze(
    projectile: &mut Projectile,
    body: Option<&mut RigidBody>,
    linear_velocity: Option<&mut LinearVelocity>,
) {
    projectile.set_velocity(Vec3::ZERO);
    projectile.frozen = true;

    if let Some(body) = body {
        if *body == RigidBody::Dynamic {
            *body = RigidBody::Kinematic;
            if let Some(linear_velocity) = linear_velocity {
                linear_velocity.0 = Vec3::ZERO;
            }
        }
    }
}

type Resolvable = (
    &'static mut Projectile,
    &'static mut Transform,
    Option<&'static mut TriggerVolume>,
    Option<&'static mut CollisionLayers>,
    Option<&'static mut RigidBody>,
    Option<&'static mut LinearVelocity>,
);

pub fn resolve_buffered_collisions(
    mut buffer: ResMut<CollisionBuffer>,
    registry: Res<ProjectileRegistry>,
    tunables: Res<Tunables>,
    mut projectiles: Query<Resolvable>,
) {
    for collision in buffer.drain() {
        let Ok((mut projectile, mut transform, trigger, layers, mut body, mut linear_velocity)) =
            projectiles.get_mut(collision.entity)
        else {
            debug!("buffered collision for {:?} dropped: projectile is gone", collision.entity);
            continue;
        };

        let Some(response) = CollisionResponse::select(projectile.flags) else {
            continue;
        };
        trace!("{:?} hit {:?}: {response:?}", collision.entity, collision.other);

        match response {
            CollisionResponse::Pierce => {
                freeze(
                    &mut projectile,
                    body.as_deref_mut(),
                    linear_velocity.as_deref_mut(),
                );
                projectile.flags.pierces = false;
                transform.translation = collision.point;

                if let Some(mut trigger) = trigger {
                    match layers {
                        Some(mut layers) => trigger.disable(&mut layers),
                        None => trigger.enabled = false,
                    }
                }
                registry.enqueue_remove(collision.entity);
                debug!("{:?} pierced {:?} and stopped", collision.entity, collision.other);
            }
            other => {
                let velocity =
                    other.velocity_after(projectile.velocity, collision.normal, tunables.restitution);
                projectile.set_velocity(velocity);
            }
        }
    }
}
