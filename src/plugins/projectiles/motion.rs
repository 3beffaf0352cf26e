//! Scripted projectile motion.
//!
//! Every active, non-frozen projectile is moved along its velocity once per
//! tick. Before moving, the path is swept with a ray:
//!
//! - a hit on the trigger groups is re-emitted as a `Collision` so thin
//!   colliders the discrete contact pass would step over are still reported
//! - a hit on the rigid groups (kinematic rigged projectiles only) shortens
//!   the step so the projectile stops at the obstruction
//!
//! The ray source is abstracted as `RaySweep`; in the game it is avian's
//! `SpatialQuery`.

use avian3d::prelude::*;
use bevy::ecs::query::QueryData;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::common::clock::TickAccumulator;
use crate::common::math::look_rotation;
use crate::common::tunables::Tunables;
use crate::plugins::physics::{CentralForce, Collision};

use super::components::{Projectile, RigidVolume, TriggerVolume};
use super::registry::ProjectileRegistry;

// --------------------------------------------------------------------------------------
// Ray sweeps
// --------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

pub trait RaySweep {
    /// Nearest hit along `direction` within `max_distance` on any group in `mask`.
    fn sweep(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
        exclude: &[Entity],
    ) -> Option<SweepHit>;
}

impl RaySweep for SpatialQuery<'_, '_> {
    fn sweep(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
        exclude: &[Entity],
    ) -> Option<SweepHit> {
        let filter =
            SpatialQueryFilter::from_mask(mask).with_excluded_entities(exclude.iter().copied());
        self.cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| SweepHit {
                entity: hit.entity,
                point: origin + *direction * hit.distance,
                normal: hit.normal,
                distance: hit.distance,
            })
    }
}

// --------------------------------------------------------------------------------------
// Integration
// --------------------------------------------------------------------------------------

#[derive(QueryData)]
#[query_data(mutable)]
pub struct Moving {
    entity: Entity,
    projectile: &'static mut Projectile,
    transform: &'static mut Transform,
    trigger: Option<&'static mut TriggerVolume>,
    layers: Option<&'static mut CollisionLayers>,
    rigid: Option<&'static RigidVolume>,
    body: Option<&'static mut RigidBody>,
    linear_velocity: Option<&'static mut LinearVelocity>,
}

/// Everything one integration pass reads and writes, apart from the ray source.
#[derive(SystemParam)]
pub struct Integration<'w, 's> {
    time: Res<'w, Time>,
    tunables: Res<'w, Tunables>,
    registry: Res<'w, ProjectileRegistry>,
    projectiles: Query<'w, 's, Moving>,
    commands: Commands<'w, 's>,
    collisions: MessageWriter<'w, Collision>,
    forces: MessageWriter<'w, CentralForce>,
    clock: Local<'s, TickAccumulator>,
}

impl Integration<'_, '_> {
    /// Advance every active projectile by the time elapsed since the last pass.
    pub fn run(&mut self, sweep: &impl RaySweep) {
        self.clock.accumulate(self.time.delta_secs());
        let dt = self.clock.consume();
        if dt <= 0.0 {
            return;
        }

        let tunables = &*self.tunables;
        for &entity in self.registry.active() {
            let Ok(mut item) = self.projectiles.get_mut(entity) else {
                trace!("{entity:?} is registered but has no projectile state");
                continue;
            };
            if item.projectile.frozen {
                continue;
            }

            let flags = item.projectile.flags;
            if flags.affected_by_gravity
                && !flags.pierces
                && item.projectile.velocity.length() < tunables.kinematic_threshold
            {
                switch_to_dynamic(&mut item, &mut self.commands);
                self.registry.enqueue_remove(entity);
                continue;
            }

            let dynamic = item.body.as_deref() == Some(&RigidBody::Dynamic);
            let step = advance(&mut item, sweep, dt, tunables);

            if let Some(collision) = step.collision {
                self.collisions.write(collision);
            }
            if dynamic && step.translation != Vec3::ZERO {
                self.forces.write(CentralForce { entity, force: step.translation });
            } else if !dynamic {
                item.transform.translation = step.position + step.translation;
            }
        }
    }
}

pub fn integrate_projectiles(spatial: SpatialQuery, mut integration: Integration) {
    integration.run(&spatial);
}

/// Outcome of moving one projectile for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Position after gravity, before the swept translation.
    pub position: Vec3,
    pub translation: Vec3,
    pub collision: Option<Collision>,
}

fn advance(item: &mut MovingItem, sweep: &impl RaySweep, dt: f32, tunables: &Tunables) -> Step {
    let entity = item.entity;
    let mut position = item.transform.translation;

    let acceleration = item.projectile.acceleration;
    item.projectile.velocity += acceleration * dt;
    if item.projectile.flags.affected_by_gravity {
        let fall = tunables.gravity * dt;
        position += fall;
        item.projectile.velocity += fall;
    }
    let velocity = item.projectile.velocity;
    item.projectile.set_velocity(velocity);

    let mut step = Step { position, translation: Vec3::ZERO, collision: None };
    let Ok(direction) = Dir3::new(velocity) else {
        return step;
    };
    let mut travel = item.projectile.speed * dt;
    if travel <= 0.0 {
        return step;
    }

    let radius = item.trigger.as_deref().map_or(0.0, |t| t.radius);
    let reach = travel + radius;
    let ignore = [entity, item.projectile.instigator.unwrap_or(entity)];
    let kinematic = item.body.as_deref() != Some(&RigidBody::Dynamic);

    let trigger_hit = item
        .trigger
        .as_deref()
        .filter(|t| t.enabled)
        .and_then(|t| sweep.sweep(position, direction, reach, t.detect, &ignore));
    let rigid_distance = item
        .rigid
        .filter(|_| kinematic)
        .and_then(|rigid| sweep.sweep(position, direction, reach, rigid.collides_with, &ignore))
        .map(|hit| (hit.distance - radius).max(0.0));

    if let Some(hit) = trigger_hit {
        let trigger_distance = (hit.distance - radius).max(0.0);
        if trigger_distance <= rigid_distance.unwrap_or(f32::INFINITY) {
            trace!("{entity:?} swept into {:?}", hit.entity);
            step.collision = Some(Collision {
                entity,
                other: hit.entity,
                point: hit.point,
                normal: hit.normal,
            });
        }
    }
    if let Some(limit) = rigid_distance {
        travel = travel.min(limit);
    }
    step.translation = *direction * travel;

    if item.projectile.flags.rotates_to_velocity {
        let facing = if kinematic {
            velocity
        } else {
            item.linear_velocity.as_deref().map_or(velocity, |v| v.0)
        };
        if facing.length() >= tunables.rotation_threshold {
            if let Some(rotation) = look_rotation(facing, tunables.forward) {
                item.transform.rotation = rotation;
            }
        }
    }

    step
}

/// Hand a slowed-down projectile to the physics engine.
///
/// The trigger stops reporting contacts. A rigged, kinematic projectile becomes a
/// dynamic body that keeps its current velocity and collides through its rigid volume.
fn switch_to_dynamic(item: &mut MovingItem, commands: &mut Commands) {
    let entity = item.entity;
    if let Some(trigger) = item.trigger.as_deref_mut() {
        match item.layers.as_deref_mut() {
            Some(layers) => trigger.disable(layers),
            None => trigger.enabled = false,
        }
    }

    let (Some(rigid), Some(body)) = (item.rigid, item.body.as_deref_mut()) else {
        debug!("{entity:?} came to rest without a rigid volume");
        return;
    };
    if *body != RigidBody::Kinematic {
        return;
    }

    *body = RigidBody::Dynamic;
    if let Some(layers) = item.layers.as_deref_mut() {
        *layers = rigid.layers();
    }
    let velocity = item.projectile.velocity;
    match item.linear_velocity.as_deref_mut() {
        Some(linear_velocity) => linear_velocity.0 = velocity,
        None => {
            commands.entity(entity).insert(LinearVelocity(velocity));
        }
    }
    commands.entity(entity).remove::<Sensor>();
    debug!("{entity:?} slowed below the kinematic threshold, now dynamic");
}
