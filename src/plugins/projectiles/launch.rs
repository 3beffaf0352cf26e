//! Launch consumer: spawn projectiles from `LaunchProjectile` requests.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::math::look_rotation;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

use super::components::Projectile;
use super::messages::LaunchProjectile;

pub fn launch_projectiles(
    mut commands: Commands,
    mut launches: MessageReader<LaunchProjectile>,
    tunables: Res<Tunables>,
) {
    for req in launches.read() {
        let Some(velocity) = req.velocity() else {
            debug!("launch from {:?} dropped: no direction", req.instigator);
            continue;
        };

        let mut projectile = Projectile::new(velocity).with_flags(req.flags);
        projectile.instigator = req.instigator;

        let mut transform = Transform::from_translation(req.origin);
        if req.flags.rotates_to_velocity {
            if let Some(rotation) = look_rotation(velocity, tunables.forward) {
                transform.rotation = rotation;
            }
        }

        let mut entity = commands.spawn((
            Name::new("Projectile"),
            projectile,
            transform,
            RigidBody::Kinematic,
            Collider::sphere(req.trigger.radius),
            Sensor,
            req.trigger.layers(),
            req.trigger,
            // Avian only reports contacts for colliders that opt in.
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));
        if let Some(rigid) = req.rigid {
            entity.insert(rigid);
        }
        if let Some(hit) = req.hit {
            entity.insert(hit);
        }
        trace!("launched {:?} at {velocity}", entity.id());
    }
}
