//! Physics bridge: avian3d setup plus the two seams the combat code talks through.
//!
//! - contacts reported by avian become `Collision` messages (one per participant),
//!   carrying the manifold's deepest point and normal
//! - `CentralForce` messages become forces on dynamic bodies before the next step

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::schedule::{NotifyPhase, TickPhase};
use crate::common::tunables::Tunables;

pub mod messages;

pub use messages::{CentralForce, Collision};

pub fn plugin(app: &mut App) {
    let gravity = app
        .world()
        .get_resource::<Tunables>()
        .map_or(Tunables::default().gravity, |t| t.gravity);
    app.add_plugins(PhysicsPlugins::default());
    app.insert_resource(Gravity(gravity));

    add_messages(app);
    app.add_systems(
        FixedPostUpdate,
        forward_contact_starts.in_set(NotifyPhase::Forward),
    )
    .add_systems(FixedUpdate, apply_central_forces.in_set(TickPhase::Forces));
}

/// Message storage used by the combat plugins. Safe to call more than once.
pub fn add_messages(app: &mut App) {
    app.add_message::<Collision>().add_message::<CentralForce>();
}

#[derive(Clone, Copy, Debug)]
struct ContactSide {
    collider: Entity,
    body: Option<Entity>,
}

impl ContactSide {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

/// Point and outward normal of the deepest manifold contact, as seen from
/// `receiver`. The manifold normal points from `collider1` to `collider2`.
pub fn manifold_contact(pair: &ContactPair, receiver: Entity) -> Option<(Vec3, Vec3)> {
    let (manifold, deepest) = pair
        .manifolds
        .iter()
        .filter_map(|m| m.find_deepest_contact().map(|p| (m, p)))
        .max_by(|(_, a), (_, b)| a.penetration.total_cmp(&b.penetration))?;
    let outward = if receiver == pair.collider1 {
        -manifold.normal
    } else {
        manifold.normal
    };
    Some((deepest.point, outward.try_normalize()?))
}

/// Contact as seen from `entity`. Falls back to the line between centres when
/// avian has no manifold for the pair.
fn contact_for(
    entity: ContactSide,
    other: ContactSide,
    pair: Option<&ContactPair>,
    positions: &Query<&Transform>,
) -> Collision {
    let (here_id, there_id) = (entity.gameplay_owner(), other.gameplay_owner());
    if let Some((point, normal)) = pair.and_then(|p| manifold_contact(p, entity.collider)) {
        return Collision { entity: here_id, other: there_id, point, normal };
    }
    let here = positions.get(here_id).map(|tf| tf.translation).unwrap_or(Vec3::ZERO);
    let there = positions.get(there_id).map(|tf| tf.translation).unwrap_or(here);
    Collision {
        entity: here_id,
        other: there_id,
        point: here,
        normal: (here - there).try_normalize().unwrap_or(Vec3::Y),
    }
}

pub fn forward_contact_starts(
    mut started: MessageReader<CollisionStart>,
    contacts: Collisions,
    positions: Query<&Transform>,
    mut collisions: MessageWriter<Collision>,
) {
    for ev in started.read() {
        let a = ContactSide { collider: ev.collider1, body: ev.body1 };
        let b = ContactSide { collider: ev.collider2, body: ev.body2 };
        if a.gameplay_owner() == b.gameplay_owner() {
            continue;
        }
        let pair = contacts.get(ev.collider1, ev.collider2);
        collisions.write(contact_for(a, b, pair, &positions));
        collisions.write(contact_for(b, a, pair, &positions));
    }
}

pub fn apply_central_forces(mut requests: MessageReader<CentralForce>, mut bodies: Query<Forces>) {
    for req in requests.read() {
        match bodies.get_mut(req.entity) {
            Ok(mut forces) => forces.apply_force(req.force),
            Err(_) => trace!("central force for {:?} dropped: no dynamic body", req.entity),
        }
    }
}
