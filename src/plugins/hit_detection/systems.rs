//! Hit-detection coordinator.
//!
//! Turns raw `Collision` notifications into gated `HitEvent`s, keeps the policy
//! store in sync with subject activation, and ages cooldowns once per tick.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::clock::TickAccumulator;
use crate::common::tunables::Tunables;
use crate::plugins::physics::Collision;
use crate::plugins::projectiles::components::Projectile;
use crate::plugins::world::Block;

use super::messages::HitEvent;
use super::policy::{HitDetection, HitTrigger};
use super::store::HitPolicyStore;

/// What the coordinator did with one collision notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// No policy applies (disabled, or a block the subject doesn't hit).
    Ignored,
    /// The policy gated it out.
    Suppressed,
    /// A `HitEvent` was emitted and the collision counts as handled.
    Emitted,
}

/// Apply the subject's trigger policy to one collision.
///
/// `Once` needs no bookkeeping: it downgrades itself to `Disabled` as it fires.
pub fn gate_collision(
    store: &mut HitPolicyStore,
    detection: &mut HitDetection,
    subject: Entity,
    other: Entity,
    other_is_block: bool,
    default_cooldown: f32,
) -> HitOutcome {
    if other_is_block && !detection.hit_blocks {
        return HitOutcome::Ignored;
    }
    match detection.trigger {
        HitTrigger::Disabled => HitOutcome::Ignored,
        HitTrigger::Once => {
            detection.trigger = HitTrigger::Disabled;
            debug!("{subject:?} fired its single hit and is now disabled");
            HitOutcome::Emitted
        }
        trigger => {
            let cooldown = detection.cooldown.unwrap_or(default_cooldown);
            if store.should_emit(subject, other, trigger)
                && store.record_hit(subject, other, trigger, cooldown)
            {
                HitOutcome::Emitted
            } else {
                HitOutcome::Suppressed
            }
        }
    }
}

/// Static and kinematic bodies are moved by nobody but their owner.
#[inline]
fn takes_knockback(body: Option<&RigidBody>) -> bool {
    body.is_none_or(RigidBody::is_dynamic)
}

pub fn detect_hits(
    mut collisions: MessageReader<Collision>,
    mut store: ResMut<HitPolicyStore>,
    tunables: Res<Tunables>,
    mut subjects: Query<&mut HitDetection>,
    blocks: Query<(), With<Block>>,
    projectiles: Query<&Projectile>,
    mut movers: Query<(&mut LinearVelocity, Option<&RigidBody>), Without<Projectile>>,
    mut hits: MessageWriter<HitEvent>,
) {
    for ev in collisions.read() {
        let Ok(mut detection) = subjects.get_mut(ev.entity) else {
            continue;
        };

        let outcome = gate_collision(
            &mut store,
            &mut detection,
            ev.entity,
            ev.other,
            blocks.contains(ev.other),
            tunables.hit_cooldown,
        );
        if outcome != HitOutcome::Emitted {
            trace!("collision {:?} -> {:?}: {outcome:?}", ev.entity, ev.other);
            continue;
        }

        hits.write(HitEvent {
            instigator: ev.entity,
            other: ev.other,
            owner: projectiles.get(ev.entity).ok().and_then(|p| p.instigator),
            position: ev.point,
            normal: ev.normal,
        });

        if let Ok((mut velocity, body)) = movers.get_mut(ev.other) {
            if takes_knockback(body) {
                velocity.0 -= ev.normal * tunables.knockback;
            }
        }
    }
}

pub fn age_hit_timers(
    time: Res<Time>,
    live: Query<()>,
    mut store: ResMut<HitPolicyStore>,
    mut clock: Local<TickAccumulator>,
) {
    clock.accumulate(time.delta_secs());
    let elapsed = clock.consume();
    store.age_timers(elapsed, |entity| live.contains(entity));
}

/// A subject (re)joined the world: start from a clean slate.
pub fn on_hit_detection_added(add: On<Add, HitDetection>, mut store: ResMut<HitPolicyStore>) {
    store.reset_subject(add.entity);
}

/// A subject left the world: drop the bookkeeping of the trigger it had at that moment.
pub fn on_hit_detection_removed(
    remove: On<Remove, HitDetection>,
    subjects: Query<&HitDetection>,
    mut store: ResMut<HitPolicyStore>,
) {
    let Ok(detection) = subjects.get(remove.entity) else {
        return;
    };
    store.clear_policy(remove.entity, detection.trigger);
}
