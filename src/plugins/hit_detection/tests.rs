use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::test_utils::{drain_messages, ensure_messages, run_system_once, set_delta};
use crate::common::tunables::Tunables;
use crate::plugins::physics::Collision;
use crate::plugins::projectiles::components::Projectile;
use crate::plugins::world::Block;

use super::systems::{self, gate_collision, HitOutcome};
use super::{HitDetection, HitEvent, HitPolicyStore, HitTrigger};

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn setup() -> World {
    let mut world = World::new();
    world.init_resource::<HitPolicyStore>();
    world.insert_resource(Tunables::default());
    ensure_messages::<Collision>(&mut world);
    ensure_messages::<HitEvent>(&mut world);
    world.add_observer(systems::on_hit_detection_added);
    world.add_observer(systems::on_hit_detection_removed);
    world
}

fn collision(entity: Entity, other: Entity) -> Collision {
    Collision { entity, other, point: Vec3::ZERO, normal: Vec3::Y }
}

/// Deliver collisions to the coordinator and return the hits it emitted.
///
/// The delivered collisions are drained afterwards so a later call does not see them again.
fn deliver(world: &mut World, collisions: &[Collision]) -> Vec<HitEvent> {
    for c in collisions {
        world.write_message(*c);
    }
    run_system_once(world, systems::detect_hits);
    drain_messages::<Collision>(world);
    drain_messages::<HitEvent>(world)
}

fn age(world: &mut World, dt: f32) {
    set_delta(world, dt);
    run_system_once(world, systems::age_hit_timers);
}

// --------------------------------------------------------------------------------------
// Policy gating
// --------------------------------------------------------------------------------------

#[test]
fn once_emits_a_single_hit_then_disables() {
    let mut world = setup();
    let subject = world.spawn(HitDetection::new(HitTrigger::Once)).id();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();

    let hits = deliver(&mut world, &[collision(subject, a), collision(subject, b)]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].other, a);
    assert_eq!(world.get::<HitDetection>(subject).unwrap().trigger, HitTrigger::Disabled);

    assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());
    assert!(!world.resource::<HitPolicyStore>().is_tracked(subject));
}

#[test]
fn once_per_entity_emits_once_per_other() {
    let mut world = setup();
    let subject = world.spawn(HitDetection::new(HitTrigger::OncePerEntity)).id();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();

    assert_eq!(deliver(&mut world, &[collision(subject, a), collision(subject, a)]).len(), 1);
    assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());

    let hits = deliver(&mut world, &[collision(subject, b)]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].other, b);
}

#[test]
fn periodic_cooldown_gates_by_aged_time() {
    let mut world = setup();
    let subject = world
        .spawn(HitDetection::new(HitTrigger::Periodic).with_cooldown(0.5))
        .id();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();

    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);

    // Still cooling down, whoever the other entity is.
    age(&mut world, 0.3);
    assert!(deliver(&mut world, &[collision(subject, b)]).is_empty());

    // Cooldown reaches zero and is removed in the same aging call.
    age(&mut world, 0.2);
    assert_eq!(world.resource::<HitPolicyStore>().cooldown(subject, None), None);
    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
}

#[test]
fn periodic_uses_configured_default_cooldown() {
    let mut world = setup();
    world.resource_mut::<Tunables>().hit_cooldown = 2.0;
    let subject = world.spawn(HitDetection::new(HitTrigger::Periodic)).id();
    let a = world.spawn_empty().id();

    deliver(&mut world, &[collision(subject, a)]);
    assert_eq!(world.resource::<HitPolicyStore>().cooldown(subject, None), Some(2.0));
}

#[test]
fn periodic_per_entity_tracks_pairs_independently() {
    let mut world = setup();
    let subject = world
        .spawn(HitDetection::new(HitTrigger::PeriodicPerEntity).with_cooldown(1.0))
        .id();
    let a = world.spawn_empty().id();
    let b = world.spawn_empty().id();

    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
    age(&mut world, 0.6);
    assert_eq!(deliver(&mut world, &[collision(subject, b)]).len(), 1);
    assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());

    // a expires, b still has 0.6 left.
    age(&mut world, 0.4);
    let store = world.resource::<HitPolicyStore>();
    assert_eq!(store.cooldown(subject, Some(a)), None);
    assert!((store.cooldown(subject, Some(b)).unwrap() - 0.6).abs() < 1e-5);

    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
    assert!(deliver(&mut world, &[collision(subject, b)]).is_empty());
}

#[test]
fn inert_triggers_never_emit() {
    let mut world = setup();
    let a = world.spawn_empty().id();
    for trigger in [HitTrigger::Disabled, HitTrigger::Always, HitTrigger::WhileMoving] {
        let subject = world.spawn(HitDetection::new(trigger)).id();
        assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());
        assert!(!world.resource::<HitPolicyStore>().is_tracked(subject));
    }
}

#[test]
fn collision_without_hit_detection_is_a_no_op() {
    let mut world = setup();
    let subject = world.spawn_empty().id();
    let a = world.spawn_empty().id();
    assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());
}

// --------------------------------------------------------------------------------------
// Activation / deactivation
// --------------------------------------------------------------------------------------

#[test]
fn reactivation_forgets_previous_hits() {
    let mut world = setup();
    let subject = world.spawn(HitDetection::new(HitTrigger::OncePerEntity)).id();
    let a = world.spawn_empty().id();

    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
    assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());

    world.entity_mut(subject).remove::<HitDetection>();
    assert!(!world.resource::<HitPolicyStore>().is_tracked(subject));
    world.entity_mut(subject).insert(HitDetection::new(HitTrigger::OncePerEntity));

    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
}

#[test]
fn deactivation_clears_only_the_current_trigger() {
    let mut world = setup();
    let subject = world
        .spawn(HitDetection::new(HitTrigger::Periodic).with_cooldown(5.0))
        .id();
    let a = world.spawn_empty().id();
    deliver(&mut world, &[collision(subject, a)]);

    // Switching the trigger in place does not notify anyone.
    world.get_mut::<HitDetection>(subject).unwrap().trigger = HitTrigger::OncePerEntity;
    world.entity_mut(subject).remove::<HitDetection>();

    let store = world.resource::<HitPolicyStore>();
    assert_eq!(store.cooldown(subject, None), Some(5.0));

    // Activation wipes everything.
    world.entity_mut(subject).insert(HitDetection::new(HitTrigger::Periodic));
    assert!(!world.resource::<HitPolicyStore>().is_tracked(subject));
}

#[test]
fn despawned_subject_releases_its_bookkeeping() {
    let mut world = setup();
    let subject = world.spawn(HitDetection::new(HitTrigger::OncePerEntity)).id();
    let a = world.spawn_empty().id();
    deliver(&mut world, &[collision(subject, a)]);
    assert!(world.resource::<HitPolicyStore>().is_tracked(subject));

    world.despawn(subject);
    assert!(!world.resource::<HitPolicyStore>().is_tracked(subject));
}

#[test]
fn per_entity_timer_is_dropped_once_other_is_gone() {
    let mut world = setup();
    let subject = world
        .spawn(HitDetection::new(HitTrigger::PeriodicPerEntity).with_cooldown(10.0))
        .id();
    let a = world.spawn_empty().id();
    deliver(&mut world, &[collision(subject, a)]);

    world.despawn(a);
    age(&mut world, 0.1);
    assert!(!world.resource::<HitPolicyStore>().is_tracked(subject));
}

// --------------------------------------------------------------------------------------
// Hit payload
// --------------------------------------------------------------------------------------

#[test]
fn blocks_are_ignored_when_subject_does_not_hit_blocks() {
    let mut world = setup();
    let subject = world
        .spawn(HitDetection::new(HitTrigger::OncePerEntity).ignoring_blocks())
        .id();
    let block = world.spawn(Block::SOLID).id();
    let crate_ = world.spawn_empty().id();

    assert!(deliver(&mut world, &[collision(subject, block)]).is_empty());
    assert_eq!(deliver(&mut world, &[collision(subject, crate_)]).len(), 1);
}

#[test]
fn hit_knocks_back_movable_target_and_names_owner() {
    let mut world = setup();
    let shooter = world.spawn_empty().id();
    let arrow = world
        .spawn((
            Projectile::new(Vec3::new(0.0, 0.0, 10.0)).with_instigator(shooter),
            HitDetection::new(HitTrigger::Once),
        ))
        .id();
    let target = world.spawn(LinearVelocity(Vec3::ZERO)).id();

    let hits = deliver(
        &mut world,
        &[Collision {
            entity: arrow,
            other: target,
            point: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Z,
        }],
    );

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].instigator, arrow);
    assert_eq!(hits[0].owner, Some(shooter));
    assert_eq!(hits[0].position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(world.get::<LinearVelocity>(target).unwrap().0, Vec3::new(0.0, 0.0, -3.0));
}

#[test]
fn suppressed_hit_applies_no_knockback() {
    let mut world = setup();
    let subject = world.spawn(HitDetection::new(HitTrigger::OncePerEntity)).id();
    let target = world.spawn(LinearVelocity(Vec3::ZERO)).id();

    deliver(&mut world, &[collision(subject, target), collision(subject, target)]);
    assert_eq!(world.get::<LinearVelocity>(target).unwrap().0, Vec3::new(0.0, -3.0, 0.0));
}

#[test]
fn knockback_skips_static_blocks_and_projectiles() {
    let mut world = setup();
    let subject = world.spawn(HitDetection::new(HitTrigger::OncePerEntity)).id();
    let block = world
        .spawn((Block::SOLID, RigidBody::Static, LinearVelocity(Vec3::ZERO)))
        .id();
    let arrow = world
        .spawn((Projectile::new(Vec3::new(0.0, 0.0, 10.0)), LinearVelocity(Vec3::ZERO)))
        .id();
    let crate_ = world
        .spawn((RigidBody::Dynamic, LinearVelocity(Vec3::ZERO)))
        .id();

    let hits = deliver(
        &mut world,
        &[collision(subject, block), collision(subject, arrow), collision(subject, crate_)],
    );

    assert_eq!(hits.len(), 3);
    assert_eq!(world.get::<LinearVelocity>(block).unwrap().0, Vec3::ZERO);
    assert_eq!(world.get::<LinearVelocity>(arrow).unwrap().0, Vec3::ZERO);
    assert_eq!(world.get::<LinearVelocity>(crate_).unwrap().0, Vec3::new(0.0, -3.0, 0.0));
}

// --------------------------------------------------------------------------------------
// Store
// --------------------------------------------------------------------------------------

#[test]
fn gate_reports_outcome() {
    let mut world = World::new();
    let subject = world.spawn_empty().id();
    let other = world.spawn_empty().id();
    let mut store = HitPolicyStore::default();
    let mut detection = HitDetection::new(HitTrigger::OncePerEntity);

    let gate = |store: &mut HitPolicyStore, detection: &mut HitDetection, is_block| {
        gate_collision(store, detection, subject, other, is_block, 1.0)
    };
    assert_eq!(gate(&mut store, &mut detection, false), HitOutcome::Emitted);
    assert_eq!(gate(&mut store, &mut detection, false), HitOutcome::Suppressed);

    let mut blind = detection.ignoring_blocks();
    assert_eq!(gate(&mut store, &mut blind, true), HitOutcome::Ignored);
}

#[test]
fn record_and_clear_are_idempotent() {
    let mut world = World::new();
    let subject = world.spawn_empty().id();
    let other = world.spawn_empty().id();
    let mut store = HitPolicyStore::default();

    for trigger in [
        HitTrigger::OncePerEntity,
        HitTrigger::Periodic,
        HitTrigger::PeriodicPerEntity,
    ] {
        assert!(store.should_emit(subject, other, trigger));
        assert!(store.record_hit(subject, other, trigger, 1.0));
        assert!(!store.record_hit(subject, other, trigger, 1.0));
        assert!(!store.should_emit(subject, other, trigger));

        assert!(store.clear_hit(subject, other, trigger));
        assert!(!store.clear_hit(subject, other, trigger));
        assert!(!store.is_tracked(subject));
    }

    assert!(!store.should_emit(subject, other, HitTrigger::Once));
    assert!(!store.record_hit(subject, other, HitTrigger::Disabled, 1.0));
}

#[test]
fn cooldown_expires_once_aged_past_zero() {
    let mut world = World::new();
    let subject = world.spawn_empty().id();
    let other = world.spawn_empty().id();
    let mut store = HitPolicyStore::default();
    store.record_hit(subject, other, HitTrigger::Periodic, 0.3);

    for _ in 0..3 {
        store.age_timers(0.1 + 1e-6, |_| true);
    }
    assert!(!store.is_tracked(subject));
}

#[test]
fn cooldown_of_non_binary_length_expires_after_whole_ticks() {
    let mut world = setup();
    let subject = world
        .spawn(HitDetection::new(HitTrigger::Periodic).with_cooldown(0.3))
        .id();
    let a = world.spawn_empty().id();

    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
    for _ in 0..2 {
        age(&mut world, 0.1);
        assert!(deliver(&mut world, &[collision(subject, a)]).is_empty());
    }

    // 0.3 - 0.1 - 0.1 - 0.1 lands a rounding error above zero in f32.
    age(&mut world, 0.1);
    assert_eq!(world.resource::<HitPolicyStore>().cooldown(subject, None), None);
    assert_eq!(deliver(&mut world, &[collision(subject, a)]).len(), 1);
}
