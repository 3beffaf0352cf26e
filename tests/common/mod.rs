//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - `app_headless` installs everything through `game::configure_headless`, physics included.
//! - `app_combat` skips the physics engine and lets the test drive the fixed schedules
//!   itself, with the integrator sweeping through a test `RaySweep`.
#![allow(dead_code)]

use std::time::Duration;

use avian3d::prelude::LayerMask;
use bevy::asset::AssetPlugin;
use bevy::ecs::message::{Message, Messages};
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

use projectile_combat::common::schedule::{self, TickPhase};
use projectile_combat::common::state::GameState;
use projectile_combat::common::tunables::Tunables;
use projectile_combat::plugins::projectiles::motion::{Integration, RaySweep, SweepHit};
use projectile_combat::plugins::projectiles::ProjectilesPlugin;
use projectile_combat::plugins::{core, hit_detection, physics};

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    projectile_combat::game::configure_headless(&mut app);
    app
}

/// Nothing to hit anywhere.
pub struct OpenAir;

impl RaySweep for OpenAir {
    fn sweep(&self, _: Vec3, _: Dir3, _: f32, _: LayerMask, _: &[Entity]) -> Option<SweepHit> {
        None
    }
}

fn integrate_in_open_air(mut integration: Integration) {
    integration.run(&OpenAir);
}

/// Combat plugins without the physics engine. Gravity is off unless `tunables` says otherwise.
pub fn app_combat(tunables: Tunables) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(tunables);
    app.init_state::<GameState>();

    schedule::configure(&mut app);
    core::plugin(&mut app);
    physics::add_messages(&mut app);
    hit_detection::plugin(&mut app);
    app.add_plugins(ProjectilesPlugin { physics_sweeps: false });
    app.add_systems(FixedUpdate, integrate_in_open_air.in_set(TickPhase::Integrate));

    app.finish();
    app.cleanup();
    app.update();
    app
}

pub fn weightless() -> Tunables {
    Tunables { gravity: Vec3::ZERO, ..default() }
}

/// One fixed tick of `dt` seconds: simulation, then notification intake.
pub fn step(app: &mut App, dt: f32) {
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_secs_f32(dt));
    app.world_mut().insert_resource(time);
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedPostUpdate);
}

pub fn drain<M: Message>(app: &mut App) -> Vec<M> {
    app.world_mut().resource_mut::<Messages<M>>().drain().collect()
}
