//! Feature plugins.

use bevy::prelude::*;

use crate::common::schedule;
use crate::plugins::projectiles::ProjectilesPlugin;

pub mod core;
pub mod hit_detection;
pub mod physics;
pub mod projectiles;
pub mod world;

/// Register the combat plugins, physics included. Works without a window.
pub fn register_gameplay(app: &mut App) {
    schedule::configure(app);
    core::plugin(app);
    physics::plugin(app);
    hit_detection::plugin(app);
    app.add_plugins(ProjectilesPlugin::default());
}
