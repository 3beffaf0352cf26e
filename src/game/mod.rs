//! Composition root.
//!
//! - `configure_game`: states + every combat plugin, physics included.
//! - `configure_headless`: the same, for apps built on `MinimalPlugins` (integration tests).
//!
//! The crate ships no window or renderer; a host game adds `DefaultPlugins` itself
//! and then calls `configure_game`.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins;

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - The caller provides `MinimalPlugins`, `StatesPlugin` and the asset/scene plugins avian needs.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// States and gameplay plugins.
pub fn configure_game(app: &mut App) {
    app.init_state::<GameState>();
    plugins::register_gameplay(app);
}
