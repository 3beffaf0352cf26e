//! Core plugin: shared resources.

use bevy::prelude::*;

use crate::common::tunables::Tunables;

/// Optional tunables override, relative to the working directory.
pub const TUNABLES_PATH: &str = "assets/tunables.ron";

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::load_or_default(TUNABLES_PATH));
    }
}
