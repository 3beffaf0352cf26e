//! Tick ordering shared by the combat plugins.
//!
//! ```text
//! FixedUpdate      Launch -> AgeTimers -> ApplyPending -> Resolve -> Integrate -> Forces
//! FixedPostUpdate  (physics step) -> Forward -> Buffer -> Detect
//! ```
//!
//! Collisions synthesized by `Integrate` are picked up by `Buffer`/`Detect` in the
//! same fixed iteration and resolved at the start of the next one.

use avian3d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    Launch,
    AgeTimers,
    ApplyPending,
    Resolve,
    Integrate,
    Forces,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyPhase {
    Forward,
    Buffer,
    Detect,
}

pub fn configure(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            TickPhase::Launch,
            TickPhase::AgeTimers,
            TickPhase::ApplyPending,
            TickPhase::Resolve,
            TickPhase::Integrate,
            TickPhase::Forces,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    )
    .configure_sets(
        FixedPostUpdate,
        (NotifyPhase::Forward, NotifyPhase::Buffer, NotifyPhase::Detect)
            .chain()
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}
