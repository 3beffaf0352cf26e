//! Hit detection: per-subject trigger policies over collision notifications.
//!
//! ```text
//!  Collision ──► detect_hits ──► HitEvent (+ knock-back on the struck entity)
//!                    │
//!                    ▼
//!              HitPolicyStore ◄── age_hit_timers (once per fixed tick)
//!                    ▲
//!   On<Add, HitDetection>     reset every structure for the subject
//!   On<Remove, HitDetection>  clear the structure of the trigger in effect
//! ```
//!
//! The store is a plain resource handed to the systems that need it; nothing
//! reaches it through a global.

use bevy::prelude::*;

pub mod messages;
pub mod policy;
pub mod store;
pub mod systems;

pub use messages::HitEvent;
pub use policy::{HitDetection, HitTrigger};
pub use store::HitPolicyStore;

use crate::common::schedule::{NotifyPhase, TickPhase};
use crate::plugins::physics;

pub fn plugin(app: &mut App) {
    physics::add_messages(app);
    app.init_resource::<HitPolicyStore>()
        .add_message::<HitEvent>()
        .add_observer(systems::on_hit_detection_added)
        .add_observer(systems::on_hit_detection_removed)
        .add_systems(FixedUpdate, systems::age_hit_timers.in_set(TickPhase::AgeTimers))
        .add_systems(FixedPostUpdate, systems::detect_hits.in_set(NotifyPhase::Detect));
}

#[cfg(test)]
mod tests;
