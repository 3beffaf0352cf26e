//! Projectiles plugin: scripted flight, swept collision checks and collision responses.
//!
//! # Data flow (one fixed tick)
//! ```text
//!   FixedUpdate
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) launch_projectiles                                                    │
//!│      - reads: LaunchProjectile messages                                    │
//!│      - spawns: Projectile + trigger sensor (+ rigid volume, hit detection) │
//!│      - On<Add, Projectile> enqueues the new entity in the registry         │
//!│                                                                            │
//!│  (B) apply_pending_projectiles                                             │
//!│      - folds queued adds, then queued removals, into the active set        │
//!│                                                                            │
//!│  (C) resolve_buffered_collisions                                           │
//!│      - drains CollisionBuffer (last tick's first collision per projectile) │
//!│      - ricochet > pierce > reflect > bounce                                │
//!│      - pierce freezes and enqueues removal                                 │
//!│                                                                            │
//!│  (D) integrate_projectiles                                                 │
//!│      - slow gravity projectiles become dynamic bodies, enqueue removal     │
//!│      - gravity, ray sweeps, clamped translation, look-at rotation          │
//!│      - writes: Collision (swept hits), CentralForce (dynamic bodies)       │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate (after the physics step)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (E) buffer_projectile_collisions                                          │
//!│      - reads: Collision messages (native contacts and swept hits)          │
//!│      - keeps the first one per projectile against a stopping block         │
//!└────────────────────────────────────────────────────────────────────────────┘
//!
//! Feedback loop:
//!   integrate writes Collision -> buffer keeps it -> resolve consumes it next tick
//! ```

pub mod buffer;
pub mod components;
pub mod launch;
pub mod messages;
pub mod motion;
pub mod registry;
pub mod response;

use bevy::prelude::*;

use crate::common::schedule::{NotifyPhase, TickPhase};
use crate::plugins::physics;

pub use buffer::CollisionBuffer;
pub use components::{Projectile, ProjectileFlags, RigidVolume, TriggerVolume};
pub use messages::LaunchProjectile;
pub use registry::ProjectileRegistry;

pub struct ProjectilesPlugin {
    /// Sweep through avian's `SpatialQuery`. Turn off to drive the integrator
    /// with another `RaySweep` (headless tests without a physics world).
    pub physics_sweeps: bool,
}

impl Default for ProjectilesPlugin {
    fn default() -> Self {
        Self { physics_sweeps: true }
    }
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        physics::add_messages(app);
        app.init_resource::<ProjectileRegistry>()
            .init_resource::<CollisionBuffer>()
            .add_message::<LaunchProjectile>()
            .add_observer(registry::on_projectile_added)
            .add_observer(registry::on_projectile_removed);

        app.add_systems(
            FixedUpdate,
            (
                launch::launch_projectiles.in_set(TickPhase::Launch),
                registry::apply_pending_projectiles.in_set(TickPhase::ApplyPending),
                response::resolve_buffered_collisions.in_set(TickPhase::Resolve),
            ),
        )
        .add_systems(
            FixedPostUpdate,
            buffer::buffer_projectile_collisions.in_set(NotifyPhase::Buffer),
        );

        if self.physics_sweeps {
            app.add_systems(
                FixedUpdate,
                motion::integrate_projectiles.in_set(TickPhase::Integrate),
            );
        }
    }
}
