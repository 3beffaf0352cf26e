//! Buffered launch requests.
//!
//! Whoever fires something (a weapon, a trap, a test) only writes intent; the
//! launch system is the single place that turns it into a projectile entity.

use bevy::prelude::*;

use crate::plugins::hit_detection::HitDetection;

use super::components::{ProjectileFlags, RigidVolume, TriggerVolume};

#[derive(Message, Clone, Debug)]
pub struct LaunchProjectile {
    pub instigator: Option<Entity>,
    pub origin: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    /// Fraction of `speed` actually imparted; clamped to `0..=1`.
    pub charge: f32,
    pub flags: ProjectileFlags,
    pub trigger: TriggerVolume,
    pub rigid: Option<RigidVolume>,
    pub hit: Option<HitDetection>,
}

impl LaunchProjectile {
    /// Launch velocity, or `None` when `direction` is degenerate.
    pub fn velocity(&self) -> Option<Vec3> {
        let direction = self.direction.try_normalize()?;
        Some(direction * self.speed * self.charge.clamp(0.0, 1.0))
    }
}
