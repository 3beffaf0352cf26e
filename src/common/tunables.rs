//! Tunable combat constants, optionally loaded from a RON file.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Acceleration applied to gravity-affected projectiles (units/s^2).
    pub gravity: Vec3,
    /// Fraction of speed kept after a gravity bounce.
    pub restitution: f32,
    /// Below this speed a gravity-affected projectile is handed to the physics engine.
    pub kinematic_threshold: f32,
    /// Below this speed orientation is left alone.
    pub rotation_threshold: f32,
    /// Impulse added to a struck entity along the negated hit normal.
    pub knockback: f32,
    /// Default cooldown of periodic hit triggers (seconds).
    pub hit_cooldown: f32,
    /// Local axis that points along the direction of travel.
    pub forward: Vec3,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            restitution: 0.1,
            kinematic_threshold: 0.33,
            rotation_threshold: 0.33,
            knockback: 3.0,
            hit_cooldown: 1.0,
            forward: Vec3::Z,
        }
    }
}

#[derive(Debug, Error)]
pub enum TunablesError {
    #[error("failed to read tunables: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tunables: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl Tunables {
    /// Parse tunables from RON. Missing fields keep their defaults.
    pub fn from_ron(source: &str) -> Result<Self, TunablesError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TunablesError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Load from file, falling back to defaults if it is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tunables) => tunables,
            Err(e) => {
                warn!("{e} ({}), using defaults", path.display());
                Self::default()
            }
        }
    }
}
