use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;

/// How a projectile reacts when it strikes something solid.
///
/// Several flags may be set; the resolver picks one response per collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectileFlags {
    pub affected_by_gravity: bool,
    pub bounces: bool,
    pub ricochets: bool,
    pub pierces: bool,
    pub reflects: bool,
    pub rotates_to_velocity: bool,
}

/// Scripted projectile state. Position and orientation live in `Transform`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub instigator: Option<Entity>,
    pub velocity: Vec3,
    /// Constant acceleration folded into `velocity` every tick.
    pub acceleration: Vec3,
    /// Speed along the path, refreshed whenever `velocity` changes.
    pub speed: f32,
    pub flags: ProjectileFlags,
    /// Frozen projectiles keep their place and are no longer integrated.
    pub frozen: bool,
}

impl Projectile {
    pub fn new(velocity: Vec3) -> Self {
        Self {
            instigator: None,
            velocity,
            acceleration: Vec3::ZERO,
            speed: velocity.length(),
            flags: ProjectileFlags::default(),
            frozen: false,
        }
    }

    pub fn with_instigator(mut self, instigator: Entity) -> Self {
        self.instigator = Some(instigator);
        self
    }

    pub fn with_flags(mut self, flags: ProjectileFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.speed = velocity.length();
    }
}

/// The sensor volume that reports what a projectile passes through.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    /// Bounding-sphere radius of the sensor collider.
    pub radius: f32,
    /// Groups the sensor reports contacts with.
    pub detect: LayerMask,
    pub enabled: bool,
}

impl TriggerVolume {
    pub fn new(radius: f32, detect: impl Into<LayerMask>) -> Self {
        Self { radius, detect: detect.into(), enabled: true }
    }

    pub fn layers(&self) -> CollisionLayers {
        let filters = if self.enabled { self.detect } else { LayerMask::NONE };
        CollisionLayers::new(Layer::Projectile, filters)
    }

    /// Stop reporting contacts. The collider stays; it just collides with nothing.
    pub fn disable(&mut self, layers: &mut CollisionLayers) {
        self.enabled = false;
        layers.filters = LayerMask::NONE;
    }
}

/// Solid volume of a rigged projectile.
///
/// While the body is kinematic the integrator sweeps against `collides_with`
/// itself; once the body turns dynamic the physics engine takes over.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RigidVolume {
    pub collides_with: LayerMask,
}

impl RigidVolume {
    pub fn new(collides_with: impl Into<LayerMask>) -> Self {
        Self { collides_with: collides_with.into() }
    }

    pub fn layers(&self) -> CollisionLayers {
        CollisionLayers::new(Layer::Projectile, self.collides_with)
    }
}
