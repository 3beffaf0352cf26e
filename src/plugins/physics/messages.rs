//! Physics-facing notifications.
//!
//! `Collision` is the one collision notification every consumer sees, whether the
//! physics engine reported the contact or the motion integrator's sweep found it.

use bevy::prelude::*;

/// `entity` touched `other` at `point`; `normal` points away from `other`.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub entity: Entity,
    pub other: Entity,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Translation handed to a dynamic rigid body as a force through its centre of mass.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct CentralForce {
    pub entity: Entity,
    pub force: Vec3,
}
