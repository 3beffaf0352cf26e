//! Terrain blocks as seen by the combat code.
//!
//! Blocks are ordinary static colliders in the `World` layer with a `Block`
//! component describing how solid they are.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    pub penetrable: bool,
    pub liquid: bool,
}

impl Block {
    pub const SOLID: Self = Self { penetrable: false, liquid: false };
    pub const WATER: Self = Self { penetrable: true, liquid: true };

    /// Whether a projectile striking this block should react to it.
    #[inline]
    pub fn stops_projectiles(self) -> bool {
        !(self.penetrable && self.liquid)
    }
}

/// Static axis-aligned block centred at `center`.
pub fn terrain_block(center: Vec3, size: Vec3, block: Block) -> impl Bundle {
    let layers = CollisionLayers::new(Layer::World, [Layer::Character, Layer::Projectile]);
    (
        Name::new("Block"),
        block,
        Transform::from_translation(center),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        layers,
    )
}
