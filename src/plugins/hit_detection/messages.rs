use bevy::prelude::*;

/// A collision that passed the subject's trigger policy.
///
/// Damage and death handling subscribe to this.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub struct HitEvent {
    /// The subject whose policy fired (usually the projectile).
    pub instigator: Entity,
    /// The struck entity.
    pub other: Entity,
    /// Whoever launched the instigator, when it is a projectile.
    pub owner: Option<Entity>,
    pub position: Vec3,
    pub normal: Vec3,
}
