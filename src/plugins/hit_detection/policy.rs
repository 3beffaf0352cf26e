//! Hit trigger policies.

use bevy::prelude::*;

/// When a collision on a subject turns into a `HitEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitTrigger {
    /// First collision emits, then the subject downgrades itself to `Disabled`.
    Once,
    /// Once for every distinct other entity.
    #[default]
    OncePerEntity,
    /// At most once per cooldown, whoever the other entity is.
    Periodic,
    /// At most once per cooldown for each other entity.
    PeriodicPerEntity,
    Disabled,
    // Recognised but never emit.
    OnContact,
    OnCollision,
    OnPeriod,
    Always,
    TimedCollisionPerEntity,
    WhileMoving,
}

impl HitTrigger {
    /// Whether this policy keeps entries in the policy store.
    #[inline]
    pub fn is_tracked(self) -> bool {
        matches!(
            self,
            HitTrigger::OncePerEntity | HitTrigger::Periodic | HitTrigger::PeriodicPerEntity
        )
    }
}

/// Attached to any entity whose collisions should produce hit notifications.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitDetection {
    pub trigger: HitTrigger,
    /// Whether terrain blocks count as something to hit.
    pub hit_blocks: bool,
    /// Cooldown of the periodic triggers; `None` uses `Tunables::hit_cooldown`.
    pub cooldown: Option<f32>,
}

impl HitDetection {
    pub fn new(trigger: HitTrigger) -> Self {
        Self { trigger, hit_blocks: true, cooldown: None }
    }

    pub fn ignoring_blocks(mut self) -> Self {
        self.hit_blocks = false;
        self
    }

    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = Some(seconds);
        self
    }
}

impl Default for HitDetection {
    fn default() -> Self {
        Self::new(HitTrigger::default())
    }
}
