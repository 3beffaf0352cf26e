//! Per-subject bookkeeping of which hits already happened.
//!
//! Each subject lives in at most one of the three maps, the one matching its
//! current trigger. The caller passes the trigger in; the store never looks at
//! components itself.

use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::*;

use super::policy::HitTrigger;

#[derive(Resource, Debug, Default)]
pub struct HitPolicyStore {
    once_per_entity: HashMap<Entity, HashSet<Entity>>,
    periodic: HashMap<Entity, f32>,
    periodic_per_entity: HashMap<Entity, HashMap<Entity, f32>>,
}

impl HitPolicyStore {
    /// Read-only gate. Policies the store does not track always answer `false`.
    pub fn should_emit(&self, subject: Entity, other: Entity, trigger: HitTrigger) -> bool {
        match trigger {
            HitTrigger::Periodic => !self.periodic.contains_key(&subject),
            HitTrigger::PeriodicPerEntity => !self
                .periodic_per_entity
                .get(&subject)
                .is_some_and(|timers| timers.contains_key(&other)),
            HitTrigger::OncePerEntity => !self
                .once_per_entity
                .get(&subject)
                .is_some_and(|seen| seen.contains(&other)),
            _ => false,
        }
    }

    /// Insert the entry for this hit. Returns `false` if it already existed.
    pub fn record_hit(
        &mut self,
        subject: Entity,
        other: Entity,
        trigger: HitTrigger,
        cooldown: f32,
    ) -> bool {
        match trigger {
            HitTrigger::Periodic => {
                if self.periodic.contains_key(&subject) {
                    return false;
                }
                self.periodic.insert(subject, cooldown);
                true
            }
            HitTrigger::PeriodicPerEntity => {
                let timers = self.periodic_per_entity.entry(subject).or_default();
                if timers.contains_key(&other) {
                    return false;
                }
                timers.insert(other, cooldown);
                true
            }
            HitTrigger::OncePerEntity => {
                self.once_per_entity.entry(subject).or_default().insert(other)
            }
            _ => false,
        }
    }

    /// Remove the entry for this hit if present.
    pub fn clear_hit(&mut self, subject: Entity, other: Entity, trigger: HitTrigger) -> bool {
        match trigger {
            HitTrigger::Periodic => self.periodic.remove(&subject).is_some(),
            HitTrigger::PeriodicPerEntity => {
                let Some(timers) = self.periodic_per_entity.get_mut(&subject) else {
                    return false;
                };
                let removed = timers.remove(&other).is_some();
                if timers.is_empty() {
                    self.periodic_per_entity.remove(&subject);
                }
                removed
            }
            HitTrigger::OncePerEntity => {
                let Some(seen) = self.once_per_entity.get_mut(&subject) else {
                    return false;
                };
                let removed = seen.remove(&other);
                if seen.is_empty() {
                    self.once_per_entity.remove(&subject);
                }
                removed
            }
            _ => false,
        }
    }

    /// Drop whatever `trigger` tracks for `subject`. Returns whether anything was there.
    pub fn clear_policy(&mut self, subject: Entity, trigger: HitTrigger) -> bool {
        match trigger {
            HitTrigger::Periodic => self.periodic.remove(&subject).is_some(),
            HitTrigger::PeriodicPerEntity => self.periodic_per_entity.remove(&subject).is_some(),
            HitTrigger::OncePerEntity => self.once_per_entity.remove(&subject).is_some(),
            _ => false,
        }
    }

    /// Forget everything about `subject`.
    pub fn reset_subject(&mut self, subject: Entity) {
        self.once_per_entity.remove(&subject);
        self.periodic.remove(&subject);
        self.periodic_per_entity.remove(&subject);
    }

    /// Count every cooldown down by `elapsed`. Expired timers go away in the same call;
    /// a remainder within `f32::EPSILON` of zero counts as expired.
    ///
    /// Per-entity timers whose subject or other entity no longer `exists` are dropped
    /// instead of aged.
    pub fn age_timers(&mut self, elapsed: f32, exists: impl Fn(Entity) -> bool) {
        self.periodic.retain(|_, remaining| {
            *remaining -= elapsed;
            *remaining > f32::EPSILON
        });

        self.periodic_per_entity.retain(|subject, timers| {
            if !exists(*subject) {
                return false;
            }
            timers.retain(|other, remaining| {
                if !exists(*other) {
                    return false;
                }
                *remaining -= elapsed;
                *remaining > f32::EPSILON
            });
            !timers.is_empty()
        });
    }

    /// Remaining cooldown; `other` is only used by the per-entity variant.
    pub fn cooldown(&self, subject: Entity, other: Option<Entity>) -> Option<f32> {
        match other {
            None => self.periodic.get(&subject).copied(),
            Some(other) => self
                .periodic_per_entity
                .get(&subject)
                .and_then(|timers| timers.get(&other))
                .copied(),
        }
    }

    /// Whether any structure holds an entry for `subject`.
    pub fn is_tracked(&self, subject: Entity) -> bool {
        self.once_per_entity.contains_key(&subject)
            || self.periodic.contains_key(&subject)
            || self.periodic_per_entity.contains_key(&subject)
    }
}
