//! Elapsed-time accumulator.
//!
//! Tick systems add every frame delta here and then consume the whole
//! remainder in one go, so a long stall is aged exactly once and no
//! fractional time is dropped between ticks.

#[derive(Debug, Default, Clone, Copy)]
pub struct TickAccumulator {
    pending: f32,
}

impl TickAccumulator {
    #[inline]
    pub fn accumulate(&mut self, elapsed: f32) {
        self.pending += elapsed.max(0.0);
    }

    /// Returns the accumulated time and resets the remainder to zero.
    #[inline]
    pub fn consume(&mut self) -> f32 {
        std::mem::take(&mut self.pending)
    }

    #[inline]
    pub fn pending(&self) -> f32 {
        self.pending
    }
}
