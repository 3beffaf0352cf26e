//! Common, shared types.

pub mod clock;
pub mod layers;
pub mod math;
pub mod schedule;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
