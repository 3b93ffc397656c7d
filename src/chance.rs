//! Per-frame coin flips
//!
//! All randomness comes from a caller-supplied `rand::Rng`, so a seeded
//! generator replays the same spawns and tiles frame for frame.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A "one in N" event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chance {
    pub one_in: u32,
}

impl Chance {
    pub const fn one_in(n: u32) -> Self {
        Self { one_in: n }
    }

    /// Always succeeds
    pub const ALWAYS: Chance = Chance::one_in(1);

    /// Flip the coin. `one_in` must be non-zero (checked by config validation).
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_ratio(1, self.one_in)
    }
}
