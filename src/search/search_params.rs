//! Search configuration shared by the UCI loop, the CLI and the bench.

use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DEFAULT_DEPTH: u8 = 2;
pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Plies searched below the root. The only search bound.
    pub depth: u8,
    /// Tie-break seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            seed: None,
        }
    }
}

impl SearchParams {
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// A fresh tie-break generator for these parameters.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
