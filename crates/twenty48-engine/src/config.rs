//! Board construction parameters.

use crate::error::BoardError;

/// Configuration for [`Board::from_config`](crate::Board::from_config).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    /// Side length of the square grid.
    pub size: i32,
    /// Number of tiles spawned on the empty grid at construction.
    pub seed_tiles: usize,
    /// Fixed RNG seed for reproducible games; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl BoardConfig {
    /// Reject sizes that cannot form a grid.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.size < 1 {
            return Err(BoardError::InvalidConfig(format!(
                "board size must be positive, got {}",
                self.size
            )));
        }
        Ok(())
    }

    /// Set the grid size (builder).
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    /// Set a deterministic RNG seed (builder).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: crate::board::DEFAULT_SIZE,
            seed_tiles: 2,
            rng_seed: None,
        }
    }
}
