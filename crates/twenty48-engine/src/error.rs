//! Errors raised when the board is misused.

use std::fmt;

use crate::geom::Point;

/// Errors that can occur when building or querying a board.
///
/// All variants describe caller mistakes; the engine never retries or
/// recovers from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The requested size or initial grid is unusable.
    InvalidConfig(String),
    /// A coordinate lies outside `[0, size)` on some axis.
    OutOfBounds { pos: Point, size: i32 },
    /// Two grids of different sizes were combined.
    ShapeMismatch { expected: i32, found: i32 },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid board configuration: {msg}"),
            Self::OutOfBounds { pos, size } => {
                write!(f, "position {pos} is outside the {size}x{size} board")
            }
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "grid shape mismatch: expected {expected}x{expected}, found {found}x{found}"
            ),
        }
    }
}

impl std::error::Error for BoardError {}
