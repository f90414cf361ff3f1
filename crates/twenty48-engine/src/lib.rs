//! **twenty48-engine**: the board engine of the 2048 sliding-tile puzzle.
//!
//! A [`Board`] owns an N×N grid of tiles, applies directional moves
//! (merge, slide, spawn) and reports what happened through per-event
//! observer lists. Rendering and input belong to the caller, which only
//! needs to subscribe to [`Observers`] and call the move operations.

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod geom;
pub mod grid;

pub use board::{Board, DEFAULT_SIZE, GOAL, GameStatus, MoveOutcome, SPAWN_VALUE};
pub use config::BoardConfig;
pub use error::BoardError;
pub use events::{ListenerId, Listeners, Observers};
pub use geom::{Direction, Point, Range};
pub use grid::{Grid, Line, Tile};
