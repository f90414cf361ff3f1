//! The [`Board`] engine: grid state, moves, merges, spawning and the
//! win/game-over notifications.
//!
//! A move processes every row (horizontal moves) or column (vertical moves)
//! independently in two passes over a wall-first [`Line`]:
//!
//! 1. **merge**: equal neighbours (ignoring gaps) combine into the cell
//!    nearer the wall; a merged tile does not merge again in the same move;
//! 2. **slide**: every tile slides toward the wall through empty cells.
//!
//! Afterwards new tiles are spawned into random empty cells.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::events::Observers;
use crate::geom::{Direction, Point};
use crate::grid::{Grid, Line, Tile, is_valid_tile};

/// Side length used by [`Board::default_size`].
pub const DEFAULT_SIZE: i32 = 4;
/// Value of every freshly spawned tile.
pub const SPAWN_VALUE: Tile = 2;
/// Producing this value for the first time fires the win notification.
pub const GOAL: Tile = 2048;

/// What a single move did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    /// Some tile slid to a new position.
    pub moved: bool,
    /// Some pair of tiles merged.
    pub merged: bool,
    /// Number of tiles spawned after the move.
    pub spawned: usize,
}

impl MoveOutcome {
    /// Whether the move changed any tile position or value.
    #[inline]
    pub fn changed(&self) -> bool {
        self.moved || self.merged
    }
}

/// Where the game stands, as observed through the notifications fired so
/// far. The engine accepts moves in every state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    Playing,
    /// The goal tile has been produced; play may continue.
    Won,
    /// A spawn found the grid full with no legal move.
    Lost,
}

/// The 2048 board engine.
///
/// Generic over the random source so games can be replayed from a seed.
pub struct Board<R = StdRng> {
    grid: Grid,
    max_value: Tile,
    won: bool,
    lost: bool,
    rng: R,
    observers: Observers,
}

impl Board<StdRng> {
    /// An empty `size`×`size` board with two seed tiles.
    ///
    /// Fails with [`BoardError::InvalidConfig`] if `size < 1`.
    pub fn new(size: i32) -> Result<Self, BoardError> {
        Self::with_rng(size, StdRng::from_os_rng())
    }

    /// The classic 4×4 board with two seed tiles.
    pub fn default_size() -> Self {
        let config = BoardConfig::default();
        Self::seeded(Grid::new(DEFAULT_SIZE), config.seed_tiles, StdRng::from_os_rng())
    }

    /// A board over a caller-supplied grid, addressed as `cells[y][x]`.
    ///
    /// No tiles are spawned. Fails with [`BoardError::InvalidConfig`] if the
    /// grid is empty, not square, or holds a value that is neither 0 nor a
    /// power of two ≥ 2.
    pub fn from_grid(cells: Vec<Vec<Tile>>) -> Result<Self, BoardError> {
        Self::from_grid_with_rng(cells, StdRng::from_os_rng())
    }

    /// Build a board from a [`BoardConfig`], seeding the RNG from
    /// `rng_seed` when present.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self::seeded(Grid::new(config.size), config.seed_tiles, rng))
    }
}

impl<R: Rng> Board<R> {
    /// Like [`Board::new`] with an explicit random source.
    pub fn with_rng(size: i32, rng: R) -> Result<Self, BoardError> {
        let config = BoardConfig {
            size,
            ..BoardConfig::default()
        };
        config.validate()?;
        Ok(Self::seeded(Grid::new(size), config.seed_tiles, rng))
    }

    /// Like [`Board::from_grid`] with an explicit random source.
    pub fn from_grid_with_rng(cells: Vec<Vec<Tile>>, rng: R) -> Result<Self, BoardError> {
        let grid = Grid::from_rows(cells)?;
        if let Some((p, v)) = grid.iter().find(|&(_, v)| !is_valid_tile(v)) {
            return Err(BoardError::InvalidConfig(format!(
                "tile {v} at {p} is not 0 or a power of two >= 2"
            )));
        }
        Ok(Self::from_parts(grid, rng))
    }

    fn from_parts(grid: Grid, rng: R) -> Self {
        Self {
            max_value: grid.max_tile(),
            grid,
            won: false,
            lost: false,
            rng,
            observers: Observers::new(),
        }
    }

    fn seeded(grid: Grid, seed_tiles: usize, rng: R) -> Self {
        let mut board = Self::from_parts(grid, rng);
        board.spawn(seed_tiles);
        board
    }
}

impl<R> Board<R> {
    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Side length of the grid.
    #[inline]
    pub fn size(&self) -> i32 {
        self.grid.size()
    }

    /// Tile at `(x, y)`; fails with [`BoardError::OutOfBounds`].
    pub fn value(&self, x: i32, y: i32) -> Result<Tile, BoardError> {
        self.grid.get(Point::new(x, y))
    }

    /// Tile at `p`; fails with [`BoardError::OutOfBounds`].
    pub fn value_at(&self, p: Point) -> Result<Tile, BoardError> {
        self.grid.get(p)
    }

    /// The win threshold.
    #[inline]
    pub fn goal(&self) -> Tile {
        GOAL
    }

    /// Largest tile on the board. Moves and spawns never lower it.
    #[inline]
    pub fn max_value(&self) -> Tile {
        self.max_value
    }

    /// Read-only view of the tiles.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        if self.lost {
            GameStatus::Lost
        } else if self.won {
            GameStatus::Won
        } else {
            GameStatus::Playing
        }
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Register or remove listeners.
    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    /// Copy the tile values into `other`, which must have the same size.
    ///
    /// Only values are copied; `other` keeps its listeners, RNG and status,
    /// and its maximum is recomputed from the copied tiles.
    pub fn copy_into<S>(&self, other: &mut Board<S>) -> Result<(), BoardError> {
        other.grid.copy_from(&self.grid)?;
        other.max_value = other.grid.max_tile();
        Ok(())
    }

    /// Copy the tile values into a bare grid of the same size.
    pub fn copy_to_grid(&self, dst: &mut Grid) -> Result<(), BoardError> {
        dst.copy_from(&self.grid)
    }

    /// Unformatted dump: values separated by one space, `0` for empty.
    pub fn to_plain_string(&self) -> String {
        self.grid.to_string()
    }

    /// Whether any move could change the board: an empty cell exists, or two
    /// orthogonal neighbours hold the same value.
    pub fn has_more_moves(&self) -> bool {
        self.grid.iter().any(|(p, v)| {
            v == 0
                || p
                    .neighbors_4()
                    .into_iter()
                    .any(|n| self.grid.at(n) == Some(v))
        })
    }
}

impl<R: Rng> Board<R> {
    // -------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------

    /// Move in `dir` and spawn one tile if anything changed.
    pub fn move_tiles(&mut self, dir: Direction) -> MoveOutcome {
        self.move_tiles_with(dir, 1)
    }

    /// Move in `dir`, then spawn.
    ///
    /// With `cells_to_generate > 1` that many tiles are always spawned (as
    /// many as fit). With `1` a tile is spawned only if the move changed the
    /// board. With `0` nothing is spawned.
    pub fn move_tiles_with(&mut self, dir: Direction, cells_to_generate: usize) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        for index in 0..self.size() {
            let line = self.grid.line(dir, index);
            outcome.merged |= self.merge_line(&line);
            outcome.moved |= self.slide_line(&line);
        }
        if cells_to_generate > 1 || (cells_to_generate == 1 && outcome.changed()) {
            outcome.spawned = self.spawn(cells_to_generate);
        }
        log::debug!(
            "move {dir}: moved={} merged={} spawned={} max={}",
            outcome.moved,
            outcome.merged,
            outcome.spawned,
            self.max_value
        );
        outcome
    }

    pub fn move_up(&mut self) -> MoveOutcome {
        self.move_tiles(Direction::Up)
    }

    pub fn move_down(&mut self) -> MoveOutcome {
        self.move_tiles(Direction::Down)
    }

    pub fn move_left(&mut self) -> MoveOutcome {
        self.move_tiles(Direction::Left)
    }

    pub fn move_right(&mut self) -> MoveOutcome {
        self.move_tiles(Direction::Right)
    }

    /// Merge pass over one line. Returns whether anything merged.
    fn merge_line(&mut self, line: &Line) -> bool {
        let mut merged = false;
        let mut target: Option<Point> = None;
        for p in line.points() {
            let v = self.grid.value(p);
            if v == 0 {
                continue;
            }
            match (target, v.checked_mul(2)) {
                (Some(t), Some(value)) if self.grid.value(t) == v => {
                    self.grid.put(t, value);
                    self.grid.put(p, 0);
                    if value > self.max_value {
                        self.max_value = value;
                        // Exact match: a board built past the goal never wins.
                        if self.max_value == GOAL {
                            self.won = true;
                            log::info!("goal {GOAL} reached at {t}");
                            self.observers.emit_win();
                        }
                    }
                    merged = true;
                    self.observers.emit_tile_merged(p, t, value);
                    target = None;
                }
                _ => target = Some(p),
            }
        }
        merged
    }

    /// Slide pass over one line. Returns whether any tile moved.
    fn slide_line(&mut self, line: &Line) -> bool {
        let mut moved = false;
        for i in 0..line.len() {
            let from = line.point(i);
            let v = self.grid.value(from);
            if v == 0 {
                continue;
            }
            let mut j = i;
            while j > 0 && self.grid.value(line.point(j - 1)) == 0 {
                j -= 1;
            }
            if j != i {
                let to = line.point(j);
                self.grid.put(to, v);
                self.grid.put(from, 0);
                moved = true;
                self.observers.emit_tile_moved(from, to);
            }
        }
        moved
    }

    // -------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------

    /// Place up to `count` new tiles in distinct, uniformly chosen empty
    /// cells. Fires game-over when the grid ends up full with no legal move.
    fn spawn(&mut self, count: usize) -> usize {
        let mut empty = self.grid.empty_points();
        let mut spawned = 0;
        while spawned < count && !empty.is_empty() {
            let pick = self.rng.random_range(0..empty.len());
            let p = empty.swap_remove(pick);
            self.grid.put(p, SPAWN_VALUE);
            if SPAWN_VALUE > self.max_value {
                self.max_value = SPAWN_VALUE;
            }
            log::trace!("spawned {SPAWN_VALUE} at {p}");
            self.observers.emit_tile_created(p, SPAWN_VALUE);
            spawned += 1;
        }
        if empty.is_empty() && !self.has_more_moves() {
            self.lost = true;
            log::info!("no legal move left, max tile {}", self.max_value);
            self.observers.emit_game_over();
        }
        spawned
    }
}

impl<R> fmt::Display for Board<R> {
    /// Right-aligned columns as wide as the largest tile, `-` for empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_value.to_string().len();
        for row in self.grid.rows() {
            for &v in row {
                if v == 0 {
                    write!(f, "{:>width$} ", "-")?;
                } else {
                    write!(f, "{v:>width$} ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<R> fmt::Debug for Board<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("grid", &self.grid)
            .field("max_value", &self.max_value)
            .field("won", &self.won)
            .field("lost", &self.lost)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
