//! Observer lists for board notifications.
//!
//! Each notification type has its own ordered [`Listeners`] list. Delivery is
//! synchronous and follows registration order; removal is by the
//! [`ListenerId`] handed out at registration.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geom::Point;
use crate::grid::Tile;

/// Handle identifying one registered listener.
///
/// Ids are unique for the lifetime of the process, so a handle from one list
/// never removes a listener from another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An ordered list of callbacks of type `F`.
pub struct Listeners<F: ?Sized> {
    entries: Vec<(ListenerId, Box<F>)>,
}

impl<F: ?Sized> Listeners<F> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a listener; it will be called after all earlier ones.
    pub fn add(&mut self, listener: Box<F>) -> ListenerId {
        let id = ListenerId::next();
        self.entries.push((id, listener));
        id
    }

    /// Remove the listener registered under `id`. Returns whether it was
    /// present.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    /// Whether `id` is registered in this list.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(eid, _)| *eid == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke `call` on each listener in registration order.
    pub fn for_each(&mut self, mut call: impl FnMut(&mut F)) {
        for (_, listener) in &mut self.entries {
            call(&mut **listener);
        }
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

/// `(pos, value)` of a freshly spawned tile.
pub type TileCreatedFn = dyn FnMut(Point, Tile);
/// `(from, to)` of a tile that slid without changing value.
pub type TileMovedFn = dyn FnMut(Point, Point);
/// `(from, to, merged_value)`: the tile at `from` was absorbed into `to`.
pub type TileMergedFromFn = dyn FnMut(Point, Point, Tile);
/// `(to, from)`: companion of [`TileMergedFromFn`] addressed by the
/// surviving cell.
pub type TileMergedToFn = dyn FnMut(Point, Point);
/// No legal move remains.
pub type GameOverFn = dyn FnMut();
/// The goal tile was produced for the first time.
pub type WinFn = dyn FnMut();

/// One listener list per notification type.
#[derive(Debug, Default)]
pub struct Observers {
    pub tile_created: Listeners<TileCreatedFn>,
    pub tile_moved: Listeners<TileMovedFn>,
    pub tile_merged_from: Listeners<TileMergedFromFn>,
    pub tile_merged_to: Listeners<TileMergedToFn>,
    pub game_over: Listeners<GameOverFn>,
    pub win: Listeners<WinFn>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tile_created(&mut self, f: impl FnMut(Point, Tile) + 'static) -> ListenerId {
        self.tile_created.add(Box::new(f))
    }

    pub fn on_tile_moved(&mut self, f: impl FnMut(Point, Point) + 'static) -> ListenerId {
        self.tile_moved.add(Box::new(f))
    }

    pub fn on_tile_merged_from(
        &mut self,
        f: impl FnMut(Point, Point, Tile) + 'static,
    ) -> ListenerId {
        self.tile_merged_from.add(Box::new(f))
    }

    pub fn on_tile_merged_to(&mut self, f: impl FnMut(Point, Point) + 'static) -> ListenerId {
        self.tile_merged_to.add(Box::new(f))
    }

    pub fn on_game_over(&mut self, f: impl FnMut() + 'static) -> ListenerId {
        self.game_over.add(Box::new(f))
    }

    pub fn on_win(&mut self, f: impl FnMut() + 'static) -> ListenerId {
        self.win.add(Box::new(f))
    }

    /// Remove `id` from whichever list holds it.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.tile_created.remove(id)
            || self.tile_moved.remove(id)
            || self.tile_merged_from.remove(id)
            || self.tile_merged_to.remove(id)
            || self.game_over.remove(id)
            || self.win.remove(id)
    }

    pub(crate) fn emit_tile_created(&mut self, pos: Point, value: Tile) {
        self.tile_created.for_each(|f| f(pos, value));
    }

    pub(crate) fn emit_tile_moved(&mut self, from: Point, to: Point) {
        self.tile_moved.for_each(|f| f(from, to));
    }

    pub(crate) fn emit_tile_merged(&mut self, from: Point, to: Point, value: Tile) {
        self.tile_merged_from.for_each(|f| f(from, to, value));
        self.tile_merged_to.for_each(|f| f(to, from));
    }

    pub(crate) fn emit_game_over(&mut self) {
        self.game_over.for_each(|f| f());
    }

    pub(crate) fn emit_win(&mut self) {
        self.win.for_each(|f| f());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut list: Listeners<dyn FnMut(u32)> = Listeners::new();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            list.add(Box::new(move |v: u32| log.borrow_mut().push(format!("{tag}{v}"))));
        }
        list.for_each(|f| f(1));
        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn remove_by_identity() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut obs = Observers::new();
        let h = Rc::clone(&hits);
        let first = obs.on_win(move || h.borrow_mut().push(1));
        let h = Rc::clone(&hits);
        let second = obs.on_win(move || h.borrow_mut().push(2));
        assert_ne!(first, second);

        assert!(obs.win.remove(first));
        assert!(!obs.win.remove(first));
        assert!(obs.win.contains(second));
        obs.emit_win();
        assert_eq!(*hits.borrow(), vec![2]);
    }

    #[test]
    fn ids_do_not_collide_across_lists() {
        let mut obs = Observers::new();
        let created = obs.on_tile_created(|_, _| {});
        let over = obs.on_game_over(|| {});
        assert!(!obs.game_over.remove(created));
        assert_eq!(obs.tile_created.len(), 1);
        assert!(obs.remove(over));
        assert!(obs.game_over.is_empty());
    }

    #[test]
    fn merge_notifies_both_lists() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut obs = Observers::new();
        let s = Rc::clone(&seen);
        obs.on_tile_merged_from(move |from, to, v| s.borrow_mut().push((from, to, v)));
        let s = Rc::clone(&seen);
        obs.on_tile_merged_to(move |to, from| s.borrow_mut().push((to, from, 0)));

        obs.emit_tile_merged(Point::new(1, 0), Point::new(0, 0), 4);
        assert_eq!(
            *seen.borrow(),
            vec![
                (Point::new(1, 0), Point::new(0, 0), 4),
                (Point::new(0, 0), Point::new(1, 0), 0),
            ]
        );
    }
}
