//! Layered overlay space
//!
//! An [`Overlay`] wraps a backing space plus an ordered stack of write layers.
//!
//! - Reads scan the layers most-recent-first and fall through to the backing space.
//! - Writes go to the most recent layer that already holds the coordinate, or
//!   straight to the backing space if none does. A fresh overlay is therefore
//!   write-transparent until a coordinate is seeded into a layer.
//!
//! Adding layers yields a new overlay sharing the same backing space and the same
//! prior layers, so overlays can be aliased across instruction pointers. Movement,
//! validity and defaults are delegated to the backing space.

use super::coord::Coord;
use super::direction::Direction;
use super::{FungeSpace, Space, SpaceShape};
use crate::engine::errors::FungeResult;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One write layer
pub type Layer<C> = FxHashMap<Coord, C>;

/// Shared handle to a backing space
pub type SharedSpace<C> = Arc<Mutex<FungeSpace<C>>>;

/// Scoped view over a backing space
#[derive(Debug, Clone)]
pub struct Overlay<C> {
    backing: SharedSpace<C>,
    layers: Vec<Arc<Mutex<Layer<C>>>>,
}

// A panic inside one operation must not wedge every later read of the space.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C: Clone> Overlay<C> {
    /// Wrap `backing` with no layers
    pub fn new(backing: FungeSpace<C>) -> Self {
        Self::over(Arc::new(Mutex::new(backing)))
    }

    /// Wrap an already shared backing space with no layers
    pub fn over(backing: SharedSpace<C>) -> Self {
        Overlay {
            backing,
            layers: Vec::new(),
        }
    }

    pub fn backing(&self) -> SharedSpace<C> {
        Arc::clone(&self.backing)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// New overlay with `layers` stacked on top of this one's
    pub fn with_layers(&self, layers: impl IntoIterator<Item = Layer<C>>) -> Self {
        let mut next = self.clone();
        next.layers
            .extend(layers.into_iter().map(|layer| Arc::new(Mutex::new(layer))));
        next
    }

    /// New overlay with one single-cell layer on top, seeding `coord`
    pub fn with_cell(&self, coord: Coord, cell: C) -> Self {
        let mut layer = Layer::default();
        layer.insert(coord, cell);
        self.with_layers([layer])
    }

    /// Whether any layer holds `coord`
    pub fn is_shadowed(&self, coord: &Coord) -> bool {
        self.layers
            .iter()
            .any(|layer| lock(layer).contains_key(coord))
    }
}

impl<C: Clone> Space<C> for Overlay<C> {
    fn dims(&self) -> usize {
        lock(&self.backing).dims()
    }

    fn read(&self, coord: &Coord) -> FungeResult<C> {
        for layer in self.layers.iter().rev() {
            if let Some(cell) = lock(layer).get(coord) {
                return Ok(cell.clone());
            }
        }
        lock(&self.backing).read(coord)
    }

    fn write(&mut self, coord: &Coord, cell: C) -> FungeResult<()> {
        for layer in self.layers.iter().rev() {
            let mut layer = lock(layer);
            if let Some(slot) = layer.get_mut(coord) {
                *slot = cell;
                return Ok(());
            }
        }
        lock(&self.backing).write(coord, cell)
    }

    fn is_valid_direction(&self, direction: &Direction, from: &Coord) -> bool {
        lock(&self.backing).is_valid_direction(direction, from)
    }

    fn is_valid_coordinate(&self, coord: &Coord) -> bool {
        lock(&self.backing).is_valid_coordinate(coord)
    }

    fn move_coord(&self, coord: &Coord, direction: &Direction) -> FungeResult<Coord> {
        lock(&self.backing).move_coord(coord, direction)
    }

    fn default_origin(&self) -> Coord {
        lock(&self.backing).default_origin()
    }

    fn default_direction(&self) -> Direction {
        lock(&self.backing).default_direction()
    }

    fn shape(&self) -> SpaceShape {
        SpaceShape::Overlay {
            layers: self.layers.len(),
            backing: Box::new(lock(&self.backing).shape()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::toroidal::DenseTorus;

    fn torus() -> FungeSpace<u8> {
        FungeSpace::Toroidal(DenseTorus::new(&[4, 4], b'.').unwrap())
    }

    #[test]
    fn test_fresh_overlay_is_write_transparent() {
        let mut overlay = Overlay::new(torus());
        overlay.write(&Coord::from([1, 1]), b'x').unwrap();
        assert_eq!(lock(&overlay.backing()).read(&Coord::from([1, 1])).unwrap(), b'x');
    }

    #[test]
    fn test_seeded_layer_captures_writes() {
        let base = Overlay::new(torus());
        let mut scoped = base.with_cell(Coord::from([2, 2]), b'a');
        scoped.write(&Coord::from([2, 2]), b'b').unwrap();

        assert_eq!(scoped.read(&Coord::from([2, 2])).unwrap(), b'b');
        // the backing space never saw the write
        assert_eq!(base.read(&Coord::from([2, 2])).unwrap(), b'.');
        assert!(scoped.is_shadowed(&Coord::from([2, 2])));
        assert!(!base.is_shadowed(&Coord::from([2, 2])));
    }

    #[test]
    fn test_reads_most_recent_layer_first() {
        let layer = |cells: &[([i64; 2], u8)]| -> Layer<u8> {
            cells.iter().map(|&(c, v)| (Coord::from(c), v)).collect()
        };
        let overlay = Overlay::new(torus()).with_layers([
            layer(&[([0, 0], b'a'), ([1, 0], b'a'), ([2, 0], b'a')]),
            layer(&[([0, 0], b'b'), ([1, 0], b'b')]),
            layer(&[([0, 0], b'c')]),
        ]);

        assert_eq!(overlay.layer_count(), 3);
        assert_eq!(overlay.read(&Coord::from([0, 0])).unwrap(), b'c');
        assert_eq!(overlay.read(&Coord::from([1, 0])).unwrap(), b'b');
        assert_eq!(overlay.read(&Coord::from([2, 0])).unwrap(), b'a');
        assert_eq!(overlay.read(&Coord::from([3, 0])).unwrap(), b'.');
    }

    #[test]
    fn test_aliases_share_layers() {
        let seeded = Overlay::new(torus()).with_cell(Coord::from([0, 0]), b'1');
        let mut alias = seeded.clone();
        let stacked = seeded.with_layers([Layer::default()]);

        alias.write(&Coord::from([0, 0]), b'2').unwrap();
        assert_eq!(seeded.read(&Coord::from([0, 0])).unwrap(), b'2');
        assert_eq!(stacked.read(&Coord::from([0, 0])).unwrap(), b'2');
        assert_eq!(stacked.layer_count(), 2);
    }

    #[test]
    fn test_delegates_movement_and_shape() {
        let overlay = Overlay::new(torus()).with_cell(Coord::from([3, 0]), b'z');
        let next = overlay
            .move_coord(&Coord::from([3, 0]), &Direction::EAST)
            .unwrap();
        assert_eq!(next, Coord::from([0, 0]));
        assert_eq!(
            overlay.shape(),
            SpaceShape::Overlay {
                layers: 1,
                backing: Box::new(SpaceShape::Toroidal { sizes: vec![4, 4] }),
            }
        );
    }
}
