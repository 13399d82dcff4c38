//! Sparse bounded-precision space
//!
//! The logical domain spans the full range of the chosen integer width on every
//! axis, but only written cells are stored. Unset coordinates read back as the
//! configured default cell without faulting.
//!
//! Movement is plain vector addition. Components wrap at the precision's
//! boundary the way fixed-width two's-complement arithmetic does.

use super::coord::Coord;
use super::direction::Direction;
use super::{Space, SpaceShape};
use crate::engine::errors::{FungeError, FungeResult};
use rustc_hash::FxHashMap;
use std::fmt;

/// Integer width of each coordinate component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    I8,
    I16,
    I32,
    I64,
}

impl Precision {
    pub fn bits(self) -> u32 {
        match self {
            Precision::I8 => 8,
            Precision::I16 => 16,
            Precision::I32 => 32,
            Precision::I64 => 64,
        }
    }

    pub fn min(self) -> i64 {
        match self {
            Precision::I8 => i8::MIN as i64,
            Precision::I16 => i16::MIN as i64,
            Precision::I32 => i32::MIN as i64,
            Precision::I64 => i64::MIN,
        }
    }

    pub fn max(self) -> i64 {
        match self {
            Precision::I8 => i8::MAX as i64,
            Precision::I16 => i16::MAX as i64,
            Precision::I32 => i32::MAX as i64,
            Precision::I64 => i64::MAX,
        }
    }

    pub fn contains(self, value: i64) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// Truncate to this width, two's-complement style
    pub fn wrap(self, value: i64) -> i64 {
        match self {
            Precision::I8 => value as i8 as i64,
            Precision::I16 => value as i16 as i64,
            Precision::I32 => value as i32 as i64,
            Precision::I64 => value,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}

/// Unbounded map-backed space
#[derive(Debug, Clone, PartialEq)]
pub struct SparseSpace<C> {
    dims: usize,
    precision: Precision,
    default_cell: C,
    cells: FxHashMap<Coord, C>,
}

impl<C: Clone> SparseSpace<C> {
    pub fn new(dims: usize, precision: Precision, default_cell: C) -> FungeResult<Self> {
        if dims == 0 {
            return Err(FungeError::invalid_shape(
                "a sparse space needs at least one axis",
            ));
        }
        Ok(SparseSpace {
            dims,
            precision,
            default_cell,
            cells: FxHashMap::default(),
        })
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn default_cell(&self) -> &C {
        &self.default_cell
    }

    /// Number of explicitly written cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Explicitly written cells, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &C)> {
        self.cells.iter()
    }

    fn check(&self, coord: &Coord) -> FungeResult<()> {
        if coord.dims() != self.dims {
            return Err(FungeError::DimensionMismatch {
                expected: self.dims,
                got: coord.dims(),
            });
        }
        if !coord.components().iter().all(|&c| self.precision.contains(c)) {
            return Err(FungeError::CoordinateOutOfRange {
                coord: coord.clone(),
            });
        }
        Ok(())
    }
}

impl<C: Clone> Space<C> for SparseSpace<C> {
    fn dims(&self) -> usize {
        self.dims
    }

    fn read(&self, coord: &Coord) -> FungeResult<C> {
        self.check(coord)?;
        Ok(self
            .cells
            .get(coord)
            .cloned()
            .unwrap_or_else(|| self.default_cell.clone()))
    }

    fn write(&mut self, coord: &Coord, cell: C) -> FungeResult<()> {
        self.check(coord)?;
        self.cells.insert(coord.clone(), cell);
        Ok(())
    }

    fn is_valid_direction(&self, _direction: &Direction, _from: &Coord) -> bool {
        true
    }

    fn is_valid_coordinate(&self, coord: &Coord) -> bool {
        self.check(coord).is_ok()
    }

    fn move_coord(&self, coord: &Coord, direction: &Direction) -> FungeResult<Coord> {
        let mut next = direction.move_coord(coord)?;
        for c in next.components_mut() {
            *c = self.precision.wrap(*c);
        }
        Ok(next)
    }

    fn default_origin(&self) -> Coord {
        Coord::origin(self.dims)
    }

    fn default_direction(&self) -> Direction {
        let mut delta = vec![0; self.dims];
        delta[0] = 1;
        Direction::Delta(delta.into())
    }

    fn shape(&self) -> SpaceShape {
        SpaceShape::Sparse {
            dims: self.dims,
            precision: self.precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_reads_default() {
        let space = SparseSpace::new(2, Precision::I64, b' ').unwrap();
        assert_eq!(space.read(&Coord::from([1_000_000, -42])).unwrap(), b' ');
        assert!(space.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let mut space = SparseSpace::new(2, Precision::I32, 0i32).unwrap();
        space.write(&Coord::from([-5, 9]), 17).unwrap();
        space.write(&Coord::from([9, -5]), 23).unwrap();
        assert_eq!(space.read(&Coord::from([-5, 9])).unwrap(), 17);
        assert_eq!(space.read(&Coord::from([9, -5])).unwrap(), 23);
        assert_eq!(space.len(), 2);
    }

    #[test]
    fn test_precision_bounds() {
        let space = SparseSpace::new(1, Precision::I8, 0u8).unwrap();
        assert!(space.is_valid_coordinate(&Coord::from([127])));
        assert!(!space.is_valid_coordinate(&Coord::from([128])));
        assert!(matches!(
            space.read(&Coord::from([-129])),
            Err(FungeError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            space.read(&Coord::from([1, 1])),
            Err(FungeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_move_wraps_at_precision() {
        let space = SparseSpace::new(2, Precision::I8, 0u8).unwrap();
        let east = space.default_direction();
        let next = space.move_coord(&Coord::from([127, 3]), &east).unwrap();
        assert_eq!(next, Coord::from([-128, 3]));

        let wide = SparseSpace::new(2, Precision::I64, 0u8).unwrap();
        let jump = Direction::delta(&[300, -7]).unwrap();
        assert_eq!(
            wide.move_coord(&Coord::from([1, 1]), &jump).unwrap(),
            Coord::from([301, -6])
        );
    }

    #[test]
    fn test_all_directions_valid() {
        let space = SparseSpace::new(2, Precision::I16, 0u8).unwrap();
        let origin = space.default_origin();
        assert!(space.is_valid_direction(&Direction::NORTH, &origin));
        assert!(space.is_valid_direction(&Direction::delta(&[3, 4]).unwrap(), &origin));
    }
}
