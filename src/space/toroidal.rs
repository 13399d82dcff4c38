//! Dense toroidal buffer
//!
//! Every axis is a fixed-size ring. Cells live in one contiguous array addressed
//! row-major with the last axis varying fastest, so the cell count is the product of
//! the axis sizes.
//!
//! # Wrapping
//!
//! `move_coord` steps by a unit along one axis and reduces each component with a
//! true (non-negative) modulo, so stepping west from column 0 lands on column
//! `size - 1`. Only [`Direction::Axis`] steps are accepted.

use super::coord::Coord;
use super::direction::Direction;
use super::{Space, SpaceShape};
use crate::engine::errors::{FungeError, FungeResult};
use smallvec::SmallVec;

/// Fixed-size space whose axes wrap around
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTorus<C> {
    sizes: SmallVec<[usize; 4]>,
    cells: Vec<C>,
}

impl<C: Clone> DenseTorus<C> {
    /// Create a torus with the given axis sizes, every cell set to `fill`
    pub fn new(sizes: &[usize], fill: C) -> FungeResult<Self> {
        let count = Self::cell_count_for(sizes)?;
        Ok(DenseTorus {
            sizes: SmallVec::from_slice(sizes),
            cells: vec![fill; count],
        })
    }

    /// Create a torus from row-major cells (last axis fastest)
    pub fn from_cells(sizes: &[usize], cells: Vec<C>) -> FungeResult<Self> {
        let count = Self::cell_count_for(sizes)?;
        if cells.len() != count {
            return Err(FungeError::invalid_shape(format!(
                "{} cells given for a space of {} cells",
                cells.len(),
                count
            )));
        }
        Ok(DenseTorus {
            sizes: SmallVec::from_slice(sizes),
            cells,
        })
    }

    fn cell_count_for(sizes: &[usize]) -> FungeResult<usize> {
        if sizes.is_empty() {
            return Err(FungeError::invalid_shape(
                "a toroidal space needs at least one axis",
            ));
        }
        sizes.iter().try_fold(1usize, |count, &size| {
            if size == 0 {
                return Err(FungeError::invalid_shape("axis sizes must be positive"));
            }
            if i64::try_from(size).is_err() {
                return Err(FungeError::invalid_shape("axis size does not fit a coordinate"));
            }
            count
                .checked_mul(size)
                .ok_or_else(|| FungeError::invalid_shape("cell count overflows"))
        })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Backing storage in row-major order
    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    /// Position of `coord` in the backing storage
    pub fn index_of(&self, coord: &Coord) -> FungeResult<usize> {
        if coord.dims() != self.sizes.len() {
            return Err(FungeError::DimensionMismatch {
                expected: self.sizes.len(),
                got: coord.dims(),
            });
        }
        let mut index = 0usize;
        for (axis, (&c, &size)) in coord.components().iter().zip(&self.sizes).enumerate() {
            if c < 0 || c as u64 >= size as u64 {
                return Err(FungeError::IndexOutOfRange {
                    axis,
                    index: c,
                    size,
                });
            }
            index = index * size + c as usize;
        }
        Ok(index)
    }
}

impl<C: Clone> Space<C> for DenseTorus<C> {
    fn dims(&self) -> usize {
        self.sizes.len()
    }

    fn read(&self, coord: &Coord) -> FungeResult<C> {
        let index = self.index_of(coord)?;
        Ok(self.cells[index].clone())
    }

    fn write(&mut self, coord: &Coord, cell: C) -> FungeResult<()> {
        let index = self.index_of(coord)?;
        self.cells[index] = cell;
        Ok(())
    }

    fn is_valid_direction(&self, direction: &Direction, _from: &Coord) -> bool {
        direction.as_axis().is_some() && direction.dims() == self.sizes.len()
    }

    fn is_valid_coordinate(&self, coord: &Coord) -> bool {
        self.index_of(coord).is_ok()
    }

    fn move_coord(&self, coord: &Coord, direction: &Direction) -> FungeResult<Coord> {
        if direction.as_axis().is_none() {
            return Err(FungeError::invalid_direction(
                "a toroidal space only moves along axis-aligned unit steps",
            ));
        }
        let mut next = direction.move_coord(coord)?;
        if next.dims() != self.sizes.len() {
            return Err(FungeError::DimensionMismatch {
                expected: self.sizes.len(),
                got: next.dims(),
            });
        }
        for (c, &size) in next.components_mut().iter_mut().zip(&self.sizes) {
            *c = c.rem_euclid(size as i64);
        }
        Ok(next)
    }

    fn default_origin(&self) -> Coord {
        Coord::origin(self.sizes.len())
    }

    fn default_direction(&self) -> Direction {
        Direction::Axis {
            dims: self.sizes.len(),
            axis: 0,
            positive: true,
        }
    }

    fn shape(&self) -> SpaceShape {
        SpaceShape::Toroidal {
            sizes: self.sizes.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_index() {
        let torus = DenseTorus::new(&[3, 4], 0u8).unwrap();
        assert_eq!(torus.cells().len(), 12);
        assert_eq!(torus.index_of(&Coord::from([0, 0])).unwrap(), 0);
        assert_eq!(torus.index_of(&Coord::from([0, 3])).unwrap(), 3);
        assert_eq!(torus.index_of(&Coord::from([1, 0])).unwrap(), 4);
        assert_eq!(torus.index_of(&Coord::from([2, 3])).unwrap(), 11);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut torus = DenseTorus::new(&[3, 4], 0u8).unwrap();
        let err = torus.read(&Coord::from([3, 0])).unwrap_err();
        assert!(matches!(
            err,
            FungeError::IndexOutOfRange {
                axis: 0,
                index: 3,
                size: 3
            }
        ));
        assert!(torus.write(&Coord::from([0, -1]), 1).is_err());
        assert!(!torus.is_valid_coordinate(&Coord::from([0, 4])));
        assert!(torus.is_valid_coordinate(&Coord::from([2, 3])));
    }

    #[test]
    fn test_wraps_both_ways() {
        let torus = DenseTorus::new(&[80, 25], b' ').unwrap();
        let west = torus
            .move_coord(&Coord::from([0, 5]), &Direction::WEST)
            .unwrap();
        assert_eq!(west, Coord::from([79, 5]));
        let south = torus
            .move_coord(&Coord::from([7, 24]), &Direction::SOUTH)
            .unwrap();
        assert_eq!(south, Coord::from([7, 0]));
    }

    #[test]
    fn test_rejects_delta_directions() {
        let torus = DenseTorus::new(&[4, 4], 0u8).unwrap();
        let delta = Direction::delta(&[1, 0]).unwrap();
        assert!(!torus.is_valid_direction(&delta, &Coord::from([0, 0])));
        let err = torus.move_coord(&Coord::from([0, 0]), &delta).unwrap_err();
        assert!(matches!(err, FungeError::InvalidDirection { .. }));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(DenseTorus::new(&[], 0u8).is_err());
        assert!(DenseTorus::new(&[3, 0], 0u8).is_err());
        assert!(DenseTorus::from_cells(&[2, 2], vec![0u8; 3]).is_err());
    }

    #[test]
    fn test_defaults() {
        let torus = DenseTorus::new(&[5, 5, 5], 0u8).unwrap();
        assert_eq!(torus.default_origin(), Coord::from([0, 0, 0]));
        assert_eq!(torus.default_direction(), Direction::axis(3, 0, true).unwrap());
    }
}
