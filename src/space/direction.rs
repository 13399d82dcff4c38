//! Movement primitives
//!
//! A [`Direction`] is an immutable displacement. It comes in two shapes:
//!
//! - [`Direction::Axis`]: a unit step along one axis, positive or negative. Dense
//!   toroidal spaces only accept this shape.
//! - [`Direction::Delta`]: an arbitrary per-axis displacement vector.
//!
//! Moving is pure and never consults a space; spaces apply their own policy
//! (wrapping, precision) on top of [`Direction::move_coord`].

use super::coord::{Components, Coord};
use crate::engine::errors::{FungeError, FungeResult};
use smallvec::SmallVec;

/// Fixed displacement applied to a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Unit step along `axis` in a space of `dims` axes
    Axis {
        dims: usize,
        axis: usize,
        positive: bool,
    },
    /// Arbitrary displacement, one component per axis
    Delta(Components),
}

impl Direction {
    /// Two-dimensional cardinal directions, x on axis 0 and y on axis 1 (y grows south)
    pub const EAST: Direction = Direction::Axis {
        dims: 2,
        axis: 0,
        positive: true,
    };
    pub const WEST: Direction = Direction::Axis {
        dims: 2,
        axis: 0,
        positive: false,
    };
    pub const SOUTH: Direction = Direction::Axis {
        dims: 2,
        axis: 1,
        positive: true,
    };
    pub const NORTH: Direction = Direction::Axis {
        dims: 2,
        axis: 1,
        positive: false,
    };

    /// Build an axis-aligned unit step
    pub fn axis(dims: usize, axis: usize, positive: bool) -> FungeResult<Self> {
        if dims == 0 {
            return Err(FungeError::invalid_direction(
                "an axis direction needs at least one dimension",
            ));
        }
        if axis >= dims {
            return Err(FungeError::invalid_direction(format!(
                "axis {} does not exist in {} dimensions",
                axis, dims
            )));
        }
        Ok(Direction::Axis {
            dims,
            axis,
            positive,
        })
    }

    /// Build an arbitrary displacement
    pub fn delta(components: &[i64]) -> FungeResult<Self> {
        if components.is_empty() {
            return Err(FungeError::invalid_direction(
                "a delta direction needs at least one component",
            ));
        }
        Ok(Direction::Delta(SmallVec::from_slice(components)))
    }

    /// Number of axes this direction applies to
    pub fn dims(&self) -> usize {
        match self {
            Direction::Axis { dims, .. } => *dims,
            Direction::Delta(delta) => delta.len(),
        }
    }

    /// Axis index and sign, for spaces restricted to cardinal stepping
    pub fn as_axis(&self) -> Option<(usize, bool)> {
        match self {
            Direction::Axis { axis, positive, .. } => Some((*axis, *positive)),
            Direction::Delta(_) => None,
        }
    }

    /// Displacement along `axis`
    pub fn component(&self, axis: usize) -> i64 {
        match self {
            Direction::Axis {
                axis: a, positive, ..
            } => {
                if *a != axis {
                    0
                } else if *positive {
                    1
                } else {
                    -1
                }
            }
            Direction::Delta(delta) => delta.get(axis).copied().unwrap_or(0),
        }
    }

    /// The opposite displacement, same shape
    pub fn reversed(&self) -> Self {
        match self {
            Direction::Axis {
                dims,
                axis,
                positive,
            } => Direction::Axis {
                dims: *dims,
                axis: *axis,
                positive: !positive,
            },
            Direction::Delta(delta) => {
                Direction::Delta(delta.iter().map(|d| d.wrapping_neg()).collect())
            }
        }
    }

    /// The coordinate one step further along this direction
    ///
    /// Arithmetic wraps at the 64-bit boundary; spaces with narrower precision
    /// reduce the result themselves.
    pub fn move_coord(&self, coord: &Coord) -> FungeResult<Coord> {
        if coord.dims() != self.dims() {
            return Err(FungeError::DimensionMismatch {
                expected: self.dims(),
                got: coord.dims(),
            });
        }
        let mut next = coord.clone();
        for (axis, c) in next.components_mut().iter_mut().enumerate() {
            *c = c.wrapping_add(self.component(axis));
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_step() {
        let next = Direction::SOUTH.move_coord(&Coord::from([3, 4])).unwrap();
        assert_eq!(next, Coord::from([3, 5]));
        let back = Direction::WEST.move_coord(&Coord::from([0, 0])).unwrap();
        assert_eq!(back, Coord::from([-1, 0]));
    }

    #[test]
    fn test_delta_step() {
        let knight = Direction::delta(&[2, -1, 0]).unwrap();
        let next = knight.move_coord(&Coord::from([1, 1, 1])).unwrap();
        assert_eq!(next, Coord::from([3, 0, 1]));
        assert_eq!(knight.as_axis(), None);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Direction::EAST.move_coord(&Coord::from([1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            FungeError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_constructor_validation() {
        assert!(Direction::axis(0, 0, true).is_err());
        assert!(Direction::axis(2, 2, true).is_err());
        assert!(Direction::delta(&[]).is_err());
        assert_eq!(Direction::axis(2, 1, false).unwrap(), Direction::NORTH);
    }

    #[test]
    fn test_reversed_and_equality() {
        assert_eq!(Direction::EAST.reversed(), Direction::WEST);
        assert_ne!(Direction::EAST, Direction::delta(&[1, 0]).unwrap());
        assert_eq!(
            Direction::delta(&[1, -3]).unwrap().reversed(),
            Direction::delta(&[-1, 3]).unwrap()
        );
    }
}
