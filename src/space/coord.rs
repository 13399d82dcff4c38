//! Coordinate values
//!
//! A [`Coord`] is a fixed-length tuple of signed integers whose width equals the
//! dimensionality of the space it addresses. Coordinates are plain values: every
//! movement produces a new one, and equality and hashing are structural so they can
//! key sparse storage directly.

use smallvec::SmallVec;
use std::fmt;
use std::ops::Index;

/// Inline capacity; spaces up to four axes never allocate
pub type Components = SmallVec<[i64; 4]>;

/// Position in a space
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord(Components);

impl Coord {
    /// Build a coordinate from its components
    pub fn new(components: &[i64]) -> Self {
        Coord(SmallVec::from_slice(components))
    }

    /// The all-zero coordinate with `dims` axes
    pub fn origin(dims: usize) -> Self {
        Coord(SmallVec::from_elem(0, dims))
    }

    /// Number of axes
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[i64] {
        &self.0
    }

    pub(crate) fn components_mut(&mut self) -> &mut [i64] {
        &mut self.0
    }

    /// Component along `axis`, if the coordinate has that many axes
    pub fn get(&self, axis: usize) -> Option<i64> {
        self.0.get(axis).copied()
    }
}

impl Index<usize> for Coord {
    type Output = i64;

    fn index(&self, axis: usize) -> &i64 {
        &self.0[axis]
    }
}

impl<const N: usize> From<[i64; N]> for Coord {
    fn from(components: [i64; N]) -> Self {
        Coord::new(&components)
    }
}

impl From<Vec<i64>> for Coord {
    fn from(components: Vec<i64>) -> Self {
        Coord(SmallVec::from_vec(components))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}
