//! Addressable spaces
//!
//! This module provides the memory models a Funge program runs in:
//! - [`coord`]: [`Coord`] values
//! - [`direction`]: [`Direction`] movement primitives
//! - [`toroidal`]: dense fixed-size buffer whose axes wrap around
//! - [`sparse`]: unbounded map with a default cell and bounded integer precision
//! - [`overlay`]: scoped write layers over a shared backing space
//!
//! # Capability Interface
//!
//! Every variant implements [`Space`]: read/write, direction and coordinate
//! validity, movement under the variant's own policy, and canonical defaults.
//! The engine holds a [`FungeSpace`], the closed set of the three variants, and
//! language plugins inspect its structure through [`SpaceShape`] instead of
//! downcasting.

pub mod coord;
pub mod direction;
pub mod overlay;
pub mod sparse;
pub mod toroidal;

pub use coord::Coord;
pub use direction::Direction;
pub use overlay::{Layer, Overlay, SharedSpace};
pub use sparse::{Precision, SparseSpace};
pub use toroidal::DenseTorus;

use crate::engine::errors::FungeResult;
use std::fmt;

/// Cell storage over a coordinate domain, plus a movement policy
pub trait Space<C> {
    /// Number of axes
    fn dims(&self) -> usize;

    fn read(&self, coord: &Coord) -> FungeResult<C>;

    fn write(&mut self, coord: &Coord, cell: C) -> FungeResult<()>;

    /// Whether `direction` may be taken from `from` (spaces with holes answer per position)
    fn is_valid_direction(&self, direction: &Direction, from: &Coord) -> bool;

    fn is_valid_coordinate(&self, coord: &Coord) -> bool;

    /// Step `coord` along `direction` under this space's policy
    fn move_coord(&self, coord: &Coord, direction: &Direction) -> FungeResult<Coord>;

    fn default_origin(&self) -> Coord;

    fn default_direction(&self) -> Direction;

    /// Structural description, used by plugins to declare compatibility
    fn shape(&self) -> SpaceShape;
}

/// Structure of a space, without its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceShape {
    Toroidal {
        sizes: Vec<usize>,
    },
    Sparse {
        dims: usize,
        precision: Precision,
    },
    Overlay {
        layers: usize,
        backing: Box<SpaceShape>,
    },
}

impl SpaceShape {
    /// The shape underneath any overlays
    pub fn base(&self) -> &SpaceShape {
        match self {
            SpaceShape::Overlay { backing, .. } => backing.base(),
            other => other,
        }
    }
}

impl fmt::Display for SpaceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceShape::Toroidal { sizes } => {
                let sizes: Vec<String> = sizes.iter().map(|s| s.to_string()).collect();
                write!(f, "toroidal {}", sizes.join("x"))
            }
            SpaceShape::Sparse { dims, precision } => {
                write!(f, "sparse {}-dimensional {}", dims, precision)
            }
            SpaceShape::Overlay { layers, backing } => {
                write!(f, "{}-layer overlay over {}", layers, backing)
            }
        }
    }
}

/// The space variants an engine can run in
#[derive(Debug, Clone)]
pub enum FungeSpace<C> {
    Toroidal(DenseTorus<C>),
    Sparse(SparseSpace<C>),
    Overlay(Overlay<C>),
}

impl<C> From<DenseTorus<C>> for FungeSpace<C> {
    fn from(space: DenseTorus<C>) -> Self {
        FungeSpace::Toroidal(space)
    }
}

impl<C> From<SparseSpace<C>> for FungeSpace<C> {
    fn from(space: SparseSpace<C>) -> Self {
        FungeSpace::Sparse(space)
    }
}

impl<C> From<Overlay<C>> for FungeSpace<C> {
    fn from(space: Overlay<C>) -> Self {
        FungeSpace::Overlay(space)
    }
}

impl<C: Clone> FungeSpace<C> {
    fn inner(&self) -> &dyn Space<C> {
        match self {
            FungeSpace::Toroidal(space) => space,
            FungeSpace::Sparse(space) => space,
            FungeSpace::Overlay(space) => space,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Space<C> {
        match self {
            FungeSpace::Toroidal(space) => space,
            FungeSpace::Sparse(space) => space,
            FungeSpace::Overlay(space) => space,
        }
    }
}

impl<C: Clone> Space<C> for FungeSpace<C> {
    fn dims(&self) -> usize {
        self.inner().dims()
    }

    fn read(&self, coord: &Coord) -> FungeResult<C> {
        self.inner().read(coord)
    }

    fn write(&mut self, coord: &Coord, cell: C) -> FungeResult<()> {
        self.inner_mut().write(coord, cell)
    }

    fn is_valid_direction(&self, direction: &Direction, from: &Coord) -> bool {
        self.inner().is_valid_direction(direction, from)
    }

    fn is_valid_coordinate(&self, coord: &Coord) -> bool {
        self.inner().is_valid_coordinate(coord)
    }

    fn move_coord(&self, coord: &Coord, direction: &Direction) -> FungeResult<Coord> {
        self.inner().move_coord(coord, direction)
    }

    fn default_origin(&self) -> Coord {
        self.inner().default_origin()
    }

    fn default_direction(&self) -> Direction {
        self.inner().default_direction()
    }

    fn shape(&self) -> SpaceShape {
        self.inner().shape()
    }
}
