//! Language plugin contract
//!
//! A [`Language`] binds cell values to executable operations. It declares which
//! space shapes it can run in, creates the initial IPs, and resolves each cell to
//! an [`Operation`]: a function from the engine state at call time to a
//! [`HaltingDecision`]. Operations may mutate the current IP's state bag, the space
//! and shared state; nothing else.

use crate::engine::errors::FungeResult;
use crate::engine::state::{EngineState, HaltingDecision};
use crate::space::FungeSpace;

/// Executable form of one cell
pub type Operation<C> =
    Box<dyn Fn(&mut EngineState<C>) -> FungeResult<HaltingDecision<C>> + Send + Sync>;

/// An instruction set for the engine
pub trait Language<C>: Send + Sync {
    fn name(&self) -> &str;

    /// Structural compatibility with `space`
    fn is_space_valid(&self, space: &FungeSpace<C>) -> bool;

    /// Map a cell to its operation
    ///
    /// Must be pure: equal cells yield operations with identical effect on equal state.
    fn resolve(&self, cell: &C) -> Operation<C>;

    /// Create the IPs a run starts with
    fn initialize(&self, state: &mut EngineState<C>) -> FungeResult<()>;
}
