//! # Introduction
//!
//! fungetty is an execution engine for Befunge-style languages: programs laid
//! out on a grid of cells and walked by one or more instruction pointers. The
//! engine is generic over the memory model and the instruction set; Befunge-93
//! ships as the reference plugin, and a ratatui front end records a run and lets
//! you step through it backward and forward.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Grid → Engine (ticks over IPs) → Snapshots → TUI
//! ```
//!
//! 1. [`space`]: addressable memory models: a dense torus, a sparse unbounded
//!    space with fixed-width coordinates, and copy-on-write overlays.
//! 2. [`ip`]: instruction pointers with typed per-IP state, plus the shared
//!    state bag every IP sees.
//! 3. [`engine`]: the tick scheduler, its seven lifecycle notifications and
//!    background runs.
//! 4. [`language`]: the plugin contract binding cells to operations;
//!    [`befunge93`] implements it.
//! 5. [`io`]: input and output collaborators installed in shared state.
//! 6. [`snapshot`] and [`debugger`]: recording a run and navigating its history.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use fungetty::befunge93::{load_program, Befunge93};
//! use fungetty::engine::Engine;
//! use fungetty::io::{install, ReaderInput, WriterOutput};
//! use fungetty::ip::SharedState;
//!
//! let grid = load_program("25*.@").unwrap();
//! let mut shared = SharedState::new();
//! install(
//!     &mut shared,
//!     ReaderInput::new(std::io::empty()),
//!     WriterOutput::new(std::io::sink()),
//! );
//! let mut engine = Engine::start(grid.into(), Arc::new(Befunge93::new()), shared).unwrap();
//! assert_eq!(engine.run().unwrap(), Some(0));
//! ```

pub mod befunge93;
pub mod config;
pub mod constants;
pub mod debugger;
pub mod engine;
pub mod io;
pub mod ip;
pub mod language;
pub mod snapshot;
pub mod space;
pub mod ui;

pub use engine::{Engine, FungeError, FungeResult, HaltingDecision, RunOutcome};
pub use language::{Language, Operation};
pub use space::{Coord, Direction, FungeSpace, Space};
