//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI.
//!
//! # Pane Modules
//!
//! - [`grid`]: The program grid with instruction coloring and IP highlights
//! - [`stack`]: Operand stacks of every live IP
//! - [`terminal`]: Program output captured so far
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*` function plus the scroll state
//! it keeps between frames. Panes are stateless apart from that.

pub mod grid;
pub mod stack;
pub mod status;
pub mod terminal;

// Re-export render functions for convenience
pub use grid::{render_grid_pane, GridScrollState};
pub use stack::{render_stack_pane, StackScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
