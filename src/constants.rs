// Defaults for the Befunge-93 front end

/// Befunge-93 program grid width
pub const GRID_WIDTH: usize = 80;

/// Befunge-93 program grid height
pub const GRID_HEIGHT: usize = 25;

/// Cell value of an unset grid position
pub const BLANK_CELL: u8 = b' ';

/// Snapshot history memory limit (256 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

/// Delay between steps while autoplaying in the TUI, in milliseconds
pub const AUTOPLAY_INTERVAL_MS: u64 = 60;

/// Tick cap applied to TUI recordings when none is configured
/// A program that never halts still yields a finite history
pub const DEFAULT_RECORD_TICKS: u64 = 100_000;
