// Snapshot capture for time-travel debugging

use crate::befunge93::{STACK, STRING_MODE};
use crate::engine::errors::{FungeError, FungeResult};
use crate::engine::events::{Event, Observer, Phase};
use crate::engine::state::EngineState;
use crate::io::FungeOutput;
use crate::ip::IpId;
use crate::space::{Coord, Direction, Space, SpaceShape};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock terminal for capturing program output
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub lines: Vec<TerminalLine>,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append output produced during `tick`
    pub fn print(&mut self, text: &str, tick: u64) {
        if let Some(last) = self.lines.last_mut() {
            if !last.text.ends_with('\n') {
                last.text.push_str(text);
                return;
            }
        }
        self.lines.push(TerminalLine {
            text: text.to_string(),
            tick,
        });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|tl| {
                let mut result: Vec<String> = tl.text.split('\n').map(|s| s.to_string()).collect();
                // Remove trailing empty string if text ended with newline
                if result.last().is_some_and(|s| s.is_empty()) {
                    result.pop();
                }
                result
            })
            .collect()
    }

    /// Everything printed, verbatim
    pub fn contents(&self) -> String {
        self.lines.iter().map(|tl| tl.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A line of terminal output with the tick it started on
#[derive(Debug, Clone)]
pub struct TerminalLine {
    pub text: String,
    pub tick: u64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`FungeOutput`] writing into a shared [`MockTerminal`]
#[derive(Debug, Clone)]
pub struct TerminalOutput {
    terminal: Arc<Mutex<MockTerminal>>,
    tick: Arc<Mutex<u64>>,
}

impl TerminalOutput {
    pub fn new(terminal: Arc<Mutex<MockTerminal>>) -> Self {
        TerminalOutput {
            terminal,
            tick: Arc::new(Mutex::new(0)),
        }
    }

    fn print(&self, text: &str) {
        let tick = *lock(&self.tick);
        lock(&self.terminal).print(text, tick);
    }
}

impl FungeOutput for TerminalOutput {
    fn write_unit(&mut self, unit: u8) -> FungeResult<()> {
        self.print(&char::from(unit).to_string());
        Ok(())
    }

    fn write_number(&mut self, value: i32) -> FungeResult<()> {
        self.print(&format!("{} ", value));
        Ok(())
    }
}

/// One IP as captured in a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct IpSnapshot {
    pub id: IpId,
    pub position: Coord,
    pub direction: Direction,
    pub stack: Vec<i32>,
    pub string_mode: bool,
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: Phase,
    /// The IP that just moved, for after-move snapshots
    pub current_ip: Option<IpId>,
    pub width: usize,
    pub height: usize,
    /// Grid cells, row by row
    pub grid: Vec<u8>,
    pub ips: Vec<IpSnapshot>,
    pub terminal: MockTerminal,
}

impl Snapshot {
    /// Capture a two-dimensional Befunge-93 state
    pub fn capture(
        event: &Event,
        state: &EngineState<u8>,
        terminal: MockTerminal,
    ) -> FungeResult<Self> {
        let (width, height) = match state.space.shape().base() {
            SpaceShape::Toroidal { sizes } if sizes.len() == 2 => (sizes[0], sizes[1]),
            other => {
                return Err(FungeError::invalid_shape(format!(
                    "cannot snapshot a {} space",
                    other
                )))
            }
        };

        let mut grid = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                grid.push(state.space.read(&Coord::from([x as i64, y as i64]))?);
            }
        }

        let ips = state
            .ips
            .iter()
            .map(|ip| IpSnapshot {
                id: ip.id(),
                position: ip.position.clone(),
                direction: ip.direction.clone(),
                stack: ip.state.get(&STACK).cloned().unwrap_or_default(),
                string_mode: ip.state.get(&STRING_MODE).copied().unwrap_or(false),
            })
            .collect();

        Ok(Snapshot {
            tick: event.tick,
            phase: event.phase,
            current_ip: event.ip,
            width,
            height,
            grid,
            ips,
            terminal,
        })
    }

    /// Cell at `(x, y)`, if inside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.grid.get(y * self.width + x).copied()
    }

    /// The IPs sitting on `(x, y)`
    pub fn ips_at(&self, x: usize, y: usize) -> impl Iterator<Item = &IpSnapshot> {
        self.ips.iter().filter(move |ip| {
            ip.position.get(0) == Some(x as i64) && ip.position.get(1) == Some(y as i64)
        })
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // This is a rough estimate
        let grid_size = self.grid.len();

        // IPs: fixed part plus their stacks
        let ip_size: usize = self
            .ips
            .iter()
            .map(|ip| 64 + ip.stack.len() * std::mem::size_of::<i32>())
            .sum();

        let terminal_size: usize = self
            .terminal
            .lines
            .iter()
            .map(|line| std::mem::size_of::<TerminalLine>() + line.text.len())
            .sum();

        grid_size + ip_size + terminal_size
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> FungeResult<()> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(FungeError::SnapshotLimitExceeded {
                current: self.current_memory + snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

/// Observer that snapshots the run after every move
///
/// Captures once on initialization, after each IP move and at halt. The output
/// terminal is shared with the [`TerminalOutput`] installed for the run.
#[derive(Debug, Clone)]
pub struct Recorder {
    history: Arc<Mutex<SnapshotManager>>,
    terminal: Arc<Mutex<MockTerminal>>,
    output_tick: Arc<Mutex<u64>>,
}

impl Recorder {
    /// A recorder plus the output sink whose text it captures
    pub fn new(memory_limit: usize) -> (Self, TerminalOutput) {
        let terminal = Arc::new(Mutex::new(MockTerminal::new()));
        let output = TerminalOutput::new(Arc::clone(&terminal));
        let recorder = Recorder {
            history: Arc::new(Mutex::new(SnapshotManager::new(memory_limit))),
            terminal,
            output_tick: Arc::clone(&output.tick),
        };
        (recorder, output)
    }

    pub fn history(&self) -> Arc<Mutex<SnapshotManager>> {
        Arc::clone(&self.history)
    }

    /// Take the recorded history, leaving an empty one with the same limit
    pub fn take_history(&self) -> SnapshotManager {
        let mut history = lock(&self.history);
        let limit = history.memory_limit();
        std::mem::replace(&mut *history, SnapshotManager::new(limit))
    }
}

impl Observer<u8> for Recorder {
    fn notify(&mut self, event: &Event, state: &mut EngineState<u8>) -> FungeResult<()> {
        if event.phase == Phase::TickStart {
            *lock(&self.output_tick) = event.tick;
        }
        if !matches!(event.phase, Phase::Initialize | Phase::AfterMove | Phase::Halt) {
            return Ok(());
        }
        let terminal = lock(&self.terminal).clone();
        let snapshot = Snapshot::capture(event, state, terminal)?;
        lock(&self.history).push(snapshot)
    }
}
