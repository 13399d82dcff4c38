//! Time-travel over a recorded run
//!
//! [`Debugger::record`] runs a Befunge-93 engine to completion (or to a tick cap)
//! with a [`Recorder`] attached, then offers the captured history for navigation.
//! A run that faults still yields the history up to the fault.

use crate::engine::errors::{FungeError, FungeResult};
use crate::engine::{Engine, RunOutcome};
use crate::io::{FungeOutput, OUTPUT};
use crate::snapshot::{Recorder, Snapshot, SnapshotManager};
use std::fmt;
use tracing::{debug, warn};

/// How the recorded run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Halted(Option<u8>),
    TickLimit(u64),
    Faulted(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Halted(Some(result)) => write!(f, "halted with result {}", result),
            Outcome::Halted(None) => write!(f, "halted"),
            Outcome::TickLimit(ticks) => write!(f, "stopped after {} ticks", ticks),
            Outcome::Faulted(message) => write!(f, "fault: {}", message),
        }
    }
}

/// Navigable execution history
#[derive(Debug)]
pub struct Debugger {
    history: SnapshotManager,
    position: usize,
    outcome: Outcome,
}

impl Debugger {
    pub fn new(history: SnapshotManager, outcome: Outcome) -> FungeResult<Self> {
        if history.is_empty() {
            return Err(FungeError::history("No snapshots available"));
        }
        Ok(Debugger {
            history,
            position: 0,
            outcome,
        })
    }

    /// Run `engine` with program output captured, recording every move
    ///
    /// The engine's output collaborator is replaced by the recorder's terminal;
    /// its input collaborator is left as installed.
    pub fn record(mut engine: Engine<u8>, memory_limit: usize, max_ticks: u64) -> FungeResult<Self> {
        let (recorder, output) = Recorder::new(memory_limit);
        engine
            .state_mut()
            .shared
            .insert(&OUTPUT, Box::new(output) as Box<dyn FungeOutput>);
        engine.subscribe(recorder.clone());

        let outcome = match engine.run_for(max_ticks) {
            Ok(RunOutcome::Halted(result)) => Outcome::Halted(result),
            Ok(RunOutcome::TickLimit) => Outcome::TickLimit(engine.tick_count()),
            Err(e) => {
                warn!(error = %e, "recorded run ended with a fault");
                Outcome::Faulted(e.to_string())
            }
        };

        let history = recorder.take_history();
        debug!(
            snapshots = history.len(),
            bytes = history.memory_usage(),
            %outcome,
            "recording finished"
        );
        Self::new(history, outcome)
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> FungeResult<()> {
        if self.position == 0 {
            return Err(FungeError::history("Already at the beginning of execution"));
        }
        self.position -= 1;
        Ok(())
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> FungeResult<()> {
        if self.position + 1 >= self.history.len() {
            return Err(FungeError::history(
                "No more snapshots available (execution finished)",
            ));
        }
        self.position += 1;
        Ok(())
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) {
        self.position = self.history.len().saturating_sub(1);
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.history.get(self.position)
    }

    /// Get the current history position
    pub fn history_position(&self) -> usize {
        self.position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.history.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.history.len()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn history(&self) -> &SnapshotManager {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::befunge93::{load_program, Befunge93};
    use crate::ip::SharedState;
    use std::sync::Arc;

    fn record(source: &str, max_ticks: u64) -> Debugger {
        let space = load_program(source).unwrap().into();
        let engine = Engine::start(space, Arc::new(Befunge93::with_seed(1)), SharedState::new())
            .unwrap();
        Debugger::record(engine, 1 << 24, max_ticks).unwrap()
    }

    #[test]
    fn test_records_every_move() {
        // initialize + 4 moves + halt
        let debugger = record("25*.@", 100);
        assert_eq!(debugger.total_snapshots(), 6);
        assert_eq!(debugger.outcome(), &Outcome::Halted(Some(0)));

        let first = debugger.current().unwrap();
        assert_eq!(first.ips[0].stack, Vec::<i32>::new());
        assert!(first.terminal.is_empty());
    }

    #[test]
    fn test_navigation() {
        let mut debugger = record("25*.@", 100);
        assert!(debugger.step_backward().is_err());

        debugger.step_forward().unwrap();
        debugger.step_forward().unwrap();
        assert_eq!(debugger.current().unwrap().ips[0].stack, vec![2, 5]);

        debugger.jump_to_end();
        assert!(debugger.is_at_end());
        assert!(debugger.step_forward().is_err());
        assert_eq!(debugger.current().unwrap().terminal.contents(), "10 ");

        debugger.rewind_to_start();
        assert_eq!(debugger.history_position(), 0);
    }

    #[test]
    fn test_fault_keeps_partial_history() {
        let debugger = record("1$$@", 100);
        assert!(matches!(debugger.outcome(), Outcome::Faulted(_)));
        // initialize + moves after `1` and the first `$`
        assert_eq!(debugger.total_snapshots(), 3);
    }

    #[test]
    fn test_tick_limit() {
        let debugger = record(">", 5);
        assert_eq!(debugger.outcome(), &Outcome::TickLimit(5));
        assert_eq!(debugger.total_snapshots(), 6);
    }
}
