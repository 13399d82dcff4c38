//! Lifecycle notifications
//!
//! The engine announces seven phases of a run to its [`Observer`]s. Observers see
//! the full [`EngineState`] mutably, so a debugger can both watch and steer a run.
//! An observer that returns an error aborts the run with that error.

use crate::engine::errors::FungeResult;
use crate::engine::state::EngineState;
use crate::ip::IpId;
use std::fmt;

/// Point in the run a notification is fired from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Once, before the first tick
    Initialize,
    TickStart,
    /// The current IP's cell is about to run
    BeforeCommand,
    AfterCommand,
    /// The current IP has stepped along its direction
    AfterMove,
    TickFinish,
    /// Once, after the halting decision
    Halt,
}

impl Phase {
    /// Whether notifications of this phase carry a current IP
    pub fn has_ip(self) -> bool {
        matches!(
            self,
            Phase::BeforeCommand | Phase::AfterCommand | Phase::AfterMove
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::TickStart => "tick-start",
            Phase::BeforeCommand => "before-command",
            Phase::AfterCommand => "after-command",
            Phase::AfterMove => "after-move",
            Phase::TickFinish => "tick-finish",
            Phase::Halt => "halt",
        };
        f.write_str(name)
    }
}

/// One notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub phase: Phase,
    /// Ticks started so far; 0 during initialization
    pub tick: u64,
    pub ip: Option<IpId>,
}

/// Subscriber to engine notifications
pub trait Observer<C>: Send {
    fn notify(&mut self, event: &Event, state: &mut EngineState<C>) -> FungeResult<()>;
}

impl<C, F> Observer<C> for F
where
    F: FnMut(&Event, &mut EngineState<C>) -> FungeResult<()> + Send,
{
    fn notify(&mut self, event: &Event, state: &mut EngineState<C>) -> FungeResult<()> {
        self(event, state)
    }
}
