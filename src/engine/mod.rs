//! Funge execution engine
//!
//! This module provides the core execution logic:
//! - [`errors`]: fault types
//! - [`state`]: [`EngineState`] shared with operations and observers
//! - [`events`]: lifecycle notifications and the [`Observer`] trait
//! - [`background`]: running a whole program on a worker thread
//!
//! # Execution Model
//!
//! The engine multiplexes every live IP over one space, cooperatively and on a
//! single thread. A tick visits the live IPs in their current order; for each one
//! it fetches the cell under the IP, resolves it through the [`Language`] plugin,
//! runs the resulting operation, then steps the IP along its direction. The first
//! halting decision ends the run immediately.
//!
//! The live sequence is not snapshotted: an operation that forks or kills IPs
//! changes which IPs the rest of the same tick visits.

pub mod background;
pub mod errors;
pub mod events;
pub mod state;

pub use background::RunHandle;
pub use errors::{FungeError, FungeResult};
pub use events::{Event, Observer, Phase};
pub use state::{EngineState, HaltingDecision};

use crate::ip::{InstructionPointer, IpId, SharedState};
use crate::language::Language;
use crate::space::{FungeSpace, Space};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Result of a tick-bounded run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome<C> {
    /// A halting decision ended the run
    Halted(Option<C>),
    /// The tick budget ran out first
    TickLimit,
}

/// Drives a language over a space
pub struct Engine<C> {
    state: EngineState<C>,
    language: Arc<dyn Language<C>>,
    observers: Vec<Box<dyn Observer<C>>>,
    tick: u64,
    initialized: bool,
    halted: bool,
}

impl<C: Clone + Send + 'static> Engine<C> {
    /// Assemble an engine from pre-built parts, without consulting the language
    pub fn new(
        space: FungeSpace<C>,
        ips: Vec<InstructionPointer>,
        language: Arc<dyn Language<C>>,
        shared: SharedState,
    ) -> Self {
        Engine {
            state: EngineState::new(space, ips, shared),
            language,
            observers: Vec::new(),
            tick: 0,
            initialized: false,
            halted: false,
        }
    }

    /// Check the space against the language and let the language create its IPs
    pub fn start(
        space: FungeSpace<C>,
        language: Arc<dyn Language<C>>,
        shared: SharedState,
    ) -> FungeResult<Self> {
        if !language.is_space_valid(&space) {
            let shape = space.shape().to_string();
            warn!(language = language.name(), %shape, "space rejected by language");
            return Err(FungeError::UnsupportedSpace {
                language: language.name().to_string(),
                shape,
            });
        }
        let mut engine = Self::new(space, Vec::new(), language, shared);
        let language = Arc::clone(&engine.language);
        language.initialize(&mut engine.state)?;
        debug!(
            language = language.name(),
            ips = engine.state.ips.len(),
            "engine started"
        );
        Ok(engine)
    }

    /// Register a notification subscriber
    pub fn subscribe(&mut self, observer: impl Observer<C> + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &EngineState<C> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EngineState<C> {
        &mut self.state
    }

    pub fn language(&self) -> &Arc<dyn Language<C>> {
        &self.language
    }

    /// Ticks started so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Run until a halting decision and return its result
    pub fn run(&mut self) -> FungeResult<Option<C>> {
        self.ensure_initialized()?;
        loop {
            if let HaltingDecision::Halt(result) = self.step_tick()? {
                return self.finish(result);
            }
        }
    }

    /// Run at most `max_ticks` more ticks
    pub fn run_for(&mut self, max_ticks: u64) -> FungeResult<RunOutcome<C>> {
        self.ensure_initialized()?;
        for _ in 0..max_ticks {
            if let HaltingDecision::Halt(result) = self.step_tick()? {
                return self.finish(result).map(RunOutcome::Halted);
            }
        }
        debug!(ticks = self.tick, "tick budget exhausted");
        Ok(RunOutcome::TickLimit)
    }

    /// Submit the whole run to a worker thread
    pub fn spawn(self) -> FungeResult<RunHandle<C>> {
        background::spawn(self, false)
    }

    /// Like [`Engine::spawn`], but the run waits for [`RunHandle::start`]
    pub fn spawn_paused(self) -> FungeResult<RunHandle<C>> {
        background::spawn(self, true)
    }

    fn ensure_initialized(&mut self) -> FungeResult<()> {
        if !self.initialized {
            self.initialized = true;
            debug!(
                language = self.language.name(),
                ips = self.state.ips.len(),
                "run initialized"
            );
            self.notify(Phase::Initialize)?;
        }
        Ok(())
    }

    fn finish(&mut self, result: Option<C>) -> FungeResult<Option<C>> {
        self.halted = true;
        debug!(ticks = self.tick, "run halted");
        self.notify(Phase::Halt)?;
        Ok(result)
    }

    /// Run one round-robin pass over the live IPs
    ///
    /// On a halting decision the remaining IPs of the tick are skipped, the tick
    /// finish notification still fires, and the decision is returned.
    pub fn step_tick(&mut self) -> FungeResult<HaltingDecision<C>> {
        self.tick += 1;
        trace!(tick = self.tick, ips = self.state.ips.len(), "tick");
        self.notify(Phase::TickStart)?;

        let mut decision = HaltingDecision::Continue;
        let mut index = 0;
        while index < self.state.ips.len() {
            let id = self.state.ips[index].id();
            match self.execute_ip(index, id)? {
                Step::Halted(result) => {
                    decision = HaltingDecision::Halt(result);
                    break;
                }
                Step::Next(next) => index = next,
            }
        }

        self.state.set_current(None);
        self.notify(Phase::TickFinish)?;
        Ok(decision)
    }

    fn execute_ip(&mut self, index: usize, id: IpId) -> FungeResult<Step<C>> {
        self.state.set_current(Some(id));
        self.notify(Phase::BeforeCommand)?;

        // An observer may have removed or reordered the IP.
        let Some(index) = self.state.position_of(id) else {
            return Ok(Step::Next(index));
        };

        let Some(cell) = self.state.current_cell().transpose()? else {
            return Ok(Step::Next(index));
        };
        let operation = self.language.resolve(&cell);
        if let HaltingDecision::Halt(result) = operation(&mut self.state)? {
            self.state.set_current(None);
            return Ok(Step::Halted(result));
        }

        // An IP removed by its own operation is not advanced; whoever slid into
        // its slot runs next.
        if self.state.position_of(id).is_none() {
            return Ok(Step::Next(index));
        }
        self.notify(Phase::AfterCommand)?;
        if !self.state.advance(id)? {
            return Ok(Step::Next(index));
        }
        self.notify(Phase::AfterMove)?;
        Ok(Step::Next(
            self.state.position_of(id).map_or(index, |position| position + 1),
        ))
    }

    fn notify(&mut self, phase: Phase) -> FungeResult<()> {
        let event = Event {
            phase,
            tick: self.tick,
            ip: self.state.current_id().filter(|_| phase.has_ip()),
        };
        for observer in &mut self.observers {
            observer.notify(&event, &mut self.state)?;
        }
        Ok(())
    }
}

enum Step<C> {
    Halted(Option<C>),
    Next(usize),
}
