//! Befunge-93 reference plugin
//!
//! Runs on a two-dimensional dense torus (the classic 80×25 grid from
//! [`load_program`]) or an overlay stacked on one. Each IP carries an operand stack
//! of `i32`, a string-mode flag and its own PRNG for `?`, all in its state bag under
//! [`STACK`], [`STRING_MODE`] and [`RNG`].
//!
//! # Faults
//!
//! Popping an empty stack raises [`FungeError::StackUnderflow`] and dividing by
//! zero raises [`FungeError::DivisionByZero`]; other arithmetic wraps. `g` and `p`
//! outside the grid surface the space's own range fault.
//!
//! [`FungeError::StackUnderflow`]: crate::engine::FungeError::StackUnderflow
//! [`FungeError::DivisionByZero`]: crate::engine::FungeError::DivisionByZero

pub mod commands;
pub mod loader;

pub use commands::Command;
pub use loader::load_program;

use crate::engine::errors::FungeResult;
use crate::engine::state::{EngineState, HaltingDecision};
use crate::ip::{InstructionPointer, StateKey};
use crate::language::{Language, Operation};
use crate::space::{FungeSpace, Space, SpaceShape};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Operand stack, top at the end
pub const STACK: StateKey<Vec<i32>> = StateKey::new("stack");
pub const STRING_MODE: StateKey<bool> = StateKey::new("stringmode");
pub const RNG: StateKey<StdRng> = StateKey::new("random");

/// The Befunge-93 instruction set
#[derive(Debug, Default)]
pub struct Befunge93 {
    seed: Option<u64>,
    created: AtomicU64,
}

impl Befunge93 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `?` reproducible: the n-th IP created is seeded with `seed + n`
    pub fn with_seed(seed: u64) -> Self {
        Befunge93 {
            seed: Some(seed),
            created: AtomicU64::new(0),
        }
    }

    /// An IP at the space's origin, heading its default direction, with fresh state
    pub fn create_ip(&self, space: &FungeSpace<u8>) -> InstructionPointer {
        let mut ip = InstructionPointer::new(space.default_origin(), space.default_direction());
        ip.state.insert(&STACK, Vec::new());
        ip.state.insert(&STRING_MODE, false);
        ip.state.insert(&RNG, self.next_rng());
        ip
    }

    fn next_rng(&self) -> StdRng {
        let n = self.created.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(n)),
            None => StdRng::from_entropy(),
        }
    }
}

impl Language<u8> for Befunge93 {
    fn name(&self) -> &str {
        "Befunge-93"
    }

    fn is_space_valid(&self, space: &FungeSpace<u8>) -> bool {
        matches!(space.shape().base(), SpaceShape::Toroidal { sizes } if sizes.len() == 2)
    }

    fn resolve(&self, cell: &u8) -> Operation<u8> {
        let cell = *cell;
        let command = Command::decode(cell);
        Box::new(move |state: &mut EngineState<u8>| {
            let Some(index) = state.current_id().and_then(|id| state.position_of(id)) else {
                return Ok(HaltingDecision::Continue);
            };

            let ip = &mut state.ips[index];
            if *ip.state.get(&STRING_MODE)? {
                if cell == b'"' {
                    ip.state.insert(&STRING_MODE, false);
                } else {
                    ip.state.get_mut(&STACK)?.push(i32::from(cell));
                }
                return Ok(HaltingDecision::Continue);
            }

            trace!(ip = %ip.id(), ?command, "execute");
            command.execute(state, index)
        })
    }

    fn initialize(&self, state: &mut EngineState<u8>) -> FungeResult<()> {
        let ip = self.create_ip(&state.space);
        state.insert_ip(0, ip);
        Ok(())
    }
}
