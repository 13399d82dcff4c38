//! Instruction pointers
//!
//! An [`InstructionPointer`] is a cursor walking a space: a position, a direction
//! and a private [`StateBag`]. Many IPs share one space and none of them owns a
//! cell. Language plugins attach whatever per-IP state they need (operand stack,
//! mode flags, PRNG) through the bag; the engine never looks inside it.
//!
//! Every IP carries an [`IpId`] so the engine can keep following it while
//! operations fork or kill IPs around it.

pub mod state;

pub use state::{SharedState, Slot, StateBag, StateKey};

use crate::space::{Coord, Direction};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IP_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of an instruction pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpId(u64);

impl IpId {
    fn next() -> Self {
        IpId(NEXT_IP_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IP#{}", self.0)
    }
}

/// Cursor over a space
#[derive(Debug, Clone)]
pub struct InstructionPointer {
    id: IpId,
    pub position: Coord,
    pub direction: Direction,
    pub state: StateBag,
}

impl InstructionPointer {
    pub fn new(position: Coord, direction: Direction) -> Self {
        InstructionPointer {
            id: IpId::next(),
            position,
            direction,
            state: StateBag::new(),
        }
    }

    pub fn id(&self) -> IpId {
        self.id
    }

    /// A copy with a fresh identity, for languages that split an IP in two
    pub fn fork(&self) -> Self {
        InstructionPointer {
            id: IpId::next(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: StateKey<Vec<i32>> = StateKey::new("stack");

    #[test]
    fn test_ids_are_unique() {
        let a = InstructionPointer::new(Coord::origin(2), Direction::EAST);
        let b = InstructionPointer::new(Coord::origin(2), Direction::EAST);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_fork_copies_state_with_new_identity() {
        let mut ip = InstructionPointer::new(Coord::from([4, 2]), Direction::SOUTH);
        ip.state.insert(&STACK, vec![1, 2]);

        let mut twin = ip.fork();
        assert_ne!(twin.id(), ip.id());
        assert_eq!(twin.position, ip.position);
        assert_eq!(twin.direction, ip.direction);

        twin.state.get_mut(&STACK).unwrap().push(3);
        assert_eq!(ip.state.get(&STACK).unwrap(), &vec![1, 2]);
    }
}
