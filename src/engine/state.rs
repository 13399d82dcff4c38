//! Engine state visible to operations and observers

use crate::engine::errors::FungeResult;
use crate::ip::{InstructionPointer, IpId, SharedState};
use crate::space::{FungeSpace, Space};

/// Outcome of executing one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltingDecision<C> {
    Continue,
    /// Stop the run, optionally with a result
    Halt(Option<C>),
}

impl<C> HaltingDecision<C> {
    pub fn is_halt(&self) -> bool {
        matches!(self, HaltingDecision::Halt(_))
    }
}

/// Everything an operation may touch: the space, the live IPs and shared state
#[derive(Debug)]
pub struct EngineState<C> {
    pub space: FungeSpace<C>,
    /// Live IPs in execution order
    pub ips: Vec<InstructionPointer>,
    pub shared: SharedState,
    current: Option<IpId>,
}

impl<C: Clone> EngineState<C> {
    pub fn new(space: FungeSpace<C>, ips: Vec<InstructionPointer>, shared: SharedState) -> Self {
        EngineState {
            space,
            ips,
            shared,
            current: None,
        }
    }

    /// The IP whose cell is being executed, if any
    pub fn current_id(&self) -> Option<IpId> {
        self.current
    }

    pub(crate) fn set_current(&mut self, id: Option<IpId>) {
        self.current = id;
    }

    pub fn current_ip(&self) -> Option<&InstructionPointer> {
        self.current.and_then(|id| self.ip(id))
    }

    pub fn current_ip_mut(&mut self) -> Option<&mut InstructionPointer> {
        let id = self.current?;
        self.ip_mut(id)
    }

    /// The cell under the current IP
    pub fn current_cell(&self) -> Option<FungeResult<C>> {
        self.current_ip().map(|ip| self.space.read(&ip.position))
    }

    pub fn ip(&self, id: IpId) -> Option<&InstructionPointer> {
        self.ips.iter().find(|ip| ip.id() == id)
    }

    pub fn ip_mut(&mut self, id: IpId) -> Option<&mut InstructionPointer> {
        self.ips.iter_mut().find(|ip| ip.id() == id)
    }

    /// Index of `id` in the live sequence
    pub fn position_of(&self, id: IpId) -> Option<usize> {
        self.ips.iter().position(|ip| ip.id() == id)
    }

    /// Append an IP to the end of the live sequence
    pub fn spawn_ip(&mut self, ip: InstructionPointer) -> IpId {
        let id = ip.id();
        self.ips.push(ip);
        id
    }

    /// Insert an IP at `index`, clamped to the end of the sequence
    pub fn insert_ip(&mut self, index: usize, ip: InstructionPointer) -> IpId {
        let id = ip.id();
        let index = index.min(self.ips.len());
        self.ips.insert(index, ip);
        id
    }

    pub fn remove_ip(&mut self, id: IpId) -> Option<InstructionPointer> {
        let index = self.position_of(id)?;
        Some(self.ips.remove(index))
    }

    /// Step IP `id` once along its own direction under the space's policy
    ///
    /// Returns `false` if no such IP is live.
    pub fn advance(&mut self, id: IpId) -> FungeResult<bool> {
        let Some(index) = self.position_of(id) else {
            return Ok(false);
        };
        let ip = &self.ips[index];
        let next = self.space.move_coord(&ip.position, &ip.direction)?;
        self.ips[index].position = next;
        Ok(true)
    }
}
