//! Typed key-value storage
//!
//! [`StateBag`] is the per-IP state an engine carries without knowing its shape;
//! [`SharedState`] is the process-wide map visible to every IP and the plugin.
//! Both are keyed by [`StateKey<T>`] constants, which pair an entry name with the
//! type stored under it, so a lookup either yields a `T` or a named fault.

use crate::engine::errors::{FungeError, FungeResult};
use rustc_hash::FxHashMap;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Name of an entry together with the type stored under it
pub struct StateKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    pub const fn new(name: &'static str) -> Self {
        StateKey {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({})", self.name)
    }
}

/// Values storable in a [`StateBag`]
pub trait Slot: Any + Send + fmt::Debug {
    fn clone_slot(&self) -> Box<dyn Slot>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + Send + fmt::Debug + Clone> Slot for T {
    fn clone_slot(&self) -> Box<dyn Slot> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Per-IP state: operand stack, mode flags, PRNG, whatever a language needs
#[derive(Debug, Default)]
pub struct StateBag {
    slots: FxHashMap<&'static str, Box<dyn Slot>>,
}

impl Clone for StateBag {
    fn clone(&self) -> Self {
        StateBag {
            slots: self
                .slots
                .iter()
                .map(|(name, slot)| (*name, slot.clone_slot()))
                .collect(),
        }
    }
}

impl StateBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any previous entry under the same name
    pub fn insert<T: Slot>(&mut self, key: &StateKey<T>, value: T) {
        self.slots.insert(key.name, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: &StateKey<T>) -> FungeResult<&T> {
        let slot = self
            .slots
            .get(key.name)
            .ok_or(FungeError::MissingState { key: key.name })?;
        slot.as_any()
            .downcast_ref::<T>()
            .ok_or(FungeError::StateTypeMismatch { key: key.name })
    }

    pub fn get_mut<T: 'static>(&mut self, key: &StateKey<T>) -> FungeResult<&mut T> {
        let slot = self
            .slots
            .get_mut(key.name)
            .ok_or(FungeError::MissingState { key: key.name })?;
        slot.as_any_mut()
            .downcast_mut::<T>()
            .ok_or(FungeError::StateTypeMismatch { key: key.name })
    }

    pub fn remove<T: 'static>(&mut self, key: &StateKey<T>) -> Option<T> {
        let slot = self.slots.remove(key.name)?;
        slot.into_any().downcast::<T>().ok().map(|value| *value)
    }

    pub fn contains<T>(&self, key: &StateKey<T>) -> bool {
        self.slots.contains_key(key.name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Process-wide state shared by every IP; the seam for I/O handles and other globals
#[derive(Default)]
pub struct SharedState {
    entries: FxHashMap<&'static str, Box<dyn Any + Send>>,
}

impl fmt::Debug for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        f.debug_struct("SharedState").field("keys", &keys).finish()
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any + Send>(&mut self, key: &StateKey<T>, value: T) {
        self.entries.insert(key.name, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: &StateKey<T>) -> FungeResult<&T> {
        let entry = self
            .entries
            .get(key.name)
            .ok_or(FungeError::MissingState { key: key.name })?;
        entry
            .downcast_ref::<T>()
            .ok_or(FungeError::StateTypeMismatch { key: key.name })
    }

    pub fn get_mut<T: 'static>(&mut self, key: &StateKey<T>) -> FungeResult<&mut T> {
        let entry = self
            .entries
            .get_mut(key.name)
            .ok_or(FungeError::MissingState { key: key.name })?;
        entry
            .downcast_mut::<T>()
            .ok_or(FungeError::StateTypeMismatch { key: key.name })
    }

    pub fn remove<T: 'static>(&mut self, key: &StateKey<T>) -> Option<T> {
        let entry = self.entries.remove(key.name)?;
        entry.downcast::<T>().ok().map(|value| *value)
    }

    pub fn contains<T>(&self, key: &StateKey<T>) -> bool {
        self.entries.contains_key(key.name)
    }
}
