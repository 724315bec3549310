//! Environment binder: the only way core code touches host globals.
//!
//! Production wiring supplies a window-backed binder; tests use [`MemoryEnvironmentBinder`].

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use crate::{guard::ProtectedProvider, shim::LegacyShim};

/// Property attributes for a host-global slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAttributes {
    /// Slot shows up when the host enumerates its globals.
    pub enumerable: bool,
    /// Slot can be redefined or deleted.
    pub configurable: bool,
    /// Slot can be reassigned.
    pub writable: bool,
}

impl SlotAttributes {
    /// Attributes of a plain assignment.
    pub const fn assignment() -> Self {
        Self {
            enumerable: true,
            configurable: true,
            writable: true,
        }
    }
}

/// Value installed into a host-global slot.
#[derive(Clone)]
pub enum BoundValue {
    /// The wrapped provider.
    Provider(ProtectedProvider),
    /// The legacy `web3` shim.
    LegacyShim(Rc<LegacyShim>),
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(provider) => f.debug_tuple("Provider").field(provider).finish(),
            Self::LegacyShim(_) => f.write_str("LegacyShim(..)"),
        }
    }
}

/// Host-global binding and event dispatch.
pub trait EnvironmentBinder {
    /// Returns whether the named slot currently holds a truthy value.
    fn is_bound(&self, name: &str) -> bool;

    /// Installs `value` at `name` with `attributes`.
    fn bind(&self, name: &str, value: BoundValue, attributes: SlotAttributes)
        -> Result<(), String>;

    /// Synchronously dispatches a payload-less event named `event_name`.
    fn announce(&self, event_name: &str) -> Result<(), String>;
}

/// One call observed by [`MemoryEnvironmentBinder`].
#[derive(Debug, Clone)]
pub enum BinderCall {
    /// A slot assignment.
    Bind {
        /// Slot name.
        name: String,
        /// Attributes used for the slot.
        attributes: SlotAttributes,
    },
    /// An event dispatch.
    Announce {
        /// Event name.
        event_name: String,
    },
}

#[derive(Debug, Clone, Default)]
/// In-memory binder that records calls and keeps bound values, shared across clones.
pub struct MemoryEnvironmentBinder {
    slots: Rc<RefCell<BTreeMap<String, BoundValue>>>,
    calls: Rc<RefCell<Vec<BinderCall>>>,
}

impl MemoryEnvironmentBinder {
    /// Returns the value currently bound at `name`.
    pub fn slot(&self, name: &str) -> Option<BoundValue> {
        self.slots.borrow().get(name).cloned()
    }

    /// Returns every call in order.
    pub fn calls(&self) -> Vec<BinderCall> {
        self.calls.borrow().clone()
    }

    /// Seeds a slot without recording a call, as if page code had set it first.
    pub fn preset(&self, name: impl Into<String>, value: BoundValue) {
        self.slots.borrow_mut().insert(name.into(), value);
    }
}

impl EnvironmentBinder for MemoryEnvironmentBinder {
    fn is_bound(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    fn bind(
        &self,
        name: &str,
        value: BoundValue,
        attributes: SlotAttributes,
    ) -> Result<(), String> {
        self.slots.borrow_mut().insert(name.to_string(), value);
        self.calls.borrow_mut().push(BinderCall::Bind {
            name: name.to_string(),
            attributes,
        });
        Ok(())
    }

    fn announce(&self, event_name: &str) -> Result<(), String> {
        self.calls.borrow_mut().push(BinderCall::Announce {
            event_name: event_name.to_string(),
        });
        Ok(())
    }
}
