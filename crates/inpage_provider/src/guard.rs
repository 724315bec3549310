//! Identity-protecting wrapper around the singleton provider.
//!
//! Some consumer libraries (web3@1.x among them) delete provider properties while feature
//! probing. The wrapper reports every delete as successful and performs none; everything else
//! reaches the provider unchanged.

use std::{fmt, ops::Deref, rc::Rc};

use serde_json::Value;

use crate::{provider::InpageProvider, surface::PropertySurface};

/// Shared handle to a provider whose properties cannot be deleted.
#[derive(Clone)]
pub struct ProtectedProvider {
    inner: Rc<InpageProvider>,
}

impl ProtectedProvider {
    /// Wraps `provider`.
    pub fn new(provider: InpageProvider) -> Self {
        Self {
            inner: Rc::new(provider),
        }
    }

    /// Returns whether `self` and `other` wrap the same provider instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for ProtectedProvider {
    type Target = InpageProvider;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PropertySurface for ProtectedProvider {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.inner.get_property(name)
    }

    fn set_property(&self, name: &str, value: Value) -> bool {
        self.inner.set_property(name, value)
    }

    fn delete_property(&self, _name: &str) -> bool {
        true
    }

    fn property_names(&self) -> Vec<String> {
        self.inner.property_names()
    }
}

impl fmt::Debug for ProtectedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtectedProvider")
            .field("is_connected", &self.inner.is_connected())
            .finish_non_exhaustive()
    }
}
