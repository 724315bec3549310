//! Legacy `window.web3` compatibility shim.
//!
//! Installed only when the page has no `web3` global. The shim exposes the provider as
//! `currentProvider` and turns every other use into diagnostics: one warning for the first
//! `currentProvider` read, one error plus one usage report for the first read of anything else,
//! and a warning for every write.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    rc::Rc,
};

use futures::task::{LocalSpawn, LocalSpawnExt};
use serde_json::Value;

use crate::{
    binder::{BoundValue, EnvironmentBinder, SlotAttributes},
    error::ProviderError,
    guard::ProtectedProvider,
    logger::Logger,
    messages,
    provider::RequestArguments,
};

/// Host-global slot holding the shim.
pub const LEGACY_GLOBAL_SLOT: &str = "web3";
/// Marker property identifying the shim; always `true`.
pub const SHIM_MARKER: &str = "__isezDeFiShim__";
/// RPC method used to report shim usage.
pub const SHIM_USAGE_METHOD: &str = "ezDeFi_logWeb3ShimUsage";
/// Shim property holding the provider.
pub const CURRENT_PROVIDER: &str = "currentProvider";

/// Attributes of the `web3` slot itself.
pub const LEGACY_SLOT_ATTRIBUTES: SlotAttributes = SlotAttributes {
    enumerable: false,
    configurable: true,
    writable: true,
};

/// Value held by a shim property.
#[derive(Debug, Clone)]
pub enum ShimValue {
    /// The wrapped provider.
    Provider(ProtectedProvider),
    /// Any other value.
    Data(Value),
}

impl ShimValue {
    /// Returns the provider, if this is one.
    pub fn as_provider(&self) -> Option<&ProtectedProvider> {
        match self {
            Self::Provider(provider) => Some(provider),
            Self::Data(_) => None,
        }
    }
}

/// One-shot logging flags for a shim installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShimState {
    /// The `currentProvider` deprecation warning was emitted.
    pub logged_current_provider_access: bool,
    /// The missing-web3 error and usage report were emitted.
    pub logged_other_property_access: bool,
}

/// The `web3` compatibility object.
pub struct LegacyShim {
    provider: ProtectedProvider,
    fields: RefCell<BTreeMap<String, ShimValue>>,
    logger: Rc<dyn Logger>,
    spawner: Rc<dyn LocalSpawn>,
    logged_current_provider_access: Cell<bool>,
    logged_other_property_access: Cell<bool>,
}

impl LegacyShim {
    /// Builds a shim exposing `provider` as `currentProvider`.
    pub fn new(
        provider: ProtectedProvider,
        logger: Rc<dyn Logger>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            CURRENT_PROVIDER.to_string(),
            ShimValue::Provider(provider.clone()),
        );
        Self {
            provider,
            fields: RefCell::new(fields),
            logger,
            spawner,
            logged_current_provider_access: Cell::new(false),
            logged_other_property_access: Cell::new(false),
        }
    }

    /// Current one-shot flags.
    pub fn state(&self) -> ShimState {
        ShimState {
            logged_current_provider_access: self.logged_current_provider_access.get(),
            logged_other_property_access: self.logged_other_property_access.get(),
        }
    }

    /// The provider exposed as `currentProvider`.
    pub fn provider(&self) -> &ProtectedProvider {
        &self.provider
    }

    /// Reads `currentProvider`.
    pub fn current_provider(&self) -> Option<ShimValue> {
        self.read(CURRENT_PROVIDER)
    }

    /// Emits the first-access diagnostics for a read of `name` without reading anything.
    ///
    /// Hosts that keep shim values elsewhere call this from their read hook.
    pub fn note_read(&self, name: &str) {
        if name == SHIM_MARKER {
            return;
        }
        if name == CURRENT_PROVIDER {
            if !self.logged_current_provider_access.replace(true) {
                self.logger
                    .warn(messages::warnings::WEB3_CURRENT_PROVIDER_ACCESS);
            }
        } else if !self.logged_other_property_access.replace(true) {
            self.logger.error(&messages::errors::web3_not_injected());
            self.report_usage();
        }
    }

    /// Emits the deprecation warning every write carries.
    pub fn note_write(&self) {
        self.logger.warn(messages::warnings::WEB3_SHIM_WRITE);
    }

    /// Reads a property, emitting first-access diagnostics.
    ///
    /// The value is returned whether or not anything was logged.
    pub fn read(&self, name: &str) -> Option<ShimValue> {
        if name == SHIM_MARKER {
            return Some(ShimValue::Data(Value::Bool(true)));
        }
        self.note_read(name);
        self.fields.borrow().get(name).cloned()
    }

    /// Writes a property after emitting a deprecation warning.
    ///
    /// Returns `false` for the read-only marker, which keeps its value.
    pub fn write(&self, name: &str, value: ShimValue) -> bool {
        self.note_write();
        if name == SHIM_MARKER {
            return false;
        }
        self.fields.borrow_mut().insert(name.to_string(), value);
        true
    }

    /// Deletes an ordinary property; the marker cannot be deleted.
    pub fn delete(&self, name: &str) -> bool {
        if name == SHIM_MARKER {
            return false;
        }
        self.fields.borrow_mut().remove(name);
        true
    }

    /// Enumerable property names; the marker is not enumerable.
    pub fn keys(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    /// Returns whether `name` exists on the shim, without logging.
    pub fn has(&self, name: &str) -> bool {
        name == SHIM_MARKER || self.fields.borrow().contains_key(name)
    }

    fn report_usage(&self) {
        let provider = self.provider.clone();
        let logger = self.logger.clone();
        let report = async move {
            if let Err(err) = provider
                .request(RequestArguments::new(SHIM_USAGE_METHOD))
                .await
            {
                logger.debug(&messages::debug::web3_shim_usage_failed(&err.to_string()));
            }
        };
        if let Err(err) = self.spawner.spawn_local(report) {
            self.logger
                .debug(&messages::debug::web3_shim_usage_failed(&err.to_string()));
        }
    }
}

impl fmt::Debug for LegacyShim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyShim")
            .field("keys", &self.keys())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Installs the shim at `window.web3` unless that slot is already populated.
///
/// Returns the installed shim, or `None` when the page already had a `web3` global, in which
/// case nothing is constructed and the existing value is untouched.
///
/// # Errors
///
/// Returns [`ProviderError::Host`] when the binder refuses the assignment.
pub fn shim_web3<B: EnvironmentBinder + ?Sized>(
    binder: &B,
    provider: &ProtectedProvider,
    logger: Rc<dyn Logger>,
    spawner: Rc<dyn LocalSpawn>,
) -> Result<Option<Rc<LegacyShim>>, ProviderError> {
    if binder.is_bound(LEGACY_GLOBAL_SLOT) {
        return Ok(None);
    }
    let shim = Rc::new(LegacyShim::new(provider.clone(), logger, spawner));
    binder
        .bind(
            LEGACY_GLOBAL_SLOT,
            BoundValue::LegacyShim(shim.clone()),
            LEGACY_SLOT_ATTRIBUTES,
        )
        .map_err(ProviderError::Host)?;
    Ok(Some(shim))
}
