//! `window`-backed environment binder and the browser host bundle.

use std::rc::Rc;

use inpage_provider::{BoundValue, EnvironmentBinder, HostEnvironment, SlotAttributes};

use crate::{interop, spawner::BrowserSpawner};

#[derive(Debug, Clone, Copy, Default)]
/// Binder that writes page globals on `window` and dispatches events there.
pub struct WindowEnvironmentBinder;

impl EnvironmentBinder for WindowEnvironmentBinder {
    fn is_bound(&self, name: &str) -> bool {
        interop::global_is_bound(name).unwrap_or(false)
    }

    fn bind(
        &self,
        name: &str,
        value: BoundValue,
        attributes: SlotAttributes,
    ) -> Result<(), String> {
        match value {
            BoundValue::Provider(provider) => interop::bind_provider(name, &provider, attributes),
            BoundValue::LegacyShim(shim) => interop::bind_legacy_shim(name, shim, attributes),
        }
    }

    fn announce(&self, event_name: &str) -> Result<(), String> {
        interop::dispatch_event(event_name)
    }
}

/// Returns the browser host bundle: `window` binder plus event-loop spawner.
pub fn browser_environment() -> HostEnvironment {
    HostEnvironment {
        binder: Rc::new(WindowEnvironmentBinder),
        spawner: Rc::new(BrowserSpawner),
    }
}

#[cfg(test)]
mod tests {
    use inpage_provider::{
        initialize_provider, InitializeOptions, MemoryTransport, ProviderError,
        PROVIDER_INITIALIZED_EVENT,
    };

    use pretty_assertions::assert_eq;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn window_binder_non_wasm_parity() {
        let expected = "Browser host APIs are only available when compiled for wasm32".to_string();
        let binder = WindowEnvironmentBinder;

        assert!(!binder.is_bound("ethereum"));
        assert_eq!(
            binder
                .announce(PROVIDER_INITIALIZED_EVENT)
                .expect_err("announce should fail"),
            expected
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn browser_install_surfaces_host_failure_outside_wasm() {
        let environment = browser_environment();
        let err = initialize_provider(
            InitializeOptions::new(Rc::new(MemoryTransport::default())),
            &environment,
        )
        .expect_err("window install should fail natively");
        assert_eq!(
            err,
            ProviderError::Host(
                "Browser host APIs are only available when compiled for wasm32".to_string()
            )
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn browser_environment_allows_detached_providers() {
        let environment = browser_environment();
        let options = InitializeOptions {
            should_set_on_window: false,
            ..InitializeOptions::new(Rc::new(MemoryTransport::default()))
        };
        let provider = initialize_provider(options, &environment).expect("detached provider");
        assert!(!provider.is_connected());
    }
}
