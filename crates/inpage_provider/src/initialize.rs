//! Top-level wiring: validate, construct, wrap, then optionally install and shim.

use std::rc::Rc;

use futures::task::LocalSpawn;

use crate::{
    binder::EnvironmentBinder,
    error::ProviderError,
    guard::ProtectedProvider,
    installer::set_global_provider,
    options::OptionsArg,
    provider::InpageProvider,
    shim::shim_web3,
    transport::ProviderTransport,
};

/// Arguments for [`initialize_provider`].
#[derive(Clone)]
pub struct InitializeOptions {
    /// Stream connecting the page to the wallet.
    pub connection_stream: Option<Rc<dyn ProviderTransport>>,
    /// Provider options bag.
    pub provider: OptionsArg,
    /// Install the provider as `window.ethereum`.
    pub should_set_on_window: bool,
    /// Install the `window.web3` compatibility shim.
    pub should_shim_web3: bool,
}

impl InitializeOptions {
    /// Options for `connection_stream` with the default install behavior.
    pub fn new(connection_stream: Rc<dyn ProviderTransport>) -> Self {
        Self {
            connection_stream: Some(connection_stream),
            ..Self::default()
        }
    }
}

impl Default for InitializeOptions {
    fn default() -> Self {
        Self {
            connection_stream: None,
            provider: OptionsArg::Omitted,
            should_set_on_window: true,
            should_shim_web3: false,
        }
    }
}

/// Host collaborators needed to install the provider.
#[derive(Clone)]
pub struct HostEnvironment {
    /// Global binding and event dispatch.
    pub binder: Rc<dyn EnvironmentBinder>,
    /// Executor for fire-and-forget work.
    pub spawner: Rc<dyn LocalSpawn>,
}

/// Builds the provider, wraps it, and installs it according to `options`.
///
/// Returns the wrapped provider whether or not it was installed.
///
/// # Errors
///
/// Returns a construction failure before anything is bound, or [`ProviderError::Host`] when the
/// environment refuses an installation step.
pub fn initialize_provider(
    options: InitializeOptions,
    environment: &HostEnvironment,
) -> Result<ProtectedProvider, ProviderError> {
    let provider = ProtectedProvider::new(InpageProvider::new(
        options.connection_stream,
        options.provider,
    )?);

    if options.should_set_on_window {
        set_global_provider(environment.binder.as_ref(), &provider)?;
    }

    if options.should_shim_web3 {
        shim_web3(
            environment.binder.as_ref(),
            &provider,
            provider.logger().clone(),
            environment.spawner.clone(),
        )?;
    }

    Ok(provider)
}
