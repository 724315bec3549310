//! Installs the provider as `window.ethereum` and announces it.

use crate::{
    binder::{BoundValue, EnvironmentBinder, SlotAttributes},
    error::ProviderError,
    guard::ProtectedProvider,
    logger::Logger,
    messages,
};

/// Host-global slot holding the provider.
pub const PROVIDER_GLOBAL_SLOT: &str = "ethereum";
/// Event dispatched once the provider slot is populated.
pub const PROVIDER_INITIALIZED_EVENT: &str = "ethereum#initialized";

/// Assigns `provider` to the global slot, then dispatches the readiness event.
///
/// Repeated calls overwrite the slot and dispatch again; an overwrite is logged at info level.
///
/// # Errors
///
/// Returns [`ProviderError::Host`] when the binder refuses the assignment or the dispatch. A
/// failed assignment never dispatches.
pub fn set_global_provider<B: EnvironmentBinder + ?Sized>(
    binder: &B,
    provider: &ProtectedProvider,
) -> Result<(), ProviderError> {
    if binder.is_bound(PROVIDER_GLOBAL_SLOT) {
        provider
            .logger()
            .info(&messages::info::replacing_global_provider(PROVIDER_GLOBAL_SLOT));
    }
    binder
        .bind(
            PROVIDER_GLOBAL_SLOT,
            BoundValue::Provider(provider.clone()),
            SlotAttributes::assignment(),
        )
        .map_err(ProviderError::Host)?;
    binder
        .announce(PROVIDER_INITIALIZED_EVENT)
        .map_err(ProviderError::Host)
}
