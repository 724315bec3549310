//! Host-agnostic core of the in-page wallet provider.
//!
//! This crate validates the caller-supplied transport and options, builds the provider and its
//! connection state, wraps it in an identity-protecting handle, and installs it (plus the legacy
//! `web3` shim) through an injected [`EnvironmentBinder`]. Browser bindings live in
//! `inpage_provider_web`; everything here runs and tests natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod binder;
pub mod error;
pub mod guard;
pub mod initialize;
pub mod installer;
pub mod logger;
pub mod messages;
pub mod options;
pub mod provider;
pub mod shim;
pub mod state;
pub mod surface;
pub mod transport;
pub mod validate;

pub use binder::{
    BinderCall, BoundValue, EnvironmentBinder, MemoryEnvironmentBinder, SlotAttributes,
};
pub use error::ProviderError;
pub use guard::ProtectedProvider;
pub use initialize::{initialize_provider, HostEnvironment, InitializeOptions};
pub use installer::{set_global_provider, PROVIDER_GLOBAL_SLOT, PROVIDER_INITIALIZED_EVENT};
pub use logger::{
    ConsoleLogger, LogLevel, LogSink, Logger, MemoryLogger, RawLogger, RawLoggerMethod,
    RawLoggerMethods, SinkLogger, LOGGER_METHODS,
};
pub use options::{
    OptionsArg, ProviderOptions, RawProviderOptions, ReceivedValue,
    DEFAULT_MAX_EVENT_LISTENERS, DEFAULT_SHOULD_SEND_METADATA,
};
pub use provider::{
    InpageProvider, RequestArguments, PROVIDER_MARKER, PROVIDER_STATE_PROPERTIES,
};
pub use shim::{
    shim_web3, LegacyShim, ShimState, ShimValue, CURRENT_PROVIDER, LEGACY_GLOBAL_SLOT,
    LEGACY_SLOT_ATTRIBUTES, SHIM_MARKER, SHIM_USAGE_METHOD,
};
pub use state::{ConnectionState, ConnectionStateHandle};
pub use surface::PropertySurface;
pub use transport::{
    MemoryTransport, ProviderTransport, RpcRequest, TransportCapabilities, TransportFuture,
};
pub use validate::{validate_options, validate_provider_args};
