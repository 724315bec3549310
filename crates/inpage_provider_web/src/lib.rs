//! Browser adapters for the in-page wallet provider.
//!
//! Implements the core crate's host traits against `window`: a global binder that builds
//! `Proxy` façades for the provider and the legacy `web3` shim, a duplex-stream transport, and
//! an event-loop spawner. On `wasm32` the crate also exports `initializeProvider` and
//! `createProvider` to page scripts. Non-wasm targets compile the same API against a fallback
//! that reports the host as unavailable.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod binder;
pub mod spawner;
pub mod stream;

mod interop;

#[cfg(target_arch = "wasm32")]
pub mod decode;
#[cfg(target_arch = "wasm32")]
mod entry;

pub use binder::{browser_environment, WindowEnvironmentBinder};
pub use spawner::BrowserSpawner;
pub use stream::DuplexStreamTransport;
