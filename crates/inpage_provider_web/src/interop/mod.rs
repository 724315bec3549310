//! Shared host interop for the browser adapters.
//!
//! Routes calls to the `wasm32` implementation or to a non-wasm fallback so adapters keep one
//! API on every target.

use std::rc::Rc;

use futures::task::{LocalFutureObj, SpawnError};
use inpage_provider::{
    LegacyShim, ProtectedProvider, RpcRequest, SlotAttributes, TransportCapabilities,
};
use serde_json::Value;
use wasm_bindgen::JsValue;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

#[cfg(target_arch = "wasm32")]
pub use wasm::{js_error, js_to_raw, js_to_received, provider_object};

pub fn global_is_bound(name: &str) -> Result<bool, String> {
    imp::global_is_bound(name)
}

pub fn bind_provider(
    name: &str,
    provider: &ProtectedProvider,
    attributes: SlotAttributes,
) -> Result<(), String> {
    imp::bind_provider(name, provider, attributes)
}

pub fn bind_legacy_shim(
    name: &str,
    shim: Rc<LegacyShim>,
    attributes: SlotAttributes,
) -> Result<(), String> {
    imp::bind_legacy_shim(name, shim, attributes)
}

pub fn dispatch_event(name: &str) -> Result<(), String> {
    imp::dispatch_event(name)
}

pub fn spawn_local(future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
    imp::spawn_local(future)
}

pub fn stream_capabilities(stream: &JsValue) -> TransportCapabilities {
    imp::stream_capabilities(stream)
}

pub async fn write_rpc(
    stream: &JsValue,
    stream_name: Option<&str>,
    request: &RpcRequest,
) -> Result<Value, String> {
    imp::write_rpc(stream, stream_name, request).await
}
