//! Node-style duplex stream transport.

use inpage_provider::{ProviderTransport, RpcRequest, TransportCapabilities, TransportFuture};
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::interop;

#[derive(Debug, Clone)]
/// Transport over a page-supplied duplex stream.
///
/// Requests are written as JSON-RPC payloads, framed as `{ name, data }` when a sub-stream name
/// is configured. Response routing belongs to the wallet's multiplexing engine, so a send
/// resolves once the stream accepts the write.
pub struct DuplexStreamTransport {
    stream: JsValue,
    stream_name: Option<String>,
}

impl DuplexStreamTransport {
    /// Wraps `stream`, optionally framing writes for the named sub-stream.
    pub fn new(stream: JsValue, stream_name: Option<String>) -> Self {
        Self {
            stream,
            stream_name,
        }
    }

    /// Configured sub-stream name.
    pub fn stream_name(&self) -> Option<&str> {
        self.stream_name.as_deref()
    }
}

impl ProviderTransport for DuplexStreamTransport {
    fn capabilities(&self) -> TransportCapabilities {
        interop::stream_capabilities(&self.stream)
    }

    fn send<'a>(&'a self, request: RpcRequest) -> TransportFuture<'a, Result<Value, String>> {
        Box::pin(async move {
            interop::write_rpc(&self.stream, self.stream_name.as_deref(), &request).await
        })
    }
}
