//! Transport capability contracts.
//!
//! The transport is the only channel into the wallet. The JSON-RPC engine that multiplexes it
//! lives behind [`ProviderTransport::send`]; this crate only checks the channel's capabilities
//! and forwards validated requests.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object-safe boxed future used by [`ProviderTransport`].
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Capability snapshot of a bidirectional stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportCapabilities {
    /// Incoming messages can be read.
    pub readable: bool,
    /// Outgoing messages can be written.
    pub writable: bool,
}

impl TransportCapabilities {
    /// Fully capable duplex stream.
    pub const fn duplex() -> Self {
        Self {
            readable: true,
            writable: true,
        }
    }

    /// Returns whether both directions are available.
    pub const fn is_duplex(self) -> bool {
        self.readable && self.writable
    }
}

/// JSON-RPC request forwarded to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version tag.
    pub jsonrpc: String,
    /// Monotonic request id, unique per provider.
    pub id: u64,
    /// RPC method name.
    pub method: String,
    /// Positional or named params.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    /// Builds a JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Bidirectional stream into the wallet.
pub trait ProviderTransport {
    /// Reports which directions this stream supports.
    fn capabilities(&self) -> TransportCapabilities;

    /// Sends one request and resolves with its result.
    fn send<'a>(&'a self, request: RpcRequest) -> TransportFuture<'a, Result<Value, String>>;
}

#[derive(Debug, Clone)]
/// In-memory transport that records requests and answers from a fixed outcome.
pub struct MemoryTransport {
    capabilities: TransportCapabilities,
    outcome: Result<Value, String>,
    sent: Rc<RefCell<Vec<RpcRequest>>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self {
            capabilities: TransportCapabilities::duplex(),
            outcome: Ok(Value::Null),
            sent: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl MemoryTransport {
    /// Transport advertising `capabilities`.
    pub fn with_capabilities(capabilities: TransportCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Transport that fails every request with `error`.
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            outcome: Err(error.into()),
            ..Self::default()
        }
    }

    /// Returns every request sent so far.
    pub fn sent(&self) -> Vec<RpcRequest> {
        self.sent.borrow().clone()
    }
}

impl ProviderTransport for MemoryTransport {
    fn capabilities(&self) -> TransportCapabilities {
        self.capabilities
    }

    fn send<'a>(&'a self, request: RpcRequest) -> TransportFuture<'a, Result<Value, String>> {
        Box::pin(async move {
            self.sent.borrow_mut().push(request);
            self.outcome.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;

    #[test]
    fn duplex_requires_both_directions() {
        assert!(TransportCapabilities::duplex().is_duplex());
        assert!(!TransportCapabilities {
            readable: true,
            writable: false
        }
        .is_duplex());
        assert!(!TransportCapabilities::default().is_duplex());
    }

    #[test]
    fn request_serializes_without_absent_params() {
        let raw = serde_json::to_value(RpcRequest::new(7, "eth_chainId", None)).expect("json");
        assert_eq!(raw, json!({"jsonrpc": "2.0", "id": 7, "method": "eth_chainId"}));
    }

    #[test]
    fn memory_transport_records_and_answers() {
        let transport = MemoryTransport::failing("offline");
        let transport_obj: &dyn ProviderTransport = &transport;

        let result = block_on(transport_obj.send(RpcRequest::new(1, "net_version", None)));
        assert_eq!(result, Err("offline".to_string()));
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.sent()[0].method, "net_version");
    }
}
