//! The in-page provider: validated construction, connection-state reads, and request
//! forwarding.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ProviderError,
    logger::Logger,
    options::{OptionsArg, ProviderOptions},
    state::{ConnectionState, ConnectionStateHandle},
    surface::PropertySurface,
    transport::{ProviderTransport, RpcRequest, TransportFuture},
    validate::validate_provider_args,
};

/// Property that identifies the provider to page scripts.
pub const PROVIDER_MARKER: &str = "isezDeFi";

const CHAIN_ID: &str = "chainId";
const NETWORK_VERSION: &str = "networkVersion";
const SELECTED_ADDRESS: &str = "selectedAddress";
const AUTO_REFRESH: &str = "autoRefreshOnNetworkChange";

/// Properties backed by connection state rather than stored on the provider object.
pub const PROVIDER_STATE_PROPERTIES: [&str; 5] = [
    PROVIDER_MARKER,
    CHAIN_ID,
    NETWORK_VERSION,
    SELECTED_ADDRESS,
    AUTO_REFRESH,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Arguments accepted by [`InpageProvider::request`].
pub struct RequestArguments {
    /// RPC method name; must be non-empty.
    pub method: String,
    /// Optional params; must be an array or an object when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    /// Request without params.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }

    /// Request with params.
    pub fn with_params(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params: Some(params),
        }
    }

    /// Checks method and params shape.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidRequestMethod`] for an empty method and
    /// [`ProviderError::InvalidRequestParams`] for scalar or `null` params.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.method.is_empty() {
            return Err(ProviderError::InvalidRequestMethod);
        }
        match &self.params {
            None | Some(Value::Array(_)) | Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(ProviderError::InvalidRequestParams),
        }
    }
}

impl TryFrom<Value> for RequestArguments {
    type Error = ProviderError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(ProviderError::InvalidRequestArgs);
        };
        let method = match fields.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(ProviderError::InvalidRequestMethod),
        };
        Ok(Self {
            method,
            params: fields.remove("params"),
        })
    }
}

/// Wallet provider bound to one transport.
pub struct InpageProvider {
    transport: Rc<dyn ProviderTransport>,
    options: ProviderOptions,
    state: Rc<RefCell<ConnectionState>>,
    expandos: RefCell<BTreeMap<String, Value>>,
    next_request_id: Cell<u64>,
}

impl InpageProvider {
    /// Validates `transport` and `options`, then builds a disconnected provider.
    ///
    /// # Errors
    ///
    /// Returns the first construction failure reported by [`validate_provider_args`]; no
    /// provider state exists in that case.
    pub fn new(
        transport: Option<Rc<dyn ProviderTransport>>,
        options: impl Into<OptionsArg>,
    ) -> Result<Self, ProviderError> {
        let (transport, options) = validate_provider_args(transport, options.into())?;
        Ok(Self {
            transport,
            options,
            state: Rc::new(RefCell::new(ConnectionState::default())),
            expandos: RefCell::new(BTreeMap::new()),
            next_request_id: Cell::new(1),
        })
    }

    /// Validated configuration.
    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Diagnostic sinks configured for this provider.
    pub fn logger(&self) -> &Rc<dyn Logger> {
        self.options.logger()
    }

    /// Returns whether the wallet connection is live.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().is_connected
    }

    /// Hex chain id, once known.
    pub fn chain_id(&self) -> Option<String> {
        self.state.borrow().chain_id.clone()
    }

    /// Decimal network id, once known.
    pub fn network_version(&self) -> Option<String> {
        self.state.borrow().network_version.clone()
    }

    /// The currently selected account, if any are exposed.
    pub fn selected_address(&self) -> Option<String> {
        self.state.borrow().accounts.first().cloned()
    }

    /// Returns the mutation seam for the connection-lifecycle layer.
    pub fn connection_state_handle(&self) -> ConnectionStateHandle {
        ConnectionStateHandle::new(self.state.clone(), self.logger().clone())
    }

    /// Validates `args` and forwards them to the wallet as a JSON-RPC request.
    pub fn request<'a>(
        &'a self,
        args: RequestArguments,
    ) -> TransportFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            args.validate()?;
            let id = self.next_request_id.get();
            self.next_request_id.set(id.wrapping_add(1));
            self.transport
                .send(RpcRequest::new(id, args.method, args.params))
                .await
                .map_err(ProviderError::Rpc)
        })
    }

    fn state_property(&self, name: &str) -> Option<Value> {
        let state = self.state.borrow();
        match name {
            PROVIDER_MARKER => Some(Value::Bool(true)),
            CHAIN_ID => Some(optional_string(state.chain_id.as_deref())),
            NETWORK_VERSION => Some(optional_string(state.network_version.as_deref())),
            SELECTED_ADDRESS => Some(optional_string(
                state.accounts.first().map(String::as_str),
            )),
            AUTO_REFRESH => Some(Value::Bool(state.auto_refresh_on_network_change)),
            _ => None,
        }
    }
}

fn optional_string(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::String(text.to_string()))
}

impl PropertySurface for InpageProvider {
    fn get_property(&self, name: &str) -> Option<Value> {
        self.state_property(name)
            .or_else(|| self.expandos.borrow().get(name).cloned())
    }

    fn set_property(&self, name: &str, value: Value) -> bool {
        if name == AUTO_REFRESH {
            return match value {
                Value::Bool(enabled) => {
                    self.state.borrow_mut().auto_refresh_on_network_change = enabled;
                    true
                }
                _ => false,
            };
        }
        if PROVIDER_STATE_PROPERTIES.contains(&name) {
            return false;
        }
        self.expandos.borrow_mut().insert(name.to_string(), value);
        true
    }

    fn delete_property(&self, name: &str) -> bool {
        if PROVIDER_STATE_PROPERTIES.contains(&name) {
            return false;
        }
        self.expandos.borrow_mut().remove(name);
        true
    }

    fn property_names(&self) -> Vec<String> {
        PROVIDER_STATE_PROPERTIES
            .iter()
            .map(|name| name.to_string())
            .chain(self.expandos.borrow().keys().cloned())
            .collect()
    }
}
