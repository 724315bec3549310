//! Provider configuration: the untrusted options bag and its validated form.

use std::{fmt, rc::Rc};

use serde_json::Value;

use crate::logger::{ConsoleLogger, Logger, RawLogger};

/// Default `maxEventListeners`.
pub const DEFAULT_MAX_EVENT_LISTENERS: u32 = 100;
/// Default `shouldSendMetadata`.
pub const DEFAULT_SHOULD_SEND_METADATA: bool = true;

/// One options value exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedValue {
    /// Any JSON-representable value.
    Json(Value),
    /// `NaN` or an infinity, which JSON cannot carry.
    NonFinite(f64),
}

impl ReceivedValue {
    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Json(value) => value.as_f64(),
            Self::NonFinite(number) => Some(*number),
        }
    }

    /// Boolean view of the value, if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Json(value) => value.as_bool(),
            Self::NonFinite(_) => None,
        }
    }
}

impl From<Value> for ReceivedValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<f64> for ReceivedValue {
    fn from(number: f64) -> Self {
        serde_json::Number::from_f64(number)
            .map_or(Self::NonFinite(number), |number| Self::Json(Value::Number(number)))
    }
}

#[derive(Debug, Clone, Default)]
/// Options bag fields exactly as the caller supplied them.
pub struct RawProviderOptions {
    /// Name of the multiplexed JSON-RPC sub-stream.
    pub json_rpc_stream_name: Option<String>,
    /// Raw `maxEventListeners`.
    pub max_event_listeners: Option<ReceivedValue>,
    /// Raw `shouldSendMetadata`.
    pub should_send_metadata: Option<ReceivedValue>,
    /// Raw `logger`.
    pub logger: Option<RawLogger>,
}

#[derive(Debug, Clone, Default)]
/// The options argument as received by the provider constructor.
pub enum OptionsArg {
    /// No options were passed; every field takes its default.
    #[default]
    Omitted,
    /// A record whose fields still need validation.
    Record(RawProviderOptions),
    /// A value that is not a record, including `null`.
    Invalid(ReceivedValue),
}

impl From<RawProviderOptions> for OptionsArg {
    fn from(options: RawProviderOptions) -> Self {
        Self::Record(options)
    }
}

/// Validated, immutable provider configuration.
#[derive(Clone)]
pub struct ProviderOptions {
    json_rpc_stream_name: Option<String>,
    max_event_listeners: u32,
    should_send_metadata: bool,
    logger: Rc<dyn Logger>,
}

impl ProviderOptions {
    pub(crate) fn new(
        json_rpc_stream_name: Option<String>,
        max_event_listeners: u32,
        should_send_metadata: bool,
        logger: Rc<dyn Logger>,
    ) -> Self {
        Self {
            json_rpc_stream_name,
            max_event_listeners,
            should_send_metadata,
            logger,
        }
    }

    /// Name of the multiplexed JSON-RPC sub-stream, if one was configured.
    pub fn json_rpc_stream_name(&self) -> Option<&str> {
        self.json_rpc_stream_name.as_deref()
    }

    /// Upper bound on listeners per event.
    pub const fn max_event_listeners(&self) -> u32 {
        self.max_event_listeners
    }

    /// Whether the provider sends page metadata to the wallet.
    pub const fn should_send_metadata(&self) -> bool {
        self.should_send_metadata
    }

    /// Diagnostic sinks for this provider.
    pub fn logger(&self) -> &Rc<dyn Logger> {
        &self.logger
    }
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self::new(
            None,
            DEFAULT_MAX_EVENT_LISTENERS,
            DEFAULT_SHOULD_SEND_METADATA,
            Rc::new(ConsoleLogger),
        )
    }
}

impl fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("json_rpc_stream_name", &self.json_rpc_stream_name)
            .field("max_event_listeners", &self.max_event_listeners)
            .field("should_send_metadata", &self.should_send_metadata)
            .finish_non_exhaustive()
    }
}
