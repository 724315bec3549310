//! Provider error type.

use thiserror::Error;

use crate::{messages, options::ReceivedValue};

#[derive(Debug, Clone, PartialEq, Error)]
/// Failures raised by provider construction, request validation, and host binding.
pub enum ProviderError {
    /// The transport is missing or lacks the readable/writable capability.
    #[error("{}", messages::errors::invalid_duplex_stream())]
    InvalidTransport,
    /// The options bag or one of its typed fields was malformed.
    #[error(
        "{}",
        messages::errors::invalid_options(.max_event_listeners.as_ref(), .should_send_metadata.as_ref())
    )]
    InvalidOptions {
        /// Raw `maxEventListeners` as received, `None` when absent.
        max_event_listeners: Option<ReceivedValue>,
        /// Raw `shouldSendMetadata` as received, `None` when absent.
        should_send_metadata: Option<ReceivedValue>,
    },
    /// A logger was supplied but it is not an object.
    #[error("{}", messages::errors::invalid_logger_object())]
    InvalidLoggerObject,
    /// The first required logger method, in fixed scan order, that is missing or not callable.
    #[error("{}", messages::errors::invalid_logger_method(.0))]
    InvalidLoggerMethod(&'static str),
    /// `request` was not given a single object argument.
    #[error("{}", messages::errors::invalid_request_args())]
    InvalidRequestArgs,
    /// `request` was given an empty method name.
    #[error("{}", messages::errors::invalid_request_method())]
    InvalidRequestMethod,
    /// `request` params were neither an array nor an object.
    #[error("{}", messages::errors::invalid_request_params())]
    InvalidRequestParams,
    /// The transport rejected or failed a request.
    #[error("{0}")]
    Rpc(String),
    /// The host environment refused a binding or dispatch.
    #[error("host binding failed: {0}")]
    Host(String),
}

impl ProviderError {
    /// Returns whether this error came from construction-time validation.
    pub const fn is_construction_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransport
                | Self::InvalidOptions { .. }
                | Self::InvalidLoggerObject
                | Self::InvalidLoggerMethod(_)
        )
    }
}
