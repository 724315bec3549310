//! Diagnostic message catalog.
//!
//! Every user-visible string the provider emits lives here, keyed by kind plus positional
//! arguments. Components consume the catalog; they never format diagnostics inline.

use serde_json::Value;

use crate::options::ReceivedValue;

/// Renders a raw received value the way diagnostics echo it back.
///
/// Strings are single-quoted so `'10'` and `10` stay distinguishable; absent values render as
/// `undefined` and non-finite numbers as `NaN`, `Infinity` or `-Infinity`.
pub fn render_received(value: Option<&ReceivedValue>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(ReceivedValue::Json(Value::String(text))) => format!("'{text}'"),
        Some(ReceivedValue::Json(other)) => other.to_string(),
        Some(ReceivedValue::NonFinite(number)) if number.is_nan() => "NaN".to_string(),
        Some(ReceivedValue::NonFinite(number)) if *number < 0.0 => "-Infinity".to_string(),
        Some(ReceivedValue::NonFinite(_)) => "Infinity".to_string(),
    }
}

/// Error-kind messages.
pub mod errors {
    use super::render_received;
    use crate::options::ReceivedValue;

    /// The provider lost its chain connection but is retrying.
    pub fn disconnected() -> String {
        "ezDeFi: Disconnected from chain. Attempting to connect.".to_string()
    }

    /// The background connection is gone for good.
    pub fn permanently_disconnected() -> String {
        "ezDeFi: Disconnected from ezDeFi background. Page reload required.".to_string()
    }

    /// The transport does not satisfy the duplex stream capability.
    pub fn invalid_duplex_stream() -> String {
        "Must provide a Node.js-style duplex stream.".to_string()
    }

    /// The options bag or its typed fields were malformed.
    pub fn invalid_options(
        max_event_listeners: Option<&ReceivedValue>,
        should_send_metadata: Option<&ReceivedValue>,
    ) -> String {
        format!(
            "Invalid options. Received: {{ maxEventListeners: {}, shouldSendMetadata: {} }}",
            render_received(max_event_listeners),
            render_received(should_send_metadata),
        )
    }

    /// `request` was called with something other than a single object argument.
    pub fn invalid_request_args() -> String {
        "Expected a single, non-array, object argument.".to_string()
    }

    /// `request` was called without a usable method name.
    pub fn invalid_request_method() -> String {
        "'args.method' must be a non-empty string.".to_string()
    }

    /// `request` was called with params that are neither an object nor an array.
    pub fn invalid_request_params() -> String {
        "'args.params' must be an object or array if provided.".to_string()
    }

    /// A logger was supplied but it is not an object.
    pub fn invalid_logger_object() -> String {
        "'args.logger' must be an object if provided.".to_string()
    }

    /// A supplied logger lacks a callable required method.
    pub fn invalid_logger_method(method: &str) -> String {
        format!("'args.logger' must include required method '{method}'.")
    }

    /// The page touched a `web3` property the shim does not provide.
    pub fn web3_not_injected() -> String {
        "ezDeFi no longer injects web3. For details, see: https://docs.metamask.io/guide/provider-migration.html#replacing-window-web3".to_string()
    }
}

/// Info-kind messages.
pub mod info {
    /// The provider connected to a chain.
    pub fn connected(chain_id: &str) -> String {
        format!("ezDeFi: Connected to chain with ID \"{chain_id}\".")
    }

    /// The global provider slot was already populated and is being replaced.
    pub fn replacing_global_provider(slot: &str) -> String {
        format!("ezDeFi: Replacing existing window.{slot} provider.")
    }
}

/// Warning-kind messages.
pub mod warnings {
    /// First read of `web3.currentProvider` on the shim.
    pub const WEB3_CURRENT_PROVIDER_ACCESS: &str = "You are accessing the ezDeFi window.web3.currentProvider shim. This property is deprecated; use window.ethereum instead. For details, see: https://docs.metamask.io/guide/provider-migration.html#replacing-window-web3";

    /// Any write to the shim.
    pub const WEB3_SHIM_WRITE: &str = "You are accessing the ezDeFi window.web3 shim. This object is deprecated; use window.ethereum instead. For details, see: https://docs.metamask.io/guide/provider-migration.html#replacing-window-web3";
}

/// Debug-kind messages.
pub mod debug {
    /// The shim usage report could not be delivered.
    pub fn web3_shim_usage_failed(cause: &str) -> String {
        format!("ezDeFi: Failed to log web3 shim usage. {cause}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn invalid_options_echoes_both_received_values() {
        let message = errors::invalid_options(
            Some(&json!(10).into()),
            Some(&Value::String("foo".into()).into()),
        );
        assert_eq!(
            message,
            "Invalid options. Received: { maxEventListeners: 10, shouldSendMetadata: 'foo' }"
        );
    }

    #[test]
    fn absent_and_null_values_render_distinctly() {
        assert_eq!(render_received(None), "undefined");
        assert_eq!(render_received(Some(&Value::Null.into())), "null");
        assert_eq!(render_received(Some(&json!(true).into())), "true");
    }

    #[test]
    fn non_finite_numbers_render_like_the_page_sees_them() {
        assert_eq!(render_received(Some(&ReceivedValue::from(f64::NAN))), "NaN");
        assert_eq!(
            render_received(Some(&ReceivedValue::from(f64::INFINITY))),
            "Infinity"
        );
        assert_eq!(
            render_received(Some(&ReceivedValue::from(f64::NEG_INFINITY))),
            "-Infinity"
        );
        assert_eq!(render_received(Some(&ReceivedValue::from(2.5))), "2.5");
    }

    #[test]
    fn logger_method_message_names_the_method() {
        assert_eq!(
            errors::invalid_logger_method("warn"),
            "'args.logger' must include required method 'warn'."
        );
    }
}
