//! Decoding of page-supplied option bags into the core's raw option types.

use std::rc::Rc;

use inpage_provider::{
    InitializeOptions, OptionsArg, ProviderTransport, RawLogger, RawLoggerMethod,
    RawLoggerMethods, RawProviderOptions, LOGGER_METHODS,
};
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::{
    interop::{js_to_raw, js_to_received},
    stream::DuplexStreamTransport,
};

fn field(object: &JsValue, name: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn present(value: JsValue) -> Option<JsValue> {
    (!value.is_undefined()).then_some(value)
}

fn flag(object: &JsValue, name: &str, default: bool) -> bool {
    present(field(object, name)).map_or(default, |value| value.is_truthy())
}

fn logger_method(owner: &JsValue, value: JsValue) -> RawLoggerMethod {
    match value.dyn_into::<Function>() {
        Ok(function) => {
            let owner = owner.clone();
            RawLoggerMethod::Callable(Rc::new(move |message: &str| {
                // Exceptions thrown by page loggers are dropped.
                let _ = function.call1(&owner, &JsValue::from_str(message));
            }))
        }
        Err(value) => RawLoggerMethod::NotCallable(js_to_raw(&value)),
    }
}

fn decode_logger(value: JsValue) -> RawLogger {
    if !value.is_object() {
        return RawLogger::Invalid(js_to_raw(&value));
    }
    let mut methods = RawLoggerMethods::default();
    for name in LOGGER_METHODS {
        if let Some(method) = present(field(&value, name)) {
            methods.insert(name, logger_method(&value, method));
        }
    }
    RawLogger::Object(methods)
}

/// Decodes the provider constructor's options argument.
///
/// `undefined` means omitted; `null` and other non-objects are kept as invalid.
pub fn decode_provider_options(options: &JsValue) -> OptionsArg {
    if options.is_undefined() {
        return OptionsArg::Omitted;
    }
    if !options.is_object() {
        return OptionsArg::Invalid(js_to_received(options));
    }
    let raw = |name: &str| present(field(options, name)).map(|value| js_to_received(&value));
    OptionsArg::Record(RawProviderOptions {
        json_rpc_stream_name: present(field(options, "jsonRpcStreamName"))
            .and_then(|value| value.as_string()),
        max_event_listeners: raw("maxEventListeners"),
        should_send_metadata: raw("shouldSendMetadata"),
        logger: present(field(options, "logger")).map(decode_logger),
    })
}

fn stream_name(options: &OptionsArg) -> Option<String> {
    match options {
        OptionsArg::Record(record) => record.json_rpc_stream_name.clone(),
        OptionsArg::Omitted | OptionsArg::Invalid(_) => None,
    }
}

/// Builds a duplex-stream transport for `stream`, or `None` when nothing was supplied.
pub fn stream_transport(
    stream: JsValue,
    options: &OptionsArg,
) -> Option<Rc<DuplexStreamTransport>> {
    present(stream)
        .filter(|stream| !stream.is_null())
        .map(|stream| Rc::new(DuplexStreamTransport::new(stream, stream_name(options))))
}

/// Decodes the `initializeProvider` argument bag.
///
/// The bag carries the provider options inline next to `connectionStream` and the install
/// flags. A non-object bag yields options without a stream.
pub fn decode_initialize_options(options: &JsValue) -> InitializeOptions {
    if !options.is_object() {
        return InitializeOptions::default();
    }
    let provider = decode_provider_options(options);
    let connection_stream = stream_transport(field(options, "connectionStream"), &provider)
        .map(|transport| transport as Rc<dyn ProviderTransport>);

    InitializeOptions {
        connection_stream,
        provider,
        should_set_on_window: flag(options, "shouldSetOnWindow", true),
        should_shim_web3: flag(options, "shouldShimWeb3", false),
    }
}

#[cfg(test)]
mod tests {
    use inpage_provider::{validate_options, ProviderError};
    use js_sys::Object;
    use wasm_bindgen_test::*;

    use super::*;

    fn bag(entries: &[(&str, JsValue)]) -> JsValue {
        let object = Object::new();
        for (name, value) in entries {
            Reflect::set(&object, &JsValue::from_str(name), value).expect("set");
        }
        object.into()
    }

    fn sink() -> JsValue {
        Function::new_no_args("").into()
    }

    #[wasm_bindgen_test]
    fn function_logger_is_not_a_logger_object() {
        let options = decode_provider_options(&bag(&[("logger", sink())]));
        let err = validate_options(options).expect_err("function logger");
        assert_eq!(err, ProviderError::InvalidLoggerObject);
    }

    #[wasm_bindgen_test]
    fn object_logger_with_every_method_is_accepted() {
        let logger = bag(&LOGGER_METHODS.map(|name| (name, sink())));
        let options = decode_provider_options(&bag(&[("logger", logger)]));
        validate_options(options).expect("complete logger");
    }

    #[wasm_bindgen_test]
    fn non_finite_listener_limit_is_echoed_verbatim() {
        let options = decode_provider_options(&bag(&[
            ("maxEventListeners", JsValue::from_f64(f64::NAN)),
            ("shouldSendMetadata", JsValue::from_str("x")),
        ]));
        let err = validate_options(options).expect_err("NaN limit");
        assert_eq!(
            err.to_string(),
            "Invalid options. Received: { maxEventListeners: NaN, shouldSendMetadata: 'x' }"
        );
    }

    #[wasm_bindgen_test]
    fn undefined_is_omitted_and_null_is_invalid() {
        assert!(matches!(
            decode_provider_options(&JsValue::UNDEFINED),
            OptionsArg::Omitted
        ));
        let err = validate_options(decode_provider_options(&JsValue::NULL)).expect_err("null");
        assert_eq!(
            err.to_string(),
            "Invalid options. Received: { maxEventListeners: null, shouldSendMetadata: null }"
        );
    }
}

