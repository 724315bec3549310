//! Fail-fast validation of the provider's transport and options bag.
//!
//! Checks run in a fixed order and stop at the first failure. Nothing is constructed until every
//! check has passed.

use std::rc::Rc;

use crate::{
    error::ProviderError,
    logger::{LogLevel, LogSink, Logger, RawLogger, RawLoggerMethod, RawLoggerMethods, SinkLogger},
    options::{
        OptionsArg, ProviderOptions, RawProviderOptions, ReceivedValue,
        DEFAULT_MAX_EVENT_LISTENERS, DEFAULT_SHOULD_SEND_METADATA,
    },
    transport::ProviderTransport,
};

/// Validates constructor arguments and returns the accepted transport and defaulted options.
///
/// # Errors
///
/// Returns the first of [`ProviderError::InvalidTransport`], [`ProviderError::InvalidOptions`],
/// [`ProviderError::InvalidLoggerObject`], or [`ProviderError::InvalidLoggerMethod`] that
/// applies, in that order.
pub fn validate_provider_args(
    transport: Option<Rc<dyn ProviderTransport>>,
    options: OptionsArg,
) -> Result<(Rc<dyn ProviderTransport>, ProviderOptions), ProviderError> {
    let transport = validate_transport(transport)?;
    let options = validate_options(options)?;
    Ok((transport, options))
}

fn validate_transport(
    transport: Option<Rc<dyn ProviderTransport>>,
) -> Result<Rc<dyn ProviderTransport>, ProviderError> {
    match transport {
        Some(transport) if transport.capabilities().is_duplex() => Ok(transport),
        _ => Err(ProviderError::InvalidTransport),
    }
}

/// Validates an options bag on its own.
///
/// # Errors
///
/// See [`validate_provider_args`]; transport checks are skipped.
pub fn validate_options(options: OptionsArg) -> Result<ProviderOptions, ProviderError> {
    let raw = match options {
        OptionsArg::Omitted => RawProviderOptions::default(),
        OptionsArg::Record(raw) => raw,
        OptionsArg::Invalid(received) => {
            return Err(ProviderError::InvalidOptions {
                max_event_listeners: Some(received.clone()),
                should_send_metadata: Some(received),
            });
        }
    };

    let max_event_listeners = match &raw.max_event_listeners {
        None => Some(DEFAULT_MAX_EVENT_LISTENERS),
        Some(value) => listener_limit(value),
    };
    let should_send_metadata = match &raw.should_send_metadata {
        None => Some(DEFAULT_SHOULD_SEND_METADATA),
        Some(value) => value.as_bool(),
    };
    let (Some(max_event_listeners), Some(should_send_metadata)) =
        (max_event_listeners, should_send_metadata)
    else {
        return Err(ProviderError::InvalidOptions {
            max_event_listeners: raw.max_event_listeners,
            should_send_metadata: raw.should_send_metadata,
        });
    };

    let logger: Rc<dyn Logger> = match raw.logger {
        None => ProviderOptions::default().logger().clone(),
        Some(RawLogger::Invalid(_)) => return Err(ProviderError::InvalidLoggerObject),
        Some(RawLogger::Object(methods)) => Rc::new(validate_logger_methods(&methods)?),
    };

    Ok(ProviderOptions::new(
        raw.json_rpc_stream_name,
        max_event_listeners,
        should_send_metadata,
        logger,
    ))
}

/// Accepts whole, non-negative numbers that fit `u32`; `10.0` counts as `10`.
fn listener_limit(value: &ReceivedValue) -> Option<u32> {
    let limit = value.as_f64()?;
    let whole = limit.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&limit);
    whole.then_some(limit as u32)
}

fn validate_logger_methods(methods: &RawLoggerMethods) -> Result<SinkLogger, ProviderError> {
    let sink = |level: LogLevel| -> Result<LogSink, ProviderError> {
        match methods.get(level.as_str()) {
            Some(RawLoggerMethod::Callable(sink)) => Ok(sink.clone()),
            _ => Err(ProviderError::InvalidLoggerMethod(level.as_str())),
        }
    };
    // Elements evaluate left to right, so the first missing method in scan order wins.
    Ok(SinkLogger::from_sinks([
        sink(LogLevel::Debug)?,
        sink(LogLevel::Error)?,
        sink(LogLevel::Info)?,
        sink(LogLevel::Log)?,
        sink(LogLevel::Trace)?,
        sink(LogLevel::Warn)?,
    ]))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        logger::{MemoryLogger, LOGGER_METHODS},
        transport::{MemoryTransport, TransportCapabilities},
    };

    fn stream() -> Option<Rc<dyn ProviderTransport>> {
        Some(Rc::new(MemoryTransport::default()))
    }

    fn full_logger() -> RawLoggerMethods {
        LOGGER_METHODS
            .iter()
            .fold(RawLoggerMethods::default(), |methods, name| {
                methods.with_sink(*name, |_| {})
            })
    }

    fn record(raw: RawProviderOptions) -> OptionsArg {
        OptionsArg::Record(raw)
    }

    fn expect_err(
        result: Result<(Rc<dyn ProviderTransport>, ProviderOptions), ProviderError>,
    ) -> ProviderError {
        match result {
            Ok(_) => panic!("validation should fail"),
            Err(err) => err,
        }
    }

    #[test]
    fn missing_transport_is_rejected() {
        assert_eq!(
            expect_err(validate_provider_args(None, OptionsArg::Omitted)),
            ProviderError::InvalidTransport
        );
    }

    #[test]
    fn half_duplex_transport_is_rejected() {
        for capabilities in [
            TransportCapabilities::default(),
            TransportCapabilities {
                readable: true,
                writable: false,
            },
            TransportCapabilities {
                readable: false,
                writable: true,
            },
        ] {
            let transport: Rc<dyn ProviderTransport> =
                Rc::new(MemoryTransport::with_capabilities(capabilities));
            assert_eq!(
                expect_err(validate_provider_args(Some(transport), OptionsArg::Omitted)),
                ProviderError::InvalidTransport
            );
        }
    }

    #[test]
    fn transport_is_checked_before_options() {
        let err = expect_err(validate_provider_args(None, OptionsArg::Invalid(Value::Null.into())));
        assert_eq!(err, ProviderError::InvalidTransport);
    }

    #[test]
    fn omitted_options_take_defaults() {
        let (_, options) = validate_provider_args(stream(), OptionsArg::Omitted).expect("valid");
        assert_eq!(options.max_event_listeners(), 100);
        assert!(options.should_send_metadata());
        assert_eq!(options.json_rpc_stream_name(), None);
    }

    #[test]
    fn valid_options_are_accepted() {
        let cases = [
            RawProviderOptions {
                max_event_listeners: Some(json!(10).into()),
                ..Default::default()
            },
            RawProviderOptions {
                should_send_metadata: Some(json!(false).into()),
                ..Default::default()
            },
            RawProviderOptions {
                json_rpc_stream_name: Some("ezdefi-provider".into()),
                max_event_listeners: Some(json!(10).into()),
                should_send_metadata: Some(json!(false).into()),
                logger: Some(RawLogger::Object(full_logger())),
            },
        ];
        for raw in cases {
            validate_provider_args(stream(), record(raw)).expect("valid options");
        }
    }

    #[test]
    fn null_options_fail_at_the_boundary() {
        let err = expect_err(validate_provider_args(stream(), OptionsArg::Invalid(Value::Null.into())));
        assert_eq!(
            err,
            ProviderError::InvalidOptions {
                max_event_listeners: Some(Value::Null.into()),
                should_send_metadata: Some(Value::Null.into()),
            }
        );
    }

    #[test]
    fn malformed_metadata_flag_reports_both_received_values() {
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                max_event_listeners: Some(json!(10).into()),
                should_send_metadata: Some(json!("foo").into()),
                ..Default::default()
            }),
        ));
        let message = err.to_string();
        assert!(message.contains("10"), "{message}");
        assert!(message.contains("'foo'"), "{message}");
        assert_eq!(
            message,
            "Invalid options. Received: { maxEventListeners: 10, shouldSendMetadata: 'foo' }"
        );
    }

    #[test]
    fn malformed_listener_limit_reports_both_received_values() {
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                max_event_listeners: Some(json!("foo").into()),
                should_send_metadata: Some(json!(true).into()),
                ..Default::default()
            }),
        ));
        assert_eq!(
            err.to_string(),
            "Invalid options. Received: { maxEventListeners: 'foo', shouldSendMetadata: true }"
        );
    }

    #[test]
    fn fractional_negative_or_non_finite_listener_limits_are_rejected() {
        for raw in [
            ReceivedValue::from(json!(-1)),
            ReceivedValue::from(2.5),
            ReceivedValue::from(f64::INFINITY),
            ReceivedValue::from(json!(u64::from(u32::MAX) + 1)),
        ] {
            let err = expect_err(validate_provider_args(
                stream(),
                record(RawProviderOptions {
                    max_event_listeners: Some(raw.clone()),
                    ..Default::default()
                }),
            ));
            assert_eq!(
                err,
                ProviderError::InvalidOptions {
                    max_event_listeners: Some(raw),
                    should_send_metadata: None,
                }
            );
        }
    }

    #[test]
    fn integral_float_listener_limit_is_accepted() {
        let (_, options) = validate_provider_args(
            stream(),
            record(RawProviderOptions {
                max_event_listeners: Some(ReceivedValue::from(10.0)),
                ..Default::default()
            }),
        )
        .expect("valid");
        assert_eq!(options.max_event_listeners(), 10);
    }

    #[test]
    fn nan_listener_limit_is_echoed_verbatim() {
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                max_event_listeners: Some(ReceivedValue::from(f64::NAN)),
                should_send_metadata: Some(json!("x").into()),
                ..Default::default()
            }),
        ));
        assert_eq!(
            err.to_string(),
            "Invalid options. Received: { maxEventListeners: NaN, shouldSendMetadata: 'x' }"
        );
    }

    #[test]
    fn options_are_checked_before_logger() {
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                should_send_metadata: Some(json!(1).into()),
                logger: Some(RawLogger::Invalid(json!("foo"))),
                ..Default::default()
            }),
        ));
        assert!(matches!(err, ProviderError::InvalidOptions { .. }));
    }

    #[test]
    fn non_object_logger_is_rejected() {
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Invalid(json!("foo"))),
                ..Default::default()
            }),
        ));
        assert_eq!(err, ProviderError::InvalidLoggerObject);
        assert_eq!(err.to_string(), "'args.logger' must be an object if provided.");
    }

    #[test]
    fn missing_logger_method_is_named() {
        let mut methods = RawLoggerMethods::default();
        for name in ["debug", "error", "info", "log", "trace"] {
            methods = methods.with_sink(name, |_| {});
        }
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Object(methods)),
                ..Default::default()
            }),
        ));
        assert_eq!(err, ProviderError::InvalidLoggerMethod("warn"));
        assert_eq!(
            err.to_string(),
            "'args.logger' must include required method 'warn'."
        );
    }

    #[test]
    fn non_callable_logger_method_is_named() {
        let methods = full_logger().with_value("warn", json!("foo"));
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Object(methods)),
                ..Default::default()
            }),
        ));
        assert_eq!(err, ProviderError::InvalidLoggerMethod("warn"));
    }

    #[test]
    fn logger_scan_reports_first_failure_in_fixed_order() {
        let mut methods = RawLoggerMethods::default();
        for name in ["debug", "error", "info", "log", "warn"] {
            methods = methods.with_sink(name, |_| {});
        }
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Object(methods)),
                ..Default::default()
            }),
        ));
        assert_eq!(err, ProviderError::InvalidLoggerMethod("trace"));

        let only_log = RawLoggerMethods::default().with_sink("log", |_| {});
        let err = expect_err(validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Object(only_log)),
                ..Default::default()
            }),
        ));
        assert_eq!(err, ProviderError::InvalidLoggerMethod("debug"));
    }

    #[test]
    fn validated_logger_calls_supplied_sinks() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let mut methods = full_logger();
        let sink_seen = seen.clone();
        methods = methods.with_sink("warn", move |message| {
            sink_seen.borrow_mut().push(message.to_string())
        });

        let (_, options) = validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Object(methods)),
                ..Default::default()
            }),
        )
        .expect("valid");
        options.logger().warn("careful");
        options.logger().error("ignored by the recording sink");

        assert_eq!(*seen.borrow(), vec!["careful".to_string()]);
    }

    #[test]
    fn validated_logger_routes_each_level_to_its_own_sink() {
        let memory = MemoryLogger::default();
        let methods = RawLoggerMethods::forwarding_to(Rc::new(memory.clone()));

        let (_, options) = validate_provider_args(
            stream(),
            record(RawProviderOptions {
                logger: Some(RawLogger::Object(methods)),
                ..Default::default()
            }),
        )
        .expect("valid");
        for level in LogLevel::ALL {
            options.logger().emit(level, level.as_str());
        }

        let expected: Vec<_> = LogLevel::ALL
            .iter()
            .map(|level| (*level, level.as_str().to_string()))
            .collect();
        assert_eq!(memory.lines(), expected);
    }
}
