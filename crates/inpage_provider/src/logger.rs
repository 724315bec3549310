//! Logger capability: the six diagnostic sinks a provider writes through.
//!
//! Callers may supply their own logger as an untrusted [`RawLogger`]; construction validates it
//! into a [`SinkLogger`]. When none is supplied the provider uses [`ConsoleLogger`].

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use leptos::logging;
use serde_json::Value;

/// Required logger methods, in the order validation scans them.
pub const LOGGER_METHODS: [&str; 6] = ["debug", "error", "info", "log", "trace", "warn"];

/// Severity of one diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// `debug` sink.
    Debug,
    /// `error` sink.
    Error,
    /// `info` sink.
    Info,
    /// `log` sink.
    Log,
    /// `trace` sink.
    Trace,
    /// `warn` sink.
    Warn,
}

impl LogLevel {
    /// All levels, aligned with [`LOGGER_METHODS`].
    pub const ALL: [LogLevel; 6] = [
        Self::Debug,
        Self::Error,
        Self::Info,
        Self::Log,
        Self::Trace,
        Self::Warn,
    ];

    /// Returns the logger method name for this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Error => "error",
            Self::Info => "info",
            Self::Log => "log",
            Self::Trace => "trace",
            Self::Warn => "warn",
        }
    }
}

/// Console-like diagnostic capability.
pub trait Logger {
    /// Writes a debug line.
    fn debug(&self, message: &str);
    /// Writes an error line.
    fn error(&self, message: &str);
    /// Writes an info line.
    fn info(&self, message: &str);
    /// Writes a plain log line.
    fn log(&self, message: &str);
    /// Writes a trace line.
    fn trace(&self, message: &str);
    /// Writes a warning line.
    fn warn(&self, message: &str);

    /// Dispatches `message` to the sink named by `level`.
    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => self.debug(message),
            LogLevel::Error => self.error(message),
            LogLevel::Info => self.info(message),
            LogLevel::Log => self.log(message),
            LogLevel::Trace => self.trace(message),
            LogLevel::Warn => self.warn(message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Default logger backed by the host console.
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        logging::log!("{message}");
    }

    fn error(&self, message: &str) {
        logging::error!("{message}");
    }

    fn info(&self, message: &str) {
        logging::log!("{message}");
    }

    fn log(&self, message: &str) {
        logging::log!("{message}");
    }

    fn trace(&self, message: &str) {
        logging::log!("{message}");
    }

    fn warn(&self, message: &str) {
        logging::warn!("{message}");
    }
}

/// One callable diagnostic sink.
pub type LogSink = Rc<dyn Fn(&str)>;

/// One entry of a caller-supplied logger object, as received.
#[derive(Clone)]
pub enum RawLoggerMethod {
    /// The entry is callable.
    Callable(LogSink),
    /// The entry exists but is not callable; carries the received value.
    NotCallable(Value),
}

impl fmt::Debug for RawLoggerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable(..)"),
            Self::NotCallable(value) => f.debug_tuple("NotCallable").field(value).finish(),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Entries of a caller-supplied logger object keyed by property name.
pub struct RawLoggerMethods {
    entries: BTreeMap<String, RawLoggerMethod>,
}

impl RawLoggerMethods {
    /// Adds a callable entry.
    pub fn with_sink(mut self, name: impl Into<String>, sink: impl Fn(&str) + 'static) -> Self {
        self.entries
            .insert(name.into(), RawLoggerMethod::Callable(Rc::new(sink)));
        self
    }

    /// Adds a non-callable entry carrying `value`.
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.entries
            .insert(name.into(), RawLoggerMethod::NotCallable(value));
        self
    }

    /// Inserts or replaces one entry.
    pub fn insert(&mut self, name: impl Into<String>, method: RawLoggerMethod) {
        self.entries.insert(name.into(), method);
    }

    /// Returns the entry named `name`.
    pub fn get(&self, name: &str) -> Option<&RawLoggerMethod> {
        self.entries.get(name)
    }

    /// Builds a fully callable entry set that forwards every method to `logger`.
    pub fn forwarding_to(logger: Rc<dyn Logger>) -> Self {
        let mut methods = Self::default();
        for level in LogLevel::ALL {
            let logger = logger.clone();
            methods.insert(
                level.as_str(),
                RawLoggerMethod::Callable(Rc::new(move |message: &str| {
                    logger.emit(level, message)
                })),
            );
        }
        methods
    }
}

#[derive(Debug, Clone)]
/// Caller-supplied `logger` option as received.
pub enum RawLogger {
    /// An object whose entries still need method validation.
    Object(RawLoggerMethods),
    /// Something that is not an object.
    Invalid(Value),
}

/// Logger assembled from six validated sinks.
#[derive(Clone)]
pub struct SinkLogger {
    sinks: [LogSink; 6],
}

impl SinkLogger {
    pub(crate) fn from_sinks(sinks: [LogSink; 6]) -> Self {
        Self { sinks }
    }

    fn sink(&self, level: LogLevel) -> &LogSink {
        &self.sinks[level as usize]
    }
}

impl fmt::Debug for SinkLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkLogger").finish_non_exhaustive()
    }
}

impl Logger for SinkLogger {
    fn debug(&self, message: &str) {
        (self.sink(LogLevel::Debug))(message)
    }

    fn error(&self, message: &str) {
        (self.sink(LogLevel::Error))(message)
    }

    fn info(&self, message: &str) {
        (self.sink(LogLevel::Info))(message)
    }

    fn log(&self, message: &str) {
        (self.sink(LogLevel::Log))(message)
    }

    fn trace(&self, message: &str) {
        (self.sink(LogLevel::Trace))(message)
    }

    fn warn(&self, message: &str) {
        (self.sink(LogLevel::Warn))(message)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory logger that records every line, shared across clones.
pub struct MemoryLogger {
    lines: Rc<RefCell<Vec<(LogLevel, String)>>>,
}

impl MemoryLogger {
    /// Returns every recorded line in emission order.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.borrow().clone()
    }

    /// Returns how many lines were recorded at `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.lines
            .borrow()
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .count()
    }

    fn record(&self, level: LogLevel, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn log(&self, message: &str) {
        self.record(LogLevel::Log, message);
    }

    fn trace(&self, message: &str) {
        self.record(LogLevel::Trace, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_order_matches_required_method_order() {
        let names: Vec<_> = LogLevel::ALL.iter().map(|level| level.as_str()).collect();
        assert_eq!(names, LOGGER_METHODS);
    }

    #[test]
    fn forwarding_methods_route_each_sink_to_its_level() {
        let memory = MemoryLogger::default();
        let methods = RawLoggerMethods::forwarding_to(Rc::new(memory.clone()));

        for name in LOGGER_METHODS {
            let Some(RawLoggerMethod::Callable(sink)) = methods.get(name) else {
                panic!("{name} should be callable");
            };
            sink(name);
        }

        let recorded: Vec<_> = memory
            .lines()
            .into_iter()
            .map(|(level, message)| (level.as_str(), message))
            .collect();
        let expected: Vec<_> = LOGGER_METHODS
            .iter()
            .map(|name| (*name, name.to_string()))
            .collect();
        assert_eq!(recorded, expected);
    }

    #[test]
    fn memory_logger_counts_by_level() {
        let logger = MemoryLogger::default();
        logger.warn("a");
        logger.warn("b");
        logger.error("c");
        assert_eq!(logger.count(LogLevel::Warn), 2);
        assert_eq!(logger.count(LogLevel::Error), 1);
        assert_eq!(logger.count(LogLevel::Debug), 0);
    }
}
