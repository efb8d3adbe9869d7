//! # mtlog-verbose
//! Verbosity-gated stdout logger with caller location and colored tags.
//!
//! Every message is printed as one block, written in a single locked write so
//! blocks from concurrent threads never interleave:
//! ```text
//! /path/to/caller.rs:12             <- caller location, depending on verbosity
//! Logger: worker >>>>>              <- only for named loggers
//! 2024-05-01 12:00:00 [日志] hello
//! <<<<<
//! ```
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! mtlog-verbose = "0.1.0"
//! ```
//!
//! ```rust
//! use mtlog_verbose::{Verbosity, set_verbosity};
//!
//! mtlog_verbose::info!("Hello, %s!", "world");
//! mtlog_verbose::warn!("not printed at the default verbosity");
//! set_verbosity(Verbosity::Warning);
//! mtlog_verbose::warn!("printed, with the caller location");
//! mtlog_verbose::error!("errors are always printed");
//! ```
//!
//! ## Named loggers
//! ```rust
//! use mtlog_verbose::{logger, new_logger_named};
//!
//! let worker = new_logger_named("worker");
//! worker.info("job %d done in %.2fs", &[7.into(), 1.25.into()]);
//!
//! let job = logger!("job-%d", 7);
//! assert_eq!(job.name(), "job-7");
//! mtlog_verbose::info!(job => "values without directives are appended", 1, 2);
//! ```
//!
//! ## Custom boundary
//! A library wrapping this logger can pass its own source directory, so the
//! reported location is its caller rather than the wrapper itself.
//! ```rust
//! let logger = mtlog_verbose::new_logger_with_boundary(
//!     concat!(env!("CARGO_MANIFEST_DIR"), "/src"),
//!     "wrapper",
//! );
//! logger.error("reported at the first frame outside the boundary", &[]);
//! ```
//!
//! ## Owned facilities
//! ```rust
//! use mtlog_verbose::{LogBuffer, Verbosity, facility_config};
//!
//! let buffer = LogBuffer::new();
//! let facility = facility_config()
//!     .with_verbosity(Verbosity::Silent)
//!     .with_color(false)
//!     .with_writer(buffer.clone())
//!     .build();
//! let logger = facility.logger("svc");
//! logger.info("suppressed", &[]);
//! logger.error("kept", &[]);
//! assert_eq!(buffer.blocks().len(), 1);
//! ```

mod caller;
mod config;
mod error;
mod format;
mod log_writer;
mod logger;
mod utils;

use std::{path::Path, sync::LazyLock};

pub use caller::{SourceSite, is_test_source};
pub use config::{FacilityConfig, Tags, Verbosity, VerbosityCell, facility_config};
pub use error::{Error, Result};
pub use format::{Value, format_message};
pub use log_writer::{LogBuffer, LogStdout, LogWriter};
pub use logger::{LogFacility, Logger, LoggerName};
pub use utils::Severity;

/// Facility behind the package-level functions, printing to stdout.
static DEFAULT_FACILITY: LazyLock<LogFacility> =
    LazyLock::new(|| FacilityConfig::default().build());

static DEFAULT_LOGGER: LazyLock<Logger> = LazyLock::new(|| DEFAULT_FACILITY.logger(()));

/// Returns the process-wide default facility.
pub fn default_facility() -> &'static LogFacility {
    &DEFAULT_FACILITY
}

/// Sets the verbosity of the default facility, for all its loggers.
pub fn set_verbosity(verbosity: Verbosity) {
    DEFAULT_FACILITY.set_verbosity(verbosity);
}

pub fn verbosity() -> Verbosity {
    DEFAULT_FACILITY.verbosity()
}

/// Unlabeled logger of the default facility.
pub fn new_logger() -> Logger {
    DEFAULT_FACILITY.logger(())
}

pub fn new_logger_named(name: &str) -> Logger {
    DEFAULT_FACILITY.logger(name)
}

/// Logger named after `format_message(template, values)`.
pub fn new_logger_format(template: &str, values: &[Value]) -> Logger {
    DEFAULT_FACILITY.logger(LoggerName::Template(template.into(), values.to_vec()))
}

/// # Panics
/// If `boundary` is empty.
pub fn new_logger_with_boundary<P: AsRef<Path>, N: Into<LoggerName>>(
    boundary: P,
    name: N,
) -> Logger {
    DEFAULT_FACILITY.logger_with_boundary(boundary, name)
}

pub fn try_new_logger_with_boundary<P: AsRef<Path>, N: Into<LoggerName>>(
    boundary: P,
    name: N,
) -> Result<Logger> {
    DEFAULT_FACILITY.try_logger_with_boundary(boundary, name)
}

pub fn info(template: impl Into<Value>, values: &[Value]) {
    DEFAULT_LOGGER.info(template, values);
}

pub fn warn(template: impl Into<Value>, values: &[Value]) {
    DEFAULT_LOGGER.warn(template, values);
}

pub fn error(template: impl Into<Value>, values: &[Value]) {
    DEFAULT_LOGGER.error(template, values);
}

pub fn debug(template: impl Into<Value>, values: &[Value]) {
    DEFAULT_LOGGER.debug(template, values);
}

/// Creates a logger from loosely shaped arguments, see [`LoggerName::from_values`].
#[macro_export]
macro_rules! logger {
    () => {
        $crate::new_logger()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::default_facility()
            .logger($crate::LoggerName::from_values(&[$($crate::Value::from($value)),+]))
    };
}

/// `info!("fmt", args..)` on the default logger, or `info!(logger => "fmt", args..)`.
#[macro_export]
macro_rules! info {
    ($logger:expr => $template:expr $(, $value:expr)* $(,)?) => {
        $logger.info($template, &[$($crate::Value::from($value)),*])
    };
    ($template:expr $(, $value:expr)* $(,)?) => {
        $crate::info($template, &[$($crate::Value::from($value)),*])
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr => $template:expr $(, $value:expr)* $(,)?) => {
        $logger.warn($template, &[$($crate::Value::from($value)),*])
    };
    ($template:expr $(, $value:expr)* $(,)?) => {
        $crate::warn($template, &[$($crate::Value::from($value)),*])
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr => $template:expr $(, $value:expr)* $(,)?) => {
        $logger.error($template, &[$($crate::Value::from($value)),*])
    };
    ($template:expr $(, $value:expr)* $(,)?) => {
        $crate::error($template, &[$($crate::Value::from($value)),*])
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr => $template:expr $(, $value:expr)* $(,)?) => {
        $logger.debug($template, &[$($crate::Value::from($value)),*])
    };
    ($template:expr $(, $value:expr)* $(,)?) => {
        $crate::debug($template, &[$($crate::Value::from($value)),*])
    };
}
