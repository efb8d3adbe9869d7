use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{LevelFilter, Log, Metadata, Record};

use crate::{
    Error, Result, Severity, Value, Verbosity,
    caller::{self, SourceSite},
    config::{Tags, VerbosityCell},
    format::format_message,
    log_writer::LogWriter,
    utils::format_log,
};

struct FacilityInner {
    verbosity: VerbosityCell,
    tags: Tags,
    color: bool,
    boundary: PathBuf,
    writer: Arc<dyn LogWriter>,
}

/// Owner of a verbosity threshold and of the loggers reading it.
///
/// Clones share everything: a [`LogFacility::set_verbosity`] on any clone is seen by
/// every logger created from any of them.
#[derive(Clone)]
pub struct LogFacility {
    inner: Arc<FacilityInner>,
}

impl fmt::Debug for LogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFacility")
            .field("verbosity", &self.verbosity())
            .field("color", &self.inner.color)
            .field("boundary", &self.inner.boundary)
            .finish_non_exhaustive()
    }
}

impl LogFacility {
    pub(crate) fn from_parts(
        verbosity: VerbosityCell,
        tags: Tags,
        color: bool,
        boundary: PathBuf,
        writer: Arc<dyn LogWriter>,
    ) -> Self {
        Self {
            inner: Arc::new(FacilityInner {
                verbosity,
                tags,
                color,
                boundary,
                writer,
            }),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.inner.verbosity.get()
    }
    /// Changes the threshold for every logger of this facility.
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.inner.verbosity.set(verbosity);
    }
    pub fn verbosity_cell(&self) -> &VerbosityCell {
        &self.inner.verbosity
    }

    /// Creates a logger using the facility boundary.
    pub fn logger<N: Into<LoggerName>>(&self, name: N) -> Logger {
        Logger {
            name: name.into().render(),
            boundary: self.inner.boundary.clone(),
            facility: self.clone(),
        }
    }

    /// Creates a logger treating every frame under `boundary` as internal.
    ///
    /// # Panics
    /// If `boundary` is empty.
    pub fn logger_with_boundary<P: AsRef<Path>, N: Into<LoggerName>>(
        &self,
        boundary: P,
        name: N,
    ) -> Logger {
        self.try_logger_with_boundary(boundary, name)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_logger_with_boundary<P: AsRef<Path>, N: Into<LoggerName>>(
        &self,
        boundary: P,
        name: N,
    ) -> Result<Logger> {
        let boundary = boundary.as_ref();
        if boundary.as_os_str().is_empty() {
            return Err(Error::EmptyBoundary);
        }
        Ok(Logger {
            boundary: boundary.to_path_buf(),
            ..self.logger(name)
        })
    }

    fn write(&self, severity: Severity, name: &str, location: Option<&SourceSite>, message: &str) {
        let FacilityInner {
            tags,
            color,
            writer,
            ..
        } = self.inner.as_ref();
        writer.write_block(&format_log(message, severity, name, location, tags, *color));
    }
}

/// How a new logger gets its display name.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoggerName {
    #[default]
    Unlabeled,
    Literal(String),
    /// Rendered with [`format_message`].
    Template(String, Vec<Value>),
}

impl LoggerName {
    /// Picks a name from loosely shaped arguments: a lone string is the name, a
    /// string followed by values is a template.
    ///
    /// Any other shape gives an unlabeled logger. This leniency is intentional, so
    /// callers can pass whatever they have at hand.
    pub fn from_values(values: &[Value]) -> Self {
        match values {
            [Value::Str(name)] => Self::Literal(name.clone()),
            [Value::Str(template), rest @ ..] => Self::Template(template.clone(), rest.to_vec()),
            _ => Self::Unlabeled,
        }
    }

    fn render(self) -> String {
        match self {
            Self::Unlabeled => String::new(),
            Self::Literal(name) => name,
            Self::Template(template, values) => format_message(template, &values),
        }
    }
}

impl From<()> for LoggerName {
    fn from(_: ()) -> Self {
        Self::Unlabeled
    }
}

impl From<&str> for LoggerName {
    fn from(name: &str) -> Self {
        Self::Literal(name.into())
    }
}

impl From<String> for LoggerName {
    fn from(name: String) -> Self {
        Self::Literal(name)
    }
}

impl From<&String> for LoggerName {
    fn from(name: &String) -> Self {
        Self::Literal(name.clone())
    }
}

/// A named handle printing through its facility. Immutable and cheap to clone.
#[derive(Clone, Debug)]
pub struct Logger {
    name: String,
    boundary: PathBuf,
    facility: LogFacility,
}

impl Logger {
    /// Display name, empty when unlabeled.
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn boundary(&self) -> &Path {
        &self.boundary
    }
    pub fn facility(&self) -> &LogFacility {
        &self.facility
    }
    pub fn verbosity(&self) -> Verbosity {
        self.facility.verbosity()
    }

    pub fn info(&self, template: impl Into<Value>, values: &[Value]) {
        self.log(Severity::Info, template, values);
    }
    pub fn warn(&self, template: impl Into<Value>, values: &[Value]) {
        self.log(Severity::Warning, template, values);
    }
    /// Always printed, always with the caller location.
    pub fn error(&self, template: impl Into<Value>, values: &[Value]) {
        self.log(Severity::Error, template, values);
    }
    pub fn debug(&self, template: impl Into<Value>, values: &[Value]) {
        self.log(Severity::Debug, template, values);
    }

    pub fn log(&self, severity: Severity, template: impl Into<Value>, values: &[Value]) {
        let verbosity = self.verbosity();
        if !severity.emits_at(verbosity) {
            return;
        }
        let location = if severity.located_at(verbosity) {
            caller::caller_location(&self.boundary)
        } else {
            None
        };
        let message = format_message(template, values);
        self.facility
            .write(severity, &self.name, location.as_ref(), &message);
    }

    /// Registers this logger as the global `log` logger.
    /// Filtering is left to the facility verbosity.
    pub fn install(self) -> Result<()> {
        log::set_boxed_logger(Box::new(self)).map_err(|_| Error::LoggerAlreadySet)?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        Severity::from(metadata.level()).emits_at(self.verbosity())
    }

    fn log(&self, record: &Record) {
        let severity = Severity::from(record.level());
        let verbosity = self.verbosity();
        if !severity.emits_at(verbosity) {
            return;
        }
        // The record already knows where it was emitted.
        let location = match (record.file(), record.line()) {
            (Some(file), Some(line)) if severity.located_at(verbosity) => Some(SourceSite {
                file: file.into(),
                line,
            }),
            _ => None,
        };
        self.facility.write(
            severity,
            &self.name,
            location.as_ref(),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {}
}
