use std::{
    fmt,
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

use colored::Color;

use crate::{
    Error, LogFacility, Result, Severity,
    log_writer::{LogStdout, LogWriter},
};

/// Process verbosity threshold. Ordered from quietest to loudest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Verbosity {
    /// Only errors are printed.
    Silent = 1,
    /// Info and error messages, without location.
    #[default]
    Normal = 2,
    /// Adds warnings, and the caller location for info messages.
    Warning = 3,
    /// Everything, with the caller location on every message.
    Debug = 4,
}

impl Verbosity {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Silent,
            3 => Self::Warning,
            4 => Self::Debug,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Silent => "silent",
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "normal" => Ok(Self::Normal),
            "warning" | "warn" => Ok(Self::Warning),
            "debug" => Ok(Self::Debug),
            _ => Err(Error::UnknownVerbosity(s.into())),
        }
    }
}

/// Shared, thread-safe verbosity setting.
///
/// Clones point to the same value: setting it through one handle is seen by
/// every logger holding another.
#[derive(Debug, Clone)]
pub struct VerbosityCell(Arc<AtomicU8>);

impl Default for VerbosityCell {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}

impl VerbosityCell {
    pub fn new(verbosity: Verbosity) -> Self {
        Self(Arc::new(AtomicU8::new(verbosity as u8)))
    }
    pub fn get(&self) -> Verbosity {
        Verbosity::from_u8(self.0.load(Ordering::Relaxed))
    }
    pub fn set(&self, verbosity: Verbosity) {
        self.0.store(verbosity as u8, Ordering::Relaxed);
    }
}

/// Color and label of every severity tag, plus the color of location lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub info: (Color, String),
    pub debug: (Color, String),
    pub warning: (Color, String),
    pub error: (Color, String),
    pub location: Color,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            info: (Color::Blue, "[日志]".into()),
            debug: (Color::Green, "[调试]".into()),
            warning: (Color::Yellow, "[警告]".into()),
            error: (Color::Red, "[错误]".into()),
            location: Color::Black,
        }
    }
}

impl Tags {
    pub fn tag(&self, severity: Severity) -> &(Color, String) {
        match severity {
            Severity::Info => &self.info,
            Severity::Debug => &self.debug,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
        }
    }

    /// English labels with the default colors.
    pub fn english() -> Self {
        Self {
            info: (Color::Blue, "[INFO]".into()),
            debug: (Color::Green, "[DEBUG]".into()),
            warning: (Color::Yellow, "[WARN]".into()),
            error: (Color::Red, "[ERROR]".into()),
            location: Color::Black,
        }
    }
}

/// Builder for a [`LogFacility`].
pub struct FacilityConfig {
    verbosity: Verbosity,
    tags: Tags,
    color: bool,
    boundary: PathBuf,
    writer: Arc<dyn LogWriter>,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            tags: Tags::default(),
            color: true,
            boundary: crate::caller::crate_boundary(),
            writer: Arc::new(LogStdout),
        }
    }
}

impl FacilityConfig {
    /// Builds the facility.
    pub fn build(self) -> LogFacility {
        let Self {
            verbosity,
            tags,
            color,
            boundary,
            writer,
        } = self;
        LogFacility::from_parts(VerbosityCell::new(verbosity), tags, color, boundary, writer)
    }

    /// Sets the initial verbosity.
    pub fn with_verbosity(self, verbosity: Verbosity) -> Self {
        Self { verbosity, ..self }
    }
    /// Replaces the severity tags.
    pub fn with_tags(self, tags: Tags) -> Self {
        Self { tags, ..self }
    }
    /// Enables or disables ANSI escapes.
    pub fn with_color(self, yes: bool) -> Self {
        Self { color: yes, ..self }
    }
    /// Sets the default boundary of loggers created by the facility.
    pub fn with_boundary<P: Into<PathBuf>>(self, boundary: P) -> Result<Self> {
        let boundary = boundary.into();
        if boundary.as_os_str().is_empty() {
            return Err(Error::EmptyBoundary);
        }
        Ok(Self { boundary, ..self })
    }
    /// Sends blocks to `writer` instead of stdout.
    pub fn with_writer<W: LogWriter + 'static>(self, writer: W) -> Self {
        Self {
            writer: Arc::new(writer),
            ..self
        }
    }
}

/// Returns a default FacilityConfig.
pub fn facility_config() -> FacilityConfig {
    FacilityConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Warning);
        assert!(Verbosity::Warning < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_names() {
        for v in [
            Verbosity::Silent,
            Verbosity::Normal,
            Verbosity::Warning,
            Verbosity::Debug,
        ] {
            assert_eq!(v.to_string().parse::<Verbosity>().unwrap(), v);
        }
        assert_eq!(" WARN ".parse::<Verbosity>().unwrap(), Verbosity::Warning);
        assert_eq!(
            "loud".parse::<Verbosity>(),
            Err(Error::UnknownVerbosity("loud".into()))
        );
    }

    #[test]
    fn test_verbosity_cell_is_shared() {
        let cell = VerbosityCell::new(Verbosity::Silent);
        let other = cell.clone();
        other.set(Verbosity::Debug);
        assert_eq!(cell.get(), Verbosity::Debug);
    }

    #[test]
    fn test_empty_boundary_rejected() {
        assert_eq!(
            facility_config().with_boundary("").err(),
            Some(Error::EmptyBoundary)
        );
    }
}
