use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A custom boundary must name a path prefix.
    #[error("boundary path must not be empty")]
    EmptyBoundary,

    #[error("a global `log` logger is already installed")]
    LoggerAlreadySet,

    #[error("unknown verbosity level: {0:?}")]
    UnknownVerbosity(String),
}
