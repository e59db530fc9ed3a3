use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for nufetch operations outside the resolver core.
#[derive(Debug, Error, Diagnostic)]
pub enum NufetchError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration file.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.nufetch/config.toml for syntax errors"))]
    Config { message: String },

    /// A package argument could not be understood.
    #[error("Invalid package argument: {message}")]
    #[diagnostic(help("Packages are given as `id` or `id:version`"))]
    Input { message: String },

    /// Network request or download failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Package metadata (index or nuspec) could not be parsed.
    #[error("Metadata error: {message}")]
    Metadata { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
