//! Error types for colcon-test-result

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for colcon-test-result operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for colcon-test-result
#[derive(Error, Debug)]
pub enum Error {
    /// The passed path does not exist.
    #[error("Path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// The passed path exists but is not a directory.
    #[error("Path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The XML is not well-formed (tokenizer level).
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    /// The XML is not well-formed (document structure).
    #[error("{0}")]
    MalformedXml(String),

    /// The document is well-formed but not a usable xUnit result file.
    #[error("{0}")]
    InvalidResult(String),

    /// Configuration file error or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A test result extension failed as a whole.
    #[error("Exception in test result extension '{name}': {message}")]
    Extension { name: String, message: String },

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Other error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True if the error means the input is not well-formed XML.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Xml(_) | Error::MalformedXml(_))
    }

    /// True if the error means the input is valid XML but not a usable result file.
    pub fn is_invalid_result(&self) -> bool {
        matches!(self, Error::InvalidResult(_))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(e.into())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
