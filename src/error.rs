//! Error types for xsd-instance
//!
//! This module defines all error types used throughout the library.
//! Only the configuration and schema-shape failures are raised by the
//! generator itself; writer failures are passed through unchanged.

use std::fmt;
use thiserror::Error;

use crate::namespaces::QName;

/// Result type alias using xsd-instance Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsd-instance operations
#[derive(Error, Debug)]
pub enum Error {
    /// Requested root element is not declared in the schema
    #[error("element {0} is not found")]
    RootNotFound(QName),

    /// Schema shape makes generation impossible (abstract without
    /// alternatives, dangling references)
    #[error("schema error: {0}")]
    SchemaShape(String),

    /// XML Schema parsing/building error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid generation policy or command line input
    #[error("configuration error: {0}")]
    Config(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Error reported by a document writer
    #[error("write error: {0}")]
    Write(String),

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A state that a well-formed schema model never reaches
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// XML Schema parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the schema file
    pub location: Option<String>,
    /// Schema source that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
