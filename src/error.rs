//! Error types for istdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for istdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A payload was not valid base64.
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A payload or stored record was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A spreadsheet payload could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// A stored content record has sequences of mismatched length.
    #[error("Malformed content: expected {expected} items but {field} has {found}")]
    MalformedContent {
        /// Declared item count
        expected: usize,
        /// Name of the offending sequence
        field: &'static str,
        /// Actual sequence length
        found: usize,
    },

    /// The document does not exist in the content store.
    #[error("Document doesn't exist: {0}")]
    DocumentNotFound(String),

    /// The document already exists in the content store.
    #[error("Duplicate document name: {0}")]
    DuplicateDocument(String),

    /// A document or section name that cannot be used as a path component.
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// A section record is absent for the document.
    #[error("Section {section} not found in document {document}")]
    SectionNotFound {
        /// Document name
        document: String,
        /// Section key
        section: String,
    },

    /// An external tool exited unsuccessfully.
    #[error("{program} failed: {output}")]
    Tool {
        /// Program name
        program: String,
        /// Combined stdout/stderr of the tool
        output: String,
    },

    /// An external tool exceeded its time limit.
    #[error("{program} timed out after {seconds}s")]
    ToolTimeout {
        /// Program name
        program: String,
        /// Timeout in seconds
        seconds: u64,
    },

    /// The typesetting compiler rejected the markup. Carries its diagnostics verbatim.
    #[error("{0}")]
    Compile(String),

    /// A chapter could not be assembled.
    #[error("Cannot create {chapter}: {source}")]
    Chapter {
        /// Chapter title
        chapter: &'static str,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn chapter(chapter: &'static str, source: Error) -> Self {
        Error::Chapter {
            chapter,
            source: Box::new(source),
        }
    }
}

impl From<calamine::XlsxError> for Error {
    fn from(err: calamine::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}
