//! Error types for epubmd operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, rendering or writing a book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Cannot decode {href} as {encoding}")]
    Decode { href: String, encoding: String },

    #[error("Malformed markup in {href}: {message}")]
    Parse { href: String, message: String },

    #[error("Cannot write {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of an [`Error`].
///
/// `Sink` is the only kind raised after the Markdown text was produced; every
/// other kind means nothing was produced at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is missing, not a ZIP archive, or lacks a usable package document.
    Container,
    /// A content document's bytes do not match its declared encoding.
    Decode,
    /// A content document is not well-formed markup.
    Parse,
    /// The output path could not be written.
    Sink,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_)
            | Error::Zip(_)
            | Error::Xml(_)
            | Error::InvalidEpub(_)
            | Error::MissingElement(_) => ErrorKind::Container,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Sink { .. } => ErrorKind::Sink,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
