use crate::error::{Error, Result};
use crate::util::{declared_encoding, decode_strict};

/// Book metadata (Dublin Core subset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub language: Option<String>,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub identifier: Option<String>,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub publisher: Option<String>,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub date: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// The book's primary creator (first `dc:creator`).
    pub fn creator(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

/// An item in the reading order (spine), as declared by the package document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct SpineItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub linear: bool,
}

impl SpineItem {
    /// Whether this item holds textual content (as opposed to images, SVG, etc.).
    pub fn is_content(&self) -> bool {
        is_content_media_type(&self.media_type)
    }
}

/// Media types treated as content documents.
pub fn is_content_media_type(media_type: &str) -> bool {
    matches!(
        media_type.trim().to_ascii_lowercase().as_str(),
        "application/xhtml+xml" | "text/html"
    )
}

/// One content document of the book, in spine order.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    /// Position in the spine.
    pub index: usize,
    /// Manifest href, relative to the package document.
    pub href: String,
    pub media_type: String,
    /// Raw markup bytes as stored in the archive.
    pub data: Vec<u8>,
    /// Declared encoding label (BOM, then XML declaration, else UTF-8).
    pub encoding: String,
}

impl ContentDocument {
    /// Build a document, detecting its declared encoding from the bytes.
    pub fn new(index: usize, href: impl Into<String>, data: Vec<u8>) -> Self {
        let encoding = declared_encoding(&data).to_string();
        Self {
            index,
            href: href.into(),
            media_type: "application/xhtml+xml".to_string(),
            data,
            encoding,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Decode the markup with the declared encoding.
    ///
    /// Malformed bytes or an unknown label are an [`Error::Decode`].
    pub fn decode(&self) -> Result<String> {
        decode_strict(&self.data, &self.encoding).ok_or_else(|| Error::Decode {
            href: self.href.clone(),
            encoding: self.encoding.clone(),
        })
    }
}
