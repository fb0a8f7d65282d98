//! # epubmd
//!
//! Convert an EPUB e-book into a single Markdown document.
//!
//! The output keeps a title/author preamble and a heading hierarchy derived
//! from the book's HTML structure. Inline formatting, tables, images and
//! footnotes are dropped: what remains is headings and paragraph text in
//! reading order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use epubmd::{ConvertOptions, convert};
//!
//! let done = convert("book.epub", "book.md", &ConvertOptions::default()).unwrap();
//! println!("{} documents, {} bytes", done.documents, done.bytes);
//! ```
//!
//! ## Rendering in memory
//!
//! The renderer works on metadata and content documents, wherever they come
//! from:
//!
//! ```
//! use epubmd::{ContentDocument, Metadata, render};
//!
//! let meta = Metadata::new().with_title("Sample").with_author("Author");
//! let doc = ContentDocument::new(0, "intro.xhtml", b"<h1>Intro</h1><p>Hello  World</p>".to_vec());
//!
//! let markdown = render(&meta, &[doc]).unwrap();
//! assert_eq!(
//!     markdown,
//!     "# Sample\n\nBy Author\n\n## Intro\n\n### Intro\n\nHello  World\n\n"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`epub`]: container reader (OPF metadata and spine, content documents)
//! - [`dom`]: html5ever arena DOM with tag queries
//! - [`markdown`]: fragment model and renderer
//! - [`clean`]: flat text extraction
//! - [`convert`](mod@convert): file-to-file driver

pub mod book;
pub mod clean;
pub mod convert;
pub mod dom;
pub mod epub;
pub mod error;
pub mod markdown;
pub(crate) mod util;

pub use book::{ContentDocument, Metadata, SpineItem};
pub use clean::{clean, to_markup};
pub use convert::{Conversion, ConvertOptions, convert, convert_to_string, default_output_path};
pub use epub::EpubReader;
pub use error::{Error, ErrorKind, Result};
pub use markdown::{Fragment, MarkdownRenderer, MarkupMode, RenderConfig, render};
