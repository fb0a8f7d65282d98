//! Markdown generation from content documents.
//!
//! - `fragment`: the output units and their Markdown form
//! - `render`: decoding, parsing and the element sweep
//!
//! ## Mapping
//!
//! The output is flat. Book title and creator form a preamble. Each content
//! document then contributes its chapter title (the first `h1` or `h2`)
//! followed by every heading and paragraph in document order. Headings are
//! shifted one level down so the book title stays the only `#` heading.
//! Inline formatting is dropped; only text survives.

mod fragment;
mod render;

pub use fragment::Fragment;
pub use render::{MarkdownRenderer, MarkupMode, RenderConfig, render};
