//! Content documents → Markdown fragments.
//!
//! Rendering is pure: decoding and parsing happen in memory, and the caller
//! decides where the text goes.

use crate::book::{ContentDocument, Metadata};
use crate::dom::{Document, Role};
use crate::error::{Error, Result};

use super::fragment::Fragment;

/// Tags the sweep emits, in no particular order.
const BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p"];

/// Tags that qualify as a document's chapter title.
const CHAPTER_TITLE_TAGS: &[&str] = &["h1", "h2"];

/// How content markup is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupMode {
    /// XHTML documents must be well-formed; malformed markup is an error.
    #[default]
    Xhtml,
    /// HTML recovery rules for everything. Never a parse error.
    Html,
}

/// Renderer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub markup: MarkupMode,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markup(mut self, markup: MarkupMode) -> Self {
        self.markup = markup;
        self
    }
}

/// Renders a book's metadata and content documents into one Markdown text.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    config: RenderConfig,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Produce every fragment in emission order.
    ///
    /// The preamble comes first, then each document in the order given. A
    /// document that fails to decode or parse aborts the whole render.
    pub fn fragments(
        &self,
        metadata: &Metadata,
        documents: &[ContentDocument],
    ) -> Result<Vec<Fragment>> {
        let mut fragments = preamble(metadata);
        for doc in documents {
            self.render_document(doc, &mut fragments)?;
        }
        Ok(fragments)
    }

    /// Render to a single string.
    pub fn render(&self, metadata: &Metadata, documents: &[ContentDocument]) -> Result<String> {
        let fragments = self.fragments(metadata, documents)?;
        Ok(fragments.iter().map(Fragment::to_string).collect())
    }

    fn render_document(&self, doc: &ContentDocument, out: &mut Vec<Fragment>) -> Result<()> {
        let markup = doc.decode()?;

        let dom = if self.requires_well_formed(doc) {
            Document::parse_xhtml(&markup).map_err(|message| Error::Parse {
                href: doc.href.clone(),
                message,
            })?
        } else {
            Document::parse(&markup)
        };
        let before = out.len();

        // The chapter title repeats in the sweep below
        if let Some(node) = dom.find_first(CHAPTER_TITLE_TAGS) {
            out.push(Fragment::ChapterTitle(dom.text(node).trim().to_string()));
        }

        for node in dom.find_all(BLOCK_TAGS) {
            let text = dom.text(node);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match dom.role(node) {
                Role::Heading(level) => out.push(Fragment::Heading {
                    level,
                    text: text.to_string(),
                }),
                Role::Paragraph => out.push(Fragment::Paragraph(text.to_string())),
                Role::Other => {}
            }
        }

        tracing::debug!(
            index = doc.index,
            href = %doc.href,
            encoding = %doc.encoding,
            fragments = out.len() - before,
            "rendered content document"
        );
        Ok(())
    }

    fn requires_well_formed(&self, doc: &ContentDocument) -> bool {
        self.config.markup == MarkupMode::Xhtml
            && doc
                .media_type
                .trim()
                .eq_ignore_ascii_case("application/xhtml+xml")
    }
}

fn preamble(metadata: &Metadata) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    if let Some(title) = &metadata.title {
        fragments.push(Fragment::Title(title.clone()));
    }
    if let Some(creator) = metadata.creator() {
        fragments.push(Fragment::Byline(creator.to_string()));
    }
    fragments
}

/// Render with the default configuration.
pub fn render(metadata: &Metadata, documents: &[ContentDocument]) -> Result<String> {
    MarkdownRenderer::new().render(metadata, documents)
}
