//! Markdown output units.

use std::fmt;

/// One piece of Markdown output.
///
/// Every fragment renders as a single block followed by a blank line, so the
/// final document is the plain concatenation of its fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Book title: `# {title}`.
    Title(String),
    /// Primary creator: `By {creator}`.
    Byline(String),
    /// First `h1`/`h2` of a content document: `## {text}`.
    ChapterTitle(String),
    /// Any heading, shifted one level down: `h1` becomes `##`.
    Heading { level: u8, text: String },
    /// Paragraph text, verbatim.
    Paragraph(String),
}

impl Fragment {
    /// Number of leading `#` characters, zero for non-headings.
    pub fn hashes(&self) -> usize {
        match self {
            Fragment::Title(_) => 1,
            Fragment::ChapterTitle(_) => 2,
            Fragment::Heading { level, .. } => usize::from(*level) + 1,
            Fragment::Byline(_) | Fragment::Paragraph(_) => 0,
        }
    }

    /// The fragment's text without Markdown decoration.
    pub fn text(&self) -> &str {
        match self {
            Fragment::Title(t)
            | Fragment::Byline(t)
            | Fragment::ChapterTitle(t)
            | Fragment::Paragraph(t)
            | Fragment::Heading { text: t, .. } => t,
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Byline(creator) => write!(f, "By {creator}")?,
            Fragment::Paragraph(text) => f.write_str(text)?,
            heading => {
                for _ in 0..heading.hashes() {
                    f.write_str("#")?;
                }
                write!(f, " {}", heading.text())?;
            }
        }
        f.write_str("\n\n")
    }
}
