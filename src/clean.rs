//! Flat text extraction from HTML.
//!
//! Independent of the Markdown renderer: the result is plain phrases, one per
//! line, with scripts, styles and layout whitespace gone.

use crate::dom::Document;

/// Elements whose text is never prose.
const NON_TEXT_TAGS: &[&str] = &["script", "style"];

/// Extract readable text from markup.
///
/// All text outside `script`/`style` is split into lines, each line is
/// trimmed and further split on double spaces into phrases, and the
/// non-empty phrases are joined with `\n`.
pub fn clean(markup: &str) -> String {
    let mut doc = Document::parse(markup);
    doc.remove_elements(NON_TEXT_TAGS);
    let text = doc.text(doc.root());

    let mut phrases = Vec::new();
    for line in text.split(is_line_boundary) {
        for phrase in line.trim().split("  ") {
            let phrase = phrase.trim();
            if !phrase.is_empty() {
                phrases.push(phrase);
            }
        }
    }
    phrases.join("\n")
}

/// Wrap plain text in markup that [`clean`] reads back unchanged.
pub fn to_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 7);
    out.push_str("<p>");
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out.push_str("</p>");
    out
}

/// Unicode line boundaries, as recognised by universal-newline splitting.
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
