//! Markup parsing into a queryable arena DOM.
//!
//! [`Document`] is the narrow interface the renderer and the cleaner use:
//! tag-set queries in document order, element roles, descendant text, and
//! removal of elements by tag.

mod arena;
mod role_map;
mod tree_sink;
mod xhtml;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId};
pub use role_map::{Role, element_to_role};
pub use tree_sink::ArenaSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Node handle within a [`Document`].
pub type NodeId = ArenaNodeId;

/// A parsed content document.
pub struct Document {
    dom: ArenaDom,
}

impl Document {
    /// Parse markup with HTML recovery rules. Never fails.
    pub fn parse(markup: &str) -> Self {
        let sink = parse_document(ArenaSink::new(), ParseOpts::default()).one(markup);
        if sink.error_count() > 0 {
            tracing::trace!(errors = sink.error_count(), "recovered from markup errors");
        }
        Self {
            dom: sink.into_dom(),
        }
    }

    /// Parse markup that must be well-formed XHTML, with XML rules.
    ///
    /// `<p/>` is an empty paragraph and CDATA is text. The error describes
    /// the first well-formedness violation.
    pub fn parse_xhtml(markup: &str) -> Result<Self, String> {
        Ok(Self {
            dom: xhtml::parse_xhtml(markup)?,
        })
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.dom.document()
    }

    /// First element, in document order, whose tag is any of `tags`.
    pub fn find_first(&self, tags: &[&str]) -> Option<NodeId> {
        self.elements_matching(tags).next()
    }

    /// All elements whose tag is any of `tags`, in document order.
    ///
    /// Nested matches are all returned, outer before inner.
    pub fn find_all(&self, tags: &[&str]) -> Vec<NodeId> {
        self.elements_matching(tags).collect()
    }

    fn elements_matching<'a>(&'a self, tags: &'a [&str]) -> impl Iterator<Item = NodeId> + 'a {
        self.dom.descendants(self.root()).filter(move |&id| {
            self.tag_name(id)
                .is_some_and(|name| tags.iter().any(|t| t.eq_ignore_ascii_case(name)))
        })
    }

    /// Element tag name, or `None` for text, comments and the root.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.dom.element_name(node).map(|n| n.as_ref())
    }

    /// Structural role of a node.
    pub fn role(&self, node: NodeId) -> Role {
        self.dom
            .element_name(node)
            .map(element_to_role)
            .unwrap_or(Role::Other)
    }

    /// All descendant text of `node`, concatenated in document order.
    ///
    /// Comments are not text. Whitespace is kept as-is.
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        for id in self.dom.descendants(node) {
            if let Some(text) = self.dom.text_content(id) {
                out.push_str(text);
            }
        }
        out
    }

    /// Remove every element whose tag is any of `tags`, with its subtree.
    ///
    /// Returns the number of elements removed.
    pub fn remove_elements(&mut self, tags: &[&str]) -> usize {
        let doomed = self.find_all(tags);
        for &id in &doomed {
            self.dom.detach(id);
        }
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_is_by_position_not_level() {
        let doc = Document::parse("<h2>Second level first</h2><h1>First level later</h1>");
        let first = doc.find_first(&["h1", "h2"]).unwrap();
        assert_eq!(doc.tag_name(first), Some("h2"));
        assert_eq!(doc.text(first), "Second level first");
    }

    #[test]
    fn test_find_first_none() {
        let doc = Document::parse("<h3>Deep</h3><p>Body</p>");
        assert_eq!(doc.find_first(&["h1", "h2"]), None);
    }

    #[test]
    fn test_find_all_document_order() {
        let doc = Document::parse(
            "<div><p>one</p><h3>two</h3></div><section><p>three</p></section><h1>four</h1>",
        );
        let found = doc.find_all(&["h1", "h2", "h3", "h4", "h5", "h6", "p"]);
        let texts: Vec<_> = found.iter().map(|&id| doc.text(id)).collect();
        assert_eq!(texts, vec!["one", "two", "three", "four"]);
        assert_eq!(doc.role(found[1]), Role::Heading(3));
        assert_eq!(doc.role(found[0]), Role::Paragraph);
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let doc = Document::parse("<p>  Hello <em>brave</em> <!-- note -->new\n world  </p>");
        let p = doc.find_first(&["p"]).unwrap();
        assert_eq!(doc.text(p), "  Hello brave new\n world  ");
    }

    #[test]
    fn test_entities_are_decoded() {
        let doc = Document::parse("<p>Fish &amp; Chips&nbsp;&#8212; &lt;3</p>");
        let p = doc.find_first(&["p"]).unwrap();
        assert_eq!(doc.text(p), "Fish & Chips\u{a0}\u{2014} <3");
    }

    #[test]
    fn test_remove_elements() {
        let mut doc = Document::parse(
            "<html><head><style>p { color: red }</style></head>\
             <body><p>keep</p><script>var x = 1;</script></body></html>",
        );
        assert_eq!(doc.remove_elements(&["script", "style"]), 2);
        assert_eq!(doc.text(doc.root()), "keep");
        assert_eq!(doc.find_first(&["script"]), None);
    }

    #[test]
    fn test_parse_xhtml_rejects_malformed() {
        assert!(Document::parse_xhtml("<h1>Intro</h1><p>Hello</p>").is_ok());
        assert!(Document::parse_xhtml("<h1>Intro</h1><p>Hello").is_err());
    }

    #[test]
    fn test_parse_xhtml_keeps_empty_elements_empty() {
        let doc = Document::parse_xhtml("<div><p/>Loose text<h2>X</h2></div>").unwrap();
        let found = doc.find_all(&["p", "h2"]);
        assert_eq!(found.len(), 2);
        assert_eq!(doc.text(found[0]), "");
        assert_eq!(doc.text(found[1]), "X");
        assert_eq!(doc.text(doc.root()), "Loose textX");
    }
}
