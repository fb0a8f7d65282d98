//! Arena DOM for parsed content documents.
//!
//! Nodes live in one vector and refer to each other by index. Detached nodes
//! stay in the arena, so an [`ArenaNodeId`] stays valid for the arena's
//! lifetime. Only what text extraction needs is kept: element names and text.
//! Attributes and comment bodies are dropped at parse time.

use html5ever::{LocalName, QualName};

/// Index of a node in its [`ArenaDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(u32);

impl ArenaNodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaNodeData {
    Document,
    /// Boxed so the tree sink can lend out `&QualName` while the arena grows.
    Element(Box<QualName>),
    Text(String),
    Comment,
    Doctype,
}

/// A node and its links.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: Option<ArenaNodeId>,
    pub children: Vec<ArenaNodeId>,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A document tree stored in a single vector.
#[derive(Debug)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDom {
    /// An arena holding only the document root.
    pub fn new() -> Self {
        Self {
            nodes: vec![ArenaNode::new(ArenaNodeData::Document)],
        }
    }

    pub fn document(&self) -> ArenaNodeId {
        ArenaNodeId(0)
    }

    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        self.nodes.get_mut(id.index())
    }

    /// Allocate a detached node.
    pub fn create(&mut self, data: ArenaNodeData) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(ArenaNode::new(data));
        id
    }

    pub fn create_element(&mut self, name: QualName) -> ArenaNodeId {
        self.create(ArenaNodeData::Element(Box::new(name)))
    }

    pub fn parent(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of `id`, in order.
    pub fn children(&self, id: ArenaNodeId) -> &[ArenaNodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Move `node` right before `sibling`. No-op if `sibling` is detached.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, node: ArenaNodeId) {
        self.detach(node);
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let Some(pos) = self.position(parent, sibling) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.insert(pos, node);
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = Some(parent);
        }
    }

    /// Append text to `parent`, merging with a trailing text node.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last = self.children(parent).last().copied();
        if let Some(last) = last
            && self.push_text(last, text)
        {
            return;
        }
        let node = self.create(ArenaNodeData::Text(text.to_string()));
        self.append(parent, node);
    }

    /// Insert text before `sibling`, merging with a preceding text node.
    pub fn insert_text_before(&mut self, sibling: ArenaNodeId, text: &str) {
        let prev = self.parent(sibling).and_then(|parent| {
            let pos = self.position(parent, sibling)?;
            pos.checked_sub(1).map(|i| self.children(parent)[i])
        });
        if let Some(prev) = prev
            && self.push_text(prev, text)
        {
            return;
        }
        let node = self.create(ArenaNodeData::Text(text.to_string()));
        self.insert_before(sibling, node);
    }

    fn push_text(&mut self, id: ArenaNodeId, text: &str) -> bool {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(ArenaNodeData::Text(existing)) => {
                existing.push_str(text);
                true
            }
            _ => false,
        }
    }

    fn position(&self, parent: ArenaNodeId, child: ArenaNodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Unlink `id` (with its subtree) from its parent.
    pub fn detach(&mut self, id: ArenaNodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Move all children of `from` to the end of `to`.
    pub fn reparent_children(&mut self, from: ArenaNodeId, to: ArenaNodeId) {
        let moved = match self.get_mut(from) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for &child in &moved {
            if let Some(n) = self.get_mut(child) {
                n.parent = Some(to);
            }
        }
        if let Some(n) = self.get_mut(to) {
            n.children.extend(moved);
        }
    }

    /// `root` and everything under it, in document order.
    pub fn descendants(&self, root: ArenaNodeId) -> Descendants<'_> {
        let stack = if self.get(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        Descendants { dom: self, stack }
    }

    pub fn qual_name(&self, id: ArenaNodeId) -> Option<&QualName> {
        match self.get(id).map(|n| &n.data) {
            Some(ArenaNodeData::Element(name)) => Some(&**name),
            _ => None,
        }
    }

    /// Tag name of an element node.
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.qual_name(id).map(|name| &name.local)
    }

    /// Contents of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.data) {
            Some(ArenaNodeData::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Pre-order traversal of a subtree.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    stack: Vec<ArenaNodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(id).iter().rev().copied());
        Some(id)
    }
}
