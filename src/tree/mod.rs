//! Arena-based output tree.
//!
//! The tree backend builds into this representation. All nodes live in a
//! contiguous `Vec<NodeData>` owned by the [`Document`] and are referenced by
//! [`NodeId`], a newtype over `NonZeroU32`.
//!
//! Navigation links (parent, first\_child, last\_child, next\_sibling,
//! prev\_sibling) are arena indices, so building and walking a tree needs no
//! reference counting and dropping the `Document` frees everything at once.

mod node;

pub use node::NodeKind;

use std::borrow::Cow;
use std::num::NonZeroU32;

use crate::util::qname::join_qname;

/// A typed index into the document's node arena.
///
/// `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node type and payload.
    pub kind: NodeKind,
    /// Parent node; `None` for the document node and for detached nodes.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An attribute on an element node.
///
/// Namespace declarations are stored as attributes too: `xmlns` or
/// `xmlns:p`, in the `http://www.w3.org/2000/xmlns/` namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The local name.
    pub name: String,
    /// The value, unescaped.
    pub value: String,
    /// Namespace prefix, if any.
    pub prefix: Option<String>,
    /// Namespace URI, if any.
    pub namespace: Option<String>,
}

impl Attribute {
    /// The name as written: `prefix:name` or `name`.
    #[must_use]
    pub fn qualified_name(&self) -> Cow<'_, str> {
        join_qname(self.prefix.as_deref().unwrap_or(""), &self.name)
    }
}

/// An output document.
///
/// The `Document` owns all nodes in an arena. Navigation goes through
/// `&Document` and mutation through `&mut Document`.
///
/// # Examples
///
/// ```
/// use xmloutput::tree::{Document, NodeKind};
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let el = doc.create_node(NodeKind::Element {
///     name: "root".to_string(),
///     prefix: None,
///     namespace: None,
///     attributes: vec![],
/// });
/// doc.append_child(root, el);
/// assert_eq!(doc.root_element(), Some(el));
/// assert_eq!(doc.node_name(el), Some("root"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document node id (not the root element).
    root: NodeId,
    /// XML version (e.g., "1.0").
    pub version: Option<String>,
    /// Declared encoding (e.g., "UTF-8").
    pub encoding: Option<String>,
    /// Standalone flag.
    pub standalone: Option<bool>,
}

impl Document {
    /// Creates a document holding only its document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
            version: None,
            encoding: None,
            standalone: None,
        }
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the first element child of the document node.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.node(id).kind, NodeKind::Element { .. }))
    }

    /// Returns the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the local name of an element, the target of a PI, or the
    /// name of an entity reference or DOCTYPE.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. }
            | NodeKind::ProcessingInstruction { target: name, .. }
            | NodeKind::EntityRef { name }
            | NodeKind::DocumentType { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the namespace URI of an element node, if any.
    #[must_use]
    pub fn node_namespace(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { namespace, .. } => namespace.as_deref(),
            _ => None,
        }
    }

    /// Returns the content of a text, CDATA or comment node, or the data of
    /// a PI.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::CData { content } => Some(content),
            NodeKind::ProcessingInstruction { data, .. } => data.as_deref(),
            _ => None,
        }
    }

    /// Returns the concatenated text and CDATA of a node and its
    /// descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text { content } | NodeKind::CData { content } => buf.push_str(content),
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, buf);
                }
            }
        }
    }

    /// Returns the attributes of an element node; empty for other nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by qualified name.
    #[must_use]
    pub fn attribute(&self, id: NodeId, qname: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.qualified_name() == qname)
            .map(|a| a.value.as_str())
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns a depth-first iterator over the descendants of a node.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    // --- Mutation ---

    /// Allocates a detached node and returns its id.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Appends `child` to the end of `parent`'s child list.
    ///
    /// `child` must be detached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
        } else {
            self.node_mut(parent).first_child = Some(child);
        }
        self.node_mut(parent).last_child = Some(child);
    }

    /// Adds an attribute to an element node. Ignored for other nodes.
    pub fn push_attribute(&mut self, id: NodeId, attribute: Attribute) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind {
            attributes.push(attribute);
        }
    }

    /// Number of nodes in the arena, the document node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Depth-first iterator over the descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        let mut node = current;
        loop {
            if node == self.root {
                self.next = None;
                break;
            }
            if let Some(sibling) = self.doc.next_sibling(node) {
                self.next = Some(sibling);
                break;
            }
            match self.doc.parent(node) {
                Some(parent) => node = parent,
                None => {
                    self.next = None;
                    break;
                }
            }
        }
        Some(current)
    }
}
