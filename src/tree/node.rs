//! Node type definitions for the output tree.
//!
//! Each variant carries the payload of one node type. Navigation links live
//! in [`NodeData`](super::NodeData).

use super::Attribute;

/// The kind of a node in an output [`Document`](super::Document) and its
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node; exactly one per `Document`.
    Document,

    /// An element, e.g. `<p:div class="x">`.
    Element {
        /// The local name.
        name: String,
        /// Namespace prefix, if any.
        prefix: Option<String>,
        /// Namespace URI, if any.
        namespace: Option<String>,
        /// Attributes, including `xmlns` declarations.
        attributes: Vec<Attribute>,
    },

    /// Character data.
    Text {
        /// The text, unescaped.
        content: String,
    },

    /// A CDATA section.
    CData {
        /// The section content.
        content: String,
    },

    /// A comment.
    Comment {
        /// The comment text without delimiters.
        content: String,
    },

    /// A processing instruction.
    ProcessingInstruction {
        /// The PI target.
        target: String,
        /// The PI data; `None` when empty.
        data: Option<String>,
    },

    /// An unexpanded entity reference.
    EntityRef {
        /// The entity name without `&` and `;`.
        name: String,
    },

    /// A document type declaration.
    DocumentType {
        /// The declared root element name.
        name: String,
        /// The SYSTEM identifier, if any.
        system_id: Option<String>,
        /// The PUBLIC identifier, if any.
        public_id: Option<String>,
        /// The internal subset text, if any.
        internal_subset: Option<String>,
    },
}
