//! Tree output.
//!
//! [`TreeOutputter`] runs the same formatting as [`XmlOutputter`] but builds
//! nodes in a [`tree::Document`] arena instead of writing characters. Text is
//! never escaped on this path; padding produced by the format becomes
//! whitespace text nodes. TrAX escaping instructions are kept as processing
//! instruction nodes so that writing the tree out again has the same effect.
//!
//! [`XmlOutputter`]: super::xml::XmlOutputter

use crate::content::{self, Attribute, Content, DocType, Element, ProcessingInstruction, XMLNS_NAMESPACE_URI};
use crate::error::OutputError;
use crate::format::{Format, FormatStack};
use crate::tree::{self, NodeId, NodeKind};
use crate::walker::{DISABLE_OUTPUT_ESCAPING, ENABLE_OUTPUT_ESCAPING};

use super::{print, CloseForm, Sink, Source};

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

struct TreeSink<'d> {
    doc: &'d mut tree::Document,
    /// Parent for top-level nodes; `None` leaves them detached.
    base: Option<NodeId>,
    open: Vec<NodeId>,
    roots: Vec<NodeId>,
}

impl<'d> TreeSink<'d> {
    fn new(doc: &'d mut tree::Document, base: Option<NodeId>) -> Self {
        Self {
            doc,
            base,
            open: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn add(&mut self, kind: NodeKind) -> NodeId {
        let id = self.doc.create_node(kind);
        if let Some(parent) = self.open.last().copied().or(self.base) {
            self.doc.append_child(parent, id);
        }
        if self.open.is_empty() {
            self.roots.push(id);
        }
        id
    }

    fn push_attribute(&mut self, attribute: tree::Attribute) {
        if let Some(&element) = self.open.last() {
            self.doc.push_attribute(element, attribute);
        }
    }
}

impl Sink for TreeSink<'_> {
    fn escapes(&self) -> bool {
        false
    }

    fn declaration(&mut self, _fstack: &FormatStack<'_>) -> Result<(), OutputError> {
        Ok(())
    }

    fn doctype(&mut self, doctype: &DocType, _fstack: &FormatStack<'_>) -> Result<(), OutputError> {
        let at_document = self.open.is_empty()
            && self
                .base
                .is_some_and(|b| matches!(self.doc.node(b).kind, NodeKind::Document));
        if !at_document {
            tracing::trace!(name = %doctype.element_name, "rejecting DOCTYPE outside the document node");
            return Err(OutputError::MisplacedDocType {
                name: doctype.element_name.clone(),
            });
        }
        self.add(NodeKind::DocumentType {
            name: doctype.element_name.clone(),
            system_id: doctype.system_id.clone(),
            public_id: doctype.public_id.clone(),
            internal_subset: doctype.internal_subset.clone(),
        });
        Ok(())
    }

    fn open_element(&mut self, element: &Element) -> Result<(), OutputError> {
        let id = self.add(NodeKind::Element {
            name: element.name.clone(),
            prefix: non_empty(&element.namespace.prefix),
            namespace: non_empty(&element.namespace.uri),
            attributes: Vec::new(),
        });
        self.open.push(id);
        Ok(())
    }

    fn namespace_declaration(&mut self, prefix: &str, uri: &str) -> Result<(), OutputError> {
        let (name, prefix) = if prefix.is_empty() {
            ("xmlns".to_string(), None)
        } else {
            (prefix.to_string(), Some("xmlns".to_string()))
        };
        self.push_attribute(tree::Attribute {
            name,
            value: uri.to_string(),
            prefix,
            namespace: Some(XMLNS_NAMESPACE_URI.to_string()),
        });
        Ok(())
    }

    fn attribute(&mut self, attribute: &Attribute, value: &str) -> Result<(), OutputError> {
        self.push_attribute(tree::Attribute {
            name: attribute.name.clone(),
            value: value.to_string(),
            prefix: non_empty(&attribute.namespace.prefix),
            namespace: non_empty(&attribute.namespace.uri),
        });
        Ok(())
    }

    fn element_content(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn close_element(&mut self, _element: &Element, _form: CloseForm) -> Result<(), OutputError> {
        self.open.pop();
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), OutputError> {
        if !text.is_empty() {
            self.add(NodeKind::Text {
                content: text.to_string(),
            });
        }
        Ok(())
    }

    fn cdata(&mut self, text: &str) -> Result<(), OutputError> {
        self.add(NodeKind::CData {
            content: text.to_string(),
        });
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), OutputError> {
        self.add(NodeKind::Comment {
            content: text.to_string(),
        });
        Ok(())
    }

    fn processing_instruction(&mut self, pi: &ProcessingInstruction) -> Result<(), OutputError> {
        self.add(NodeKind::ProcessingInstruction {
            target: pi.target.clone(),
            data: non_empty(&pi.data),
        });
        Ok(())
    }

    fn entity_ref(&mut self, name: &str) -> Result<(), OutputError> {
        self.add(NodeKind::EntityRef {
            name: name.to_string(),
        });
        Ok(())
    }

    fn output_escaping(&mut self, enabled: bool) -> Result<(), OutputError> {
        let target = if enabled {
            ENABLE_OUTPUT_ESCAPING
        } else {
            DISABLE_OUTPUT_ESCAPING
        };
        self.add(NodeKind::ProcessingInstruction {
            target: target.to_string(),
            data: None,
        });
        Ok(())
    }

    fn end_document(&mut self, _fstack: &FormatStack<'_>) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Builds formatted content as nodes of a [`tree::Document`].
///
/// Apart from [`output_document`](Self::output_document), which returns a
/// new tree, every entry point creates its nodes detached inside a
/// caller-supplied document and returns their ids for the caller to attach.
///
/// # Examples
///
/// ```
/// use xmloutput::format::Format;
/// use xmloutput::{Document, Element, TreeOutputter};
///
/// let root = Element::new("root").with_text("  hi  ");
/// let tree = TreeOutputter::new(Format::pretty())
///     .output_document(&Document::new(root))
///     .unwrap();
/// let el = tree.root_element().unwrap();
/// assert_eq!(tree.node_name(el), Some("root"));
/// assert_eq!(tree.text_content(el), "hi");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeOutputter {
    format: Format,
}

impl TreeOutputter {
    /// Creates an outputter with the given format.
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    /// The format in use.
    #[must_use]
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Replaces the format.
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    fn build(&self, target: &mut tree::Document, source: Source<'_>) -> Result<Vec<NodeId>, OutputError> {
        tracing::debug!(
            kind = source.kind(),
            text_mode = ?self.format.text_mode,
            "building output tree"
        );
        let mut sink = TreeSink::new(target, None);
        print(&mut sink, &self.format, source)?;
        Ok(sink.roots)
    }

    fn build_one(&self, target: &mut tree::Document, source: Source<'_>) -> Result<NodeId, OutputError> {
        match self.build(target, source)?.as_slice() {
            [id] => Ok(*id),
            nodes => unreachable!("expected exactly one node, built {}", nodes.len()),
        }
    }

    /// Builds a new document from `doc`.
    ///
    /// The result carries version `1.0` and, unless the format omits it,
    /// the configured encoding.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::MisplacedDocType` if a DOCTYPE appears inside
    /// an element.
    pub fn output_document(&self, doc: &content::Document) -> Result<tree::Document, OutputError> {
        tracing::debug!(
            kind = "document",
            encoding = %self.format.encoding,
            text_mode = ?self.format.text_mode,
            "building output tree"
        );
        let mut target = tree::Document::new();
        target.version = Some("1.0".to_string());
        if !self.format.omit_encoding {
            target.encoding = Some(self.format.encoding.clone());
        }
        let base = target.root();
        let mut sink = TreeSink::new(&mut target, Some(base));
        print(&mut sink, &self.format, Source::Document(doc))?;
        Ok(target)
    }

    /// Builds an element and its subtree, detached.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::MisplacedDocType` if a DOCTYPE appears inside
    /// the element.
    pub fn output_element(&self, target: &mut tree::Document, element: &Element) -> Result<NodeId, OutputError> {
        self.build_one(target, Source::Element(element))
    }

    /// Builds an element's children without the element itself.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::MisplacedDocType` if a DOCTYPE appears among
    /// the children or below them.
    pub fn output_element_content(
        &self,
        target: &mut tree::Document,
        element: &Element,
    ) -> Result<Vec<NodeId>, OutputError> {
        self.build(target, Source::ElementContent(element))
    }

    /// Builds a list of sibling nodes.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::MisplacedDocType` for any DOCTYPE in the list,
    /// since detached nodes are not at document level.
    pub fn output_content(&self, target: &mut tree::Document, content: &[Content]) -> Result<Vec<NodeId>, OutputError> {
        self.build(target, Source::Content(content))
    }

    /// Builds a text node, trimmed per the format. Returns `None` when
    /// nothing is left after trimming.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_text(&self, target: &mut tree::Document, text: &str) -> Result<Option<NodeId>, OutputError> {
        Ok(self.build(target, Source::Text(text))?.first().copied())
    }

    /// Builds a CDATA node, trimmed per the format. Returns `None` when
    /// nothing is left after trimming.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_cdata(&self, target: &mut tree::Document, text: &str) -> Result<Option<NodeId>, OutputError> {
        Ok(self.build(target, Source::CData(text))?.first().copied())
    }

    /// Builds a comment node.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_comment(&self, target: &mut tree::Document, text: &str) -> Result<NodeId, OutputError> {
        self.build_one(target, Source::Comment(text))
    }

    /// Builds a processing instruction node, verbatim.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_processing_instruction(
        &self,
        target: &mut tree::Document,
        pi: &ProcessingInstruction,
    ) -> Result<NodeId, OutputError> {
        self.build_one(target, Source::ProcessingInstruction(pi))
    }

    /// Builds an entity reference node.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_entity_ref(&self, target: &mut tree::Document, name: &str) -> Result<NodeId, OutputError> {
        self.build_one(target, Source::EntityRef(name))
    }
}
