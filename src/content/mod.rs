//! Source content model.
//!
//! This is the read-only tree the outputters walk. Every node kind is a
//! variant of [`Content`]; an [`Element`] owns its children directly, so a
//! tree is just nested values. The outputters never mutate it.
//!
//! # Examples
//!
//! ```
//! use xmloutput::{Content, Document, Element, Namespace};
//!
//! let root = Element::new("feed")
//!     .with_namespace(Namespace::new("", "http://www.w3.org/2005/Atom"))
//!     .with_child(Content::Element(Element::new("title").with_text("Example")));
//! let doc = Document::new(root);
//! assert_eq!(doc.root_element().map(|e| e.name.as_str()), Some("feed"));
//! ```

use std::borrow::Cow;

use crate::util::qname::{join_qname, split_qname_lenient};

/// The namespace URI bound to the `xml` prefix.
pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// The namespace URI of `xmlns` declaration attributes.
pub const XMLNS_NAMESPACE_URI: &str = "http://www.w3.org/2000/xmlns/";

/// A prefix to URI binding.
///
/// The empty prefix is the default namespace; the empty URI means "no
/// namespace".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace {
    /// Namespace prefix, empty for the default namespace.
    pub prefix: String,
    /// Namespace URI, empty for no namespace.
    pub uri: String,
}

impl Namespace {
    /// Creates a binding of `prefix` to `uri`.
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    /// The absence of a namespace (empty prefix, empty URI).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The implicit `xml` binding.
    #[must_use]
    pub fn xml() -> Self {
        Self::new("xml", XML_NAMESPACE_URI)
    }

    /// Returns `true` for the "no namespace" binding.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.prefix.is_empty() && self.uri.is_empty()
    }

    /// Returns `true` for the `xml` prefix.
    #[must_use]
    pub fn is_xml(&self) -> bool {
        self.prefix == "xml"
    }
}

/// An attribute on an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Local name.
    pub name: String,
    /// Namespace of the attribute; unprefixed attributes have none.
    pub namespace: Namespace,
    /// Unescaped value.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute with no namespace.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::none(),
            value: value.into(),
        }
    }

    /// Creates an attribute in a namespace.
    pub fn new_ns(name: impl Into<String>, namespace: Namespace, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            value: value.into(),
        }
    }

    /// The `prefix:name` form used on output.
    #[must_use]
    pub fn qualified_name(&self) -> Cow<'_, str> {
        join_qname(&self.namespace.prefix, &self.name)
    }
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local name.
    pub name: String,
    /// The element's own namespace.
    pub namespace: Namespace,
    /// Extra namespace bindings declared on this element.
    pub additional_namespaces: Vec<Namespace>,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
    /// Child content in document order.
    pub children: Vec<Content>,
}

impl Element {
    /// Creates an element with no namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::none(),
            additional_namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element from a `prefix:local` name and a namespace URI.
    ///
    /// A malformed qualified name (empty prefix or local part) does not
    /// resolve to a prefix and the element gets no namespace.
    ///
    /// ```
    /// use xmloutput::Element;
    ///
    /// let e = Element::from_qname("svg:rect", "http://www.w3.org/2000/svg");
    /// assert_eq!(e.qualified_name(), "svg:rect");
    /// let bad = Element::from_qname(":rect", "urn:x");
    /// assert!(bad.namespace.is_none());
    /// ```
    #[must_use]
    pub fn from_qname(qname: &str, uri: &str) -> Self {
        match split_qname_lenient(qname) {
            (Some(prefix), local) => Self::new(local).with_namespace(Namespace::new(prefix, uri)),
            (None, local) if qname.contains(':') => Self::new(local),
            (None, local) => Self::new(local).with_namespace(Namespace::new("", uri)),
        }
    }

    /// Sets the element's namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Adds an explicit namespace declaration.
    #[must_use]
    pub fn with_additional_namespace(mut self, namespace: Namespace) -> Self {
        self.additional_namespaces.push(namespace);
        self
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: Content) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_element(self, child: Element) -> Self {
        self.with_child(Content::Element(child))
    }

    /// Appends a text child.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Content::Text(text.into()))
    }

    /// The `prefix:name` form used on output.
    #[must_use]
    pub fn qualified_name(&self) -> Cow<'_, str> {
        join_qname(&self.namespace.prefix, &self.name)
    }

    /// Looks up an attribute value by local name and namespace URI.
    #[must_use]
    pub fn attribute_value_ns(&self, name: &str, uri: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.uri == uri)
            .map(|a| a.value.as_str())
    }

    /// Looks up the value of an attribute that has no namespace.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute_value_ns(name, "")
    }

    /// The value of `xml:space`, if present.
    #[must_use]
    pub fn xml_space(&self) -> Option<&str> {
        self.attribute_value_ns("space", XML_NAMESPACE_URI)
    }
}

/// A processing instruction, e.g. `<?xml-stylesheet href="a.css"?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    /// The PI target.
    pub target: String,
    /// The PI data; empty when there is none.
    pub data: String,
}

impl ProcessingInstruction {
    /// Creates a processing instruction.
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            data: data.into(),
        }
    }
}

/// A document type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    /// The declared root element name.
    pub element_name: String,
    /// The PUBLIC identifier, if any.
    pub public_id: Option<String>,
    /// The SYSTEM identifier, if any.
    pub system_id: Option<String>,
    /// The internal subset, without the surrounding brackets.
    pub internal_subset: Option<String>,
}

impl DocType {
    /// Creates a declaration with only an element name.
    pub fn new(element_name: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            public_id: None,
            system_id: None,
            internal_subset: None,
        }
    }

    /// Sets the PUBLIC and SYSTEM identifiers.
    #[must_use]
    pub fn with_ids(mut self, public_id: Option<&str>, system_id: Option<&str>) -> Self {
        self.public_id = public_id.map(str::to_string);
        self.system_id = system_id.map(str::to_string);
        self
    }

    /// Sets the internal subset.
    #[must_use]
    pub fn with_internal_subset(mut self, subset: impl Into<String>) -> Self {
        self.internal_subset = Some(subset.into());
        self
    }
}

/// A content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// An element and its subtree.
    Element(Element),
    /// Character data, unescaped.
    Text(String),
    /// A CDATA section's content.
    CData(String),
    /// A comment's text, without delimiters.
    Comment(String),
    /// A processing instruction.
    ProcessingInstruction(ProcessingInstruction),
    /// An unexpanded entity reference, by name.
    EntityRef(String),
    /// A document type declaration; only valid at document level.
    DocType(DocType),
}

impl Content {
    /// Returns `true` for nodes that coalesce into text runs: text, CDATA
    /// and entity references.
    #[must_use]
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::Text(_) | Self::CData(_) | Self::EntityRef(_))
    }
}

/// A document: top-level content with at most one root element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Top-level content in document order.
    pub content: Vec<Content>,
}

impl Document {
    /// Creates a document holding just a root element.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            content: vec![Content::Element(root)],
        }
    }

    /// Creates a document from arbitrary top-level content.
    #[must_use]
    pub fn from_content(content: Vec<Content>) -> Self {
        Self { content }
    }

    /// The root element, if any.
    #[must_use]
    pub fn root_element(&self) -> Option<&Element> {
        self.content.iter().find_map(|c| match c {
            Content::Element(e) => Some(e),
            _ => None,
        })
    }

    /// The document type declaration, if any.
    #[must_use]
    pub fn doctype(&self) -> Option<&DocType> {
        self.content.iter().find_map(|c| match c {
            Content::DocType(d) => Some(d),
            _ => None,
        })
    }
}
