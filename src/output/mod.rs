//! Formatting driver shared by the output backends.
//!
//! The driver owns the traversal: it keeps the [`NamespaceStack`] and the
//! [`FormatStack`] in step with element nesting, runs a [`Walker`] over each
//! list of siblings, applies `xml:space` and TrAX escape toggles, and decides
//! where padding and escaping go. Backends only implement [`Sink`], the
//! small set of primitives that either write characters
//! ([`xml::XmlOutputter`]) or create nodes ([`tree::TreeOutputter`]).

pub mod tree;
pub mod xml;

use std::borrow::Cow;

use crate::content::{Attribute, Content, DocType, Document, Element, ProcessingInstruction};
use crate::error::OutputError;
use crate::format::escape::{escape_attribute, escape_text};
use crate::format::{Format, FormatStack, TextMode};
use crate::namespace::NamespaceStack;
use crate::util::text::is_all_whitespace;
use crate::walker::{Step, Walker};

/// How an element's tag is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseForm {
    /// No content: `<a/>`.
    SelfClosing,
    /// No content, expanded: `<a></a>`.
    Expanded,
    /// After content: `</a>`.
    AfterContent,
}

/// Output primitives implemented by each backend.
///
/// Strings handed to a sink are final: the driver has already trimmed,
/// padded and, when [`escapes`](Sink::escapes) is true, escaped them.
pub(crate) trait Sink {
    /// Whether text and attribute values must be escaped before they reach
    /// this sink.
    fn escapes(&self) -> bool;

    fn declaration(&mut self, fstack: &FormatStack<'_>) -> Result<(), OutputError>;

    fn doctype(&mut self, doctype: &DocType, fstack: &FormatStack<'_>) -> Result<(), OutputError>;

    fn open_element(&mut self, element: &Element) -> Result<(), OutputError>;

    fn namespace_declaration(&mut self, prefix: &str, uri: &str) -> Result<(), OutputError>;

    fn attribute(&mut self, attribute: &Attribute, value: &str) -> Result<(), OutputError>;

    /// Called once the start tag is complete and content follows.
    fn element_content(&mut self) -> Result<(), OutputError>;

    fn close_element(&mut self, element: &Element, form: CloseForm) -> Result<(), OutputError>;

    fn text(&mut self, text: &str) -> Result<(), OutputError>;

    fn cdata(&mut self, text: &str) -> Result<(), OutputError>;

    fn comment(&mut self, text: &str) -> Result<(), OutputError>;

    fn processing_instruction(&mut self, pi: &ProcessingInstruction) -> Result<(), OutputError>;

    fn entity_ref(&mut self, name: &str) -> Result<(), OutputError>;

    /// A TrAX processing instruction switched output escaping. The driver
    /// already applies the switch to what it hands over; sinks that do not
    /// escape record it so the effect can be reproduced later.
    fn output_escaping(&mut self, enabled: bool) -> Result<(), OutputError>;

    /// Called after a document with any output at all.
    fn end_document(&mut self, fstack: &FormatStack<'_>) -> Result<(), OutputError>;
}

/// What an outputter call was asked to emit.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source<'a> {
    Document(&'a Document),
    Element(&'a Element),
    /// An element's children, without its tags.
    ElementContent(&'a Element),
    Content(&'a [Content]),
    Text(&'a str),
    CData(&'a str),
    Comment(&'a str),
    ProcessingInstruction(&'a ProcessingInstruction),
    EntityRef(&'a str),
    DocType(&'a DocType),
}

impl Source<'_> {
    /// Short name used in log events.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Source::Document(_) => "document",
            Source::Element(_) => "element",
            Source::ElementContent(_) => "element content",
            Source::Content(_) => "content",
            Source::Text(_) => "text",
            Source::CData(_) => "cdata",
            Source::Comment(_) => "comment",
            Source::ProcessingInstruction(_) => "processing instruction",
            Source::EntityRef(_) => "entity ref",
            Source::DocType(_) => "doctype",
        }
    }
}

/// Emits `source` into `sink` with fresh stacks.
pub(crate) fn print<S: Sink>(sink: &mut S, format: &Format, source: Source<'_>) -> Result<(), OutputError> {
    let mut printer = Printer {
        sink,
        fstack: FormatStack::new(format),
        nstack: NamespaceStack::new(),
    };
    match source {
        Source::Document(doc) => printer.document(doc),
        Source::Element(element) => printer.element(element),
        Source::ElementContent(element) => printer.element_content(element),
        Source::Content(list) => printer.content_list(list),
        Source::Text(text) => printer.content_list(&[Content::Text(text.to_string())]),
        Source::CData(text) => printer.content_list(&[Content::CData(text.to_string())]),
        Source::Comment(text) => printer.sink.comment(text),
        Source::ProcessingInstruction(pi) => printer.sink.processing_instruction(pi),
        Source::EntityRef(name) => printer.sink.entity_ref(name),
        Source::DocType(doctype) => printer.content(&Content::DocType(doctype.clone())),
    }
}

struct Printer<'s, 'f, S: Sink> {
    sink: &'s mut S,
    fstack: FormatStack<'f>,
    nstack: NamespaceStack,
}

impl<S: Sink> Printer<'_, '_, S> {
    fn escaping(&self) -> bool {
        self.sink.escapes() && self.fstack.escape_output()
    }

    fn escaped_text<'v>(&self, text: &'v str) -> Cow<'v, str> {
        match self.fstack.escape_strategy() {
            Some(strategy) if self.escaping() => escape_text(text, strategy, self.fstack.level_eol()),
            _ => Cow::Borrowed(text),
        }
    }

    fn escaped_attribute<'v>(&self, value: &'v str) -> Cow<'v, str> {
        match self.fstack.escape_strategy() {
            Some(strategy) if self.escaping() => escape_attribute(value, strategy),
            _ => Cow::Borrowed(value),
        }
    }

    fn set_escape_output(&mut self, on: bool) -> Result<(), OutputError> {
        tracing::trace!(enabled = on, depth = self.fstack.depth(), "output escaping toggled");
        self.fstack.set_escape_output(on);
        self.sink.output_escaping(on)
    }

    fn document(&mut self, doc: &Document) -> Result<(), OutputError> {
        self.sink.declaration(&self.fstack)?;

        let mut wrote = false;
        let mut walker = Walker::new(&doc.content, &self.fstack, false);
        while let Some(step) = walker.next(&self.fstack) {
            match step {
                // Only whitespace is allowed between top-level nodes.
                Step::Text(text) if is_all_whitespace(&text) => {
                    self.sink.text(&text)?;
                    wrote = true;
                }
                Step::Content(Content::Text(text)) if is_all_whitespace(text) => {
                    self.sink.text(text)?;
                    wrote = true;
                }
                Step::Text(_)
                | Step::CData(_)
                | Step::Content(Content::Text(_) | Content::CData(_) | Content::EntityRef(_)) => {}
                Step::Content(node) => {
                    self.content(node)?;
                    wrote = true;
                }
                Step::Escaping(on) => self.set_escape_output(on)?,
            }
        }

        if wrote {
            self.sink.end_document(&self.fstack)?;
        }
        Ok(())
    }

    fn element(&mut self, element: &Element) -> Result<(), OutputError> {
        self.nstack.push(element);

        self.sink.open_element(element)?;
        for ns in self.nstack.added_forward() {
            let uri = self.escaped_attribute(&ns.uri);
            self.sink.namespace_declaration(&ns.prefix, &uri)?;
        }

        let mut attributes: Vec<&Attribute> = element.attributes.iter().collect();
        if self.fstack.is_sort_attributes() {
            attributes.sort_by(|a, b| a.qualified_name().cmp(&b.qualified_name()));
        }
        for attribute in attributes {
            let value = self.escaped_attribute(&attribute.value);
            self.sink.attribute(attribute, &value)?;
        }

        let empty_form = if self.fstack.is_expand_empty_elements() {
            CloseForm::Expanded
        } else {
            CloseForm::SelfClosing
        };

        if element.children.is_empty() {
            self.sink.close_element(element, empty_form)?;
            self.nstack.pop();
            return Ok(());
        }

        self.fstack.push();
        self.apply_xml_space(element);

        let mut walker = Walker::new(&element.children, &self.fstack, self.sink.escapes());
        if walker.has_visible() {
            self.sink.element_content()?;
            let padded = !walker.is_all_text();
            if padded {
                if let Some(pad) = self.fstack.pad_between() {
                    self.sink.text(&pad)?;
                }
            }
            self.steps(&mut walker)?;
            if padded {
                if let Some(pad) = self.fstack.pad_last() {
                    self.sink.text(&pad)?;
                }
            }
            self.fstack.pop();
            self.sink.close_element(element, CloseForm::AfterContent)?;
        } else {
            self.fstack.pop();
            self.sink.close_element(element, empty_form)?;
        }

        self.nstack.pop();
        Ok(())
    }

    fn apply_xml_space(&mut self, element: &Element) {
        match element.xml_space() {
            Some("preserve") => self.fstack.set_text_mode(TextMode::Preserve),
            Some("default") => {
                let mode = self.fstack.default_mode();
                self.fstack.set_text_mode(mode);
            }
            _ => {}
        }
    }

    fn element_content(&mut self, element: &Element) -> Result<(), OutputError> {
        self.nstack.push(element);
        self.apply_xml_space(element);
        self.content_list(&element.children)?;
        self.nstack.pop();
        Ok(())
    }

    fn content_list(&mut self, list: &[Content]) -> Result<(), OutputError> {
        let mut walker = Walker::new(list, &self.fstack, self.sink.escapes());
        self.steps(&mut walker)
    }

    fn steps(&mut self, walker: &mut Walker<'_>) -> Result<(), OutputError> {
        while let Some(step) = walker.next(&self.fstack) {
            match step {
                Step::Content(node) => self.content(node)?,
                Step::Text(text) => self.sink.text(&text)?,
                Step::CData(text) => self.sink.cdata(&text)?,
                Step::Escaping(on) => self.set_escape_output(on)?,
            }
        }
        Ok(())
    }

    fn content(&mut self, node: &Content) -> Result<(), OutputError> {
        match node {
            Content::Element(element) => self.element(element),
            Content::Text(text) => {
                let text = self.escaped_text(text);
                self.sink.text(&text)
            }
            Content::CData(text) => self.sink.cdata(text),
            Content::Comment(text) => self.sink.comment(text),
            Content::ProcessingInstruction(pi) => self.sink.processing_instruction(pi),
            Content::EntityRef(name) => self.sink.entity_ref(name),
            // Element content written without its tags still sits inside
            // the element's namespace scope.
            Content::DocType(doctype) if self.nstack.depth() > 0 => {
                tracing::trace!(
                    name = %doctype.element_name,
                    depth = self.nstack.depth(),
                    "rejecting DOCTYPE inside an element"
                );
                Err(OutputError::MisplacedDocType {
                    name: doctype.element_name.clone(),
                })
            }
            Content::DocType(doctype) => self.sink.doctype(doctype, &self.fstack),
        }
    }
}
