//! XML text output.
//!
//! [`XmlOutputter`] writes content as XML characters, either to any
//! `io::Write` (encoded in the configured encoding) or to a `String`.

use std::io::{self, Write};

use crate::content::{Attribute, Content, DocType, Document, Element, ProcessingInstruction};
use crate::encoding::EncodedWriter;
use crate::error::OutputError;
use crate::format::{Format, FormatStack};

use super::{print, CloseForm, Sink, Source};

/// A character destination.
pub(crate) trait TextWrite {
    fn write_str(&mut self, s: &str) -> io::Result<()>;
}

impl TextWrite for String {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }
}

impl<W: Write> TextWrite for EncodedWriter<W> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        EncodedWriter::write_str(self, s)
    }
}

struct XmlSink<'w, T: TextWrite> {
    out: &'w mut T,
}

impl<T: TextWrite> XmlSink<'_, T> {
    fn write(&mut self, s: &str) -> Result<(), OutputError> {
        self.out.write_str(s)?;
        Ok(())
    }
}

impl<T: TextWrite> Sink for XmlSink<'_, T> {
    fn escapes(&self) -> bool {
        true
    }

    fn declaration(&mut self, fstack: &FormatStack<'_>) -> Result<(), OutputError> {
        if fstack.is_omit_declaration() {
            return Ok(());
        }
        self.write("<?xml version=\"1.0\"")?;
        if !fstack.is_omit_encoding() {
            self.write(" encoding=\"")?;
            self.write(fstack.encoding())?;
            self.write("\"")?;
        }
        self.write("?>")?;
        self.write(fstack.line_separator())
    }

    fn doctype(&mut self, doctype: &DocType, fstack: &FormatStack<'_>) -> Result<(), OutputError> {
        self.write("<!DOCTYPE ")?;
        self.write(&doctype.element_name)?;
        if let Some(public_id) = &doctype.public_id {
            self.write(" PUBLIC \"")?;
            self.write(public_id)?;
            self.write("\"")?;
        }
        if let Some(system_id) = &doctype.system_id {
            if doctype.public_id.is_none() {
                self.write(" SYSTEM")?;
            }
            self.write(" \"")?;
            self.write(system_id)?;
            self.write("\"")?;
        }
        if let Some(subset) = doctype.internal_subset.as_deref().filter(|s| !s.is_empty()) {
            self.write(" [")?;
            self.write(fstack.line_separator())?;
            self.write(subset)?;
            self.write("]")?;
        }
        self.write(">")
    }

    fn open_element(&mut self, element: &Element) -> Result<(), OutputError> {
        self.write("<")?;
        self.write(&element.qualified_name())
    }

    fn namespace_declaration(&mut self, prefix: &str, uri: &str) -> Result<(), OutputError> {
        self.write(" xmlns")?;
        if !prefix.is_empty() {
            self.write(":")?;
            self.write(prefix)?;
        }
        self.write("=\"")?;
        self.write(uri)?;
        self.write("\"")
    }

    fn attribute(&mut self, attribute: &Attribute, value: &str) -> Result<(), OutputError> {
        self.write(" ")?;
        self.write(&attribute.qualified_name())?;
        self.write("=\"")?;
        self.write(value)?;
        self.write("\"")
    }

    fn element_content(&mut self) -> Result<(), OutputError> {
        self.write(">")
    }

    fn close_element(&mut self, element: &Element, form: CloseForm) -> Result<(), OutputError> {
        match form {
            CloseForm::SelfClosing => self.write("/>"),
            CloseForm::Expanded | CloseForm::AfterContent => {
                if form == CloseForm::Expanded {
                    self.write(">")?;
                }
                self.write("</")?;
                self.write(&element.qualified_name())?;
                self.write(">")
            }
        }
    }

    fn text(&mut self, text: &str) -> Result<(), OutputError> {
        self.write(text)
    }

    fn cdata(&mut self, text: &str) -> Result<(), OutputError> {
        self.write("<![CDATA[")?;
        self.write(text)?;
        self.write("]]>")
    }

    fn comment(&mut self, text: &str) -> Result<(), OutputError> {
        self.write("<!--")?;
        self.write(text)?;
        self.write("-->")
    }

    fn processing_instruction(&mut self, pi: &ProcessingInstruction) -> Result<(), OutputError> {
        self.write("<?")?;
        self.write(&pi.target)?;
        if !pi.data.is_empty() {
            self.write(" ")?;
            self.write(&pi.data)?;
        }
        self.write("?>")
    }

    fn entity_ref(&mut self, name: &str) -> Result<(), OutputError> {
        self.write("&")?;
        self.write(name)?;
        self.write(";")
    }

    fn output_escaping(&mut self, _enabled: bool) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_document(&mut self, fstack: &FormatStack<'_>) -> Result<(), OutputError> {
        self.write(fstack.line_separator())
    }
}

/// Writes content as XML text.
///
/// The outputter only holds its [`Format`]; every call builds its own
/// formatting state, so one outputter can serve concurrent calls.
///
/// # Examples
///
/// ```
/// use xmloutput::format::Format;
/// use xmloutput::{Document, Element, XmlOutputter};
///
/// let root = Element::new("root").with_element(Element::new("child").with_text("Hello"));
/// let outputter = XmlOutputter::new(Format::pretty());
/// let xml = outputter.output_document_to_string(&Document::new(root)).unwrap();
/// assert_eq!(
///     xml,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <child>Hello</child>\n</root>\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlOutputter {
    format: Format,
}

impl XmlOutputter {
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

    fn write<W: Write>(&self, source: Source<'_>, out: W) -> Result<(), OutputError> {
        tracing::debug!(
            kind = source.kind(),
            encoding = %self.format.encoding,
            text_mode = ?self.format.text_mode,
            "writing XML"
        );
        let mut writer = EncodedWriter::new(out, &self.format.encoding)?;
        print(&mut XmlSink { out: &mut writer }, &self.format, source)?;
        writer.flush()?;
        Ok(())
    }

    fn render(&self, source: Source<'_>) -> Result<String, OutputError> {
        tracing::debug!(
            kind = source.kind(),
            text_mode = ?self.format.text_mode,
            "rendering XML to string"
        );
        let mut out = String::new();
        print(&mut XmlSink { out: &mut out }, &self.format, source)?;
        Ok(out)
    }

    /// Writes a whole document: declaration, top-level content and a
    /// trailing line separator.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` if the writer fails,
    /// `OutputError::Encoding` if the configured encoding is unknown, and
    /// `OutputError::MisplacedDocType` if a DOCTYPE appears inside an
    /// element.
    pub fn output_document<W: Write>(&self, doc: &Document, out: W) -> Result<(), OutputError> {
        self.write(Source::Document(doc), out)
    }

    /// Renders a whole document to a string.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::MisplacedDocType` if a DOCTYPE appears inside
    /// an element.
    pub fn output_document_to_string(&self, doc: &Document) -> Result<String, OutputError> {
        self.render(Source::Document(doc))
    }

    /// Writes an element and its subtree.
    ///
    /// # Errors
    ///
    /// See [`output_document`](Self::output_document).
    pub fn output_element<W: Write>(&self, element: &Element, out: W) -> Result<(), OutputError> {
        self.write(Source::Element(element), out)
    }

    /// Renders an element and its subtree to a string.
    ///
    /// # Errors
    ///
    /// See [`output_document_to_string`](Self::output_document_to_string).
    pub fn output_element_to_string(&self, element: &Element) -> Result<String, OutputError> {
        self.render(Source::Element(element))
    }

    /// Writes an element's children without its start and end tags.
    ///
    /// The element's namespace bindings and `xml:space` setting apply to
    /// the children as if the tags had been written.
    ///
    /// # Errors
    ///
    /// See [`output_document`](Self::output_document).
    pub fn output_element_content<W: Write>(&self, element: &Element, out: W) -> Result<(), OutputError> {
        self.write(Source::ElementContent(element), out)
    }

    /// Renders an element's children without its tags.
    ///
    /// # Errors
    ///
    /// See [`output_document_to_string`](Self::output_document_to_string).
    pub fn output_element_content_to_string(&self, element: &Element) -> Result<String, OutputError> {
        self.render(Source::ElementContent(element))
    }

    /// Writes a list of sibling nodes.
    ///
    /// # Errors
    ///
    /// See [`output_document`](Self::output_document).
    pub fn output_content<W: Write>(&self, content: &[Content], out: W) -> Result<(), OutputError> {
        self.write(Source::Content(content), out)
    }

    /// Renders a list of sibling nodes to a string.
    ///
    /// # Errors
    ///
    /// See [`output_document_to_string`](Self::output_document_to_string).
    pub fn output_content_to_string(&self, content: &[Content]) -> Result<String, OutputError> {
        self.render(Source::Content(content))
    }

    /// Writes text, trimmed and escaped per the format.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` or `OutputError::Encoding`.
    pub fn output_text<W: Write>(&self, text: &str, out: W) -> Result<(), OutputError> {
        self.write(Source::Text(text), out)
    }

    /// Renders text, trimmed and escaped per the format.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_text_to_string(&self, text: &str) -> Result<String, OutputError> {
        self.render(Source::Text(text))
    }

    /// Writes a CDATA section, trimmed per the format.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` or `OutputError::Encoding`.
    pub fn output_cdata<W: Write>(&self, text: &str, out: W) -> Result<(), OutputError> {
        self.write(Source::CData(text), out)
    }

    /// Renders a CDATA section.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_cdata_to_string(&self, text: &str) -> Result<String, OutputError> {
        self.render(Source::CData(text))
    }

    /// Writes a comment.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` or `OutputError::Encoding`.
    pub fn output_comment<W: Write>(&self, text: &str, out: W) -> Result<(), OutputError> {
        self.write(Source::Comment(text), out)
    }

    /// Renders a comment.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_comment_to_string(&self, text: &str) -> Result<String, OutputError> {
        self.render(Source::Comment(text))
    }

    /// Writes a processing instruction verbatim. TrAX escaping targets are
    /// not interpreted here.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` or `OutputError::Encoding`.
    pub fn output_processing_instruction<W: Write>(
        &self,
        pi: &ProcessingInstruction,
        out: W,
    ) -> Result<(), OutputError> {
        self.write(Source::ProcessingInstruction(pi), out)
    }

    /// Renders a processing instruction verbatim.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_processing_instruction_to_string(
        &self,
        pi: &ProcessingInstruction,
    ) -> Result<String, OutputError> {
        self.render(Source::ProcessingInstruction(pi))
    }

    /// Writes an entity reference, `&name;`.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` or `OutputError::Encoding`.
    pub fn output_entity_ref<W: Write>(&self, name: &str, out: W) -> Result<(), OutputError> {
        self.write(Source::EntityRef(name), out)
    }

    /// Renders an entity reference.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_entity_ref_to_string(&self, name: &str) -> Result<String, OutputError> {
        self.render(Source::EntityRef(name))
    }

    /// Writes a document type declaration.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::Io` or `OutputError::Encoding`.
    pub fn output_doctype<W: Write>(&self, doctype: &DocType, out: W) -> Result<(), OutputError> {
        self.write(Source::DocType(doctype), out)
    }

    /// Renders a document type declaration.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the `Result` mirrors the other entry points.
    pub fn output_doctype_to_string(&self, doctype: &DocType) -> Result<String, OutputError> {
        self.render(Source::DocType(doctype))
    }
}
