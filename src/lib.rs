//! # xmloutput
//!
//! XML content formatting and serialization. Content built as a
//! [`Content`] tree is emitted either as XML text ([`XmlOutputter`]) or as
//! nodes of an arena [`tree::Document`] ([`TreeOutputter`]), with
//! configurable indentation, whitespace policy, escaping, encoding and
//! minimal namespace declarations.
//!
//! ## Quick Start
//!
//! ```
//! use xmloutput::format::Format;
//! use xmloutput::{Attribute, Document, Element, XmlOutputter};
//!
//! let root = Element::new("catalog")
//!     .with_element(
//!         Element::new("book")
//!             .with_attribute(Attribute::new("id", "b1"))
//!             .with_text("  Rust & XML  "),
//!     );
//! let xml = XmlOutputter::new(Format::pretty().omit_declaration(true))
//!     .output_document_to_string(&Document::new(root))
//!     .unwrap();
//! assert_eq!(xml, "<catalog>\n  <book id=\"b1\">Rust &amp; XML</book>\n</catalog>\n");
//! ```

pub mod content;
pub mod encoding;
pub mod error;
pub mod format;
pub mod namespace;
pub mod output;
pub mod tree;
pub mod util;
pub mod walker;

// Re-export primary types at the crate root for convenience.
pub use content::{Attribute, Content, DocType, Document, Element, Namespace, ProcessingInstruction};
pub use error::OutputError;
pub use format::{Format, TextMode};
pub use output::tree::TreeOutputter;
pub use output::xml::XmlOutputter;
