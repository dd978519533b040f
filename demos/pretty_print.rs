//! Formats one document with the three presets, then builds it as a tree.
//!
//! Run with: `cargo run --example pretty_print`
#![allow(clippy::expect_used)]

use xmloutput::format::Format;
use xmloutput::tree::NodeKind;
use xmloutput::{
    Attribute, Content, DocType, Document, Element, Namespace, ProcessingInstruction, TreeOutputter,
    XmlOutputter,
};

fn bookstore() -> Document {
    let shop = Namespace::new("s", "http://example.com/shop");
    let book = |category: &str, title: &str, price: &str| {
        Element::new("book")
            .with_namespace(shop.clone())
            .with_attribute(Attribute::new("category", category))
            .with_text("\n      ")
            .with_element(
                Element::new("title")
                    .with_namespace(shop.clone())
                    .with_attribute(Attribute::new_ns("lang", Namespace::xml(), "en"))
                    .with_text(format!("  {title}  ")),
            )
            .with_element(Element::new("price").with_namespace(shop.clone()).with_text(price))
    };

    let notes = Element::new("notes")
        .with_attribute(Attribute::new_ns("space", Namespace::xml(), "preserve"))
        .with_text("  kept   exactly\n  as written  ");

    let root = Element::new("bookstore")
        .with_namespace(shop.clone())
        .with_text("\n  ")
        .with_element(book("fiction", "The Great Gatsby", "10.99"))
        .with_element(book("science", "A Brief History of Time & Space", "14.99"))
        .with_element(notes)
        .with_child(Content::Comment(" prices in USD ".to_string()))
        .with_element(Element::new("empty"));

    Document::from_content(vec![
        Content::DocType(DocType::new("s:bookstore").with_ids(None, Some("bookstore.dtd"))),
        Content::ProcessingInstruction(ProcessingInstruction::new(
            "xml-stylesheet",
            "type=\"text/css\" href=\"shop.css\"",
        )),
        Content::Element(root),
    ])
}

fn main() {
    let doc = bookstore();

    for (name, format) in [
        ("raw", Format::raw()),
        ("pretty", Format::pretty()),
        ("compact", Format::compact().indent(Some("\t"))),
    ] {
        let xml = XmlOutputter::new(format)
            .output_document_to_string(&doc)
            .expect("formatting failed");
        println!("--- {name} ---\n{xml}");
    }

    let latin1 = XmlOutputter::new(Format::pretty().encoding("ISO-8859-1"));
    let mut bytes = Vec::new();
    latin1
        .output_document(&doc, &mut bytes)
        .expect("writing ISO-8859-1 failed");
    println!("--- ISO-8859-1: {} bytes ---", bytes.len());

    let tree = TreeOutputter::new(Format::pretty())
        .output_document(&doc)
        .expect("tree output failed");
    let root = tree.root_element().expect("no root element");
    println!("--- tree ---");
    for child in tree.children(root) {
        match &tree.node(child).kind {
            NodeKind::Element { name, .. } => println!("element {name}: {:?}", tree.text_content(child)),
            NodeKind::Text { content } => println!("text {content:?}"),
            NodeKind::Comment { content } => println!("comment {content:?}"),
            other => println!("{other:?}"),
        }
    }
}
