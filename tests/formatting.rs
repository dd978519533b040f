//! End-to-end formatting behaviour of the XML text outputter: whitespace
//! policy, padding, empty elements, `xml:space`, escaping, TrAX processing
//! instructions and output encodings.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use xmloutput::format::{EscapeStrategy, Format, TextMode};
use xmloutput::walker::{DISABLE_OUTPUT_ESCAPING, ENABLE_OUTPUT_ESCAPING};
use xmloutput::{Attribute, Content, Document, Element, Namespace, ProcessingInstruction, XmlOutputter};

fn render(format: Format, element: &Element) -> String {
    XmlOutputter::new(format).output_element_to_string(element).unwrap()
}

fn xml_space(value: &str) -> Attribute {
    Attribute::new_ns("space", Namespace::xml(), value)
}

#[test]
fn trim_modes_on_text_content() {
    let p = Element::new("p").with_text("  a  b  ");
    let cases = [
        (TextMode::Preserve, "<p>  a  b  </p>"),
        (TextMode::None, "<p>  a  b  </p>"),
        (TextMode::TrimLeft, "<p>a  b  </p>"),
        (TextMode::TrimRight, "<p>  a  b</p>"),
        (TextMode::TrimBoth, "<p>a  b</p>"),
        (TextMode::Compact, "<p>a b</p>"),
    ];
    for (mode, expected) in cases {
        assert_eq!(render(Format::pretty().text_mode(mode), &p), expected, "{mode:?}");
    }
}

#[test]
fn cdata_keeps_its_boundaries() {
    let p = Element::new("p")
        .with_text("a")
        .with_child(Content::CData("b".to_string()))
        .with_text("c");
    assert_eq!(render(Format::pretty(), &p), "<p>a<![CDATA[b]]>c</p>");
    assert_eq!(render(Format::compact(), &p), "<p>a<![CDATA[b]]>c</p>");
}

#[test]
fn all_text_content_is_inlined() {
    let p = Element::new("p")
        .with_text(" x ")
        .with_child(Content::EntityRef("amp".to_string()))
        .with_text(" y ");
    assert_eq!(render(Format::pretty(), &p), "<p>x &amp; y</p>");
}

#[test]
fn mixed_content_is_padded() {
    let p = Element::new("p")
        .with_text(" hello ")
        .with_element(Element::new("b").with_text("bold"))
        .with_text(" world ");
    assert_eq!(
        render(Format::pretty(), &p),
        "<p>\n  hello\n  <b>bold</b>\n  world\n</p>"
    );
    assert_eq!(render(Format::compact(), &p), "<p>hello<b>bold</b>world</p>");
}

#[test]
fn nested_padding_follows_depth() {
    let root = Element::new("a").with_element(
        Element::new("b").with_element(Element::new("c").with_element(Element::new("d"))),
    );
    let format = Format::pretty().indent(Some("\t")).line_separator("\r\n");
    assert_eq!(
        render(format, &root),
        "<a>\r\n\t<b>\r\n\t\t<c>\r\n\t\t\t<d/>\r\n\t\t</c>\r\n\t</b>\r\n</a>"
    );
}

#[test]
fn empty_element_forms() {
    let empty = Element::new("a");
    let blank = Element::new("a").with_text("  \n ");
    assert_eq!(render(Format::pretty(), &empty), "<a/>");
    assert_eq!(render(Format::pretty(), &blank), "<a/>");
    assert_eq!(render(Format::raw(), &blank), "<a>  \n </a>");

    let expand = Format::pretty().expand_empty_elements(true);
    assert_eq!(render(expand.clone(), &empty), "<a></a>");
    assert_eq!(render(expand, &blank), "<a></a>");
}

#[test]
fn xml_space_overrides_and_reverts() {
    let pre = Element::new("pre")
        .with_attribute(xml_space("preserve"))
        .with_text("\n keep \n")
        .with_element(Element::new("x").with_element(Element::new("y")));
    let root = Element::new("root")
        .with_element(pre)
        .with_element(Element::new("q").with_text("  t  "));
    assert_eq!(
        render(Format::pretty(), &root),
        "<root>\n  <pre xml:space=\"preserve\">\n keep \n<x><y/></x></pre>\n  <q>t</q>\n</root>"
    );
}

#[test]
fn xml_space_default_restores_configured_mode() {
    let root = Element::new("root").with_attribute(xml_space("preserve")).with_element(
        Element::new("inner")
            .with_attribute(xml_space("default"))
            .with_text("  a   b  "),
    );
    assert_eq!(
        render(Format::compact(), &root),
        "<root xml:space=\"preserve\"><inner xml:space=\"default\">a b</inner></root>"
    );
}

#[test]
fn escaping_is_deterministic_and_not_reentrant() {
    let el = Element::new("a")
        .with_attribute(Attribute::new("v", "x & \"y\""))
        .with_text("&amp; <b> \u{e9}");
    let ascii = XmlOutputter::new(Format::raw().encoding("US-ASCII"));
    let first = ascii.output_element_to_string(&el).unwrap();
    let second = ascii.output_element_to_string(&el).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "<a v=\"x &amp; &quot;y&quot;\">&amp;amp; &lt;b&gt; &#xE9;</a>"
    );
}

#[test]
fn custom_escape_strategy() {
    let el = Element::new("a").with_text("abc");
    let format = Format::raw().escape_strategy(EscapeStrategy::custom(|c| c == 'b'));
    assert_eq!(render(format, &el), "<a>a&#x62;c</a>");
}

#[test]
fn trax_pis_toggle_escaping_for_the_sibling_scope() {
    let disable = Content::ProcessingInstruction(ProcessingInstruction::new(DISABLE_OUTPUT_ESCAPING, ""));
    let enable = Content::ProcessingInstruction(ProcessingInstruction::new(ENABLE_OUTPUT_ESCAPING, ""));
    let inner = Element::new("i").with_text("<in>");
    let p = Element::new("p")
        .with_child(disable)
        .with_text("<raw>")
        .with_element(inner)
        .with_child(enable)
        .with_text("<esc>");
    assert_eq!(
        render(Format::raw(), &p),
        "<p><raw><i><in></i>&lt;esc&gt;</p>"
    );

    // The toggle does not leak to the parent's later siblings.
    let root = Element::new("root")
        .with_element(p)
        .with_element(Element::new("after").with_text("<x>"));
    assert!(render(Format::raw(), &root).ends_with("<after>&lt;x&gt;</after></root>"));
}

#[test]
fn trax_pis_written_literally_when_ignored() {
    let p = Element::new("p")
        .with_child(Content::ProcessingInstruction(ProcessingInstruction::new(
            DISABLE_OUTPUT_ESCAPING,
            "",
        )))
        .with_text("<raw>");
    let format = Format::raw().ignore_trax_escaping_pis(true);
    assert_eq!(
        render(format, &p),
        format!("<p><?{DISABLE_OUTPUT_ESCAPING}?>&lt;raw&gt;</p>")
    );
}

#[test]
fn document_in_legacy_encoding() {
    let doc = Document::new(Element::new("a").with_text("\u{3042}\u{e9}"));
    let outputter = XmlOutputter::new(Format::raw().encoding("Shift_JIS"));
    let mut out = Vec::new();
    outputter.output_document(&doc, &mut out).unwrap();
    let mut expected = b"<?xml version=\"1.0\" encoding=\"Shift_JIS\"?>\n<a>".to_vec();
    expected.extend_from_slice(&[0x82, 0xA0]);
    expected.extend_from_slice(b"&#xE9;</a>\n");
    assert_eq!(out, expected);
}

#[test]
fn document_in_ascii() {
    let doc = Document::new(
        Element::new("a")
            .with_attribute(Attribute::new("name", "caf\u{e9}"))
            .with_text("na\u{ef}ve"),
    );
    let outputter = XmlOutputter::new(Format::raw().encoding("US-ASCII").omit_declaration(true));
    let mut out = Vec::new();
    outputter.output_document(&doc, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<a name=\"caf&#xE9;\">na&#xEF;ve</a>\n"
    );
}

#[test]
fn markup_outside_text_stays_in_declared_encoding() {
    let doc = Document::from_content(vec![
        Content::Comment("caf\u{e9}".to_string()),
        Content::ProcessingInstruction(ProcessingInstruction::new("note", "\u{e9}t\u{e9}")),
        Content::Element(Element::new("a")),
    ]);
    let outputter = XmlOutputter::new(Format::raw().encoding("US-ASCII"));
    let mut out = Vec::new();
    outputter.output_document(&doc, &mut out).unwrap();
    assert!(out.is_ascii());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<?xml version=\"1.0\" encoding=\"US-ASCII\"?>\n<!--caf&#233;--><?note &#233;t&#233;?><a/>\n"
    );
}

#[test]
fn sorted_attributes_are_stable_per_call() {
    let el = Element::new("e")
        .with_attribute(Attribute::new("zeta", "1"))
        .with_attribute(Attribute::new("alpha", "2"))
        .with_attribute(Attribute::new_ns("lang", Namespace::xml(), "en"));
    assert_eq!(
        render(Format::raw().sort_attributes(true), &el),
        "<e alpha=\"2\" xml:lang=\"en\" zeta=\"1\"/>"
    );
    assert_eq!(
        render(Format::raw(), &el),
        "<e zeta=\"1\" alpha=\"2\" xml:lang=\"en\"/>"
    );
}

#[test]
fn outputter_shared_across_threads() {
    let outputter = std::sync::Arc::new(XmlOutputter::new(Format::pretty()));
    let doc = std::sync::Arc::new(Document::new(
        Element::new("root").with_element(Element::new("child").with_text(" x ")),
    ));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let outputter = std::sync::Arc::clone(&outputter);
            let doc = std::sync::Arc::clone(&doc);
            std::thread::spawn(move || outputter.output_document_to_string(&doc).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <child>x</child>\n</root>\n"
        );
    }
}
