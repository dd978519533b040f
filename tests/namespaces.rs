//! Namespace declaration minimization across nested output.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use xmloutput::format::Format;
use xmloutput::{Attribute, Element, Namespace, XmlOutputter};

fn render(element: &Element) -> String {
    XmlOutputter::new(Format::raw())
        .output_element_to_string(element)
        .unwrap()
}

fn in_ns(name: &str, prefix: &str, uri: &str) -> Element {
    Element::new(name).with_namespace(Namespace::new(prefix, uri))
}

#[test]
fn default_namespace_declared_once() {
    let a = in_ns("a", "", "U1")
        .with_element(in_ns("b", "", "U1").with_element(in_ns("c", "", "U2")))
        .with_element(in_ns("d", "", "U1"));
    assert_eq!(
        render(&a),
        "<a xmlns=\"U1\"><b><c xmlns=\"U2\"/></b><d/></a>"
    );
}

#[test]
fn unqualified_child_resets_default_namespace() {
    let a = in_ns("a", "", "U1").with_element(Element::new("b"));
    assert_eq!(render(&a), "<a xmlns=\"U1\"><b xmlns=\"\"/></a>");
    assert_eq!(render(&Element::new("plain")), "<plain/>");
}

#[test]
fn prefixed_bindings_inherited() {
    let root = in_ns("root", "p", "urn:p")
        .with_element(in_ns("child", "p", "urn:p").with_attribute(Attribute::new_ns(
            "id",
            Namespace::new("p", "urn:p"),
            "1",
        )))
        .with_element(in_ns("other", "p", "urn:other"));
    assert_eq!(
        render(&root),
        "<p:root xmlns:p=\"urn:p\"><p:child p:id=\"1\"/><p:other xmlns:p=\"urn:other\"/></p:root>"
    );
}

#[test]
fn attribute_namespaces_are_declared() {
    let el = Element::new("link").with_attribute(Attribute::new_ns(
        "href",
        Namespace::new("xlink", "http://www.w3.org/1999/xlink"),
        "#a",
    ));
    assert_eq!(
        render(&el),
        "<link xmlns:xlink=\"http://www.w3.org/1999/xlink\" xlink:href=\"#a\"/>"
    );
}

#[test]
fn additional_namespaces_declared_in_order() {
    let el = in_ns("doc", "", "urn:doc")
        .with_additional_namespace(Namespace::new("b", "urn:b"))
        .with_additional_namespace(Namespace::new("a", "urn:a"))
        .with_element(in_ns("x", "a", "urn:a"));
    assert_eq!(
        render(&el),
        "<doc xmlns=\"urn:doc\" xmlns:b=\"urn:b\" xmlns:a=\"urn:a\"><a:x/></doc>"
    );
}

#[test]
fn xml_prefix_is_never_declared() {
    let el = Element::new("p").with_attribute(Attribute::new_ns("lang", Namespace::xml(), "en"));
    assert_eq!(render(&el), "<p xml:lang=\"en\"/>");
}

#[test]
fn namespace_uri_is_attribute_escaped() {
    let el = in_ns("a", "", "urn:x?a=1&b=\"2\"");
    assert_eq!(render(&el), "<a xmlns=\"urn:x?a=1&amp;b=&quot;2&quot;\"/>");
}

#[test]
fn qualified_name_constructor() {
    let el = Element::from_qname("svg:rect", "http://www.w3.org/2000/svg");
    assert_eq!(
        render(&el),
        "<svg:rect xmlns:svg=\"http://www.w3.org/2000/svg\"/>"
    );
    let malformed = Element::from_qname("svg:", "urn:x");
    assert_eq!(render(&malformed), "<svg:/>");
}
