//! Namespace scope tracking for minimal `xmlns` declarations.
//!
//! The stack holds one scope per open element. Each scope maps prefixes to
//! the URIs visible at that depth and remembers which bindings were first
//! introduced there; only those need an `xmlns` attribute on output.

use std::collections::BTreeMap;

use crate::content::{Element, Namespace, XML_NAMESPACE_URI};

/// A namespace binding: prefix (empty string for default namespace) to URI.
type NsBinding = BTreeMap<String, String>;

#[derive(Debug, Clone)]
struct Scope {
    bindings: NsBinding,
    added: Vec<Namespace>,
}

/// Stack of visible namespace bindings.
///
/// # Examples
///
/// ```
/// use xmloutput::namespace::NamespaceStack;
/// use xmloutput::{Element, Namespace};
///
/// let outer = Element::new("a").with_namespace(Namespace::new("", "urn:one"));
/// let inner = Element::new("b").with_namespace(Namespace::new("", "urn:one"));
///
/// let mut stack = NamespaceStack::new();
/// stack.push(&outer);
/// assert_eq!(stack.added_forward().len(), 1);
/// stack.push(&inner);
/// assert!(stack.added_forward().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct NamespaceStack {
    scopes: Vec<Scope>,
}

impl Default for NamespaceStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceStack {
    /// Creates a stack whose base scope binds `xml` and maps the default
    /// prefix to no namespace.
    #[must_use]
    pub fn new() -> Self {
        let mut bindings = NsBinding::new();
        bindings.insert(String::new(), String::new());
        bindings.insert("xml".to_string(), XML_NAMESPACE_URI.to_string());
        Self {
            scopes: vec![Scope {
                bindings,
                added: Vec::new(),
            }],
        }
    }

    fn top(&self) -> &Scope {
        // The base scope is never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    /// Enters `element`, making its namespaces visible.
    ///
    /// Bindings are considered in discovery order: the element's own
    /// namespace, its additional declarations, then attribute namespaces.
    /// A binding is added only when its prefix is not already visible with
    /// the same URI. Unprefixed attributes, the `xml` prefix and prefixes
    /// bound to an empty URI never add anything.
    pub fn push(&mut self, element: &Element) {
        let mut scope = Scope {
            bindings: self.top().bindings.clone(),
            added: Vec::new(),
        };

        scope.declare(&element.namespace);
        for ns in &element.additional_namespaces {
            if !ns.prefix.is_empty() && ns.uri.is_empty() {
                continue;
            }
            scope.declare(ns);
        }
        for attr in &element.attributes {
            if attr.namespace.prefix.is_empty() || attr.namespace.uri.is_empty() {
                continue;
            }
            scope.declare(&attr.namespace);
        }

        self.scopes.push(scope);
    }

    /// Leaves the current element, re-exposing any bindings it shadowed.
    ///
    /// # Panics
    ///
    /// Panics if there is no pushed element; that is a bug in the caller.
    pub fn pop(&mut self) {
        assert!(self.scopes.len() > 1, "NamespaceStack popped below the base scope");
        self.scopes.pop();
    }

    /// Bindings introduced by the most recent [`push`](Self::push), in the
    /// order they were discovered.
    #[must_use]
    pub fn added_forward(&self) -> &[Namespace] {
        &self.top().added
    }

    /// The URI currently bound to `prefix`.
    #[must_use]
    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.top().bindings.get(prefix).map(String::as_str)
    }

    /// Returns `true` if `ns` is visible exactly as given.
    #[must_use]
    pub fn is_in_scope(&self, ns: &Namespace) -> bool {
        self.uri(&ns.prefix) == Some(ns.uri.as_str())
    }

    /// Number of pushed elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }
}

impl Scope {
    fn declare(&mut self, ns: &Namespace) {
        if ns.is_xml() {
            return;
        }
        if self.bindings.get(&ns.prefix) == Some(&ns.uri) {
            return;
        }
        // A prefix can only be declared once per element; the first binding
        // wins.
        if self.added.iter().any(|a| a.prefix == ns.prefix) {
            return;
        }
        self.bindings.insert(ns.prefix.clone(), ns.uri.clone());
        self.added.push(ns.clone());
    }
}
