//! XML namespace handling
//!
//! This module provides qualified names (QNames), well-known namespace
//! URIs and the prefix bookkeeping of the document writers.

use indexmap::IndexMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Schema instance namespace (`xsi:type`)
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName. An empty namespace is treated as no namespace.
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        let namespace: Option<String> = namespace.map(Into::into);
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self::new(Some(namespace), local_name)
    }

    /// Create a QName in the XSD namespace
    pub fn xsd(local_name: impl Into<String>) -> Self {
        Self::namespaced(XSD_NAMESPACE, local_name)
    }

    /// Namespace URI, or the empty string for no namespace
    pub fn namespace_uri(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }

    /// Whether this name belongs to the XSD namespace
    pub fn is_xsd(&self) -> bool {
        self.namespace.as_deref() == Some(XSD_NAMESPACE)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Stable namespace-to-prefix assignment used by document writers.
///
/// Well-known namespaces keep their conventional prefixes; every other URI
/// gets `ns1`, `ns2`, ... in first-use order. The empty URI never has a
/// prefix.
#[derive(Debug, Clone)]
pub struct PrefixMap {
    bindings: IndexMap<NamespaceUri, Prefix>,
    next: usize,
}

impl PrefixMap {
    /// Create a map with the `xml` binding only
    pub fn new() -> Self {
        let mut bindings = IndexMap::new();
        bindings.insert(XML_NAMESPACE.to_string(), "xml".to_string());
        Self { bindings, next: 1 }
    }

    /// Prefix bound to a URI, binding a fresh one on first use.
    /// Returns the prefix and whether it was newly bound.
    pub fn bind(&mut self, uri: &str) -> (Prefix, bool) {
        if let Some(prefix) = self.bindings.get(uri) {
            return (prefix.clone(), false);
        }
        let prefix = match uri {
            XSI_NAMESPACE => "xsi".to_string(),
            XSD_NAMESPACE => "xs".to_string(),
            _ => {
                let prefix = format!("ns{}", self.next);
                self.next += 1;
                prefix
            }
        };
        self.bindings.insert(uri.to_string(), prefix.clone());
        (prefix, true)
    }

    /// Prefix already bound to a URI
    pub fn get(&self, uri: &str) -> Option<&str> {
        self.bindings.get(uri).map(|p| p.as_str())
    }
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self::new()
    }
}
