//! XSD Wildcards
//!
//! This module implements wildcards for element and attribute content:
//! - xs:any - allows any element from specified namespaces
//! - xs:anyAttribute - allows any attribute from specified namespaces
//!
//! Namespace lists keep their declaration order; the empty string stands
//! for "no namespace" (`##local`).
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Wildcards

use crate::error::ParseError;

/// Namespace constraint for wildcards
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceConstraint {
    /// Any namespace is allowed (##any)
    #[default]
    Any,
    /// One of the listed namespaces
    List(Vec<String>),
    /// Any namespace except the listed ones (##other)
    NotInList(Vec<String>),
}

impl NamespaceConstraint {
    /// Create from namespace attribute value
    pub fn from_namespace_attr(
        value: &str,
        target_namespace: Option<&str>,
    ) -> Result<Self, ParseError> {
        let tns = target_namespace.unwrap_or("").to_string();
        match value.trim() {
            "##any" => Ok(Self::Any),
            "##other" => {
                let mut excluded = vec![tns];
                if !excluded.contains(&String::new()) {
                    excluded.push(String::new());
                }
                Ok(Self::NotInList(excluded))
            }
            value => {
                let mut namespaces: Vec<String> = Vec::new();
                for ns in value.split_whitespace() {
                    let ns = match ns {
                        "##local" => String::new(),
                        "##targetNamespace" => tns.clone(),
                        s if s.starts_with("##") => {
                            return Err(ParseError::new(format!(
                                "wrong value '{}' in 'namespace' attribute",
                                s
                            )));
                        }
                        s => s.to_string(),
                    };
                    if !namespaces.contains(&ns) {
                        namespaces.push(ns);
                    }
                }
                Ok(Self::List(namespaces))
            }
        }
    }
}

/// An `xs:any` or `xs:anyAttribute` wildcard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wildcard {
    /// Allowed namespaces
    pub constraint: NamespaceConstraint,
}

impl Wildcard {
    /// Create a wildcard with the given constraint
    pub fn new(constraint: NamespaceConstraint) -> Self {
        Self { constraint }
    }
}
