//! XSD Complex Type definitions
//!
//! A complex type records what it declares itself. Derivation from a base
//! type is kept as a reference; the schema registry computes the effective
//! content and attribute uses when asked.
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Complex_Type_Definitions

use crate::namespaces::QName;
use std::sync::Arc;

use super::attributes::{AttributeItem, AttributeUse};
use super::groups::Particle;
use super::types::TypeRef;
use super::wildcards::Wildcard;

/// Derivation method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationMethod {
    /// Derivation by extension
    Extension,
    /// Derivation by restriction
    Restriction,
}

impl DerivationMethod {
    /// Parse from element tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "extension" => Some(Self::Extension),
            "restriction" => Some(Self::Restriction),
            _ => None,
        }
    }
}

/// Derivation of a complex type from a named base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// Derivation method
    pub method: DerivationMethod,
    /// Base type name
    pub base: QName,
}

/// Content type of a complex type
#[derive(Debug, Clone, Default)]
pub enum ContentType {
    /// No content
    #[default]
    Empty,
    /// Simple content of the given simple type
    Simple(TypeRef),
    /// Element-only content
    ElementOnly(Particle),
    /// Mixed content
    Mixed(Particle),
}

impl ContentType {
    /// Top-level particle of element-only or mixed content
    pub fn particle(&self) -> Option<&Particle> {
        match self {
            ContentType::ElementOnly(p) | ContentType::Mixed(p) => Some(p),
            _ => None,
        }
    }

    /// Check if the content has element children
    pub fn has_elements(&self) -> bool {
        self.particle().is_some()
    }

    /// Check if this is simple content
    pub fn is_simple(&self) -> bool {
        matches!(self, ContentType::Simple(_))
    }
}

/// XSD complex type definition
#[derive(Debug, Clone, Default)]
pub struct ComplexType {
    /// Type name, None for anonymous types
    pub name: Option<QName>,
    /// Abstract types are replaced by a concrete subtype
    pub abstract_type: bool,
    /// Declared content
    pub content: ContentType,
    /// Declared attribute uses and group references
    pub attributes: Vec<AttributeItem>,
    /// Declared `xs:anyAttribute`
    pub attribute_wildcard: Option<Arc<Wildcard>>,
    /// Base type, if derived
    pub derivation: Option<Derivation>,
}

impl ComplexType {
    /// Create an anonymous type with empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type name
    pub fn with_name(mut self, name: QName) -> Self {
        self.name = Some(name);
        self
    }

    /// Mark the type abstract
    pub fn with_abstract(mut self, abstract_type: bool) -> Self {
        self.abstract_type = abstract_type;
        self
    }

    /// Set the declared content
    pub fn with_content(mut self, content: ContentType) -> Self {
        self.content = content;
        self
    }

    /// Add an attribute use
    pub fn with_attribute(mut self, attribute: AttributeUse) -> Self {
        self.attributes.push(AttributeItem::Use(attribute));
        self
    }

    /// Add an attribute group reference
    pub fn with_attribute_group(mut self, name: QName) -> Self {
        self.attributes.push(AttributeItem::GroupRef(name));
        self
    }

    /// Set the attribute wildcard
    pub fn with_attribute_wildcard(mut self, wildcard: Wildcard) -> Self {
        self.attribute_wildcard = Some(Arc::new(wildcard));
        self
    }

    /// Derive from a named base type
    pub fn derived_from(mut self, method: DerivationMethod, base: QName) -> Self {
        self.derivation = Some(Derivation { method, base });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::elements::ElementDecl;
    use crate::schema::particles::Occurs;

    #[test]
    fn test_content_type_particle() {
        let particle = Particle::element(
            ElementDecl::local(QName::local("a"), TypeRef::builtin("string")),
            Occurs::once(),
        );
        assert!(ContentType::ElementOnly(particle.clone()).has_elements());
        assert!(ContentType::Mixed(particle).particle().is_some());
        assert!(ContentType::Simple(TypeRef::builtin("int")).is_simple());
        assert!(!ContentType::Empty.has_elements());
    }

    #[test]
    fn test_derived_type_builder() {
        let ct = ComplexType::new()
            .with_name(QName::local("Car"))
            .derived_from(DerivationMethod::Extension, QName::local("Vehicle"))
            .with_attribute_group(QName::local("common"));

        assert_eq!(
            ct.derivation,
            Some(Derivation {
                method: DerivationMethod::Extension,
                base: QName::local("Vehicle"),
            })
        );
        assert!(!ct.abstract_type);
        assert_eq!(ct.attributes.len(), 1);
    }

    #[test]
    fn test_derivation_method_from_tag() {
        assert_eq!(DerivationMethod::from_tag("restriction"), Some(DerivationMethod::Restriction));
        assert_eq!(DerivationMethod::from_tag("list"), None);
    }
}
