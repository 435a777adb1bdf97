//! XSD Element declarations
//!
//! Elements are the primary building blocks of generated documents.
//! Global declarations live in the schema registry and are referenced by
//! name; local declarations are owned by the particle that contains them.
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Element_Declarations

use std::sync::Arc;

use crate::namespaces::QName;

use super::types::TypeRef;

/// The scope of an element declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementScope {
    /// Global element declaration
    #[default]
    Global,
    /// Local element declaration (within a complex type or group)
    Local,
}

/// Element form (qualified or unqualified)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementForm {
    /// Element name must be namespace-qualified
    Qualified,
    /// Element name is unqualified
    #[default]
    Unqualified,
}

impl ElementForm {
    /// Parse from string attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "qualified" => Some(Self::Qualified),
            "unqualified" => Some(Self::Unqualified),
            _ => None,
        }
    }
}

/// XSD element declaration
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Element name (namespace already resolved against the form)
    pub name: QName,
    /// Element type
    pub type_ref: TypeRef,
    /// Scope of the declaration
    pub scope: ElementScope,
    /// Abstract elements are replaced by a substitution group member
    pub abstract_element: bool,
    /// Head of the substitution group this element belongs to
    pub substitution_group: Option<QName>,
}

impl ElementDecl {
    /// Create a global element of type `xs:anyType`
    pub fn new(name: QName) -> Self {
        Self {
            name,
            type_ref: TypeRef::default(),
            scope: ElementScope::Global,
            abstract_element: false,
            substitution_group: None,
        }
    }

    /// Create a local element
    pub fn local(name: QName, type_ref: TypeRef) -> Self {
        Self {
            scope: ElementScope::Local,
            ..Self::new(name).with_type(type_ref)
        }
    }

    /// Set the element type
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = type_ref;
        self
    }

    /// Mark the element abstract
    pub fn with_abstract(mut self, abstract_element: bool) -> Self {
        self.abstract_element = abstract_element;
        self
    }

    /// Join the substitution group headed by `head`
    pub fn with_substitution_group(mut self, head: QName) -> Self {
        self.substitution_group = Some(head);
        self
    }

    /// Check if this is a global declaration
    pub fn is_global(&self) -> bool {
        self.scope == ElementScope::Global
    }
}

/// Element term of a particle
#[derive(Debug, Clone)]
pub enum ElementRef {
    /// `<xs:element ref="..."/>` to a global declaration
    Global(QName),
    /// Inline local declaration
    Local(Arc<ElementDecl>),
}

impl ElementRef {
    /// Name of the referenced element
    pub fn name(&self) -> &QName {
        match self {
            ElementRef::Global(name) => name,
            ElementRef::Local(decl) => &decl.name,
        }
    }
}

impl From<ElementDecl> for ElementRef {
    fn from(decl: ElementDecl) -> Self {
        ElementRef::Local(Arc::new(decl))
    }
}
