//! Type definitions and type references
//!
//! Named types are referenced lazily by QName so that recursive and
//! forward-referencing schemas need no cyclic ownership; anonymous types
//! are owned in place.

use std::sync::Arc;

use crate::namespaces::QName;

use super::complex_types::ComplexType;
use super::simple_types::SimpleType;

/// A type definition - either simple or complex
#[derive(Debug, Clone)]
pub enum TypeDefinition {
    /// Simple type (text only)
    Simple(Arc<SimpleType>),
    /// Complex type
    Complex(Arc<ComplexType>),
}

impl TypeDefinition {
    /// Check if this is a simple type
    pub fn is_simple(&self) -> bool {
        matches!(self, TypeDefinition::Simple(_))
    }

    /// Get as simple type if applicable
    pub fn as_simple(&self) -> Option<&Arc<SimpleType>> {
        match self {
            TypeDefinition::Simple(st) => Some(st),
            TypeDefinition::Complex(_) => None,
        }
    }

    /// Get as complex type if applicable
    pub fn as_complex(&self) -> Option<&Arc<ComplexType>> {
        match self {
            TypeDefinition::Simple(_) => None,
            TypeDefinition::Complex(ct) => Some(ct),
        }
    }

    /// Name of the type, None for anonymous types
    pub fn name(&self) -> Option<&QName> {
        match self {
            TypeDefinition::Simple(st) => st.name.as_ref(),
            TypeDefinition::Complex(ct) => ct.name.as_ref(),
        }
    }
}

impl From<SimpleType> for TypeDefinition {
    fn from(st: SimpleType) -> Self {
        TypeDefinition::Simple(Arc::new(st))
    }
}

impl From<ComplexType> for TypeDefinition {
    fn from(ct: ComplexType) -> Self {
        TypeDefinition::Complex(Arc::new(ct))
    }
}

/// Reference from a declaration to its type
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// Global type looked up in the schema registry
    Named(QName),
    /// Anonymous type declared inline
    Anonymous(TypeDefinition),
}

impl TypeRef {
    /// Reference a global type by name
    pub fn named(name: QName) -> Self {
        TypeRef::Named(name)
    }

    /// Reference an XSD built-in type by local name
    pub fn builtin(local_name: &str) -> Self {
        TypeRef::Named(QName::xsd(local_name))
    }

    /// Own an anonymous type
    pub fn anonymous(definition: impl Into<TypeDefinition>) -> Self {
        TypeRef::Anonymous(definition.into())
    }
}

impl Default for TypeRef {
    /// Untyped declarations are `xs:anyType`
    fn default() -> Self {
        TypeRef::builtin("anyType")
    }
}
