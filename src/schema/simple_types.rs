//! XSD Simple Type definitions
//!
//! Simple types are atomic, list or union. Derivation by restriction is
//! recorded as a base reference plus the facets declared at that step;
//! the schema registry resolves the effective variety and facets by
//! walking the base chain.
//!
//! See: https://www.w3.org/TR/xmlschema-2/

use crate::namespaces::QName;

use super::facets::{Facet, FacetSet};
use super::types::TypeRef;

/// Variety of a simple type
#[derive(Debug, Clone)]
pub enum SimpleVariety {
    /// Atomic type, or a restriction inheriting its base's variety
    Atomic,
    /// List type (whitespace-separated values of the item type)
    List(TypeRef),
    /// Union type (value of one of the member types)
    Union(Vec<TypeRef>),
}

/// XSD simple type definition
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Type name, None for anonymous types
    pub name: Option<QName>,
    /// Base type for restrictions, None for `anySimpleType`
    pub base: Option<TypeRef>,
    /// Declared variety
    pub variety: SimpleVariety,
    /// Facets declared at this derivation step
    pub facets: FacetSet,
}

impl SimpleType {
    /// Restriction of a base type
    pub fn restriction(base: TypeRef) -> Self {
        Self {
            name: None,
            base: Some(base),
            variety: SimpleVariety::Atomic,
            facets: FacetSet::new(),
        }
    }

    /// List of an item type
    pub fn list(item_type: TypeRef) -> Self {
        Self {
            name: None,
            base: Some(TypeRef::builtin("anySimpleType")),
            variety: SimpleVariety::List(item_type),
            facets: FacetSet::new(),
        }
    }

    /// Union of member types
    pub fn union(member_types: Vec<TypeRef>) -> Self {
        Self {
            name: None,
            base: Some(TypeRef::builtin("anySimpleType")),
            variety: SimpleVariety::Union(member_types),
            facets: FacetSet::new(),
        }
    }

    /// Set the type name
    pub fn with_name(mut self, name: QName) -> Self {
        self.name = Some(name);
        self
    }

    /// Add a facet
    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    /// Check if this is an XSD built-in type
    pub fn is_builtin(&self) -> bool {
        self.name.as_ref().is_some_and(QName::is_xsd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::facets::FacetKind;

    #[test]
    fn test_restriction_builder() {
        let st = SimpleType::restriction(TypeRef::builtin("string"))
            .with_name(QName::namespaced("urn:t", "code"))
            .with_facet(Facet::Count(FacetKind::MaxLength, 4));

        assert!(!st.is_builtin());
        assert!(matches!(st.variety, SimpleVariety::Atomic));
        assert!(st.facets.get(FacetKind::MaxLength).is_some());
    }

    #[test]
    fn test_list_and_union_derive_from_any_simple_type() {
        let list = SimpleType::list(TypeRef::builtin("int"));
        assert!(matches!(list.variety, SimpleVariety::List(_)));
        assert!(matches!(
            list.base,
            Some(TypeRef::Named(ref name)) if name.local_name == "anySimpleType"
        ));

        let union = SimpleType::union(vec![TypeRef::builtin("int"), TypeRef::builtin("date")]);
        assert!(matches!(union.variety, SimpleVariety::Union(ref m) if m.len() == 2));
    }
}
