//! Schema model
//!
//! `SchemaModel` is the registry of global components plus the lookups the
//! generator needs: reference resolution, effective facets along a simple
//! type's base chain, effective content and attributes of derived complex
//! types, substitution group members and concrete subtypes.
//!
//! The model is immutable once built and is shared read-only between
//! generation runs.

use indexmap::IndexMap;
use std::sync::Arc;

use super::attributes::{
    AttributeDecl, AttributeGroup, AttributeItem, AttributeRef, UseMode, ValueConstraint,
};
use super::builtins::{any_type, BUILTIN_TYPES};
use super::complex_types::{ComplexType, ContentType, DerivationMethod};
use super::elements::{ElementDecl, ElementRef};
use super::facets::{Facet, FacetKind};
use super::groups::{ModelGroup, Particle};
use super::particles::Occurs;
use super::simple_types::{SimpleType, SimpleVariety};
use super::types::{TypeDefinition, TypeRef};
use super::wildcards::Wildcard;

use crate::error::{Error, Result};
use crate::namespaces::QName;

/// Longest base or reference chain followed before it is reported as circular
const MAX_CHAIN_LENGTH: usize = 64;

/// Attribute use with its declaration resolved and its constraint merged
#[derive(Debug, Clone)]
pub struct EffectiveAttribute {
    /// Attribute declaration
    pub decl: Arc<AttributeDecl>,
    /// Whether the attribute is required
    pub required: bool,
    /// Use-level constraint, or the declaration's when the use has none
    pub constraint: ValueConstraint,
}

/// Registry of global schema components
#[derive(Debug, Clone)]
pub struct SchemaModel {
    /// Target namespace of the root schema document
    pub target_namespace: Option<String>,
    elements: IndexMap<QName, Arc<ElementDecl>>,
    types: IndexMap<QName, TypeDefinition>,
    attributes: IndexMap<QName, Arc<AttributeDecl>>,
    groups: IndexMap<QName, Arc<ModelGroup>>,
    attribute_groups: IndexMap<QName, Arc<AttributeGroup>>,
}

impl Default for SchemaModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaModel {
    /// Create a model holding only the XSD built-in types
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        for builtin in BUILTIN_TYPES {
            let st = builtin.to_simple_type();
            types.insert(QName::xsd(builtin.name), TypeDefinition::from(st));
        }
        let any = any_type();
        types.insert(QName::xsd("anyType"), TypeDefinition::from(any));

        Self {
            target_namespace: None,
            elements: IndexMap::new(),
            types,
            attributes: IndexMap::new(),
            groups: IndexMap::new(),
            attribute_groups: IndexMap::new(),
        }
    }

    /// Create an empty model with a target namespace
    pub fn with_namespace(namespace: &str) -> Self {
        let mut schema = Self::new();
        schema.target_namespace = Some(namespace.to_string()).filter(|ns| !ns.is_empty());
        schema
    }

    /// Qualify a local name with the target namespace
    pub fn qname(&self, local_name: &str) -> QName {
        QName::new(self.target_namespace.as_deref(), local_name)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a global element declaration
    pub fn add_element(&mut self, decl: ElementDecl) -> &mut Self {
        self.elements.insert(decl.name.clone(), Arc::new(decl));
        self
    }

    /// Register a named global type
    pub fn add_type(&mut self, definition: impl Into<TypeDefinition>) -> Result<&mut Self> {
        let definition = definition.into();
        let name = definition
            .name()
            .cloned()
            .ok_or_else(|| Error::SchemaShape("global type without a name".to_string()))?;
        self.types.insert(name, definition);
        Ok(self)
    }

    /// Register a global attribute declaration
    pub fn add_attribute(&mut self, decl: AttributeDecl) -> &mut Self {
        self.attributes.insert(decl.name.clone(), Arc::new(decl));
        self
    }

    /// Register a named model group
    pub fn add_group(&mut self, name: QName, group: ModelGroup) -> &mut Self {
        self.groups.insert(name, Arc::new(group));
        self
    }

    /// Register a named attribute group
    pub fn add_attribute_group(&mut self, group: AttributeGroup) -> Result<&mut Self> {
        let name = group
            .name
            .clone()
            .ok_or_else(|| Error::SchemaShape("attribute group without a name".to_string()))?;
        self.attribute_groups.insert(name, Arc::new(group));
        Ok(self)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Look up a global element
    pub fn lookup_element(&self, name: &QName) -> Option<&Arc<ElementDecl>> {
        self.elements.get(name)
    }

    /// Look up a global type
    pub fn lookup_type(&self, name: &QName) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Look up a global attribute
    pub fn lookup_attribute(&self, name: &QName) -> Option<&Arc<AttributeDecl>> {
        self.attributes.get(name)
    }

    /// Look up a named model group
    pub fn lookup_group(&self, name: &QName) -> Option<&Arc<ModelGroup>> {
        self.groups.get(name)
    }

    /// Look up a named attribute group
    pub fn lookup_attribute_group(&self, name: &QName) -> Option<&Arc<AttributeGroup>> {
        self.attribute_groups.get(name)
    }

    /// Global element declarations in registration order
    pub fn elements(&self) -> impl Iterator<Item = (&QName, &Arc<ElementDecl>)> {
        self.elements.iter()
    }

    /// Global types in registration order, built-ins first
    pub fn types(&self) -> impl Iterator<Item = (&QName, &TypeDefinition)> {
        self.types.iter()
    }

    /// Number of global elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Names of the global elements that can start a document
    pub fn root_elements(&self) -> impl Iterator<Item = &QName> {
        self.elements
            .iter()
            .filter(|(_, decl)| !decl.abstract_element)
            .map(|(name, _)| name)
    }

    /// The global element a document starts with
    pub fn root_element(&self, name: &QName) -> Result<Arc<ElementDecl>> {
        self.elements
            .get(name)
            .cloned()
            .ok_or_else(|| Error::RootNotFound(name.clone()))
    }

    // =========================================================================
    // Reference resolution
    // =========================================================================

    /// Resolve a type reference
    pub fn resolve_type(&self, type_ref: &TypeRef) -> Result<TypeDefinition> {
        match type_ref {
            TypeRef::Anonymous(definition) => Ok(definition.clone()),
            TypeRef::Named(name) => self
                .types
                .get(name)
                .cloned()
                .ok_or_else(|| Error::SchemaShape(format!("unknown type {}", name))),
        }
    }

    /// Resolve an element term to its declaration
    pub fn resolve_element(&self, element: &ElementRef) -> Result<Arc<ElementDecl>> {
        match element {
            ElementRef::Local(decl) => Ok(decl.clone()),
            ElementRef::Global(name) => self
                .elements
                .get(name)
                .cloned()
                .ok_or_else(|| Error::SchemaShape(format!("unknown element {}", name))),
        }
    }

    /// Resolve a named model group
    pub fn resolve_group(&self, name: &QName) -> Result<Arc<ModelGroup>> {
        self.groups
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SchemaShape(format!("unknown group {}", name)))
    }

    /// Resolve the declaration behind an attribute use
    pub fn resolve_attribute(&self, attribute: &AttributeRef) -> Result<Arc<AttributeDecl>> {
        match attribute {
            AttributeRef::Local(decl) => Ok(decl.clone()),
            AttributeRef::Global(name) => self
                .attributes
                .get(name)
                .cloned()
                .ok_or_else(|| Error::SchemaShape(format!("unknown attribute {}", name))),
        }
    }

    fn resolve_attribute_group(&self, name: &QName) -> Result<&Arc<AttributeGroup>> {
        self.attribute_groups
            .get(name)
            .ok_or_else(|| Error::SchemaShape(format!("unknown attribute group {}", name)))
    }

    // =========================================================================
    // Simple types
    // =========================================================================

    /// Resolve a reference that must denote a simple type.
    ///
    /// A complex type with simple content stands for its content type, so
    /// `simpleContent` restrictions can name a complex base.
    pub fn resolve_simple_type(&self, type_ref: &TypeRef) -> Result<Arc<SimpleType>> {
        let mut current = type_ref.clone();
        for _ in 0..MAX_CHAIN_LENGTH {
            match self.resolve_type(&current)? {
                TypeDefinition::Simple(st) => return Ok(st),
                TypeDefinition::Complex(ct) => match self.content_type(&ct)? {
                    ContentType::Simple(content) => current = content,
                    _ => {
                        return Err(Error::SchemaShape(format!(
                            "type {} has no simple content",
                            type_name(ct.name.as_ref())
                        )))
                    }
                },
            }
        }
        Err(circular(type_ref))
    }

    /// The simple type followed by its ancestors, nearest first
    pub fn base_chain(&self, simple_type: &Arc<SimpleType>) -> Result<Vec<Arc<SimpleType>>> {
        let mut chain = vec![simple_type.clone()];
        let mut current = simple_type.clone();
        while let Some(base) = &current.base {
            if chain.len() > MAX_CHAIN_LENGTH {
                return Err(circular(base));
            }
            let next = self.resolve_simple_type(base)?;
            chain.push(next.clone());
            current = next;
        }
        Ok(chain)
    }

    /// Effective facet of a kind: the declaration nearest along the base chain
    pub fn facet(&self, simple_type: &Arc<SimpleType>, kind: FacetKind) -> Result<Option<Facet>> {
        Ok(self
            .base_chain(simple_type)?
            .iter()
            .find_map(|st| st.facets.get(kind).cloned()))
    }

    /// Effective digit or length facet value
    pub fn count_facet(&self, simple_type: &Arc<SimpleType>, kind: FacetKind) -> Result<Option<u32>> {
        Ok(match self.facet(simple_type, kind)? {
            Some(Facet::Count(_, count)) => Some(count),
            _ => None,
        })
    }

    /// Effective bound facet lexical value
    pub fn bound_facet(
        &self,
        simple_type: &Arc<SimpleType>,
        kind: FacetKind,
    ) -> Result<Option<String>> {
        Ok(match self.facet(simple_type, kind)? {
            Some(Facet::Bound(_, value)) => Some(value),
            _ => None,
        })
    }

    /// Effective enumeration values, if any
    pub fn enumeration(&self, simple_type: &Arc<SimpleType>) -> Result<Option<Vec<String>>> {
        Ok(match self.facet(simple_type, FacetKind::Enumeration)? {
            Some(Facet::Enumeration(values)) if !values.is_empty() => Some(values),
            _ => None,
        })
    }

    /// Effective variety: restrictions inherit the variety of their base
    pub fn variety(&self, simple_type: &Arc<SimpleType>) -> Result<SimpleVariety> {
        Ok(self
            .base_chain(simple_type)?
            .iter()
            .map(|st| &st.variety)
            .find(|variety| !matches!(variety, SimpleVariety::Atomic))
            .cloned()
            .unwrap_or(SimpleVariety::Atomic))
    }

    /// Nearest ancestor (or self) defined in the XSD namespace
    pub fn builtin_ancestor(&self, simple_type: &Arc<SimpleType>) -> Result<Arc<SimpleType>> {
        self.base_chain(simple_type)?
            .into_iter()
            .find(|st| st.is_builtin())
            .ok_or_else(|| {
                Error::SchemaShape(format!(
                    "simple type {} has no built-in ancestor",
                    type_name(simple_type.name.as_ref())
                ))
            })
    }

    // =========================================================================
    // Complex types
    // =========================================================================

    /// Effective content of a complex type, following extension chains
    pub fn content_type(&self, complex_type: &ComplexType) -> Result<ContentType> {
        self.content_type_at(complex_type, 0)
    }

    fn content_type_at(&self, complex_type: &ComplexType, depth: usize) -> Result<ContentType> {
        let derivation = match &complex_type.derivation {
            Some(d) if d.method == DerivationMethod::Extension => d,
            _ => return Ok(complex_type.content.clone()),
        };
        if depth > MAX_CHAIN_LENGTH {
            return Err(circular(&TypeRef::Named(derivation.base.clone())));
        }

        let base_content = match self.resolve_type(&TypeRef::Named(derivation.base.clone()))? {
            TypeDefinition::Simple(_) => ContentType::Simple(TypeRef::Named(derivation.base.clone())),
            TypeDefinition::Complex(base) => self.content_type_at(&base, depth + 1)?,
        };

        let own = &complex_type.content;
        let mixed = matches!(own, ContentType::Mixed(_)) || matches!(base_content, ContentType::Mixed(_));
        let particle = match (base_content.particle(), own.particle()) {
            (Some(base), Some(own)) => Some(Particle::group(
                ModelGroup::sequence(vec![base.clone(), own.clone()]),
                Occurs::once(),
            )),
            (Some(p), None) | (None, Some(p)) => Some(p.clone()),
            (None, None) => None,
        };

        Ok(match particle {
            Some(p) if mixed => ContentType::Mixed(p),
            Some(p) => ContentType::ElementOnly(p),
            None => match (own, base_content) {
                (ContentType::Simple(content), _) => ContentType::Simple(content.clone()),
                (_, base_content) => base_content,
            },
        })
    }

    /// Simple type of the text content: the type itself for simple types,
    /// the content type for complex types with simple content
    pub fn text_type(&self, definition: &TypeDefinition) -> Result<Option<Arc<SimpleType>>> {
        match definition {
            TypeDefinition::Simple(st) => Ok(Some(st.clone())),
            TypeDefinition::Complex(ct) => match self.content_type(ct)? {
                ContentType::Simple(content) => Ok(Some(self.resolve_simple_type(&content)?)),
                _ => Ok(None),
            },
        }
    }

    /// Effective attribute uses of a complex type in document order.
    ///
    /// Inherited uses come first; a redeclared attribute replaces the
    /// inherited one in place and a prohibited use removes it.
    pub fn attribute_uses(&self, complex_type: &ComplexType) -> Result<Vec<EffectiveAttribute>> {
        self.attribute_uses_at(complex_type, 0)
    }

    fn attribute_uses_at(
        &self,
        complex_type: &ComplexType,
        depth: usize,
    ) -> Result<Vec<EffectiveAttribute>> {
        let mut uses: Vec<EffectiveAttribute> = Vec::new();
        if let Some(derivation) = &complex_type.derivation {
            if depth > MAX_CHAIN_LENGTH {
                return Err(circular(&TypeRef::Named(derivation.base.clone())));
            }
            if let Some(TypeDefinition::Complex(base)) = self.types.get(&derivation.base) {
                uses = self.attribute_uses_at(base, depth + 1)?;
            }
        }

        let mut own = Vec::new();
        self.flatten_attribute_items(&complex_type.attributes, &mut own, 0)?;
        for (mode, attribute) in own {
            let position = uses.iter().position(|u| u.decl.name == attribute.decl.name);
            match (mode, position) {
                (UseMode::Prohibited, Some(i)) => {
                    uses.remove(i);
                }
                (UseMode::Prohibited, None) => {}
                (_, Some(i)) => uses[i] = attribute,
                (_, None) => uses.push(attribute),
            }
        }
        Ok(uses)
    }

    fn flatten_attribute_items(
        &self,
        items: &[AttributeItem],
        out: &mut Vec<(UseMode, EffectiveAttribute)>,
        depth: usize,
    ) -> Result<()> {
        for item in items {
            match item {
                AttributeItem::Use(attribute) => {
                    let decl = self.resolve_attribute(&attribute.decl)?;
                    let constraint = if attribute.constraint.is_none() {
                        decl.constraint.clone()
                    } else {
                        attribute.constraint.clone()
                    };
                    out.push((
                        attribute.mode,
                        EffectiveAttribute {
                            decl,
                            required: attribute.is_required(),
                            constraint,
                        },
                    ));
                }
                AttributeItem::GroupRef(name) => {
                    if depth > MAX_CHAIN_LENGTH {
                        return Err(circular(&TypeRef::Named(name.clone())));
                    }
                    let group = self.resolve_attribute_group(name)?;
                    self.flatten_attribute_items(&group.items, out, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    /// Effective attribute wildcard: declared on the type, on one of its
    /// attribute groups, or inherited by extension
    pub fn attribute_wildcard(&self, complex_type: &ComplexType) -> Result<Option<Arc<Wildcard>>> {
        self.attribute_wildcard_at(complex_type, 0)
    }

    fn attribute_wildcard_at(
        &self,
        complex_type: &ComplexType,
        depth: usize,
    ) -> Result<Option<Arc<Wildcard>>> {
        if let Some(wildcard) = &complex_type.attribute_wildcard {
            return Ok(Some(wildcard.clone()));
        }
        if let Some(wildcard) = self.group_wildcard(&complex_type.attributes, 0)? {
            return Ok(Some(wildcard));
        }
        match &complex_type.derivation {
            Some(d) if d.method == DerivationMethod::Extension => {
                if depth > MAX_CHAIN_LENGTH {
                    return Err(circular(&TypeRef::Named(d.base.clone())));
                }
                match self.types.get(&d.base) {
                    Some(TypeDefinition::Complex(base)) => self.attribute_wildcard_at(base, depth + 1),
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    fn group_wildcard(&self, items: &[AttributeItem], depth: usize) -> Result<Option<Arc<Wildcard>>> {
        for item in items {
            if let AttributeItem::GroupRef(name) = item {
                if depth > MAX_CHAIN_LENGTH {
                    return Err(circular(&TypeRef::Named(name.clone())));
                }
                let group = self.resolve_attribute_group(name)?;
                if let Some(wildcard) = &group.wildcard {
                    return Ok(Some(wildcard.clone()));
                }
                if let Some(wildcard) = self.group_wildcard(&group.items, depth + 1)? {
                    return Ok(Some(wildcard));
                }
            }
        }
        Ok(None)
    }

    // =========================================================================
    // Substitution
    // =========================================================================

    /// Non-abstract elements that may stand in for `head`, directly or
    /// transitively, in registration order
    pub fn substitution_members(&self, head: &QName) -> Vec<Arc<ElementDecl>> {
        self.elements
            .values()
            .filter(|decl| !decl.abstract_element && &decl.name != head)
            .filter(|decl| self.substitutes_for(decl, head))
            .cloned()
            .collect()
    }

    fn substitutes_for(&self, decl: &ElementDecl, head: &QName) -> bool {
        let mut current = decl.substitution_group.as_ref();
        for _ in 0..MAX_CHAIN_LENGTH {
            match current {
                Some(name) if name == head => return true,
                Some(name) => {
                    current = self
                        .elements
                        .get(name)
                        .and_then(|d| d.substitution_group.as_ref())
                }
                None => return false,
            }
        }
        false
    }

    /// Named non-abstract complex types derived, directly or transitively,
    /// from `base`, in registration order
    pub fn concrete_subtypes(&self, base: &QName) -> Vec<Arc<ComplexType>> {
        self.types
            .values()
            .filter_map(TypeDefinition::as_complex)
            .filter(|ct| !ct.abstract_type && ct.name.as_ref() != Some(base))
            .filter(|ct| self.derives_from(ct, base))
            .cloned()
            .collect()
    }

    fn derives_from(&self, complex_type: &ComplexType, base: &QName) -> bool {
        let mut current = complex_type.derivation.as_ref().map(|d| &d.base);
        for _ in 0..MAX_CHAIN_LENGTH {
            match current {
                Some(name) if name == base => return true,
                Some(name) => {
                    current = match self.types.get(name) {
                        Some(TypeDefinition::Complex(ct)) => ct.derivation.as_ref().map(|d| &d.base),
                        _ => None,
                    }
                }
                None => return false,
            }
        }
        false
    }
}

fn type_name(name: Option<&QName>) -> String {
    name.map_or_else(|| "(anonymous)".to_string(), QName::to_string)
}

fn circular(type_ref: &TypeRef) -> Error {
    let name = match type_ref {
        TypeRef::Named(name) => name.to_string(),
        TypeRef::Anonymous(definition) => type_name(definition.name()),
    };
    Error::SchemaShape(format!("circular definition involving {}", name))
}
