//! XSD Document Parsing
//!
//! This module turns XSD 1.0 documents into a [`SchemaModel`]. Documents
//! are read with `roxmltree`; `xs:include` and `xs:import` with a relative
//! `schemaLocation` are followed through a worklist, each file at most once.
//! References between components stay symbolic and are resolved by the
//! model on demand, so declaration order does not matter.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use super::attributes::{
    AttributeDecl, AttributeGroup, AttributeItem, AttributeUse, UseMode, ValueConstraint,
};
use super::complex_types::{ComplexType, ContentType, DerivationMethod};
use super::elements::{ElementDecl, ElementForm};
use super::facets::{Facet, FacetKind};
use super::groups::{Compositor, ModelGroup, Particle, Term};
use super::particles::{parse_occurs, Occurs};
use super::schemas::SchemaModel;
use super::simple_types::SimpleType;
use super::types::TypeRef;
use super::wildcards::{NamespaceConstraint, Wildcard};

use crate::error::{Error, ParseError, Result};
use crate::namespaces::{QName, XSD_NAMESPACE};
use crate::names::split_qname;

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const REDEFINE: &str = "redefine";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const ANY: &str = "any";
    pub const ANY_ATTRIBUTE: &str = "anyAttribute";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const ELEMENT_FORM_DEFAULT: &str = "elementFormDefault";
    pub const ATTRIBUTE_FORM_DEFAULT: &str = "attributeFormDefault";
    pub const FORM: &str = "form";
    pub const DEFAULT: &str = "default";
    pub const FIXED: &str = "fixed";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const MIXED: &str = "mixed";
    pub const ABSTRACT: &str = "abstract";
    pub const SUBSTITUTION_GROUP: &str = "substitutionGroup";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
}

/// Longest substitution group chain followed for type inheritance
const MAX_SUBSTITUTION_CHAIN: usize = 64;

/// Pending schema document for the include/import worklist
struct PendingSchema {
    /// Path to the schema file
    path: PathBuf,
    /// Namespace of the including document (for chameleon includes)
    parent_namespace: Option<String>,
}

/// Settings of the schema document being read
struct DocumentContext<'a> {
    target_namespace: Option<String>,
    /// No targetNamespace of its own, included into one that has
    chameleon: bool,
    element_form: ElementForm,
    attribute_form: ElementForm,
    source: Option<&'a Path>,
}

impl DocumentContext<'_> {
    fn qname(&self, local_name: &str) -> QName {
        QName::new(self.target_namespace.as_deref(), local_name)
    }

    /// Location of a node for error messages
    fn location(&self, node: Node) -> String {
        let pos = node.document().text_pos_at(node.range().start);
        match self.source {
            Some(path) => format!("{}:{}:{}", path.display(), pos.row, pos.col),
            None => format!("{}:{}", pos.row, pos.col),
        }
    }

    fn error(&self, node: Node, message: impl Into<String>) -> Error {
        ParseError::new(message).with_location(self.location(node)).into()
    }

    /// Resolve a `prefix:local` attribute value against the node's scope
    fn resolve_qname(&self, node: Node, value: &str) -> Result<QName> {
        let (prefix, local) = split_qname(value.trim());
        match (prefix, node.lookup_namespace_uri(prefix)) {
            (Some(prefix), None) => {
                Err(self.error(node, format!("unknown namespace prefix '{}'", prefix)))
            }
            (None, None) if self.chameleon => Ok(self.qname(local)),
            (_, namespace) => Ok(QName::new(namespace, local)),
        }
    }

    fn required_attr<'n>(&self, node: Node<'n, '_>, name: &str) -> Result<&'n str> {
        node.attribute(name).ok_or_else(|| {
            self.error(
                node,
                format!("xs:{} missing '{}' attribute", node.tag_name().name(), name),
            )
        })
    }

    /// Attach the node location to a parse error raised without one
    fn locate(&self, node: Node, err: Error) -> Error {
        match err {
            Error::Parse(e) if e.location.is_none() => {
                Error::Parse(e.with_location(self.location(node)))
            }
            other => other,
        }
    }

    fn parse_occurs(&self, node: Node) -> Result<Occurs> {
        parse_occurs(
            node.attribute(xsd_attrs::MIN_OCCURS),
            node.attribute(xsd_attrs::MAX_OCCURS),
        )
        .map_err(|e| self.locate(node, e))
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Type given by a `type` attribute or an inline definition
    fn parse_element_type(&self, node: Node) -> Result<Option<TypeRef>> {
        if let Some(type_name) = node.attribute(xsd_attrs::TYPE) {
            return Ok(Some(TypeRef::named(self.resolve_qname(node, type_name)?)));
        }
        for child in xsd_children(node) {
            match child.tag_name().name() {
                xsd_elements::COMPLEX_TYPE => {
                    return Ok(Some(TypeRef::anonymous(self.parse_complex_type(child)?)))
                }
                xsd_elements::SIMPLE_TYPE => {
                    return Ok(Some(TypeRef::anonymous(self.parse_simple_type(child)?)))
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Parse a local element declaration or element reference
    fn parse_element_particle(&self, node: Node) -> Result<Particle> {
        let occurs = self.parse_occurs(node)?;
        if let Some(reference) = node.attribute(xsd_attrs::REF) {
            return Ok(Particle::element_ref(self.resolve_qname(node, reference)?, occurs));
        }

        let local = self.required_attr(node, xsd_attrs::NAME)?;
        let form = node
            .attribute(xsd_attrs::FORM)
            .and_then(ElementForm::from_str)
            .unwrap_or(self.element_form);
        let name = match form {
            ElementForm::Qualified => self.qname(local),
            ElementForm::Unqualified => QName::local(local),
        };
        let type_ref = self.parse_element_type(node)?.unwrap_or_default();
        Ok(Particle::element(ElementDecl::local(name, type_ref), occurs))
    }

    // =========================================================================
    // Complex types
    // =========================================================================

    /// Parse an xs:complexType; the caller names global types
    fn parse_complex_type(&self, node: Node) -> Result<ComplexType> {
        let ct = ComplexType::new().with_abstract(parse_bool(node.attribute(xsd_attrs::ABSTRACT)));
        let mixed = parse_bool(node.attribute(xsd_attrs::MIXED));

        for child in xsd_children(node) {
            match child.tag_name().name() {
                xsd_elements::SIMPLE_CONTENT => return self.parse_simple_content(child, ct),
                xsd_elements::COMPLEX_CONTENT => {
                    let mixed = child
                        .attribute(xsd_attrs::MIXED)
                        .map_or(mixed, |value| parse_bool(Some(value)));
                    let (derivation, method, base) = self.derivation_child(child)?;
                    let ct = self.parse_content_body(derivation, ct, mixed)?;
                    return Ok(ct.derived_from(method, base));
                }
                _ => {}
            }
        }
        self.parse_content_body(node, ct, mixed)
    }

    /// Model group and attributes declared directly under `node`
    fn parse_content_body(&self, node: Node, mut ct: ComplexType, mixed: bool) -> Result<ComplexType> {
        let mut particle = None;
        for child in xsd_children(node) {
            if is_group_tag(child.tag_name().name()) {
                particle = Some(self.parse_group_particle(child)?);
            }
        }
        ct.content = match particle {
            Some(p) if mixed => ContentType::Mixed(p),
            Some(p) => ContentType::ElementOnly(p),
            None => ContentType::Empty,
        };

        let (items, wildcard) = self.parse_attributes(node)?;
        ct.attributes = items;
        ct.attribute_wildcard = wildcard.map(Arc::new);
        Ok(ct)
    }

    fn parse_simple_content(&self, node: Node, ct: ComplexType) -> Result<ComplexType> {
        let (derivation, method, base) = self.derivation_child(node)?;
        let (items, wildcard) = self.parse_attributes(derivation)?;
        let mut ct = ct.derived_from(method, base.clone());
        ct.attributes = items;
        ct.attribute_wildcard = wildcard.map(Arc::new);

        if method == DerivationMethod::Restriction {
            let base_ref = match find_child(derivation, xsd_elements::SIMPLE_TYPE) {
                Some(inline) => TypeRef::anonymous(self.parse_simple_type(inline)?),
                None => TypeRef::named(base),
            };
            let content = self.parse_facets(derivation, SimpleType::restriction(base_ref))?;
            ct.content = ContentType::Simple(TypeRef::anonymous(content));
        }
        Ok(ct)
    }

    /// The xs:extension or xs:restriction child with its resolved base
    fn derivation_child<'a, 'input>(
        &self,
        node: Node<'a, 'input>,
    ) -> Result<(Node<'a, 'input>, DerivationMethod, QName)> {
        for child in xsd_children(node) {
            if let Some(method) = DerivationMethod::from_tag(child.tag_name().name()) {
                let base = self.resolve_qname(child, self.required_attr(child, xsd_attrs::BASE)?)?;
                return Ok((child, method, base));
            }
        }
        Err(self.error(
            node,
            format!("xs:{} without extension or restriction", node.tag_name().name()),
        ))
    }

    // =========================================================================
    // Model groups
    // =========================================================================

    fn parse_group_particle(&self, node: Node) -> Result<Particle> {
        let occurs = self.parse_occurs(node)?;
        if node.tag_name().name() == xsd_elements::GROUP {
            let name = self.resolve_qname(node, self.required_attr(node, xsd_attrs::REF)?)?;
            return Ok(Particle::new(Term::GroupRef(name), occurs));
        }
        Ok(Particle::group(self.parse_model_group(node)?, occurs))
    }

    fn parse_model_group(&self, node: Node) -> Result<ModelGroup> {
        let compositor = Compositor::from_tag(node.tag_name().name())
            .ok_or_else(|| self.error(node, "expected xs:sequence, xs:choice or xs:all"))?;

        let mut group = ModelGroup::new(compositor);
        for child in xsd_children(node) {
            let particle = match child.tag_name().name() {
                xsd_elements::ELEMENT => self.parse_element_particle(child)?,
                xsd_elements::ANY => {
                    let occurs = self.parse_occurs(child)?;
                    Particle::any(self.parse_wildcard(child)?, occurs)
                }
                tag if is_group_tag(tag) => self.parse_group_particle(child)?,
                _ => continue,
            };
            group.particles.push(particle);
        }
        Ok(group)
    }

    /// Body of a named xs:group definition
    fn parse_named_group(&self, node: Node) -> Result<ModelGroup> {
        match xsd_children(node).find(|c| Compositor::from_tag(c.tag_name().name()).is_some()) {
            Some(model) => self.parse_model_group(model),
            None => Ok(ModelGroup::new(Compositor::Sequence)),
        }
    }

    fn parse_wildcard(&self, node: Node) -> Result<Wildcard> {
        let value = node.attribute(xsd_attrs::NAMESPACE).unwrap_or("##any");
        let constraint =
            NamespaceConstraint::from_namespace_attr(value, self.target_namespace.as_deref())
                .map_err(|e| self.locate(node, e.into()))?;
        Ok(Wildcard::new(constraint))
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attribute uses, attribute group references and xs:anyAttribute
    fn parse_attributes(&self, node: Node) -> Result<(Vec<AttributeItem>, Option<Wildcard>)> {
        let mut items = Vec::new();
        let mut wildcard = None;
        for child in xsd_children(node) {
            match child.tag_name().name() {
                xsd_elements::ATTRIBUTE => {
                    items.push(AttributeItem::Use(self.parse_attribute_use(child)?))
                }
                xsd_elements::ATTRIBUTE_GROUP => {
                    let name = self.resolve_qname(child, self.required_attr(child, xsd_attrs::REF)?)?;
                    items.push(AttributeItem::GroupRef(name));
                }
                xsd_elements::ANY_ATTRIBUTE => wildcard = Some(self.parse_wildcard(child)?),
                _ => {}
            }
        }
        Ok((items, wildcard))
    }

    fn parse_attribute_use(&self, node: Node) -> Result<AttributeUse> {
        let mode = match node.attribute(xsd_attrs::USE) {
            Some(value) => UseMode::from_str(value.trim()).map_err(|e| self.locate(node, e))?,
            None => UseMode::Optional,
        };
        let constraint = self.parse_value_constraint(node)?;

        let attribute = match node.attribute(xsd_attrs::REF) {
            Some(reference) => AttributeUse::reference(self.resolve_qname(node, reference)?),
            None => {
                let local = self.required_attr(node, xsd_attrs::NAME)?;
                let form = node
                    .attribute(xsd_attrs::FORM)
                    .and_then(ElementForm::from_str)
                    .unwrap_or(self.attribute_form);
                let name = match form {
                    ElementForm::Qualified => self.qname(local),
                    ElementForm::Unqualified => QName::local(local),
                };
                AttributeUse::new(AttributeDecl::new(name).with_type(self.parse_attribute_type(node)?))
            }
        };
        Ok(attribute.with_mode(mode).with_constraint(constraint))
    }

    fn parse_global_attribute(&self, node: Node) -> Result<AttributeDecl> {
        let name = self.qname(self.required_attr(node, xsd_attrs::NAME)?);
        Ok(AttributeDecl::new(name)
            .with_type(self.parse_attribute_type(node)?)
            .with_constraint(self.parse_value_constraint(node)?))
    }

    fn parse_attribute_type(&self, node: Node) -> Result<TypeRef> {
        if let Some(type_name) = node.attribute(xsd_attrs::TYPE) {
            return Ok(TypeRef::named(self.resolve_qname(node, type_name)?));
        }
        match find_child(node, xsd_elements::SIMPLE_TYPE) {
            Some(inline) => Ok(TypeRef::anonymous(self.parse_simple_type(inline)?)),
            None => Ok(TypeRef::builtin("anySimpleType")),
        }
    }

    fn parse_value_constraint(&self, node: Node) -> Result<ValueConstraint> {
        ValueConstraint::from_attrs(node.attribute(xsd_attrs::FIXED), node.attribute(xsd_attrs::DEFAULT))
            .map_err(|e| self.locate(node, e))
    }

    // =========================================================================
    // Simple types
    // =========================================================================

    /// Parse an xs:simpleType; the caller names global types
    fn parse_simple_type(&self, node: Node) -> Result<SimpleType> {
        for child in xsd_children(node) {
            match child.tag_name().name() {
                xsd_elements::RESTRICTION => {
                    let base = self.type_attr_or_inline(child, xsd_attrs::BASE)?;
                    return self.parse_facets(child, SimpleType::restriction(base));
                }
                xsd_elements::LIST => {
                    let item = self.type_attr_or_inline(child, xsd_attrs::ITEM_TYPE)?;
                    return Ok(SimpleType::list(item));
                }
                xsd_elements::UNION => {
                    let mut members = Vec::new();
                    if let Some(names) = child.attribute(xsd_attrs::MEMBER_TYPES) {
                        for name in names.split_whitespace() {
                            members.push(TypeRef::named(self.resolve_qname(child, name)?));
                        }
                    }
                    for inline in xsd_children(child) {
                        if inline.tag_name().name() == xsd_elements::SIMPLE_TYPE {
                            members.push(TypeRef::anonymous(self.parse_simple_type(inline)?));
                        }
                    }
                    if members.is_empty() {
                        return Err(self.error(child, "xs:union without member types"));
                    }
                    return Ok(SimpleType::union(members));
                }
                _ => {}
            }
        }
        Err(self.error(node, "xs:simpleType without restriction, list or union"))
    }

    /// Named type in `attr`, or else an inline xs:simpleType child
    fn type_attr_or_inline(&self, node: Node, attr: &str) -> Result<TypeRef> {
        if let Some(name) = node.attribute(attr) {
            return Ok(TypeRef::named(self.resolve_qname(node, name)?));
        }
        match find_child(node, xsd_elements::SIMPLE_TYPE) {
            Some(inline) => Ok(TypeRef::anonymous(self.parse_simple_type(inline)?)),
            None => Err(self.error(
                node,
                format!("xs:{} needs '{}' or an inline simple type", node.tag_name().name(), attr),
            )),
        }
    }

    fn parse_facets(&self, node: Node, mut simple_type: SimpleType) -> Result<SimpleType> {
        for child in xsd_children(node) {
            if let Some(kind) = FacetKind::from_tag(child.tag_name().name()) {
                let value = self.required_attr(child, xsd_attrs::VALUE)?;
                let facet = Facet::parse(kind, value).map_err(|e| self.locate(child, e))?;
                simple_type.facets.push(facet);
            }
        }
        Ok(simple_type)
    }
}

/// Loader state shared by all documents of one schema
#[derive(Default)]
struct Loader {
    schema: SchemaModel,
    /// Global elements declared without a type that take their head's type
    untyped_members: Vec<QName>,
}

impl SchemaModel {
    /// Parse a schema from XSD text. Relative include locations resolve
    /// against the current directory.
    pub fn from_str(xsd: &str) -> Result<Self> {
        let mut loader = Loader::default();
        let mut pending = VecDeque::new();
        let tns = loader.load_document(xsd, None, None, &mut pending)?;
        loader.schema.target_namespace = tns;
        loader.follow(pending, HashSet::new())?;
        Ok(loader.finish())
    }

    /// Parse a schema file together with the documents it includes and
    /// imports
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_schema(path)?;
        let mut visited = HashSet::new();
        visited.insert(canonical(path));

        let mut loader = Loader::default();
        let mut pending = VecDeque::new();
        let tns = loader.load_document(&text, Some(path), None, &mut pending)?;
        loader.schema.target_namespace = tns;
        loader.follow(pending, visited)?;
        Ok(loader.finish())
    }
}

fn read_schema(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "loading schema document");
    std::fs::read_to_string(path)
        .map_err(|e| Error::Resource(format!("cannot read {}: {}", path.display(), e)))
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve a schemaLocation relative to the including document
fn resolve_schema_location(location: &str, base: Option<&Path>) -> PathBuf {
    let location_path = Path::new(location);
    if location_path.is_absolute() {
        return location_path.to_path_buf();
    }
    match base.and_then(Path::parent) {
        Some(dir) => dir.join(location_path),
        None => location_path.to_path_buf(),
    }
}

impl Loader {
    /// Read one schema document into the model and queue the documents it
    /// includes or imports. Returns the document's target namespace.
    fn load_document(
        &mut self,
        text: &str,
        source: Option<&Path>,
        parent_namespace: Option<&str>,
        pending: &mut VecDeque<PendingSchema>,
    ) -> Result<Option<String>> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options).map_err(|e| {
            let err = ParseError::new(format!("malformed schema document: {}", e));
            match source {
                Some(path) => err.with_location(path.display().to_string()),
                None => err,
            }
        })?;

        let root = doc.root_element();
        if !is_xsd(root, xsd_elements::SCHEMA) {
            return Err(ParseError::new(format!(
                "Expected xs:schema root element, got {}",
                root.tag_name().name()
            ))
            .into());
        }

        let own_namespace = root
            .attribute(xsd_attrs::TARGET_NAMESPACE)
            .filter(|ns| !ns.is_empty());
        let ctx = DocumentContext {
            target_namespace: own_namespace.or(parent_namespace).map(str::to_string),
            chameleon: own_namespace.is_none() && parent_namespace.is_some(),
            element_form: root
                .attribute(xsd_attrs::ELEMENT_FORM_DEFAULT)
                .and_then(ElementForm::from_str)
                .unwrap_or_default(),
            attribute_form: root
                .attribute(xsd_attrs::ATTRIBUTE_FORM_DEFAULT)
                .and_then(ElementForm::from_str)
                .unwrap_or_default(),
            source,
        };

        for child in xsd_children(root) {
            match child.tag_name().name() {
                xsd_elements::ELEMENT => self.parse_global_element(&ctx, child)?,
                xsd_elements::COMPLEX_TYPE => {
                    let name = ctx.qname(ctx.required_attr(child, xsd_attrs::NAME)?);
                    let ct = ctx.parse_complex_type(child)?.with_name(name);
                    self.schema.add_type(ct)?;
                }
                xsd_elements::SIMPLE_TYPE => {
                    let name = ctx.qname(ctx.required_attr(child, xsd_attrs::NAME)?);
                    let st = ctx.parse_simple_type(child)?.with_name(name);
                    self.schema.add_type(st)?;
                }
                xsd_elements::ATTRIBUTE => {
                    let decl = ctx.parse_global_attribute(child)?;
                    self.schema.add_attribute(decl);
                }
                xsd_elements::ATTRIBUTE_GROUP => {
                    let name = ctx.qname(ctx.required_attr(child, xsd_attrs::NAME)?);
                    let (items, wildcard) = ctx.parse_attributes(child)?;
                    self.schema.add_attribute_group(AttributeGroup {
                        name: Some(name),
                        items,
                        wildcard: wildcard.map(Arc::new),
                    })?;
                }
                xsd_elements::GROUP => {
                    let name = ctx.qname(ctx.required_attr(child, xsd_attrs::NAME)?);
                    let group = ctx.parse_named_group(child)?;
                    self.schema.add_group(name, group);
                }
                tag @ (xsd_elements::INCLUDE | xsd_elements::REDEFINE | xsd_elements::IMPORT) => {
                    let Some(location) = child.attribute(xsd_attrs::SCHEMA_LOCATION) else {
                        debug!(tag, "skipping schema reference without schemaLocation");
                        continue;
                    };
                    let parent_namespace = if tag == xsd_elements::IMPORT {
                        None
                    } else {
                        ctx.target_namespace.clone()
                    };
                    pending.push_back(PendingSchema {
                        path: resolve_schema_location(location, source),
                        parent_namespace,
                    });
                }
                _ => {}
            }
        }

        Ok(ctx.target_namespace)
    }

    /// Parse a global element declaration
    fn parse_global_element(&mut self, ctx: &DocumentContext, node: Node) -> Result<()> {
        let name = ctx.qname(ctx.required_attr(node, xsd_attrs::NAME)?);
        let mut decl = ElementDecl::new(name.clone())
            .with_abstract(parse_bool(node.attribute(xsd_attrs::ABSTRACT)));
        if let Some(head) = node.attribute(xsd_attrs::SUBSTITUTION_GROUP) {
            decl = decl.with_substitution_group(ctx.resolve_qname(node, head)?);
        }

        match ctx.parse_element_type(node)? {
            Some(type_ref) => decl = decl.with_type(type_ref),
            None if decl.substitution_group.is_some() => self.untyped_members.push(name),
            None => {}
        }
        self.schema.add_element(decl);
        Ok(())
    }

    /// Process the include/import worklist
    fn follow(&mut self, mut pending: VecDeque<PendingSchema>, mut visited: HashSet<PathBuf>) -> Result<()> {
        while let Some(work) = pending.pop_front() {
            if !visited.insert(canonical(&work.path)) {
                continue;
            }
            let text = read_schema(&work.path)?;
            self.load_document(
                &text,
                Some(&work.path),
                work.parent_namespace.as_deref(),
                &mut pending,
            )?;
        }
        Ok(())
    }

    /// Give untyped substitution group members the type of their head
    fn finish(mut self) -> SchemaModel {
        let order = std::mem::take(&mut self.untyped_members);
        let untyped: HashSet<QName> = order.iter().cloned().collect();
        for name in &order {
            let inherited = self.inherited_type(name, &untyped);
            if let (Some(type_ref), Some(decl)) = (inherited, self.schema.lookup_element(name)) {
                let decl = decl.as_ref().clone().with_type(type_ref);
                self.schema.add_element(decl);
            }
        }
        self.schema
    }

    fn inherited_type(&self, name: &QName, untyped: &HashSet<QName>) -> Option<TypeRef> {
        let mut head = self.schema.lookup_element(name)?.substitution_group.clone();
        for _ in 0..MAX_SUBSTITUTION_CHAIN {
            let decl = self.schema.lookup_element(head.as_ref()?)?;
            if !untyped.contains(&decl.name) {
                return Some(decl.type_ref.clone());
            }
            head = decl.substitution_group.clone();
        }
        None
    }
}

fn xsd_children<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|child| child.is_element() && child.tag_name().namespace() == Some(XSD_NAMESPACE))
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    xsd_children(node).find(|child| child.tag_name().name() == local_name)
}

fn is_xsd(node: Node, local_name: &str) -> bool {
    node.tag_name().namespace() == Some(XSD_NAMESPACE) && node.tag_name().name() == local_name
}

fn is_group_tag(tag: &str) -> bool {
    matches!(
        tag,
        xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL | xsd_elements::GROUP
    )
}

fn parse_bool(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}
