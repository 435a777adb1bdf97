//! Instance generation
//!
//! [`XsInstance`] walks the schema from a root element declaration and
//! reports the sample document to a [`DocumentWriter`]. At each node it
//! decides:
//!
//! - how many times a particle repeats (policy bounds intersected with the
//!   declared occurrence range)
//! - which branches of a choice are visited, in shuffled order
//! - which member stands in for an abstract element and which concrete
//!   subtype for an abstract complex type (announced with `xsi:type`)
//! - whether optional, fixed and default attributes are written
//! - the namespace of wildcard content
//!
//! Leaf text comes from [`LeafValueSynthesizer`]. Elements nested more than
//! [`MAX_RECURSION_DEPTH`] times inside themselves are omitted, which bounds
//! the output of recursive schemas.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, trace};

use super::content_model::{is_variable, render_content_model};
use super::path::{PathNode, RecursionPath};
use super::policy::GenerationPolicy;
use super::random::RandomSource;
use super::range::resolve_repeat_count;
use super::values::LeafValueSynthesizer;
use crate::error::{Error, Result};
use crate::namespaces::{QName, XSI_NAMESPACE};
use crate::schema::{
    ComplexType, Compositor, ContentType, EffectiveAttribute, ElementDecl, ModelGroup,
    NamespaceConstraint, Occurs, Particle, SchemaModel, Term, TypeDefinition, ValueConstraint,
    Wildcard,
};
use crate::writers::DocumentWriter;

/// Times an element may already occur among its ancestors before it is
/// left out
pub const MAX_RECURSION_DEPTH: usize = 2;

/// Namespace written for wildcards that accept any namespace
pub const WILDCARD_NAMESPACE: &str = "anyNS";
/// Local name of elements generated for element wildcards
pub const WILDCARD_ELEMENT: &str = "anyElement";
/// Local name of attributes generated for attribute wildcards
pub const WILDCARD_ATTRIBUTE: &str = "anyAttr";
/// Value of attributes generated for attribute wildcards
pub const WILDCARD_ATTRIBUTE_VALUE: &str = "anyValue";

/// Sample instance generator for one schema and policy
#[derive(Debug, Clone)]
pub struct XsInstance<'a> {
    schema: &'a SchemaModel,
    policy: GenerationPolicy,
}

impl<'a> XsInstance<'a> {
    /// Create a generator
    pub fn new(schema: &'a SchemaModel, policy: GenerationPolicy) -> Self {
        Self { schema, policy }
    }

    /// The schema being instantiated
    pub fn schema(&self) -> &SchemaModel {
        self.schema
    }

    /// The generation policy
    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Generate one document rooted at the global element `root`.
    ///
    /// Fails with [`Error::RootNotFound`] before any event is written when
    /// `root` is not declared. Writer errors abort the run and are returned
    /// unchanged.
    pub fn generate<R, W>(
        &self,
        root: &QName,
        random: &mut RandomSource<R>,
        writer: &mut W,
    ) -> Result<()>
    where
        R: Rng,
        W: DocumentWriter + ?Sized,
    {
        let decl = self.schema.root_element(root)?;
        debug!(root = %root, "generating instance");

        let mut walk = Walk {
            schema: self.schema,
            policy: &self.policy,
            random,
            writer,
            values: LeafValueSynthesizer::new(self.schema, &self.policy),
            path: RecursionPath::new(),
        };

        walk.writer.start_document()?;
        walk.writer.declare_prefix(XSI_NAMESPACE)?;
        if !root.namespace_uri().is_empty() {
            walk.writer.declare_prefix(root.namespace_uri())?;
        }
        walk.element(&decl)?;
        walk.writer.end_document()
    }
}

/// State of one generation run
struct Walk<'w, R, W: ?Sized> {
    schema: &'w SchemaModel,
    policy: &'w GenerationPolicy,
    random: &'w mut RandomSource<R>,
    writer: &'w mut W,
    values: LeafValueSynthesizer<'w>,
    path: RecursionPath,
}

impl<'w, R, W> Walk<'w, R, W>
where
    R: Rng,
    W: DocumentWriter + ?Sized,
{
    // =========================================================================
    // Elements
    // =========================================================================

    fn element(&mut self, decl: &Arc<ElementDecl>) -> Result<()> {
        if decl.abstract_element {
            let member = self.substitute(decl)?;
            return self.element(&member);
        }

        let depth = self.path.recursion_depth(decl);
        if depth > MAX_RECURSION_DEPTH {
            debug!(element = %decl.name, depth, "recursion cutoff, element omitted");
            return Ok(());
        }

        let declared = self.schema.resolve_type(&decl.type_ref)?;
        let (definition, substituted) = match &declared {
            TypeDefinition::Complex(ct) if ct.abstract_type => {
                let subtype = self.concrete_subtype(ct)?;
                (TypeDefinition::Complex(subtype), true)
            }
            other => (other.clone(), false),
        };

        self.path.push(PathNode::Element(decl.clone()));

        if self.policy.annotate_content_model {
            self.annotate(&declared)?;
        }
        self.writer
            .start_element(decl.name.namespace_uri(), &decl.name.local_name)?;

        if let TypeDefinition::Complex(ct) = &definition {
            self.complex_type(ct, substituted)?;
        }
        if let Some(text_type) = self.schema.text_type(&definition)? {
            let value = self
                .values
                .synthesize(&text_type, &decl.name.local_name, self.random)?;
            self.writer.add_text(&value)?;
        }

        self.writer.end_element()?;
        self.path.pop();
        Ok(())
    }

    fn substitute(&mut self, decl: &Arc<ElementDecl>) -> Result<Arc<ElementDecl>> {
        let members = self.schema.substitution_members(&decl.name);
        if members.is_empty() {
            return Err(Error::SchemaShape(format!(
                "abstract element {} has no substitution group members",
                decl.name
            )));
        }
        let member = members[self.random.index(members.len())].clone();
        debug!(element = %decl.name, member = %member.name, "substituted abstract element");
        Ok(member)
    }

    fn concrete_subtype(&mut self, complex_type: &Arc<ComplexType>) -> Result<Arc<ComplexType>> {
        let name = complex_type.name.as_ref().ok_or_else(|| {
            Error::SchemaShape("anonymous abstract complex type has no subtypes".to_string())
        })?;
        let subtypes = self.schema.concrete_subtypes(name);
        if subtypes.is_empty() {
            return Err(Error::SchemaShape(format!(
                "abstract type {} has no concrete subtypes",
                name
            )));
        }
        let subtype = subtypes[self.random.index(subtypes.len())].clone();
        debug!(
            base = %name,
            subtype = %subtype.name.as_ref().map(QName::to_string).unwrap_or_default(),
            "resolved abstract type"
        );
        Ok(subtype)
    }

    fn annotate(&mut self, definition: &TypeDefinition) -> Result<()> {
        let TypeDefinition::Complex(ct) = definition else {
            return Ok(());
        };
        let particle = match self.schema.content_type(ct)? {
            ContentType::ElementOnly(p) | ContentType::Mixed(p) => p,
            _ => return Ok(()),
        };
        let model = render_content_model(self.schema, &particle, self.writer)?;
        if is_variable(&model) {
            self.writer.add_comment(&model)?;
        }
        Ok(())
    }

    // =========================================================================
    // Complex types and attributes
    // =========================================================================

    fn complex_type(&mut self, complex_type: &Arc<ComplexType>, substituted: bool) -> Result<()> {
        if self.path.nearest_element().is_none() {
            return Err(Error::InternalInvariantViolation(
                "complex type visited outside of an element".to_string(),
            ));
        }

        if substituted {
            let name = complex_type.name.as_ref().ok_or_else(|| {
                Error::InternalInvariantViolation("substituted type has no name".to_string())
            })?;
            let prefix = self.writer.declare_prefix(name.namespace_uri())?;
            let value = if prefix.is_empty() {
                name.local_name.clone()
            } else {
                format!("{}:{}", prefix, name.local_name)
            };
            self.writer.add_attribute(XSI_NAMESPACE, "type", &value)?;
        }

        let attribute_wildcard = self.schema.attribute_wildcard(complex_type)?;
        self.path.push(PathNode::ComplexType {
            definition: complex_type.clone(),
            attribute_wildcard: attribute_wildcard.clone(),
        });

        for attribute in self.schema.attribute_uses(complex_type)? {
            self.attribute(&attribute)?;
        }
        if let Some(wildcard) = &attribute_wildcard {
            self.wildcard(wildcard)?;
        }
        if let Some(particle) = self.schema.content_type(complex_type)?.particle() {
            self.particle(particle)?;
        }

        self.path.pop();
        Ok(())
    }

    fn attribute(&mut self, attribute: &EffectiveAttribute) -> Result<()> {
        let name = &attribute.decl.name;
        self.path.push(PathNode::Attribute(name.clone()));

        let value = match &attribute.constraint {
            ValueConstraint::Fixed(value) => self
                .random
                .tri_state(self.policy.fixed_attributes)
                .then(|| value.clone()),
            ValueConstraint::Default(value) => self
                .random
                .tri_state(self.policy.default_attributes)
                .then(|| value.clone()),
            ValueConstraint::None => {
                if attribute.required || self.random.tri_state(self.policy.optional_attributes) {
                    let simple_type = self.schema.resolve_simple_type(&attribute.decl.type_ref)?;
                    Some(
                        self.values
                            .synthesize(&simple_type, &name.local_name, self.random)?,
                    )
                } else if self
                    .random
                    .tri_state(self.policy.optional_attribute_as_empty_string)
                {
                    Some(String::new())
                } else {
                    None
                }
            }
        };

        if let Some(value) = value {
            self.writer
                .add_attribute(name.namespace_uri(), &name.local_name, &value)?;
        }
        self.path.pop();
        Ok(())
    }

    // =========================================================================
    // Particles and model groups
    // =========================================================================

    fn particle(&mut self, particle: &Particle) -> Result<()> {
        match &particle.term {
            Term::Group(group) => self.model_group(group, &particle.occurs),
            Term::GroupRef(name) => {
                let group = self.schema.resolve_group(name)?;
                self.model_group(&group, &particle.occurs)
            }
            Term::Element(element) => {
                let count = self.repeat_count(particle);
                for _ in 0..count {
                    let decl = self.schema.resolve_element(element)?;
                    self.element(&decl)?;
                }
                Ok(())
            }
            Term::Any(wildcard) => {
                let count = self.repeat_count(particle);
                for _ in 0..count {
                    self.wildcard(wildcard)?;
                }
                Ok(())
            }
        }
    }

    fn repeat_count(&mut self, particle: &Particle) -> u32 {
        let count = resolve_repeat_count(&particle.occurs, self.policy, self.random);
        trace!(
            term = %particle.term_name().map(QName::to_string).unwrap_or_else(|| "any".to_string()),
            occurs = %particle.occurs,
            count,
            "repeat count"
        );
        count
    }

    fn model_group(&mut self, group: &ModelGroup, occurs: &Occurs) -> Result<()> {
        if group.compositor == Compositor::Choice {
            return self.choice(group, occurs);
        }

        let count = resolve_repeat_count(occurs, self.policy, self.random);
        trace!(compositor = %group.compositor, occurs = %occurs, count, "repeat count");
        for _ in 0..count {
            let mut particles: Vec<&Particle> = group.particles.iter().collect();
            if group.compositor == Compositor::All {
                self.random.shuffle(&mut particles);
            }
            self.path.push(PathNode::ModelGroup(group.compositor));
            for particle in particles {
                self.particle(particle)?;
            }
            self.path.pop();
        }
        Ok(())
    }

    /// Visit the branches of a choice in random order: all of them, or the
    /// first `maxOccurs` when choices are sampled
    fn choice(&mut self, group: &ModelGroup, occurs: &Occurs) -> Result<()> {
        let mut branches: Vec<&Particle> = group.particles.iter().collect();
        self.random.shuffle(&mut branches);

        let count = match occurs.max {
            Some(max) if !self.policy.exhaustive_choices => branches.len().min(max as usize),
            _ => branches.len(),
        };
        debug!(branches = branches.len(), visited = count, "choice");

        self.path.push(PathNode::ModelGroup(Compositor::Choice));
        for particle in branches.into_iter().take(count) {
            self.particle(particle)?;
        }
        self.path.pop();
        Ok(())
    }

    // =========================================================================
    // Wildcards
    // =========================================================================

    fn wildcard(&mut self, wildcard: &Arc<Wildcard>) -> Result<()> {
        self.path.push(PathNode::Wildcard(wildcard.clone()));

        let namespace = self.wildcard_namespace(wildcard)?;
        if self.path.is_attribute_wildcard() {
            self.writer
                .add_attribute(&namespace, WILDCARD_ATTRIBUTE, WILDCARD_ATTRIBUTE_VALUE)?;
        } else {
            self.writer.start_element(&namespace, WILDCARD_ELEMENT)?;
            self.writer.end_element()?;
        }

        self.path.pop();
        Ok(())
    }

    fn wildcard_namespace(&mut self, wildcard: &Wildcard) -> Result<String> {
        match &wildcard.constraint {
            NamespaceConstraint::Any => Ok(WILDCARD_NAMESPACE.to_string()),
            NamespaceConstraint::List(namespaces) => {
                self.random.pick(namespaces).cloned().ok_or_else(|| {
                    Error::InternalInvariantViolation(
                        "wildcard with an empty namespace list".to_string(),
                    )
                })
            }
            NamespaceConstraint::NotInList(excluded) => {
                Ok(unlisted_namespace(excluded))
            }
        }
    }
}

/// The wildcard placeholder namespace, suffixed with the first number that
/// makes it differ from every excluded namespace
fn unlisted_namespace(excluded: &[String]) -> String {
    if !excluded.iter().any(|ns| ns == WILDCARD_NAMESPACE) {
        return WILDCARD_NAMESPACE.to_string();
    }
    (1u32..)
        .map(|i| format!("{}{}", WILDCARD_NAMESPACE, i))
        .find(|candidate| !excluded.contains(candidate))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::policy::TriState;
    use crate::schema::{
        AttributeDecl, AttributeUse, DerivationMethod, Facet, FacetKind, SimpleType, TypeRef,
        UseMode,
    };
    use crate::writers::{DocumentEvent, EventRecorder};
    use pretty_assertions::assert_eq;

    fn record(schema: &SchemaModel, root: &str, policy: GenerationPolicy, seed: u64) -> Vec<DocumentEvent> {
        let mut recorder = EventRecorder::new();
        XsInstance::new(schema, policy)
            .generate(&schema.qname(root), &mut RandomSource::seeded(seed), &mut recorder)
            .unwrap();
        recorder.into_events()
    }

    fn quiet() -> GenerationPolicy {
        GenerationPolicy::new().with_content_model_annotation(false)
    }

    fn start(name: &str) -> DocumentEvent {
        DocumentEvent::StartElement {
            namespace: String::new(),
            name: name.to_string(),
        }
    }

    fn text(value: &str) -> DocumentEvent {
        DocumentEvent::Text {
            value: value.to_string(),
        }
    }

    fn complex_element(name: &str, content: ContentType) -> ElementDecl {
        ElementDecl::new(QName::local(name))
            .with_type(TypeRef::anonymous(ComplexType::new().with_content(content)))
    }

    fn leaf(name: &str, type_name: &str, occurs: Occurs) -> Particle {
        Particle::element(ElementDecl::local(QName::local(name), TypeRef::builtin(type_name)), occurs)
    }

    #[test]
    fn test_simple_root_event_sequence() {
        let mut schema = SchemaModel::new();
        schema.add_element(ElementDecl::new(QName::local("name")).with_type(TypeRef::builtin("string")));

        let events = record(&schema, "name", quiet(), 1);
        assert_eq!(
            events,
            vec![
                DocumentEvent::StartDocument,
                DocumentEvent::DeclarePrefix {
                    uri: XSI_NAMESPACE.to_string(),
                    prefix: "xsi".to_string()
                },
                start("name"),
                text("name1"),
                DocumentEvent::EndElement,
                DocumentEvent::EndDocument,
            ]
        );
    }

    #[test]
    fn test_root_not_found_writes_nothing() {
        let schema = SchemaModel::new();
        let mut recorder = EventRecorder::new();
        let err = XsInstance::new(&schema, quiet())
            .generate(&QName::local("missing"), &mut RandomSource::seeded(0), &mut recorder)
            .unwrap_err();
        assert!(matches!(err, Error::RootNotFound(_)));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_fixed_repeat_counts() {
        let mut schema = SchemaModel::new();
        schema.add_element(complex_element(
            "list",
            ContentType::ElementOnly(Particle::group(
                ModelGroup::sequence(vec![
                    leaf("item", "string", Occurs::zero_or_more()),
                    leaf("note", "string", Occurs::optional()),
                ]),
                Occurs::once(),
            )),
        ));
        let policy = quiet().with_element_bounds(2, 2).with_optional_elements(false);

        for seed in 0..10 {
            let mut recorder = EventRecorder::new();
            XsInstance::new(&schema, policy.clone())
                .generate(&QName::local("list"), &mut RandomSource::seeded(seed), &mut recorder)
                .unwrap();
            assert_eq!(recorder.element_names(), vec!["list", "item", "item"]);
        }
    }

    #[test]
    fn test_exhaustive_and_sampled_choice() {
        let mut schema = SchemaModel::new();
        schema.add_element(complex_element(
            "pick",
            ContentType::ElementOnly(Particle::group(
                ModelGroup::choice(vec![
                    leaf("a", "string", Occurs::once()),
                    leaf("b", "string", Occurs::once()),
                    leaf("c", "string", Occurs::once()),
                ]),
                Occurs::once(),
            )),
        ));

        let all = record(&schema, "pick", quiet(), 3);
        let starts = all
            .iter()
            .filter(|e| matches!(e, DocumentEvent::StartElement { .. }))
            .count();
        assert_eq!(starts, 4);

        for seed in 0..10 {
            let sampled = record(&schema, "pick", quiet().with_exhaustive_choices(false), seed);
            let starts = sampled
                .iter()
                .filter(|e| matches!(e, DocumentEvent::StartElement { .. }))
                .count();
            assert_eq!(starts, 2);
        }
    }

    #[test]
    fn test_fixed_attribute_follows_flag() {
        let mut schema = SchemaModel::new();
        schema.add_element(
            ElementDecl::new(QName::local("tag")).with_type(TypeRef::anonymous(
                ComplexType::new().with_attribute(
                    AttributeUse::new(AttributeDecl::new(QName::local("version")))
                        .with_constraint(ValueConstraint::Fixed("v1".into())),
                ),
            )),
        );

        let on = record(&schema, "tag", quiet().with_fixed_attributes(true), 0);
        assert!(on.contains(&DocumentEvent::Attribute {
            namespace: String::new(),
            name: "version".into(),
            value: "v1".into()
        }));

        let off = record(&schema, "tag", quiet().with_fixed_attributes(false), 0);
        assert!(!off.iter().any(|e| matches!(e, DocumentEvent::Attribute { .. })));
    }

    #[test]
    fn test_default_attribute_follows_flag() {
        let mut schema = SchemaModel::new();
        schema.add_element(
            ElementDecl::new(QName::local("tag")).with_type(TypeRef::anonymous(
                ComplexType::new().with_attribute(
                    AttributeUse::new(AttributeDecl::new(QName::local("dialect")))
                        .with_constraint(ValueConstraint::Default("d1".into())),
                ),
            )),
        );

        let on = record(&schema, "tag", quiet().with_default_attributes(true), 0);
        assert!(on.contains(&DocumentEvent::Attribute {
            namespace: String::new(),
            name: "dialect".into(),
            value: "d1".into()
        }));

        let off = record(&schema, "tag", quiet().with_default_attributes(false), 0);
        assert!(!off.iter().any(|e| matches!(e, DocumentEvent::Attribute { .. })));
    }

    /// Forwards to a recorder until the configured `start_element` call fails
    struct FailingWriter {
        inner: EventRecorder,
        fail_at: usize,
        starts: usize,
        failed: bool,
        calls_after_failure: usize,
    }

    impl FailingWriter {
        fn new(fail_at: usize) -> Self {
            Self {
                inner: EventRecorder::new(),
                fail_at,
                starts: 0,
                failed: false,
                calls_after_failure: 0,
            }
        }

        fn touch(&mut self) {
            if self.failed {
                self.calls_after_failure += 1;
            }
        }
    }

    impl DocumentWriter for FailingWriter {
        fn start_document(&mut self) -> Result<()> {
            self.touch();
            self.inner.start_document()
        }

        fn declare_prefix(&mut self, uri: &str) -> Result<String> {
            self.touch();
            self.inner.declare_prefix(uri)
        }

        fn start_element(&mut self, namespace: &str, name: &str) -> Result<()> {
            self.touch();
            self.starts += 1;
            if self.starts == self.fail_at {
                self.failed = true;
                return Err(Error::Write("boom".into()));
            }
            self.inner.start_element(namespace, name)
        }

        fn add_attribute(&mut self, namespace: &str, name: &str, value: &str) -> Result<()> {
            self.touch();
            self.inner.add_attribute(namespace, name, value)
        }

        fn add_text(&mut self, text: &str) -> Result<()> {
            self.touch();
            self.inner.add_text(text)
        }

        fn add_comment(&mut self, text: &str) -> Result<()> {
            self.touch();
            self.inner.add_comment(text)
        }

        fn end_element(&mut self) -> Result<()> {
            self.touch();
            self.inner.end_element()
        }

        fn end_document(&mut self) -> Result<()> {
            self.touch();
            self.inner.end_document()
        }
    }

    #[test]
    fn test_writer_error_stops_generation() {
        let mut schema = SchemaModel::new();
        schema.add_element(complex_element(
            "order",
            ContentType::ElementOnly(Particle::group(
                ModelGroup::sequence(vec![
                    leaf("a", "string", Occurs::once()),
                    leaf("b", "string", Occurs::once()),
                ]),
                Occurs::once(),
            )),
        ));

        let mut writer = FailingWriter::new(2);
        let err = XsInstance::new(&schema, quiet())
            .generate(&QName::local("order"), &mut RandomSource::seeded(0), &mut writer)
            .unwrap_err();

        assert!(matches!(&err, Error::Write(message) if message == "boom"));
        assert_eq!(writer.calls_after_failure, 0);
        assert_eq!(writer.inner.events().last(), Some(&start("order")));
        assert!(!writer
            .inner
            .events()
            .iter()
            .any(|e| matches!(e, DocumentEvent::EndElement | DocumentEvent::EndDocument)));
    }

    #[test]
    fn test_optional_attribute_as_empty_string() {
        let mut schema = SchemaModel::new();
        schema.add_element(
            ElementDecl::new(QName::local("tag")).with_type(TypeRef::anonymous(
                ComplexType::new()
                    .with_attribute(AttributeUse::new(AttributeDecl::new(QName::local("lang"))))
                    .with_attribute(
                        AttributeUse::new(AttributeDecl::new(QName::local("id")))
                            .with_mode(UseMode::Required),
                    ),
            )),
        );
        let policy = quiet()
            .with_optional_attributes(TriState::Never)
            .with_optional_attribute_as_empty_string(TriState::Always);

        let events = record(&schema, "tag", policy, 0);
        let attributes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                DocumentEvent::Attribute { name, value, .. } => Some((name.as_str(), value.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(attributes, vec![("lang", ""), ("id", "id1")]);
    }

    #[test]
    fn test_abstract_type_writes_xsi_type() {
        let mut schema = SchemaModel::with_namespace("urn:shapes");
        let shape = schema.qname("Shape");
        schema
            .add_type(ComplexType::new().with_name(shape.clone()).with_abstract(true))
            .unwrap();
        schema
            .add_type(
                ComplexType::new()
                    .with_name(schema.qname("Circle"))
                    .derived_from(DerivationMethod::Extension, shape.clone())
                    .with_content(ContentType::ElementOnly(leaf("radius", "int", Occurs::once()))),
            )
            .unwrap();
        let root = ElementDecl::new(schema.qname("shape")).with_type(TypeRef::named(shape));
        schema.add_element(root);

        let events = record(&schema, "shape", quiet(), 4);
        assert!(events.contains(&DocumentEvent::Attribute {
            namespace: XSI_NAMESPACE.to_string(),
            name: "type".into(),
            value: "ns1:Circle".into()
        }));
        assert!(events.contains(&start("radius")));
    }

    #[test]
    fn test_abstract_without_alternatives_fails() {
        let mut schema = SchemaModel::new();
        schema.add_element(ElementDecl::new(QName::local("head")).with_abstract(true));
        let mut recorder = EventRecorder::new();
        let err = XsInstance::new(&schema, quiet())
            .generate(&QName::local("head"), &mut RandomSource::seeded(0), &mut recorder)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaShape(_)));
    }

    #[test]
    fn test_substitution_group_member_used() {
        let mut schema = SchemaModel::new();
        schema.add_element(ElementDecl::new(QName::local("head")).with_abstract(true));
        schema.add_element(
            ElementDecl::new(QName::local("member"))
                .with_type(TypeRef::builtin("boolean"))
                .with_substitution_group(QName::local("head")),
        );
        schema.add_element(complex_element(
            "root",
            ContentType::ElementOnly(Particle::element_ref(QName::local("head"), Occurs::once())),
        ));

        let mut recorder = EventRecorder::new();
        XsInstance::new(&schema, quiet())
            .generate(&QName::local("root"), &mut RandomSource::seeded(2), &mut recorder)
            .unwrap();
        assert_eq!(recorder.element_names(), vec!["root", "member"]);
    }

    #[test]
    fn test_recursion_cutoff() {
        let mut schema = SchemaModel::new();
        let node = QName::local("node");
        schema.add_element(ElementDecl::new(node.clone()).with_type(TypeRef::anonymous(
            ComplexType::new().with_content(ContentType::ElementOnly(Particle::element_ref(
                node.clone(),
                Occurs::once(),
            ))),
        )));

        let mut recorder = EventRecorder::new();
        XsInstance::new(&schema, quiet())
            .generate(&node, &mut RandomSource::seeded(0), &mut recorder)
            .unwrap();
        assert_eq!(recorder.element_names(), vec!["node", "node", "node"]);
    }

    #[test]
    fn test_wildcards() {
        let mut schema = SchemaModel::new();
        schema.add_element(
            ElementDecl::new(QName::local("open")).with_type(TypeRef::anonymous(
                ComplexType::new()
                    .with_content(ContentType::ElementOnly(Particle::any(
                        Wildcard::new(NamespaceConstraint::List(vec!["urn:only".into()])),
                        Occurs::once(),
                    )))
                    .with_attribute_wildcard(Wildcard::new(NamespaceConstraint::NotInList(vec![
                        "anyNS".into(),
                        "anyNS1".into(),
                    ]))),
            )),
        );

        let events = record(&schema, "open", quiet(), 0);
        assert!(events.contains(&DocumentEvent::Attribute {
            namespace: "anyNS2".into(),
            name: WILDCARD_ATTRIBUTE.into(),
            value: WILDCARD_ATTRIBUTE_VALUE.into()
        }));
        assert!(events.contains(&DocumentEvent::StartElement {
            namespace: "urn:only".into(),
            name: WILDCARD_ELEMENT.into()
        }));
    }

    #[test]
    fn test_empty_namespace_list_is_invariant_violation() {
        let mut schema = SchemaModel::new();
        schema.add_element(complex_element(
            "open",
            ContentType::ElementOnly(Particle::any(
                Wildcard::new(NamespaceConstraint::List(Vec::new())),
                Occurs::once(),
            )),
        ));
        let mut recorder = EventRecorder::new();
        let err = XsInstance::new(&schema, quiet())
            .generate(&QName::local("open"), &mut RandomSource::seeded(0), &mut recorder)
            .unwrap_err();
        assert!(matches!(err, Error::InternalInvariantViolation(_)));
    }

    #[test]
    fn test_content_model_comment() {
        let mut schema = SchemaModel::new();
        schema.add_element(complex_element(
            "doc",
            ContentType::ElementOnly(Particle::group(
                ModelGroup::sequence(vec![
                    leaf("title", "string", Occurs::once()),
                    leaf("para", "string", Occurs::one_or_more()),
                ]),
                Occurs::once(),
            )),
        ));

        let events = record(&schema, "doc", GenerationPolicy::new(), 0);
        assert_eq!(
            events[2],
            DocumentEvent::Comment {
                text: "(title, para+)".into()
            }
        );
        assert_eq!(events[3], start("doc"));
    }

    #[test]
    fn test_simple_content_text_after_attributes() {
        let mut schema = SchemaModel::new();
        let price = SimpleType::restriction(TypeRef::builtin("decimal"))
            .with_facet(Facet::Count(FacetKind::FractionDigits, 0))
            .with_facet(Facet::Bound(FacetKind::MinInclusive, "5".into()))
            .with_facet(Facet::Bound(FacetKind::MaxInclusive, "5".into()));
        schema.add_element(
            ElementDecl::new(QName::local("price")).with_type(TypeRef::anonymous(
                ComplexType::new()
                    .with_content(ContentType::Simple(TypeRef::anonymous(price)))
                    .with_attribute(
                        AttributeUse::new(
                            AttributeDecl::new(QName::local("currency"))
                                .with_type(TypeRef::builtin("string")),
                        )
                        .with_mode(UseMode::Required),
                    ),
            )),
        );

        let events = record(&schema, "price", quiet(), 0);
        assert_eq!(
            &events[2..6],
            &[
                start("price"),
                DocumentEvent::Attribute {
                    namespace: String::new(),
                    name: "currency".into(),
                    value: "currency1".into()
                },
                text("5"),
                DocumentEvent::EndElement,
            ]
        );
    }

    #[test]
    fn test_unlisted_namespace() {
        assert_eq!(unlisted_namespace(&["urn:a".to_string()]), "anyNS");
        assert_eq!(unlisted_namespace(&["anyNS".to_string()]), "anyNS1");
    }
}
