//! Content-model notation
//!
//! Renders the particle of a complex type in a compact DTD-like notation:
//! `(a, b)` for sequences, `(a | b)` for choices, `(a ; b)` for `all`
//! groups, wildcards as `any`, each followed by its occurrence suffix
//! (`?`, `*`, `+`, `[min,max]`).

use crate::error::{Error, Result};
use crate::schema::{ModelGroup, Particle, SchemaModel, Term};
use crate::writers::DocumentWriter;

/// Characters showing that a model is more than a fixed sequence
const VARIABLE_MARKERS: &[char] = &['?', '*', '+', '|', ';', '['];

const MAX_GROUP_NESTING: usize = 64;

/// Whether a rendered model is worth an annotation
pub fn is_variable(model: &str) -> bool {
    model.contains(VARIABLE_MARKERS)
}

/// Render the content model rooted at `particle`. Element names in a
/// namespace are prefixed with the prefix the writer binds for it.
pub fn render_content_model<W: DocumentWriter + ?Sized>(
    schema: &SchemaModel,
    particle: &Particle,
    writer: &mut W,
) -> Result<String> {
    let mut out = String::new();
    render_particle(schema, particle, writer, &mut out, 0)?;
    Ok(out)
}

fn render_particle<W: DocumentWriter + ?Sized>(
    schema: &SchemaModel,
    particle: &Particle,
    writer: &mut W,
    out: &mut String,
    depth: usize,
) -> Result<()> {
    match &particle.term {
        Term::Element(element) => {
            let name = element.name();
            if name.namespace_uri().is_empty() {
                out.push_str(&name.local_name);
            } else {
                let prefix = writer.declare_prefix(name.namespace_uri())?;
                out.push_str(&prefix);
                out.push(':');
                out.push_str(&name.local_name);
            }
        }
        Term::Group(group) => render_group(schema, group, writer, out, depth)?,
        Term::GroupRef(name) => {
            let group = schema.resolve_group(name)?;
            render_group(schema, &group, writer, out, depth)?;
        }
        Term::Any(_) => out.push_str("any"),
    }
    out.push_str(&particle.occurs.to_string());
    Ok(())
}

fn render_group<W: DocumentWriter + ?Sized>(
    schema: &SchemaModel,
    group: &ModelGroup,
    writer: &mut W,
    out: &mut String,
    depth: usize,
) -> Result<()> {
    if depth > MAX_GROUP_NESTING {
        return Err(Error::SchemaShape(
            "circular definition involving a model group".to_string(),
        ));
    }
    out.push('(');
    for (i, particle) in group.particles.iter().enumerate() {
        if i > 0 {
            out.push_str(group.compositor.separator());
        }
        render_particle(schema, particle, writer, out, depth + 1)?;
    }
    out.push(')');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::QName;
    use crate::schema::{Compositor, ElementDecl, NamespaceConstraint, Occurs, TypeRef, Wildcard};
    use crate::writers::EventRecorder;

    fn leaf(name: &str, occurs: Occurs) -> Particle {
        Particle::element(ElementDecl::local(QName::local(name), TypeRef::builtin("string")), occurs)
    }

    #[test]
    fn test_plain_sequence_is_not_variable() {
        let schema = SchemaModel::new();
        let mut writer = EventRecorder::new();
        let model = Particle::group(
            ModelGroup::sequence(vec![leaf("a", Occurs::once()), leaf("b", Occurs::once())]),
            Occurs::once(),
        );
        let text = render_content_model(&schema, &model, &mut writer).unwrap();
        assert_eq!(text, "(a, b)");
        assert!(!is_variable(&text));
    }

    #[test]
    fn test_nested_notation() {
        let mut schema = SchemaModel::new();
        schema.add_group(
            QName::local("extras"),
            ModelGroup::new(Compositor::All)
                .with_particle(leaf("x", Occurs::once()))
                .with_particle(leaf("y", Occurs::optional())),
        );
        let mut writer = EventRecorder::new();
        let model = Particle::group(
            ModelGroup::sequence(vec![
                Particle::element_ref(QName::namespaced("urn:t", "head"), Occurs::one_or_more()),
                Particle::group(
                    ModelGroup::choice(vec![
                        leaf("c", Occurs::once()),
                        Particle::any(Wildcard::new(NamespaceConstraint::Any), Occurs::new(2, Some(5))),
                    ]),
                    Occurs::zero_or_more(),
                ),
                Particle::new(Term::GroupRef(QName::local("extras")), Occurs::once()),
            ]),
            Occurs::once(),
        );

        let text = render_content_model(&schema, &model, &mut writer).unwrap();
        assert_eq!(text, "(ns1:head+, (c | any[2,5])*, (x ; y?))");
        assert!(is_variable(&text));
    }
}
