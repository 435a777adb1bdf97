//! XSD Model Groups
//!
//! This module implements model groups for content models:
//! - xs:sequence - ordered content
//! - xs:choice - alternative content
//! - xs:all - unordered content
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Model_Groups

use crate::namespaces::QName;
use std::sync::Arc;

use super::elements::{ElementDecl, ElementRef};
use super::particles::Occurs;
use super::wildcards::Wildcard;

/// Model group compositor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compositor {
    /// Ordered sequence of particles
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of particles
    All,
}

impl Compositor {
    /// Parse from element tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequence" => Some(Self::Sequence),
            "choice" => Some(Self::Choice),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Separator between particles in content-model notation
    pub fn separator(&self) -> &'static str {
        match self {
            Self::Sequence => ", ",
            Self::Choice => " | ",
            Self::All => " ; ",
        }
    }
}

impl std::fmt::Display for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Choice => write!(f, "choice"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Term wrapped by a particle
#[derive(Debug, Clone)]
pub enum Term {
    /// Element declaration or reference
    Element(ElementRef),
    /// Inline model group
    Group(Arc<ModelGroup>),
    /// `<xs:group ref="..."/>` to a named model group
    GroupRef(QName),
    /// Element wildcard
    Any(Arc<Wildcard>),
}

/// A term with occurrence bounds
#[derive(Debug, Clone)]
pub struct Particle {
    /// Occurrence bounds
    pub occurs: Occurs,
    /// The wrapped term
    pub term: Term,
}

impl Particle {
    /// Create a particle
    pub fn new(term: Term, occurs: Occurs) -> Self {
        Self { occurs, term }
    }

    /// Particle for an inline element declaration
    pub fn element(decl: ElementDecl, occurs: Occurs) -> Self {
        Self::new(Term::Element(decl.into()), occurs)
    }

    /// Particle for a reference to a global element
    pub fn element_ref(name: QName, occurs: Occurs) -> Self {
        Self::new(Term::Element(ElementRef::Global(name)), occurs)
    }

    /// Particle for an inline model group
    pub fn group(group: ModelGroup, occurs: Occurs) -> Self {
        Self::new(Term::Group(Arc::new(group)), occurs)
    }

    /// Particle for an element wildcard
    pub fn any(wildcard: Wildcard, occurs: Occurs) -> Self {
        Self::new(Term::Any(Arc::new(wildcard)), occurs)
    }

    /// Element name, for element particles
    pub fn term_name(&self) -> Option<&QName> {
        match &self.term {
            Term::Element(element) => Some(element.name()),
            _ => None,
        }
    }
}

/// XSD model group
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    /// Compositor
    pub compositor: Compositor,
    /// Child particles in declaration order
    pub particles: Vec<Particle>,
}

impl ModelGroup {
    /// Create an empty group
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            particles: Vec::new(),
        }
    }

    /// Sequence of the given particles
    pub fn sequence(particles: Vec<Particle>) -> Self {
        Self {
            compositor: Compositor::Sequence,
            particles,
        }
    }

    /// Choice between the given particles
    pub fn choice(particles: Vec<Particle>) -> Self {
        Self {
            compositor: Compositor::Choice,
            particles,
        }
    }

    /// Add a particle
    pub fn with_particle(mut self, particle: Particle) -> Self {
        self.particles.push(particle);
        self
    }

    /// Check if the group has no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
