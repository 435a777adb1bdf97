//! XML Schema model
//!
//! This module contains the in-memory representation of XSD 1.0 schemas
//! consumed by the instance generator, and the loader that builds it from
//! schema documents.

pub mod attributes;
pub mod builtins;
pub mod complex_types;
pub mod elements;
pub mod facets;
pub mod groups;
pub mod particles;
pub mod schemas;
pub mod simple_types;
pub mod types;
pub mod wildcards;

mod parsing;

pub use attributes::{
    AttributeDecl, AttributeGroup, AttributeItem, AttributeRef, AttributeUse, UseMode,
    ValueConstraint,
};
pub use builtins::BuiltinKind;
pub use complex_types::{ComplexType, ContentType, Derivation, DerivationMethod};
pub use elements::{ElementDecl, ElementRef};
pub use facets::{Facet, FacetKind, FacetSet};
pub use groups::{Compositor, ModelGroup, Particle, Term};
pub use particles::Occurs;
pub use schemas::{EffectiveAttribute, SchemaModel};
pub use simple_types::{SimpleType, SimpleVariety};
pub use types::{TypeDefinition, TypeRef};
pub use wildcards::{NamespaceConstraint, Wildcard};
