//! Sample instance generation
//!
//! This module turns a schema model into sample documents:
//! - `random` - seeded random source shared by every decision
//! - `policy` - generation bounds and tri-state flags
//! - `range` - repeat-count and list-length resolution
//! - `values` - leaf value synthesis for simple types
//! - `path` - ancestor chain used for the recursion cutoff
//! - `content_model` - content-model annotation text
//! - `walker` - the traversal emitting document events

pub mod content_model;
pub mod path;
pub mod policy;
pub mod random;
pub mod range;
pub mod values;
pub mod walker;

pub use path::{PathNode, RecursionPath};
pub use policy::{GenerationPolicy, TriState};
pub use random::{RandomRange, RandomSource};
pub use range::{resolve_list_length, resolve_range, resolve_repeat_count};
pub use values::{LeafValueSynthesizer, NameUsageCounters, NumericRange};
pub use walker::{XsInstance, MAX_RECURSION_DEPTH};
