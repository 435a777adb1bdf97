//! Property-testing source
//!
//! Wraps the generator as a `proptest` strategy. Each value is generated
//! from a seed drawn by proptest, so shrinking a failing case shrinks the
//! seed.

use std::sync::Arc;

use proptest::prelude::*;

use crate::generate_xml_string;
use crate::generator::GenerationPolicy;
use crate::namespaces::QName;
use crate::schema::SchemaModel;

/// Strategy producing sample documents rooted at `root`.
///
/// Seeds for which generation fails (for example an abstract type without
/// subtypes) are rejected.
pub fn xml_documents(
    schema: Arc<SchemaModel>,
    root: QName,
    policy: GenerationPolicy,
) -> impl Strategy<Value = String> {
    any::<u64>().prop_filter_map("schema cannot be instantiated", move |seed| {
        generate_xml_string(&schema, &root, policy.clone(), seed).ok()
    })
}
