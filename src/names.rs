//! XML name validation and utilities
//!
//! This module provides validation for NCNames and parsing of the
//! `{namespace}localName` (Clark) notation used to name root elements.

use crate::error::{Error, Result};
use crate::namespaces::QName;
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$")
        .expect("NCName pattern is valid")
});

static CLARK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([^{}]*)\}(.+)$").expect("Clark pattern is valid"));

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Config(format!("Invalid NCName: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Parse `{namespace}local` or a bare `local` into a QName.
///
/// A bare name takes `default_namespace`, so a root given as `order` in a
/// schema with a target namespace still resolves.
pub fn parse_clark_name(name: &str, default_namespace: Option<&str>) -> Result<QName> {
    let name = name.trim();
    if let Some(caps) = CLARK_NAME.captures(name) {
        let local = &caps[2];
        validate_ncname(local)?;
        return Ok(QName::namespaced(&caps[1], local));
    }
    validate_ncname(name)?;
    Ok(QName::new(default_namespace, name))
}
