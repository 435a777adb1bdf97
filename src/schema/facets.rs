//! XSD constraining facets
//!
//! Only the facets that steer value synthesis are modelled: value bounds,
//! digit counts, lengths and enumerations. Pattern and whiteSpace facets
//! are accepted by the loader and dropped.

use crate::error::{ParseError, Result};
use std::fmt;

/// Facet kind, used for lookups along a type's base chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    /// minInclusive
    MinInclusive,
    /// minExclusive
    MinExclusive,
    /// maxInclusive
    MaxInclusive,
    /// maxExclusive
    MaxExclusive,
    /// totalDigits
    TotalDigits,
    /// fractionDigits
    FractionDigits,
    /// length
    Length,
    /// minLength
    MinLength,
    /// maxLength
    MaxLength,
    /// enumeration
    Enumeration,
}

impl FacetKind {
    /// Parse from the facet element's local name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "minInclusive" => Some(Self::MinInclusive),
            "minExclusive" => Some(Self::MinExclusive),
            "maxInclusive" => Some(Self::MaxInclusive),
            "maxExclusive" => Some(Self::MaxExclusive),
            "totalDigits" => Some(Self::TotalDigits),
            "fractionDigits" => Some(Self::FractionDigits),
            "length" => Some(Self::Length),
            "minLength" => Some(Self::MinLength),
            "maxLength" => Some(Self::MaxLength),
            "enumeration" => Some(Self::Enumeration),
            _ => None,
        }
    }

    /// Get the facet name as written in a schema
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinInclusive => "minInclusive",
            Self::MinExclusive => "minExclusive",
            Self::MaxInclusive => "maxInclusive",
            Self::MaxExclusive => "maxExclusive",
            Self::TotalDigits => "totalDigits",
            Self::FractionDigits => "fractionDigits",
            Self::Length => "length",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Enumeration => "enumeration",
        }
    }

    fn is_count(&self) -> bool {
        matches!(
            self,
            Self::TotalDigits
                | Self::FractionDigits
                | Self::Length
                | Self::MinLength
                | Self::MaxLength
        )
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared facet with its lexical value(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet {
    /// Bound facets keep the lexical form; they are interpreted per type
    Bound(FacetKind, String),
    /// Digit and length facets
    Count(FacetKind, u32),
    /// Enumerated values in declaration order
    Enumeration(Vec<String>),
}

impl Facet {
    /// Build a facet from its kind and lexical value
    pub fn parse(kind: FacetKind, value: &str) -> Result<Self> {
        if kind == FacetKind::Enumeration {
            return Ok(Facet::Enumeration(vec![value.to_string()]));
        }
        let value = value.trim();
        if kind.is_count() {
            let count = value.parse::<u32>().map_err(|_| {
                ParseError::new(format!("{} must be a non-negative integer", kind))
                    .with_source(value)
            })?;
            return Ok(Facet::Count(kind, count));
        }
        Ok(Facet::Bound(kind, value.to_string()))
    }

    /// Get the facet kind
    pub fn kind(&self) -> FacetKind {
        match self {
            Facet::Bound(kind, _) | Facet::Count(kind, _) => *kind,
            Facet::Enumeration(_) => FacetKind::Enumeration,
        }
    }
}

/// Ordered set of facets declared directly on one simple type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSet {
    facets: Vec<Facet>,
}

impl FacetSet {
    /// Create an empty facet set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facet. Repeated enumeration facets merge into one value list;
    /// any other repeated kind replaces the earlier declaration.
    pub fn push(&mut self, facet: Facet) {
        match facet {
            Facet::Enumeration(values) => {
                if let Some(Facet::Enumeration(existing)) = self
                    .facets
                    .iter_mut()
                    .find(|f| f.kind() == FacetKind::Enumeration)
                {
                    existing.extend(values);
                } else {
                    self.facets.push(Facet::Enumeration(values));
                }
            }
            other => {
                let kind = other.kind();
                self.facets.retain(|f| f.kind() != kind);
                self.facets.push(other);
            }
        }
    }

    /// Builder form of [`FacetSet::push`]
    pub fn with(mut self, facet: Facet) -> Self {
        self.push(facet);
        self
    }

    /// Get the facet of a kind, if declared here
    pub fn get(&self, kind: FacetKind) -> Option<&Facet> {
        self.facets.iter().find(|f| f.kind() == kind)
    }

    /// Iterate the declared facets
    pub fn iter(&self) -> impl Iterator<Item = &Facet> {
        self.facets.iter()
    }

    /// Check if no facet is declared
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_parse() {
        assert_eq!(
            Facet::parse(FacetKind::MaxLength, " 8 ").unwrap(),
            Facet::Count(FacetKind::MaxLength, 8)
        );
        assert_eq!(
            Facet::parse(FacetKind::MinInclusive, "-1.5").unwrap(),
            Facet::Bound(FacetKind::MinInclusive, "-1.5".to_string())
        );
        assert!(Facet::parse(FacetKind::TotalDigits, "many").is_err());
    }

    #[test]
    fn test_enumerations_merge_in_order() {
        let mut set = FacetSet::new();
        set.push(Facet::parse(FacetKind::Enumeration, "red").unwrap());
        set.push(Facet::parse(FacetKind::MaxLength, "5").unwrap());
        set.push(Facet::parse(FacetKind::Enumeration, "green").unwrap());

        assert_eq!(
            set.get(FacetKind::Enumeration),
            Some(&Facet::Enumeration(vec!["red".into(), "green".into()]))
        );
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_redeclared_facet_replaces() {
        let set = FacetSet::new()
            .with(Facet::Count(FacetKind::MinLength, 1))
            .with(Facet::Count(FacetKind::MinLength, 3));
        assert_eq!(
            set.get(FacetKind::MinLength),
            Some(&Facet::Count(FacetKind::MinLength, 3))
        );
    }

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(FacetKind::from_tag("fractionDigits"), Some(FacetKind::FractionDigits));
        assert_eq!(FacetKind::from_tag("pattern"), None);
    }
}
