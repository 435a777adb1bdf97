//! XSD particle occurrence bounds
//!
//! Particles pair a term (element, model group or wildcard) with
//! `minOccurs`/`maxOccurs`. The generator only needs the bounds and a few
//! predicates over them; the terms themselves live in [`super::groups`].
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#cParticles

use crate::error::{ParseError, Result};
use std::fmt;

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// A true optional: present or absent, never repeated
    pub fn is_optional(&self) -> bool {
        self.min == 0 && self.max == Some(1)
    }

    /// Check if maxOccurs is unbounded
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Check if minOccurs == maxOccurs
    pub fn is_univocal(&self) -> bool {
        self.max == Some(self.min)
    }

    /// Check if an occurrence count lies within these bounds
    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

impl fmt::Display for Occurs {
    /// Content-model suffix notation: `?`, `*`, `+`, `[min,max]`, or
    /// nothing for exactly once.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (1, Some(1)) => Ok(()),
            (0, Some(1)) => write!(f, "?"),
            (0, None) => write!(f, "*"),
            (1, None) => write!(f, "+"),
            (min, None) => write!(f, "[{},*]", min),
            (min, Some(max)) => write!(f, "[{},{}]", min, max),
        }
    }
}

/// Parse minOccurs/maxOccurs from XML attribute values
pub fn parse_occurs(min_occurs: Option<&str>, max_occurs: Option<&str>) -> Result<Occurs> {
    let mut occurs = Occurs::once();

    if let Some(min_str) = min_occurs {
        occurs.min = min_str.trim().parse::<u32>().map_err(|_| {
            ParseError::new("minOccurs value is not a valid non-negative integer")
                .with_source(min_str)
        })?;
    }

    match max_occurs.map(str::trim) {
        Some("unbounded") => occurs.max = None,
        Some(max_str) => {
            let max = max_str.parse::<u32>().map_err(|_| {
                ParseError::new("maxOccurs value must be a non-negative integer or 'unbounded'")
                    .with_source(max_str)
            })?;
            if occurs.min > max {
                return Err(ParseError::new(
                    "maxOccurs must be 'unbounded' or greater than minOccurs",
                )
                .into());
            }
            occurs.max = Some(max);
        }
        None => {
            // Default maxOccurs is 1, but must be >= minOccurs
            if occurs.min > 1 {
                return Err(
                    ParseError::new("minOccurs must be lesser or equal than maxOccurs").into(),
                );
            }
        }
    }

    Ok(occurs)
}
