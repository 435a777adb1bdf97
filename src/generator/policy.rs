//! Generation policy
//!
//! The policy bounds how many repetitions and list items are produced and
//! decides, per tri-state flag, whether optional parts of the schema are
//! emitted. It is a plain value: built in code, or read from a JSON file
//! whose keys match the field names in camelCase.

use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A boolean that may be left to chance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    /// Always true
    Always,
    /// Always false
    Never,
    /// Decided by a fair coin at each use
    #[default]
    Random,
}

impl TriState {
    /// Parse from `always`, `never` or `random`
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "always" | "true" => Some(Self::Always),
            "never" | "false" => Some(Self::Never),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    /// Get the flag as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
            Self::Random => "random",
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            Self::Always
        } else {
            Self::Never
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Random, Self::from)
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(Option<bool>),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(flag) => Ok(TriState::from(flag)),
            Repr::Name(name) => TriState::from_str(&name).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid tri-state '{}', expected always, never or random",
                    name
                ))
            }),
        }
    }
}

/// Configuration of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GenerationPolicy {
    /// Lower bound on element repetitions
    pub min_elements: u32,
    /// Upper bound on element repetitions
    pub max_elements: u32,
    /// Lower bound on list items
    pub min_list_items: u32,
    /// Upper bound on list items
    pub max_list_items: u32,
    /// Emit `minOccurs=0, maxOccurs=1` particles
    pub optional_elements: TriState,
    /// Emit optional attributes without a value constraint
    pub optional_attributes: TriState,
    /// Emit attributes with a fixed value
    pub fixed_attributes: TriState,
    /// Emit attributes with a default value
    pub default_attributes: TriState,
    /// Emit a skipped optional attribute with an empty value instead of
    /// leaving it out
    pub optional_attribute_as_empty_string: TriState,
    /// Visit every branch of a choice instead of at most `maxOccurs`
    pub exhaustive_choices: bool,
    /// Precede elements with a non-trivial content model by a comment
    /// describing it
    pub annotate_content_model: bool,
    /// Clock reading used for date and time values; the current local time
    /// when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_now: Option<NaiveDateTime>,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            min_elements: 1,
            max_elements: 4,
            min_list_items: 1,
            max_list_items: 4,
            optional_elements: TriState::Random,
            optional_attributes: TriState::Random,
            fixed_attributes: TriState::Random,
            default_attributes: TriState::Random,
            optional_attribute_as_empty_string: TriState::Never,
            exhaustive_choices: true,
            annotate_content_model: true,
            fixed_now: None,
        }
    }
}

impl GenerationPolicy {
    /// Create the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a policy from JSON text. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid policy: {}", e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Read a policy from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Check that each lower bound is at most its upper bound
    pub fn validate(&self) -> Result<()> {
        if self.min_elements > self.max_elements {
            return Err(Error::Config(format!(
                "minElements ({}) exceeds maxElements ({})",
                self.min_elements, self.max_elements
            )));
        }
        if self.min_list_items > self.max_list_items {
            return Err(Error::Config(format!(
                "minListItems ({}) exceeds maxListItems ({})",
                self.min_list_items, self.max_list_items
            )));
        }
        Ok(())
    }

    /// Set the element repetition bounds
    pub fn with_element_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_elements = min;
        self.max_elements = max;
        self
    }

    /// Set the list item bounds
    pub fn with_list_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_list_items = min;
        self.max_list_items = max;
        self
    }

    /// Set the optional element flag
    pub fn with_optional_elements(mut self, flag: impl Into<TriState>) -> Self {
        self.optional_elements = flag.into();
        self
    }

    /// Set the optional attribute flag
    pub fn with_optional_attributes(mut self, flag: impl Into<TriState>) -> Self {
        self.optional_attributes = flag.into();
        self
    }

    /// Set the fixed attribute flag
    pub fn with_fixed_attributes(mut self, flag: impl Into<TriState>) -> Self {
        self.fixed_attributes = flag.into();
        self
    }

    /// Set the default attribute flag
    pub fn with_default_attributes(mut self, flag: impl Into<TriState>) -> Self {
        self.default_attributes = flag.into();
        self
    }

    /// Set the empty-string flag for skipped optional attributes
    pub fn with_optional_attribute_as_empty_string(mut self, flag: impl Into<TriState>) -> Self {
        self.optional_attribute_as_empty_string = flag.into();
        self
    }

    /// Set exhaustive choice expansion
    pub fn with_exhaustive_choices(mut self, exhaustive: bool) -> Self {
        self.exhaustive_choices = exhaustive;
        self
    }

    /// Set content-model annotation
    pub fn with_content_model_annotation(mut self, annotate: bool) -> Self {
        self.annotate_content_model = annotate;
        self
    }

    /// Pin the clock used for date and time values
    pub fn with_fixed_now(mut self, now: NaiveDateTime) -> Self {
        self.fixed_now = Some(now);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = GenerationPolicy::default();
        assert_eq!((policy.min_elements, policy.max_elements), (1, 4));
        assert_eq!((policy.min_list_items, policy.max_list_items), (1, 4));
        assert_eq!(policy.optional_elements, TriState::Random);
        assert_eq!(policy.optional_attribute_as_empty_string, TriState::Never);
        assert!(policy.exhaustive_choices);
        assert!(policy.annotate_content_model);
        assert!(policy.fixed_now.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let policy = GenerationPolicy::from_json_str(
            r#"{"minElements": 2, "maxElements": 2, "optionalElements": false,
                "fixedAttributes": "always", "defaultAttributes": null}"#,
        )
        .unwrap();

        assert_eq!(policy.min_elements, 2);
        assert_eq!(policy.max_elements, 2);
        assert_eq!(policy.optional_elements, TriState::Never);
        assert_eq!(policy.fixed_attributes, TriState::Always);
        assert_eq!(policy.default_attributes, TriState::Random);
        assert_eq!(policy.max_list_items, 4);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            GenerationPolicy::from_json_str(r#"{"optionalElements": "sometimes"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GenerationPolicy::from_json_str(r#"{"maxElemnts": 3}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GenerationPolicy::from_json_str(r#"{"minElements": 5, "maxElements": 2}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_fixed_now_from_json() {
        let policy =
            GenerationPolicy::from_json_str(r#"{"fixedNow": "2024-02-29T13:05:09"}"#).unwrap();
        assert_eq!(
            policy.fixed_now.map(|now| now.to_string()),
            Some("2024-02-29 13:05:09".to_string())
        );
    }

    #[test]
    fn test_serialize_round_trip_names() {
        let policy = GenerationPolicy::new()
            .with_optional_attributes(true)
            .with_exhaustive_choices(false);
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["optionalAttributes"], "always");
        assert_eq!(json["exhaustiveChoices"], false);
        assert!(json.get("fixedNow").is_none());
    }

    #[test]
    fn test_tri_state_from_option() {
        assert_eq!(TriState::from(None), TriState::Random);
        assert_eq!(TriState::from(Some(true)), TriState::Always);
        assert_eq!(TriState::Never.to_string(), "never");
    }
}
