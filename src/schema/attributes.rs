//! XSD attribute declarations, attribute uses and attribute groups

use crate::error::{ParseError, Result};
use crate::namespaces::QName;
use std::sync::Arc;

use super::types::TypeRef;
use super::wildcards::Wildcard;

/// Attribute use mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UseMode {
    /// Attribute is optional (default)
    #[default]
    Optional,
    /// Attribute is required
    Required,
    /// Attribute is prohibited
    Prohibited,
}

impl UseMode {
    /// Parse from string value
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "optional" => Ok(UseMode::Optional),
            "required" => Ok(UseMode::Required),
            "prohibited" => Ok(UseMode::Prohibited),
            _ => Err(ParseError::new(format!(
                "Invalid attribute use value: '{}'. Must be 'optional', 'required', or 'prohibited'",
                s
            ))
            .into()),
        }
    }

    /// Get the use as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            UseMode::Optional => "optional",
            UseMode::Required => "required",
            UseMode::Prohibited => "prohibited",
        }
    }
}

impl std::fmt::Display for UseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value constraint of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueConstraint {
    /// No constraint
    #[default]
    None,
    /// `fixed="..."`
    Fixed(String),
    /// `default="..."`
    Default(String),
}

impl ValueConstraint {
    /// Build from the `fixed` and `default` attributes of a declaration
    pub fn from_attrs(fixed: Option<&str>, default: Option<&str>) -> Result<Self> {
        match (fixed, default) {
            (Some(_), Some(_)) => Err(ParseError::new(
                "'default' and 'fixed' attributes are mutually exclusive",
            )
            .into()),
            (Some(value), None) => Ok(Self::Fixed(value.to_string())),
            (None, Some(value)) => Ok(Self::Default(value.to_string())),
            (None, None) => Ok(Self::None),
        }
    }

    /// Check if a constraint is present
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// XSD attribute declaration
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute name
    pub name: QName,
    /// Simple type of the attribute
    pub type_ref: TypeRef,
    /// Constraint declared on the declaration itself
    pub constraint: ValueConstraint,
}

impl AttributeDecl {
    /// Create an attribute declaration of type `xs:anySimpleType`
    pub fn new(name: QName) -> Self {
        Self {
            name,
            type_ref: TypeRef::builtin("anySimpleType"),
            constraint: ValueConstraint::None,
        }
    }

    /// Set the attribute type
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = type_ref;
        self
    }

    /// Set the value constraint
    pub fn with_constraint(mut self, constraint: ValueConstraint) -> Self {
        self.constraint = constraint;
        self
    }
}

/// Declaration behind an attribute use
#[derive(Debug, Clone)]
pub enum AttributeRef {
    /// `<xs:attribute ref="..."/>` to a global declaration
    Global(QName),
    /// Inline local declaration
    Local(Arc<AttributeDecl>),
}

impl AttributeRef {
    /// Name of the referenced attribute
    pub fn name(&self) -> &QName {
        match self {
            AttributeRef::Global(name) => name,
            AttributeRef::Local(decl) => &decl.name,
        }
    }
}

/// An attribute as used by a complex type or attribute group
#[derive(Debug, Clone)]
pub struct AttributeUse {
    /// Use mode
    pub mode: UseMode,
    /// Constraint declared on the use; overrides the declaration's
    pub constraint: ValueConstraint,
    /// Referenced declaration
    pub decl: AttributeRef,
}

impl AttributeUse {
    /// Optional use of a local declaration
    pub fn new(decl: AttributeDecl) -> Self {
        Self {
            mode: UseMode::Optional,
            constraint: ValueConstraint::None,
            decl: AttributeRef::Local(Arc::new(decl)),
        }
    }

    /// Optional use of a global declaration
    pub fn reference(name: QName) -> Self {
        Self {
            mode: UseMode::Optional,
            constraint: ValueConstraint::None,
            decl: AttributeRef::Global(name),
        }
    }

    /// Set the use mode
    pub fn with_mode(mut self, mode: UseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the use-level value constraint
    pub fn with_constraint(mut self, constraint: ValueConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Check if the attribute is required
    pub fn is_required(&self) -> bool {
        self.mode == UseMode::Required
    }

    /// Name of the attribute
    pub fn name(&self) -> &QName {
        self.decl.name()
    }
}

/// Entry in an attribute list: a use or an attribute group reference
#[derive(Debug, Clone)]
pub enum AttributeItem {
    /// Attribute use
    Use(AttributeUse),
    /// `<xs:attributeGroup ref="..."/>`
    GroupRef(QName),
}

/// XSD attribute group
#[derive(Debug, Clone, Default)]
pub struct AttributeGroup {
    /// Group name
    pub name: Option<QName>,
    /// Attribute uses and nested group references, in declaration order
    pub items: Vec<AttributeItem>,
    /// `xs:anyAttribute` of the group
    pub wildcard: Option<Arc<Wildcard>>,
}

impl AttributeGroup {
    /// Create a named attribute group
    pub fn new(name: QName) -> Self {
        Self {
            name: Some(name),
            ..Default::default()
        }
    }

    /// Add an attribute use
    pub fn with_use(mut self, attribute: AttributeUse) -> Self {
        self.items.push(AttributeItem::Use(attribute));
        self
    }

    /// Add a reference to another attribute group
    pub fn with_group_ref(mut self, name: QName) -> Self {
        self.items.push(AttributeItem::GroupRef(name));
        self
    }

    /// Set the attribute wildcard
    pub fn with_wildcard(mut self, wildcard: Wildcard) -> Self {
        self.wildcard = Some(Arc::new(wildcard));
        self
    }
}
