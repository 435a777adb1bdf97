//! XSD built-in types
//!
//! The built-in simple types are registered in every schema model with
//! their base chain and intrinsic facets (integer bounds, fractionDigits
//! of the integer family, built-in list types), so facet lookups on
//! user types derived from them see the inherited constraints.

use crate::namespaces::QName;

use super::complex_types::{ComplexType, ContentType};
use super::facets::{Facet, FacetKind};
use super::groups::{Particle, Term};
use super::particles::Occurs;
use super::simple_types::{SimpleType, SimpleVariety};
use super::types::TypeRef;
use super::wildcards::{NamespaceConstraint, Wildcard};

/// XSD anyType type name
pub const XSD_ANY_TYPE: &str = "anyType";
/// XSD anySimpleType type name
pub const XSD_ANY_SIMPLE_TYPE: &str = "anySimpleType";

/// Static description of a built-in simple type
#[derive(Debug)]
pub struct BuiltinType {
    /// Local name in the XSD namespace
    pub name: &'static str,
    /// Base type local name
    pub base: Option<&'static str>,
    /// Item type local name for built-in list types
    pub item: Option<&'static str>,
    /// Intrinsic facets
    pub facets: &'static [(FacetKind, &'static str)],
}

const fn builtin(name: &'static str, base: &'static str) -> BuiltinType {
    BuiltinType {
        name,
        base: Some(base),
        item: None,
        facets: &[],
    }
}

const fn bounded(
    name: &'static str,
    base: &'static str,
    facets: &'static [(FacetKind, &'static str)],
) -> BuiltinType {
    BuiltinType {
        name,
        base: Some(base),
        item: None,
        facets,
    }
}

const fn list(name: &'static str, item: &'static str) -> BuiltinType {
    BuiltinType {
        name,
        base: Some(XSD_ANY_SIMPLE_TYPE),
        item: Some(item),
        facets: &[],
    }
}

use FacetKind::{FractionDigits, MaxInclusive, MinInclusive};

/// Registry of all built-in XSD simple types
pub static BUILTIN_TYPES: &[BuiltinType] = &[
    BuiltinType {
        name: XSD_ANY_SIMPLE_TYPE,
        base: None,
        item: None,
        facets: &[],
    },
    // String family
    builtin("string", XSD_ANY_SIMPLE_TYPE),
    builtin("normalizedString", "string"),
    builtin("token", "normalizedString"),
    builtin("language", "token"),
    builtin("Name", "token"),
    builtin("NMTOKEN", "token"),
    builtin("NCName", "Name"),
    builtin("ID", "NCName"),
    builtin("IDREF", "NCName"),
    builtin("ENTITY", "NCName"),
    list("NMTOKENS", "NMTOKEN"),
    list("IDREFS", "IDREF"),
    list("ENTITIES", "ENTITY"),
    // Other primitives
    builtin("boolean", XSD_ANY_SIMPLE_TYPE),
    builtin("decimal", XSD_ANY_SIMPLE_TYPE),
    builtin("float", XSD_ANY_SIMPLE_TYPE),
    builtin("double", XSD_ANY_SIMPLE_TYPE),
    builtin("duration", XSD_ANY_SIMPLE_TYPE),
    builtin("dateTime", XSD_ANY_SIMPLE_TYPE),
    builtin("time", XSD_ANY_SIMPLE_TYPE),
    builtin("date", XSD_ANY_SIMPLE_TYPE),
    builtin("gYearMonth", XSD_ANY_SIMPLE_TYPE),
    builtin("gYear", XSD_ANY_SIMPLE_TYPE),
    builtin("gMonthDay", XSD_ANY_SIMPLE_TYPE),
    builtin("gDay", XSD_ANY_SIMPLE_TYPE),
    builtin("gMonth", XSD_ANY_SIMPLE_TYPE),
    builtin("hexBinary", XSD_ANY_SIMPLE_TYPE),
    builtin("base64Binary", XSD_ANY_SIMPLE_TYPE),
    builtin("anyURI", XSD_ANY_SIMPLE_TYPE),
    builtin("QName", XSD_ANY_SIMPLE_TYPE),
    builtin("NOTATION", XSD_ANY_SIMPLE_TYPE),
    // Integer family
    bounded("integer", "decimal", &[(FractionDigits, "0")]),
    bounded("nonPositiveInteger", "integer", &[(MaxInclusive, "0")]),
    bounded("negativeInteger", "nonPositiveInteger", &[(MaxInclusive, "-1")]),
    bounded(
        "long",
        "integer",
        &[
            (MinInclusive, "-9223372036854775808"),
            (MaxInclusive, "9223372036854775807"),
        ],
    ),
    bounded(
        "int",
        "long",
        &[(MinInclusive, "-2147483648"), (MaxInclusive, "2147483647")],
    ),
    bounded("short", "int", &[(MinInclusive, "-32768"), (MaxInclusive, "32767")]),
    bounded("byte", "short", &[(MinInclusive, "-128"), (MaxInclusive, "127")]),
    bounded("nonNegativeInteger", "integer", &[(MinInclusive, "0")]),
    bounded(
        "unsignedLong",
        "nonNegativeInteger",
        &[(MaxInclusive, "18446744073709551615")],
    ),
    bounded("unsignedInt", "unsignedLong", &[(MaxInclusive, "4294967295")]),
    bounded("unsignedShort", "unsignedInt", &[(MaxInclusive, "65535")]),
    bounded("unsignedByte", "unsignedShort", &[(MaxInclusive, "255")]),
    bounded("positiveInteger", "nonNegativeInteger", &[(MinInclusive, "1")]),
];

/// Value-synthesis classification of a built-in ancestor type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    /// xs:boolean
    Boolean,
    /// decimal, float, double and the integer family
    Numeric,
    /// xs:date
    Date,
    /// xs:time
    Time,
    /// xs:dateTime
    DateTime,
    /// Anything else, synthesized as a string
    Other,
}

impl BuiltinKind {
    /// Classify a built-in type by its local name
    pub fn classify(local_name: &str) -> Self {
        match local_name {
            "boolean" => return Self::Boolean,
            "date" => return Self::Date,
            "time" => return Self::Time,
            "dateTime" => return Self::DateTime,
            _ => {}
        }
        let name = local_name.to_ascii_lowercase();
        let numeric = matches!(name.as_str(), "double" | "decimal" | "float")
            || ["integer", "int", "long", "short", "byte"]
                .iter()
                .any(|suffix| name.ends_with(suffix));
        if numeric {
            Self::Numeric
        } else {
            Self::Other
        }
    }
}

/// Look up a built-in type description by local name
pub fn get_builtin_type(name: &str) -> Option<&'static BuiltinType> {
    BUILTIN_TYPES.iter().find(|b| b.name == name)
}

impl BuiltinType {
    /// Materialize as a simple type definition in the XSD namespace
    pub fn to_simple_type(&self) -> SimpleType {
        let variety = match self.item {
            Some(item) => SimpleVariety::List(TypeRef::builtin(item)),
            None => SimpleVariety::Atomic,
        };
        let mut st = SimpleType {
            name: Some(QName::xsd(self.name)),
            base: self.base.map(TypeRef::builtin),
            variety,
            facets: Default::default(),
        };
        for (kind, value) in self.facets {
            let facet = match kind {
                FractionDigits => Facet::Count(*kind, 0),
                _ => Facet::Bound(*kind, (*value).to_string()),
            };
            st.facets.push(facet);
        }
        st
    }
}

/// `xs:anyType`: mixed content of any elements plus any attributes
pub fn any_type() -> ComplexType {
    let any = Wildcard::new(NamespaceConstraint::Any);
    ComplexType::new()
        .with_name(QName::xsd(XSD_ANY_TYPE))
        .with_content(ContentType::Mixed(Particle::new(
            Term::Any(any.clone().into()),
            Occurs::zero_or_more(),
        )))
        .with_attribute_wildcard(any)
}
