//! Leaf value synthesis
//!
//! Produces the text of a simple-typed element, attribute or list item.
//! Dispatch order:
//!
//! 1. enumeration facet: uniform pick among the declared values
//! 2. list variety: item count from the length facets, then items
//! 3. union variety: uniform member, recursively
//! 4. built-in ancestor: boolean, numeric range, date, time, dateTime
//! 5. anything else: the hint with a per-hint counter (`name1`, `name2`, ...)
//!
//! Numeric values honour the bound and digit facets. Digit facets truncate
//! the drawn value rather than clamp it, so a truncated value can fall
//! outside a declared bound.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rand::Rng;
use tracing::trace;

use super::policy::GenerationPolicy;
use super::random::RandomSource;
use super::range::resolve_list_length;
use crate::error::{Error, Result};
use crate::schema::{BuiltinKind, Facet, FacetKind, SchemaModel, SimpleType, SimpleVariety};

/// Deepest list/union nesting followed before the type is reported as
/// circular
const MAX_NESTING: usize = 32;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Per-run usage counters for fallback values, keyed by hint
#[derive(Debug, Clone, Default)]
pub struct NameUsageCounters {
    counters: HashMap<String, u32>,
}

impl NameUsageCounters {
    /// Create empty counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the counter for a hint, starting at 1
    pub fn next(&mut self, hint: &str) -> u32 {
        let counter = self.counters.entry(hint.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Current counter for a hint, 0 when unused
    pub fn get(&self, hint: &str) -> u32 {
        self.counters.get(hint).copied().unwrap_or(0)
    }
}

/// Synthesizes text values for simple types
#[derive(Debug)]
pub struct LeafValueSynthesizer<'a> {
    schema: &'a SchemaModel,
    policy: &'a GenerationPolicy,
    counters: NameUsageCounters,
}

impl<'a> LeafValueSynthesizer<'a> {
    /// Create a synthesizer with fresh counters
    pub fn new(schema: &'a SchemaModel, policy: &'a GenerationPolicy) -> Self {
        Self {
            schema,
            policy,
            counters: NameUsageCounters::new(),
        }
    }

    /// Usage counters of this run
    pub fn counters(&self) -> &NameUsageCounters {
        &self.counters
    }

    /// Synthesize a value for `simple_type`. The hint is the local name of
    /// the element or attribute being filled.
    pub fn synthesize<R: Rng>(
        &mut self,
        simple_type: &Arc<SimpleType>,
        hint: &str,
        random: &mut RandomSource<R>,
    ) -> Result<String> {
        let value = self.synthesize_at(simple_type, hint, random, 0)?;
        trace!(hint, value = %value, "synthesized leaf value");
        Ok(value)
    }

    fn synthesize_at<R: Rng>(
        &mut self,
        simple_type: &Arc<SimpleType>,
        hint: &str,
        random: &mut RandomSource<R>,
        depth: usize,
    ) -> Result<String> {
        if depth > MAX_NESTING {
            return Err(Error::SchemaShape(format!(
                "list or union nesting too deep while generating '{}'",
                hint
            )));
        }

        if let Some(values) = self.schema.enumeration(simple_type)? {
            return Ok(pick_value(&values, random));
        }

        match self.schema.variety(simple_type)? {
            SimpleVariety::List(item_ref) => {
                let item_type = self.schema.resolve_simple_type(&item_ref)?;
                self.list_value(simple_type, &item_type, hint, random, depth)
            }
            SimpleVariety::Union(members) if !members.is_empty() => {
                let index = random.index(members.len());
                let member = self.schema.resolve_simple_type(&members[index])?;
                self.synthesize_at(&member, hint, random, depth + 1)
            }
            _ => self.atomic_value(simple_type, hint, random),
        }
    }

    fn list_value<R: Rng>(
        &mut self,
        list_type: &Arc<SimpleType>,
        item_type: &Arc<SimpleType>,
        hint: &str,
        random: &mut RandomSource<R>,
        depth: usize,
    ) -> Result<String> {
        let count = resolve_list_length(
            self.schema.count_facet(list_type, FacetKind::Length)?,
            self.schema.count_facet(list_type, FacetKind::MinLength)?,
            self.schema.count_facet(list_type, FacetKind::MaxLength)?,
            self.policy,
            random,
        ) as usize;

        if let Some(values) = self.schema.enumeration(item_type)? {
            // every value is used once before any repeats
            let mut pool = values;
            while pool.len() < count {
                pool.extend_from_within(..);
            }
            random.shuffle(&mut pool);
            pool.truncate(count);
            return Ok(pool.join(" "));
        }

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.synthesize_at(item_type, hint, random, depth + 1)?);
        }
        Ok(items.join(" "))
    }

    fn atomic_value<R: Rng>(
        &mut self,
        simple_type: &Arc<SimpleType>,
        hint: &str,
        random: &mut RandomSource<R>,
    ) -> Result<String> {
        let builtin = self.schema.builtin_ancestor(simple_type)?;
        let builtin_name = builtin
            .name
            .as_ref()
            .map(|name| name.local_name.as_str())
            .unwrap_or_default();

        match BuiltinKind::classify(builtin_name) {
            BuiltinKind::Boolean => Ok(if random.boolean() { "true" } else { "false" }.to_string()),
            BuiltinKind::Numeric => {
                let range = NumericRange::from_type(self.schema, simple_type)?;
                if builtin_name == "float" {
                    Ok(range.random_float(random))
                } else {
                    Ok(range.random_number(random))
                }
            }
            BuiltinKind::Date => Ok(self.now().format(DATE_FORMAT).to_string()),
            BuiltinKind::Time => Ok(self.now().format(TIME_FORMAT).to_string()),
            BuiltinKind::DateTime => {
                let now = self.now();
                Ok(format!(
                    "{}T{}",
                    now.format(DATE_FORMAT),
                    now.format(TIME_FORMAT)
                ))
            }
            BuiltinKind::Other => {
                let min_length = self.schema.count_facet(simple_type, FacetKind::MinLength)?;
                let max_length = self.schema.count_facet(simple_type, FacetKind::MaxLength)?;
                let counter = self.counters.next(hint);
                Ok(hinted_value(hint, counter, min_length, max_length))
            }
        }
    }

    fn now(&self) -> NaiveDateTime {
        self.policy
            .fixed_now
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

fn pick_value<R: Rng>(values: &[String], random: &mut RandomSource<R>) -> String {
    random.pick(values).cloned().unwrap_or_default()
}

/// Render `hint` followed by `counter`, padded with `_` up to `min_length`
/// and cut down to `max_length`. When the hint alone does not fit, the
/// counter is dropped.
pub fn hinted_value(
    hint: &str,
    counter: u32,
    min_length: Option<u32>,
    max_length: Option<u32>,
) -> String {
    let mut hint: String = hint.to_string();
    let mut suffix = counter.to_string();

    if let Some(min_length) = min_length {
        let current = hint.chars().count() + suffix.len();
        let missing = (min_length as usize).saturating_sub(current);
        hint.extend(std::iter::repeat('_').take(missing));
    }

    if let Some(max_length) = max_length {
        let max_length = max_length as usize;
        let hint_length = hint.chars().count();
        let excess = (hint_length + suffix.len()).saturating_sub(max_length);
        if excess > 0 {
            if hint_length > excess {
                hint = hint.chars().take(hint_length - excess).collect();
            } else {
                hint = hint.chars().take(max_length).collect();
                suffix.clear();
            }
        }
    }

    hint + &suffix
}

/// Numeric bounds and digit constraints of a simple type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericRange {
    /// Lower bound and whether it is exclusive
    pub min: Option<(f64, bool)>,
    /// Upper bound and whether it is exclusive
    pub max: Option<(f64, bool)>,
    /// `totalDigits`, applied to the integer part
    pub total_digits: Option<u32>,
    /// `fractionDigits`
    pub fraction_digits: Option<u32>,
}

impl NumericRange {
    /// Collect the effective numeric facets of a type.
    ///
    /// For each side the nearest bound along the base chain wins, whether it
    /// is inclusive or exclusive.
    pub fn from_type(schema: &SchemaModel, simple_type: &Arc<SimpleType>) -> Result<Self> {
        let chain = schema.base_chain(simple_type)?;
        let nearest = |inclusive: FacetKind, exclusive: FacetKind| -> Result<Option<(f64, bool)>> {
            for st in &chain {
                for (kind, is_exclusive) in [(exclusive, true), (inclusive, false)] {
                    if let Some(Facet::Bound(_, value)) = st.facets.get(kind) {
                        return parse_bound(kind, value).map(|v| Some((v, is_exclusive)));
                    }
                }
            }
            Ok(None)
        };

        Ok(Self {
            min: nearest(FacetKind::MinInclusive, FacetKind::MinExclusive)?,
            max: nearest(FacetKind::MaxInclusive, FacetKind::MaxExclusive)?,
            total_digits: schema.count_facet(simple_type, FacetKind::TotalDigits)?,
            fraction_digits: schema.count_facet(simple_type, FacetKind::FractionDigits)?,
        })
    }

    /// Draw a value: an integer when `fractionDigits` is 0, a real
    /// otherwise. Exclusive bounds are moved inwards by one.
    pub fn random_number<R: Rng>(&self, random: &mut RandomSource<R>) -> String {
        if self.fraction_digits == Some(0) {
            let min = match self.min {
                Some((value, true)) => (value as i64).saturating_add(1),
                Some((value, false)) => value as i64,
                None => i64::MIN,
            };
            let max = match self.max {
                Some((value, true)) => (value as i64).saturating_sub(1),
                Some((value, false)) => value as i64,
                None => i64::MAX,
            };
            self.apply_digits(&random.range(min, max).to_string())
        } else {
            let value = random.range(
                self.real_min(f64::from_bits(1)),
                self.real_max(f64::MAX),
            );
            self.apply_digits(&value.to_string())
        }
    }

    /// Draw a single-precision real
    pub fn random_float<R: Rng>(&self, random: &mut RandomSource<R>) -> String {
        if self.fraction_digits == Some(0) {
            return self.random_number(random);
        }
        let min = self.real_min(f32::from_bits(1) as f64) as f32;
        let max = self.real_max(f32::MAX as f64) as f32;
        self.apply_digits(&random.range(min, max).to_string())
    }

    fn real_min(&self, default: f64) -> f64 {
        match self.min {
            Some((value, true)) => value + 1.0,
            Some((value, false)) => value,
            None => default,
        }
    }

    fn real_max(&self, default: f64) -> f64 {
        match self.max {
            Some((value, true)) => value - 1.0,
            Some((value, false)) => value,
            None => default,
        }
    }

    /// Truncate the integer part to `totalDigits` leading digits and the
    /// fraction to `fractionDigits` digits. The sign is kept.
    pub fn apply_digits(&self, text: &str) -> String {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (mut number, mut fraction) = match unsigned.split_once('.') {
            Some((number, fraction)) => (number, fraction),
            None => (unsigned, ""),
        };

        if let Some(total) = self.total_digits {
            number = &number[..number.len().min(total as usize)];
        }
        if let Some(digits) = self.fraction_digits {
            fraction = &fraction[..fraction.len().min(digits as usize)];
        }

        let mut out = String::with_capacity(text.len());
        if negative {
            out.push('-');
        }
        out.push_str(number);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

fn parse_bound(kind: FacetKind, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        Error::SchemaShape(format!(
            "invalid {} facet value '{}'",
            kind.as_str(),
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::QName;
    use crate::schema::TypeRef;
    use chrono::NaiveDate;

    fn restricted(base: &str, facets: Vec<Facet>) -> Arc<SimpleType> {
        let mut st = SimpleType::restriction(TypeRef::builtin(base));
        for facet in facets {
            st = st.with_facet(facet);
        }
        Arc::new(st)
    }

    fn builtin(schema: &SchemaModel, name: &str) -> Arc<SimpleType> {
        schema.resolve_simple_type(&TypeRef::builtin(name)).unwrap()
    }

    #[test]
    fn test_hint_counters() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(1);
        let string = builtin(&schema, "string");

        let values: Vec<_> = (0..3)
            .map(|_| synthesizer.synthesize(&string, "name", &mut random).unwrap())
            .collect();
        assert_eq!(values, vec!["name1", "name2", "name3"]);
        assert_eq!(synthesizer.synthesize(&string, "other", &mut random).unwrap(), "other1");
        assert_eq!(synthesizer.counters().get("name"), 3);
    }

    #[test]
    fn test_hinted_value_length_facets() {
        assert_eq!(hinted_value("id", 1, Some(6), None), "id___1");
        assert_eq!(hinted_value("description", 12, None, Some(8)), "descri12");
        assert_eq!(hinted_value("ab", 1000, None, Some(3)), "ab");
        assert_eq!(hinted_value("code", 3, Some(2), Some(10)), "code3");
    }

    #[test]
    fn test_enumeration_wins() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(2);
        let colours = restricted(
            "int",
            vec![Facet::Enumeration(vec!["1".into(), "2".into(), "3".into()])],
        );
        for _ in 0..30 {
            let value = synthesizer.synthesize(&colours, "c", &mut random).unwrap();
            assert!(["1", "2", "3"].contains(&value.as_str()));
        }
    }

    #[test]
    fn test_boolean_and_dates() {
        let schema = SchemaModel::new();
        let now = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        let policy = GenerationPolicy::new().with_fixed_now(now);
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(3);

        let flag = synthesizer
            .synthesize(&builtin(&schema, "boolean"), "flag", &mut random)
            .unwrap();
        assert!(flag == "true" || flag == "false");
        assert_eq!(
            synthesizer.synthesize(&builtin(&schema, "date"), "d", &mut random).unwrap(),
            "2024-03-07"
        );
        assert_eq!(
            synthesizer.synthesize(&builtin(&schema, "time"), "t", &mut random).unwrap(),
            "09:05:01"
        );
        assert_eq!(
            synthesizer
                .synthesize(&builtin(&schema, "dateTime"), "dt", &mut random)
                .unwrap(),
            "2024-03-07T09:05:01"
        );
    }

    #[test]
    fn test_integer_bounds() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(4);
        let percent = restricted(
            "integer",
            vec![
                Facet::Bound(FacetKind::MinExclusive, "0".into()),
                Facet::Bound(FacetKind::MaxInclusive, "100".into()),
            ],
        );
        for _ in 0..100 {
            let value: i64 = synthesizer
                .synthesize(&percent, "p", &mut random)
                .unwrap()
                .parse()
                .unwrap();
            assert!((1..=100).contains(&value));
        }

        let byte = builtin(&schema, "unsignedByte");
        for _ in 0..100 {
            let value: i64 = synthesizer.synthesize(&byte, "b", &mut random).unwrap().parse().unwrap();
            assert!((0..=255).contains(&value));
        }
    }

    #[test]
    fn test_nearest_bound_wins() {
        let mut schema = SchemaModel::new();
        schema
            .add_type(
                SimpleType::restriction(TypeRef::builtin("int"))
                    .with_name(QName::local("positive"))
                    .with_facet(Facet::Bound(FacetKind::MinExclusive, "0".into())),
            )
            .unwrap();
        let st = Arc::new(
            SimpleType::restriction(TypeRef::named(QName::local("positive")))
                .with_facet(Facet::Bound(FacetKind::MinInclusive, "10".into())),
        );
        let range = NumericRange::from_type(&schema, &st).unwrap();
        assert_eq!(range.min, Some((10.0, false)));
        assert_eq!(range.max, Some((2147483647.0, false)));
        assert_eq!(range.fraction_digits, Some(0));
    }

    #[test]
    fn test_apply_digits_truncates() {
        let range = NumericRange {
            total_digits: Some(3),
            fraction_digits: Some(2),
            ..Default::default()
        };
        assert_eq!(range.apply_digits("-123456.789"), "-123.78");
        assert_eq!(range.apply_digits("42"), "42");
        let range = NumericRange {
            fraction_digits: Some(0),
            ..Default::default()
        };
        assert_eq!(range.apply_digits("7.5"), "7");
    }

    #[test]
    fn test_decimal_digits() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(5);
        let price = restricted(
            "decimal",
            vec![
                Facet::Count(FacetKind::TotalDigits, 5),
                Facet::Count(FacetKind::FractionDigits, 2),
                Facet::Bound(FacetKind::MinInclusive, "0".into()),
                Facet::Bound(FacetKind::MaxInclusive, "500".into()),
            ],
        );
        for _ in 0..100 {
            let value = synthesizer.synthesize(&price, "price", &mut random).unwrap();
            let (number, fraction) = value.split_once('.').unwrap_or((value.as_str(), ""));
            assert!(number.trim_start_matches('-').len() <= 5, "{}", value);
            assert!(fraction.len() <= 2, "{}", value);
        }
    }

    #[test]
    fn test_list_with_length() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(6);
        let triple = Arc::new(
            SimpleType::list(TypeRef::builtin("int")).with_facet(Facet::Count(FacetKind::Length, 3)),
        );
        for _ in 0..20 {
            let value = synthesizer.synthesize(&triple, "xs", &mut random).unwrap();
            assert_eq!(value.split(' ').count(), 3);
        }
    }

    #[test]
    fn test_list_of_enumeration_covers_before_repeating() {
        let mut schema = SchemaModel::new();
        schema
            .add_type(
                SimpleType::restriction(TypeRef::builtin("string"))
                    .with_name(QName::local("size"))
                    .with_facet(Facet::Enumeration(vec!["S".into(), "M".into(), "L".into()])),
            )
            .unwrap();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(7);
        let sizes = Arc::new(
            SimpleType::list(TypeRef::named(QName::local("size")))
                .with_facet(Facet::Count(FacetKind::Length, 3)),
        );
        for _ in 0..20 {
            let value = synthesizer.synthesize(&sizes, "sizes", &mut random).unwrap();
            let mut items: Vec<_> = value.split(' ').collect();
            items.sort_unstable();
            assert_eq!(items, vec!["L", "M", "S"]);
        }
    }

    #[test]
    fn test_union_picks_member() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(8);
        let union = Arc::new(SimpleType::union(vec![
            TypeRef::builtin("boolean"),
            TypeRef::anonymous(SimpleType::restriction(TypeRef::builtin("string")).with_facet(
                Facet::Enumeration(vec!["unknown".into()]),
            )),
        ]));
        for _ in 0..20 {
            let value = synthesizer.synthesize(&union, "u", &mut random).unwrap();
            assert!(["true", "false", "unknown"].contains(&value.as_str()));
        }
    }

    #[test]
    fn test_bad_bound_is_schema_error() {
        let schema = SchemaModel::new();
        let policy = GenerationPolicy::new();
        let mut synthesizer = LeafValueSynthesizer::new(&schema, &policy);
        let mut random = RandomSource::seeded(9);
        let broken = restricted("int", vec![Facet::Bound(FacetKind::MaxInclusive, "ten".into())]);
        assert!(matches!(
            synthesizer.synthesize(&broken, "n", &mut random),
            Err(Error::SchemaShape(_))
        ));
    }
}
