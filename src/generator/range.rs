//! Repeat-count resolution
//!
//! Intersects a declared occurrence range with the policy bounds. Disjoint
//! ranges fall back to the declared range so the result stays valid
//! against the schema.

use rand::Rng;

use super::policy::GenerationPolicy;
use super::random::RandomSource;
use crate::schema::Occurs;

/// Resolve a count from the declared range `[min, max]` (`None` is
/// unbounded) and the policy range `[policy_min, policy_max]`
pub fn resolve_range<R: Rng>(
    min: u32,
    max: Option<u32>,
    policy_min: u32,
    policy_max: u32,
    random: &mut RandomSource<R>,
) -> u32 {
    let max = max.unwrap_or_else(|| min.max(policy_max));

    let (low, high) = if policy_max < min || policy_min > max {
        (min, max)
    } else {
        (min.max(policy_min), max.min(policy_max))
    };

    if low == high {
        low
    } else {
        random.range(low, high)
    }
}

/// Number of times a particle's term is visited.
///
/// A plain optional particle (`0..1`) is decided by the optional-elements
/// flag alone.
pub fn resolve_repeat_count<R: Rng>(
    occurs: &Occurs,
    policy: &GenerationPolicy,
    random: &mut RandomSource<R>,
) -> u32 {
    if occurs.min == 0 && occurs.max == Some(1) {
        return u32::from(random.tri_state(policy.optional_elements));
    }
    resolve_range(
        occurs.min,
        occurs.max,
        policy.min_elements,
        policy.max_elements,
        random,
    )
}

/// Number of items in a list value, from its length facets and the policy
/// list bounds. A `length` facet fixes the count.
pub fn resolve_list_length<R: Rng>(
    length: Option<u32>,
    min_length: Option<u32>,
    max_length: Option<u32>,
    policy: &GenerationPolicy,
    random: &mut RandomSource<R>,
) -> u32 {
    if let Some(length) = length {
        return length;
    }
    resolve_range(
        min_length.unwrap_or(0),
        max_length,
        policy.min_list_items,
        policy.max_list_items,
        random,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::policy::TriState;
    use proptest::prelude::*;

    #[test]
    fn test_unbounded_with_fixed_policy() {
        let policy = GenerationPolicy::new().with_element_bounds(2, 2);
        let mut random = RandomSource::seeded(0);
        for _ in 0..50 {
            assert_eq!(resolve_repeat_count(&Occurs::zero_or_more(), &policy, &mut random), 2);
        }
    }

    #[test]
    fn test_optional_follows_flag() {
        let mut random = RandomSource::seeded(0);
        let never = GenerationPolicy::new().with_optional_elements(false);
        let always = GenerationPolicy::new()
            .with_optional_elements(TriState::Always)
            .with_element_bounds(5, 9);
        for _ in 0..20 {
            assert_eq!(resolve_repeat_count(&Occurs::optional(), &never, &mut random), 0);
            assert_eq!(resolve_repeat_count(&Occurs::optional(), &always, &mut random), 1);
        }
    }

    #[test]
    fn test_disjoint_falls_back_to_declared() {
        let mut random = RandomSource::seeded(5);
        // policy above the declared range
        for _ in 0..50 {
            let count = resolve_range(2, Some(3), 7, 9, &mut random);
            assert!((2..=3).contains(&count));
        }
        // policy below the declared range
        assert_eq!(resolve_range(6, Some(6), 1, 4, &mut random), 6);
    }

    #[test]
    fn test_unbounded_max_uses_declared_min_when_larger() {
        let mut random = RandomSource::seeded(5);
        assert_eq!(resolve_range(8, None, 1, 4, &mut random), 8);
    }

    #[test]
    fn test_list_length_fixed() {
        let policy = GenerationPolicy::new().with_list_bounds(1, 2);
        let mut random = RandomSource::seeded(5);
        assert_eq!(resolve_list_length(Some(6), None, None, &policy, &mut random), 6);
        for _ in 0..20 {
            let n = resolve_list_length(None, Some(2), Some(5), &policy, &mut random);
            assert_eq!(n, 2);
        }
    }

    proptest! {
        #[test]
        fn prop_count_within_bounds(
            min in 0u32..6,
            extra in proptest::option::of(0u32..6),
            policy_min in 0u32..6,
            policy_span in 0u32..6,
            seed in any::<u64>(),
        ) {
            let max = extra.map(|e| min + e);
            let policy_max = policy_min + policy_span;
            let mut random = RandomSource::seeded(seed);
            let count = resolve_range(min, max, policy_min, policy_max, &mut random);

            let declared_max = max.unwrap_or_else(|| min.max(policy_max));
            if policy_max < min || policy_min > declared_max {
                prop_assert!(count >= min && count <= declared_max);
            } else {
                prop_assert!(count >= min.max(policy_min));
                prop_assert!(count <= declared_max.min(policy_max));
            }
        }
    }
}
