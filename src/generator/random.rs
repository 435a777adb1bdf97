//! Seeded random source
//!
//! Every random decision taken during generation goes through a
//! `RandomSource`, so a run is fully determined by the seed and the order in
//! which draws are made.
//!
//! Ranged draws map a uniform `u` in `[0, 1)` onto `min + u * (max - min)`.
//! Integer targets round that value half away from zero, which gives both
//! endpoints half the weight of the inner values.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::policy::TriState;

/// A numeric type that can be drawn from an inclusive range
pub trait RandomRange: Copy + PartialOrd {
    /// Map `unit` in `[0, 1)` onto `[min, max]`
    fn scale(min: Self, max: Self, unit: f64) -> Self;
}

impl RandomRange for f64 {
    fn scale(min: f64, max: f64, unit: f64) -> f64 {
        let value = min + unit * (max - min);
        if value.is_finite() {
            value
        } else {
            // max - min overflowed
            min * (1.0 - unit) + max * unit
        }
    }
}

impl RandomRange for f32 {
    fn scale(min: f32, max: f32, unit: f64) -> f32 {
        f64::scale(min as f64, max as f64, unit) as f32
    }
}

macro_rules! impl_integer_range {
    ($($ty:ty),*) => {
        $(
            impl RandomRange for $ty {
                fn scale(min: $ty, max: $ty, unit: f64) -> $ty {
                    let value = f64::scale(min as f64, max as f64, unit).round();
                    (value as $ty).clamp(min, max)
                }
            }
        )*
    };
}

impl_integer_range!(i64, i32, i16, i8, u64, u32);

/// Pseudo-random source backing one generation run
#[derive(Debug, Clone)]
pub struct RandomSource<R = StdRng> {
    rng: R,
}

impl RandomSource<StdRng> {
    /// Create a source from a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> RandomSource<R> {
    /// Wrap an existing generator
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform draw in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draw from the inclusive range `[min, max]`.
    ///
    /// Reversed bounds are swapped.
    pub fn range<T: RandomRange>(&mut self, min: T, max: T) -> T {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        let unit = self.unit();
        T::scale(min, max, unit)
    }

    /// Fair coin
    pub fn boolean(&mut self) -> bool {
        self.unit() < 0.5
    }

    /// Resolve a tri-state flag, flipping a coin when it is unset
    pub fn tri_state(&mut self, flag: TriState) -> bool {
        match flag {
            TriState::Always => true,
            TriState::Never => false,
            TriState::Random => self.boolean(),
        }
    }

    /// Uniform index into a collection of `len` items; `len` must be positive
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.gen_range(0..len.max(1))
    }

    /// Uniform pick from a slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.index(items.len());
        items.get(index)
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
