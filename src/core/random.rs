//! Random draws shared by population generation, genetics and behaviors

use crate::core::types::{Position, Sex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform integer in `[min, max]` (inclusive). Swapped bounds are tolerated.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: u64, max: u64) -> u64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Uniform float in `[min, max]`. Empty or non-finite ranges yield `min`.
pub fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if !(max > min) || !min.is_finite() || !max.is_finite() {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniformly chosen element, `None` for an empty slice
pub fn select_random<'a, T, R: Rng + ?Sized>(rng: &mut R, options: &'a [T]) -> Option<&'a T> {
    options.choose(rng)
}

/// Uniform point in `[0, width) x [0, height)`
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Position {
    let x = if width > 0.0 { rng.gen_range(0.0..width) } else { 0.0 };
    let y = if height > 0.0 { rng.gen_range(0.0..height) } else { 0.0 };
    Position::new(x, y)
}

pub fn random_sex<R: Rng + ?Sized>(rng: &mut R) -> Sex {
    if rng.gen_bool(0.5) {
        Sex::Male
    } else {
        Sex::Female
    }
}
