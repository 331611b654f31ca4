//! Weighted variant selection.
//!
//! Randomness comes in through [`RandomSource`] so a caller can pin the
//! draws; nothing here touches a process-wide generator.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::model::{TileEntry, VisualHandle};

pub trait RandomSource {
    /// Uniform draw from the closed interval `[0, upper]`. Only called
    /// with a finite, strictly positive `upper`.
    fn draw(&mut self, upper: f64) -> f64;
}

/// Adapter over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn draw(&mut self, upper: f64) -> f64 {
        self.0.random_range(0.0..=upper)
    }
}

/// Reproducible source for a given seed.
pub fn seeded(seed: u64) -> RngSource<StdRng> {
    RngSource(StdRng::seed_from_u64(seed))
}

pub fn thread() -> RngSource<ThreadRng> {
    RngSource(rand::rng())
}

/// Pick one variant of `entry` by cumulative weight.
///
/// Only variants with a resolved handle and positive weight take part.
/// `r` is drawn from `[0, total]` and the first variant whose running
/// sum reaches `r` wins, so an exact hit on a threshold goes to the lower
/// index. With no usable weight we fall back to the first variant's
/// handle, which may itself be `None`.
pub fn pick<'a>(entry: &'a TileEntry, rng: &mut dyn RandomSource) -> Option<&'a VisualHandle> {
    let eligible = || entry.variants.iter().filter(|v| v.is_eligible());
    let total: f64 = eligible().map(|v| v.weight).sum();

    if !(total > 0.0 && total.is_finite()) {
        warn!(tile = %entry.id, total, "no selectable variant weight, using first variant");
        return entry.variants.first().and_then(|v| v.handle.as_ref());
    }

    let r = rng.draw(total);
    let mut cumulative = 0.0;
    let mut last = None;
    for variant in eligible() {
        cumulative += variant.weight;
        last = variant.handle.as_ref();
        if r <= cumulative {
            return last;
        }
    }
    // rounding can leave `cumulative` a hair under `total`
    last
}
