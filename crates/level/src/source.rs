use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// Source of uniform randomness for level generation.
///
/// Every draw is a unit value in `[0, 1)`; the provided helpers map it onto
/// ranges and indices with floor semantics, so a scripted sequence of unit
/// values fully determines a generated level.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform float in `[low, high)`. The result stays strictly below `high`
    /// even after rounding to `f32`.
    fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        let u = self.next_unit();
        let v = (low as f64 + u * (high as f64 - low as f64)) as f32;
        if v >= high { next_below(high) } else { v.max(low) }
    }

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        let u = self.next_unit();
        ((u * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in the inclusive range `[low, high]`.
    fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        low + self.index(high.saturating_sub(low) + 1)
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

/// Largest `f32` strictly below `x`.
fn next_below(x: f32) -> f32 {
    if x > 0.0 {
        f32::from_bits(x.to_bits() - 1)
    } else if x == 0.0 {
        -f32::from_bits(1)
    } else {
        f32::from_bits(x.to_bits() + 1)
    }
}

/// Replays a fixed sequence of unit values.
///
/// Used to pin a generation down exactly, e.g. to check placement arithmetic.
///
/// # Panics
/// `next_unit` panics once the sequence is exhausted. The generator does not
/// intercept this.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            consumed: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let Some(v) = self.values.pop_front() else {
            panic!(
                "scripted random source exhausted after {} draws",
                self.consumed
            );
        };
        debug_assert!((0.0..1.0).contains(&v), "scripted value {v} outside [0, 1)");
        self.consumed += 1;
        v
    }
}
