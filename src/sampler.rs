//src/sampler.rs

use std::collections::VecDeque;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-read inclusion draws, uniform on `[0, 1)`.
pub trait DrawSource {
    fn draw(&mut self) -> f64;
}

/// Draws from any `rand` generator.
pub struct RandomDraws<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomDraws<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDraws<StdRng> {
    /// Reproducible draws for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> DrawSource for RandomDraws<R> {
    fn draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats the last one.
///
/// An empty script always draws 0.0, which includes every read everywhere.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedDraws {
    pub fn new<I: IntoIterator<Item = f64>>(draws: I) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            last: 0.0,
        }
    }
}

impl DrawSource for ScriptedDraws {
    fn draw(&mut self) -> f64 {
        if let Some(next) = self.draws.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// One read's inclusion decision across the whole sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct Inclusion {
    /// The single draw this read received.
    pub draw: f64,
    /// Indices of the samples that include the read.
    ///
    /// Always a suffix of the sample set: rates are sorted and the read is
    /// included at rate `r` iff `draw <= r`, so inclusion at one rate implies
    /// inclusion at every higher rate.
    pub samples: Range<usize>,
}

/// Decides, from one draw per read, which nested samples include it.
pub struct NestedSampler<D: DrawSource> {
    rates: Vec<f64>,
    source: D,
}

impl<D: DrawSource> NestedSampler<D> {
    /// `rates` must be sorted ascending.
    pub fn new(rates: Vec<f64>, source: D) -> Self {
        debug_assert!(rates.windows(2).all(|w| w[0] < w[1]));
        Self { rates, source }
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Draw once for the next read and resolve every rate against it.
    pub fn next_inclusion(&mut self) -> Inclusion {
        let draw = self.source.draw();
        Inclusion {
            draw,
            samples: self.included(draw),
        }
    }

    /// Samples whose rate is `>= draw`.
    pub fn included(&self, draw: f64) -> Range<usize> {
        let first = self.rates.partition_point(|&rate| rate < draw);
        first..self.rates.len()
    }
}
