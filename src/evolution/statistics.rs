//! # Statistics
//!
//! Run statistics kept by the driver: the generation counter, the best genome
//! seen so far, a per-generation score history and operator counters. Only
//! the driver updates them, at the end of initialization and of each
//! generation.

use std::ops::AddAssign;

use crate::genome::ListGenome;

use super::population::Population;

/// Scores of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best: f64,
    pub average: f64,
    pub worst: f64,
    /// Best-ever score as of the end of this generation.
    pub best_ever: f64,
}

/// How often each operator ran.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorCounters {
    pub selections: usize,
    pub crossovers: usize,
    pub mutations: usize,
    pub evaluations: usize,
}

impl AddAssign for OperatorCounters {
    fn add_assign(&mut self, other: Self) {
        self.selections += other.selections;
        self.crossovers += other.crossovers;
        self.mutations += other.mutations;
        self.evaluations += other.evaluations;
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Statistics<T> {
    generation: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    best_ever: Option<ListGenome<T>>,
    best_ever_score: Option<f64>,
    history: Vec<GenerationRecord>,
    counters: OperatorCounters,
}

impl<T> Statistics<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            best_ever: None,
            best_ever_score: None,
            history: Vec::new(),
            counters: OperatorCounters::default(),
        }
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Deep copy of the best genome seen so far.
    pub fn best_ever(&self) -> Option<&ListGenome<T>> {
        self.best_ever.as_ref()
    }

    pub fn best_ever_score(&self) -> Option<f64> {
        self.best_ever_score
    }

    /// Record of the latest generation.
    pub fn current(&self) -> Option<&GenerationRecord> {
        self.history.last()
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    pub fn counters(&self) -> &OperatorCounters {
        &self.counters
    }

    pub(crate) fn counters_mut(&mut self) -> &mut OperatorCounters {
        &mut self.counters
    }

    /// Whether the best-ever score gained no more than `ratio`, relative to
    /// its earlier magnitude, over the last `window` generations.
    pub fn has_converged(&self, window: usize, ratio: f64) -> bool {
        if window == 0 || self.history.len() <= window {
            return false;
        }
        let latest = self.history[self.history.len() - 1].best_ever;
        let earlier = self.history[self.history.len() - 1 - window].best_ever;
        latest - earlier <= ratio * earlier.abs()
    }
}

impl<T: Clone> Statistics<T> {
    /// Records the scores of `population` as generation `generation`.
    ///
    /// The best-ever genome is replaced only on strict improvement. Returns
    /// `true` when it was replaced.
    pub(crate) fn record(&mut self, generation: usize, population: &Population<T>) -> bool {
        self.generation = generation;

        let (Some(best), Some(worst), Some(average)) =
            (population.best(), population.worst(), population.average())
        else {
            return false;
        };
        let best_score = best.fitness().unwrap_or(f64::NEG_INFINITY);
        let worst_score = worst.fitness().unwrap_or(f64::NEG_INFINITY);

        let improved = match self.best_ever_score {
            Some(score) => best_score > score,
            None => true,
        };
        if improved {
            self.best_ever = Some(best.clone());
            self.best_ever_score = Some(best_score);
        }

        self.history.push(GenerationRecord {
            generation,
            best: best_score,
            average,
            worst: worst_score,
            best_ever: self.best_ever_score.unwrap_or(best_score),
        });
        improved
    }
}

impl<T> Default for Statistics<T> {
    fn default() -> Self {
        Self::new()
    }
}
