//! # Population
//!
//! The genomes alive in one generation. The driver rebuilds it every
//! generation; everything else only reads it.

use rayon::prelude::*;

use crate::{
    error::{GeneticError, Result},
    genome::ListGenome,
};

#[derive(Debug, Clone)]
pub struct Population<T> {
    genomes: Vec<ListGenome<T>>,
}

impl<T> Population<T> {
    pub fn new() -> Self {
        Self {
            genomes: Vec::new(),
        }
    }

    pub fn from_genomes(genomes: Vec<ListGenome<T>>) -> Self {
        Self { genomes }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ListGenome<T>> {
        self.genomes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListGenome<T>> {
        self.genomes.iter()
    }

    pub fn genomes(&self) -> &[ListGenome<T>] {
        &self.genomes
    }

    pub fn into_genomes(self) -> Vec<ListGenome<T>> {
        self.genomes
    }

    /// Cached scores in population order.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Evolution` if some genome is not evaluated.
    pub fn fitness(&self) -> Result<Vec<f64>> {
        self.genomes
            .iter()
            .enumerate()
            .map(|(i, genome)| {
                genome.fitness().ok_or_else(|| {
                    GeneticError::Evolution(format!("Individual {} has not been evaluated", i))
                })
            })
            .collect()
    }

    /// Indices ordered from the fittest to the least fit. Unevaluated genomes
    /// sort last.
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.genomes.len()).collect();
        indices.sort_by(|&a, &b| {
            let fa = self.genomes[a].fitness().unwrap_or(f64::NEG_INFINITY);
            let fb = self.genomes[b].fitness().unwrap_or(f64::NEG_INFINITY);
            fb.total_cmp(&fa)
        });
        indices
    }

    /// The fittest evaluated genome. Ties go to the lowest index.
    pub fn best(&self) -> Option<&ListGenome<T>> {
        self.extreme(|candidate, current| candidate > current)
    }

    /// The least fit evaluated genome. Ties go to the lowest index.
    pub fn worst(&self) -> Option<&ListGenome<T>> {
        self.extreme(|candidate, current| candidate < current)
    }

    /// Mean score of the evaluated genomes.
    pub fn average(&self) -> Option<f64> {
        let scores: Vec<f64> = self.genomes.iter().filter_map(|g| g.fitness()).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    fn extreme<F>(&self, replaces: F) -> Option<&ListGenome<T>>
    where
        F: Fn(f64, f64) -> bool,
    {
        let mut chosen: Option<(&ListGenome<T>, f64)> = None;
        for genome in &self.genomes {
            if let Some(score) = genome.fitness() {
                match chosen {
                    Some((_, current)) if !replaces(score, current) => {}
                    _ => chosen = Some((genome, score)),
                }
            }
        }
        chosen.map(|(genome, _)| genome)
    }
}

impl<T> Population<T>
where
    T: Send + Sync,
{
    /// Evaluates every genome whose cached score is stale and returns how many
    /// evaluator calls were made.
    ///
    /// When at least `parallel_threshold` genomes are stale the calls fan out
    /// over rayon's thread pool; each genome is borrowed by exactly one task.
    ///
    /// # Errors
    ///
    /// The first evaluator failure, as `GeneticError::FitnessEvaluation`.
    pub fn evaluate(&mut self, parallel_threshold: usize) -> Result<usize> {
        let mut dirty: Vec<&mut ListGenome<T>> = self
            .genomes
            .iter_mut()
            .filter(|genome| !genome.is_evaluated())
            .collect();
        let count = dirty.len();

        if count > 0 && count >= parallel_threshold {
            dirty
                .into_par_iter()
                .map(|genome| genome.evaluate().map(|_| ()))
                .collect::<Result<Vec<()>>>()?;
        } else {
            for genome in dirty.iter_mut() {
                genome.evaluate()?;
            }
        }

        Ok(count)
    }
}

impl<T> Default for Population<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Population<T> {
    type Item = &'a ListGenome<T>;
    type IntoIter = std::slice::Iter<'a, ListGenome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.genomes.iter()
    }
}
