use std::collections::HashSet;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_fitness, SelectionStrategy};

/// A selection strategy that runs small tournaments and keeps the fittest
/// participant of each.
///
/// Participants are drawn uniformly with replacement. Ties go to the first
/// participant drawn.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    allow_duplicates: bool,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy.
    ///
    /// # Arguments
    ///
    /// * `tournament_size` - The number of individuals that participate in each tournament.
    ///   Must be at least 1. A tournament size of 1 is equivalent to random selection.
    /// * `allow_duplicates` - Whether the same individual may win more than once.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `tournament_size` is 0.
    pub fn new(tournament_size: usize, allow_duplicates: bool) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            tournament_size,
            allow_duplicates,
        })
    }

    pub fn with_tournament_size(mut self, tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        self.tournament_size = tournament_size;
        Ok(self)
    }

    pub fn with_duplicates(mut self, allow_duplicates: bool) -> Self {
        self.allow_duplicates = allow_duplicates;
        self
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament among the individuals not in `excluded` and
    /// returns the index of the winner.
    fn run_tournament(
        &self,
        fitness: &[f64],
        rng: &mut RandomNumberGenerator,
        excluded: &HashSet<usize>,
    ) -> Result<usize> {
        let eligible: Vec<usize> = (0..fitness.len())
            .filter(|i| !excluded.contains(i))
            .collect();

        if eligible.is_empty() {
            return Err(GeneticError::Configuration(
                "No eligible individuals for tournament selection".to_string(),
            ));
        }

        let mut best_idx = eligible[rng.gen_index(eligible.len())];
        for _ in 1..self.tournament_size {
            let idx = eligible[rng.gen_index(eligible.len())];
            if fitness[idx] > fitness[best_idx] {
                best_idx = idx;
            }
        }

        Ok(best_idx)
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 2,
            allow_duplicates: true,
        }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        check_fitness(fitness)?;

        let target = if self.allow_duplicates {
            num_to_select
        } else {
            num_to_select.min(fitness.len())
        };

        let mut selected = Vec::with_capacity(target);
        let mut excluded = HashSet::new();

        while selected.len() < target {
            let winner_idx = self.run_tournament(fitness, rng, &excluded)?;
            if !self.allow_duplicates {
                excluded.insert(winner_idx);
            }
            selected.push(winner_idx);
        }

        Ok(selected)
    }
}
