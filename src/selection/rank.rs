use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_fitness, spin_wheel, SelectionStrategy};

/// A selection strategy that selects individuals based on their rank in the population.
///
/// Rank-based selection assigns a selection probability to each individual based on its
/// rank in the population, rather than its absolute fitness value. This helps prevent
/// premature convergence when there are a few individuals with much higher fitness than
/// the rest of the population, and it copes with negative scores.
///
/// With `n` individuals and selection pressure `s`, the individual of rank `r`
/// (0 for the worst, `n - 1` for the best) is picked with probability
/// `(2 - s) / n + 2 r (s - 1) / (n (n - 1))`.
///
/// # Examples
///
/// ```
/// use genlist::rng::RandomNumberGenerator;
/// use genlist::selection::{RankBasedSelection, SelectionStrategy};
///
/// let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
/// let mut rng = RandomNumberGenerator::from_seed(5);
///
/// let selection = RankBasedSelection::new(1.5, true).unwrap();
/// let selected = selection.select(&fitness, 3, &mut rng).unwrap();
///
/// assert_eq!(selected.len(), 3);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct RankBasedSelection {
    /// Higher values increase selection pressure.
    selection_pressure: f64,
    allow_duplicates: bool,
}

impl RankBasedSelection {
    /// Creates a new RankBasedSelection strategy.
    ///
    /// # Arguments
    ///
    /// * `selection_pressure` - Must be in the range [1.0, 2.0].
    ///   - At 1.0, all individuals have equal selection probability
    ///   - At 2.0, the worst individual is never selected
    /// * `allow_duplicates` - Whether the same individual may be selected more than once.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `selection_pressure` is not in the range [1.0, 2.0].
    pub fn new(selection_pressure: f64, allow_duplicates: bool) -> Result<Self> {
        Self::check_pressure(selection_pressure)?;
        Ok(Self {
            selection_pressure,
            allow_duplicates,
        })
    }

    pub fn with_pressure(mut self, selection_pressure: f64) -> Result<Self> {
        Self::check_pressure(selection_pressure)?;
        self.selection_pressure = selection_pressure;
        Ok(self)
    }

    pub fn with_duplicates(mut self, allow_duplicates: bool) -> Self {
        self.allow_duplicates = allow_duplicates;
        self
    }

    pub fn selection_pressure(&self) -> f64 {
        self.selection_pressure
    }

    fn check_pressure(selection_pressure: f64) -> Result<()> {
        if !(1.0..=2.0).contains(&selection_pressure) {
            return Err(GeneticError::Configuration(
                "Selection pressure must be in the range [1.0, 2.0]".to_string(),
            ));
        }
        Ok(())
    }

    /// Calculates the selection probability of each individual from its rank.
    fn calculate_probabilities(&self, fitness: &[f64]) -> Vec<f64> {
        let n = fitness.len();
        if n == 1 {
            return vec![1.0];
        }

        // ascending: the worst individual gets rank 0
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

        let n = n as f64;
        let s = self.selection_pressure;
        let mut probs = vec![0.0; fitness.len()];
        for (rank, &idx) in indices.iter().enumerate() {
            let rank = rank as f64;
            probs[idx] = (2.0 - s) / n + (2.0 * rank * (s - 1.0)) / (n * (n - 1.0));
        }
        probs
    }
}

impl Default for RankBasedSelection {
    fn default() -> Self {
        Self {
            selection_pressure: 1.5,
            allow_duplicates: true,
        }
    }
}

impl SelectionStrategy for RankBasedSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        check_fitness(fitness)?;
        let probs = self.calculate_probabilities(fitness);
        Ok(spin_wheel(&probs, num_to_select, self.allow_duplicates, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_based_selection() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = RankBasedSelection::default();
        let selected = selection.select(&fitness, 3, &mut rng).unwrap();
        assert_eq!(selected.len(), 3);

        let selection = RankBasedSelection::default().with_pressure(1.8).unwrap();
        let selected = selection.select(&fitness, 10, &mut rng).unwrap();
        assert_eq!(selected.len(), 10);

        // Without duplicates only 5 individuals are available
        let selection = RankBasedSelection::new(1.2, false).unwrap();
        let mut selected = selection.select(&fitness, 10, &mut rng).unwrap();
        selected.sort();
        assert_eq!(selected, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_based_selection_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(42);
        let selection = RankBasedSelection::default();
        assert!(selection.select(&[], 3, &mut rng).is_err());
    }

    #[test]
    fn test_rank_based_selection_invalid_pressure() {
        assert!(RankBasedSelection::new(0.5, true).is_err());
        assert!(RankBasedSelection::new(2.5, true).is_err());
        assert!(RankBasedSelection::default().with_pressure(3.0).is_err());
    }

    #[test]
    fn test_probabilities_favour_the_best() {
        let selection = RankBasedSelection::new(2.0, true).unwrap();
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let probs = selection.calculate_probabilities(&fitness);

        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        // index 3 is the best, index 4 the worst
        assert!((probs[3] - 0.4).abs() < 1e-12);
        assert_eq!(probs[4], 0.0);
        assert!(probs[3] > probs[1] && probs[1] > probs[0] && probs[0] > probs[2]);
    }

    #[test]
    fn test_uniform_pressure() {
        let selection = RankBasedSelection::new(1.0, true).unwrap();
        let probs = selection.calculate_probabilities(&[3.0, -1.0, 7.0, 0.0]);
        assert!(probs.iter().all(|&p| (p - 0.25).abs() < 1e-12));
    }

    #[test]
    fn test_single_individual() {
        let mut rng = RandomNumberGenerator::from_seed(42);
        let selection = RankBasedSelection::default();
        assert_eq!(selection.select(&[-4.0], 2, &mut rng).unwrap(), vec![0, 0]);
    }
}
