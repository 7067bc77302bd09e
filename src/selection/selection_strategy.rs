use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for parent selection strategies.
///
/// A strategy looks only at the fitness scores of the current population and
/// returns the indices of the chosen individuals. Higher fitness is better.
/// The driver owns the genomes, so strategies never clone them.
///
/// # Examples
///
/// ```
/// use genlist::rng::RandomNumberGenerator;
/// use genlist::selection::{SelectionStrategy, TournamentSelection};
///
/// let fitness = vec![0.5, 0.8, 0.3];
/// let mut rng = RandomNumberGenerator::from_seed(11);
///
/// let selection = TournamentSelection::new(2, false).unwrap();
/// let selected = selection.select(&fitness, 2, &mut rng).unwrap();
///
/// assert_eq!(selected.len(), 2);
/// assert!(selected.iter().all(|&i| i < fitness.len()));
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects `num_to_select` individuals by index.
    ///
    /// # Arguments
    ///
    /// * `fitness` - The fitness scores of the population, one per individual.
    /// * `num_to_select` - The number of individuals to select.
    /// * `rng` - The run's random number generator.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` if `fitness` is empty.
    ///
    /// When a strategy does not allow duplicates, it returns at most
    /// `fitness.len()` indices.
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>>;
}

pub(crate) fn check_fitness(fitness: &[f64]) -> Result<()> {
    if fitness.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    Ok(())
}

/// Draws indices proportionally to `weights`.
///
/// Weights must be non-negative. When the remaining weight sums to zero the
/// draw falls back to a uniform pick among the remaining candidates. Without
/// duplicates each drawn index is removed from the wheel.
pub(crate) fn spin_wheel(
    weights: &[f64],
    num_to_select: usize,
    allow_duplicates: bool,
    rng: &mut RandomNumberGenerator,
) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..weights.len()).collect();
    let target = if allow_duplicates {
        num_to_select
    } else {
        num_to_select.min(weights.len())
    };

    let mut selected = Vec::with_capacity(target);
    while selected.len() < target && !candidates.is_empty() {
        let total: f64 = candidates.iter().map(|&i| weights[i]).sum();
        let pick = if total > 0.0 && total.is_finite() {
            let r = rng.unit() * total;
            let mut cumulative = 0.0;
            let mut pick = candidates.len() - 1;
            for (slot, &i) in candidates.iter().enumerate() {
                cumulative += weights[i];
                if r < cumulative {
                    pick = slot;
                    break;
                }
            }
            pick
        } else {
            rng.gen_index(candidates.len())
        };

        selected.push(candidates[pick]);
        if !allow_duplicates {
            candidates.remove(pick);
        }
    }
    selected
}
