use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{check_fitness, spin_wheel, SelectionStrategy};

/// A selection strategy that picks individuals with probability proportional
/// to their fitness.
///
/// Negative scores are shifted so the worst individual has weight zero. If
/// every weight is zero the pick is uniform.
///
/// # Examples
///
/// ```
/// use genlist::rng::RandomNumberGenerator;
/// use genlist::selection::{RouletteWheelSelection, SelectionStrategy};
///
/// let fitness = vec![0.0, 0.0, 5.0];
/// let mut rng = RandomNumberGenerator::from_seed(4);
///
/// let selection = RouletteWheelSelection::with_duplicates(true);
/// let selected = selection.select(&fitness, 3, &mut rng).unwrap();
///
/// assert_eq!(selected, vec![2, 2, 2]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct RouletteWheelSelection {
    /// Whether the same individual may be selected more than once.
    allow_duplicates: bool,
}

impl RouletteWheelSelection {
    /// Creates a new RouletteWheelSelection strategy.
    ///
    /// By default duplicates are allowed, which is what parent selection needs.
    pub fn new() -> Self {
        Self {
            allow_duplicates: true,
        }
    }

    /// Creates a new RouletteWheelSelection strategy with the specified duplicate policy.
    pub fn with_duplicates(allow_duplicates: bool) -> Self {
        Self { allow_duplicates }
    }

    /// Maps raw fitness to non-negative wheel weights.
    fn weights(&self, fitness: &[f64]) -> Vec<f64> {
        let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let shift = if min < 0.0 { -min } else { 0.0 };
        fitness.iter().map(|&f| f + shift).collect()
    }
}

impl Default for RouletteWheelSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for RouletteWheelSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        check_fitness(fitness)?;
        let weights = self.weights(fitness);
        Ok(spin_wheel(&weights, num_to_select, self.allow_duplicates, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;

    #[test]
    fn test_roulette_wheel_selection() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = RouletteWheelSelection::new();
        let selected = selection.select(&fitness, 3, &mut rng).unwrap();
        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|&i| i < fitness.len()));
    }

    #[test]
    fn test_roulette_wheel_selection_favours_fitter() {
        let fitness = vec![1.0, 9.0];
        let mut rng = RandomNumberGenerator::from_seed(7);

        let selection = RouletteWheelSelection::new();
        let selected = selection.select(&fitness, 1000, &mut rng).unwrap();
        let strong = selected.iter().filter(|&&i| i == 1).count();
        assert!(strong > 800, "strong individual picked {} times", strong);
    }

    #[test]
    fn test_roulette_wheel_selection_without_duplicates() {
        let fitness = vec![0.5, 0.8, 0.3];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = RouletteWheelSelection::with_duplicates(false);
        let mut selected = selection.select(&fitness, 5, &mut rng).unwrap();
        selected.sort();
        assert_eq!(selected, vec![0, 1, 2]);
    }

    #[test]
    fn test_roulette_wheel_selection_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(42);
        let selection = RouletteWheelSelection::new();
        let result = selection.select(&[], 3, &mut rng);
        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }

    #[test]
    fn test_roulette_wheel_selection_negative_fitness() {
        let fitness = vec![-3.0, -1.0];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = RouletteWheelSelection::new();
        let selected = selection.select(&fitness, 50, &mut rng).unwrap();
        // the worst score maps to weight zero
        assert!(selected.iter().all(|&i| i == 1));
    }

    #[test]
    fn test_roulette_wheel_selection_zero_fitness() {
        let fitness = vec![0.0, 0.0, 0.0];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = RouletteWheelSelection::new();
        let selected = selection.select(&fitness, 300, &mut rng).unwrap();
        for i in 0..3 {
            assert!(selected.contains(&i));
        }
    }

    #[test]
    fn test_weights() {
        let selection = RouletteWheelSelection::new();
        assert_eq!(selection.weights(&[1.0, 2.0]), vec![1.0, 2.0]);
        assert_eq!(selection.weights(&[-2.0, 0.0, 3.0]), vec![0.0, 2.0, 5.0]);
    }
}
