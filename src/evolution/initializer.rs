//! # Initializer
//!
//! Fills the genes of a freshly created genome at the start of a run. The
//! driver hands every initializer an empty genome that already carries the
//! prototype's evaluator and user data.

use crate::{genome::ListGenome, list::Location, rng::RandomNumberGenerator};

/// Fills an empty genome with its first genes.
///
/// Any `Fn(&mut ListGenome<T>, &mut RandomNumberGenerator)` closure is an
/// initializer.
pub trait Initializer<T>: Send + Sync {
    fn initialize(&self, genome: &mut ListGenome<T>, rng: &mut RandomNumberGenerator);
}

impl<T, F> Initializer<T> for F
where
    F: Fn(&mut ListGenome<T>, &mut RandomNumberGenerator) + Send + Sync,
{
    fn initialize(&self, genome: &mut ListGenome<T>, rng: &mut RandomNumberGenerator) {
        self(genome, rng)
    }
}

/// Initializes every genome with a random ordering of a fixed set of genes.
///
/// This is the usual starting point for the permutation crossovers.
///
/// ## Example
///
/// ```rust
/// use genlist::evolution::{Initializer, PermutationInitializer};
/// use genlist::genome::ListGenome;
/// use genlist::rng::RandomNumberGenerator;
///
/// let initializer = PermutationInitializer::new(vec!['A', 'B', 'C', 'D', 'E']);
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let mut genome = ListGenome::new();
///
/// initializer.initialize(&mut genome, &mut rng);
///
/// let mut genes = genome.to_vec();
/// genes.sort();
/// assert_eq!(genes, vec!['A', 'B', 'C', 'D', 'E']);
/// ```
#[derive(Debug, Clone)]
pub struct PermutationInitializer<T> {
    alleles: Vec<T>,
}

impl<T> PermutationInitializer<T> {
    pub fn new(alleles: Vec<T>) -> Self {
        Self { alleles }
    }

    pub fn alleles(&self) -> &[T] {
        &self.alleles
    }
}

impl<T> Initializer<T> for PermutationInitializer<T>
where
    T: Clone + Send + Sync,
{
    fn initialize(&self, genome: &mut ListGenome<T>, rng: &mut RandomNumberGenerator) {
        let mut genes = self.alleles.clone();
        rng.shuffle(&mut genes);
        genome.destroy();
        for gene in genes {
            genome.insert(gene, Location::Tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_initializer() {
        let initializer = |genome: &mut ListGenome<u8>, rng: &mut RandomNumberGenerator| {
            for _ in 0..4 {
                genome.insert(rng.gen_index(3) as u8, Location::Tail);
            }
        };
        let mut rng = RandomNumberGenerator::from_seed(9);
        let mut genome = ListGenome::new();
        initializer.initialize(&mut genome, &mut rng);
        assert_eq!(genome.len(), 4);
        assert!(genome.iter().all(|&g| g < 3));
    }

    #[test]
    fn test_permutation_initializer_replaces_previous_genes() {
        let initializer = PermutationInitializer::new((0..10).collect::<Vec<u32>>());
        let mut rng = RandomNumberGenerator::from_seed(9);
        let mut genome: ListGenome<u32> = vec![99, 98].into_iter().collect();

        initializer.initialize(&mut genome, &mut rng);

        let mut genes = genome.to_vec();
        genes.sort();
        assert_eq!(genes, (0..10).collect::<Vec<u32>>());
        assert!(!genome.is_evaluated());
    }
}
