//! # Mutation
//!
//! In-place perturbations of a single genome. Both operators take a per-gene
//! probability `pm` and return the number of mutation events they applied.
//! When no event fires the genome is left untouched, including its cached
//! fitness.

use crate::{error::Result, genome::ListGenome, list::Location, rng::RandomNumberGenerator};

use super::GeneGenerator;

/// Swap mutation.
///
/// Each position `i` is visited once; with probability `pm` its gene is
/// swapped with the gene at a uniformly chosen other position. Genomes
/// shorter than 2 are never changed.
///
/// ## Example
///
/// ```rust
/// use genlist::genome::ListGenome;
/// use genlist::operators::swap_mutation;
/// use genlist::rng::RandomNumberGenerator;
///
/// let mut rng = RandomNumberGenerator::from_seed(3);
/// let mut genome: ListGenome<u8> = vec![1, 2, 3, 4].into_iter().collect();
///
/// let swaps = swap_mutation(&mut genome, 1.0, &mut rng).unwrap();
/// assert_eq!(swaps, 4);
///
/// let mut sorted = genome.to_vec();
/// sorted.sort();
/// assert_eq!(sorted, vec![1, 2, 3, 4]);
/// ```
pub fn swap_mutation<T>(
    genome: &mut ListGenome<T>,
    pm: f64,
    rng: &mut RandomNumberGenerator,
) -> Result<usize> {
    let len = genome.len();
    if len < 2 || pm <= 0.0 {
        return Ok(0);
    }

    let mut swaps = 0;
    for i in 0..len {
        if !rng.flip(pm) {
            continue;
        }
        let mut j = rng.gen_index(len - 1);
        if j >= i {
            j += 1;
        }
        genome.swap(i, j)?;
        swaps += 1;
    }
    Ok(swaps)
}

/// Destructive mutation.
///
/// For each gene of the original genome, with probability `pm`, the gene at
/// a random position is removed and a fresh gene from `generator` is inserted
/// at a random position. Every event removes one gene and inserts one, so the
/// length is preserved.
pub fn destructive_mutation<T, G>(
    genome: &mut ListGenome<T>,
    pm: f64,
    generator: &G,
    rng: &mut RandomNumberGenerator,
) -> Result<usize>
where
    G: GeneGenerator<T> + ?Sized,
{
    let len = genome.len();
    if len == 0 || pm <= 0.0 {
        return Ok(0);
    }

    let mut events = 0;
    for _ in 0..len {
        if !rng.flip(pm) {
            continue;
        }

        let victim = rng.gen_index(genome.len());
        genome.warp(victim)?;
        genome.remove()?;

        let fresh = generator.generate(rng);
        let slot = rng.gen_index(genome.len() + 1);
        if slot == genome.len() {
            genome.insert(fresh, Location::Tail);
        } else {
            genome.warp(slot)?;
            genome.insert(fresh, Location::Before);
        }
        events += 1;
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::UserData;

    fn evaluated(values: Vec<u32>) -> ListGenome<u32> {
        let mut genome = values
            .into_iter()
            .collect::<ListGenome<u32>>()
            .with_evaluator(|g: &ListGenome<u32>, _: Option<&UserData>| {
                Ok(g.get(0).copied().unwrap_or(0) as f64)
            });
        genome.evaluate().unwrap();
        genome
    }

    #[test]
    fn test_swap_with_zero_probability_keeps_fitness() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut genome = evaluated((0..10).collect());
        assert_eq!(swap_mutation(&mut genome, 0.0, &mut rng).unwrap(), 0);
        assert!(genome.is_evaluated());
        assert_eq!(genome.to_vec(), (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_swap_preserves_genes_and_marks_stale() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let mut genome = evaluated((0..10).collect());
        let swaps = swap_mutation(&mut genome, 1.0, &mut rng).unwrap();
        assert_eq!(swaps, 10);
        assert!(!genome.is_evaluated());

        let mut sorted = genome.to_vec();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_swap_rate_tracks_probability() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut genome: ListGenome<u32> = (0..100).collect();
        let total: usize = (0..50)
            .map(|_| swap_mutation(&mut genome, 0.1, &mut rng).unwrap())
            .sum();
        // 5000 trials at p = 0.1
        assert!((350..650).contains(&total), "unexpected swap count {}", total);
    }

    #[test]
    fn test_swap_short_genomes() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut single: ListGenome<u32> = vec![7].into_iter().collect();
        assert_eq!(swap_mutation(&mut single, 1.0, &mut rng).unwrap(), 0);
        let mut empty: ListGenome<u32> = ListGenome::new();
        assert_eq!(swap_mutation(&mut empty, 1.0, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_destructive_preserves_length() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let generator = |_: &mut RandomNumberGenerator| 99_u32;
        let mut genome = evaluated((0..8).collect());

        let events = destructive_mutation(&mut genome, 1.0, &generator, &mut rng).unwrap();
        assert_eq!(events, 8);
        assert_eq!(genome.len(), 8);
        assert!(!genome.is_evaluated());
        assert!(genome.iter().filter(|&&g| g == 99).count() >= 1);
    }

    #[test]
    fn test_destructive_replaces_every_gene_at_full_rate() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let generator = |rng: &mut RandomNumberGenerator| 1000 + rng.gen_index(10) as u32;
        let mut genome: ListGenome<u32> = (0..1).collect();
        destructive_mutation(&mut genome, 1.0, &generator, &mut rng).unwrap();
        assert_eq!(genome.len(), 1);
        assert!(genome.get(0).copied().unwrap() >= 1000);
    }

    #[test]
    fn test_destructive_with_zero_probability() {
        let mut rng = RandomNumberGenerator::from_seed(7);
        let generator = |_: &mut RandomNumberGenerator| 0_u32;
        let mut genome = evaluated(vec![4, 5, 6]);
        assert_eq!(
            destructive_mutation(&mut genome, 0.0, &generator, &mut rng).unwrap(),
            0
        );
        assert!(genome.is_evaluated());
    }
}
