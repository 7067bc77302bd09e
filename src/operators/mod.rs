//! # Operators
//!
//! Recombination and mutation operators for list genomes. They are free
//! functions; the driver picks one of each through the [`CrossoverOperator`]
//! and [`MutationOperator`] enums.
//!
//! Crossovers read two parents and overwrite up to two children. Mutations
//! perturb one genome in place. All of them take the run's
//! [`RandomNumberGenerator`] explicitly.
pub mod crossover;
pub mod mutation;

use crate::{
    error::{GeneticError, Result},
    genome::ListGenome,
    rng::RandomNumberGenerator,
};

pub use crossover::{
    cycle_crossover, one_point_crossover, one_point_crossover_at, order_crossover,
    order_crossover_at, partial_match_crossover, partial_match_crossover_at,
};
pub use mutation::{destructive_mutation, swap_mutation};

/// Produces fresh genes for destructive mutation.
///
/// Any `Fn(&mut RandomNumberGenerator) -> T` closure is a generator.
pub trait GeneGenerator<T>: Send + Sync {
    fn generate(&self, rng: &mut RandomNumberGenerator) -> T;
}

impl<T, F> GeneGenerator<T> for F
where
    F: Fn(&mut RandomNumberGenerator) -> T + Send + Sync,
{
    fn generate(&self, rng: &mut RandomNumberGenerator) -> T {
        self(rng)
    }
}

/// The recombination operator used by the driver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossoverOperator {
    /// Single cut point; duplicate genes are allowed.
    #[default]
    OnePoint,
    /// Partial-match crossover (PMX) for permutations.
    PartialMatch,
    /// Order crossover (OX) for permutations.
    Order,
    /// Cycle crossover (CX) for permutations.
    Cycle,
}

impl CrossoverOperator {
    /// Whether the operator only accepts parents that are permutations of the
    /// same value set.
    pub fn requires_permutation(&self) -> bool {
        !matches!(self, CrossoverOperator::OnePoint)
    }

    /// Recombines `mom` and `dad` into the requested children and returns how
    /// many children were written.
    pub fn apply<T>(
        &self,
        mom: &ListGenome<T>,
        dad: &ListGenome<T>,
        sister: Option<&mut ListGenome<T>>,
        brother: Option<&mut ListGenome<T>>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize>
    where
        T: Clone + PartialEq,
    {
        match self {
            CrossoverOperator::OnePoint => one_point_crossover(mom, dad, sister, brother, rng),
            CrossoverOperator::PartialMatch => {
                partial_match_crossover(mom, dad, sister, brother, rng)
            }
            CrossoverOperator::Order => order_crossover(mom, dad, sister, brother, rng),
            CrossoverOperator::Cycle => cycle_crossover(mom, dad, sister, brother, rng),
        }
    }
}

/// The mutation operator used by the driver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationOperator {
    /// Swap genes between positions.
    #[default]
    Swap,
    /// Replace genes with freshly generated ones.
    Destructive,
}

impl MutationOperator {
    /// Whether the operator needs a [`GeneGenerator`].
    pub fn requires_generator(&self) -> bool {
        matches!(self, MutationOperator::Destructive)
    }

    /// Mutates `genome` with per-gene probability `pm` and returns the number
    /// of mutation events.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if destructive mutation is
    /// requested without a generator.
    pub fn apply<T>(
        &self,
        genome: &mut ListGenome<T>,
        pm: f64,
        generator: Option<&dyn GeneGenerator<T>>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize> {
        match self {
            MutationOperator::Swap => swap_mutation(genome, pm, rng),
            MutationOperator::Destructive => {
                let generator = generator.ok_or_else(|| {
                    GeneticError::Configuration(
                        "Destructive mutation requires a gene generator".to_string(),
                    )
                })?;
                destructive_mutation(genome, pm, generator, rng)
            }
        }
    }
}

/// Returns `true` if `values` and `other` hold the same distinct values, each
/// exactly once.
pub fn is_permutation_of<T: PartialEq>(values: &[T], other: &[T]) -> bool {
    values.len() == other.len()
        && !has_duplicates(values)
        && values.iter().all(|v| other.contains(v))
}

fn has_duplicates<T: PartialEq>(values: &[T]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, v)| values[..i].contains(v))
}

/// Checks the preconditions shared by every crossover and returns the common
/// length.
pub(crate) fn check_parents<T>(mom: &ListGenome<T>, dad: &ListGenome<T>) -> Result<usize> {
    if mom.len() != dad.len() {
        return Err(GeneticError::LengthMismatch(format!(
            "Parents have different lengths ({} and {})",
            mom.len(),
            dad.len()
        )));
    }
    if mom.len() < 2 {
        return Err(GeneticError::LengthMismatch(format!(
            "Crossover needs genomes of length at least 2, got {}",
            mom.len()
        )));
    }
    Ok(mom.len())
}

pub(crate) fn check_permutation_parents<T: PartialEq>(mom: &[T], dad: &[T]) -> Result<()> {
    if !is_permutation_of(mom, dad) {
        return Err(GeneticError::LengthMismatch(
            "Parents are not permutations of the same value set".to_string(),
        ));
    }
    Ok(())
}
