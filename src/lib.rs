//! # genlist
//!
//! A generational evolutionary-search engine over list genomes.
//!
//! - [`list`]: the ordered list with a cursor that stores the genes.
//! - [`genome`]: a list plus a lazily cached fitness score.
//! - [`operators`]: one-point, PMX, OX and CX crossover; swap and destructive mutation.
//! - [`selection`]: roulette wheel, tournament and rank-based parent selection.
//! - [`evolution`]: options, the driver builder, the driver and run statistics.
//!
//! ## Example
//!
//! ```rust
//! use genlist::evolution::{EvolutionDriverBuilder, EvolutionOptions, PermutationInitializer};
//! use genlist::genome::{ListGenome, UserData};
//! use genlist::operators::CrossoverOperator;
//! use genlist::selection::RankBasedSelection;
//!
//! // count adjacent pairs in ascending order
//! let evaluator = |g: &ListGenome<u8>, _: Option<&UserData>| {
//!     let genes = g.to_vec();
//!     Ok(genes.windows(2).filter(|w| w[0] < w[1]).count() as f64)
//! };
//!
//! let mut driver = EvolutionDriverBuilder::new()
//!     .with_evaluator(evaluator)
//!     .with_initializer(PermutationInitializer::new((0..6u8).collect::<Vec<_>>()))
//!     .with_crossover(CrossoverOperator::Order)
//!     .with_selection_strategy(RankBasedSelection::default())
//!     .with_options(EvolutionOptions::new(30, 40, 0.9, 0.05))
//!     .with_seed(3)
//!     .build()?;
//!
//! let result = driver.evolve()?;
//! assert!(result.score >= driver.statistics().history()[0].best);
//! # Ok::<(), genlist::GeneticError>(())
//! ```

pub mod error;
pub mod evolution;
pub mod genome;
pub mod list;
pub mod operators;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result};
pub use genome::{CloneMethod, Evaluator, Gene, ListGenome, UserData};
pub use list::{Location, OrderedList};
