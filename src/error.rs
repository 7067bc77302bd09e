//! # Error Types
//!
//! This module defines the error type shared by every part of the engine: the
//! ordered list container, the list genome, the crossover and mutation
//! operators, and the evolution driver.
//!
//! No operation in the crate substitutes a default value for a failure. Every
//! failure is returned to the caller as a [`GeneticError`].
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genlist::error::{GeneticError, Result};
//!
//! fn checked_probability(p: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&p) {
//!         return Err(GeneticError::Configuration(format!(
//!             "Probability {} is outside [0, 1]",
//!             p
//!         )));
//!     }
//!     Ok(p)
//! }
//!
//! assert!(checked_probability(0.5).is_ok());
//! assert!(checked_probability(1.5).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genlist::error::{GeneticError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> genlist::error::Result<f64> {
//!     scores
//!         .iter()
//!         .cloned()
//!         .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[1.0, 3.0, 2.0]).unwrap(), 3.0);
//! assert!(best_score(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while building or running an evolution.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// A list position outside `[0, len)` was requested.
    #[error("Index error: position {index} is out of range for a list of length {len}")]
    Index { index: usize, len: usize },

    /// A removal was attempted on an empty list.
    #[error("Empty container error: cannot remove from an empty list")]
    EmptyContainer,

    /// Recombination over genomes of unequal length, genomes that are too
    /// short, or genomes that are not permutations of the same value set.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external evaluator failed or produced an unusable score.
    #[error("Fitness evaluation error: {0}")]
    FitnessEvaluation(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when an evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using a closure
    /// to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
