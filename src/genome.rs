//! # ListGenome
//!
//! A `ListGenome` is one candidate solution: an [`OrderedList`] of genes plus
//! a cached fitness score and the evaluator that produces it.
//!
//! The cached score is guarded by an `evaluated` flag. Every structural
//! mutator (`insert`, `insert_list`, `remove`, `swap`, `destroy`,
//! `replace_contents`) clears the flag *before* touching the list, so a
//! mutation that fails half way still leaves the genome marked stale. Only a
//! successful call to the evaluator sets the flag again.
//!
//! ## Example
//!
//! ```rust
//! use genlist::genome::{ListGenome, UserData};
//! use genlist::list::Location;
//!
//! let mut genome = ListGenome::new().with_evaluator(
//!     |g: &ListGenome<u32>, _: Option<&UserData>| Ok(g.iter().sum::<u32>() as f64),
//! );
//! genome.insert(3, Location::Tail);
//! genome.insert(4, Location::Tail);
//!
//! assert_eq!(genome.fitness(), None);
//! assert_eq!(genome.evaluate().unwrap(), 7.0);
//! assert_eq!(genome.fitness(), Some(7.0));
//!
//! genome.swap(0, 1).unwrap();
//! assert!(!genome.is_evaluated());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::list::{Location, OrderedList};

/// Opaque caller data handed to the evaluator alongside the genome.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Bounds a gene type needs to take part in a full evolutionary run.
///
/// Implemented for every type that satisfies them.
pub trait Gene: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> Gene for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// The external fitness oracle.
///
/// An evaluator must be a pure function of the genome's contents for a given
/// user data value. Failure is reported as an `Err`; a low or negative score
/// is always a valid score.
///
/// Any closure of the shape `Fn(&ListGenome<T>, Option<&UserData>) -> Result<f64>`
/// is an evaluator.
pub trait Evaluator<T>: Send + Sync {
    fn evaluate(&self, genome: &ListGenome<T>, user_data: Option<&UserData>) -> Result<f64>;
}

impl<T, F> Evaluator<T> for F
where
    F: Fn(&ListGenome<T>, Option<&UserData>) -> Result<f64> + Send + Sync,
{
    fn evaluate(&self, genome: &ListGenome<T>, user_data: Option<&UserData>) -> Result<f64> {
        self(genome, user_data)
    }
}

/// How [`ListGenome::clone_with`] copies a genome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneMethod {
    /// Deep copy of the genes. The copy is not evaluated.
    Contents,
    /// Evaluator and user data only, with an empty gene list.
    Attributes,
}

/// A genome backed by an ordered list of genes.
#[derive(Clone)]
pub struct ListGenome<T> {
    list: OrderedList<T>,
    score: f64,
    evaluated: bool,
    evaluations: usize,
    evaluator: Option<Arc<dyn Evaluator<T>>>,
    user_data: Option<UserData>,
}

impl<T> ListGenome<T> {
    /// Creates an empty genome without an evaluator.
    pub fn new() -> Self {
        Self::from_list(OrderedList::new())
    }

    /// Wraps an existing list. The genome starts out not evaluated.
    pub fn from_list(list: OrderedList<T>) -> Self {
        Self {
            list,
            score: 0.0,
            evaluated: false,
            evaluations: 0,
            evaluator: None,
            user_data: None,
        }
    }

    pub fn with_evaluator<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&ListGenome<T>, Option<&UserData>) -> Result<f64> + Send + Sync + 'static,
    {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Attaches an evaluator that is shared with other genomes.
    pub fn with_shared_evaluator(mut self, evaluator: Arc<dyn Evaluator<T>>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Replaces the evaluator. The cached score no longer applies.
    pub fn set_evaluator(&mut self, evaluator: Arc<dyn Evaluator<T>>) {
        self.evaluated = false;
        self.evaluator = Some(evaluator);
    }

    /// Replaces the user data. The cached score no longer applies.
    pub fn set_user_data(&mut self, user_data: UserData) {
        self.evaluated = false;
        self.user_data = Some(user_data);
    }

    pub fn has_evaluator(&self) -> bool {
        self.evaluator.is_some()
    }

    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    /// Read-only view of the underlying list.
    pub fn list(&self) -> &OrderedList<T> {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> crate::list::Iter<'_, T> {
        self.list.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.list.get(index)
    }

    pub fn insert(&mut self, value: T, location: Location) {
        self.evaluated = false;
        self.list.insert(value, location);
    }

    pub fn insert_list(&mut self, other: OrderedList<T>, location: Location) {
        self.evaluated = false;
        self.list.insert_list(other, location);
    }

    pub fn remove(&mut self) -> Result<T> {
        self.evaluated = false;
        self.list.remove()
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.evaluated = false;
        self.list.swap(i, j)
    }

    pub fn destroy(&mut self) {
        self.evaluated = false;
        self.list.destroy();
    }

    /// Replaces every gene with `values`, in order.
    pub fn replace_contents<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.destroy();
        self.list.extend(values);
    }

    // Cursor moves do not change the genes, so they keep the cached score.

    pub fn current(&self) -> Option<&T> {
        self.list.current()
    }

    pub fn move_to_head(&mut self) -> Option<&T> {
        self.list.move_to_head()
    }

    pub fn move_to_tail(&mut self) -> Option<&T> {
        self.list.move_to_tail()
    }

    pub fn move_next(&mut self) -> Option<&T> {
        self.list.move_next()
    }

    pub fn move_prev(&mut self) -> Option<&T> {
        self.list.move_prev()
    }

    pub fn warp(&mut self, index: usize) -> Result<&T> {
        self.list.warp(index)
    }

    /// Returns the cached score, or `None` if the genes changed since the
    /// last evaluation.
    pub fn fitness(&self) -> Option<f64> {
        self.evaluated.then_some(self.score)
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Number of successful evaluator calls made for this genome.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Returns the cached score, calling the evaluator first if the genome is
    /// not evaluated.
    ///
    /// # Errors
    ///
    /// - `GeneticError::Configuration` if no evaluator is set.
    /// - `GeneticError::FitnessEvaluation` if the evaluator fails or returns a
    ///   non-finite score.
    pub fn evaluate(&mut self) -> Result<f64> {
        if self.evaluated {
            return Ok(self.score);
        }
        self.reevaluate()
    }

    /// Calls the evaluator even if the cached score is current.
    pub fn reevaluate(&mut self) -> Result<f64> {
        let evaluator = self.evaluator.clone().ok_or_else(|| {
            GeneticError::Configuration("Genome has no evaluator".to_string())
        })?;

        let score = evaluator
            .evaluate(self, self.user_data.as_ref())
            .map_err(|e| match e {
                GeneticError::FitnessEvaluation(msg) => GeneticError::FitnessEvaluation(msg),
                other => GeneticError::FitnessEvaluation(other.to_string()),
            })?;

        if !score.is_finite() {
            return Err(GeneticError::FitnessEvaluation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }

        self.score = score;
        self.evaluated = true;
        self.evaluations += 1;
        Ok(score)
    }
}

impl<T: Clone> ListGenome<T> {
    /// Replaces the genes and the evaluated/fitness state with a copy of
    /// `other`'s. The evaluator and user data of `self` are kept.
    pub fn copy_from(&mut self, other: &ListGenome<T>) {
        self.list = other.list.clone();
        self.score = other.score;
        self.evaluated = other.evaluated;
    }

    pub fn clone_with(&self, method: CloneMethod) -> Self {
        let list = match method {
            CloneMethod::Contents => self.list.clone(),
            CloneMethod::Attributes => OrderedList::new(),
        };
        Self {
            list,
            score: 0.0,
            evaluated: false,
            evaluations: 0,
            evaluator: self.evaluator.clone(),
            user_data: self.user_data.clone(),
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.list.to_vec()
    }
}

impl<T: PartialEq> ListGenome<T> {
    /// Fraction of positions at which the two genomes differ. Positions past
    /// the end of the shorter genome count as differences.
    pub fn diversity(&self, other: &ListGenome<T>) -> f64 {
        let longest = self.len().max(other.len());
        if longest == 0 {
            return 0.0;
        }
        let mismatched = self
            .iter()
            .zip(other.iter())
            .filter(|(a, b)| a != b)
            .count();
        let unmatched = self.len().abs_diff(other.len());
        (mismatched + unmatched) as f64 / longest as f64
    }

    pub fn contains(&self, value: &T) -> bool {
        self.list.contains(value)
    }
}

impl<T> Default for ListGenome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Genomes are equal when their genes are, whatever their fitness state.
impl<T: PartialEq> PartialEq for ListGenome<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl<T: fmt::Debug> fmt::Debug for ListGenome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListGenome")
            .field("genes", &self.list)
            .field("fitness", &self.fitness())
            .field("evaluations", &self.evaluations)
            .field("has_evaluator", &self.evaluator.is_some())
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for ListGenome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list)
    }
}

impl<T> FromIterator<T> for ListGenome<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_list(iter.into_iter().collect())
    }
}
