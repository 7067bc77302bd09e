//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the configuration of a run: population
//! size, number of generations, crossover and mutation probabilities, elitism,
//! the stop condition, the logging level and the parallel evaluation
//! threshold.
//!
//! ## Example
//!
//! ```rust
//! use genlist::evolution::options::{EvolutionOptions, LogLevel, StopCondition};
//!
//! // Create a new EvolutionOptions instance with custom parameters
//! let custom_options = EvolutionOptions::new(50, 100, 0.9, 0.01);
//! assert_eq!(custom_options.get_population_size(), 50);
//!
//! // Or through the builder
//! let options = EvolutionOptions::builder()
//!     .population_size(30)
//!     .num_generations(200)
//!     .elitism(true)
//!     .stop_condition(StopCondition::Convergence { window: 20, ratio: 0.001 })
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert!(options.is_elitism());
//! ```
//!
//! ## `LogLevel`
//!
//! - `Verbose`: one `info!` summary per generation plus a `debug!` event per individual.
//! - `Minimal`: one `info!` summary per generation.
//! - `None`: no per-generation events.

/// How chatty the driver is while it runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Minimal,
    None,
}

/// When a run reaches its terminal state.
///
/// Every condition is bounded by the configured number of generations.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StopCondition {
    /// Stop after `num_generations` generations.
    #[default]
    Generations,
    /// Stop once the best-ever score has improved by no more than `ratio`
    /// (relative to its magnitude) over the last `window` generations.
    Convergence { window: usize, ratio: f64 },
}

pub(crate) const DEFAULT_POPULATION_SIZE: usize = 50;
pub(crate) const DEFAULT_NUM_GENERATIONS: usize = 100;
pub(crate) const DEFAULT_CROSSOVER_PROBABILITY: f64 = 0.9;
pub(crate) const DEFAULT_MUTATION_PROBABILITY: f64 = 0.01;
pub(crate) const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EvolutionOptions {
    population_size: usize,
    num_generations: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    elitism: bool,
    /// Number of individuals copied unchanged when elitism is on
    elite_count: usize,
    stop_condition: StopCondition,
    log_level: LogLevel,
    /// Minimum number of dirty genomes to evaluate in parallel
    parallel_threshold: usize,
}

impl EvolutionOptions {
    /// Creates options with the given sizes and probabilities; everything
    /// else takes its default.
    pub fn new(
        population_size: usize,
        num_generations: usize,
        crossover_probability: f64,
        mutation_probability: f64,
    ) -> Self {
        Self {
            population_size,
            num_generations,
            crossover_probability,
            mutation_probability,
            ..Self::default()
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn get_mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn is_elitism(&self) -> bool {
        self.elitism
    }

    pub fn get_elite_count(&self) -> usize {
        self.elite_count
    }

    pub fn get_stop_condition(&self) -> &StopCondition {
        &self.stop_condition
    }

    pub fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }

    /// Returns the minimum number of dirty genomes evaluated in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Sets the population size.
    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    /// Sets the number of generations.
    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    /// Sets the crossover probability.
    pub fn set_crossover_probability(&mut self, probability: f64) {
        self.crossover_probability = probability;
    }

    /// Sets the per-gene mutation probability.
    pub fn set_mutation_probability(&mut self, probability: f64) {
        self.mutation_probability = probability;
    }

    /// Turns elitism on or off.
    pub fn set_elitism(&mut self, elitism: bool) {
        self.elitism = elitism;
    }

    /// Sets the number of elites.
    pub fn set_elite_count(&mut self, elite_count: usize) {
        self.elite_count = elite_count;
    }

    pub fn set_stop_condition(&mut self, stop_condition: StopCondition) {
        self.stop_condition = stop_condition;
    }

    /// Sets the log level.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Number of elites actually carried over each generation.
    pub(crate) fn effective_elites(&self) -> usize {
        if self.elitism {
            self.elite_count
        } else {
            0
        }
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use genlist::evolution::options::{EvolutionOptions, LogLevel};
    ///
    /// let options = EvolutionOptions::builder()
    ///     .population_size(50)
    ///     .num_generations(200)
    ///     .crossover_probability(0.8)
    ///     .mutation_probability(0.05)
    ///     .log_level(LogLevel::Minimal)
    ///     .parallel_threshold(500)
    ///     .build();
    /// assert_eq!(options.get_num_generations(), 200);
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            num_generations: DEFAULT_NUM_GENERATIONS,
            crossover_probability: DEFAULT_CROSSOVER_PROBABILITY,
            mutation_probability: DEFAULT_MUTATION_PROBABILITY,
            elitism: true,
            elite_count: 1,
            stop_condition: StopCondition::Generations,
            log_level: LogLevel::None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
/// Unset fields take the defaults of [`EvolutionOptions::default`].
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    num_generations: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    elitism: Option<bool>,
    elite_count: Option<usize>,
    stop_condition: Option<StopCondition>,
    log_level: Option<LogLevel>,
    parallel_threshold: Option<usize>,
}

impl EvolutionOptionsBuilder {
    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    /// Sets the number of generations.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the crossover probability.
    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    pub fn elitism(mut self, value: bool) -> Self {
        self.elitism = Some(value);
        self
    }

    pub fn elite_count(mut self, value: usize) -> Self {
        self.elite_count = Some(value);
        self
    }

    pub fn stop_condition(mut self, value: StopCondition) -> Self {
        self.stop_condition = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    ///
    /// Values are checked when the driver is built, not here.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            crossover_probability: self
                .crossover_probability
                .unwrap_or(defaults.crossover_probability),
            mutation_probability: self
                .mutation_probability
                .unwrap_or(defaults.mutation_probability),
            elitism: self.elitism.unwrap_or(defaults.elitism),
            elite_count: self.elite_count.unwrap_or(defaults.elite_count),
            stop_condition: self.stop_condition.unwrap_or(defaults.stop_condition),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
        }
    }
}
