//! # EvolutionDriver
//!
//! The generational loop. A driver is assembled by
//! [`EvolutionDriverBuilder`](super::builder::EvolutionDriverBuilder) and then
//! moves through three states:
//!
//! - `Ready`: built, or reset by a failed initialization.
//! - `Running`: the population is initialized and evaluated.
//! - `Terminal`: the stop condition fired. Only `initialize` is accepted.
//!
//! Each generation carries the elites over unchanged, fills the rest of the
//! population with recombined and mutated offspring of selected parents,
//! evaluates what changed and records statistics.

use std::sync::Arc;

use tracing::{debug, info};

use super::{
    initializer::Initializer,
    options::{EvolutionOptions, LogLevel, StopCondition},
    population::Population,
    statistics::{OperatorCounters, Statistics},
};
use crate::{
    error::{GeneticError, OptionExt, Result},
    genome::{CloneMethod, Gene, ListGenome},
    operators::{is_permutation_of, CrossoverOperator, GeneGenerator, MutationOperator},
    rng::RandomNumberGenerator,
    selection::SelectionStrategy,
};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Running,
    Terminal,
}

/// Represents the result of an evolution: the best genome ever seen and its score.
#[derive(Debug, Clone)]
pub struct EvolutionResult<T> {
    /// Deep copy of the best genome.
    pub genome: ListGenome<T>,
    /// The fitness score of the genome.
    pub score: f64,
    /// Number of generations the run completed.
    pub generations: usize,
}

/// Owns the population and drives it through the generations.
pub struct EvolutionDriver<T, S>
where
    S: SelectionStrategy,
{
    options: EvolutionOptions,
    prototype: ListGenome<T>,
    initializer: Box<dyn Initializer<T>>,
    crossover: CrossoverOperator,
    mutation: MutationOperator,
    generator: Option<Arc<dyn GeneGenerator<T>>>,
    selection: S,
    rng: RandomNumberGenerator,
    population: Population<T>,
    statistics: Statistics<T>,
    state: RunState,
}

impl<T, S> EvolutionDriver<T, S>
where
    T: Gene,
    S: SelectionStrategy,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        options: EvolutionOptions,
        prototype: ListGenome<T>,
        initializer: Box<dyn Initializer<T>>,
        crossover: CrossoverOperator,
        mutation: MutationOperator,
        generator: Option<Arc<dyn GeneGenerator<T>>>,
        selection: S,
        rng: RandomNumberGenerator,
    ) -> Self {
        Self {
            options,
            prototype,
            initializer,
            crossover,
            mutation,
            generator,
            selection,
            rng,
            population: Population::new(),
            statistics: Statistics::new(),
            state: RunState::Ready,
        }
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn population(&self) -> &Population<T> {
        &self.population
    }

    pub fn statistics(&self) -> &Statistics<T> {
        &self.statistics
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.statistics.generation()
    }

    pub fn is_done(&self) -> bool {
        self.state == RunState::Terminal
    }

    /// Best genome seen so far in this run.
    pub fn best(&self) -> Option<&ListGenome<T>> {
        self.statistics.best_ever()
    }

    /// Starts a fresh run: creates, fills, validates and evaluates the
    /// initial population and records it as generation 0.
    ///
    /// # Errors
    ///
    /// - `GeneticError::Configuration` if the initialized genomes do not meet
    ///   the crossover's preconditions.
    /// - `GeneticError::FitnessEvaluation` if the evaluator fails.
    ///
    /// On error the driver is left `Ready` with an empty population.
    pub fn initialize(&mut self) -> Result<()> {
        self.state = RunState::Ready;
        self.population = Population::new();
        self.statistics = Statistics::new();

        let size = self.options.get_population_size();
        let mut genomes = Vec::with_capacity(size);
        for _ in 0..size {
            let mut genome = self.prototype.clone_with(CloneMethod::Attributes);
            self.initializer.initialize(&mut genome, &mut self.rng);
            genomes.push(genome);
        }
        self.validate(&genomes)?;

        let mut population = Population::from_genomes(genomes);
        let evaluations = population.evaluate(self.options.get_parallel_threshold())?;
        self.statistics.counters_mut().evaluations += evaluations;
        self.statistics.record(0, &population);
        self.population = population;
        self.state = RunState::Running;

        info!(
            population_size = size,
            crossover = ?self.crossover,
            mutation = ?self.mutation,
            "Evolution initialized"
        );
        self.log_generation();

        if self.should_stop() {
            self.state = RunState::Terminal;
        }
        Ok(())
    }

    /// Runs one generation.
    ///
    /// # Errors
    ///
    /// - `GeneticError::Evolution` if the driver is not `Running`.
    /// - `GeneticError::FitnessEvaluation` if the evaluator fails. The
    ///   population and the generation counter are left as they were.
    pub fn step(&mut self) -> Result<()> {
        match self.state {
            RunState::Ready => {
                return Err(GeneticError::Evolution(
                    "The population has not been initialized".to_string(),
                ))
            }
            RunState::Terminal => {
                return Err(GeneticError::Evolution(
                    "The run has already terminated".to_string(),
                ))
            }
            RunState::Running => {}
        }

        let (mut next, mut counters) = self.breed()?;
        counters.evaluations = next.evaluate(self.options.get_parallel_threshold())?;

        let generation = self.statistics.generation() + 1;
        *self.statistics.counters_mut() += counters;
        let improved = self.statistics.record(generation, &next);
        self.population = next;

        if improved && self.options.get_log_level() != &LogLevel::None {
            if let Some(score) = self.statistics.best_ever_score() {
                info!(generation, score, "New best-ever genome");
            }
        }
        self.log_generation();

        if self.should_stop() {
            self.state = RunState::Terminal;
        }
        Ok(())
    }

    /// Runs generations until the stop condition fires and returns the best
    /// genome ever seen. A `Ready` driver is initialized first.
    ///
    /// # Errors
    ///
    /// - `GeneticError::Evolution` if the run has already terminated; call
    ///   [`initialize`](Self::initialize) to start over.
    /// - Any error from [`initialize`](Self::initialize) or [`step`](Self::step).
    pub fn evolve(&mut self) -> Result<EvolutionResult<T>> {
        match self.state {
            RunState::Terminal => {
                return Err(GeneticError::Evolution(
                    "The run has already terminated".to_string(),
                ))
            }
            RunState::Ready => self.initialize()?,
            RunState::Running => {}
        }

        while self.state == RunState::Running {
            self.step()?;
        }

        let counters = *self.statistics.counters();
        info!(
            generations = self.statistics.generation(),
            evaluations = counters.evaluations,
            crossovers = counters.crossovers,
            mutations = counters.mutations,
            best = ?self.statistics.best_ever_score(),
            "Evolution complete"
        );

        let genome = self
            .statistics
            .best_ever()
            .cloned()
            .ok_or_else_genetic(|| {
                GeneticError::Evolution("Evolution completed without a best genome".to_string())
            })?;
        let score = genome.fitness().ok_or_else_genetic(|| {
            GeneticError::Evolution("Best genome has no score".to_string())
        })?;

        Ok(EvolutionResult {
            genome,
            score,
            generations: self.statistics.generation(),
        })
    }

    /// Builds the next population from the current one, along with the
    /// operator counts of this generation. Offspring that were neither
    /// recombined nor mutated keep their parent's score.
    fn breed(&mut self) -> Result<(Population<T>, OperatorCounters)> {
        let size = self.options.get_population_size();
        let pc = self.options.get_crossover_probability();
        let pm = self.options.get_mutation_probability();
        let fitness = self.population.fitness()?;
        let current = self.population.genomes();

        let mut counters = OperatorCounters::default();
        let mut next: Vec<ListGenome<T>> = Vec::with_capacity(size);
        for index in self
            .population
            .ranked_indices()
            .into_iter()
            .take(self.options.effective_elites())
        {
            next.push(current[index].clone());
        }

        while next.len() < size {
            let parents = self.selection.select(&fitness, 2, &mut self.rng)?;
            let mom = *parents.first().ok_or(GeneticError::EmptyPopulation)?;
            let dad = parents.get(1).copied().unwrap_or(mom);
            counters.selections += parents.len();

            let wants_brother = size - next.len() >= 2;
            let mut sister = current[mom].clone();
            let mut brother = wants_brother.then(|| current[dad].clone());

            if self.rng.flip(pc) {
                self.crossover.apply(
                    &current[mom],
                    &current[dad],
                    Some(&mut sister),
                    brother.as_mut(),
                    &mut self.rng,
                )?;
                counters.crossovers += 1;
            }

            for child in std::iter::once(&mut sister).chain(brother.as_mut()) {
                let events =
                    self.mutation
                        .apply(child, pm, self.generator.as_deref(), &mut self.rng)?;
                counters.mutations += events;
            }

            next.push(sister);
            next.extend(brother);
        }

        Ok((Population::from_genomes(next), counters))
    }

    /// Checks the initialized genomes against the crossover's preconditions.
    fn validate(&self, genomes: &[ListGenome<T>]) -> Result<()> {
        let Some(first) = genomes.first() else {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        };
        if first.len() < 2 {
            return Err(GeneticError::Configuration(format!(
                "Initialized genomes must hold at least 2 genes, got {}",
                first.len()
            )));
        }

        let reference = first.to_vec();
        for (i, genome) in genomes.iter().enumerate() {
            if genome.len() != reference.len() {
                return Err(GeneticError::Configuration(format!(
                    "Individual {} has length {}, expected {}",
                    i,
                    genome.len(),
                    reference.len()
                )));
            }
            if self.crossover.requires_permutation()
                && !is_permutation_of(&genome.to_vec(), &reference)
            {
                return Err(GeneticError::Configuration(format!(
                    "Individual {} is not a permutation of the first individual's genes",
                    i
                )));
            }
        }
        Ok(())
    }

    fn should_stop(&self) -> bool {
        let generation = self.statistics.generation();
        if generation >= self.options.get_num_generations() {
            return true;
        }
        match self.options.get_stop_condition() {
            StopCondition::Generations => false,
            StopCondition::Convergence { window, ratio } => {
                self.statistics.has_converged(*window, *ratio)
            }
        }
    }

    fn log_generation(&self) {
        let level = self.options.get_log_level();
        if level == &LogLevel::None {
            return;
        }
        if let Some(record) = self.statistics.current() {
            info!(
                generation = record.generation,
                best = record.best,
                average = record.average,
                worst = record.worst,
                best_ever = record.best_ever,
                "Generation complete"
            );
        }
        if level == &LogLevel::Verbose {
            let generation = self.statistics.generation();
            for (index, genome) in self.population.iter().enumerate() {
                debug!(
                    generation,
                    index,
                    score = ?genome.fitness(),
                    genome = ?genome,
                    "Individual"
                );
            }
        }
    }
}

impl<T, S> std::fmt::Debug for EvolutionDriver<T, S>
where
    T: std::fmt::Debug,
    S: SelectionStrategy,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionDriver")
            .field("options", &self.options)
            .field("crossover", &self.crossover)
            .field("mutation", &self.mutation)
            .field("selection", &self.selection)
            .field("state", &self.state)
            .field("generation", &self.statistics.generation())
            .finish_non_exhaustive()
    }
}
