use std::sync::Arc;

use tracing::warn;

use crate::{
    error::{GeneticError, Result},
    genome::{Evaluator, Gene, ListGenome, UserData},
    operators::{is_permutation_of, CrossoverOperator, GeneGenerator, MutationOperator},
    rng::RandomNumberGenerator,
    selection::SelectionStrategy,
};

use super::{driver::EvolutionDriver, initializer::Initializer, options::EvolutionOptions};

/// Assembles an [`EvolutionDriver`] and rejects inconsistent configurations.
///
/// # Examples
///
/// ```
/// use genlist::evolution::{EvolutionDriverBuilder, EvolutionOptions, PermutationInitializer};
/// use genlist::genome::{ListGenome, UserData};
/// use genlist::operators::CrossoverOperator;
/// use genlist::selection::TournamentSelection;
///
/// let prototype = ListGenome::new().with_evaluator(|g: &ListGenome<u32>, _: Option<&UserData>| {
///     // reward genes that sit at their own index
///     Ok(g.iter().enumerate().filter(|&(i, &v)| i as u32 == v).count() as f64)
/// });
///
/// let mut driver = EvolutionDriverBuilder::new()
///     .with_prototype(prototype)
///     .with_initializer(PermutationInitializer::new((0..8u32).collect::<Vec<_>>()))
///     .with_crossover(CrossoverOperator::PartialMatch)
///     .with_selection_strategy(TournamentSelection::default())
///     .with_options(EvolutionOptions::new(20, 30, 0.9, 0.05))
///     .with_seed(17)
///     .build()
///     .unwrap();
///
/// let result = driver.evolve().unwrap();
/// assert_eq!(result.generations, 30);
/// assert_eq!(result.genome.len(), 8);
/// ```
pub struct EvolutionDriverBuilder<T, S>
where
    S: SelectionStrategy,
{
    options: EvolutionOptions,
    prototype: Option<ListGenome<T>>,
    initializer: Option<Box<dyn Initializer<T>>>,
    crossover: CrossoverOperator,
    mutation: MutationOperator,
    generator: Option<Arc<dyn GeneGenerator<T>>>,
    selection_strategy: Option<S>,
    rng: Option<RandomNumberGenerator>,
}

impl<T, S> EvolutionDriverBuilder<T, S>
where
    T: Gene,
    S: SelectionStrategy,
{
    pub fn new() -> Self {
        Self {
            options: EvolutionOptions::default(),
            prototype: None,
            initializer: None,
            crossover: CrossoverOperator::default(),
            mutation: MutationOperator::default(),
            generator: None,
            selection_strategy: None,
            rng: None,
        }
    }

    /// Sets the genome every individual is cloned from. Its evaluator and user
    /// data are shared by the whole population.
    pub fn with_prototype(mut self, prototype: ListGenome<T>) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Sets the evaluator on the prototype, creating an empty prototype if
    /// none was given.
    pub fn with_evaluator<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&ListGenome<T>, Option<&UserData>) -> Result<f64> + Send + Sync + 'static,
    {
        let mut prototype = self.prototype.take().unwrap_or_default();
        prototype.set_evaluator(Arc::new(evaluator) as Arc<dyn Evaluator<T>>);
        self.prototype = Some(prototype);
        self
    }

    pub fn with_initializer<I>(mut self, initializer: I) -> Self
    where
        I: Initializer<T> + 'static,
    {
        self.initializer = Some(Box::new(initializer));
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverOperator) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation(mut self, mutation: MutationOperator) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the source of fresh genes for destructive mutation.
    pub fn with_gene_generator<G>(mut self, generator: G) -> Self
    where
        G: GeneGenerator<T> + 'static,
    {
        self.generator = Some(Arc::new(generator));
        self
    }

    pub fn with_selection_strategy(mut self, selection_strategy: S) -> Self {
        self.selection_strategy = Some(selection_strategy);
        self
    }

    /// Seeds the run's random number generator for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(RandomNumberGenerator::from_seed(seed));
        self
    }

    pub fn with_rng(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Builds the driver.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` when a required part is missing
    /// or the parts do not fit together.
    pub fn build(self) -> Result<EvolutionDriver<T, S>> {
        let prototype = self
            .prototype
            .ok_or_else(|| rejected("Evaluator not specified"))?;
        if !prototype.has_evaluator() {
            return Err(rejected("Evaluator not specified"));
        }

        let initializer = self
            .initializer
            .ok_or_else(|| rejected("Initializer not specified"))?;

        let selection_strategy = self
            .selection_strategy
            .ok_or_else(|| rejected("Selection strategy not specified"))?;

        if self.mutation.requires_generator() && self.generator.is_none() {
            return Err(rejected("Destructive mutation requires a gene generator"));
        }

        if self.mutation == MutationOperator::Destructive && self.crossover.requires_permutation()
        {
            return Err(rejected(&format!(
                "Destructive mutation breaks the permutations {:?} crossover requires",
                self.crossover
            )));
        }

        check_options(&self.options)?;
        check_prototype(&prototype, self.crossover)?;

        Ok(EvolutionDriver::new(
            self.options,
            prototype,
            initializer,
            self.crossover,
            self.mutation,
            self.generator,
            selection_strategy,
            self.rng.unwrap_or_default(),
        ))
    }
}

impl<T, S> Default for EvolutionDriverBuilder<T, S>
where
    T: Gene,
    S: SelectionStrategy,
{
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(message: &str) -> GeneticError {
    warn!(reason = message, "Rejected evolution configuration");
    GeneticError::Configuration(message.to_string())
}

fn check_options(options: &EvolutionOptions) -> Result<()> {
    if options.get_population_size() == 0 {
        return Err(rejected("Population size cannot be zero"));
    }

    let probabilities = [
        ("Crossover", options.get_crossover_probability()),
        ("Mutation", options.get_mutation_probability()),
    ];
    for (name, probability) in probabilities {
        if !(0.0..=1.0).contains(&probability) {
            return Err(rejected(&format!(
                "{} probability must be in [0, 1], got {}",
                name, probability
            )));
        }
    }

    if options.is_elitism() && options.get_elite_count() > options.get_population_size() {
        return Err(rejected(&format!(
            "Elite count ({}) cannot exceed the population size ({})",
            options.get_elite_count(),
            options.get_population_size()
        )));
    }
    Ok(())
}

/// A prototype that already holds genes must be usable by the crossover.
fn check_prototype<T: PartialEq + Clone>(
    prototype: &ListGenome<T>,
    crossover: CrossoverOperator,
) -> Result<()> {
    if prototype.is_empty() {
        return Ok(());
    }
    if prototype.len() < 2 {
        return Err(rejected("Prototype genomes must hold at least 2 genes"));
    }
    if crossover.requires_permutation() {
        let genes = prototype.to_vec();
        if !is_permutation_of(&genes, &genes) {
            return Err(rejected(&format!(
                "{:?} crossover requires distinct genes in the prototype",
                crossover
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::options::EvolutionOptions;
    use crate::evolution::PermutationInitializer;
    use crate::selection::RouletteWheelSelection;

    fn base() -> EvolutionDriverBuilder<u8, RouletteWheelSelection> {
        EvolutionDriverBuilder::new()
            .with_evaluator(|g: &ListGenome<u8>, _: Option<&UserData>| {
                Ok(g.get(0).copied().unwrap_or(0) as f64)
            })
            .with_initializer(PermutationInitializer::new(vec![1u8, 2, 3, 4]))
            .with_selection_strategy(RouletteWheelSelection::new())
            .with_options(EvolutionOptions::new(6, 3, 0.9, 0.1))
    }

    fn assert_configuration_error<S: SelectionStrategy>(
        result: Result<EvolutionDriver<u8, S>>,
    ) {
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_valid_configuration_builds() {
        let driver = base().with_seed(1).build().unwrap();
        assert_eq!(driver.generation(), 0);
        assert!(!driver.is_done());
    }

    #[test]
    fn test_missing_parts() {
        let no_evaluator = EvolutionDriverBuilder::<u8, RouletteWheelSelection>::new()
            .with_initializer(PermutationInitializer::new(vec![1u8, 2]))
            .with_selection_strategy(RouletteWheelSelection::new())
            .build();
        assert_configuration_error(no_evaluator);

        let prototype_without_evaluator = base().with_prototype(ListGenome::new()).build();
        assert_configuration_error(prototype_without_evaluator);

        let no_selection = EvolutionDriverBuilder::<u8, RouletteWheelSelection>::new()
            .with_evaluator(|_: &ListGenome<u8>, _: Option<&UserData>| Ok(0.0))
            .with_initializer(PermutationInitializer::new(vec![1u8, 2]))
            .build();
        assert_configuration_error(no_selection);

        let no_initializer = EvolutionDriverBuilder::<u8, RouletteWheelSelection>::new()
            .with_evaluator(|_: &ListGenome<u8>, _: Option<&UserData>| Ok(0.0))
            .with_selection_strategy(RouletteWheelSelection::new())
            .build();
        assert_configuration_error(no_initializer);
    }

    #[test]
    fn test_destructive_mutation_rules() {
        let no_generator = base().with_mutation(MutationOperator::Destructive).build();
        assert_configuration_error(no_generator);

        let with_permutation_crossover = base()
            .with_mutation(MutationOperator::Destructive)
            .with_gene_generator(|rng: &mut RandomNumberGenerator| rng.gen_index(4) as u8)
            .with_crossover(CrossoverOperator::Cycle)
            .build();
        assert_configuration_error(with_permutation_crossover);

        let with_one_point = base()
            .with_mutation(MutationOperator::Destructive)
            .with_gene_generator(|rng: &mut RandomNumberGenerator| rng.gen_index(4) as u8)
            .with_crossover(CrossoverOperator::OnePoint)
            .build();
        assert!(with_one_point.is_ok());
    }

    #[test]
    fn test_option_ranges() {
        assert_configuration_error(base().with_options(EvolutionOptions::new(0, 3, 0.9, 0.1)).build());
        assert_configuration_error(base().with_options(EvolutionOptions::new(6, 3, 1.5, 0.1)).build());
        assert_configuration_error(base().with_options(EvolutionOptions::new(6, 3, 0.9, -0.1)).build());
        assert_configuration_error(
            base()
                .with_options(EvolutionOptions::new(6, 3, f64::NAN, 0.1))
                .build(),
        );

        let too_many_elites = EvolutionOptions::builder()
            .population_size(3)
            .elite_count(4)
            .build();
        assert_configuration_error(base().with_options(too_many_elites).build());

        let elites_ignored_without_elitism = EvolutionOptions::builder()
            .population_size(3)
            .elitism(false)
            .elite_count(4)
            .build();
        assert!(base().with_options(elites_ignored_without_elitism).build().is_ok());
    }

    #[test]
    fn test_prototype_preconditions() {
        let evaluator = |_: &ListGenome<u8>, _: Option<&UserData>| Ok(1.0);

        let single_gene: ListGenome<u8> = vec![1].into_iter().collect();
        assert_configuration_error(
            base()
                .with_prototype(single_gene.with_evaluator(evaluator))
                .build(),
        );

        let duplicates: ListGenome<u8> = vec![1, 1, 2].into_iter().collect();
        assert_configuration_error(
            base()
                .with_prototype(duplicates.clone().with_evaluator(evaluator))
                .with_crossover(CrossoverOperator::PartialMatch)
                .build(),
        );
        assert!(base()
            .with_prototype(duplicates.with_evaluator(evaluator))
            .with_crossover(CrossoverOperator::OnePoint)
            .build()
            .is_ok());
    }
}
