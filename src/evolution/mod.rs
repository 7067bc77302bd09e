pub mod builder;
pub mod driver;
pub mod initializer;
pub mod options;
pub mod population;
pub mod statistics;

pub use builder::EvolutionDriverBuilder;
pub use driver::{EvolutionDriver, EvolutionResult, RunState};
pub use initializer::{Initializer, PermutationInitializer};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel, StopCondition};
pub use population::Population;
pub use statistics::{GenerationRecord, OperatorCounters, Statistics};
