#![cfg(feature = "serde")]

use genlist::{
    evolution::{EvolutionOptions, LogLevel, OperatorCounters, StopCondition},
    list::OrderedList,
    operators::CrossoverOperator,
};

#[test]
fn test_ordered_list_serializes_as_sequence() {
    let list: OrderedList<u32> = vec![3, 1, 2].into_iter().collect();
    let json = serde_json::to_string(&list).unwrap();
    assert_eq!(json, "[3,1,2]");

    let back: OrderedList<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, list);
}

#[test]
fn test_options_survive_json() {
    let options = EvolutionOptions::builder()
        .population_size(12)
        .stop_condition(StopCondition::Convergence {
            window: 5,
            ratio: 0.01,
        })
        .log_level(LogLevel::Minimal)
        .build();

    let json = serde_json::to_string(&options).unwrap();
    let back: EvolutionOptions = serde_json::from_str(&json).unwrap();

    assert_eq!(back.get_population_size(), 12);
    assert_eq!(back.get_log_level(), &LogLevel::Minimal);
    assert_eq!(back.get_stop_condition(), options.get_stop_condition());
}

#[test]
fn test_operator_enums_and_counters() {
    let json = serde_json::to_string(&CrossoverOperator::Cycle).unwrap();
    assert_eq!(json, "\"Cycle\"");

    let counters = OperatorCounters {
        selections: 4,
        crossovers: 2,
        mutations: 1,
        evaluations: 6,
    };
    let back: OperatorCounters =
        serde_json::from_str(&serde_json::to_string(&counters).unwrap()).unwrap();
    assert_eq!(back, counters);
}
