//! Tests for algorithm configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42
        constructive = "grasp_random_greedy"
        ls_order = "collapse_second"
        algorithm = "general_vns"
        max_k_pct = 0.3
        iterations = 4

        [alpha]
        type = "random"

        [termination]
        minutes_spent_limit = 2
        step_count_limit = 500
    "#;

    let config = AlgorithmConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.constructive, ConstructiveType::GraspRandomGreedy);
    assert_eq!(config.alpha, AlphaConfig::Random);
    assert_eq!(config.ls_order, LocalSearchOrder::CollapseSecond);
    assert_eq!(config.algorithm, AlgorithmShape::GeneralVns);
    assert_eq!(config.max_k_pct, 0.3);
    assert_eq!(config.iterations, 4);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(120)));
    assert_eq!(config.step_limit(), Some(500));
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        random_seed: 42
        constructive: grasp_greedy_random
        alpha:
          type: fixed
          value: 0.4
        algorithm: vns
        termination:
          seconds_spent_limit: 30
    "#;

    let config = AlgorithmConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.alpha, AlphaConfig::Fixed { value: 0.4 });
    assert_eq!(config.algorithm, AlgorithmShape::Vns);
    assert_eq!(config.max_k_pct, 0.5);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = AlgorithmConfig::from_toml_str("").unwrap();
    assert_eq!(config, AlgorithmConfig::default());
    assert_eq!(config.constructive, ConstructiveType::Random);
    assert_eq!(config.algorithm, AlgorithmShape::SinglePass);
    assert_eq!(config.time_limit(), None);
}

#[test]
fn test_unknown_variant_fails_to_parse() {
    let err = AlgorithmConfig::from_toml_str(r#"constructive = "beam_search""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));

    let err = AlgorithmConfig::from_yaml_str("algorithm: tabu").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_builder() {
    let config = AlgorithmConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_constructive(ConstructiveType::SmallPieces)
        .with_algorithm(AlgorithmShape::GeneralVns)
        .with_ls_order(LocalSearchOrder::CollapseSecond)
        .with_iterations(3);

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.constructive, ConstructiveType::SmallPieces);
    assert_eq!(config.iterations, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_inconsistent_combinations() {
    let grasp_without_alpha =
        AlgorithmConfig::new().with_constructive(ConstructiveType::GraspGreedyRandom);
    assert!(matches!(
        grasp_without_alpha.validate(),
        Err(ConfigError::Invalid(_))
    ));

    let alpha_out_of_range = AlgorithmConfig::new()
        .with_constructive(ConstructiveType::GraspRandomGreedy)
        .with_alpha(AlphaConfig::Fixed { value: 1.5 });
    assert!(alpha_out_of_range.validate().is_err());

    let mut bad_k = AlgorithmConfig::new();
    bad_k.max_k_pct = f64::NAN;
    assert!(bad_k.validate().is_err());

    let zero_runs = AlgorithmConfig::new().with_iterations(0);
    assert!(zero_runs.validate().is_err());
}

#[test]
fn test_config_error_converts_to_core_error() {
    let err: LotForgeError = ConfigError::Invalid("bad".into()).into();
    assert!(matches!(err, LotForgeError::Config(ref msg) if msg.contains("bad")));
}
