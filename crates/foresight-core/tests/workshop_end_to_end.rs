//! End-to-end: the AI progress x regulation 2x2 from driver list to
//! robustness report.

use foresight_core::{
    generate_matrix, Driver, DriverAnalysis, LinearScoring, OutcomeTableScoring, PlanningError,
    PlanningSession, Rating, SignpostTracker, StrategyTester, WeightingMode,
};

fn drivers() -> Vec<Driver> {
    vec![
        Driver::new(
            "AI Progress",
            ["Breakthrough", "Incremental"],
            Rating::High,
            Rating::High,
        )
        .unwrap(),
        Driver::new("Regulation", ["Heavy", "Light"], Rating::Medium, Rating::High).unwrap(),
    ]
}

#[test]
fn tech_utopia_signpost_reweights_the_matrix() {
    let mut matrix = generate_matrix(drivers()).unwrap();
    assert_eq!(matrix.len(), 4);
    for (_, p) in matrix.probabilities() {
        assert!((p - 0.25).abs() < 1e-12);
    }

    matrix
        .name_scenario(&["Breakthrough", "Light"], "Tech Utopia")
        .unwrap();

    let mut tracker = SignpostTracker::new();
    tracker
        .add_signpost("Frontier model tops expert benchmarks", "Tech Utopia", 0.4)
        .unwrap();
    tracker.trigger("Frontier model tops expert benchmarks").unwrap();
    tracker.probability_update(&mut matrix).unwrap();

    let utopia = matrix.scenario("Tech Utopia").unwrap().probability;
    assert!((utopia - 0.464).abs() < 1e-3);
    assert!((utopia - 0.65 / 1.4).abs() < 1e-12);

    for scenario in matrix.scenarios() {
        if scenario.name != "Tech Utopia" {
            assert!((scenario.probability - 0.179).abs() < 1e-3);
            assert!((scenario.probability - 0.25 / 1.4).abs() < 1e-12);
        }
    }
    assert!((matrix.probability_sum() - 1.0).abs() < 1e-12);
}

#[test]
fn typo_in_state_label_is_rejected() {
    let mut matrix = generate_matrix(drivers()).unwrap();
    let err = matrix
        .name_scenario(&["Breakthrough", "Ligth"], "Tech Utopia")
        .unwrap_err();
    assert_eq!(
        err,
        PlanningError::StateNotFound {
            driver: "Regulation".into(),
            state: "Ligth".into(),
        }
    );
}

#[test]
fn signpost_registered_before_matrix_exists() {
    let mut tracker = SignpostTracker::new();
    tracker.add_signpost("Licensing regime enacted", "Walled Garden", 0.3).unwrap();
    tracker.trigger("Licensing regime enacted").unwrap();

    let mut matrix = generate_matrix(drivers()).unwrap();
    assert!(tracker.probability_update(&mut matrix).unwrap_err().is_not_found());

    matrix
        .name_scenario(&["Breakthrough", "Heavy"], "Walled Garden")
        .unwrap();
    tracker.probability_update(&mut matrix).unwrap();
    let garden = matrix.scenario("Walled Garden").unwrap().probability;
    assert!((garden - 0.55 / 1.3).abs() < 1e-12);
}

#[test]
fn stress_test_follows_signpost_updates() {
    let mut matrix = generate_matrix(drivers()).unwrap();
    matrix
        .name_scenario(&["Breakthrough", "Light"], "Tech Utopia")
        .unwrap();
    matrix
        .name_scenario(&["Incremental", "Heavy"], "Slow Lane")
        .unwrap();

    let mut payoffs = OutcomeTableScoring::new();
    payoffs.set("Automate", "Tech Utopia", 10.0);
    payoffs.set("Automate", "Slow Lane", -6.0);
    payoffs.set("Diversify", "Tech Utopia", 3.0);
    payoffs.set("Diversify", "Slow Lane", 2.0);

    let mut tester = StrategyTester::new(WeightingMode::Normalized);
    tester.add_strategy("Automate", 0.5).unwrap();
    tester.add_strategy("Diversify", 0.5).unwrap();

    let before = tester.stress_test(&matrix, &payoffs).unwrap();

    let mut tracker = SignpostTracker::new();
    tracker.add_signpost("Compute cost halves", "Tech Utopia", 0.4).unwrap();
    tracker.trigger("Compute cost halves").unwrap();
    tracker.probability_update(&mut matrix).unwrap();

    let after = tester.stress_test(&matrix, &payoffs).unwrap();

    let automate_before = before.strategy("Automate").unwrap().expected;
    let automate_after = after.strategy("Automate").unwrap().expected;
    assert!(automate_after > automate_before);

    // Worst cases depend on payoffs, not probabilities
    assert_eq!(after.strategy("Automate").unwrap().worst_case.scenario, "Slow Lane");
    assert_eq!(after.most_robust().unwrap().strategy, "Diversify");
}

#[test]
fn weighting_mode_is_never_inferred() {
    let matrix = generate_matrix(drivers()).unwrap();

    let mut normalized = StrategyTester::new(WeightingMode::Normalized);
    normalized.add_strategy("Automate", 0.8).unwrap();
    normalized.add_strategy("Diversify", 0.8).unwrap();
    assert!(normalized
        .stress_test(&matrix, &LinearScoring)
        .unwrap_err()
        .is_configuration());

    normalized.set_mode(WeightingMode::Independent);
    assert!(normalized.stress_test(&matrix, &LinearScoring).is_ok());
}

#[test]
fn driver_analysis_feeds_the_session() {
    let mut analysis = DriverAnalysis::new();
    for d in drivers() {
        analysis.add_driver(d).unwrap();
    }
    analysis
        .add_driver(Driver::new("Talent Pool", ["Tight"], Rating::Low, Rating::High).unwrap())
        .unwrap();
    analysis
        .add_driver(Driver::new("Office Fashion", ["Open", "Closed"], Rating::Low, Rating::Low).unwrap())
        .unwrap();

    let mut session = PlanningSession::with_axes(analysis, 2, WeightingMode::Normalized).unwrap();
    let axes: Vec<&str> = session.matrix().drivers().iter().map(|d| d.name()).collect();
    assert_eq!(axes, vec!["AI Progress", "Regulation"]);

    session
        .builder()
        .name(&["Breakthrough", "Light"], "Tech Utopia")
        .unwrap();
    session
        .tracker_mut()
        .add_signpost("Compute cost halves", "Tech Utopia", 0.4)
        .unwrap();
    session.observe("Compute cost halves").unwrap();
    session.tester_mut().add_strategy("Automate", 1.0).unwrap();

    let report = session.report().unwrap();
    assert_eq!(report.predetermined_elements, vec!["Talent Pool".to_string()]);
    let robustness = report.robustness.unwrap();
    assert_eq!(robustness.strategies[0].best_case.scenario, "Tech Utopia");
}
