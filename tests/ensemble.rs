use chrono::NaiveDate;
use wfbundle::config::{BacktestConfig, ConfigGrid};
use wfbundle::data::{ReturnTable, SyntheticData, TurnoverTable};
use wfbundle::engines::evaluation::{EnsembleRunner, FullBacktester};
use wfbundle::functions::{score_fn, ScoreDescriptor, ScoreSignature, ScoringRegistry};
use wfbundle::types::SortDirection;
use wfbundle::WfError;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn synthetic() -> (ReturnTable, TurnoverTable) {
    SyntheticData {
        start: d(2016, 1, 1),
        end: d(2019, 12, 31),
        n_assets: 15,
        seed: 3,
        volatility: 0.01,
        max_turnover: 0.02,
    }
    .generate()
    .unwrap()
}

fn base_config(metric: &str) -> BacktestConfig {
    BacktestConfig {
        first_os: d(2016, 12, 31),
        window_length: 12,
        step_months: 6,
        metric_name: metric.to_string(),
        top_n: 8,
        max_corr: 0.4,
        max_columns: 4,
        ..Default::default()
    }
}

#[test]
fn test_unknown_score_does_not_abort_siblings() {
    let (returns, turnover) = synthetic();
    let registry = ScoringRegistry::with_defaults();
    let configs = vec![
        base_config("sharpe"),
        base_config("no_such_metric"),
        base_config("momentum"),
    ];

    let ensemble = EnsembleRunner::new(&returns, Some(&turnover), &registry).run(&configs);

    assert_eq!(ensemble.len(), 3);
    assert!(ensemble.get("sharpe_WL12_Rolling_Step6").unwrap().is_some());
    assert!(ensemble.get("momentum_WL12_Rolling_Step6").unwrap().is_some());
    assert!(matches!(
        ensemble.failures.get("no_such_metric_WL12_Rolling_Step6"),
        Some(WfError::UnknownScore(_))
    ));
}

#[test]
fn test_results_match_standalone_backtests() {
    let (returns, turnover) = synthetic();
    let registry = ScoringRegistry::with_defaults();
    let grid = ConfigGrid {
        first_os: vec![d(2016, 12, 31)],
        window_length: vec![6, 12],
        step_months: vec![3],
        anchored: vec![true, false],
        metric_name: vec!["sharpe".to_string(), "max_drawdown".to_string(), "avg_trade".to_string()],
        ..Default::default()
    };
    let configs = grid.expand();
    assert_eq!(configs.len(), 12);

    let ensemble = EnsembleRunner::new(&returns, Some(&turnover), &registry).run(&configs);
    assert!(ensemble.failures.is_empty());
    assert_eq!(ensemble.results.len(), 12);

    for config in &configs {
        let standalone = FullBacktester::from_registry(&returns, Some(&turnover), config.clone(), &registry)
            .unwrap()
            .run()
            .unwrap()
            .aggregate;
        assert_eq!(ensemble.get(&config.label()).unwrap(), &standalone);
    }
}

#[test]
fn test_grid_over_selection_knobs_keeps_every_result() {
    let (returns, turnover) = synthetic();
    let registry = ScoringRegistry::with_defaults();
    let grid = ConfigGrid {
        first_os: vec![d(2016, 12, 31)],
        step_months: vec![6],
        top_n: vec![3, 8],
        max_corr: vec![0.2, 0.5, 0.9],
        ..Default::default()
    };
    let configs = grid.expand();
    assert_eq!(configs.len(), 6);

    let ensemble = EnsembleRunner::new(&returns, Some(&turnover), &registry).run(&configs);
    assert!(ensemble.failures.is_empty());
    assert_eq!(ensemble.results.len(), 6);

    for config in &configs {
        let standalone = FullBacktester::from_registry(&returns, Some(&turnover), config.clone(), &registry)
            .unwrap()
            .run()
            .unwrap()
            .aggregate;
        assert_eq!(ensemble.get(&config.label()).unwrap(), &standalone);
    }
}

#[test]
fn test_turnover_score_without_turnover_fails_only_that_run() {
    let (returns, _) = synthetic();
    let registry = ScoringRegistry::with_defaults();
    let configs = vec![base_config("avg_trade"), base_config("highest_return")];

    let ensemble = EnsembleRunner::new(&returns, None, &registry).run(&configs);
    assert!(matches!(
        ensemble.failures.get("avg_trade_WL12_Rolling_Step6"),
        Some(WfError::Configuration(_))
    ));
    let aggregate = ensemble.get("highest_return_WL12_Rolling_Step6").unwrap().as_ref().unwrap();
    assert!(aggregate.overall_avg_trade.is_none());
}

#[test]
fn test_configuration_without_oos_windows_maps_to_none() {
    let (returns, turnover) = synthetic();
    let registry = ScoringRegistry::with_defaults();
    let late = BacktestConfig {
        first_os: d(2019, 9, 30),
        name: Some("too_late".to_string()),
        ..base_config("sharpe")
    };

    let ensemble = EnsembleRunner::new(&returns, Some(&turnover), &registry).run(&[late]);
    assert_eq!(ensemble.get("too_late"), Some(&None));
}

#[test]
fn test_duplicate_label_keeps_later_configuration() {
    let (returns, turnover) = synthetic();
    let registry = ScoringRegistry::with_defaults();
    let first = BacktestConfig { top_n: 1, ..base_config("sharpe") };
    let second = BacktestConfig { top_n: 8, ..base_config("sharpe") };
    assert_eq!(first.label(), second.label());

    let ensemble = EnsembleRunner::new(&returns, Some(&turnover), &registry).run(&[first, second.clone()]);
    assert_eq!(ensemble.len(), 1);

    let expected = FullBacktester::from_registry(&returns, Some(&turnover), second, &registry)
        .unwrap()
        .run()
        .unwrap()
        .aggregate;
    assert_eq!(ensemble.get("sharpe_WL12_Rolling_Step6").unwrap(), &expected);
}

#[test]
fn test_custom_registered_score() {
    let (returns, turnover) = synthetic();
    let mut registry = ScoringRegistry::with_defaults();
    registry.register(
        "last_return",
        ScoreDescriptor::new(SortDirection::Descending, ScoreSignature::Returns),
        score_fn(|args| {
            Ok(args
                .returns()
                .iter()
                .map(|col| col.last().copied().unwrap_or(f64::NAN))
                .collect())
        }),
    );

    let ensemble =
        EnsembleRunner::new(&returns, Some(&turnover), &registry).run(&[base_config("last_return")]);
    assert!(ensemble.failures.is_empty());
    assert!(ensemble.get("last_return_WL12_Rolling_Step6").unwrap().is_some());
}
