use chrono::NaiveDate;
use wfbundle::data::{ReturnTable, SyntheticData};
use wfbundle::engines::metrics::RiskMetrics;
use wfbundle::engines::selection::{GreedyCorrelationFilter, SelectionParams, SelectionUnit};
use wfbundle::functions::ScoringRegistry;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn quarter_dates() -> Vec<NaiveDate> {
    SyntheticData::business_days(d(2020, 1, 1), d(2020, 3, 31))
}

#[test]
fn test_dominant_asset_ranks_first() {
    let dates = quarter_dates();
    let n = dates.len();

    let base: Vec<f64> = (0..n).map(|i| 0.001 * (i as f64).sin()).collect();
    let dominant: Vec<f64> = base.iter().map(|r| r + 0.002).collect();
    let laggard: Vec<f64> = (0..n).map(|i| -0.001 + 0.0005 * (i as f64).cos()).collect();

    let returns = ReturnTable::from_columns(
        dates,
        vec![
            ("laggard".to_string(), laggard),
            ("base".to_string(), base),
            ("dominant".to_string(), dominant),
        ],
    )
    .unwrap();

    let registry = ScoringRegistry::with_defaults();
    let scorer = registry.resolve("highest_return").unwrap();
    let params = SelectionParams {
        top_n: 2,
        max_corr: 1.1,
        ..Default::default()
    };

    let result = SelectionUnit::new(&returns, None, &params).perform_selection(&scorer).unwrap();
    assert_eq!(result.selected, vec!["dominant".to_string(), "base".to_string()]);
    assert!(result.selected_scores[0] > result.selected_scores[1]);
}

fn pattern(signs: &[f64], scale: f64) -> Vec<f64> {
    signs.iter().map(|s| s * scale).collect()
}

#[test]
fn test_perfectly_correlated_pair_keeps_first() {
    let x = pattern(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0], 0.01);
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 0.01).collect();
    let z = pattern(&[1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0], 0.01);

    let filter = GreedyCorrelationFilter::new(0.5, 2);
    assert_eq!(filter.filter(&[x.clone(), y.clone()]), vec![0]);
    assert_eq!(filter.filter(&[y.clone(), x.clone()]), vec![0]);
    // the unrelated column fills the second slot wherever the twin sits
    assert_eq!(filter.filter(&[x.clone(), y.clone(), z.clone()]), vec![0, 2]);
    assert_eq!(filter.filter(&[y, z, x]), vec![0, 1]);
}

#[test]
fn test_zero_turnover_asset_is_excluded() {
    let dates: Vec<NaiveDate> = (1..=8).map(|day| d(2021, 3, day)).collect();
    let x = pattern(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0], 0.01);
    let z = pattern(&[1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0], 0.01);

    let returns = ReturnTable::from_columns(
        dates.clone(),
        vec![("x".to_string(), x), ("z".to_string(), z)],
    )
    .unwrap();
    let turnover = ReturnTable::from_columns(
        dates,
        vec![("x".to_string(), vec![0.1; 8]), ("z".to_string(), vec![0.0; 8])],
    )
    .unwrap();

    let registry = ScoringRegistry::with_defaults();
    let scorer = registry.resolve("highest_return").unwrap();

    let without_threshold = SelectionParams::default();
    let result = SelectionUnit::new(&returns, Some(&turnover), &without_threshold)
        .perform_selection(&scorer)
        .unwrap();
    assert_eq!(result.filtered, vec!["x".to_string(), "z".to_string()]);
    assert!(result.avg_trade.is_none());

    let with_threshold = SelectionParams {
        min_avg_trade: Some(-10.0),
        ..Default::default()
    };
    let result = SelectionUnit::new(&returns, Some(&turnover), &with_threshold)
        .perform_selection(&scorer)
        .unwrap();
    assert_eq!(result.selected, vec!["x".to_string(), "z".to_string()]);
    assert_eq!(result.filtered, vec!["x".to_string()]);
    let ratios = result.avg_trade.unwrap();
    assert_eq!(ratios.len(), 1);
    assert!(ratios[0].abs() < 1e-12);
}

#[test]
fn test_selection_properties_on_synthetic_data() {
    let synthetic = SyntheticData {
        start: d(2020, 1, 1),
        end: d(2020, 6, 30),
        n_assets: 20,
        seed: 7,
        volatility: 0.01,
        max_turnover: 0.02,
    };
    let (returns, turnover) = synthetic.generate().unwrap();
    let registry = ScoringRegistry::with_defaults();

    for (metric, max_corr, max_columns) in [("sharpe", 0.1, 5), ("max_drawdown", 0.05, 3), ("momentum", 0.5, 10)] {
        let scorer = registry.resolve(metric).unwrap();
        let params = SelectionParams {
            top_n: 15,
            max_corr,
            max_columns,
            min_avg_trade: Some(0.0),
            ..Default::default()
        };
        let result = SelectionUnit::new(&returns, Some(&turnover), &params)
            .perform_selection(&scorer)
            .unwrap();

        assert_eq!(result.selected.len(), 15);
        assert!(result.filtered.len() <= max_columns);
        assert!(result.filtered.iter().all(|name| result.selected.contains(name)));

        let columns = returns.columns(&result.filtered).unwrap();
        for i in 0..columns.len() {
            for j in (i + 1)..columns.len() {
                assert!(RiskMetrics::correlation(&columns[i], &columns[j]) < max_corr);
            }
        }
        for ratio in result.avg_trade.unwrap() {
            assert!(ratio >= 0.0);
        }
    }
}
