use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use wfbundle::config::{AppConfig, ConfigManager, DataConfig};
use wfbundle::data::{CsvConnector, DataValidator, ReturnTable, TableKind, TurnoverTable};
use wfbundle::engines::evaluation::EnsembleRunner;
use wfbundle::functions::ScoringRegistry;

fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    match std::env::args().nth(1) {
        Some(path) => manager
            .load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => log::info!("No config file given, running the default synthetic setup"),
    }
    let config = manager.get()?;

    let (returns, turnover) = load_data(&config.data)?;
    DataValidator::validate_minimum_rows(&returns, 2)?;
    let registry = ScoringRegistry::with_defaults();
    let configs = config.configurations();

    let ensemble = EnsembleRunner::new(&returns, turnover.as_ref(), &registry).run(&configs);

    println!("{}", serde_json::to_string_pretty(&summary(&config, &ensemble))?);

    if !ensemble.failures.is_empty() && ensemble.results.is_empty() {
        anyhow::bail!("All {} configurations failed", ensemble.failures.len());
    }
    Ok(())
}

fn load_data(data: &DataConfig) -> Result<(ReturnTable, Option<TurnoverTable>)> {
    if let Some(path) = &data.returns_path {
        let (returns, metadata) = CsvConnector::load_table(path, TableKind::Returns)
            .with_context(|| format!("Failed to load returns from {}", path.display()))?;
        log::info!("Loaded {}", metadata.summary());
        let turnover = match &data.turnover_path {
            Some(path) => {
                let (turnover, metadata) = CsvConnector::load_table(path, TableKind::Turnover)
                    .with_context(|| format!("Failed to load turnover from {}", path.display()))?;
                log::info!("Loaded {}", metadata.summary());
                Some(turnover)
            }
            None => None,
        };
        return Ok((returns, turnover));
    }

    let synthetic = data
        .synthetic
        .as_ref()
        .context("No data source configured")?;
    log::info!(
        "Generating synthetic data: {} assets, {} to {}, seed {}",
        synthetic.n_assets,
        synthetic.start,
        synthetic.end,
        synthetic.seed
    );
    let (returns, turnover) = synthetic.generate()?;
    Ok((returns, Some(turnover)))
}

fn summary(config: &AppConfig, ensemble: &wfbundle::engines::evaluation::EnsembleResults) -> Value {
    let mut results = Map::new();
    for (label, aggregate) in &ensemble.results {
        let entry = match aggregate {
            Some(agg) => json!({
                "cumulative_return": agg.overall_cumulative_return,
                "volatility": agg.overall_volatility,
                "sharpe": agg.overall_sharpe,
                "avg_trade": agg.overall_avg_trade,
                "oos_windows": agg.windows,
                "oos_observations": agg.full_oos_series.len(),
            }),
            None => Value::Null,
        };
        results.insert(label.clone(), entry);
    }

    let failures: Map<String, Value> = ensemble
        .failures
        .iter()
        .map(|(label, e)| (label.clone(), Value::String(e.to_string())))
        .collect();

    json!({
        "configurations": config.configurations().len(),
        "results": results,
        "failures": failures,
    })
}
