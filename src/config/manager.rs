use super::{backtesting::BacktestConfig, grid::ConfigGrid, traits::ConfigSection};
use crate::data::SyntheticData;
use crate::error::{Result, WfError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Where the return (and optional turnover) tables come from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub returns_path: Option<PathBuf>,
    pub turnover_path: Option<PathBuf>,
    /// Used when no returns path is given
    pub synthetic: Option<SyntheticData>,
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<()> {
        if self.returns_path.is_none() && self.synthetic.is_none() {
            return Err(WfError::Configuration(
                "Either data.returns_path or data.synthetic must be set".to_string()
            ));
        }
        if self.turnover_path.is_some() && self.returns_path.is_none() {
            return Err(WfError::Configuration(
                "data.turnover_path needs data.returns_path".to_string()
            ));
        }
        if let Some(synthetic) = &self.synthetic {
            if synthetic.n_assets == 0 || synthetic.start > synthetic.end {
                return Err(WfError::Configuration(
                    "Synthetic data needs at least one asset and start <= end".to_string()
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<ConfigGrid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<BacktestConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                synthetic: Some(SyntheticData::default()),
                ..Default::default()
            },
            grid: Some(ConfigGrid::default()),
            runs: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;
        if let Some(grid) = &self.grid {
            grid.validate()?;
        }
        for run in &self.runs {
            run.validate()?;
        }
        if self.configurations().is_empty() {
            return Err(WfError::Configuration(
                "No backtest configurations: add a [grid] section or [[runs]]".to_string()
            ));
        }
        Ok(())
    }

    /// Grid expansion followed by the explicit runs
    pub fn configurations(&self) -> Vec<BacktestConfig> {
        let mut configs = self.grid.as_ref().map(ConfigGrid::expand).unwrap_or_default();
        configs.extend(self.runs.iter().cloned());
        configs
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Environment prefix for overrides, e.g. `WFB__DATA__RETURNS_PATH`
    pub const ENV_PREFIX: &'static str = "WFB";

    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layer the file (TOML or JSON, by extension) with environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WfError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: AppConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        log::info!(
            "Loaded {} with {} configurations",
            path.display(),
            config.configurations().len()
        );

        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(&*self.read()?)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig> {
        Ok(self.read()?.clone())
    }

    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut next = config.clone();
        f(&mut next);
        next.validate()?;
        *config = next;
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, AppConfig>> {
        self.config
            .read()
            .map_err(|_| WfError::Configuration("Config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>> {
        self.config
            .write()
            .map_err(|_| WfError::Configuration("Config lock poisoned".to_string()))
    }
}
