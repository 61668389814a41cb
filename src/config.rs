use crate::bet::BetChoice;
use crate::chart::ChartStyle;
use crate::simulation::{StopPolicy, Strategy};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const CONFIG_FILE: &str = "roulette_config.json";
pub const CONFIG_ENV: &str = "ROULETTE_CONFIG";

/// Values used for any simulation option the caller leaves out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    pub starting_balance: i64,
    pub bet_amount: i64,
    pub strategy: Strategy,
    pub rounds: i64,
    pub bet_choice: BetChoice,
    pub stop_policy: StopPolicy,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        SimulationDefaults {
            starting_balance: 1000,
            bet_amount: 10,
            strategy: Strategy::Flat,
            rounds: 100,
            bet_choice: BetChoice::Red,
            stop_policy: StopPolicy::AllRounds,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub style: ChartStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 600,
            height: 300,
            style: ChartStyle::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub log_channel: Option<u64>,
    pub max_rounds: u32,
    pub defaults: SimulationDefaults,
    pub chart: ChartConfig,
}

impl Default for ConfigData {
    fn default() -> Self {
        ConfigData {
            log_channel: None,
            max_rounds: 10_000,
            defaults: SimulationDefaults::default(),
            chart: ChartConfig::default(),
        }
    }
}

/// `$ROULETTE_CONFIG`, or `roulette_config.json` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

impl ConfigData {
    pub async fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let config = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(ConfigData::default())
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
