use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CONFIG_PATH: &str = "~/.blackjack.yml";
const DEFAULT_CONFIG_FILE_NAME: &str = ".blackjack.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub trainer: ConfigTrainer,
    /// Where the trainer writes the value table and the advisor reads it.
    pub table_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub penetration: f64,
    pub max_splits: u8,
    pub count_bucketing: String,
}

impl TryInto<blackjack::Rule> for ConfigRule {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<blackjack::Rule, Self::Error> {
        let blackjack_rule = blackjack::Rule {
            number_of_decks: self.number_of_decks,
            penetration: self.penetration,
            max_splits: self.max_splits,
            count_bucketing: self.count_bucketing.parse()?,
        };

        Ok(blackjack_rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigTrainer {
    pub episodes: u64,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon_start: f64,
    pub epsilon_end: f64,
    pub epsilon_decay: f64,
    pub progress_interval: u64,
    pub seed: u64,
    #[serde(default = "default_fresh_shoe_each_round")]
    pub fresh_shoe_each_round: bool,
}

fn default_fresh_shoe_each_round() -> bool {
    true
}

impl From<&ConfigTrainer> for blackjack::TrainingConfig {
    fn from(trainer: &ConfigTrainer) -> Self {
        blackjack::TrainingConfig {
            episodes: trainer.episodes,
            learning_rate: trainer.learning_rate,
            discount: trainer.discount,
            epsilon_start: trainer.epsilon_start,
            epsilon_end: trainer.epsilon_end,
            epsilon_decay: trainer.epsilon_decay,
            progress_interval: trainer.progress_interval,
            seed: trainer.seed,
            fresh_shoe_each_round: trainer.fresh_shoe_each_round,
        }
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &Path) -> anyhow::Result<Config> {
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("cannot read config file {}", filename.display()))?;
    serde_yaml::from_str(&file_content)
        .with_context(|| format!("cannot parse config file {}", filename.display()))
}

/// Resolves the config path given on the command line. The default path points at
/// `.blackjack.yml` in the home directory.
pub fn resolve_config_path(config: &str) -> anyhow::Result<PathBuf> {
    if config != DEFAULT_CONFIG_PATH {
        return Ok(PathBuf::from(config));
    }

    let home_dir = home::home_dir().context("cannot find home directory")?;
    let config_file_path = home_dir.join(DEFAULT_CONFIG_FILE_NAME);
    if !config_file_path.exists() {
        bail!("config file {} does not exist", config_file_path.display());
    }
    if config_file_path.is_dir() {
        bail!(
            "{} should be a file rather than a directory",
            config_file_path.display()
        );
    }
    Ok(config_file_path)
}

/// Logs to stderr, INFO and above unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
