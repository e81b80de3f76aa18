mod training;

use anyhow::Context;
use blackjack_drivers::{
    init_tracing, parse_config_from_file, resolve_config_path, DEFAULT_CONFIG_PATH,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, about = "Trains a blackjack value table by Q-learning", long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Number of episodes, overriding the config file
    #[arg(short, long)]
    episodes: Option<u64>,

    /// Random seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where to write the trained table, overriding the config file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Continue training from the table already at the output path
    #[arg(long)]
    resume: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CommandLineArgs::parse();

    let config_path = resolve_config_path(&args.config)?;
    let config = parse_config_from_file(&config_path)?;
    let rule: blackjack::Rule = config
        .rule
        .clone()
        .try_into()
        .context("invalid rule in config")?;

    let mut training_config = blackjack::TrainingConfig::from(&config.trainer);
    if let Some(episodes) = args.episodes {
        training_config.episodes = episodes;
    }
    if let Some(seed) = args.seed {
        training_config.seed = seed;
    }
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.table_path));

    training::train_and_save(&rule, &training_config, &output, args.resume)
}
