mod advice;

use anyhow::Context;
use blackjack::ValueTable;
use blackjack_drivers::{
    init_tracing, parse_config_from_file, resolve_config_path, DEFAULT_CONFIG_PATH,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, about = "Recommends a blackjack action from a trained table", long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// The trained table, overriding the config file
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Your cards, e.g. "A,7"
    #[arg(long, value_delimiter = ',', required = true)]
    hand: Vec<String>,

    /// The dealer's upcard
    #[arg(short, long)]
    dealer: String,

    /// Every other card visible since the shoe was shuffled, e.g. "K,5,2"
    #[arg(long, value_delimiter = ',')]
    seen: Vec<String>,

    /// You have already hit, so double and split are no longer possible
    #[arg(long)]
    after_hit: bool,
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

    let table_path = args
        .table
        .unwrap_or_else(|| PathBuf::from(&config.table_path));
    let table = ValueTable::load(&table_path)
        .with_context(|| format!("cannot load table from {}", table_path.display()))?;

    let advice = advice::advise(
        &rule,
        &table,
        &args.hand,
        &args.dealer,
        &args.seen,
        !args.after_hit,
    )?;

    println!("Running count: {}", advice.running_count);
    println!("True count: {:.2}", advice.true_count);
    println!("Recommendation: {}", advice.action);
    Ok(())
}
