use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use roulette_sim::chart::SvgSurface;
use roulette_sim::config::{config_path, ConfigData};
use roulette_sim::io::{FormFields, LogSink, TextSummary};

/// Simulate even-money roulette bets from the command line.
/// Options left out fall back to the config file.
#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Roulette betting strategy simulator")]
struct Args {
    #[arg(long)]
    starting_balance: Option<String>,

    #[arg(long)]
    bet_amount: Option<String>,

    /// flat or martingale
    #[arg(long)]
    strategy: Option<String>,

    #[arg(long)]
    rounds: Option<String>,

    /// red, black, odd or even
    #[arg(long)]
    bet_choice: Option<String>,

    /// all-rounds or first-win
    #[arg(long)]
    stop_policy: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the balance chart
    #[arg(long, default_value = "balance.svg")]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,
}

/// Flags override the configured defaults. The configured round cap always applies.
fn form_fields(args: &Args, config: &ConfigData) -> FormFields {
    let d = &config.defaults;
    let pick = |flag: &Option<String>, default: String| flag.clone().unwrap_or(default);
    FormFields {
        starting_balance: pick(&args.starting_balance, d.starting_balance.to_string()),
        bet_amount: pick(&args.bet_amount, d.bet_amount.to_string()),
        strategy: pick(&args.strategy, d.strategy.to_string()),
        rounds: pick(&args.rounds, d.rounds.to_string()),
        bet_choice: pick(&args.bet_choice, d.bet_choice.to_string()),
        stop_policy: pick(&args.stop_policy, d.stop_policy.as_str().to_string()),
        max_rounds: Some(config.max_rounds),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = ConfigData::load(&config_path()).await?;
    let form = form_fields(&args, &config);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut summary = TextSummary::default();
    let mut surface = SvgSurface::new(
        args.width.unwrap_or(config.chart.width),
        args.height.unwrap_or(config.chart.height),
    );
    roulette_sim::run(
        &form,
        rng,
        &mut [&mut summary, &mut LogSink],
        &mut surface,
        &config.chart.style,
    )?;

    println!("{}", summary.text());
    tokio::fs::write(&args.output, surface.to_svg())
        .await
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Chart written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_sim::error::SimError;
    use roulette_sim::io::ParameterSource;
    use roulette_sim::simulation::StopPolicy;

    #[test]
    fn test_flag_overrides_first_win_default() {
        let mut config = ConfigData::default();
        config.defaults.stop_policy = StopPolicy::FirstWin;

        let args = Args::parse_from(["simulate"]);
        let params = form_fields(&args, &config).parameters().unwrap();
        assert_eq!(params.stop_policy, StopPolicy::FirstWin);

        let args = Args::parse_from(["simulate", "--stop-policy", "all-rounds"]);
        let params = form_fields(&args, &config).parameters().unwrap();
        assert_eq!(params.stop_policy, StopPolicy::AllRounds);
    }

    #[test]
    fn test_rounds_above_configured_cap() {
        let config = ConfigData::default();
        let args = Args::parse_from(["simulate", "--rounds", "4000000000"]);
        let err = form_fields(&args, &config).parameters().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "rounds", .. }));
    }
}
