//! secom-impute - Main Entry Point
//!
//! One-shot batch CLI for the SECOM missing-value imputation comparison.

use clap::Parser;
use secom_impute::cli::{cmd_analyze, cmd_impute, cmd_info, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secom_impute=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { data, top, json } => {
            cmd_analyze(&data, top, json)?;
        }
        Commands::Impute {
            data,
            out_dir,
            drop_threshold,
            split_threshold,
            neighbors,
            max_iter,
            seed,
            strategies,
        } => {
            cmd_impute(
                &data,
                &out_dir,
                drop_threshold,
                split_threshold,
                neighbors,
                max_iter,
                seed,
                &strategies,
            )?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}
