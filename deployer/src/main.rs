mod cli;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CliArgs, Commands};
use env_logger::Env;
use zasset_deployer::chain::EthereumChainClient;
use zasset_deployer::config::ConfigBuilder;
use zasset_deployer::confirm::TerminalConfirm;
use zasset_deployer::pipeline::{self, RunOptions, Stage};

#[tokio::main]
#[allow(clippy::print_stdout)]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let (stage, run_args) = match &args.command {
        Commands::Deploy(run_args) => (Stage::Deploy, run_args),
        Commands::DeploySynths(run_args) => (Stage::DeploySynths, run_args),
        Commands::ConfigureSynths(run_args) => (Stage::ConfigureSynths, run_args),
    };

    let config = ConfigBuilder::from_file(&run_args.config_path)
        .context("Failed to read the deployer config file. Make sure the path exists and is readable")?
        .merge_with_env()
        .build()
        .context("Invalid deployer configuration")?;

    let client = EthereumChainClient::new(&config.rpc_url, &config.private_key, config.artifacts_dir.clone())
        .context("Failed to initialise the Ethereum client")?;

    let output = pipeline::run(stage, &config, &RunOptions::from(run_args), &client, &TerminalConfirm)
        .await
        .with_context(|| format!("Failed to run {stage:?}"))?;

    let output_json = serde_json::to_string_pretty(&output).context("Failed to serialize the run output")?;
    println!("Deployment Output:");
    println!("{output_json}");

    if let Some(output_path) = &run_args.output_path {
        let file = File::create(output_path).context("Failed to create the output file")?;
        serde_json::to_writer_pretty(file, &output).context("Failed to write the run output")?;
        log::info!("✅ Deployment output saved to {}", output_path.display());
    }
    Ok(())
}
