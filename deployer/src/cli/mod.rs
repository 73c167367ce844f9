mod run;

use clap::{Parser, Subcommand};
pub use run::RunArgs;

/// Zasset deployer CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Commands {
    /// Deploy the synths, configure them and register them in the Issuer
    Deploy(RunArgs),

    /// Deploy (or reuse) synths, token states and proxies
    DeploySynths(RunArgs),

    /// Reconcile the configuration of already deployed synths
    ConfigureSynths(RunArgs),
}
