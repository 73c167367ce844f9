use std::path::PathBuf;

use clap::Args;
use zasset_deployer::pipeline::RunOptions;

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the configuration file
    #[arg(long, env = "DEPLOYER_CONFIG_PATH")]
    pub config_path: PathBuf,

    /// Record configuration writes in a migration contract instead of sending them
    #[arg(long, env = "GENERATE_SOLIDITY")]
    pub generate_solidity: bool,

    /// The RPC endpoint is a local fork of the network
    #[arg(long, env = "USE_FORK")]
    pub use_fork: bool,

    /// Never ask for confirmation
    #[arg(long, short, env = "YES")]
    pub yes: bool,

    /// Deploy synths that have no previous deployment
    #[arg(long, env = "ADD_NEW_SYNTHS")]
    pub add_new_synths: bool,

    /// Allow synths flagged for deployment to have no previous deployment
    #[arg(long, env = "FRESH_DEPLOY")]
    pub fresh_deploy: bool,

    /// Path to write the run output (JSON)
    #[arg(long, env = "OUTPUT_PATH")]
    pub output_path: Option<PathBuf>,

    /// Path of the generated migration contract
    #[arg(long, env = "SOLIDITY_OUTPUT_PATH")]
    pub solidity_output_path: Option<PathBuf>,
}

impl From<&RunArgs> for RunOptions {
    fn from(args: &RunArgs) -> Self {
        Self {
            generate_solidity: args.generate_solidity,
            use_fork: args.use_fork,
            yes: args.yes,
            add_new_synths: args.add_new_synths,
            fresh_deploy: args.fresh_deploy,
            solidity_output_path: args.solidity_output_path.clone(),
        }
    }
}
