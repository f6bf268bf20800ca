// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use deploy_tools::ops::{self, DeployConfig};

use crate::{
    common_args::{AuthArgs, NetworkArgs, ProjectArgs},
    error::CliResult,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Only run tasks with one of these tags (comma separated).
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
    /// Run tasks again even if they already completed on this network.
    #[arg(long)]
    reset: bool,

    /// Wallet source to use.
    #[command(flatten)]
    auth: AuthArgs,
    #[command(flatten)]
    network: NetworkArgs,
    #[command(flatten)]
    project: ProjectArgs,
}

impl Args {
    fn config(&self) -> eyre::Result<DeployConfig> {
        Ok(DeployConfig {
            network: self.network.network.clone(),
            tags: self.tags.clone(),
            reset: self.reset,
            max_fee_per_gas_wei: self.auth.get_max_fee_per_gas_wei()?,
        })
    }
}

pub async fn exec(args: Args) -> CliResult {
    let config = args.config()?;
    let signer = args.auth.build_signer()?;
    ops::deploy(args.project.root()?, &config, signer).await?;
    Ok(())
}
