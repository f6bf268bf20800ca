// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deploys the RealEstateNFT contract.

use async_trait::async_trait;

use crate::core::{
    accounts::DEPLOYER,
    deployment::DeployOptions,
    task::{DeployTask, Environment, TaskError},
};

pub const CONTRACT: &str = "RealEstateNFT";
pub const ID: &str = "deploy_RealEstateNFT";
pub const TAGS: &[&str] = &["RealEstateNFT"];

const LABEL: &str = "RealEstateNFT contract: ";

#[derive(Debug, Default)]
pub struct RealEstateNft;

#[async_trait]
impl DeployTask for RealEstateNft {
    fn id(&self) -> &'static str {
        ID
    }

    fn tags(&self) -> &'static [&'static str] {
        TAGS
    }

    async fn run(&self, env: &mut Environment<'_>) -> Result<(), TaskError> {
        let deployer = env.accounts.named_accounts().await?.get(DEPLOYER)?;
        let deployed = env
            .deployments
            .deploy(
                CONTRACT,
                DeployOptions {
                    from: deployer,
                    log: true,
                },
            )
            .await?;
        writeln!(env.stdout, "{LABEL} {}", deployed.address)?;
        Ok(())
    }
}
