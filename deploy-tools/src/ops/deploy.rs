// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Running deployment tasks against a configured network.

use std::{io, path::Path};

use alloy::{
    network::EthereumWallet,
    providers::{Provider, ProviderBuilder},
    signers::{local::PrivateKeySigner, Signer},
};

use crate::{
    core::{
        accounts::{AvailableAccounts, ConfiguredAccounts},
        deployment::{record::RecordStore, ChainDeployments},
        manifest::Manifest,
        network::check_chain_id,
        runner::{RunSummary, TaskLedger, TaskRunner},
        task::Environment,
    },
    tasks, Result,
};

#[derive(Debug)]
pub struct DeployConfig {
    /// Network name from the manifest.
    pub network: String,
    /// Only run tasks carrying one of these tags; all tasks when empty.
    pub tags: Vec<String>,
    /// Ignore the ledger of already-executed tasks.
    pub reset: bool,
    pub max_fee_per_gas_wei: Option<u128>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            network: "localhost".to_string(),
            tags: Vec::new(),
            reset: false,
            max_fee_per_gas_wei: None,
        }
    }
}

/// Runs the project's deployment tasks.
///
/// Without a signer, transactions are sent from the node's unlocked accounts.
pub async fn deploy(
    root: impl AsRef<Path>,
    config: &DeployConfig,
    signer: Option<PrivateKeySigner>,
) -> Result<RunSummary> {
    let root = root.as_ref();
    let manifest = Manifest::load_from_dir(root)?;
    let network = manifest.network(&config.network)?;

    let provider = ProviderBuilder::new()
        .connect(&network.endpoint)
        .await?
        .erased();
    let chain_id = check_chain_id(&config.network, network, &provider).await?;

    let (provider, available) = match signer {
        Some(signer) => {
            let signer = signer.with_chain_id(Some(chain_id));
            debug!(@grey, "signing as {}", signer.address());
            let available = AvailableAccounts::Signers(vec![signer.address()]);
            let provider = ProviderBuilder::new()
                .wallet(EthereumWallet::new(signer))
                .connect(&network.endpoint)
                .await?
                .erased();
            (provider, available)
        }
        None => (provider.clone(), AvailableAccounts::Node(provider)),
    };

    let accounts = ConfiguredAccounts::new(
        config.network.clone(),
        manifest.named_accounts.clone(),
        available,
    );
    let records = RecordStore::new(root.join(&manifest.paths.deployments), &config.network);
    let ledger = TaskLedger::load(records.dir())?;
    let deployments = ChainDeployments::new(provider, root.join(&manifest.paths.artifacts), records)
        .with_max_fee_per_gas(config.max_fee_per_gas_wei);

    let tasks = tasks::all();
    let mut runner = TaskRunner::new(&tasks, ledger)?.reset(config.reset);
    let mut stdout = io::stdout();
    let mut env = Environment {
        network: &config.network,
        accounts: &accounts,
        deployments: &deployments,
        stdout: &mut stdout,
    };
    let summary = runner.run(&config.tags, &mut env).await?;

    info!(@grey,
        "{} executed, {} skipped on {}",
        summary.executed.len().mint(),
        summary.skipped.len().yellow(),
        config.network
    );
    Ok(summary)
}
