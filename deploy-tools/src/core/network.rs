// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use alloy::providers::Provider;

use crate::{core::manifest::TomlNetwork, utils::color::Color};

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),

    #[error(
        "network {} expects chain id {} but the node at {} reports {}",
        .name.yellow(),
        .expected.mint(),
        .endpoint,
        .actual.red(),
    )]
    ChainIdMismatch {
        name: String,
        endpoint: String,
        expected: u64,
        actual: u64,
    },
}

/// Returns the node's chain id, checking it against the manifest when one is configured.
pub async fn check_chain_id(
    name: &str,
    network: &TomlNetwork,
    provider: &impl Provider,
) -> Result<u64, NetworkError> {
    let actual = provider.get_chain_id().await?;
    debug!(@grey, "connected to {} (chain id {actual})", network.endpoint);
    verify_chain_id(name, network, actual)?;
    Ok(actual)
}

fn verify_chain_id(name: &str, network: &TomlNetwork, actual: u64) -> Result<(), NetworkError> {
    match network.chain_id {
        Some(expected) if expected != actual => Err(NetworkError::ChainIdMismatch {
            name: name.to_string(),
            endpoint: network.endpoint.clone(),
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}
