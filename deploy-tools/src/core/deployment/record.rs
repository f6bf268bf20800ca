// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Persisted deployment records, one JSON file per contract per network.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, TxHash, B256},
};
use serde::{Deserialize, Serialize};

use crate::utils::create_dir_if_dne;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("deployment record {} is malformed: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub address: Address,
    pub transaction_hash: TxHash,
    /// keccak256 of the creation code that was deployed
    pub bytecode_hash: B256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub gas_used: u64,
    #[serde(default)]
    pub abi: JsonAbi,
}

/// Deployment records for a single network.
#[derive(Clone, Debug)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Store rooted at `<deployments>/<network>`.
    pub fn new(deployments: impl AsRef<Path>, network: &str) -> Self {
        Self {
            dir: deployments.as_ref().join(network),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Loads the record for a contract, if it has been deployed before.
    pub fn load(&self, name: &str) -> Result<Option<DeploymentRecord>, RecordError> {
        let path = self.path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| RecordError::Json { path, source })
    }

    /// Creates the store's directory and checks that records can be written to it.
    pub fn prepare(&self) -> Result<(), RecordError> {
        create_dir_if_dne(&self.dir)?;
        tempfile::tempfile_in(&self.dir)?;
        Ok(())
    }

    pub fn save(&self, name: &str, record: &DeploymentRecord) -> Result<(), RecordError> {
        create_dir_if_dne(&self.dir)?;
        let path = self.path(name);
        let json = serde_json::to_string_pretty(record).map_err(|source| RecordError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}
