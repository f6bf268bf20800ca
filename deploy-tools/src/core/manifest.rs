// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deploy.toml manifest definitions.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use serde::Deserialize;

/// Filename for the project manifest
pub const FILENAME: &str = "Deploy.toml";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml read error: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("missing {FILENAME}")]
    Missing,
    #[error("network {0:?} is not configured in {FILENAME}")]
    UnknownNetwork(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub paths: TomlPaths,
    #[serde(default)]
    pub networks: BTreeMap<String, TomlNetwork>,
    /// Role name to per-network account specs. The `default` key applies to networks without
    /// their own entry.
    #[serde(default)]
    pub named_accounts: BTreeMap<String, BTreeMap<String, AccountSpec>>,
}

#[derive(Debug, Deserialize)]
pub struct TomlPaths {
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
    #[serde(default = "default_deployments")]
    pub deployments: PathBuf,
}

impl Default for TomlPaths {
    fn default() -> Self {
        Self {
            artifacts: default_artifacts(),
            deployments: default_deployments(),
        }
    }
}

fn default_artifacts() -> PathBuf {
    "artifacts".into()
}

fn default_deployments() -> PathBuf {
    "deployments".into()
}

#[derive(Clone, Debug, Deserialize)]
pub struct TomlNetwork {
    pub endpoint: String,
    pub chain_id: Option<u64>,
}

/// How a role maps to an account on a network.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AccountSpec {
    /// Index into the accounts available on the network.
    Index(usize),
    /// A fixed address.
    Address(Address),
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ManifestError::Missing);
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load `Deploy.toml` from a project root.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Self, ManifestError> {
        Self::load(root.as_ref().join(FILENAME))
    }

    pub fn network(&self, name: &str) -> Result<&TomlNetwork, ManifestError> {
        self.networks
            .get(name)
            .ok_or_else(|| ManifestError::UnknownNetwork(name.to_string()))
    }
}
