// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Compiled contract artifacts.
//!
//! Artifacts use the Hardhat layout: `<artifacts>/<source path>/<ContractName>.json`, next to a
//! `<ContractName>.dbg.json` debug file that is ignored here.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{keccak256, Bytes, B256},
};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact json error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid artifact search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("no artifact for contract {name:?} under {}", .dir.display())]
    NotFound { name: String, dir: PathBuf },
    #[error("contract name {name:?} is ambiguous, found artifacts: {paths:?}")]
    Ambiguous { name: String, paths: Vec<PathBuf> },
    #[error("artifact for {0:?} has no creation bytecode (abstract contract or interface?)")]
    EmptyBytecode(String),
    #[error("artifact for {0:?} references unlinked libraries")]
    UnlinkedLibraries(String),
}

/// A compiled contract as written by the compiler toolchain.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    #[serde(default)]
    pub source_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
    #[serde(default)]
    pub link_references: BTreeMap<String, serde_json::Value>,
}

impl Artifact {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds and loads the artifact for a contract by name.
    pub fn find(dir: impl AsRef<Path>, name: &str) -> Result<Self, ArtifactError> {
        let path = find_path(dir.as_ref(), name)?;
        debug!(@grey, "loading artifact {}", path.display());
        let artifact = Self::load(&path)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Hash identifying the creation code, used to detect changed contracts.
    pub fn bytecode_hash(&self) -> B256 {
        keccak256(&self.bytecode)
    }

    /// Whether deploying requires constructor arguments.
    pub fn has_constructor_args(&self) -> bool {
        self.abi
            .constructor
            .as_ref()
            .is_some_and(|constructor| !constructor.inputs.is_empty())
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode(self.contract_name.clone()));
        }
        if !self.link_references.is_empty() {
            return Err(ArtifactError::UnlinkedLibraries(self.contract_name.clone()));
        }
        Ok(())
    }
}

fn find_path(dir: &Path, name: &str) -> Result<PathBuf, ArtifactError> {
    let pattern = dir.join("**").join(format!("{name}.json"));
    let paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        // build-info and cache dirs hold compiler metadata, not artifacts
        .filter(|path| {
            !path
                .components()
                .any(|c| matches!(c.as_os_str().to_str(), Some("build-info" | "cache")))
        })
        .collect();
    match paths.len() {
        0 => Err(ArtifactError::NotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        }),
        1 => Ok(paths.into_iter().next().unwrap_or_default()),
        _ => Err(ArtifactError::Ambiguous {
            name: name.to_string(),
            paths,
        }),
    }
}
