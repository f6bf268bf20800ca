// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fs, path::PathBuf};

use alloy::{
    primitives::FixedBytes,
    signers::local::{LocalSigner, PrivateKeySigner},
};
use eyre::{eyre, Context};

use crate::{
    constants::DEFAULT_NETWORK,
    utils::{convert_gwei_to_wei, decode0x},
};

#[derive(Debug, clap::Args)]
pub struct AuthArgs {
    /// File path to a text file containing a hex-encoded private key
    #[arg(long)]
    private_key_path: Option<PathBuf>,
    /// Private key as a hex string. Warning: this exposes your key to shell history
    #[arg(long)]
    private_key: Option<String>,
    /// Path to an Ethereum wallet keystore file (e.g. clef)
    #[arg(long)]
    keystore_path: Option<String>,
    /// Keystore password file
    #[arg(long)]
    keystore_password_path: Option<PathBuf>,
    /// Optional max fee per gas in gwei units.
    #[arg(long)]
    max_fee_per_gas_gwei: Option<String>,
}

impl AuthArgs {
    /// Local signer from the given key source, or `None` to use the node's unlocked accounts.
    pub fn build_signer(&self) -> eyre::Result<Option<PrivateKeySigner>> {
        if let Some(key) = &self.private_key {
            if key.is_empty() {
                return Err(eyre!("empty private key"));
            }
            return signer_from_hex(key).map(Some);
        }

        if let Some(file) = &self.private_key_path {
            let key = fs::read_to_string(file).wrap_err("could not open private key file")?;
            return signer_from_hex(key).map(Some);
        }

        let Some(keystore) = &self.keystore_path else {
            return Ok(None);
        };
        let password = self
            .keystore_password_path
            .as_ref()
            .map(fs::read_to_string)
            .unwrap_or(Ok("".into()))?;
        let signer = LocalSigner::decrypt_keystore(keystore, password)?;
        Ok(Some(signer))
    }

    pub fn get_max_fee_per_gas_wei(&self) -> eyre::Result<Option<u128>> {
        self.max_fee_per_gas_gwei
            .as_ref()
            .map(|fee_str| convert_gwei_to_wei(fee_str))
            .transpose()
    }
}

fn signer_from_hex(key: impl AsRef<str>) -> eyre::Result<PrivateKeySigner> {
    let bytes = decode0x(key)?;
    if bytes.len() != 32 {
        return Err(eyre!("private key must be 32 bytes, got {}", bytes.len()));
    }
    let priv_key_bytes: FixedBytes<32> = FixedBytes::from_slice(&bytes);
    Ok(PrivateKeySigner::from_bytes(&priv_key_bytes)?)
}

#[derive(Debug, clap::Args)]
pub struct NetworkArgs {
    /// Network to deploy to, as named in Deploy.toml
    #[arg(short, long, default_value = DEFAULT_NETWORK)]
    pub network: String,
}

#[derive(Debug, clap::Args)]
pub struct ProjectArgs {
    /// Directory containing Deploy.toml (defaults to the current directory)
    #[arg(long)]
    manifest_dir: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn root(&self) -> eyre::Result<PathBuf> {
        match &self.manifest_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().wrap_err("could not read current directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn auth(private_key: Option<&str>) -> AuthArgs {
        AuthArgs {
            private_key_path: None,
            private_key: private_key.map(str::to_string),
            keystore_path: None,
            keystore_password_path: None,
            max_fee_per_gas_gwei: Some("1.5".to_string()),
        }
    }

    #[test]
    fn signer_from_private_key() {
        let signer = auth(Some(KEY)).build_signer().unwrap().unwrap();
        assert_eq!(
            signer.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn no_key_source_uses_node_accounts() {
        assert!(auth(None).build_signer().unwrap().is_none());
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(auth(Some("")).build_signer().is_err());
        assert!(auth(Some("0x1234")).build_signer().is_err());
    }

    #[test]
    fn max_fee() {
        assert_eq!(
            auth(None).get_max_fee_per_gas_wei().unwrap(),
            Some(1_500_000_000)
        );
    }
}
