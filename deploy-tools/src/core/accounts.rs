// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Named account resolution.
//!
//! Deployment tasks refer to accounts by role (e.g. `deployer`) rather than by address. Roles are
//! configured in the manifest and resolved against the accounts available on the target network.

use std::collections::BTreeMap;

use alloy::{primitives::Address, providers::Provider};
use async_trait::async_trait;

use crate::core::manifest::AccountSpec;

/// Role used as the sender for contract deployments.
pub const DEPLOYER: &str = "deployer";

/// Resolved mapping of role names to addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedAccounts(BTreeMap<String, Address>);

impl NamedAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: impl Into<String>, address: Address) {
        self.0.insert(role.into(), address);
    }

    pub fn get(&self, role: &str) -> Result<Address, AccountsError> {
        self.0
            .get(role)
            .copied()
            .ok_or_else(|| AccountsError::UnknownRole(role.to_string()))
    }
}

impl<S: Into<String>> FromIterator<(S, Address)> for NamedAccounts {
    fn from_iter<I: IntoIterator<Item = (S, Address)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),

    #[error("no account configured for role {0:?}")]
    UnknownRole(String),
    #[error("account index {index} for role {role:?} is out of range ({available} accounts available)")]
    IndexOutOfRange {
        role: String,
        index: usize,
        available: usize,
    },
}

/// Source of named accounts for a deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountResolver: Send + Sync {
    async fn named_accounts(&self) -> Result<NamedAccounts, AccountsError>;
}

/// Resolves manifest-configured roles for a single network.
#[derive(Debug)]
pub struct ConfiguredAccounts<P> {
    network: String,
    roles: BTreeMap<String, BTreeMap<String, AccountSpec>>,
    available: AvailableAccounts<P>,
}

/// Accounts that index-based role specs refer to.
#[derive(Debug)]
pub enum AvailableAccounts<P> {
    /// Local signer addresses, in the order they were supplied.
    Signers(Vec<Address>),
    /// Unlocked accounts reported by the node through `eth_accounts`.
    Node(P),
}

impl<P: Provider> ConfiguredAccounts<P> {
    pub fn new(
        network: impl Into<String>,
        roles: BTreeMap<String, BTreeMap<String, AccountSpec>>,
        available: AvailableAccounts<P>,
    ) -> Self {
        Self {
            network: network.into(),
            roles,
            available,
        }
    }

    async fn available_addresses(&self) -> Result<Vec<Address>, AccountsError> {
        match &self.available {
            AvailableAccounts::Signers(addresses) => Ok(addresses.clone()),
            AvailableAccounts::Node(provider) => Ok(provider.get_accounts().await?),
        }
    }
}

#[async_trait]
impl<P: Provider> AccountResolver for ConfiguredAccounts<P> {
    async fn named_accounts(&self) -> Result<NamedAccounts, AccountsError> {
        let mut available = None;
        let mut accounts = NamedAccounts::new();
        for (role, specs) in &self.roles {
            let Some(spec) = select_spec(specs, &self.network) else {
                debug!(@grey, "role {role} has no account on network {}", self.network);
                continue;
            };
            let address = match *spec {
                AccountSpec::Address(address) => address,
                AccountSpec::Index(index) => {
                    if available.is_none() {
                        available = Some(self.available_addresses().await?);
                    }
                    let addresses = available.as_deref().unwrap_or_default();
                    *addresses
                        .get(index)
                        .ok_or_else(|| AccountsError::IndexOutOfRange {
                            role: role.clone(),
                            index,
                            available: addresses.len(),
                        })?
                }
            };
            accounts.insert(role.clone(), address);
        }
        Ok(accounts)
    }
}

/// Network override first, then `default`.
fn select_spec<'a>(
    specs: &'a BTreeMap<String, AccountSpec>,
    network: &str,
) -> Option<&'a AccountSpec> {
    specs.get(network).or_else(|| specs.get("default"))
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::address,
        providers::{DynProvider, Provider, ProviderBuilder},
    };
    use pretty_assertions::assert_eq;

    use super::*;

    const FIRST: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const SECOND: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const PINNED: Address = address!("0000000000000000000000000000000000000001");

    fn roles(entries: &[(&str, &[(&str, AccountSpec)])]) -> BTreeMap<String, BTreeMap<String, AccountSpec>> {
        entries
            .iter()
            .map(|(role, specs)| {
                let specs = specs
                    .iter()
                    .map(|(net, spec)| (net.to_string(), spec.clone()))
                    .collect();
                (role.to_string(), specs)
            })
            .collect()
    }

    fn resolver(
        network: &str,
        roles: BTreeMap<String, BTreeMap<String, AccountSpec>>,
    ) -> ConfiguredAccounts<DynProvider> {
        ConfiguredAccounts::new(
            network,
            roles,
            AvailableAccounts::Signers(vec![FIRST, SECOND]),
        )
    }

    #[tokio::test]
    async fn resolves_default_index() {
        let roles = roles(&[(DEPLOYER, &[("default", AccountSpec::Index(0))])]);
        let accounts = resolver("localhost", roles).named_accounts().await.unwrap();
        assert_eq!(accounts.get(DEPLOYER).unwrap(), FIRST);
    }

    #[tokio::test]
    async fn network_override_wins() {
        let roles = roles(&[(
            DEPLOYER,
            &[
                ("default", AccountSpec::Index(0)),
                ("sepolia", AccountSpec::Address(PINNED)),
            ],
        )]);
        let accounts = resolver("sepolia", roles.clone()).named_accounts().await.unwrap();
        assert_eq!(accounts.get(DEPLOYER).unwrap(), PINNED);

        let accounts = resolver("localhost", roles).named_accounts().await.unwrap();
        assert_eq!(accounts.get(DEPLOYER).unwrap(), FIRST);
    }

    #[tokio::test]
    async fn index_out_of_range() {
        let roles = roles(&[(DEPLOYER, &[("default", AccountSpec::Index(5))])]);
        let err = resolver("localhost", roles).named_accounts().await.unwrap_err();
        assert!(matches!(
            err,
            AccountsError::IndexOutOfRange { index: 5, available: 2, .. }
        ));
    }

    #[tokio::test]
    async fn role_without_spec_for_network_is_omitted() {
        let roles = roles(&[
            (DEPLOYER, &[("default", AccountSpec::Index(1))]),
            ("treasury", &[("mainnet", AccountSpec::Address(PINNED))]),
        ]);
        let accounts = resolver("localhost", roles).named_accounts().await.unwrap();
        assert_eq!(accounts.get(DEPLOYER).unwrap(), SECOND);
        assert!(matches!(
            accounts.get("treasury"),
            Err(AccountsError::UnknownRole(role)) if role == "treasury"
        ));
    }

    #[tokio::test]
    async fn literal_addresses_skip_the_node() {
        // nothing listens on this port, so any rpc call would fail
        let provider = ProviderBuilder::new()
            .connect_http("http://127.0.0.1:9".parse().unwrap())
            .erased();
        let roles = roles(&[(DEPLOYER, &[("default", AccountSpec::Address(PINNED))])]);
        let resolver =
            ConfiguredAccounts::new("localhost", roles, AvailableAccounts::Node(provider));
        let accounts = resolver.named_accounts().await.unwrap();
        assert_eq!(accounts.get(DEPLOYER).unwrap(), PINNED);
    }
}
