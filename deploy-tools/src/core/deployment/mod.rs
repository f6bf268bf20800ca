// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deploy-or-reuse of named contracts.

use std::path::PathBuf;

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, TxHash, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;

use crate::{
    core::artifact::{Artifact, ArtifactError},
    utils::{
        color::{Color, DebugColor},
        format_gas,
    },
};
use record::{DeploymentRecord, RecordError, RecordStore};
use request::DeploymentRequest;

pub mod record;
pub mod request;

/// Options for a single deploy-or-reuse call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployOptions {
    /// Sender of the deployment transaction.
    pub from: Address,
    /// Whether the deployment backend should log its own progress.
    pub log: bool,
}

/// Where a named contract lives after a deploy-or-reuse call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeploymentResult {
    pub address: Address,
    /// Creation transaction, if known.
    pub transaction_hash: Option<TxHash>,
    /// `false` when an earlier deployment was reused.
    pub newly_deployed: bool,
    pub gas_used: Option<u64>,
    pub abi: JsonAbi,
}

impl DeploymentResult {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }
}

impl From<DeploymentRecord> for DeploymentResult {
    fn from(record: DeploymentRecord) -> Self {
        Self {
            address: record.address,
            transaction_hash: Some(record.transaction_hash),
            newly_deployed: false,
            gas_used: Some(record.gas_used),
            abi: record.abi,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),
    #[error("{0}")]
    Artifact(#[from] ArtifactError),
    #[error("{0}")]
    Record(#[from] RecordError),

    #[error("tx failed to complete")]
    FailedToComplete,
    #[error("failed to get balance")]
    FailedToGetBalance(#[source] RpcError<TransportErrorKind>),
    #[error(
        "not enough funds in account {} to deploy\n\
         balance {} < {}",
        .from_address.red(),
        .balance.red(),
        format!("{} wei", .cost).red(),
    )]
    NotEnoughFunds {
        from_address: Address,
        balance: U256,
        cost: U256,
    },
    #[error("deploy tx reverted {}", .tx_hash.debug_red())]
    Reverted { tx_hash: TxHash },
    #[error("missing contract address in receipt for {0}")]
    MissingReceiptAddress(TxHash),
    #[error("contract {0:?} requires constructor arguments")]
    ConstructorArgsRequired(String),
}

/// Deploys a named contract, or returns its existing deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Deployments: Send + Sync {
    async fn deploy(
        &self,
        name: &str,
        options: DeployOptions,
    ) -> Result<DeploymentResult, DeploymentError>;
}

/// [`Deployments`] backed by a JSON-RPC node, compiled artifacts, and on-disk records.
#[derive(Debug)]
pub struct ChainDeployments<P> {
    provider: P,
    artifacts: PathBuf,
    records: RecordStore,
    max_fee_per_gas_wei: Option<u128>,
}

impl<P: Provider> ChainDeployments<P> {
    pub fn new(provider: P, artifacts: impl Into<PathBuf>, records: RecordStore) -> Self {
        Self {
            provider,
            artifacts: artifacts.into(),
            records,
            max_fee_per_gas_wei: None,
        }
    }

    pub fn with_max_fee_per_gas(mut self, wei: Option<u128>) -> Self {
        self.max_fee_per_gas_wei = wei;
        self
    }

    /// Returns the recorded deployment if it still matches the artifact and has code on chain.
    async fn existing(
        &self,
        name: &str,
        artifact: &Artifact,
    ) -> Result<Option<DeploymentRecord>, DeploymentError> {
        let Some(record) = self.records.load(name)? else {
            return Ok(None);
        };
        if bytecode_changed(&record, artifact.bytecode_hash()) {
            debug!(@grey, "bytecode of {name} changed since last deployment");
            return Ok(None);
        }
        let code = self.provider.get_code_at(record.address).await?;
        if code.is_empty() {
            debug!(@grey, "no code at recorded address {} for {name}", record.address);
            return Ok(None);
        }
        Ok(Some(record))
    }
}

#[async_trait]
impl<P: Provider> Deployments for ChainDeployments<P> {
    async fn deploy(
        &self,
        name: &str,
        options: DeployOptions,
    ) -> Result<DeploymentResult, DeploymentError> {
        let artifact = Artifact::find(&self.artifacts, name)?;
        if artifact.has_constructor_args() {
            return Err(DeploymentError::ConstructorArgsRequired(name.to_string()));
        }

        // fail before anything is sent if the record cannot be written
        self.records.prepare()?;

        if let Some(record) = self.existing(name, &artifact).await? {
            if options.log {
                info!(@grey, "reusing \"{name}\" at {}", record.address.lavender());
            }
            return Ok(record.into());
        }

        debug!(@grey, "sender address: {}", options.from.lavender());
        let req = DeploymentRequest::new(
            options.from,
            artifact.bytecode.clone(),
            self.max_fee_per_gas_wei,
        );
        let receipt = req.exec(&self.provider).await?;
        self.record_deployment(name, artifact, &receipt, options.log)
    }
}

impl<P> ChainDeployments<P> {
    /// Saves the record for a mined deployment and reports it as new.
    fn record_deployment(
        &self,
        name: &str,
        artifact: Artifact,
        receipt: &TransactionReceipt,
        log: bool,
    ) -> Result<DeploymentResult, DeploymentError> {
        let tx_hash = receipt.transaction_hash;
        let address = receipt
            .contract_address
            .ok_or(DeploymentError::MissingReceiptAddress(tx_hash))?;

        let record = DeploymentRecord {
            address,
            transaction_hash: tx_hash,
            bytecode_hash: artifact.bytecode_hash(),
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            abi: artifact.abi,
        };
        self.records.save(name, &record)?;

        if log {
            info!(@grey,
                "deploying \"{name}\" (tx: {}): deployed at {} with {}",
                tx_hash.debug_lavender(),
                address.lavender(),
                format_gas(receipt.gas_used)
            );
        }

        let mut result = DeploymentResult::from(record);
        result.newly_deployed = true;
        Ok(result)
    }
}

fn bytecode_changed(record: &DeploymentRecord, artifact_hash: B256) -> bool {
    record.bytecode_hash != artifact_hash
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy::{
        primitives::{address, b256, Bloom, Bytes, U128, U64},
        providers::ProviderBuilder,
        transports::mock::Asserter,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::artifact::tests::{write_artifact, CONTRACT};

    const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const DEPLOYED: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const BYTECODE: &str = "0x6080604052";
    const TX_HASH: TxHash =
        b256!("3333333333333333333333333333333333333333333333333333333333333333");

    fn options() -> DeployOptions {
        DeployOptions {
            from: DEPLOYER,
            log: true,
        }
    }

    fn record(bytecode_hash: B256) -> DeploymentRecord {
        DeploymentRecord {
            address: DEPLOYED,
            transaction_hash: b256!(
                "1111111111111111111111111111111111111111111111111111111111111111"
            ),
            bytecode_hash,
            block_number: Some(1),
            gas_used: 21_000,
            abi: JsonAbi::default(),
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        asserter: Asserter,
        deployments: ChainDeployments<alloy::providers::DynProvider>,
        records: RecordStore,
        bytecode_hash: B256,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = dir.path().join("artifacts");
        let path = write_artifact(&artifacts, CONTRACT, BYTECODE);
        let bytecode_hash = Artifact::load(path).unwrap().bytecode_hash();
        let records = RecordStore::new(dir.path().join("deployments"), "localhost");

        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter.clone())
            .erased();
        let deployments = ChainDeployments::new(provider, artifacts, records.clone());
        Fixture {
            _dir: dir,
            asserter,
            deployments,
            records,
            bytecode_hash,
        }
    }

    fn receipt(status: bool, contract_address: Option<Address>) -> TransactionReceipt {
        let status = if status { "0x1" } else { "0x0" };
        let block_hash = b256!("4444444444444444444444444444444444444444444444444444444444444444");
        serde_json::from_value(serde_json::json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x186a0",
            "logs": [],
            "logsBloom": Bloom::ZERO,
            "transactionHash": TX_HASH,
            "transactionIndex": "0x0",
            "blockHash": block_hash,
            "blockNumber": "0x7",
            "gasUsed": "0x186a0",
            "effectiveGasPrice": "0x3b9aca00",
            "from": DEPLOYER,
            "to": null,
            "contractAddress": contract_address,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn reuses_matching_deployment() {
        let fixture = fixture();
        fixture
            .records
            .save(CONTRACT, &record(fixture.bytecode_hash))
            .unwrap();
        // eth_getCode at the recorded address
        fixture.asserter.push_success(&Bytes::from_static(&[0x60, 0x80]));

        let result = fixture
            .deployments
            .deploy(CONTRACT, options())
            .await
            .unwrap();
        assert_eq!(result.address, DEPLOYED);
        assert!(!result.newly_deployed);
        assert_eq!(result.gas_used, Some(21_000));
    }

    #[tokio::test]
    async fn missing_artifact_fails_before_rpc() {
        let fixture = fixture();
        let err = fixture
            .deployments
            .deploy("Marketplace", options())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeploymentError::Artifact(ArtifactError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn rpc_failure_propagates() {
        let fixture = fixture();
        fixture
            .records
            .save(CONTRACT, &record(fixture.bytecode_hash))
            .unwrap();
        fixture.asserter.push_failure_msg("node unavailable");

        let err = fixture
            .deployments
            .deploy(CONTRACT, options())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::Rpc(_)));
    }

    #[tokio::test]
    async fn constructor_args_fail_before_rpc() {
        let fixture = fixture();
        let path = write_artifact(&fixture.deployments.artifacts, "RealEstateEscrow", BYTECODE);
        let json = fs::read_to_string(&path).unwrap().replacen(
            r#""inputs": [],"#,
            r#""inputs": [{ "internalType": "address", "name": "nft", "type": "address" }],"#,
            1,
        );
        fs::write(&path, json).unwrap();

        let err = fixture
            .deployments
            .deploy("RealEstateEscrow", options())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeploymentError::ConstructorArgsRequired(name) if name == "RealEstateEscrow"
        ));
    }

    #[tokio::test]
    async fn unwritable_records_fail_before_rpc() {
        let fixture = fixture();
        fs::create_dir_all(fixture.records.dir().parent().unwrap()).unwrap();
        fs::write(fixture.records.dir(), "").unwrap();

        // nothing is queued on the node, so any request would fail with an rpc error
        let err = fixture
            .deployments
            .deploy(CONTRACT, options())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::Record(RecordError::Io(_))));
    }

    #[tokio::test]
    async fn not_enough_funds() {
        let fixture = fixture();
        // eth_estimateGas, eth_gasPrice, eth_getBalance
        fixture.asserter.push_success(&U64::from(100_000));
        fixture.asserter.push_success(&U128::from(1_000_000_000));
        fixture.asserter.push_success(&U256::from(1));

        let err = fixture
            .deployments
            .deploy(CONTRACT, options())
            .await
            .unwrap_err();
        let DeploymentError::NotEnoughFunds {
            from_address,
            balance,
            cost,
        } = err
        else {
            panic!("expected not enough funds, got {err:?}");
        };
        assert_eq!(from_address, DEPLOYER);
        assert_eq!(balance, U256::from(1));
        assert_eq!(cost, U256::from(100_000u64 * 1_000_000_000));
        assert_eq!(fixture.records.load(CONTRACT).unwrap(), None);
    }

    #[tokio::test]
    async fn balance_failure_keeps_rpc_cause() {
        let mut fixture = fixture();
        fixture.deployments.max_fee_per_gas_wei = Some(1);
        // eth_estimateGas, then eth_getBalance fails
        fixture.asserter.push_success(&U64::from(100_000));
        fixture.asserter.push_failure_msg("header not found");

        let err = fixture
            .deployments
            .deploy(CONTRACT, options())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::FailedToGetBalance(_)));
        let cause = std::error::Error::source(&err).unwrap().to_string();
        assert!(cause.contains("header not found"), "{cause}");
    }

    #[test]
    fn reverted_receipt() {
        let err = request::check_status(receipt(false, None)).unwrap_err();
        assert!(matches!(err, DeploymentError::Reverted { tx_hash } if tx_hash == TX_HASH));
        assert!(request::check_status(receipt(true, Some(DEPLOYED))).is_ok());
    }

    #[tokio::test]
    async fn records_new_deployment_then_reuses_it() {
        let fixture = fixture();
        let artifact = Artifact::find(&fixture.deployments.artifacts, CONTRACT).unwrap();
        let result = fixture
            .deployments
            .record_deployment(CONTRACT, artifact, &receipt(true, Some(DEPLOYED)), true)
            .unwrap();
        assert!(result.newly_deployed);
        assert_eq!(result.address, DEPLOYED);
        assert_eq!(result.transaction_hash, Some(TX_HASH));
        assert_eq!(result.gas_used, Some(100_000));

        let saved = fixture.records.load(CONTRACT).unwrap().unwrap();
        assert_eq!(saved.bytecode_hash, fixture.bytecode_hash);
        assert_eq!(saved.block_number, Some(7));

        // eth_getCode at the recorded address
        fixture.asserter.push_success(&Bytes::from_static(&[0x60, 0x80]));
        let reused = fixture
            .deployments
            .deploy(CONTRACT, options())
            .await
            .unwrap();
        assert!(!reused.newly_deployed);
        assert_eq!(reused.address, DEPLOYED);
    }

    #[test]
    fn missing_receipt_address() {
        let fixture = fixture();
        let artifact = Artifact::find(&fixture.deployments.artifacts, CONTRACT).unwrap();
        let err = fixture
            .deployments
            .record_deployment(CONTRACT, artifact, &receipt(true, None), false)
            .unwrap_err();
        assert!(matches!(err, DeploymentError::MissingReceiptAddress(hash) if hash == TX_HASH));
        assert_eq!(fixture.records.load(CONTRACT).unwrap(), None);
    }

    #[test]
    fn detects_changed_bytecode() {
        let hash = b256!("2222222222222222222222222222222222222222222222222222222222222222");
        assert!(!bytecode_changed(&record(hash), hash));
        assert!(bytecode_changed(&record(hash), B256::ZERO));
    }

    #[test]
    fn result_from_record() {
        let result = DeploymentResult::from(record(B256::ZERO));
        assert_eq!(result.address, DEPLOYED);
        assert!(!result.newly_deployed);
        assert!(result.transaction_hash.is_some());
    }
}
