// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Deployment tasks and the environment they run in.

use std::io::Write;

use async_trait::async_trait;

use crate::core::{
    accounts::{AccountResolver, AccountsError},
    deployment::{DeploymentError, Deployments},
};

/// Capabilities handed to a running task.
pub struct Environment<'a> {
    /// Name of the target network from the manifest.
    pub network: &'a str,
    pub accounts: &'a dyn AccountResolver,
    pub deployments: &'a dyn Deployments,
    /// Sink for the task's own output lines (stdout when run from the CLI).
    pub stdout: &'a mut (dyn Write + Send),
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Accounts(#[from] AccountsError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error("failed to write task output: {0}")]
    Output(#[from] std::io::Error),
}

/// A unit of deployment work.
///
/// The id is the key the runner uses to avoid re-running a task against a network, so it must be
/// unique across the task set and must not change between releases. Tags select groups of tasks
/// from the command line.
#[async_trait]
pub trait DeployTask: Send + Sync {
    fn id(&self) -> &'static str;

    fn tags(&self) -> &'static [&'static str];

    async fn run(&self, env: &mut Environment<'_>) -> Result<(), TaskError>;

    fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags().iter().any(|tag| tags.iter().any(|t| t == tag))
    }
}
