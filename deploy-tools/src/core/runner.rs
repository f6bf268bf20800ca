// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Selecting and running deployment tasks.
//!
//! Each network keeps a ledger of the task ids that completed against it. A task found in the
//! ledger is skipped on later runs unless the runner is reset.

use std::{
    collections::{BTreeMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    core::task::{DeployTask, Environment, TaskError},
    utils::{color::Color, create_dir_if_dne, unix_now},
};

/// Ledger filename inside a network's deployments directory.
pub const LEDGER_FILENAME: &str = ".executed_tasks.json";

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("task id {0:?} is used by more than one task")]
    DuplicateId(String),
    #[error("task ledger io error: {0}")]
    LedgerIo(#[from] io::Error),
    #[error("task ledger {} is malformed: {source}", .path.display())]
    LedgerJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Task ids completed against one network, with the unix time they completed.
#[derive(Debug)]
pub struct TaskLedger {
    path: PathBuf,
    executed: BTreeMap<String, u64>,
}

impl TaskLedger {
    /// Loads the ledger from a network's deployments directory, starting empty if absent.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let path = dir.as_ref().join(LEDGER_FILENAME);
        let executed = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                RunnerError::LedgerJson {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, executed })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.executed.contains_key(id)
    }

    pub fn record(&mut self, id: &str) -> Result<(), RunnerError> {
        self.executed.insert(id.to_string(), unix_now());
        if let Some(dir) = self.path.parent() {
            create_dir_if_dne(dir)?;
        }
        let json =
            serde_json::to_string_pretty(&self.executed).map_err(|source| RunnerError::LedgerJson {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Ids of the tasks that ran or were skipped, in task order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

pub struct TaskRunner<'t> {
    tasks: &'t [Box<dyn DeployTask>],
    ledger: TaskLedger,
    reset: bool,
}

impl<'t> TaskRunner<'t> {
    pub fn new(tasks: &'t [Box<dyn DeployTask>], ledger: TaskLedger) -> Result<Self, RunnerError> {
        let mut ids = HashSet::new();
        for task in tasks {
            if !ids.insert(task.id()) {
                return Err(RunnerError::DuplicateId(task.id().to_string()));
            }
        }
        Ok(Self {
            tasks,
            ledger,
            reset: false,
        })
    }

    /// Run tasks even if the ledger says they already completed.
    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Tasks carrying any of `tags`, or every task when `tags` is empty.
    pub fn select(&self, tags: &[String]) -> Vec<&'t dyn DeployTask> {
        if tags.is_empty() {
            return self.tasks.iter().map(|task| &**task).collect();
        }
        for tag in tags {
            if !self.tasks.iter().any(|task| task.tags().contains(&tag.as_str())) {
                warn!(@yellow, "no task has tag {tag}");
            }
        }
        self.tasks
            .iter()
            .map(|task| &**task)
            .filter(|task| task.has_any_tag(tags))
            .collect()
    }

    /// Runs the selected tasks in order, stopping at the first failure.
    pub async fn run(
        &mut self,
        tags: &[String],
        env: &mut Environment<'_>,
    ) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::default();
        for task in self.select(tags) {
            let id = task.id();
            if !self.reset && self.ledger.contains(id) {
                info!(@grey, "skipping {id}: already executed on {}", env.network);
                summary.skipped.push(id);
                continue;
            }
            debug!(@grey, "running {} on {}", id.lavender(), env.network);
            if let Err(err) = task.run(env).await {
                log::error!("task {} failed", id.red());
                return Err(err.into());
            }
            self.ledger.record(id)?;
            summary.executed.push(id);
        }
        Ok(summary)
    }
}
