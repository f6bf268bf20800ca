// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::tasks;

#[derive(Debug, PartialEq, Eq)]
pub struct TaskInfo {
    pub id: &'static str,
    pub tags: &'static [&'static str],
}

/// Ids and tags of the registered tasks, in execution order.
pub fn list_tasks() -> Vec<TaskInfo> {
    tasks::all()
        .iter()
        .map(|task| TaskInfo {
            id: task.id(),
            tags: task.tags(),
        })
        .collect()
}
