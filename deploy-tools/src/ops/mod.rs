// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub use deploy::{deploy, DeployConfig};
pub use tasks::{list_tasks, TaskInfo};

mod deploy;
mod tasks;
