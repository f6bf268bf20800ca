// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use deploy_tools::ops;

use crate::{error::CliResult, utils::style::TAG};

#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: Args) -> CliResult {
    for task in ops::list_tasks() {
        let tags: Vec<_> = task.tags.iter().map(|tag| format!("{TAG}{tag}{TAG:#}")).collect();
        println!("{} [{}]", task.id, tags.join(", "));
    }
    Ok(())
}
