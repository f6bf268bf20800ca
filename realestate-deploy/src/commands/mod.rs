// Copyright 2025-2026, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::error::CliResult;

mod deploy;
mod tasks;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Run deployment tasks against a network
    #[clap(visible_alias = "d")]
    Deploy(deploy::Args),
    /// List deployment tasks and their tags
    #[clap(visible_alias = "t")]
    Tasks(tasks::Args),
}

pub async fn exec(cmd: Command) -> CliResult {
    match cmd {
        Command::Deploy(args) => deploy::exec(args).await,
        Command::Tasks(args) => tasks::exec(args),
    }
}
