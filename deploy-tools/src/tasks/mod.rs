// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! The project's deployment tasks, in execution order.

use crate::core::task::DeployTask;

pub mod real_estate_nft;

pub use real_estate_nft::RealEstateNft;

pub fn all() -> Vec<Box<dyn DeployTask>> {
    vec![Box::new(RealEstateNft)]
}
