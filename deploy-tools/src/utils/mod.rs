// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! General purpose utilities.

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy::primitives::U256;
use color::Color;

pub mod color;

/// Pretty-prints an amount of wei as ETH, colored by how large it is.
pub fn format_eth(wei: U256) -> String {
    let Ok(gwei): Result<u64, _> = (wei / U256::from(1_000_000_000u64)).try_into() else {
        return "???".red();
    };
    let eth = gwei as f64 / 1e9;
    let text = format!("{eth:.6} ETH");
    if eth <= 0.01 {
        text.mint()
    } else if eth <= 0.1 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Pretty-prints gas usage.
pub fn format_gas(gas: u64) -> String {
    let text = format!("{gas} gas");
    if gas <= 3_000_000 {
        text.mint()
    } else if gas <= 7_000_000 {
        text.yellow()
    } else {
        text.pink()
    }
}

/// Check if a directory exists, creating it and any parents if not.
pub fn create_dir_if_dne(path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Seconds since the unix epoch, or zero if the clock is before it.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
