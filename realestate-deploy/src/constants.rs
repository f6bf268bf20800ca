// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

/// Network used when `--network` is not given.
pub const DEFAULT_NETWORK: &str = "localhost";
