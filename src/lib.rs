// Copyright 2026 Herorates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Herorates library — harvest hero statistics from a remote rates API
//! into local CSV datasets.
//!
//! This library crate exposes the core modules for integration testing.

pub mod audit;
pub mod cli;
pub mod export;
pub mod fetch;
pub mod harvest;
pub mod normalize;
pub mod params;
