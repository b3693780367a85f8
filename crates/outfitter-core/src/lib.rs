//! Configuration and process setup for the Outfitter inventory ledger.
//!
//! The ledger crates are pure: they take a [`DepreciationCurve`] and a set of
//! catalog handles and never touch the filesystem or a global subscriber.
//! This crate is the thin layer that reads those inputs from
//! `outfitter.yaml` and installs structured logging.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration ([`OutfitterConfig`]) and loader
//! - [`logging`] -- `tracing` subscriber initialization
//!
//! [`DepreciationCurve`]: outfitter_ledger::DepreciationCurve

pub mod config;
pub mod logging;

pub use config::{ConfigError, LoggingConfig, OutfitterConfig, WearConfig};
