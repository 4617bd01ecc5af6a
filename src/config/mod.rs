// src/config/mod.rs

//! Configuration loading and validation for scriptcollect.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate invariants like adapter names and intervals (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_from_str, resolve_config_path,
};
pub use model::{
    ConfigFile, ConfigSection, EngineSection, ExporterSection, IntegrationConfig, RawConfigFile,
};
pub use validate::validate_config;
