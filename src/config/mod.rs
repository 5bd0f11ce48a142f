// src/config/mod.rs

//! Configuration loading and persistence for watchrun.
//!
//! Responsibilities:
//! - Define the TOML-backed `{directory, patterns, command}` triple (`model.rs`).
//! - Load it from disk, merge CLI overrides and write it back (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_from_path, load_or_default, resolve, save_to_path};
pub use model::ConfigFile;
