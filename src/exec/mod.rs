// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns the supervised command: spawning it with
//! `tokio::process::Command` in its own process group, watching for its exit,
//! and stopping it gracefully before a restart.

pub mod process;

pub use process::ProcessHandle;
