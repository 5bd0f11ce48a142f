// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`), registering
//!   every directory under the root and picking up new ones as they appear.
//! - Compiling the configured glob patterns and filtering raw change events
//!   down to matching files.
//! - Coalescing bursts of changes into one deduplicated batch.
//!
//! It does **not** know about the supervised command; it only turns
//! filesystem changes into batches of changed paths.

pub mod debounce;
pub mod filter;
pub mod patterns;
pub mod watcher;

pub use debounce::gather;
pub use filter::spawn_filter;
pub use patterns::PatternSet;
pub use watcher::{spawn_watcher, ChangeEvent, ChangeKind};
