// src/config/model.rs

use serde::{Deserialize, Serialize};

/// Resolved watch options, also the on-disk TOML layout:
///
/// ```toml
/// directory = "."
/// patterns = ["*.go", "*.html"]
/// command = ["go", "run", "."]
/// ```
///
/// Every field is optional in the file and has a usable default, so an empty
/// (or absent) config file means "watch everything under the current
/// directory and run nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Directory to watch, relative paths resolved against the working
    /// directory at startup.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Basename glob patterns a changed file must match.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Command to supervise as `[program, arg, ...]`; empty means watch-only.
    #[serde(default)]
    pub command: Vec<String>,
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_patterns() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            patterns: default_patterns(),
            command: Vec::new(),
        }
    }
}
