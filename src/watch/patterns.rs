// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::Result;

/// Compiled filename patterns, fixed for the process lifetime.
///
/// Patterns are matched against the basename of a changed path only, never
/// the full path: `"*.go"` matches `src/deep/nested/file.go`. The configured
/// pattern strings are kept in order for display and for counting how many
/// patterns a name matches.
#[derive(Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.patterns.join(", "))
    }
}

impl PatternSet {
    /// Compile glob patterns into a set.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
            builder.add(glob);
        }
        let set = builder.build()?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// Number of patterns the given basename matches.
    ///
    /// The filter emits a changed path once per matching pattern; the
    /// debounce stage collapses the duplicates again. Matching works on the
    /// raw bytes of the name, so basenames that are not valid UTF-8 still
    /// match.
    pub fn match_count(&self, basename: impl AsRef<Path>) -> usize {
        self.set.matches(basename).len()
    }

    /// Whether the given basename matches at least one pattern.
    pub fn is_match(&self, basename: impl AsRef<Path>) -> bool {
        self.set.is_match(basename)
    }

    /// True when no patterns were configured; nothing will ever match.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The configured pattern strings, in order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
