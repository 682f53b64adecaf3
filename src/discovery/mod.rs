// src/discovery/mod.rs

//! Testbench discovery and selection.
//!
//! - [`scan`] walks a base directory and finds every testbench directory.
//! - [`select`] filters the discovered targets against the user's patterns.

pub mod scan;
pub mod select;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::TargetName;

pub use scan::{discover_targets, is_testbench_makefile};
pub use select::{compile_patterns, select_targets};

/// A discovered testbench directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path relative to the base directory, `/`-separated.
    pub name: TargetName,
    /// Directory the build tool is invoked in.
    pub path: PathBuf,
}

impl Target {
    pub fn new(name: impl Into<TargetName>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Discovered targets keyed by name. Iteration order is lexicographic.
pub type TargetMap = BTreeMap<TargetName, PathBuf>;
