// src/discovery/select.rs

use regex::Regex;
use tracing::debug;

use crate::errors::{Result, SimbatchError};

use super::{Target, TargetMap};

/// Compile user patterns into regexes anchored at the start of the name.
///
/// A pattern selects a name when it matches a prefix of it, so `a/` selects
/// `a/tb` and `.*` selects everything.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                SimbatchError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// Select targets to run, in pattern order and then name order.
///
/// A name matched by `k` patterns is returned `k` times; each occurrence
/// becomes its own job.
pub fn select_targets(targets: &TargetMap, patterns: &[String]) -> Result<Vec<Target>> {
    let compiled = compile_patterns(patterns)?;
    let mut selected = Vec::new();

    for regex in &compiled {
        for (name, path) in targets {
            if regex.is_match(name) {
                selected.push(Target::new(name.clone(), path.clone()));
            }
        }
    }

    debug!(
        patterns = patterns.len(),
        selected = selected.len(),
        "selected targets"
    );
    Ok(selected)
}
