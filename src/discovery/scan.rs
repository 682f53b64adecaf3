// src/discovery/scan.rs

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::fs::FileSystem;

use super::TargetMap;

/// File that marks a candidate testbench directory.
pub const MAKEFILE_NAME: &str = "Makefile";

/// A Makefile qualifies when one of its lines pulls in the shared
/// simulation preamble.
static PREAMBLE_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"include.*viv_sim_preamble\.mak").expect("static preamble regex is valid")
});

/// Returns true if any line of the Makefile includes the simulation preamble.
pub fn is_testbench_makefile(contents: &str) -> bool {
    contents.lines().any(|line| PREAMBLE_INCLUDE.is_match(line))
}

/// Recursively find every testbench directory under `base`.
///
/// Keys are paths relative to `base` (`"."` for `base` itself), values are
/// `base` joined with that relative path. Qualification does not stop the
/// descent: nested testbenches are found too. Symlinked directories are not
/// entered, and neither are hidden directories (`.Xil`, ...) directly inside
/// a testbench, which hold simulator output.
///
/// Unreadable directories and Makefiles are logged and skipped.
pub fn discover_targets(fs: &dyn FileSystem, base: &Path) -> TargetMap {
    let mut targets = TargetMap::new();
    let mut stack = vec![base.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
                continue;
            }
        };

        let qualified = entries
            .iter()
            .any(|path| is_qualifying_makefile(fs, path));
        if qualified {
            let name = relative_name(base, &dir);
            debug!(target = %name, "found testbench");
            targets.insert(name, dir.clone());
        }

        for path in entries {
            if !fs.is_dir(&path) {
                continue;
            }
            if fs.is_symlink(&path) || (qualified && is_hidden(&path)) {
                debug!(dir = %path.display(), "not descending");
                continue;
            }
            stack.push(path);
        }
    }

    targets
}

fn is_qualifying_makefile(fs: &dyn FileSystem, path: &Path) -> bool {
    if !path.file_name().is_some_and(|n| n == MAKEFILE_NAME) || !fs.is_file(path) {
        return false;
    }
    match fs.read_to_string(path) {
        Ok(contents) => is_testbench_makefile(&contents),
        Err(err) => {
            warn!(file = %path.display(), error = %err, "skipping unreadable Makefile");
            false
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn relative_name(base: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(base).unwrap_or(dir);
    let name = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if name.is_empty() { ".".to_string() } else { name }
}
