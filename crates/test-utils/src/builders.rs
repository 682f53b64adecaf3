#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use simbatch::exec::ExecConfig;
use simbatch::types::Simulator;

/// Makefile body that qualifies a directory as a testbench.
pub const TESTBENCH_MAKEFILE: &str = "\
SIM_TOP = tb
include $(BASE_DIR)/../tools/make/viv_sim_preamble.mak
include $(BASE_DIR)/../tools/make/viv_simulator.mak
";

/// Makefile body that does not include the simulation preamble.
pub const PLAIN_MAKEFILE: &str = "\
all:
\techo building
";

/// Build-tool stand-in used by the on-disk trees.
///
/// Invoked as `sh fake_tool.sh <action>` in a testbench directory:
/// - writes `ran.<action>` containing `$SIMBATCH_TARGET` and the physical working directory
/// - sleeps for `sleep` seconds if that file exists
/// - prints `output.txt` if present
/// - exits with the code in `exit_code` (default 0)
const FAKE_TOOL: &str = r#"
printf '%s\n%s\n' "$SIMBATCH_TARGET" "$(pwd -P)" > "ran.$1"
if [ -f sleep ]; then sleep "$(cat sleep)"; fi
if [ -f output.txt ]; then cat output.txt; fi
echo "fake tool stderr" >&2
if [ -f exit_code ]; then exit "$(cat exit_code)"; fi
exit 0
"#;

/// Builder for a temporary directory tree of testbenches.
pub struct TestbenchTreeBuilder {
    dir: TempDir,
}

impl TestbenchTreeBuilder {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("creating temp dir")?;
        fs::write(dir.path().join("fake_tool.sh"), FAKE_TOOL).context("writing fake tool")?;
        Ok(Self { dir })
    }

    /// Add a qualifying testbench at `rel`.
    pub fn testbench(self, rel: &str) -> Result<Self> {
        self.makefile(rel, TESTBENCH_MAKEFILE)
    }

    /// Add a directory whose Makefile does not qualify.
    pub fn plain(self, rel: &str) -> Result<Self> {
        self.makefile(rel, PLAIN_MAKEFILE)
    }

    pub fn makefile(self, rel: &str, contents: &str) -> Result<Self> {
        self.file(rel, "Makefile", contents)
    }

    /// Output printed by the fake tool in `rel`.
    pub fn output(self, rel: &str, output: &str) -> Result<Self> {
        self.file(rel, "output.txt", output)
    }

    /// Exit code of the fake tool in `rel`.
    pub fn exit_code(self, rel: &str, code: i32) -> Result<Self> {
        self.file(rel, "exit_code", &code.to_string())
    }

    /// Make the fake tool in `rel` sleep before finishing.
    pub fn sleep(self, rel: &str, secs: u32) -> Result<Self> {
        self.file(rel, "sleep", &secs.to_string())
    }

    pub fn file(self, rel: &str, name: &str, contents: &str) -> Result<Self> {
        let dir = self.dir.path().join(rel);
        fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;
        fs::write(dir.join(name), contents).with_context(|| format!("writing {name} in {rel}"))?;
        Ok(self)
    }

    pub fn build(self) -> TestbenchTree {
        TestbenchTree { dir: self.dir }
    }
}

/// A built tree; removed when dropped.
pub struct TestbenchTree {
    dir: TempDir,
}

impl TestbenchTree {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute root path as discovery would see it.
    pub fn canonical_root(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).expect("temp dir can be canonicalized")
    }

    /// `ExecConfig` that runs the fake tool and skips the toolchain check.
    pub fn exec_config(&self, simulator: Simulator) -> ExecConfig {
        let tool = self.canonical_root().join("fake_tool.sh");
        ExecConfig::new(simulator)
            .with_build_tool(format!("sh '{}'", tool.display()))
            .with_toolchain_marker(None)
    }

    /// Contents of the marker the fake tool wrote in `rel` for `action`.
    pub fn marker(&self, rel: &str, action: &str) -> Option<String> {
        fs::read_to_string(self.dir.path().join(rel).join(format!("ran.{action}"))).ok()
    }
}
