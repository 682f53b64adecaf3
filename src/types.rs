use std::fmt;

use clap::ValueEnum;

/// Canonical target name type: the job directory relative to the base dir,
/// using `/` separators.
pub type TargetName = String;

/// Simulator backend, passed to the build tool as its make target.
///
/// - `Xsim`: Vivado simulator (default).
/// - `Vsim`: ModelSim / Questa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Simulator {
    Xsim,
    Vsim,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::Xsim
    }
}

impl Simulator {
    /// Build-tool target name for this simulator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Simulator::Xsim => "xsim",
            Simulator::Vsim => "vsim",
        }
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
