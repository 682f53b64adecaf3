// src/engine/progress.rs

use std::io::Write;
use std::time::{Duration, Instant};

/// Writes the `>>> [H:MM:SS] (c/t simulations completed) <<<` status line.
///
/// Each update rewrites the same terminal line (`\r`); [`finish`] ends it.
///
/// [`finish`]: ProgressReporter::finish
#[derive(Debug)]
pub struct ProgressReporter<W: Write> {
    out: W,
    start: Instant,
    dirty: bool,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            start: Instant::now(),
            dirty: false,
        }
    }

    pub fn update(&mut self, completed: usize, total: usize) {
        let line = progress_line(self.start.elapsed(), completed, total);
        // Progress output is best effort; a closed stderr must not fail the run.
        let _ = write!(self.out, "\r{line}");
        let _ = self.out.flush();
        self.dirty = true;
    }

    /// Terminate the status line if one was written.
    pub fn finish(&mut self) {
        if self.dirty {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.dirty = false;
        }
    }
}

/// Format one progress line for the given elapsed time.
pub fn progress_line(elapsed: Duration, completed: usize, total: usize) -> String {
    format!(
        ">>> [{}] ({completed}/{total} simulations completed) <<<",
        format_elapsed(elapsed)
    )
}

/// `H:MM:SS`, truncated to whole seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
