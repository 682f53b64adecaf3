use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use simbatch::discovery::Target;
use simbatch::exec::{JobExecutor, JobFuture, JobResult};

/// What the scripted executor does for one target.
#[derive(Debug, Clone)]
pub enum Script {
    /// Return this result after an optional delay.
    Return(JobResult, Duration),
    /// Never finish on its own.
    Hang,
    /// Panic inside `execute`.
    Panic,
}

/// A fake executor that:
/// - records which targets were started (in start order)
/// - returns a scripted result per target name (default: `ParseError`)
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    started: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returns(self, name: &str, result: JobResult) -> Self {
        self.script(name, Script::Return(result, Duration::ZERO))
    }

    pub fn returns_after(self, name: &str, result: JobResult, delay: Duration) -> Self {
        self.script(name, Script::Return(result, delay))
    }

    pub fn hangs(self, name: &str) -> Self {
        self.script(name, Script::Hang)
    }

    pub fn panics(self, name: &str) -> Self {
        self.script(name, Script::Panic)
    }

    fn script(self, name: &str, script: Script) -> Self {
        self.scripts.lock().unwrap().insert(name.to_string(), script);
        self
    }

    /// Targets started so far.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

impl JobExecutor for ScriptedExecutor {
    fn execute<'a>(&'a self, target: &'a Target) -> JobFuture<'a> {
        Box::pin(async move {
            self.started.lock().unwrap().push(target.name.clone());
            let script = self.scripts.lock().unwrap().get(&target.name).cloned();

            match script {
                Some(Script::Return(result, delay)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    result
                }
                Some(Script::Hang) => std::future::pending().await,
                Some(Script::Panic) => panic!("scripted panic for {}", target.name),
                None => JobResult::ParseError { output: Vec::new() },
            }
        })
    }
}
