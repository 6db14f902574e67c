use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use simple_file_watch::errors::{Result, WatchError};
use simple_file_watch::exec::{CallbackInvoker, CallbackOutcome};
use simple_file_watch::types::ChangeRecord;

/// What the fake reports for each invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehaviour {
    Succeed,
    /// Report a non-zero exit with this code.
    Fail(i32),
    /// Report a launch failure.
    LaunchError,
}

/// A fake invoker that:
/// - records every change list it was handed
/// - answers with a fixed `FakeBehaviour` instead of spawning a process.
pub struct FakeInvoker {
    calls: Arc<Mutex<Vec<Vec<ChangeRecord>>>>,
    behaviour: FakeBehaviour,
}

impl FakeInvoker {
    pub fn new(calls: Arc<Mutex<Vec<Vec<ChangeRecord>>>>) -> Self {
        Self {
            calls,
            behaviour: FakeBehaviour::Succeed,
        }
    }

    pub fn with_behaviour(mut self, behaviour: FakeBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }
}

impl CallbackInvoker for FakeInvoker {
    fn invoke<'a>(
        &'a mut self,
        changes: &'a [ChangeRecord],
    ) -> Pin<Box<dyn Future<Output = Result<CallbackOutcome>> + Send + 'a>> {
        let calls = Arc::clone(&self.calls);
        let behaviour = self.behaviour;

        Box::pin(async move {
            {
                let mut guard = calls.lock().unwrap();
                guard.push(changes.to_vec());
            }

            match behaviour {
                FakeBehaviour::Succeed => Ok(CallbackOutcome::Success {
                    stdout: String::new(),
                    stderr: String::new(),
                }),
                FakeBehaviour::Fail(code) => Ok(CallbackOutcome::Failed {
                    code: Some(code),
                    stdout: String::new(),
                    stderr: "fake failure".to_string(),
                }),
                FakeBehaviour::LaunchError => Err(WatchError::Spawn {
                    program: "fake".to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such program"),
                }),
            }
        })
    }
}
