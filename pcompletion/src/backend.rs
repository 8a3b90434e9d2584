//! Backend contract for issuing one completion request, plus a scripted
//! in-memory backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use pcommon::BoxFuture;

use crate::{CompletionError, CompletionRequest, CompletionResponse};

pub type CompletionFuture<'a, T> = BoxFuture<'a, T>;

pub trait CompletionBackend: Send + Sync {
    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> CompletionFuture<'a, Result<CompletionResponse, CompletionError>>;
}

/// Replays a fixed sequence of outcomes and records every request it saw.
/// Used throughout the workspace tests to script provider behavior.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<CompletionResponse, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new(outcomes: Vec<Result<CompletionResponse, CompletionError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl CompletionBackend for ScriptedBackend {
    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> CompletionFuture<'a, Result<CompletionResponse, CompletionError>> {
        Box::pin(async move {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request);

            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .unwrap_or_else(|| {
                    Err(CompletionError::other("scripted backend has no outcomes left"))
                })
        })
    }
}
