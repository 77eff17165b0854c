//! In-memory transport double for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

type Hook = Box<dyn Fn(&HttpRequest) + Send + Sync>;

/// Replays queued replies in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    hook: Mutex<Option<Hook>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(self: Arc<Self>, status: u16, body: &str) -> Arc<Self> {
        self.replies.lock().push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn fail(self: Arc<Self>, message: &str) -> Arc<Self> {
        self.replies.lock().push_back(Err(TransportError::new(message)));
        self
    }

    /// Called with each request before its reply is produced.
    pub(crate) fn on_request(self: Arc<Self>, hook: impl Fn(&HttpRequest) + Send + Sync + 'static) -> Arc<Self> {
        *self.hook.lock() = Some(Box::new(hook));
        self
    }

    /// Hold every request until `gate` is notified.
    pub(crate) fn gated(self: Arc<Self>, gate: Arc<Notify>) -> Arc<Self> {
        *self.gate.lock() = Some(gate);
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(hook) = self.hook.lock().as_ref() {
            hook(&request);
        }
        self.requests.lock().push(request);
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted reply")))
    }
}
