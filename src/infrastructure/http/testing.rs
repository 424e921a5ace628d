//! Scripted transport for unit tests.

use crate::infrastructure::http::transport::{
    HttpRequest, HttpResponse, HttpTransport, TransportError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// What the next call to [`ScriptedTransport::execute`] does.
#[derive(Debug)]
pub(crate) enum Step {
    Respond(Result<HttpResponse, TransportError>),
    Hang,
    Panic,
}

/// Replays scripted steps in order and records every request it sees.
///
/// Once the script runs out every call answers `200 []`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn responding(status: u16, body: &'static str) -> Self {
        Self::new([Step::Respond(Ok(HttpResponse::new(status, body)))])
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    #[allow(clippy::panic)]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        let step = self.steps.lock().pop_front();
        match step {
            Some(Step::Respond(outcome)) => outcome,
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Timeout("scripted hang elapsed".into()))
            }
            Some(Step::Panic) => panic!("scripted transport failure"),
            None => Ok(HttpResponse::new(200, "[]")),
        }
    }
}
