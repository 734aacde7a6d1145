use crate::api::client::MockCompletionProducer;
use crate::error::{CforError, ResponseParseError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Serves canned chat-completion bodies in order and records what was sent.
#[derive(Clone)]
pub struct MockApiClient {
    responses: Arc<Mutex<Vec<String>>>,
    payloads: Arc<Mutex<Vec<Value>>>,
    calls: Arc<AtomicUsize>,
}

impl MockApiClient {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            payloads: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wraps each message content in a completion envelope with the given usage.
    pub fn with_commands(
        contents: Vec<&str>,
        prompt_tokens: u64,
        cached_tokens: u64,
        completion_tokens: u64,
    ) -> Self {
        let responses = contents
            .into_iter()
            .map(|content| {
                json!({
                    "id": "chatcmpl-mock",
                    "object": "chat.completion",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": content},
                        "finish_reason": "stop",
                    }],
                    "usage": {
                        "prompt_tokens": prompt_tokens,
                        "completion_tokens": completion_tokens,
                        "total_tokens": prompt_tokens + completion_tokens,
                        "prompt_tokens_details": {"cached_tokens": cached_tokens},
                    },
                })
                .to_string()
            })
            .collect();
        Self::new(responses)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

impl MockCompletionProducer for MockApiClient {
    fn create_mock_completion(&self, payload: &Value) -> Result<String, CforError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());

        let mut responses_guard = self.responses.lock().unwrap();
        if responses_guard.is_empty() {
            return Err(ResponseParseError::MissingContent.into());
        }
        Ok(responses_guard.remove(0))
    }
}
