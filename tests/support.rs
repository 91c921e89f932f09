//! Shared test support: a transport that replays scripted responses.

use async_trait::async_trait;
use follow_graph_crawler::api::transport::Transport;
use follow_graph_crawler::api::{ApiError, ApiResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared request counter handed out by [`ScriptedTransport::calls`].
#[derive(Clone)]
pub struct CallCounter(Arc<Mutex<usize>>);

impl CallCounter {
    pub fn count(&self) -> usize {
        *self.0.lock().unwrap()
    }
}

/// Transport that replays a fixed sequence of JSON bodies.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<serde_json::Value>>,
    calls: CallCounter,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<serde_json::Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: CallCounter(Arc::new(Mutex::new(0))),
        }
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, _url: &str) -> ApiResult<serde_json::Value> {
        *self.calls.0.lock().unwrap() += 1;
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            ApiError::InvalidResponse("scripted transport exhausted".to_string())
        })
    }
}

/// Build a follows page body of `n` edges starting at id `start`.
pub fn page_body(start: usize, n: usize, total: u64, cursor: Option<&str>) -> serde_json::Value {
    let data: Vec<_> = (start..start + n)
        .map(|i| {
            serde_json::json!({
                "from_id": i.to_string(),
                "from_name": format!("user{i}"),
                "to_id": "9",
                "to_name": "streamer",
                "followed_at": "2020-01-01T00:00:00Z"
            })
        })
        .collect();
    let pagination = match cursor {
        Some(c) => serde_json::json!({"cursor": c}),
        None => serde_json::json!({}),
    };
    serde_json::json!({"total": total, "data": data, "pagination": pagination})
}

/// Resolution body for `/users?login=...`.
pub fn user_body(id: u64) -> serde_json::Value {
    serde_json::json!({"data": [{"id": id.to_string()}]})
}
