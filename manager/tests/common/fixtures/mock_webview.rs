//! Webview host that records every request instead of driving a browser

use serde_json::Value;
use service_manager::WebviewHost;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum WebviewCall {
    Reload(String),
    Send {
        service_id: String,
        channel: String,
        payload: Value,
    },
    Focus(String),
    AudioMuted(String, bool),
}

#[derive(Default)]
pub struct MockWebviewHost {
    calls: Mutex<Vec<WebviewCall>>,
}

impl MockWebviewHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WebviewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn reloads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WebviewCall::Reload(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Payloads sent to `service_id` on `channel`, oldest first.
    pub fn sent(&self, service_id: &str, channel: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WebviewCall::Send {
                    service_id: id,
                    channel: ch,
                    payload,
                } if id == service_id && ch == channel => Some(payload),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: WebviewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl WebviewHost for MockWebviewHost {
    fn reload(&self, service_id: &str) {
        self.record(WebviewCall::Reload(service_id.to_string()));
    }

    fn send(&self, service_id: &str, channel: &str, payload: Value) {
        self.record(WebviewCall::Send {
            service_id: service_id.to_string(),
            channel: channel.to_string(),
            payload,
        });
    }

    fn focus(&self, service_id: &str) {
        self.record(WebviewCall::Focus(service_id.to_string()));
    }

    fn set_audio_muted(&self, service_id: &str, muted: bool) {
        self.record(WebviewCall::AudioMuted(service_id.to_string(), muted));
    }
}
