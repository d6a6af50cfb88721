//! Seam to the embedded browser views hosting each service
//!
//! The manager never owns a webview. It asks the host to reload, focus or mute
//! one and sends it IPC messages; the host decides how that reaches the page.

use serde_json::Value;
use tracing::{debug, info};

pub trait WebviewHost: Send + Sync {
    fn reload(&self, service_id: &str);

    fn send(&self, service_id: &str, channel: &str, payload: Value);

    fn focus(&self, service_id: &str);

    fn set_audio_muted(&self, service_id: &str, muted: bool);
}

/// Host used by the headless binary: every request is only logged.
#[derive(Debug, Default)]
pub struct LoggingWebviewHost;

impl WebviewHost for LoggingWebviewHost {
    fn reload(&self, service_id: &str) {
        info!("Reloading webview for service {}", service_id);
    }

    fn send(&self, service_id: &str, channel: &str, payload: Value) {
        debug!("IPC -> {} [{}]: {}", service_id, channel, payload);
    }

    fn focus(&self, service_id: &str) {
        debug!("Focusing webview for service {}", service_id);
    }

    fn set_audio_muted(&self, service_id: &str, muted: bool) {
        debug!("Webview audio for service {} muted={}", service_id, muted);
    }
}
