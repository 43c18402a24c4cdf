use log::{info, warn};
use serde::Serialize;

/// Log target for structured JSON event lines.
pub const EVENT_TARGET: &str = "plumecore::event";

/// Thin wrapper over the `log` facade shared by the engine components.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    /// Emits `{"event": kind, "data": payload}` as one JSON line.
    pub fn event<T: Serialize>(&self, kind: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(data) => {
                let line = serde_json::json!({ "event": kind, "data": data });
                info!(target: EVENT_TARGET, "{}", line);
            }
            Err(err) => warn!("dropping {} event: {}", kind, err),
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
