//! Operator alerting.
//!
//! Alerts are fire-and-report: a failed delivery is returned to the caller,
//! which logs it and carries on.

use parking_lot::Mutex;
use serde_json::Value;
use tracing::error;

use crate::error::TelemetryResult;
use crate::metrics::Metrics;

/// Raises an alert with a short description and structured details.
pub trait Alert: Send + Sync {
    fn trigger(&self, description: &str, details: Value) -> TelemetryResult<()>;
}

/// Alert that only writes an error log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn trigger(&self, description: &str, details: Value) -> TelemetryResult<()> {
        Metrics::alert_fired();
        error!(alert = true, %details, "{description}");
        Ok(())
    }
}

/// Alert that records every trigger, for testing.
#[derive(Debug, Default)]
pub struct RecordingAlert {
    triggered: Mutex<Vec<(String, Value)>>,
}

impl RecordingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggered(&self) -> Vec<(String, Value)> {
        self.triggered.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.triggered.lock().len()
    }
}

impl Alert for RecordingAlert {
    fn trigger(&self, description: &str, details: Value) -> TelemetryResult<()> {
        self.triggered.lock().push((description.to_string(), details));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_alert_succeeds() {
        LogAlert
            .trigger("cycle failed", json!({ "stage": "levels" }))
            .unwrap();
    }

    #[test]
    fn test_recording_alert() {
        let alert = RecordingAlert::new();
        alert.trigger("first", json!({ "n": 1 })).unwrap();
        alert.trigger("second", Value::Null).unwrap();

        let seen = alert.triggered();
        assert_eq!(alert.count(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[0].1["n"], 1);
    }
}
