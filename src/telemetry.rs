//! Error-reporting sink invoked by the fault boundary.

use tracing::error;

/// Failures raised by a telemetry sink.
///
/// The fault boundary swallows these after a best-effort log; they never
/// reach a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("telemetry report failed: {message}")]
pub struct TelemetryError {
    pub message: String,
}

impl TelemetryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Port for reporting unhandled faults to an external telemetry backend.
#[cfg_attr(test, mockall::automock)]
pub trait TelemetrySink: Send + Sync {
    /// Report one unhandled fault.
    fn report(&self, message: &str, trace_id: Option<String>) -> Result<(), TelemetryError>;
}

/// Sink emitting structured log events tagged with the application key.
pub struct TracingTelemetrySink {
    application_key: String,
}

impl TracingTelemetrySink {
    /// `application_key` correlates events with the hosting application; the
    /// configuration layer guarantees it is non-empty.
    pub fn new(application_key: impl Into<String>) -> Self {
        Self {
            application_key: application_key.into(),
        }
    }
}

impl TelemetrySink for TracingTelemetrySink {
    fn report(&self, message: &str, trace_id: Option<String>) -> Result<(), TelemetryError> {
        error!(
            application_key = %self.application_key,
            trace_id = trace_id.as_deref().unwrap_or("-"),
            message,
            "unhandled fault"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_reports_without_failing() {
        let sink = TracingTelemetrySink::new("app-key");
        assert!(sink.report("boom", Some("trace-1".to_owned())).is_ok());
        assert!(sink.report("boom again", None).is_ok());
    }

    #[test]
    fn mocked_sink_observes_the_trace_id() {
        let mut sink = MockTelemetrySink::new();
        sink.expect_report()
            .withf(|message, trace_id| message == "boom" && trace_id.is_some())
            .once()
            .returning(|_, _| Ok(()));
        assert!(sink.report("boom", Some("trace-1".to_owned())).is_ok());
    }
}
