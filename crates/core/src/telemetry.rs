//! Telemetry sink boundary.
//!
//! Structured events around dispatch, pagination and error translation go
//! through this trait so the client never depends on a concrete logging
//! framework. Implementations must be best-effort and must not block the
//! calling operation.

/// Severity of a telemetry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TelemetryLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for structured client events.
pub trait TelemetrySink: Send + Sync {
    /// Record one event. `fields` carries structured key/value context.
    fn record(&self, level: TelemetryLevel, message: &str, fields: &[(&str, String)]);
}

/// No-op sink for tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn record(&self, _level: TelemetryLevel, _message: &str, _fields: &[(&str, String)]) {
        // No-op
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_accepts_events() {
        let sink = NoopTelemetry;
        sink.record(TelemetryLevel::Info, "dispatching", &[("target", "rpaas/x".to_string())]);
        sink.record(TelemetryLevel::Error, "failed", &[]);
        // Should not panic
    }

    #[test]
    fn levels_are_ordered() {
        assert!(TelemetryLevel::Debug < TelemetryLevel::Info);
        assert!(TelemetryLevel::Warn < TelemetryLevel::Error);
    }
}
