//! Tracing-backed telemetry sink.

use metarp_core::{TelemetryLevel, TelemetrySink};

/// Forwards telemetry events to the `tracing` subscriber installed by the
/// host application. Emission is synchronous and never blocks on I/O; slow
/// sinks are the subscriber's problem, not the client's.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record(&self, level: TelemetryLevel, message: &str, fields: &[(&str, String)]) {
        let rendered = render_fields(fields);
        match level {
            TelemetryLevel::Debug => {
                tracing::debug!(fields = %rendered, "{}", message);
            }
            TelemetryLevel::Info => {
                tracing::info!(fields = %rendered, "{}", message);
            }
            TelemetryLevel::Warn => {
                tracing::warn!(fields = %rendered, "{}", message);
            }
            TelemetryLevel::Error => {
                tracing::error!(fields = %rendered, "{}", message);
            }
        }
    }
}

fn render_fields(fields: &[(&str, String)]) -> String {
    fields.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fields_as_key_value_pairs() {
        let rendered = render_fields(&[
            ("target", "rpaas/deleteResources".to_string()),
            ("status", "202".to_string()),
        ]);
        assert_eq!(rendered, "target=rpaas/deleteResources status=202");
    }

    #[test]
    fn record_accepts_all_levels() {
        let sink = TracingTelemetry;
        for level in [
            TelemetryLevel::Debug,
            TelemetryLevel::Info,
            TelemetryLevel::Warn,
            TelemetryLevel::Error,
        ] {
            sink.record(level, "event", &[("k", "v".to_string())]);
        }
        // Should not panic even without a subscriber installed
    }
}
