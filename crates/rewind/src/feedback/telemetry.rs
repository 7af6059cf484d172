/// Receives named story events. Fire-and-forget.
pub trait Telemetry {
    fn track(&mut self, event: &str);
}

/// Reports events through `tracing` under the `telemetry` target.
#[derive(Debug, Default)]
pub struct LogTelemetry {
    sent: usize,
}

impl LogTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Telemetry for LogTelemetry {
    fn track(&mut self, event: &str) {
        self.sent += 1;
        tracing::info!(target: "telemetry", event, "track");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_telemetry_counts_events() {
        let mut t = LogTelemetry::new();
        t.track("opened_rewind_overall_2025");
        t.track("viewed_rewind_overall_2025");
        assert_eq!(t.sent(), 2);
    }
}
