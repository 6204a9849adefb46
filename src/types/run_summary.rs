use chrono::{DateTime, Utc};

/// Aggregate result of one orchestrator run. Transient only, never persisted;
/// the durable truth lives in the state store.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failed_migrations: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, name: &str) {
        self.failed += 1;
        self.failed_migrations.push(name.to_string());
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Example output: `"0.148s"`, `"2m 05s"`.
    pub fn duration_string(&self) -> String {
        let Some((start, end)) = self.started_at.zip(self.finished_at) else {
            return "0.000s".to_string();
        };
        let duration = end - start;
        let secs = duration.num_seconds();
        if secs >= 60 {
            format!("{}m {:02}s", secs / 60, secs % 60)
        } else {
            format!("{:.3}s", duration.num_milliseconds() as f64 / 1000.0)
        }
    }
}
