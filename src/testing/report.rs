//! Per-scenario outcomes and the run summary, rendered as text or JSON.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::{CliError, ScenarioError};
use crate::history::Exchange;

/// Which part of the error taxonomy a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    Probe,
    MissingState,
}

impl From<&ScenarioError> for FailureKind {
    fn from(err: &ScenarioError) -> Self {
        match err {
            ScenarioError::Assertion(_) => FailureKind::Assertion,
            ScenarioError::Probe(_) => FailureKind::Probe,
            ScenarioError::MissingState(_) => FailureKind::MissingState,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub index: usize,
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ScenarioOutcome {
    pub fn from_result(
        index: usize,
        name: &str,
        duration_ms: u64,
        result: &Result<(), ScenarioError>,
    ) -> Self {
        let (failure_kind, failure) = match result {
            Ok(()) => (None, None),
            Err(err) => (Some(FailureKind::from(err)), Some(err.to_string())),
        };
        Self {
            index,
            name: name.to_string(),
            passed: result.is_ok(),
            duration_ms,
            failure_kind,
            failure,
        }
    }
}

/// Summary report for one run of the suite.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub outcomes: Vec<ScenarioOutcome>,
    /// Oldest first. Empty unless requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<Exchange>,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            base_url: base_url.into(),
            seed,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.total += 1;
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Human-readable rendering, alongside `Serialize` for JSON.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Company contract run against {}", self.base_url)?;
        if let Some(seed) = self.seed {
            writeln!(w, "fixture seed: {seed}")?;
        }
        writeln!(w)?;

        for outcome in &self.outcomes {
            let mark = if outcome.passed { "PASS" } else { "FAIL" };
            writeln!(
                w,
                "  {mark} {:>2}. {} ({} ms)",
                outcome.index, outcome.name, outcome.duration_ms
            )?;
            if let Some(failure) = &outcome.failure {
                for line in failure.lines() {
                    writeln!(w, "         {line}")?;
                }
            }
        }

        if !self.requests.is_empty() {
            writeln!(w)?;
            writeln!(w, "Requests:")?;
            for exchange in &self.requests {
                let status = exchange
                    .status
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "---".to_string());
                writeln!(
                    w,
                    "  [{:>2}] {:<6} {} -> {}",
                    exchange.scenario, exchange.method, exchange.url, status
                )?;
            }
        }

        writeln!(w)?;
        writeln!(
            w,
            "{} scenarios, {} passed, {} failed in {} ms",
            self.total, self.passed, self.failed, self.duration_ms
        )
    }
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}
