//! # Scenario Orchestration
//!
//! Runs the Company contract scenarios strictly in order. Later scenarios
//! read the id captured by the creation scenario through [`SuiteState`],
//! which lives in the [`ScenarioContext`] owned by a single run.
//!
//! A failing scenario is recorded and the run moves on; nothing aborts it.

mod catalog;
#[cfg(test)]
pub(crate) mod fake;

use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};

use crate::error::{ProbeError, ScenarioError};
use crate::fixtures::{Company, CompanyId, FixtureBuilder};
use crate::history::{Exchange, History};
use crate::http::method::HttpMethod;
use crate::http::response::HttpResponse;
use crate::probe::CompanyProbe;
use crate::testing::report::{RunReport, ScenarioOutcome};

pub use catalog::CATALOG;

/// Where the Company under test is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Absent,
    Created,
    Updated,
    Deleted,
}

/// The Company created by this run, as the service should now hold it.
#[derive(Debug, Clone)]
pub struct CreatedCompany {
    pub id: CompanyId,
    pub fixture: Company,
}

#[derive(Debug, Default)]
pub struct SuiteState {
    pub created: Option<CreatedCompany>,
    pub lifecycle: Lifecycle,
}

impl SuiteState {
    pub fn require_created(&self) -> Result<&CreatedCompany, ScenarioError> {
        self.created
            .as_ref()
            .ok_or(ScenarioError::MissingState("no company id was captured at creation"))
    }
}

#[derive(Debug, Clone)]
pub struct SuiteSettings {
    pub nonexistent_id: String,
    pub invalid_id_token: String,
    pub seed: Option<u64>,
    /// Copy the exchange history into the report.
    pub show_requests: bool,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            nonexistent_id: "99999".to_string(),
            invalid_id_token: "invalid-id".to_string(),
            seed: None,
            show_requests: false,
        }
    }
}

/// Everything a scenario may touch. Probe calls go through the context so
/// each exchange lands in the history.
pub struct ScenarioContext<'p> {
    probe: &'p dyn CompanyProbe,
    pub fixtures: FixtureBuilder,
    pub state: SuiteState,
    pub history: History,
    pub settings: SuiteSettings,
    current: usize,
}

impl<'p> ScenarioContext<'p> {
    pub fn new(probe: &'p dyn CompanyProbe, settings: SuiteSettings) -> Self {
        let fixtures = match settings.seed {
            Some(seed) => FixtureBuilder::seeded(seed),
            None => FixtureBuilder::from_entropy(),
        };
        Self {
            probe,
            fixtures,
            state: SuiteState::default(),
            history: History::new(),
            settings,
            current: 0,
        }
    }

    pub async fn create(&mut self, company: &Company) -> Result<HttpResponse, ProbeError> {
        let url = self.probe.base_url().to_string();
        let result = self.probe.create(company).await;
        self.record(HttpMethod::Post, url, &result);
        result
    }

    pub async fn list(&mut self) -> Result<HttpResponse, ProbeError> {
        let url = self.probe.base_url().to_string();
        let result = self.probe.list().await;
        self.record(HttpMethod::Get, url, &result);
        result
    }

    pub async fn get_by_id(&mut self, id: &CompanyId) -> Result<HttpResponse, ProbeError> {
        let url = self.item_url(id);
        let result = self.probe.get_by_id(id).await;
        self.record(HttpMethod::Get, url, &result);
        result
    }

    pub async fn update(
        &mut self,
        id: &CompanyId,
        company: &Company,
    ) -> Result<HttpResponse, ProbeError> {
        let url = self.item_url(id);
        let result = self.probe.update(id, company).await;
        self.record(HttpMethod::Put, url, &result);
        result
    }

    pub async fn delete(&mut self, id: &CompanyId) -> Result<HttpResponse, ProbeError> {
        let url = self.item_url(id);
        let result = self.probe.delete(id).await;
        self.record(HttpMethod::Delete, url, &result);
        result
    }

    fn item_url(&self, id: &CompanyId) -> String {
        self.probe.item_url(id)
    }

    fn record(
        &mut self,
        method: HttpMethod,
        url: String,
        result: &Result<HttpResponse, ProbeError>,
    ) {
        let (status, duration_ms) = match result {
            Ok(response) => (Some(response.status), Some(response.duration_ms as u64)),
            Err(_) => (None, None),
        };
        self.history.push(Exchange {
            scenario: self.current,
            method,
            url,
            status,
            duration_ms,
        });
    }
}

/// The ordered contract suite.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    settings: SuiteSettings,
}

impl Suite {
    pub fn new(settings: SuiteSettings) -> Self {
        Self { settings }
    }

    pub async fn run(&self, probe: &dyn CompanyProbe) -> RunReport {
        let mut ctx = ScenarioContext::new(probe, self.settings.clone());
        self.run_with(&mut ctx).await
    }

    /// Run every scenario against an existing context, one after another.
    pub async fn run_with(&self, ctx: &mut ScenarioContext<'_>) -> RunReport {
        let mut report = RunReport::new(ctx.probe.base_url(), self.settings.seed);
        let started = Instant::now();

        for (position, kind) in CATALOG.iter().enumerate() {
            let index = position + 1;
            ctx.current = index;

            let span = info_span!("scenario", index, name = kind.name());
            let scenario_started = Instant::now();
            let result = async {
                info!(index, name = kind.name(), "scenario started");
                kind.run(ctx).await
            }
            .instrument(span)
            .await;
            let elapsed = scenario_started.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => info!(index, name = kind.name(), elapsed_ms = elapsed, "scenario passed"),
                Err(err) => warn!(
                    index,
                    name = kind.name(),
                    error = %err,
                    "scenario failed"
                ),
            }
            report.record(ScenarioOutcome::from_result(
                index,
                kind.name(),
                elapsed,
                &result,
            ));
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        if self.settings.show_requests {
            report.requests = ctx.history.entries().iter().rev().cloned().collect();
        }
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            "suite finished"
        );
        report
    }
}
