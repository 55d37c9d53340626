#![forbid(unsafe_code)]

//! The metrics workspace: KPI and data-source fetches plus the pane layout.
//!
//! Everything here runs on the owning thread. Network work happens on the
//! drivers' worker threads and lands in [`MetricsWorkspace::pump`].

use gtmdash_layout::{PanePointerCaptureAdapter, PanePointerCaptureConfig};
use gtmdash_metrics::{Annotation, DataSourceStatus, KpiBundle, annotate_all};
use gtmdash_runtime::{DataSource, FetchDriver, FetchStatus, PumpReport};
use web_time::Duration;

use crate::error::Result;
use crate::session::Session;

/// What the host should render for the KPI area.
#[derive(Debug, Clone, PartialEq)]
pub enum KpiViewState {
    /// Not mounted yet.
    Idle,
    /// Placeholder. `retrying` selects the "retrying" copy.
    Loading { retrying: bool },
    /// Error message with a retry affordance.
    Failed { message: String, can_retry: bool },
    Ready { cards: Vec<Annotation> },
}

pub struct MetricsWorkspace {
    session: Session,
    kpis: FetchDriver<KpiBundle>,
    sources: FetchDriver<Vec<DataSourceStatus>>,
    panes: PanePointerCaptureAdapter,
}

impl std::fmt::Debug for MetricsWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsWorkspace")
            .field("workspace", &self.session.user().workspace)
            .field("kpis", &self.kpis)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

impl MetricsWorkspace {
    pub fn new(
        session: Session,
        kpi_source: impl DataSource<KpiBundle>,
        status_source: impl DataSource<Vec<DataSourceStatus>>,
    ) -> Result<Self> {
        let options = session.fetch_options();
        let layout = session.workspace_layout()?;
        Ok(Self {
            kpis: FetchDriver::new("kpis", kpi_source, options),
            sources: FetchDriver::new("sources", status_source, options),
            panes: PanePointerCaptureAdapter::new(layout, PanePointerCaptureConfig::default()),
            session,
        })
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Start both loads and both pollers.
    pub fn mount(&mut self) -> Result<()> {
        let interval = self.session.config().poll_interval();
        self.kpis.load();
        self.sources.load();
        self.kpis.start_polling(interval)?;
        self.sources.start_polling(interval)?;
        tracing::debug!(
            target: "gtmdash.workspace",
            workspace = %self.session.user().workspace,
            "workspace mounted"
        );
        Ok(())
    }

    /// Apply whatever the workers and pollers delivered since the last pump.
    pub fn pump(&mut self) -> PumpReport {
        let kpis = self.kpis.pump();
        let sources = self.sources.pump();
        PumpReport {
            applied: kpis.applied + sources.applied,
            superseded: kpis.superseded + sources.superseded,
            poll_ticks: kpis.poll_ticks + sources.poll_ticks,
            polls_started: kpis.polls_started + sources.polls_started,
        }
    }

    /// Pump until neither driver has a request in flight, or `timeout`.
    pub fn wait_settled(&mut self, timeout: Duration) -> (FetchStatus, FetchStatus) {
        let start = web_time::Instant::now();
        let kpis = self.kpis.wait_settled(timeout);
        let remaining = timeout.saturating_sub(start.elapsed());
        (kpis, self.sources.wait_settled(remaining))
    }

    /// Manual refresh of both areas.
    pub fn refresh(&mut self) {
        self.kpis.refetch();
        self.sources.refetch();
    }

    /// Retry the KPI fetch. False unless it is in `Error`.
    pub fn retry(&mut self) -> bool {
        self.kpis.retry()
    }

    #[must_use]
    pub const fn kpi_driver(&self) -> &FetchDriver<KpiBundle> {
        &self.kpis
    }

    #[must_use]
    pub const fn source_driver(&self) -> &FetchDriver<Vec<DataSourceStatus>> {
        &self.sources
    }

    /// Annotated cards, only while the KPI fetch is `Success`.
    #[must_use]
    pub fn kpi_cards(&self) -> Option<Vec<Annotation>> {
        self.kpis
            .state()
            .data()
            .map(|bundle| annotate_all(&bundle.metrics))
    }

    /// `(stage, conversion)` rows for the funnel chart.
    #[must_use]
    pub fn funnel(&self) -> Option<Vec<(String, String)>> {
        self.kpis.state().data().map(KpiBundle::funnel_conversions)
    }

    /// `(source, sync label)` rows relative to `now` (unix seconds).
    #[must_use]
    pub fn source_labels(&self, now: u64) -> Option<Vec<(String, String)>> {
        self.sources.state().data().map(|statuses| {
            statuses
                .iter()
                .map(|status| (status.name.clone(), status.sync_label(now)))
                .collect()
        })
    }

    #[must_use]
    pub fn view_state(&self) -> KpiViewState {
        let state = self.kpis.state();
        match state.status() {
            FetchStatus::Idle => KpiViewState::Idle,
            FetchStatus::Loading => KpiViewState::Loading { retrying: false },
            FetchStatus::Retrying => KpiViewState::Loading { retrying: true },
            FetchStatus::Error => KpiViewState::Failed {
                message: state.error().unwrap_or("Request failed").to_string(),
                can_retry: !self.kpis.lifecycle().is_disposed(),
            },
            FetchStatus::Success => KpiViewState::Ready {
                cards: self.kpi_cards().unwrap_or_default(),
            },
        }
    }

    #[must_use]
    pub const fn panes(&self) -> &PanePointerCaptureAdapter {
        &self.panes
    }

    pub fn panes_mut(&mut self) -> &mut PanePointerCaptureAdapter {
        &mut self.panes
    }

    /// Dispose both drivers. Late completions are dropped. Idempotent.
    pub fn unmount(&mut self) {
        self.kpis.dispose();
        self.sources.dispose();
        tracing::debug!(
            target: "gtmdash.workspace",
            workspace = %self.session.user().workspace,
            "workspace unmounted"
        );
    }
}
