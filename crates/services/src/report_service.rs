use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{info, warn};
use url::Url;

use match_core::model::{SessionSummary, SessionToken};

use crate::error::ReportError;

/// Destination for finished-session summaries.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Dispatch a summary once. `Ok` means the request left without a local
    /// error; nothing is known about whether it was stored.
    async fn submit(&self, summary: &SessionSummary) -> Result<(), ReportError>;
}

/// Posts summaries to a spreadsheet web-app endpoint.
///
/// The body is JSON sent as `text/plain`, which such endpoints accept without
/// a preflight. The response is not inspected.
#[derive(Clone)]
pub struct HttpResultSink {
    client: Client,
    url: Url,
}

impl HttpResultSink {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    async fn submit(&self, summary: &SessionSummary) -> Result<(), ReportError> {
        let body = serde_json::to_string(summary)?;
        self.client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;
        Ok(())
    }
}

/// Delivery state shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStatus {
    #[default]
    Idle,
    NotConfigured,
    Pending,
    Delivered,
    Failed,
}

impl ReportStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::NotConfigured => "No sync configured",
            Self::Pending => "Sending to teacher...",
            Self::Delivered => "Results synced!",
            Self::Failed => "Sync error",
        }
    }
}

/// One delivery attempt, detached from the reporter so it can run off the game loop.
pub struct ReportJob {
    token: SessionToken,
    sink: Arc<dyn ResultSink>,
    summary: SessionSummary,
}

impl ReportJob {
    /// Session whose summary this job delivers.
    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Attempt delivery once. No retries.
    pub async fn run(self) -> ReportStatus {
        match self.sink.submit(&self.summary).await {
            Ok(()) => {
                info!(
                    student = self.summary.student_name(),
                    score = self.summary.score(),
                    "session result dispatched"
                );
                ReportStatus::Delivered
            }
            Err(err) => {
                warn!(error = %err, "session result dispatch failed");
                ReportStatus::Failed
            }
        }
    }
}

/// Tracks result delivery for the current session.
///
/// The outcome is for display only and never feeds back into game state.
#[derive(Clone)]
pub struct ResultReporter {
    sink: Option<Arc<dyn ResultSink>>,
    status: ReportStatus,
    dispatched: Option<SessionToken>,
}

impl ResultReporter {
    #[must_use]
    pub fn new(sink: Option<Arc<dyn ResultSink>>) -> Self {
        let mut reporter = Self {
            sink,
            status: ReportStatus::Idle,
            dispatched: None,
        };
        reporter.reset();
        reporter
    }

    /// Reporter posting to `url`, or a disabled one when `url` is `None`.
    #[must_use]
    pub fn from_url(url: Option<Url>) -> Self {
        Self::new(url.map(|url| Arc::new(HttpResultSink::new(url)) as Arc<dyn ResultSink>))
    }

    #[must_use]
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    /// Mark delivery as pending and hand back the attempt to run.
    ///
    /// Returns `None` when no sink is configured or an attempt was already
    /// made for this session.
    pub fn dispatch(&mut self, token: SessionToken, summary: SessionSummary) -> Option<ReportJob> {
        let sink = self.sink.clone()?;
        if self.status != ReportStatus::Idle {
            return None;
        }
        self.status = ReportStatus::Pending;
        self.dispatched = Some(token);
        Some(ReportJob {
            token,
            sink,
            summary,
        })
    }

    /// Store the outcome of a job returned by [`ResultReporter::dispatch`].
    ///
    /// Applied only while that same session's delivery is pending; outcomes
    /// of jobs from earlier sessions are dropped.
    pub fn record(&mut self, token: SessionToken, outcome: ReportStatus) {
        if self.status == ReportStatus::Pending && self.dispatched == Some(token) {
            self.status = outcome;
        }
    }

    /// Prepare for a new session.
    pub fn reset(&mut self) {
        self.dispatched = None;
        self.status = if self.sink.is_some() {
            ReportStatus::Idle
        } else {
            ReportStatus::NotConfigured
        };
    }
}
