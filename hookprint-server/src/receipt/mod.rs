//! GitHub event receipts
//!
//! Turns a [`WebhookEvent`] into a [`Receipt`] of print primitives. Nothing
//! here touches the printer; the handler encodes and sends the result.
//!
//! | Event | Receipt |
//! |-------|---------|
//! | `issues` | New Issue: number, repo, author, assignee, labels, title, body |
//! | `pull_request` | Pull Request [action]: number, repo, author, labels, title, body |
//! | `workflow_run` | Workflow Failed, only when the run concluded with `failure` |
//! | anything else | Unknown GitHub Event and the event name |

pub mod event;
pub mod payload;
pub mod writer;

use std::path::PathBuf;

use chrono_tz::Tz;
use hookprint_printer::{CodePage, Justify, RasterImage, Receipt};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::core::Config;
pub use event::{GithubEvent, WebhookEvent};
use payload::{
    Issue, IssuesPayload, PullRequest, PullRequestPayload, WorkflowRun, WorkflowRunPayload, login,
    repo_name,
};
use writer::{Header, ReceiptWriter};

const NO_TITLE: &str = "(no title)";
const UNKNOWN: &str = "unknown";
const UNKNOWN_WORKFLOW: &str = "(unknown workflow)";
const DEFAULT_PR_ACTION: &str = "opened";

/// Layout settings for receipts
#[derive(Debug, Clone)]
pub struct ReceiptSettings {
    /// Characters per line at normal size
    pub width: usize,
    pub code_page: CodePage,
    pub logo_path: Option<PathBuf>,
    pub logo_max_width: u32,
    /// QR module size, `None` when QR codes are disabled
    pub qr_module_size: Option<u8>,
    pub timezone: Tz,
}

impl From<&Config> for ReceiptSettings {
    fn from(config: &Config) -> Self {
        Self {
            width: config.paper_width,
            code_page: config.code_page,
            logo_path: config.logo_path.clone(),
            logo_max_width: config.logo_max_width,
            qr_module_size: config.print_qr_code.then_some(config.qr_module_size),
            timezone: config.timezone,
        }
    }
}

/// Renders webhook events into receipts
pub struct ReceiptRenderer {
    settings: ReceiptSettings,
}

impl ReceiptRenderer {
    pub fn new(settings: ReceiptSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReceiptSettings {
        &self.settings
    }

    /// Render an event
    ///
    /// Returns an empty receipt when the event produces no output. Fails only
    /// if a payload field has an unexpected JSON type.
    #[instrument(skip_all, fields(event = %event.kind))]
    pub fn render(&self, event: &WebhookEvent) -> Result<Receipt, serde_json::Error> {
        let receipt = match &event.kind {
            GithubEvent::Issues => self.issue(&IssuesPayload::deserialize(&event.payload)?),
            GithubEvent::PullRequest => {
                self.pull_request(&PullRequestPayload::deserialize(&event.payload)?)
            }
            GithubEvent::WorkflowRun => {
                let payload = WorkflowRunPayload::deserialize(&event.payload)?;
                if payload.is_failure() {
                    self.workflow_failure(&payload)
                } else {
                    debug!("Workflow run did not fail, nothing to print");
                    Receipt::new()
                }
            }
            GithubEvent::Other(name) => self.unknown(name),
        };

        Ok(receipt)
    }

    fn issue(&self, payload: &IssuesPayload) -> Receipt {
        let fallback = Issue::default();
        let issue = payload.issue.as_ref().unwrap_or(&fallback);

        let mut w = ReceiptWriter::new(&self.settings);
        w.logo(self.load_logo())
            .header(&Header {
                title: "New Issue",
                user: login(issue.user.as_ref()).unwrap_or(UNKNOWN),
                repo: repo_name(payload.repository.as_ref()).unwrap_or(UNKNOWN),
                number: issue.number.unwrap_or(0),
                assignee: login(issue.assignee.as_ref()).unwrap_or_default(),
            })
            .labels(issue.labels.as_deref().unwrap_or_default())
            .title(issue.title.as_deref().unwrap_or(NO_TITLE))
            .body(issue.body.as_deref().unwrap_or_default())
            .link(issue.html_url.as_deref())
            .footer(issue.created_at.as_deref().unwrap_or_default());
        w.finish()
    }

    fn pull_request(&self, payload: &PullRequestPayload) -> Receipt {
        let fallback = PullRequest::default();
        let pr = payload.pull_request.as_ref().unwrap_or(&fallback);
        let action = payload.action.as_deref().unwrap_or(DEFAULT_PR_ACTION);

        let mut w = ReceiptWriter::new(&self.settings);
        w.logo(self.load_logo())
            .header(&Header {
                title: &format!("Pull Request [{}]", action),
                user: login(pr.user.as_ref()).unwrap_or(UNKNOWN),
                repo: repo_name(payload.repository.as_ref()).unwrap_or(UNKNOWN),
                number: pr.number.unwrap_or(0),
                assignee: "",
            })
            .labels(pr.labels.as_deref().unwrap_or_default())
            .title(pr.title.as_deref().unwrap_or(NO_TITLE))
            .body(pr.body.as_deref().unwrap_or_default())
            .link(pr.html_url.as_deref())
            .footer(pr.created_at.as_deref().unwrap_or_default());
        w.finish()
    }

    fn workflow_failure(&self, payload: &WorkflowRunPayload) -> Receipt {
        let fallback = WorkflowRun::default();
        let run = payload.workflow_run.as_ref().unwrap_or(&fallback);
        let run_id = run
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let mut w = ReceiptWriter::new(&self.settings);
        w.logo(self.load_logo())
            .header(&Header {
                title: "Workflow Failed",
                user: "",
                repo: repo_name(payload.repository.as_ref()).unwrap_or(UNKNOWN),
                number: 0,
                assignee: "",
            })
            .lines(&format!(
                "Workflow: {}",
                run.name.as_deref().unwrap_or(UNKNOWN_WORKFLOW)
            ))
            .lines(&format!("Run ID: {}", run_id))
            .lines("Status: FAILURE")
            .feed(2)
            .link(run.html_url.as_deref())
            .footer(run.updated_at.as_deref().unwrap_or_default());
        w.finish()
    }

    /// Events without a formatter: name only, no cut
    fn unknown(&self, name: &str) -> Receipt {
        let mut w = ReceiptWriter::new(&self.settings);
        w.justify(Justify::Center)
            .lines("Unknown GitHub Event")
            .lines(name)
            .feed(2);
        w.finish()
    }

    /// Load the configured logo; a missing or broken file is skipped
    fn load_logo(&self) -> Option<RasterImage> {
        let path = self.settings.logo_path.as_ref()?;
        if !path.exists() {
            return None;
        }

        match RasterImage::load(&path.to_string_lossy(), self.settings.logo_max_width) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Logo skipped");
                None
            }
        }
    }
}
