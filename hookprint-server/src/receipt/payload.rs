//! Typed views of the GitHub webhook payloads
//!
//! Only the fields that end up on paper are modelled. Every field is
//! optional and JSON `null` reads the same as a missing field.

use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Account {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub created_at: Option<String>,
    pub html_url: Option<String>,
    pub user: Option<Account>,
    pub assignee: Option<Account>,
    pub labels: Option<Vec<Label>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub created_at: Option<String>,
    pub html_url: Option<String>,
    pub user: Option<Account>,
    pub labels: Option<Vec<Label>>,
}

/// Workflow run id, numeric in GitHub payloads but accepted as text too
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RunId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunId::Number(n) => write!(f, "{}", n),
            RunId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowRun {
    pub id: Option<RunId>,
    pub name: Option<String>,
    pub conclusion: Option<String>,
    pub updated_at: Option<String>,
    pub html_url: Option<String>,
}

/// `issues` event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssuesPayload {
    pub issue: Option<Issue>,
    pub repository: Option<Repository>,
}

/// `pull_request` event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequestPayload {
    pub action: Option<String>,
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
}

/// `workflow_run` event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowRunPayload {
    pub workflow_run: Option<WorkflowRun>,
    pub repository: Option<Repository>,
}

impl WorkflowRunPayload {
    /// Whether the run concluded with `failure`
    pub fn is_failure(&self) -> bool {
        self.workflow_run
            .as_ref()
            .and_then(|run| run.conclusion.as_deref())
            == Some("failure")
    }
}

/// Login of an optional account, if present
pub fn login(account: Option<&Account>) -> Option<&str> {
    account.and_then(|a| a.login.as_deref())
}

/// Full name of an optional repository, if present
pub fn repo_name(repository: Option<&Repository>) -> Option<&str> {
    repository.and_then(|r| r.full_name.as_deref())
}
