use std::fmt;

use serde_json::{Map, Value};

use crate::core::ServerError;

/// GitHub event type from the `X-GitHub-Event` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubEvent {
    Issues,
    PullRequest,
    WorkflowRun,
    /// Any other event, raw header value (empty if the header was missing)
    Other(String),
}

impl From<&str> for GithubEvent {
    fn from(name: &str) -> Self {
        match name {
            "issues" => GithubEvent::Issues,
            "pull_request" => GithubEvent::PullRequest,
            "workflow_run" => GithubEvent::WorkflowRun,
            other => GithubEvent::Other(other.to_string()),
        }
    }
}

impl GithubEvent {
    pub fn as_str(&self) -> &str {
        match self {
            GithubEvent::Issues => "issues",
            GithubEvent::PullRequest => "pull_request",
            GithubEvent::WorkflowRun => "workflow_run",
            GithubEvent::Other(name) => name,
        }
    }
}

impl fmt::Display for GithubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One webhook delivery: event type plus parsed JSON body
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub kind: GithubEvent,
    pub payload: Value,
}

impl WebhookEvent {
    /// Parse a raw request body
    ///
    /// The body must be a JSON object or array. Arrays carry no named fields,
    /// so they are read as an empty object and every field takes its default.
    pub fn parse(kind: GithubEvent, body: &[u8]) -> Result<Self, ServerError> {
        let payload = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(Value::Array(_)) => Value::Object(Map::new()),
            Ok(_) | Err(_) => return Err(ServerError::InvalidJson),
        };

        Ok(Self { kind, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_header() {
        assert_eq!(GithubEvent::from("issues"), GithubEvent::Issues);
        assert_eq!(
            GithubEvent::from("pull_request"),
            GithubEvent::PullRequest
        );
        assert_eq!(
            GithubEvent::from("workflow_run"),
            GithubEvent::WorkflowRun
        );
        assert_eq!(
            GithubEvent::from("push"),
            GithubEvent::Other("push".into())
        );
        assert_eq!(GithubEvent::from("").as_str(), "");
    }

    #[test]
    fn test_parse_accepts_objects_and_arrays() {
        let event = WebhookEvent::parse(GithubEvent::Issues, br#"{"action":"opened"}"#).unwrap();
        assert_eq!(event.payload["action"], "opened");

        let event = WebhookEvent::parse(GithubEvent::Issues, b"[1, 2]").unwrap();
        assert!(event.payload.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let bodies: [&[u8]; 6] = [b"not json", b"", b"42", b"\"text\"", b"null", b"{\"a\":"];
        for body in bodies {
            let result = WebhookEvent::parse(GithubEvent::Issues, body);
            assert!(
                matches!(result, Err(ServerError::InvalidJson)),
                "body {:?}",
                body
            );
        }
    }
}
