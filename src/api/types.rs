//! Wire and domain types for the remote task service
//!
//! Sessions and sources map one-to-one onto their JSON representation.
//! Activities do not: the service sends one record with several optional
//! payload objects, which is folded into the [`ActivityKind`] sum type on
//! deserialization so that callers never null-coalesce payload fields
//! themselves.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of results plus the cursor for the next one.
///
/// `next_page_token == None` means there is no further page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Cursor for the logically-next request with identical parameters.
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page from items and an optional cursor.
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    /// A page with no items and no cursor.
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Returns `true` when another page can be requested.
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// Treats an empty-string page token the same as an absent one.
pub(crate) fn normalize_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

/// Response body of `GET v1alpha/sessions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListSessionsResponse {
    #[serde(default)]
    pub sessions: Option<Vec<Session>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<ListSessionsResponse> for Page<Session> {
    fn from(response: ListSessionsResponse) -> Self {
        Page::new(
            response.sessions.unwrap_or_default(),
            normalize_token(response.next_page_token),
        )
    }
}

/// Response body of `GET v1alpha/sessions/{id}/activities`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListActivitiesResponse {
    #[serde(default)]
    pub activities: Option<Vec<Activity>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<ListActivitiesResponse> for Page<Activity> {
    fn from(response: ListActivitiesResponse) -> Self {
        Page::new(
            response.activities.unwrap_or_default(),
            normalize_token(response.next_page_token),
        )
    }
}

/// Response body of `GET v1alpha/sources`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListSourcesResponse {
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// A unit of remote long-running work.
///
/// Identity is [`Session::id`]. The status is a free-form string; which
/// values are terminal is decided by the poller's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Resource name, e.g. `sessions/123`.
    #[serde(default)]
    pub name: String,
    /// Stable session identifier.
    pub id: String,
    /// Human-readable title, when the service has produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Prompt the session was created with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Current status. Accepted on the wire as `status` or `state`.
    #[serde(default, alias = "state", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Repository the session works against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SourceContext>,
    /// Creation timestamp as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
}

impl Session {
    /// Title for display, falling back to a fixed label.
    ///
    /// # Examples
    ///
    /// ```
    /// use julesync::api::Session;
    ///
    /// let session: Session = serde_json::from_str(r#"{"id":"1"}"#).unwrap();
    /// assert_eq!(session.display_name(), "Untitled session");
    /// ```
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled session")
    }

    /// The source (repository) reference, if the session has one.
    pub fn source_ref(&self) -> Option<&str> {
        self.source_context.as_ref().map(|ctx| ctx.source.as_str())
    }

    /// Parsed creation time, if present and in a recognised format.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time.as_deref().and_then(parse_timestamp)
    }
}

/// Repository context attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContext {
    /// Source resource name, e.g. `sources/github/owner/repo`.
    pub source: String,
    /// GitHub-specific options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_context: Option<GithubRepoContext>,
}

/// GitHub options for a source context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoContext {
    /// Branch the session starts from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_branch: Option<String>,
}

/// A repository the user can start sessions against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Source resource name. Accepted on the wire as `name` or `source`.
    #[serde(alias = "source")]
    pub name: String,
    /// GitHub-specific options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo_context: Option<GithubRepoContext>,
}

/// Body of `POST v1alpha/sessions`.
///
/// # Examples
///
/// ```
/// use julesync::api::CreateSessionRequest;
///
/// let request = CreateSessionRequest::new("Fix the flaky test")
///     .with_source("sources/github/acme/widgets", Some("main".to_string()))
///     .with_plan_approval(true);
/// assert_eq!(request.prompt, "Fix the flaky test");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Task description.
    pub prompt: String,
    /// Repository to work against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SourceContext>,
    /// Automation mode, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation_mode: Option<String>,
    /// Whether a generated plan must be approved before execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_plan_approval: Option<bool>,
}

impl CreateSessionRequest {
    /// Creates a request with only a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            source_context: None,
            automation_mode: None,
            require_plan_approval: None,
        }
    }

    /// Attaches a source and optional starting branch.
    pub fn with_source(mut self, source: impl Into<String>, branch: Option<String>) -> Self {
        self.source_context = Some(SourceContext {
            source: source.into(),
            github_repo_context: Some(GithubRepoContext {
                starting_branch: branch,
            }),
        });
        self
    }

    /// Sets the automation mode.
    pub fn with_automation_mode(mut self, mode: impl Into<String>) -> Self {
        self.automation_mode = Some(mode.into());
        self
    }

    /// Sets whether plan approval is required.
    pub fn with_plan_approval(mut self, required: bool) -> Self {
        self.require_plan_approval = Some(required);
        self
    }

    /// The source this request targets, if any.
    pub fn source_ref(&self) -> Option<&str> {
        self.source_context.as_ref().map(|ctx| ctx.source.as_str())
    }
}

/// Body of `POST v1alpha/sessions/{id}/activities`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateActivityRequest<'a> {
    pub user_message: OutgoingMessage<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OutgoingMessage<'a> {
    pub message: &'a str,
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// One append-only log entry belonging to a session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ActivityRecord")]
pub struct Activity {
    /// Resource name, preferred identity.
    pub name: Option<String>,
    /// Identifier, used as identity when `name` is absent.
    pub id: Option<String>,
    /// Creation timestamp as sent by the server.
    pub create_time: Option<String>,
    /// Who produced the entry (`user`, `agent`, ...).
    pub originator: Option<String>,
    /// Free-form description supplied by the server.
    pub description: Option<String>,
    /// What happened.
    pub kind: ActivityKind,
}

/// Text fields carried by user and agent messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessagePayload {
    /// Primary message text.
    #[serde(default, alias = "userMessage", alias = "agentMessage")]
    pub message: Option<String>,
    /// Alternative text field.
    #[serde(default)]
    pub text: Option<String>,
    /// Prompt echoed back by the service.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// A generated plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Plan {
    /// Plan identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Ordered steps.
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// A single plan step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanStep {
    /// Step title.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer explanation.
    #[serde(default)]
    pub description: Option<String>,
}

/// The kinds of activity a session log can contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    /// The user sent a message.
    UserMessage(MessagePayload),
    /// The agent replied.
    AgentMessage(MessagePayload),
    /// The agent proposed a plan.
    PlanGenerated(Plan),
    /// A plan was approved.
    PlanApproved {
        /// Plan that was approved.
        plan_id: Option<String>,
    },
    /// Work progressed.
    ProgressUpdate {
        /// Short headline.
        title: Option<String>,
        /// Detail text.
        description: Option<String>,
    },
    /// The session finished successfully.
    SessionCompleted,
    /// The session failed.
    SessionFailed {
        /// Failure reason, when given.
        reason: Option<String>,
    },
    /// Anything this client does not model.
    Generic,
}

impl Activity {
    /// Identity used for deduplication: `name`, else `id`.
    ///
    /// Entries with neither are never considered duplicates of anything.
    pub fn identity(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }

    /// Resolves the text to show for this entry.
    ///
    /// Every kind has a fixed fallback chain ending in a constant label, so
    /// the result is never empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use julesync::api::Activity;
    ///
    /// let activity: Activity = serde_json::from_str(
    ///     r#"{"id":"a1","progressUpdated":{"description":"Running tests"}}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(activity.describe(), "Running tests");
    /// ```
    pub fn describe(&self) -> String {
        let own = self.description.as_deref();
        match &self.kind {
            ActivityKind::UserMessage(payload) => payload
                .first_text()
                .or(own)
                .unwrap_or("User message")
                .to_string(),
            ActivityKind::AgentMessage(payload) => payload
                .first_text()
                .or(own)
                .unwrap_or("Agent message")
                .to_string(),
            ActivityKind::PlanGenerated(plan) => match own {
                Some(text) => text.to_string(),
                None => plan.outline().unwrap_or_else(|| "Plan generated".to_string()),
            },
            ActivityKind::PlanApproved { .. } => own.unwrap_or("Plan approved").to_string(),
            ActivityKind::ProgressUpdate { title, description } => title
                .as_deref()
                .or(description.as_deref())
                .or(own)
                .unwrap_or("Progress update")
                .to_string(),
            ActivityKind::SessionCompleted => own.unwrap_or("Session completed").to_string(),
            ActivityKind::SessionFailed { reason } => reason
                .as_deref()
                .or(own)
                .unwrap_or("Session failed")
                .to_string(),
            ActivityKind::Generic => own.unwrap_or("Activity").to_string(),
        }
    }

    /// Parsed creation time, if present and in a recognised format.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.create_time.as_deref().and_then(parse_timestamp)
    }
}

impl MessagePayload {
    fn first_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.text.as_deref())
            .or(self.prompt.as_deref())
    }
}

impl Plan {
    fn outline(&self) -> Option<String> {
        let titles: Vec<String> = self
            .steps
            .iter()
            .filter_map(|step| step.title.as_deref())
            .enumerate()
            .map(|(idx, title)| format!("{}. {}", idx + 1, title))
            .collect();
        if titles.is_empty() {
            None
        } else {
            Some(titles.join("\n"))
        }
    }
}

/// Raw activity record as sent on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    originator: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "userMessage", deserialize_with = "message_or_text")]
    user_messaged: Option<MessagePayload>,
    #[serde(default, alias = "agentMessage", deserialize_with = "message_or_text")]
    agent_messaged: Option<MessagePayload>,
    #[serde(default)]
    plan_generated: Option<PlanGeneratedRecord>,
    #[serde(default)]
    plan_approved: Option<PlanApprovedRecord>,
    #[serde(default)]
    progress_updated: Option<ProgressRecord>,
    #[serde(default)]
    session_completed: Option<serde_json::Value>,
    #[serde(default)]
    session_failed: Option<SessionFailedRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct PlanGeneratedRecord {
    #[serde(default)]
    plan: Plan,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanApprovedRecord {
    #[serde(default)]
    plan_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProgressRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionFailedRecord {
    #[serde(default)]
    reason: Option<String>,
}

/// Message payloads arrive either as an object or as a bare string.
fn message_or_text<'de, D>(deserializer: D) -> Result<Option<MessagePayload>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Payload(MessagePayload),
    }

    Ok(Option::<Wire>::deserialize(deserializer)?.map(|wire| match wire {
        Wire::Text(text) => MessagePayload {
            message: Some(text),
            ..Default::default()
        },
        Wire::Payload(payload) => payload,
    }))
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        let kind = if let Some(payload) = record.user_messaged {
            ActivityKind::UserMessage(payload)
        } else if let Some(payload) = record.agent_messaged {
            ActivityKind::AgentMessage(payload)
        } else if let Some(generated) = record.plan_generated {
            ActivityKind::PlanGenerated(generated.plan)
        } else if let Some(approved) = record.plan_approved {
            ActivityKind::PlanApproved {
                plan_id: approved.plan_id,
            }
        } else if let Some(progress) = record.progress_updated {
            ActivityKind::ProgressUpdate {
                title: progress.title,
                description: progress.description,
            }
        } else if record.session_completed.is_some() {
            ActivityKind::SessionCompleted
        } else if let Some(failed) = record.session_failed {
            ActivityKind::SessionFailed {
                reason: failed.reason,
            }
        } else {
            ActivityKind::Generic
        };

        Self {
            name: record.name,
            id: record.id,
            create_time: record.create_time,
            originator: record.originator,
            description: record.description,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.3fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses a server timestamp, trying RFC 3339 first and then the
/// zone-less layouts the service has been seen to emit (interpreted as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn activity(value: serde_json::Value) -> Activity {
        serde_json::from_value(value).expect("activity should deserialize")
    }

    #[test]
    fn test_session_accepts_state_alias() {
        let session: Session = serde_json::from_value(json!({
            "name": "sessions/1",
            "id": "1",
            "state": "IN_PROGRESS"
        }))
        .unwrap();
        assert_eq!(session.status.as_deref(), Some("IN_PROGRESS"));
        assert_eq!(session.display_name(), "Untitled session");
        assert!(session.source_ref().is_none());
    }

    #[test]
    fn test_session_source_ref_and_title() {
        let session: Session = serde_json::from_value(json!({
            "id": "2",
            "title": "Refactor parser",
            "sourceContext": {
                "source": "sources/github/acme/widgets",
                "githubRepoContext": {"startingBranch": "main"}
            }
        }))
        .unwrap();
        assert_eq!(session.display_name(), "Refactor parser");
        assert_eq!(session.source_ref(), Some("sources/github/acme/widgets"));
    }

    #[test]
    fn test_list_sessions_empty_token_normalized() {
        let response: ListSessionsResponse =
            serde_json::from_value(json!({"sessions": [{"id": "1"}], "nextPageToken": ""}))
                .unwrap();
        let page: Page<Session> = response.into();
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_more());
    }

    #[test]
    fn test_list_activities_missing_array_is_empty_page() {
        let response: ListActivitiesResponse = serde_json::from_value(json!({})).unwrap();
        let page: Page<Activity> = response.into();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_identity_prefers_name_over_id() {
        let both = activity(json!({"name": "sessions/1/activities/a", "id": "a"}));
        assert_eq!(both.identity(), Some("sessions/1/activities/a"));

        let id_only = activity(json!({"id": "a"}));
        assert_eq!(id_only.identity(), Some("a"));

        let neither = activity(json!({"description": "orphan"}));
        assert_eq!(neither.identity(), None);
    }

    #[test]
    fn test_user_message_fallback_chain() {
        let with_message = activity(json!({
            "id": "1",
            "userMessaged": {"userMessage": "hello", "text": "ignored"}
        }));
        assert!(matches!(with_message.kind, ActivityKind::UserMessage(_)));
        assert_eq!(with_message.describe(), "hello");

        let with_text = activity(json!({"id": "2", "userMessage": {"text": "from text"}}));
        assert_eq!(with_text.describe(), "from text");

        let with_prompt = activity(json!({"id": "3", "userMessage": {"prompt": "the prompt"}}));
        assert_eq!(with_prompt.describe(), "the prompt");

        let with_description = activity(json!({
            "id": "4",
            "description": "described",
            "userMessaged": {}
        }));
        assert_eq!(with_description.describe(), "described");

        let bare = activity(json!({"id": "5", "userMessaged": {}}));
        assert_eq!(bare.describe(), "User message");
    }

    #[test]
    fn test_agent_message_as_bare_string() {
        let agent = activity(json!({"id": "1", "agentMessaged": "Working on it"}));
        assert!(matches!(agent.kind, ActivityKind::AgentMessage(_)));
        assert_eq!(agent.describe(), "Working on it");
    }

    #[test]
    fn test_agent_message_object() {
        let agent = activity(json!({
            "id": "1",
            "originator": "agent",
            "agentMessaged": {"agentMessage": "Done"}
        }));
        assert_eq!(agent.describe(), "Done");
        assert_eq!(agent.originator.as_deref(), Some("agent"));
    }

    #[test]
    fn test_plan_generated_outline() {
        let plan = activity(json!({
            "id": "1",
            "planGenerated": {"plan": {"id": "p1", "steps": [
                {"title": "Read code"},
                {"description": "untitled"},
                {"title": "Write fix"}
            ]}}
        }));
        assert_eq!(plan.describe(), "1. Read code\n2. Write fix");

        let empty = activity(json!({"id": "2", "planGenerated": {}}));
        assert_eq!(empty.describe(), "Plan generated");
    }

    #[test]
    fn test_plan_approved_and_completion_labels() {
        let approved = activity(json!({"id": "1", "planApproved": {"planId": "p1"}}));
        assert_eq!(
            approved.kind,
            ActivityKind::PlanApproved {
                plan_id: Some("p1".to_string())
            }
        );
        assert_eq!(approved.describe(), "Plan approved");

        let completed = activity(json!({"id": "2", "sessionCompleted": {}}));
        assert_eq!(completed.kind, ActivityKind::SessionCompleted);
        assert_eq!(completed.describe(), "Session completed");

        let failed = activity(json!({"id": "3", "sessionFailed": {"reason": "quota"}}));
        assert_eq!(failed.describe(), "quota");
    }

    #[test]
    fn test_progress_update_prefers_title() {
        let progress = activity(json!({
            "id": "1",
            "description": "outer",
            "progressUpdated": {"title": "Compiling", "description": "inner"}
        }));
        assert_eq!(progress.describe(), "Compiling");
    }

    #[test]
    fn test_unknown_payload_is_generic() {
        let generic = activity(json!({"id": "1", "artifacts": [{}]}));
        assert_eq!(generic.kind, ActivityKind::Generic);
        assert_eq!(generic.describe(), "Activity");
    }

    #[test]
    fn test_create_session_request_serialization() {
        let request = CreateSessionRequest::new("Do it")
            .with_source("sources/github/a/b", Some("dev".to_string()))
            .with_automation_mode("AUTO_CREATE_PR");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "prompt": "Do it",
                "sourceContext": {
                    "source": "sources/github/a/b",
                    "githubRepoContext": {"startingBranch": "dev"}
                },
                "automationMode": "AUTO_CREATE_PR"
            })
        );
    }

    #[test]
    fn test_create_activity_request_shape() {
        let body = CreateActivityRequest {
            user_message: OutgoingMessage { message: "hi" },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"userMessage": {"message": "hi"}})
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let with_millis = parse_timestamp("2024-10-19T08:30:15.250Z").unwrap();
        assert_eq!(with_millis.day(), 19);
        assert_eq!(with_millis.hour(), 8);

        let without_millis = parse_timestamp("2024-10-19T08:30:15Z").unwrap();
        assert_eq!(without_millis.second(), 15);

        let naive = parse_timestamp("2024-10-19T08:30:15").unwrap();
        assert_eq!(naive.month(), 10);

        let offset = parse_timestamp("2024-10-19T10:30:15+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        assert!(parse_timestamp("yesterday").is_none());
    }
}
