//! Remote task service client
//!
//! [`TaskApi`] is the seam between the synchronizers and the network. The
//! production implementation is [`HttpTaskApi`]; tests script a fake.

use async_trait::async_trait;

use crate::error::Result;

pub mod http;
pub mod types;

pub use http::HttpTaskApi;
pub use types::{
    parse_timestamp, Activity, ActivityKind, CreateSessionRequest, GithubRepoContext,
    MessagePayload, Page, Plan, PlanStep, Session, Source, SourceContext,
};

/// Operations the synchronizers need from the remote service.
///
/// A `page_token` of `None` requests the first page. Non-success responses
/// surface as `SyncError::Api`, transport failures as `SyncError::Network`,
/// and a missing API key as `SyncError::NotAuthenticated`.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Lists sessions, newest first.
    async fn list_sessions(&self, page_token: Option<&str>) -> Result<Page<Session>>;

    /// Lists a session's activities, newest page first.
    async fn list_activities(
        &self,
        session_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Activity>>;

    /// Posts a user message to a session.
    async fn create_activity(&self, session_id: &str, text: &str) -> Result<Activity>;

    /// Starts a new session.
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session>;

    /// Fetches a single session.
    async fn get_session(&self, session_id: &str) -> Result<Session>;

    /// Requests cancellation of a running session.
    async fn cancel_session(&self, session_id: &str) -> Result<Session>;

    /// Deletes a session.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Lists the repositories sessions can target.
    async fn list_sources(&self) -> Result<Vec<Source>>;
}
