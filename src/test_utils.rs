//! Test utilities for julesync
//!
//! Provides a scripted in-memory [`TaskApi`] plus small builders for the
//! domain types, so synchronizer tests never touch the network.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::{
    Activity, ActivityKind, CreateSessionRequest, MessagePayload, Page, Session, Source, TaskApi,
};
use crate::error::{Result, SyncError};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    /// Successful response.
    Ok(T),
    /// Non-success HTTP status.
    Api(u16),
    /// Transport failure.
    Network,
}

impl<T> Scripted<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::Api(status) => Err(SyncError::Api {
                status,
                message: "scripted failure".to_string(),
            }
            .into()),
            Scripted::Network => Err(SyncError::Network("scripted outage".to_string()).into()),
        }
    }
}

#[derive(Default)]
struct FakeState {
    session_pages: VecDeque<Scripted<Page<Session>>>,
    activity_pages: VecDeque<Scripted<Page<Activity>>>,
    older_pages: HashMap<String, Page<Activity>>,
    statuses: VecDeque<Scripted<Session>>,
    last_status: Option<Session>,
    created_activities: VecDeque<Scripted<Activity>>,
    created_sessions: VecDeque<Scripted<Session>>,
    cancels: VecDeque<Scripted<Session>>,
    deletes: VecDeque<Scripted<()>>,
    calls: Vec<String>,
}

/// Scripted [`TaskApi`] double.
///
/// Each operation pops its next reply from a queue. When a queue runs dry:
/// list calls return an empty page, `get_session` repeats the last session it
/// returned, `delete_session` succeeds, and everything else fails with 404.
///
/// With a gate installed, requests that carry a page token (the "load more"
/// and "load older" paths) wait for a permit after being logged.
#[derive(Default)]
pub struct FakeTaskApi {
    state: Mutex<FakeState>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeTaskApi {
    /// Creates a fake with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a gate with no permits.
    pub fn with_gate(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Lets `permits` gated requests proceed.
    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a reply for `list_sessions`.
    pub fn push_sessions(&self, reply: Scripted<Page<Session>>) {
        self.state().session_pages.push_back(reply);
    }

    /// Queues a reply for a live-tail `list_activities` (no page token).
    pub fn push_activities(&self, reply: Scripted<Page<Activity>>) {
        self.state().activity_pages.push_back(reply);
    }

    /// Serves `page` whenever `list_activities` is called with `token`.
    pub fn add_older_page(&self, token: &str, page: Page<Activity>) {
        self.state().older_pages.insert(token.to_string(), page);
    }

    /// Queues a reply for `get_session`.
    pub fn push_status(&self, reply: Scripted<Session>) {
        self.state().statuses.push_back(reply);
    }

    /// Queues a reply for `create_activity`.
    pub fn push_created_activity(&self, reply: Scripted<Activity>) {
        self.state().created_activities.push_back(reply);
    }

    /// Queues a reply for `create_session`.
    pub fn push_created_session(&self, reply: Scripted<Session>) {
        self.state().created_sessions.push_back(reply);
    }

    /// Queues a reply for `cancel_session`.
    pub fn push_cancel(&self, reply: Scripted<Session>) {
        self.state().cancels.push_back(reply);
    }

    /// Queues a reply for `delete_session`.
    pub fn push_delete(&self, reply: Scripted<()>) {
        self.state().deletes.push_back(reply);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of calls whose log entry starts with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Waits until at least `count` calls match `prefix`, failing after 2s.
    pub async fn wait_for_calls(&self, prefix: &str, count: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while self.call_count(prefix) < count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {} call(s) to {}; saw {:?}",
                count,
                prefix,
                self.calls()
            );
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }
    }
}

fn token_label(page_token: Option<&str>) -> &str {
    page_token.unwrap_or("-")
}

fn not_found<T>() -> Result<T> {
    Scripted::<T>::Api(404).into_result()
}

#[async_trait]
impl TaskApi for FakeTaskApi {
    async fn list_sessions(&self, page_token: Option<&str>) -> Result<Page<Session>> {
        self.record(format!("list_sessions:{}", token_label(page_token)));
        if page_token.is_some() {
            self.pass_gate().await;
        }
        let reply = self.state().session_pages.pop_front();
        reply.map_or_else(|| Ok(Page::empty()), Scripted::into_result)
    }

    async fn list_activities(
        &self,
        session_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Activity>> {
        self.record(format!(
            "list_activities:{}:{}",
            session_id,
            token_label(page_token)
        ));
        match page_token {
            Some(token) => {
                self.pass_gate().await;
                let page = self.state().older_pages.get(token).cloned();
                page.map_or_else(not_found, Ok)
            }
            None => {
                let reply = self.state().activity_pages.pop_front();
                reply.map_or_else(|| Ok(Page::empty()), Scripted::into_result)
            }
        }
    }

    async fn create_activity(&self, session_id: &str, text: &str) -> Result<Activity> {
        self.record(format!("create_activity:{}:{}", session_id, text));
        let reply = self.state().created_activities.pop_front();
        reply.map_or_else(not_found, Scripted::into_result)
    }

    async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        self.record(format!("create_session:{}", request.prompt));
        let reply = self.state().created_sessions.pop_front();
        reply.map_or_else(not_found, Scripted::into_result)
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.record(format!("get_session:{}", session_id));
        let mut state = self.state();
        match state.statuses.pop_front() {
            Some(reply) => {
                let result = reply.into_result();
                if let Ok(session) = &result {
                    state.last_status = Some(session.clone());
                }
                result
            }
            None => state.last_status.clone().map_or_else(not_found, Ok),
        }
    }

    async fn cancel_session(&self, session_id: &str) -> Result<Session> {
        self.record(format!("cancel_session:{}", session_id));
        let reply = self.state().cancels.pop_front();
        reply.map_or_else(not_found, Scripted::into_result)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.record(format!("delete_session:{}", session_id));
        let reply = self.state().deletes.pop_front();
        reply.map_or(Ok(()), Scripted::into_result)
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        self.record("list_sources".to_string());
        Ok(Vec::new())
    }
}

/// Builds a session with the given id and status.
pub fn session(id: &str, status: &str) -> Session {
    Session {
        name: format!("sessions/{}", id),
        id: id.to_string(),
        title: Some(format!("Session {}", id)),
        prompt: None,
        status: Some(status.to_string()),
        source_context: None,
        create_time: None,
    }
}

/// Builds an agent message activity identified by `id`.
pub fn activity(id: &str, text: &str) -> Activity {
    Activity {
        name: Some(format!("activities/{}", id)),
        id: Some(id.to_string()),
        create_time: None,
        originator: Some("agent".to_string()),
        description: None,
        kind: ActivityKind::AgentMessage(MessagePayload {
            message: Some(text.to_string()),
            ..Default::default()
        }),
    }
}

/// Builds a page from items and an optional cursor.
pub fn page<T>(items: Vec<T>, token: Option<&str>) -> Page<T> {
    Page::new(items, token.map(str::to_string))
}

/// Asserts that `result` failed with an error whose message contains
/// `expected`.
pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error containing '{}' but got Ok({:?})", expected, value),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_pops_scripts_in_order() {
        let api = FakeTaskApi::new();
        api.push_sessions(Scripted::Ok(page(vec![session("1", "RUNNING")], Some("t"))));
        api.push_sessions(Scripted::Api(500));

        let first = api.list_sessions(None).await.unwrap();
        assert_eq!(first.items.len(), 1);
        assert!(api.list_sessions(None).await.is_err());
        assert!(api.list_sessions(None).await.unwrap().items.is_empty());
        assert_eq!(api.call_count("list_sessions"), 3);
    }

    #[tokio::test]
    async fn test_get_session_repeats_last_status() {
        let api = FakeTaskApi::new();
        assert!(api.get_session("s").await.is_err());
        api.push_status(Scripted::Ok(session("s", "RUNNING")));
        api.get_session("s").await.unwrap();
        let again = api.get_session("s").await.unwrap();
        assert_eq!(again.status.as_deref(), Some("RUNNING"));
    }

    #[tokio::test]
    async fn test_network_script_maps_to_network_error() {
        let api = FakeTaskApi::new();
        api.push_cancel(Scripted::Network);
        let err = api.cancel_session("s").await.unwrap_err();
        assert!(crate::error::classify(&err).is_some_and(SyncError::is_network));
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(SyncError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }
}
