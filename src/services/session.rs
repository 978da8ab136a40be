//! Per-session browsing state
//!
//! Each browsing session owns its last result set, active page and selected
//! company. Handlers mutate state through the store; a session that has not
//! been touched within the idle window is swept on the next store access, so
//! abandoned sessions do not pile up in a long-running server.

use crate::constants::SESSION_IDLE_TTL_SECS;
use crate::error::{AppError, Result};
use crate::models::{CompanyRecord, SearchHit};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Mutable state of one browsing session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub results: Vec<SearchHit>,
    pub page: usize,
    pub selected: Option<CompanyRecord>,
}

impl SessionState {
    /// Install a fresh result set; resets paging and clears the selection
    pub fn set_results(&mut self, results: Vec<SearchHit>) {
        self.results = results;
        self.page = 0;
        self.selected = None;
    }

    /// Select a company from the current results; resets paging so the chart
    /// panel starts clean
    pub fn select(&mut self, ticker: &str) -> Result<()> {
        let company = self
            .results
            .iter()
            .find(|hit| hit.company.ticker == ticker)
            .map(|hit| hit.company.clone())
            .ok_or_else(|| {
                AppError::NotFound(format!("ticker {} is not in the current results", ticker))
            })?;

        self.selected = Some(company);
        self.page = 0;
        Ok(())
    }
}

struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

/// Shared map of live sessions with idle-based expiry
///
/// Every access refreshes the session's last-seen time; entries idle past
/// the TTL are dropped during the next write access.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::from_secs(SESSION_IDLE_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    fn sweep_expired(&self, sessions: &mut HashMap<Uuid, SessionEntry>) {
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_ttl);
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        self.sweep_expired(&mut sessions);
        sessions.insert(
            id,
            SessionEntry {
                state: SessionState::default(),
                last_seen: Instant::now(),
            },
        );
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionState> {
        let mut sessions = self.sessions.write().await;
        self.sweep_expired(&mut sessions);
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))?;
        entry.last_seen = Instant::now();
        Ok(entry.state.clone())
    }

    /// Run a mutation against one session's state
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionState) -> Result<R>,
    ) -> Result<R> {
        let mut sessions = self.sessions.write().await;
        self.sweep_expired(&mut sessions);
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))?;
        entry.last_seen = Instant::now();
        f(&mut entry.state)
    }

    /// Remove one session explicitly (client closed the browsing view)
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
