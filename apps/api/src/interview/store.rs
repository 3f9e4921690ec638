use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::InterviewSession;

/// Idle time after which a session is dropped, unless configured otherwise.
pub const DEFAULT_SESSION_TTL_SECS: u32 = 3600;

/// Handle to one client's session. Held for a whole transition, so a session
/// is never driven by two requests at once.
pub type SessionHandle = Arc<Mutex<InterviewSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_touched: DateTime<Utc>,
}

/// In-memory registry of interview sessions, one per connected client.
/// Nothing survives a restart. Sessions idle for longer than `idle_ttl` are
/// removed by `evict_idle`, together with their report bytes.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(i64::from(DEFAULT_SESSION_TTL_SECS)))
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Registers a fresh session in the Greeting stage and returns its id.
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle: SessionHandle = Arc::new(Mutex::new(InterviewSession::default()));
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_touched: Utc::now(),
            },
        );
        debug!("Session {id} created");
        (id, handle)
    }

    /// Looks up a session and marks it as used now.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_touched = Utc::now();
        Ok(entry.handle.clone())
    }

    /// Drops every session not touched within `idle_ttl` of `now`.
    /// Returns how many were removed.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_touched <= self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions ({} active)", sessions.len());
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Runs `evict_idle` forever, once per `period`.
pub async fn run_idle_sweeper(store: SessionStore, period: std::time::Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        store.evict_idle(Utc::now()).await;
    }
}
