//! Shared application state and the session store

use bhavna_engine::{CannedReplies, Conversation, ReplyGenerator, SentimentEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// One engine per process, shared by every session
    pub engine: Arc<SentimentEngine>,

    /// Bot reply generator
    pub replies: Arc<dyn ReplyGenerator>,

    /// Conversations keyed by session id
    pub sessions: Arc<SessionStore>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(engine: SentimentEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            replies: Arc::new(CannedReplies::new()),
            sessions: Arc::new(SessionStore::new()),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    pub fn with_replies(mut self, replies: Arc<dyn ReplyGenerator>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Arc::new(sessions);
        self
    }
}

/// A session's conversation; the mutex serializes its requests
pub type SessionHandle = Arc<Mutex<Conversation>>;

/// Sessions idle longer than this are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Upper bound on live sessions
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

struct SessionEntry {
    conversation: SessionHandle,
    last_activity: parking_lot::Mutex<Instant>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            conversation: Arc::new(Mutex::new(Conversation::new())),
            last_activity: parking_lot::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) -> SessionHandle {
        *self.last_activity.lock() = Instant::now();
        Arc::clone(&self.conversation)
    }

    fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }
}

/// In-memory sessions, lost on restart.
///
/// A session expires after `idle_timeout` without requests. When the store
/// is full, expired sessions go first, then the least recently used one.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a custom idle timeout and capacity (at least one session)
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Existing live session, if any
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .get(id)
            .filter(|entry| entry.idle_for() <= self.idle_timeout)
            .map(SessionEntry::touch)
    }

    /// Existing live session or a new empty one
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(session) = self.get(id) {
            return session;
        }

        let mut sessions = self.sessions.write();
        if let Some(entry) = sessions.get(id) {
            if entry.idle_for() <= self.idle_timeout {
                return entry.touch();
            }
            sessions.remove(id);
        }

        self.make_room(&mut sessions);
        sessions
            .entry(id.to_string())
            .or_insert_with(SessionEntry::new)
            .touch()
    }

    /// Replace the session's conversation with an empty one
    pub fn reset(&self, id: &str) {
        let mut sessions = self.sessions.write();
        if sessions.remove(id).is_none() {
            self.make_room(&mut sessions);
        }
        sessions.insert(id.to_string(), SessionEntry::new());
    }

    /// Drop every session idle past the timeout; returns how many went
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, SessionEntry>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.idle_for() <= self.idle_timeout);
        before - sessions.len()
    }

    fn make_room(&self, sessions: &mut HashMap<String, SessionEntry>) {
        if sessions.len() < self.max_sessions {
            return;
        }

        let expired = self.cleanup_expired_internal(sessions);
        if expired > 0 {
            debug!("Expired {} idle sessions", expired);
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .max_by_key(|(_, entry)| entry.idle_for())
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    debug!(session = %id, "Evicted least recently used session");
                }
                None => break,
            }
        }
    }

    /// Periodically drop expired sessions in the background
    pub fn start_cleanup_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(every);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                let Some(store) = weak.upgrade() else {
                    break;
                };
                let removed = store.cleanup_expired();
                if removed > 0 {
                    info!(
                        "Session cleanup: removed {} expired sessions ({} remaining)",
                        removed,
                        store.len()
                    );
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
