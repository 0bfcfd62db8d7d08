use crate::error::ApiError;
use crate::models::{SessionId, UploadFormat};
use async_trait::async_trait;
use axum::body::Bytes;
use pixel_grid::{Config, EditorSession, DEFAULT_HISTORY_LIMIT};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// The upload a grid was converted from.
#[derive(Debug, Clone)]
pub struct StoredSource {
    pub format: UploadFormat,
    pub bytes: Bytes,
}

/// Server-side state of one session.
#[derive(Debug, Default)]
pub struct SessionEntry {
    pub editor: EditorSession,
    /// Config of the conversion that produced the current grid
    pub config: Option<Config>,
    /// Upload the current grid was converted from
    pub source: Option<StoredSource>,
}

impl SessionEntry {
    pub fn new(history_limit: usize) -> Self {
        Self {
            editor: EditorSession::with_history_limit(history_limit),
            ..Self::default()
        }
    }
}

/// A session shared between handlers; the mutex serializes edits.
pub type SharedSession = Arc<Mutex<SessionEntry>>;

/// Trait for editor session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create an empty session and return its id
    async fn create(&self) -> Result<SessionId, ApiError>;

    /// Find a session by id
    async fn find(&self, id: &SessionId) -> Result<Option<SharedSession>, ApiError>;

    /// Drop a session, returning whether it existed
    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError>;

    /// Find a session or fail with [`ApiError::SessionNotFound`]
    async fn require(&self, id: &SessionId) -> Result<SharedSession, ApiError> {
        self.find(id).await?.ok_or(ApiError::SessionNotFound)
    }
}

/// In-memory session storage
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SharedSession>>>,
    history_limit: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Store whose sessions keep up to `limit` undo snapshots
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            history_limit: limit,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<SessionId, ApiError> {
        let mut sessions = self.sessions.write().await;
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        sessions.insert(id.clone(), Arc::new(Mutex::new(SessionEntry::new(self.history_limit))));
        tracing::info!(session = %id, total = sessions.len(), "Session created");
        Ok(id)
    }

    async fn find(&self, id: &SessionId) -> Result<Option<SharedSession>, ApiError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, ApiError> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, total = sessions.len(), "Session removed");
        }
        Ok(removed)
    }
}
