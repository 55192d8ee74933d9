//! Runtime for live chat sessions
//!
//! Each session sits behind its own async mutex, held for a whole turn, so
//! a session handles one submission at a time while other sessions proceed
//! independently. Nothing is persisted.

use crate::relay::ResponseRelay;
use crate::session::{Message, Session};
use crate::state_machine::{advance, Stage, TurnOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Message text is empty")]
    EmptyMessage,
}

/// Point-in-time view of a session for clients
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub stage: Stage,
    pub stage_number: u8,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl SessionSnapshot {
    fn of(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            stage: session.stage(),
            stage_number: session.stage().number(),
            messages: session.transcript().to_vec(),
            created_at: session.created_at(),
        }
    }
}

/// Manager for all live sessions
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    relay: Arc<ResponseRelay>,
    idle_ttl: Duration,
}

impl SessionManager {
    pub fn new(relay: Arc<ResponseRelay>, idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            relay,
            idle_ttl,
        }
    }

    pub fn relay(&self) -> &ResponseRelay {
        &self.relay
    }

    /// Start a fresh session holding only the greeting
    pub async fn create(&self) -> SessionSnapshot {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session::new(id.clone());
        let snapshot = SessionSnapshot::of(&session);

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));

        tracing::info!(session_id = %id, "Session created");
        snapshot
    }

    async fn handle(&self, id: &str) -> Result<Arc<Mutex<Session>>, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub async fn snapshot(&self, id: &str) -> Result<SessionSnapshot, SessionError> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(SessionSnapshot::of(&session))
    }

    /// Run one user turn to completion
    pub async fn chat(
        &self,
        id: &str,
        text: &str,
    ) -> Result<(TurnOutcome, SessionSnapshot), SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        let outcome = advance(&mut session, &self.relay, text).await;
        Ok((outcome, SessionSnapshot::of(&session)))
    }

    pub async fn reset(&self, id: &str) -> Result<SessionSnapshot, SessionError> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.reset();
        tracing::info!(session_id = %id, "Session reset");
        Ok(SessionSnapshot::of(&session))
    }

    /// Plain-text transcript for download
    pub async fn export(&self, id: &str) -> Result<String, SessionError> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.touch();
        Ok(session.export())
    }

    /// Drop a session for good
    pub async fn discard(&self, id: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        tracing::info!(session_id = %id, "Session discarded");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Discard sessions idle for longer than the TTL. Sessions mid-turn are
    /// never idle and are skipped. Returns how many were removed.
    pub async fn sweep_idle(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, handle| {
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            let idle = (now - session.last_active()).to_std().unwrap_or_default();
            let keep = idle <= self.idle_ttl;
            if !keep {
                tracing::info!(session_id = %id, idle_secs = idle.as_secs(), "Session expired");
            }
            keep
        });

        before - sessions.len()
    }

    /// Periodically sweep idle sessions until the runtime shuts down
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = manager.sweep_idle().await;
                if removed > 0 {
                    let remaining = manager.session_count().await;
                    tracing::debug!(removed, remaining, "Idle sweep finished");
                }
            }
        })
    }
}
