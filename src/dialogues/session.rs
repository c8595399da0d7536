use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use super::UserId;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CapturedAnswer {
    pub prompt: String,
    pub answer: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CompletedRecord {
    pub user_id: UserId,
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<CapturedAnswer>,
}

/// Per-user in-progress dialogue state. Lives only in the session store;
/// losing it on restart is acceptable.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: UserId,
    pub(crate) current_step: String,
    captured_answers: Vec<CapturedAnswer>,
    pub(crate) scratch: HashMap<String, String>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user_id: UserId, entry_step: impl Into<String>) -> Self {
        Session {
            user_id,
            current_step: entry_step.into(),
            captured_answers: Vec::new(),
            scratch: HashMap::new(),
            completed_at: None,
        }
    }

    pub fn current_step(&self) -> &str {
        &self.current_step
    }

    pub fn captured_answers(&self) -> &[CapturedAnswer] {
        &self.captured_answers
    }

    // Answers only ever grow; nothing rewrites or reorders them.
    pub(crate) fn record_answer(&mut self, prompt: impl Into<String>, answer: impl Into<String>) {
        self.captured_answers.push(CapturedAnswer {
            prompt: prompt.into(),
            answer: answer.into(),
        });
    }

    // The completion timestamp is fixed on first terminal entry; a flush
    // retry reuses it so the sink can de-duplicate.
    pub(crate) fn mark_completed(&mut self) -> DateTime<Utc> {
        *self.completed_at.get_or_insert_with(Utc::now)
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub(crate) fn completed_record(&mut self) -> CompletedRecord {
        CompletedRecord {
            user_id: self.user_id,
            completed_at: self.mark_completed(),
            answers: self.captured_answers.clone(),
        }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Live session table. The engine owns one of these instead of an ambient
/// user-keyed map, so an in-memory table can be swapped for a durable one
/// without touching flow logic.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, user_id: UserId) -> Option<SessionHandle>;

    /// Stores the session, replacing any live one for the same user.
    async fn insert(&self, session: Session) -> SessionHandle;

    /// Returns whether a session was actually removed.
    async fn remove(&self, user_id: UserId) -> bool;
}

#[derive(Default)]
pub struct InMemorySessions {
    inner: RwLock<HashMap<UserId, SessionHandle>>,
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn get(&self, user_id: UserId) -> Option<SessionHandle> {
        self.inner.read().await.get(&user_id).cloned()
    }

    async fn insert(&self, session: Session) -> SessionHandle {
        let user_id = session.user_id;
        let handle = Arc::new(Mutex::new(session));
        self.inner.write().await.insert(user_id, handle.clone());
        handle
    }

    async fn remove(&self, user_id: UserId) -> bool {
        self.inner.write().await.remove(&user_id).is_some()
    }
}
