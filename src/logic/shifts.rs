use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::dialogues::UserId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShiftError {
    #[error("shift is already started")]
    AlreadyStarted,

    #[error("shift is not started")]
    NotStarted,
}

#[derive(Clone, Copy, Debug)]
struct WorkSession {
    started_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ShiftSummary {
    pub fn duration(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }

    pub fn human_duration(&self) -> String {
        let minutes = self.duration().num_minutes().max(0);
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}

/// Tracks active work shifts, one per user.
#[derive(Default)]
pub struct ShiftService {
    sessions: RwLock<HashMap<UserId, WorkSession>>,
}

impl ShiftService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn check_in(&self, user_id: UserId) -> Result<DateTime<Utc>, ShiftError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&user_id) {
            return Err(ShiftError::AlreadyStarted);
        }
        let started_at = Utc::now();
        sessions.insert(user_id, WorkSession { started_at });
        Ok(started_at)
    }

    pub async fn check_out(&self, user_id: UserId) -> Result<ShiftSummary, ShiftError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&user_id)
            .ok_or(ShiftError::NotStarted)?;
        Ok(ShiftSummary {
            started_at: session.started_at,
            finished_at: Utc::now(),
        })
    }

    pub async fn is_on_shift(&self, user_id: UserId) -> bool {
        self.sessions.read().await.contains_key(&user_id)
    }
}
