use anyhow::Result;
use chrono::{DateTime, Utc};

use super::shifts::ShiftSummary;
use crate::dialogues::{ContentBlock, NotificationGateway, UserId};

#[derive(Debug)]
pub enum Notification {
    ShiftStarted {
        user_id: UserId,
        display_name: String,
        at: DateTime<Utc>,
    },
    ShiftFinished {
        user_id: UserId,
        display_name: String,
        summary: ShiftSummary,
    },
    TrainingCompleted {
        user_id: UserId,
        display_name: String,
        answers: usize,
    },
}

/// Reports user activity to the owner chat.
pub struct Notifier<T: NotificationGateway> {
    owner_chat: UserId,
    gateway: T,
}

impl<T> Notifier<T>
where
    T: NotificationGateway,
{
    pub fn new(owner_chat: UserId, gateway: T) -> Self {
        Self {
            owner_chat,
            gateway,
        }
    }

    pub async fn notify(&self, notification: Notification) -> Result<()> {
        let text = match notification {
            Notification::ShiftStarted {
                user_id,
                display_name,
                at,
            } => format!(
                "👤 {display_name} ({user_id}) started a shift at {}.",
                at.format("%H:%M:%S")
            ),
            Notification::ShiftFinished {
                user_id,
                display_name,
                summary,
            } => format!(
                "👤 {display_name} ({user_id}) finished a shift at {}.\n⏱ Duration: {}.",
                summary.finished_at.format("%H:%M:%S"),
                summary.human_duration()
            ),
            Notification::TrainingCompleted {
                user_id,
                display_name,
                answers,
            } => format!(
                "🎓 {display_name} ({user_id}) finished the onboarding test, {answers} answers recorded."
            ),
        };

        self.gateway
            .emit(self.owner_chat, ContentBlock::text(text))
            .await
    }
}
