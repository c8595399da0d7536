pub mod engine;
pub mod onboarding;
pub mod script;
pub mod session;

use std::{fmt::Display, ops::Deref};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use self::session::CompletedRecord;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for UserId {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One inbound user event, as delivered by the transport layer.
#[derive(Clone, Debug)]
pub enum FlowEvent {
    Start,
    Text(String),
    Choice(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChoiceButton {
    pub label: String,
    pub token: String,
}

/// Outbound content, opaque to the engine beyond its kind.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum ContentBlock {
    Text {
        text: String,
    },
    TextWithChoices {
        text: String,
        choices: Vec<ChoiceButton>,
    },
    Media {
        name: String,
        caption: String,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn media(name: impl Into<String>, caption: impl Into<String>) -> Self {
        ContentBlock::Media {
            name: name.into(),
            caption: caption.into(),
        }
    }
}

/// Delivers content to the user over whatever transport. Delivery detail
/// (message ids, rate limits, media lookup) stays behind this seam.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn emit(&self, user_id: UserId, block: ContentBlock) -> Result<()>;
}

/// Durably records a completed answer set. Must be all-or-nothing and
/// idempotent by (user_id, completed_at).
#[async_trait]
pub trait AnswersSink: Send + Sync {
    async fn flush(&self, record: &CompletedRecord) -> Result<()>;
}
