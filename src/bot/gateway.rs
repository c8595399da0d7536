use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::{
    payloads::{SendMessageSetters, SendPhotoSetters},
    prelude::Requester,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile},
    Bot,
};
use tracing::warn;

use crate::dialogues::{ChoiceButton, ContentBlock, NotificationGateway, UserId};

/// Telegram rendition of the notification gateway. Choice buttons become
/// an inline keyboard; a missing media file degrades to its caption.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
    media_dir: PathBuf,
}

impl TelegramGateway {
    pub fn new(bot: Bot, media_dir: PathBuf) -> Self {
        TelegramGateway { bot, media_dir }
    }

    fn chat_id(user_id: UserId) -> Result<ChatId> {
        let id = i64::try_from(user_id.0)
            .with_context(|| format!("User id {user_id} does not fit a chat id"))?;
        Ok(ChatId(id))
    }

    fn keyboard(choices: &[ChoiceButton]) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<_>> = choices
            .chunks(2)
            .map(|row| {
                row.iter()
                    .map(|c| InlineKeyboardButton::callback(c.label.clone(), c.token.clone()))
                    .collect()
            })
            .collect();
        InlineKeyboardMarkup::new(rows)
    }
}

#[async_trait]
impl NotificationGateway for TelegramGateway {
    async fn emit(&self, user_id: UserId, block: ContentBlock) -> Result<()> {
        let chat_id = Self::chat_id(user_id)?;
        match block {
            ContentBlock::Text { text } => {
                self.bot.send_message(chat_id, text).await?;
            }
            ContentBlock::TextWithChoices { text, choices } => {
                self.bot
                    .send_message(chat_id, text)
                    .reply_markup(Self::keyboard(&choices))
                    .await?;
            }
            ContentBlock::Media { name, caption } => {
                let path = self.media_dir.join(&name);
                if path.exists() {
                    self.bot
                        .send_photo(chat_id, InputFile::file(path))
                        .caption(caption)
                        .await?;
                } else {
                    warn!("media `{name}` is missing, sending its caption as text");
                    self.bot.send_message(chat_id, caption).await?;
                }
            }
        }
        Ok(())
    }
}
