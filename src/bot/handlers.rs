use std::error::Error;

use teloxide::{
    dispatching::{
        dialogue::{GetChatId, InMemStorage},
        DpHandlerDescription, HandlerExt, UpdateFilterExt,
    },
    dptree, filter_command,
    payloads::SendMessageSetters,
    prelude::{DependencyMap, Handler, Requester},
    types::{
        CallbackQuery, ChatId, KeyboardButton, KeyboardMarkup as ReplyKeyboardMarkup, Message,
        Update,
    },
    Bot,
};
use tracing::{debug, error, warn};

use std::sync::Arc;

use crate::{
    dialogues::{
        engine::{AdvanceResult, EngineError},
        onboarding::MENU_ENTRY,
        FlowEvent, UserId,
    },
    logic::{notifications::Notification, shifts::ShiftError},
};

use super::{BotContext, BotState, Command, HandlerResult};

pub const CHECK_IN_LABEL: &str = "+ Check in";
pub const CHECK_OUT_LABEL: &str = "- Check out";

const UNKNOWN_INPUT_HINT: &str = "I didn't recognize that. Use /start for the onboarding, \
                                  /menu for the objections menu or /shift for the shift tracker.";
const FLUSH_APOLOGY: &str = "😔 Something went wrong while saving your answers. \
                             Send any message to try again, or /start to begin over.";

pub fn build_handler(
) -> Handler<'static, DependencyMap, Result<(), Box<dyn Error + Send + Sync>>, DpHandlerDescription>
{
    let commands_handler = filter_command::<Command, _>()
        .branch(dptree::case![Command::Start].endpoint(handle_start_command))
        .branch(dptree::case![Command::Menu].endpoint(handle_menu_command))
        .branch(dptree::case![Command::Shift].endpoint(handle_shift_command))
        .branch(dptree::case![Command::Reset].endpoint(handle_reset_command));

    let messages_handler = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<BotState>, BotState>()
        .branch(commands_handler)
        .endpoint(main_message_handler);

    let callbacks_handler = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, InMemStorage<BotState>, BotState>()
        .endpoint(callback_handler);

    dptree::entry()
        .branch(messages_handler)
        .branch(callbacks_handler)
}

async fn main_message_handler(bot: Bot, msg: Message, context: Arc<BotContext>) -> HandlerResult {
    let Some(user) = msg.from().cloned() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0);
    debug!("Handling message. chat_id={} from={user_id}", msg.chat.id);

    match msg.text().unwrap_or_default() {
        CHECK_IN_LABEL => handle_check_in(&bot, &msg, &context, user_id, user.full_name()).await,
        CHECK_OUT_LABEL => handle_check_out(&bot, &msg, &context, user_id, user.full_name()).await,
        text => {
            let result = context
                .engine
                .handle(user_id, FlowEvent::Text(text.to_owned()))
                .await;
            respond(&bot, msg.chat.id, &context, user_id, user.full_name(), result).await
        }
    }
}

async fn callback_handler(bot: Bot, query: CallbackQuery, context: Arc<BotContext>) -> HandlerResult {
    let user_id = UserId(query.from.id.0);
    debug!("Callback ({user_id}): Handling \"{:?}\"", query.data);

    let Some(token) = query.data.clone() else {
        return Ok(());
    };
    let chat_id = query.chat_id().unwrap_or(ChatId(query.from.id.0 as i64));
    let result = context.engine.handle(user_id, FlowEvent::Choice(token)).await;
    respond(
        &bot,
        chat_id,
        &context,
        user_id,
        query.from.full_name(),
        result,
    )
    .await
}

async fn handle_start_command(bot: Bot, msg: Message, context: Arc<BotContext>) -> HandlerResult {
    let Some(user) = msg.from().cloned() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0);
    debug!(
        "Handling start command. chat_id={} from={user_id}",
        msg.chat.id
    );

    let result = context.engine.begin_session(user_id).await;
    respond(&bot, msg.chat.id, &context, user_id, user.full_name(), result).await
}

async fn handle_menu_command(bot: Bot, msg: Message, context: Arc<BotContext>) -> HandlerResult {
    let Some(user) = msg.from().cloned() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0);
    debug!(
        "Handling menu command. chat_id={} from={user_id}",
        msg.chat.id
    );

    let result = context.engine.begin_session_at(user_id, MENU_ENTRY).await;
    respond(&bot, msg.chat.id, &context, user_id, user.full_name(), result).await
}

async fn handle_shift_command(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Press “+ Check in” to start a shift and “- Check out” to finish it.",
    )
    .reply_markup(shift_keyboard())
    .await?;
    Ok(())
}

async fn handle_reset_command(bot: Bot, msg: Message, context: Arc<BotContext>) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0);
    debug!(
        "Handling reset command. chat_id={} from={user_id}",
        msg.chat.id
    );

    context.engine.cancel_session(user_id).await;
    context.reminders.cancel(user_id);
    bot.send_message(msg.chat.id, "Dialogue dropped. Use /start to begin again.")
        .await?;
    Ok(())
}

async fn handle_check_in(
    bot: &Bot,
    msg: &Message,
    context: &BotContext,
    user_id: UserId,
    display_name: String,
) -> HandlerResult {
    match context.shifts.check_in(user_id).await {
        Ok(at) => {
            bot.send_message(
                msg.chat.id,
                format!("🟢 Shift started at {}.", at.format("%H:%M:%S")),
            )
            .reply_markup(shift_keyboard())
            .await?;
            context.reminders.schedule(user_id);

            let notification = Notification::ShiftStarted {
                user_id,
                display_name,
                at,
            };
            if let Err(err) = context.notifier.notify(notification).await {
                warn!("Owner notification failed: {err:#}");
            }
        }
        Err(_) => {
            bot.send_message(
                msg.chat.id,
                "❗ You are already on shift. Press “- Check out” to finish it.",
            )
            .await?;
        }
    }
    Ok(())
}

async fn handle_check_out(
    bot: &Bot,
    msg: &Message,
    context: &BotContext,
    user_id: UserId,
    display_name: String,
) -> HandlerResult {
    match context.shifts.check_out(user_id).await {
        Ok(summary) => {
            context.reminders.cancel(user_id);
            bot.send_message(
                msg.chat.id,
                format!(
                    "🔴 Shift finished at {}.\n⏱ Duration: {}.",
                    summary.finished_at.format("%H:%M:%S"),
                    summary.human_duration()
                ),
            )
            .reply_markup(shift_keyboard())
            .await?;

            let notification = Notification::ShiftFinished {
                user_id,
                display_name,
                summary,
            };
            if let Err(err) = context.notifier.notify(notification).await {
                warn!("Owner notification failed: {err:#}");
            }
        }
        Err(ShiftError::NotStarted | ShiftError::AlreadyStarted) => {
            bot.send_message(
                msg.chat.id,
                "❗ You haven't started a shift yet. Press “+ Check in”.",
            )
            .await?;
        }
    }
    Ok(())
}

fn shift_keyboard() -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup::new(vec![vec![
        KeyboardButton::new(CHECK_IN_LABEL),
        KeyboardButton::new(CHECK_OUT_LABEL),
    ]])
    .resize_keyboard(true)
}

async fn respond(
    bot: &Bot,
    chat_id: ChatId,
    context: &BotContext,
    user_id: UserId,
    display_name: String,
    result: Result<AdvanceResult, EngineError>,
) -> HandlerResult {
    match result {
        Ok(AdvanceResult::Completed(record)) => {
            let notification = Notification::TrainingCompleted {
                user_id,
                display_name,
                answers: record.answers.len(),
            };
            if let Err(err) = context.notifier.notify(notification).await {
                warn!("Owner notification failed: {err:#}");
            }
            Ok(())
        }
        Ok(AdvanceResult::NotActive) => {
            bot.send_message(chat_id, UNKNOWN_INPUT_HINT).await?;
            Ok(())
        }
        Ok(AdvanceResult::Continue | AdvanceResult::Rejected) => Ok(()),
        Err(EngineError::Flush { user_id, source }) => {
            // Answers stay in the live session; the next message retries.
            error!("Failed to flush answers for {user_id}: {source:#}");
            bot.send_message(chat_id, FLUSH_APOLOGY).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
