pub mod gateway;
pub mod handlers;

use self::{gateway::TelegramGateway, handlers::build_handler};
use crate::{
    dialogues::engine::FlowEngine,
    logic::{
        answers::FileAnswersSink, notifications::Notifier, reminders::ReminderScheduler,
        shifts::ShiftService,
    },
};
use std::{error::Error, sync::Arc};
use teloxide::{
    dispatching::{dialogue::InMemStorage, DefaultKey, Dispatcher},
    macros::BotCommands,
    prelude::*,
    Bot,
};

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;
pub type OnboardingEngine = FlowEngine<TelegramGateway, FileAnswersSink>;

#[derive(Clone, Default, Debug)]
pub enum BotState {
    #[default]
    Default,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    #[command(description = "Start the onboarding flow")]
    Start,
    #[command(description = "Open the objections menu")]
    Menu,
    #[command(description = "Show the shift tracker keyboard")]
    Shift,
    #[command(description = "Remove and initialize dialogue")]
    Reset,
}

pub struct BotContext {
    pub engine: OnboardingEngine,
    pub shifts: ShiftService,
    pub reminders: ReminderScheduler<TelegramGateway>,
    pub notifier: Notifier<TelegramGateway>,
}

pub fn build_bot(
    bot: Bot,
    context: BotContext,
) -> Dispatcher<Bot, Box<dyn Error + Send + Sync>, DefaultKey> {
    tracing::info!("Starting onboarding-bot dispatcher");

    Dispatcher::builder(bot, build_handler())
        .dependencies(dptree::deps![
            InMemStorage::<BotState>::new(),
            Arc::new(context)
        ])
        .default_handler(|upd| async move {
            tracing::warn!("Unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
}
