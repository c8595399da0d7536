use onboarding_bot::{
    bot::{build_bot, gateway::TelegramGateway, BotContext},
    configuration::get_config,
    dialogues::{engine::FlowEngine, onboarding::onboarding_script, UserId},
    logic::{
        answers::FileAnswersSink, notifications::Notifier, reminders::ReminderScheduler,
        shifts::ShiftService,
    },
    set_env,
    telemetry::init_tracing,
    web::Application,
};

use secrecy::ExposeSecret;
use teloxide::Bot;
use tokio::select;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    set_env();
    let settings = get_config()?;
    init_tracing();

    // A broken step graph fails here, never mid-dialogue.
    let script = onboarding_script()?;

    let bot = Bot::new(settings.bot.token.expose_secret());
    let gateway = TelegramGateway::new(bot.clone(), settings.bot.media_dir.clone());
    let context = BotContext {
        engine: FlowEngine::new(
            script,
            gateway.clone(),
            FileAnswersSink::new(settings.bot.results_dir.clone()),
        ),
        shifts: ShiftService::new(),
        reminders: ReminderScheduler::new(gateway.clone(), settings.bot.reminder_interval()),
        notifier: Notifier::new(UserId(settings.bot.owner_chat_id), gateway),
    };

    info!("Starting onboarding-bot");
    let server = Application::build(&settings).await?;
    let mut dispatcher = build_bot(bot, context);
    let bot_handle = tokio::spawn(async move { dispatcher.dispatch().await });

    select! {
        _ = bot_handle => {
            info!("Bot exited")
        }
        _ = server.serve_forever() => {
            info!("Server exited")
        }
    };
    info!("onboarding-bot shut down");
    Ok(())
}
