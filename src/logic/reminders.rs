use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use tokio::{task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use crate::dialogues::{ContentBlock, NotificationGateway, UserId};

pub const ROUTINE_PROMPTS: &[&str] = &[
    "📸 Time for the VIP broadcast — send a screenshot of the launch.",
    "📸 Time for the online broadcast — send a screenshot of the launch.",
    "📸 Time for the mass broadcast — send a screenshot of the launch.",
    "📥 Now work the inbox: answer every unread client before the next round.",
];

/// One recurring routine prompt per user on shift. A job is cancelled on
/// check-out or reset and aborted with the scheduler, so nothing dangles.
pub struct ReminderScheduler<G> {
    gateway: G,
    interval: Duration,
    prompts: Vec<String>,
    jobs: Mutex<HashMap<UserId, JoinHandle<()>>>,
}

impl<G> ReminderScheduler<G>
where
    G: NotificationGateway + Clone + 'static,
{
    pub fn new(gateway: G, interval: Duration) -> Self {
        Self::with_prompts(
            gateway,
            interval,
            ROUTINE_PROMPTS.iter().map(|p| (*p).to_owned()).collect(),
        )
    }

    pub fn with_prompts(gateway: G, interval: Duration, prompts: Vec<String>) -> Self {
        ReminderScheduler {
            gateway,
            interval,
            prompts,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Starts the recurring prompt rotation for a user, replacing any job
    /// already running for them.
    pub fn schedule(&self, user_id: UserId) {
        if self.prompts.is_empty() {
            return;
        }
        let gateway = self.gateway.clone();
        let interval = self.interval;
        let prompts = self.prompts.clone();
        let job = tokio::spawn(async move {
            let mut idx = 0;
            loop {
                sleep(interval).await;
                let prompt = ContentBlock::text(prompts[idx].clone());
                if let Err(err) = gateway.emit(user_id, prompt).await {
                    warn!("reminder delivery to {user_id} failed: {err:#}");
                }
                idx = (idx + 1) % prompts.len();
            }
        });

        debug!("scheduled reminders for {user_id} every {interval:?}");
        if let Some(old) = self.jobs().insert(user_id, job) {
            old.abort();
        }
    }

    pub fn cancel(&self, user_id: UserId) {
        if let Some(job) = self.jobs().remove(&user_id) {
            job.abort();
            debug!("cancelled reminders for {user_id}");
        }
    }
}

impl<G> ReminderScheduler<G> {
    fn jobs(&self) -> MutexGuard<'_, HashMap<UserId, JoinHandle<()>>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<G> Drop for ReminderScheduler<G> {
    fn drop(&mut self) {
        for job in self.jobs().values() {
            job.abort();
        }
    }
}
