use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use onboarding_bot::dialogues::{
    script::{Choice, FlowScript, Next},
    session::CompletedRecord,
    AnswersSink, ContentBlock, NotificationGateway, UserId,
};

#[derive(Clone, Default)]
pub struct RecordingGateway {
    sent: Arc<Mutex<Vec<(UserId, ContentBlock)>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<(UserId, ContentBlock)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, user_id: UserId) -> Vec<ContentBlock> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| *to == user_id)
            .map(|(_, block)| block.clone())
            .collect()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn emit(&self, user_id: UserId, block: ContentBlock) -> Result<()> {
        self.sent.lock().await.push((user_id, block));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<CompletedRecord>>>,
    fail_next: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<CompletedRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AnswersSink for MemorySink {
    async fn flush(&self, record: &CompletedRecord) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("sink unavailable");
        }
        let mut records = self.records.lock().await;
        let duplicate = records
            .iter()
            .any(|r| r.user_id == record.user_id && r.completed_at == record.completed_at);
        if !duplicate {
            records.push(record.clone());
        }
        Ok(())
    }
}

/// Minimal graph: a welcome with one choice, two questions, a farewell.
pub fn sample_script() -> FlowScript {
    let mut b = FlowScript::builder();
    b.entry("start", "welcome");
    b.broadcast(
        "welcome",
        vec![ContentBlock::text("Welcome")],
        Next::choices([Choice::new("Agree", "agree", "q1")]),
    );
    b.question("q1", "What is your name?", Some("name"), "q2");
    b.question("q2", "Do you know X? (yes/no)", None, "end");
    b.terminal("end", vec![ContentBlock::text("Thanks, {name}!")]);
    b.build().expect("sample script is valid")
}
