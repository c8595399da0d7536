use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::dialogues::{session::CompletedRecord, AnswersSink};

/// Writes one human-readable answers record per completed session, keyed
/// by user id and completion timestamp.
pub struct FileAnswersSink {
    results_dir: PathBuf,
}

impl FileAnswersSink {
    pub fn new(results_dir: PathBuf) -> Self {
        FileAnswersSink { results_dir }
    }

    fn record_path(&self, record: &CompletedRecord) -> PathBuf {
        self.results_dir.join(format!(
            "{}_{}.txt",
            record.user_id,
            record.completed_at.format("%Y%m%dT%H%M%S")
        ))
    }
}

#[async_trait]
impl AnswersSink for FileAnswersSink {
    async fn flush(&self, record: &CompletedRecord) -> Result<()> {
        let path = self.record_path(record);
        if tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to probe {}", path.display()))?
        {
            // Same user, same completion: an at-least-once re-trigger.
            debug!("record {} already written, skipping", path.display());
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.results_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.results_dir.display()))?;

        // Readers only ever observe complete records: the content lands in
        // a sibling temp file first and is renamed into place.
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, render_record(record))
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to move record into {}", path.display()))?;

        debug!(
            "recorded {} answers for user {}",
            record.answers.len(),
            record.user_id
        );
        Ok(())
    }
}

fn render_record(record: &CompletedRecord) -> String {
    let mut out = format!(
        "Training answers for user {}\nCompleted at {}\n\n",
        record.user_id,
        record.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    for (idx, qa) in record.answers.iter().enumerate() {
        out.push_str(&format!("Q{}: {}\n", idx + 1, qa.prompt));
        out.push_str(&format!("A{}: {}\n\n", idx + 1, qa.answer));
    }
    out
}
