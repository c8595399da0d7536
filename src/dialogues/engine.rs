use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tracing::{debug, warn};

use super::{
    script::{FlowScript, Next, Step},
    session::{CompletedRecord, InMemorySessions, Session, SessionStore},
    AnswersSink, ChoiceButton, ContentBlock, FlowEvent, NotificationGateway, UserId,
};

pub const START_ENTRY: &str = "start";

#[derive(Debug, PartialEq, Eq)]
pub enum AdvanceResult {
    /// The session moved (or stayed put after a fresh emission) and waits
    /// for the next inbound event.
    Continue,
    /// The terminal step was reached and the answer set is flushed.
    Completed(CompletedRecord),
    /// The input did not match the current step; it was re-emitted and
    /// nothing changed.
    Rejected,
    /// No live session for this user.
    NotActive,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to record answers for user {user_id}")]
    Flush {
        user_id: UserId,
        #[source]
        source: anyhow::Error,
    },

    #[error("unknown entry point `{0}`")]
    UnknownEntry(String),

    #[error("session for user {user_id} rests on unknown step `{step}`")]
    UnknownStep { user_id: UserId, step: String },
}

/// Drives sessions through a validated [`FlowScript`]: one inbound event
/// advances one user's session by at most one step.
pub struct FlowEngine<G, S> {
    script: Arc<FlowScript>,
    sessions: Arc<dyn SessionStore>,
    gateway: G,
    sink: S,
}

impl<G, S> FlowEngine<G, S>
where
    G: NotificationGateway,
    S: AnswersSink,
{
    pub fn new(script: FlowScript, gateway: G, sink: S) -> Self {
        Self::with_store(script, gateway, sink, Arc::new(InMemorySessions::default()))
    }

    pub fn with_store(
        script: FlowScript,
        gateway: G,
        sink: S,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        FlowEngine {
            script: Arc::new(script),
            sessions,
            gateway,
            sink,
        }
    }

    pub async fn handle(
        &self,
        user_id: UserId,
        event: FlowEvent,
    ) -> Result<AdvanceResult, EngineError> {
        match event {
            FlowEvent::Start => self.begin_session(user_id).await,
            event => self.advance(user_id, event).await,
        }
    }

    pub async fn begin_session(&self, user_id: UserId) -> Result<AdvanceResult, EngineError> {
        self.begin_session_at(user_id, START_ENTRY).await
    }

    /// Starts a session at a named entry point. A user already mid-flow is
    /// restarted with a fresh session.
    pub async fn begin_session_at(
        &self,
        user_id: UserId,
        entry: &str,
    ) -> Result<AdvanceResult, EngineError> {
        let entry_step = self
            .script
            .entry(entry)
            .ok_or_else(|| EngineError::UnknownEntry(entry.to_owned()))?;

        debug!("starting session for {user_id} at `{entry_step}`");
        let handle = self.sessions.insert(Session::new(user_id, entry_step)).await;
        let mut session = handle.lock().await;
        self.enter_step(&mut session).await
    }

    /// Removes the live session without flushing. Safe to call for users
    /// without one.
    pub async fn cancel_session(&self, user_id: UserId) {
        if self.sessions.remove(user_id).await {
            debug!("cancelled session for {user_id}");
        }
    }

    async fn advance(
        &self,
        user_id: UserId,
        event: FlowEvent,
    ) -> Result<AdvanceResult, EngineError> {
        let Some(handle) = self.sessions.get(user_id).await else {
            return Ok(AdvanceResult::NotActive);
        };
        let mut session = handle.lock().await;

        match self.step(&session)? {
            step @ Step::Broadcast {
                next: Next::Choices(choices),
                ..
            } => {
                if let FlowEvent::Choice(token) = &event {
                    if let Some(choice) = choices.iter().find(|c| &c.token == token) {
                        session.current_step = choice.target.clone();
                        return self.enter_step(&mut session).await;
                    }
                }
                debug!(
                    "unrecognized input at `{}` for {user_id}, re-prompting",
                    session.current_step
                );
                self.emit_step(&session, step).await;
                Ok(AdvanceResult::Rejected)
            }
            // Sessions never rest on an auto step; resume the chain if one
            // somehow does.
            Step::Broadcast {
                next: Next::Auto(_),
                ..
            } => self.enter_step(&mut session).await,
            step @ Step::Question {
                prompt,
                capture_as,
                next,
            } => {
                let answer = match &event {
                    FlowEvent::Text(text) => text.trim(),
                    _ => "",
                };
                if answer.is_empty() {
                    self.emit_step(&session, step).await;
                    return Ok(AdvanceResult::Rejected);
                }

                let prompt = render(prompt, &session.scratch);
                if let Some(field) = capture_as {
                    session.scratch.insert(field.clone(), answer.to_owned());
                }
                session.record_answer(prompt, answer);
                session.current_step = next.clone();
                self.enter_step(&mut session).await
            }
            // Still live at the terminal step means a previous flush
            // failed; any input retries it.
            Step::Terminal { .. } => self.try_flush(&mut session).await,
        }
    }

    // Emits the current step and follows auto edges until the session
    // rests on a step that waits for input, or terminates.
    async fn enter_step(&self, session: &mut Session) -> Result<AdvanceResult, EngineError> {
        loop {
            let step = self.step(session)?;
            self.emit_step(session, step).await;
            match step {
                Step::Broadcast {
                    next: Next::Auto(target),
                    ..
                } => session.current_step = target.clone(),
                Step::Broadcast { .. } | Step::Question { .. } => {
                    return Ok(AdvanceResult::Continue)
                }
                Step::Terminal { .. } => return self.try_flush(session).await,
            }
        }
    }

    async fn try_flush(&self, session: &mut Session) -> Result<AdvanceResult, EngineError> {
        let record = session.completed_record();
        match self.sink.flush(&record).await {
            Ok(()) => {
                self.sessions.remove(session.user_id).await;
                debug!(
                    "session for {} completed with {} answers",
                    session.user_id,
                    record.answers.len()
                );
                Ok(AdvanceResult::Completed(record))
            }
            // The session stays in the table so the collected answers
            // survive a sink failure and the flush can be retried.
            Err(source) => Err(EngineError::Flush {
                user_id: session.user_id,
                source,
            }),
        }
    }

    async fn emit_step(&self, session: &Session, step: &Step) {
        let scratch = &session.scratch;
        match step {
            Step::Broadcast { blocks, next } => {
                let choices = match next {
                    Next::Choices(choices) => Some(choices),
                    Next::Auto(_) => None,
                };
                for (idx, block) in blocks.iter().enumerate() {
                    match (block, choices) {
                        // The trailing text block carries the choice
                        // buttons; guaranteed present by validation.
                        (ContentBlock::Text { text }, Some(choices))
                            if idx + 1 == blocks.len() =>
                        {
                            let choices = choices
                                .iter()
                                .map(|c| ChoiceButton {
                                    label: c.label.clone(),
                                    token: c.token.clone(),
                                })
                                .collect();
                            self.emit(
                                session.user_id,
                                ContentBlock::TextWithChoices {
                                    text: render(text, scratch),
                                    choices,
                                },
                            )
                            .await;
                        }
                        _ => self.emit(session.user_id, rendered(block, scratch)).await,
                    }
                }
            }
            Step::Question { prompt, .. } => {
                self.emit(session.user_id, ContentBlock::text(render(prompt, scratch)))
                    .await;
            }
            Step::Terminal { blocks } => {
                for block in blocks {
                    self.emit(session.user_id, rendered(block, scratch)).await;
                }
            }
        }
    }

    // Delivery is best-effort; a failed emit never costs the session its
    // position in the graph.
    async fn emit(&self, user_id: UserId, block: ContentBlock) {
        if let Err(err) = self.gateway.emit(user_id, block).await {
            warn!("delivery to {user_id} failed: {err:#}");
        }
    }

    fn step<'a>(&'a self, session: &Session) -> Result<&'a Step, EngineError> {
        self.script
            .step(&session.current_step)
            .ok_or_else(|| EngineError::UnknownStep {
                user_id: session.user_id,
                step: session.current_step.clone(),
            })
    }
}

// `{field}` placeholders resolve against the session's scratch data;
// unknown fields are left as written.
fn render(text: &str, scratch: &HashMap<String, String>) -> String {
    let mut out = text.to_owned();
    for (key, value) in scratch {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

fn rendered(block: &ContentBlock, scratch: &HashMap<String, String>) -> ContentBlock {
    match block {
        ContentBlock::Text { text } => ContentBlock::text(render(text, scratch)),
        ContentBlock::Media { name, caption } => {
            ContentBlock::media(name.clone(), render(caption, scratch))
        }
        ContentBlock::TextWithChoices { text, choices } => ContentBlock::TextWithChoices {
            text: render(text, scratch),
            choices: choices.clone(),
        },
    }
}
