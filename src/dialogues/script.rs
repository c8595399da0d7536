use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::ContentBlock;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("duplicate step id `{0}`")]
    DuplicateStep(String),

    #[error("step `{from}` points at unknown step `{to}`")]
    DanglingEdge { from: String, to: String },

    #[error("entry `{name}` points at unknown step `{to}`")]
    DanglingEntry { name: String, to: String },

    #[error("script defines no entry points")]
    NoEntryPoints,

    #[error("step `{0}` has no content")]
    EmptyStep(String),

    #[error("step `{0}` offers no choices")]
    NoChoices(String),

    #[error("duplicate choice token `{token}` on step `{step}`")]
    DuplicateToken { step: String, token: String },

    #[error("step `{0}` offers choices but does not end with a text block")]
    ChoicesWithoutPrompt(String),

    #[error("step `{0}` embeds choice buttons in its content")]
    EmbeddedChoices(String),

    #[error("automatic transitions through `{0}` form a cycle")]
    AutoCycle(String),
}

#[derive(Clone, Debug)]
pub struct Choice {
    pub label: String,
    pub token: String,
    pub target: String,
}

impl Choice {
    pub fn new(
        label: impl Into<String>,
        token: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Choice {
            label: label.into(),
            token: token.into(),
            target: target.into(),
        }
    }
}

/// What a broadcast step does once its content is out: wait for one of a
/// fixed set of labeled choices, or fall straight through into another
/// step. Auto edges are how several predecessors converge on one shared
/// continuation without duplicating its body.
#[derive(Clone, Debug)]
pub enum Next {
    Auto(String),
    Choices(Vec<Choice>),
}

impl Next {
    pub fn auto(target: impl Into<String>) -> Self {
        Next::Auto(target.into())
    }

    pub fn choices(choices: impl IntoIterator<Item = Choice>) -> Self {
        Next::Choices(choices.into_iter().collect())
    }
}

#[derive(Clone, Debug)]
pub enum Step {
    Broadcast {
        blocks: Vec<ContentBlock>,
        next: Next,
    },
    Question {
        prompt: String,
        capture_as: Option<String>,
        next: String,
    },
    Terminal {
        blocks: Vec<ContentBlock>,
    },
}

/// A static, author-defined dialogue graph. Built once, validated once;
/// never mutated at runtime.
#[derive(Debug)]
pub struct FlowScript {
    steps: HashMap<String, Step>,
    entries: HashMap<String, String>,
}

impl FlowScript {
    pub fn builder() -> ScriptBuilder {
        ScriptBuilder::default()
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.get(id)
    }

    pub fn entry(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }
}

#[derive(Default)]
pub struct ScriptBuilder {
    steps: Vec<(String, Step)>,
    entries: Vec<(String, String)>,
}

impl ScriptBuilder {
    pub fn entry(&mut self, name: impl Into<String>, step: impl Into<String>) -> &mut Self {
        self.entries.push((name.into(), step.into()));
        self
    }

    pub fn broadcast(
        &mut self,
        id: impl Into<String>,
        blocks: Vec<ContentBlock>,
        next: Next,
    ) -> &mut Self {
        self.steps.push((id.into(), Step::Broadcast { blocks, next }));
        self
    }

    pub fn question(
        &mut self,
        id: impl Into<String>,
        prompt: impl Into<String>,
        capture_as: Option<&str>,
        next: impl Into<String>,
    ) -> &mut Self {
        self.steps.push((
            id.into(),
            Step::Question {
                prompt: prompt.into(),
                capture_as: capture_as.map(str::to_owned),
                next: next.into(),
            },
        ));
        self
    }

    pub fn terminal(&mut self, id: impl Into<String>, blocks: Vec<ContentBlock>) -> &mut Self {
        self.steps.push((id.into(), Step::Terminal { blocks }));
        self
    }

    pub fn build(&mut self) -> Result<FlowScript, ScriptError> {
        let mut steps = HashMap::new();
        for (id, step) in self.steps.drain(..) {
            if steps.insert(id.clone(), step).is_some() {
                return Err(ScriptError::DuplicateStep(id));
            }
        }
        if self.entries.is_empty() {
            return Err(ScriptError::NoEntryPoints);
        }
        let entries: HashMap<String, String> = self.entries.drain(..).collect();

        let script = FlowScript { steps, entries };
        script.validate()?;
        Ok(script)
    }
}

impl FlowScript {
    fn validate(&self) -> Result<(), ScriptError> {
        for (name, target) in &self.entries {
            if !self.steps.contains_key(target) {
                return Err(ScriptError::DanglingEntry {
                    name: name.clone(),
                    to: target.clone(),
                });
            }
        }

        for (id, step) in &self.steps {
            match step {
                Step::Broadcast { blocks, next } => {
                    if blocks.is_empty() {
                        return Err(ScriptError::EmptyStep(id.clone()));
                    }
                    Self::check_blocks(id, blocks)?;
                    match next {
                        Next::Auto(target) => self.check_edge(id, target)?,
                        Next::Choices(choices) => {
                            if choices.is_empty() {
                                return Err(ScriptError::NoChoices(id.clone()));
                            }
                            if !matches!(blocks.last(), Some(ContentBlock::Text { .. })) {
                                return Err(ScriptError::ChoicesWithoutPrompt(id.clone()));
                            }
                            let mut tokens = HashSet::new();
                            for choice in choices {
                                if !tokens.insert(choice.token.as_str()) {
                                    return Err(ScriptError::DuplicateToken {
                                        step: id.clone(),
                                        token: choice.token.clone(),
                                    });
                                }
                                self.check_edge(id, &choice.target)?;
                            }
                        }
                    }
                }
                Step::Question { prompt, next, .. } => {
                    if prompt.is_empty() {
                        return Err(ScriptError::EmptyStep(id.clone()));
                    }
                    self.check_edge(id, next)?;
                }
                Step::Terminal { blocks } => {
                    if blocks.is_empty() {
                        return Err(ScriptError::EmptyStep(id.clone()));
                    }
                    Self::check_blocks(id, blocks)?;
                }
            }
        }

        self.check_auto_cycles()
    }

    fn check_blocks(id: &str, blocks: &[ContentBlock]) -> Result<(), ScriptError> {
        if blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::TextWithChoices { .. }))
        {
            return Err(ScriptError::EmbeddedChoices(id.to_owned()));
        }
        Ok(())
    }

    fn check_edge(&self, from: &str, to: &str) -> Result<(), ScriptError> {
        if !self.steps.contains_key(to) {
            return Err(ScriptError::DanglingEdge {
                from: from.to_owned(),
                to: to.to_owned(),
            });
        }
        Ok(())
    }

    // An emission chain follows auto edges until it reaches a step that
    // waits for input; a loop of auto edges would never yield.
    fn check_auto_cycles(&self) -> Result<(), ScriptError> {
        for (id, step) in &self.steps {
            let Step::Broadcast {
                next: Next::Auto(target),
                ..
            } = step
            else {
                continue;
            };

            let mut seen = HashSet::from([id.as_str()]);
            let mut target = target.as_str();
            while let Some(Step::Broadcast {
                next: Next::Auto(next_target),
                ..
            }) = self.steps.get(target)
            {
                if !seen.insert(target) {
                    return Err(ScriptError::AutoCycle(target.to_owned()));
                }
                target = next_target;
            }
        }
        Ok(())
    }
}
