//! Resume generator - drives a character description to a saved resume.
//!
//! One run makes a biography, generates a document from it, then alternates
//! validation and refinement until the reviewer accepts the document or the
//! refinement budget is spent. Either way the current document is written to
//! the output path exactly once.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::state::{Biography, ResumeDocument, RunEvent, RunOutcome, RunReport, RunState};
use crate::config::GenerationConfig;
use crate::error::{ResumeError, Result};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::Prompts;
use crate::transcript::{Stage, Transcript};
use crate::validation::Verdict;

/// Generates, validates and refines a resume with an LLM
pub struct ResumeGenerator {
    /// LLM client for every stage
    llm: Arc<dyn LlmClient>,
    prompts: Prompts,
    config: GenerationConfig,
    transcript: Option<Transcript>,
    events: Option<mpsc::UnboundedSender<RunEvent>>,
}

impl ResumeGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, config: GenerationConfig) -> Result<Self> {
        Ok(Self {
            llm,
            prompts: Prompts::new()?,
            config,
            transcript: None,
            events: None,
        })
    }

    /// Record every exchange to `transcript`
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Send progress events to `tx`. A closed receiver is ignored.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// One system + user exchange
    async fn ask(&self, stage: Stage, prompt: String) -> Result<String> {
        let request = CompletionRequest::new(self.prompts.system(), prompt.as_str());
        let response = self.llm.complete(request).await?;

        log::debug!(
            "{:?} call used {} input / {} output tokens",
            stage,
            response.usage.input_tokens,
            response.usage.output_tokens
        );
        if response.stop_reason.is_truncated() {
            log::warn!("{:?} response was cut off at the token limit", stage);
        }

        if let Some(transcript) = &self.transcript {
            transcript.record(stage, &prompt, &response.content)?;
        }

        Ok(response.content)
    }

    /// Fill in the gaps of a partial character description.
    ///
    /// The reply is accepted as-is.
    pub async fn complete_biography(&self, input_prompt: &str) -> Result<Biography> {
        if input_prompt.trim().is_empty() {
            return Err(ResumeError::EmptyPrompt);
        }
        let prompt = self.prompts.biography(input_prompt)?;
        self.ask(Stage::Biography, prompt).await
    }

    /// Write a one-page HTML resume with embedded CSS for `biography`
    pub async fn generate_resume(&self, biography: &str) -> Result<ResumeDocument> {
        let prompt = self.prompts.resume(biography)?;
        self.ask(Stage::Generate, prompt).await
    }

    /// Ask the reviewer for a verdict on `document`.
    ///
    /// The verdict depends only on the reply text and the configured
    /// [`crate::validation::VerdictMode`], not on the document itself.
    pub async fn validate_resume(&self, document: &str) -> Result<Verdict> {
        let prompt = self.prompts.validate(document)?;
        let reply = self.ask(Stage::Validate, prompt).await?;
        Ok(Verdict::parse(&reply, self.config.verdict_mode))
    }

    /// Fix technical errors in `document` and reconcile it with `biography`
    pub async fn refine_resume_code(&self, document: &str, biography: &str) -> Result<ResumeDocument> {
        let prompt = self.prompts.refine(document, biography)?;
        self.ask(Stage::Refine, prompt).await
    }

    /// Write `document` verbatim to the output path, replacing any existing file
    pub fn save_resume(&self, document: &str) -> Result<PathBuf> {
        let path = self.config.output_path.clone();
        fs::write(&path, document)?;
        log::info!("Wrote {} bytes to {}", document.len(), path.display());
        Ok(path)
    }

    /// Run the whole pipeline for `query`.
    ///
    /// Invalid verdicts never fail the run; only LLM, template and filesystem
    /// errors do, and those abort before anything is written.
    pub async fn run(&self, query: &str) -> Result<RunReport> {
        let max_refinements = self.config.max_refinements;
        let mut trace = Vec::new();
        enter(&mut trace, RunState::Biography);

        let biography = self.complete_biography(query).await?;
        self.emit(RunEvent::BiographyCompleted {
            chars: biography.chars().count(),
        });

        enter(&mut trace, RunState::Generate);
        let mut document = self.generate_resume(&biography).await?;
        self.emit(RunEvent::ResumeGenerated {
            chars: document.chars().count(),
        });

        let mut refinements = 0;
        let mut verdicts = Vec::new();

        let outcome = loop {
            enter(&mut trace, RunState::Validate);
            let verdict = self.validate_resume(&document).await?;
            let attempt = verdicts.len() as u32 + 1;
            verdicts.push(verdict.clone());

            let reason = match verdict {
                Verdict::Valid => {
                    log::info!("Validation passed on attempt {}", attempt);
                    self.emit(RunEvent::ValidationPassed { attempt });
                    break RunOutcome::Saved { attempts: attempt };
                }
                Verdict::Invalid { reason } => reason,
            };

            log::info!("Validation attempt {} failed: {}", attempt, reason);
            self.emit(RunEvent::ValidationFailed { attempt, reason });

            if refinements >= max_refinements {
                log::warn!(
                    "Max refinements ({}) reached, saving last candidate unreviewed",
                    max_refinements
                );
                break RunOutcome::Exhausted { refinements };
            }

            refinements += 1;
            enter(&mut trace, RunState::Refine);
            self.emit(RunEvent::Refining { refinement: refinements });
            document = self.refine_resume_code(&document, &biography).await?;
        };

        let output_path = self.save_resume(&document)?;
        enter(&mut trace, outcome.terminal_state());
        if let RunOutcome::Exhausted { refinements } = outcome {
            self.emit(RunEvent::Exhausted { refinements });
        }
        self.emit(RunEvent::Saved {
            path: output_path.clone(),
            outcome,
        });

        Ok(RunReport {
            biography,
            document,
            outcome,
            refinements,
            verdicts,
            trace,
            output_path,
        })
    }
}

/// Record a transition into `state`
fn enter(trace: &mut Vec<RunState>, state: RunState) {
    match trace.last() {
        Some(prev) => log::debug!("Run state {} -> {}", prev, state),
        None => log::debug!("Run state {}", state),
    }
    trace.push(state);
}
