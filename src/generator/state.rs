//! Run states, progress events and the final report.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validation::Verdict;

/// Free text describing the fictional person, produced once per run
pub type Biography = String;

/// HTML document with embedded CSS; replaced wholesale on each refinement
pub type ResumeDocument = String;

/// States of a single run.
///
/// `Biography -> Generate -> Validate`, then `Validate -> Refine -> Validate`
/// until the verdict is valid (`Saved`) or the refinement budget is spent
/// (`Exhausted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Biography,
    Generate,
    Validate,
    Refine,
    Saved,
    Exhausted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Biography => "biography",
            RunState::Generate => "generate",
            RunState::Validate => "validate",
            RunState::Refine => "refine",
            RunState::Saved => "saved",
            RunState::Exhausted => "exhausted",
        };
        write!(f, "{}", name)
    }
}

/// How a run ended. Both variants mean the document was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Reviewer accepted the document after `attempts` validations
    Saved { attempts: u32 },
    /// Budget spent; the last candidate was saved unreviewed
    Exhausted { refinements: u32 },
}

impl RunOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, RunOutcome::Saved { .. })
    }

    pub fn terminal_state(&self) -> RunState {
        match self {
            RunOutcome::Saved { .. } => RunState::Saved,
            RunOutcome::Exhausted { .. } => RunState::Exhausted,
        }
    }
}

/// Progress notifications emitted while a run is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    BiographyCompleted { chars: usize },
    ResumeGenerated { chars: usize },
    ValidationPassed { attempt: u32 },
    ValidationFailed { attempt: u32, reason: String },
    Refining { refinement: u32 },
    Exhausted { refinements: u32 },
    Saved { path: PathBuf, outcome: RunOutcome },
}

/// Everything a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub biography: Biography,
    pub document: ResumeDocument,
    pub outcome: RunOutcome,
    /// Number of refine calls made
    pub refinements: u32,
    /// Verdict of every validation, in order
    pub verdicts: Vec<Verdict>,
    /// States visited, from `Biography` to the terminal state
    pub trace: Vec<RunState>,
    pub output_path: PathBuf,
}

impl RunReport {
    pub fn validations(&self) -> u32 {
        self.verdicts.len() as u32
    }
}
