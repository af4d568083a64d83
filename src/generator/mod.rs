//! Generator - the biography, generate, validate, refine pipeline
//!
//! Each run is a small state machine:
//! - Biography: expand the user's character description
//! - Generate: write the first HTML resume
//! - Validate / Refine: alternate until valid or out of refinements
//! - Saved / Exhausted: the document is written either way

mod resume;
mod state;

pub use resume::ResumeGenerator;
pub use state::{Biography, ResumeDocument, RunEvent, RunOutcome, RunReport, RunState};
