//! Resumegen - fictional resume generation with an LLM in the loop
//!
//! A partial character description is expanded into a biography, turned into
//! a styled HTML resume, then reviewed and refined until the reviewer accepts
//! it or the refinement budget runs out.

pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod prompt;
pub mod transcript;
pub mod validation;

pub use error::{ResumeError, Result};
