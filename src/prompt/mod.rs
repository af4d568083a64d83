//! Prompt System - fixed templates and rendering
//!
//! Templates are rendered with Handlebars. The pipeline uses four of them plus
//! a fixed system instruction.

mod render;
mod templates;

pub use templates::{
    BIOGRAPHY_TEMPLATE, Prompts, REFINE_TEMPLATE, RESUME_TEMPLATE, SYSTEM_PROMPT, VALIDATE_TEMPLATE,
};
