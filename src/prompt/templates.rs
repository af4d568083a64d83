//! Fixed prompt templates for the resume pipeline.

use std::collections::HashMap;

use super::render::PromptRenderer;
use crate::error::Result;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates realistic biographies and resumes for fictional characters based on a brief prompt.
Your responses should be coherent, creative, and job-relevant.";

pub const BIOGRAPHY_TEMPLATE: &str = "
You are given a short prompt describing a person who wants to create a resume.
Your task is to creatively fill in all missing details in their biography, including:
- Full name (if not provided)
- Age (if not provided)
- Education history (degrees, institutions, years)
- Work experience (roles, companies, responsibilities)
- Skills and certifications
- Awards or personal achievements (optional)

The goal is to make this person a plausible candidate for their target job. Make sure the biography is coherent and reflects both the person's background and aspirations.

Prompt:
{{input_prompt}}

Biography:";

pub const RESUME_TEMPLATE: &str = "
You are given a full biography of a person. Write a clean, modern, and professional one-page HTML resume (with embedded CSS) based on it.

The resume should:
- Be responsive and styled appropriately with inline or embedded CSS
- Contain sections like Name, Contact, Summary, Education, Work Experience, Skills
- Be readable and nicely formatted
- Contain no JavaScript

Biography:
{{biography}}

Resume HTML:";

pub const VALIDATE_TEMPLATE: &str = "
You are a strict HTML and CSS code reviewer. You will be given the HTML and CSS content of a resume.

Your task is to:
- Check for syntax errors (unclosed tags, wrong nesting, invalid attributes)
- Check if the structure includes expected resume sections
- Validate that CSS rules are applied correctly

Respond with one of the following:
- \"VALID\" if everything is fine
- \"INVALID: <reason>\" with a short explanation of what is wrong

Resume Code:
{{resume_code}}
";

pub const REFINE_TEMPLATE: &str = "
Refine the following resume code to fix any errors and ensure it matches the biography.
Fix technical problems in the HTML and CSS, and change any content that contradicts the biography.
Keep it a one-page HTML document with embedded CSS and no JavaScript.

Biography:
{{biography}}

Resume Code:
{{resume_code}}

Refined Resume HTML:";

const BIOGRAPHY: &str = "biography";
const RESUME: &str = "resume";
const VALIDATE: &str = "validate";
const REFINE: &str = "refine";

/// The pipeline's templates, registered once and rendered by name
pub struct Prompts {
    renderer: PromptRenderer,
}

impl Prompts {
    pub fn new() -> Result<Self> {
        let mut renderer = PromptRenderer::new();
        renderer.register_template(BIOGRAPHY, BIOGRAPHY_TEMPLATE)?;
        renderer.register_template(RESUME, RESUME_TEMPLATE)?;
        renderer.register_template(VALIDATE, VALIDATE_TEMPLATE)?;
        renderer.register_template(REFINE, REFINE_TEMPLATE)?;
        Ok(Self { renderer })
    }

    pub fn system(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn biography(&self, input_prompt: &str) -> Result<String> {
        self.renderer
            .render_named(BIOGRAPHY, &HashMap::from([("input_prompt", input_prompt)]))
    }

    pub fn resume(&self, biography: &str) -> Result<String> {
        self.renderer.render_named(RESUME, &HashMap::from([("biography", biography)]))
    }

    pub fn validate(&self, resume_code: &str) -> Result<String> {
        self.renderer
            .render_named(VALIDATE, &HashMap::from([("resume_code", resume_code)]))
    }

    pub fn refine(&self, resume_code: &str, biography: &str) -> Result<String> {
        self.renderer.render_named(
            REFINE,
            &HashMap::from([("resume_code", resume_code), ("biography", biography)]),
        )
    }
}
