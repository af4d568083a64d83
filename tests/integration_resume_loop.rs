//! Resume loop integration tests
//!
//! Drives the full generate / validate / refine flow with a scripted LLM.

use std::fs;
use std::sync::Arc;

use resumegen::config::GenerationConfig;
use resumegen::error::{ResumeError, Result};
use resumegen::generator::{ResumeGenerator, RunOutcome, RunState};
use resumegen::llm::{LlmClient, MockLlmClient, MockReply};
use resumegen::validation::{Verdict, VerdictMode};
use tempfile::TempDir;

const BIO: &str = "Jane Doe, 29, backend engineer from Lisbon. Rust, Postgres, Kafka.";
const DOC_V1: &str = "<html><head><style>body{font-family:serif}</style></head><body>Jane v1</body></html>";

fn config(dir: &TempDir, max_refinements: u32, verdict_mode: VerdictMode) -> GenerationConfig {
    GenerationConfig {
        max_refinements,
        output_path: dir.path().join("resume.html"),
        verdict_mode,
    }
}

fn refined(n: u32) -> String {
    format!("<html><head><style>body{{margin:0}}</style></head><body>Jane v{}</body></html>", n + 1)
}

/// Integration test: first verdict valid means no refinement and the first document is saved
#[tokio::test]
async fn test_valid_on_first_attempt() -> Result<()> {
    let dir = TempDir::new()?;
    let mock = Arc::new(MockLlmClient::new([BIO, DOC_V1, "VALID"]));
    let generator = ResumeGenerator::new(mock.clone(), config(&dir, 5, VerdictMode::Strict))?;

    let report = generator.run("Jane, aspiring backend engineer").await?;

    assert_eq!(report.outcome, RunOutcome::Saved { attempts: 1 });
    assert_eq!(report.refinements, 0);
    assert_eq!(report.document, DOC_V1);
    assert_eq!(fs::read_to_string(dir.path().join("resume.html"))?, DOC_V1);
    assert_eq!(mock.call_count(), 3);
    Ok(())
}

/// Integration test: a reviewer that never accepts spends the whole budget
#[tokio::test]
async fn test_exhaustion_saves_last_refinement() -> Result<()> {
    let dir = TempDir::new()?;
    let max = 3;

    let mut script: Vec<MockReply> = vec![BIO.into(), DOC_V1.into()];
    for n in 1..=max {
        script.push(format!("INVALID: problem {}", n).into());
        script.push(refined(n).into());
    }
    script.push("INVALID: still broken".into());

    let mock = Arc::new(MockLlmClient::new(script));
    let generator = ResumeGenerator::new(mock.clone(), config(&dir, max, VerdictMode::Strict))?;

    let report = generator.run("Jane").await?;

    assert_eq!(report.outcome, RunOutcome::Exhausted { refinements: max });
    assert_eq!(report.refinements, max);
    assert_eq!(report.validations(), max + 1);
    assert_eq!(report.document, refined(max));
    assert_eq!(fs::read_to_string(dir.path().join("resume.html"))?, refined(max));
    assert_eq!(mock.remaining(), 0);
    assert_eq!(report.trace.last(), Some(&RunState::Exhausted));
    Ok(())
}

/// Integration test: refinement count never exceeds the budget
#[tokio::test]
async fn test_refinements_bounded_by_budget() -> Result<()> {
    for max in 0..4u32 {
        let dir = TempDir::new()?;
        let mut script: Vec<MockReply> = vec![BIO.into(), DOC_V1.into()];
        for n in 0..=max {
            script.push("INVALID: nope".into());
            if n < max {
                script.push(refined(n + 1).into());
            }
        }

        let mock = Arc::new(MockLlmClient::new(script));
        let generator = ResumeGenerator::new(mock, config(&dir, max, VerdictMode::Strict))?;
        let report = generator.run("Jane").await?;

        assert!(report.refinements <= max);
        let refine_states = report.trace.iter().filter(|s| **s == RunState::Refine).count();
        assert_eq!(refine_states as u32, report.refinements);
    }
    Ok(())
}

/// Integration test: zero budget with an invalid first verdict saves immediately
#[tokio::test]
async fn test_zero_refinements_budget() -> Result<()> {
    let dir = TempDir::new()?;
    let mock = Arc::new(MockLlmClient::new([BIO, DOC_V1, "INVALID: missing contact section"]));
    let generator = ResumeGenerator::new(mock.clone(), config(&dir, 0, VerdictMode::Strict))?;

    let report = generator.run("Jane").await?;

    assert_eq!(report.outcome, RunOutcome::Exhausted { refinements: 0 });
    assert_eq!(report.refinements, 0);
    assert_eq!(report.verdicts, vec![Verdict::invalid("missing contact section")]);
    assert_eq!(fs::read_to_string(dir.path().join("resume.html"))?, DOC_V1);
    assert_eq!(mock.call_count(), 3);
    Ok(())
}

/// Integration test: legacy mode accepts INVALID replies, strict mode does not
#[tokio::test]
async fn test_legacy_and_strict_modes_differ() -> Result<()> {
    let dir = TempDir::new()?;
    let legacy = Arc::new(MockLlmClient::new([BIO, DOC_V1, "INVALID: missing contact section"]));
    let generator = ResumeGenerator::new(legacy, config(&dir, 5, VerdictMode::Legacy))?;
    let report = generator.run("Jane").await?;
    assert_eq!(report.outcome, RunOutcome::Saved { attempts: 1 });

    let dir = TempDir::new()?;
    let strict = Arc::new(MockLlmClient::new([
        BIO,
        DOC_V1,
        "INVALID: missing contact section",
        "<html><style></style>fixed</html>",
        "VALID",
    ]));
    let generator = ResumeGenerator::new(strict, config(&dir, 5, VerdictMode::Strict))?;
    let report = generator.run("Jane").await?;
    assert_eq!(report.outcome, RunOutcome::Saved { attempts: 2 });
    assert_eq!(report.refinements, 1);
    assert_eq!(report.verdicts[0].reason(), Some("missing contact section"));
    Ok(())
}

/// Integration test: an LLM failure mid-loop aborts without writing output
#[tokio::test]
async fn test_llm_error_during_refine_aborts() -> Result<()> {
    let dir = TempDir::new()?;
    let mock = Arc::new(MockLlmClient::new([
        MockReply::from(BIO),
        MockReply::from(DOC_V1),
        MockReply::from("INVALID: broken"),
        MockReply::Error {
            status: 500,
            message: "upstream unavailable".to_string(),
        },
    ]));
    let generator = ResumeGenerator::new(mock, config(&dir, 5, VerdictMode::Strict))?;

    let result = generator.run("Jane").await;

    assert!(matches!(result, Err(ResumeError::Llm(_))));
    assert!(!dir.path().join("resume.html").exists());
    Ok(())
}

/// Integration test: blank queries never reach the LLM
#[tokio::test]
async fn test_empty_query_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let mock = Arc::new(MockLlmClient::new([BIO]));
    let generator = ResumeGenerator::new(mock.clone(), config(&dir, 5, VerdictMode::Strict))?;

    assert!(matches!(generator.run("").await, Err(ResumeError::EmptyPrompt)));
    assert!(matches!(generator.run(" \t ").await, Err(ResumeError::EmptyPrompt)));
    assert_eq!(mock.call_count(), 0);
    assert!(!dir.path().join("resume.html").exists());
    Ok(())
}

/// Integration test: the Jane scenario end to end, checking what each prompt carried
#[tokio::test]
async fn test_jane_scenario() -> Result<()> {
    let dir = TempDir::new()?;
    let mock = Arc::new(MockLlmClient::new([BIO, DOC_V1, "VALID"]));
    let generator = ResumeGenerator::new(mock.clone(), config(&dir, 5, VerdictMode::Strict))?;

    let report = generator.run("Jane, aspiring backend engineer").await?;

    assert!(!report.biography.is_empty());
    assert!(report.document.contains("<html"));
    assert!(report.document.contains("<style"));
    assert!(report.outcome.is_valid());

    let requests = mock.requests();
    let user = |i: usize| requests[i].messages[1].content.clone();
    assert!(user(0).contains("Jane, aspiring backend engineer"));
    assert!(user(1).contains(BIO));
    assert!(user(2).contains(DOC_V1));
    assert!(requests.iter().all(|r| !r.system_prompt().is_empty()));
    assert_eq!(mock.model(), "mock-model");
    Ok(())
}
