//! JSONL transcript of LLM exchanges, for debugging runs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pipeline step an exchange belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Biography,
    Generate,
    Validate,
    Refine,
}

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Appends exchanges to `<dir>/transcript-<timestamp>.jsonl`
#[derive(Debug)]
pub struct Transcript {
    path: PathBuf,
    save_prompts: bool,
    save_responses: bool,
}

impl Transcript {
    /// Create the directory and pick a file name for this run
    pub fn create(dir: impl AsRef<Path>, save_prompts: bool, save_responses: bool) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let path = dir.join(format!("transcript-{}.jsonl", stamp));
        log::info!("Writing transcript to {}", path.display());

        Ok(Self {
            path,
            save_prompts,
            save_responses,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one exchange, keeping only the parts this transcript saves
    pub fn record(&self, stage: Stage, prompt: &str, response: &str) -> Result<()> {
        let entry = TranscriptEntry {
            timestamp: Utc::now(),
            stage,
            prompt: self.save_prompts.then(|| prompt.to_string()),
            response: self.save_responses.then(|| response.to_string()),
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(&entry)?)?;
        Ok(())
    }

    /// Read every entry back, skipping blank lines
    #[cfg(test)]
    pub(crate) fn read(path: impl AsRef<Path>) -> Result<Vec<TranscriptEntry>> {
        let content = fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                entries.push(serde_json::from_str(line)?);
            }
        }
        Ok(entries)
    }
}
