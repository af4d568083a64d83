//! Reviewer verdicts.
//!
//! The validation prompt asks the model to answer `VALID` or
//! `INVALID: <reason>`. How that free-form reply turns into a [`Verdict`] is
//! controlled by [`VerdictMode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid { reason: String },
}

impl Verdict {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Verdict::Invalid { reason: reason.into() }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// The reviewer's reason, if the document was rejected
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid { reason } => Some(reason),
        }
    }

    /// Parse a reviewer reply with the given mode
    pub fn parse(reply: &str, mode: VerdictMode) -> Self {
        match mode {
            VerdictMode::Legacy => parse_legacy(reply),
            VerdictMode::Strict => parse_strict(reply),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => write!(f, "VALID"),
            Verdict::Invalid { reason } => write!(f, "INVALID: {}", reason),
        }
    }
}

/// How reviewer replies are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictMode {
    /// Valid iff the uppercased reply contains `VALID` anywhere.
    ///
    /// `VALID` is a substring of `INVALID`, so `"INVALID: ..."` replies are
    /// classified as valid in this mode. Kept for parity with older runs.
    Legacy,
    /// Valid iff the reply starts with `VALID`; `INVALID: <reason>` is rejected.
    #[default]
    Strict,
}

impl FromStr for VerdictMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(VerdictMode::Legacy),
            "strict" => Ok(VerdictMode::Strict),
            other => Err(format!("unknown verdict mode '{}' (expected strict or legacy)", other)),
        }
    }
}

impl fmt::Display for VerdictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictMode::Legacy => write!(f, "legacy"),
            VerdictMode::Strict => write!(f, "strict"),
        }
    }
}

fn parse_legacy(reply: &str) -> Verdict {
    if reply.to_uppercase().contains("VALID") {
        Verdict::Valid
    } else {
        Verdict::invalid(reply.trim())
    }
}

/// Characters models like to wrap a one-word answer in.
const WRAPPERS: &[char] = &['"', '\'', '`', '*', '_'];

fn parse_strict(reply: &str) -> Verdict {
    let cleaned = reply.trim().trim_matches(|c: char| WRAPPERS.contains(&c) || c.is_whitespace());

    if let Some(rest) = strip_token(cleaned, "INVALID") {
        let reason = rest
            .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
            .trim_end_matches(|c: char| WRAPPERS.contains(&c) || c.is_whitespace());
        return if reason.is_empty() {
            Verdict::invalid("no reason given")
        } else {
            Verdict::invalid(reason)
        };
    }

    if strip_token(cleaned, "VALID").is_some() {
        return Verdict::Valid;
    }

    Verdict::invalid(format!("unrecognized verdict: {}", truncate(cleaned, 120)))
}

/// If `text` starts with `token` (ASCII case-insensitive) as a whole word,
/// return what follows it.
fn strip_token<'a>(text: &'a str, token: &str) -> Option<&'a str> {
    let head = text.get(..token.len())?;
    if !head.eq_ignore_ascii_case(token) {
        return None;
    }
    let rest = &text[token.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(rest),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
