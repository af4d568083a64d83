//! Progress lines printed while a run is in flight.

use colored::*;

use resumegen::generator::{RunEvent, RunOutcome};

/// The line to print for `event`, if any.
///
/// Refinement, exhaustion and a successful save always print; the rest only
/// with `--verbose`.
pub fn event_line(event: &RunEvent, verbose: bool) -> Option<String> {
    match event {
        RunEvent::Refining { refinement } => Some(format!(
            "validation failed, refining resume (attempt {})...",
            refinement
        )),
        RunEvent::Exhausted { .. } => Some("max refinements reached. Resume may not be valid.".to_string()),
        RunEvent::Saved {
            outcome: RunOutcome::Saved { attempts },
            ..
        } => Some(format!("Resume saved after {} attempt(s).", attempts)),
        RunEvent::Saved { .. } => None,
        _ if !verbose => None,
        RunEvent::BiographyCompleted { chars } => Some(format!("Biography completed ({} chars)", chars)),
        RunEvent::ResumeGenerated { chars } => Some(format!("Resume generated ({} chars)", chars)),
        RunEvent::ValidationPassed { attempt } => Some(format!("validation passed (attempt {})", attempt)),
        RunEvent::ValidationFailed { attempt, reason } => Some(format!("attempt {}: {}", attempt, reason)),
    }
}

/// Print the progress line for `event`, then the output path once saved
pub fn print_event(event: &RunEvent, verbose: bool) {
    if let Some(line) = event_line(event, verbose) {
        let line = match event {
            RunEvent::Refining { .. } => line.yellow(),
            RunEvent::Exhausted { .. } => line.red(),
            RunEvent::Saved { .. } | RunEvent::ValidationPassed { .. } => line.green(),
            _ => line.dimmed(),
        };
        println!("{}", line);
    }

    if let RunEvent::Saved { path, .. } = event {
        println!("{} {}", "Output:".cyan(), path.display());
    }
}
