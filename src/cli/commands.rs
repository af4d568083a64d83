//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - generate: run the full biography, resume, validate, refine pipeline
//! - validate: review an existing resume file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use resumegen::validation::VerdictMode;

/// Resumegen - fictional resume generator with LLM validation
#[derive(Parser, Debug)]
#[command(name = "resumegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a resume from a character description
    Generate {
        /// Partial description of the person, e.g. "Jane, aspiring backend engineer"
        query: String,

        /// Maximum number of refinement rounds
        #[arg(short, long)]
        max_refinements: Option<u32>,

        /// Where to write the HTML document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model identifier to request
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// How reviewer replies are classified (strict, legacy)
        #[arg(long)]
        verdict: Option<VerdictMode>,
    },

    /// Validate an existing resume file and print the verdict
    Validate {
        /// HTML document to review
        file: PathBuf,

        /// How reviewer replies are classified (strict, legacy)
        #[arg(long)]
        verdict: Option<VerdictMode>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["resumegen"]).is_err());
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["resumegen", "generate", "Jane, aspiring backend engineer"]).unwrap();
        match cli.command {
            Commands::Generate {
                query,
                max_refinements,
                output,
                model,
                verdict,
            } => {
                assert_eq!(query, "Jane, aspiring backend engineer");
                assert!(max_refinements.is_none());
                assert!(output.is_none());
                assert!(model.is_none());
                assert!(verdict.is_none());
            }
            _ => panic!("Expected generate command"),
        }
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_generate_overrides() {
        let cli = Cli::try_parse_from([
            "resumegen",
            "generate",
            "Bob",
            "--max-refinements",
            "2",
            "-o",
            "out.html",
            "--model",
            "gpt-4o-mini",
            "--verdict",
            "legacy",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                max_refinements,
                output,
                model,
                verdict,
                ..
            } => {
                assert_eq!(max_refinements, Some(2));
                assert_eq!(output, Some(PathBuf::from("out.html")));
                assert_eq!(model.as_deref(), Some("gpt-4o-mini"));
                assert_eq!(verdict, Some(VerdictMode::Legacy));
            }
            _ => panic!("Expected generate command"),
        }
    }

    #[test]
    fn test_generate_rejects_unknown_verdict_mode() {
        let result = Cli::try_parse_from(["resumegen", "generate", "Bob", "--verdict", "fuzzy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::try_parse_from(["resumegen", "validate", "resume.html"]).unwrap();
        match cli.command {
            Commands::Validate { file, verdict } => {
                assert_eq!(file, PathBuf::from("resume.html"));
                assert!(verdict.is_none());
            }
            _ => panic!("Expected validate command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["resumegen", "validate", "r.html", "-v", "-c", "/tmp/cfg.yml"]).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cfg.yml")));
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }
}
