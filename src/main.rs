use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use cli::progress::print_event;
use resumegen::config::Config;
use resumegen::generator::ResumeGenerator;
use resumegen::llm::{self, LlmClient, LlmError};
use resumegen::transcript::Transcript;
use resumegen::validation::{Verdict, VerdictMode};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resumegen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("resumegen.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let from_env = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_default_env();
    if !from_env {
        // The max level is narrowed again once the config is loaded
        builder.filter_level(LevelFilter::Trace);
    }
    builder.target(env_logger::Target::Pipe(target)).init();
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Apply the configured `log_level`; `RUST_LOG` takes precedence
fn apply_log_level(level: Option<&str>) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let Some(level) = level else {
        return;
    };
    match level.parse::<LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => warn!("Unknown log_level '{}', keeping info", level),
    }
}

/// The key is only read here and handed to the client constructor
fn read_api_key(config: &Config) -> Result<String> {
    let env_var = config.llm.api_key_env();
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(LlmError::MissingApiKey {
            env_var: env_var.to_string(),
        })
        .context("Cannot call the LLM"),
    }
}

fn build_client(config: &Config) -> Result<Arc<dyn LlmClient>> {
    let api_key = read_api_key(config)?;
    let client = llm::build_client(config, api_key).context("Failed to build LLM client")?;
    info!("Using {:?} client with model {}", config.llm.provider, client.model());
    Ok(client)
}

async fn handle_generate_command(query: &str, config: &Config, verbose: bool) -> Result<()> {
    info!("Generating resume for: {}", query);
    let client = build_client(config)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event, verbose);
        }
    });

    let mut generator = ResumeGenerator::new(client.clone(), config.generation.clone())?.with_events(tx);
    if config.debug.transcript_enabled() {
        let transcript = Transcript::create(
            &config.debug.transcript_dir,
            config.debug.save_prompts,
            config.debug.save_responses,
        )?;
        if verbose {
            println!("{} {}", "Transcript:".cyan(), transcript.path().display());
        }
        generator = generator.with_transcript(transcript);
    }

    println!("{} {}", "Generating resume:".green(), query);
    let result = generator.run(query).await;

    // Closing the sender lets the printer drain and exit
    drop(generator);
    printer.await.context("Progress printer failed")?;

    let report = result.context("Resume generation failed")?;
    let usage = client.total_usage();
    info!(
        "Run finished: {:?} (accepted: {}), {} validation(s), {} refinement(s), {} input / {} output tokens",
        report.outcome,
        report.outcome.is_valid(),
        report.validations(),
        report.refinements,
        usage.input_tokens,
        usage.output_tokens
    );

    if verbose {
        println!(
            "{} {} ({} in / {} out)",
            "Tokens used:".cyan(),
            usage.total(),
            usage.input_tokens,
            usage.output_tokens
        );
    }

    Ok(())
}

/// Returns whether the document passed review
async fn handle_validate_command(file: &Path, config: &Config) -> Result<bool> {
    info!("Validating {}", file.display());
    let document = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;

    let client = build_client(config)?;
    let generator = ResumeGenerator::new(client, config.generation.clone())?;
    let verdict = generator.validate_resume(&document).await.context("Validation failed")?;

    match &verdict {
        Verdict::Valid => println!("{} {}", "VALID".green(), file.display()),
        Verdict::Invalid { reason } => println!("{} {}", "INVALID:".red(), reason),
    }

    Ok(verdict.is_valid())
}

fn apply_overrides(
    config: &mut Config,
    max_refinements: Option<u32>,
    output: Option<&PathBuf>,
    model: Option<&str>,
    verdict: Option<VerdictMode>,
) -> Result<()> {
    if let Some(n) = max_refinements {
        config.generation.max_refinements = n;
    }
    if let Some(path) = output {
        config.generation.output_path = path.clone();
    }
    if let Some(model) = model {
        config.llm.model = Some(model.to_string());
    }
    if let Some(mode) = verdict {
        config.generation.verdict_mode = mode;
    }
    config.validate().context("Invalid command-line overrides")
}

async fn run_application(cli: &Cli, mut config: Config) -> Result<bool> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Generate {
            query,
            max_refinements,
            output,
            model,
            verdict,
        } => {
            apply_overrides(&mut config, *max_refinements, output.as_ref(), model.as_deref(), *verdict)?;
            handle_generate_command(query, &config, cli.is_verbose()).await?;
            Ok(true)
        }
        Commands::Validate { file, verdict } => {
            apply_overrides(&mut config, None, None, None, *verdict)?;
            handle_validate_command(file, &config).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first so config loading can report problems
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let loaded = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    for (path, reason) in &loaded.skipped {
        eprintln!("{} {}: {}", "Ignoring config".yellow(), path.display(), reason);
    }
    apply_log_level(loaded.config.log_level.as_deref());

    match &loaded.source {
        Some(path) => info!("Starting with config from: {}", path.display()),
        None => info!("Starting with default config"),
    }
    let config = loaded.config;

    // Run the main application logic
    let ok = run_application(&cli, config).await.context("Application failed")?;
    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
