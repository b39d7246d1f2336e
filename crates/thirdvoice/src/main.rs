// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Third Voice - a relationship communication coach.
//!
//! This is the binary entry point for the `thirdvoice` CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod check;
mod coaching;
mod contacts;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thirdvoice_config::ThirdVoiceConfig;
use thirdvoice_core::{MessageType, RelationshipContext, ThirdVoiceError};

/// Third Voice - say what you mean, kindly.
#[derive(Parser, Debug)]
#[command(name = "thirdvoice", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Act as this user (overrides `app.user_id`).
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List candidate models in fallback order.
    Models,
    /// Manage contacts.
    #[command(subcommand)]
    Contact(ContactCommand),
    /// Reframe a message for a contact.
    Coach {
        contact: String,
        message: String,
        /// Force coaching or translation instead of detecting it from the text.
        #[arg(long, value_enum)]
        mode: Option<Mode>,
    },
    /// Explain the emotional subtext of a message a contact sent.
    Interpret { contact: String, message: String },
    /// Show relationship health from recent scores.
    Health { contact: String },
    /// Show score trend, recurring themes, and progress insights.
    Insights { contact: String },
    /// Show past interpretations of a contact's messages.
    Interpretations { contact: String },
    /// Show the message history with a contact.
    History {
        contact: String,
        /// Only show the most recent N messages.
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Rate Third Voice from 1 to 5.
    Feedback {
        rating: u8,
        text: Option<String>,
        /// Feature the feedback is about.
        #[arg(long)]
        feature: Option<String>,
    },
    /// Run diagnostic checks against the local setup.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ContactCommand {
    /// Add a contact.
    Add {
        name: String,
        /// Relationship context: romantic, coparenting, workplace, family, friend.
        #[arg(long, default_value = "friend")]
        context: RelationshipContext,
    },
    /// List contacts.
    List,
    /// Rename a contact, optionally changing its context.
    Rename {
        name: String,
        new_name: String,
        #[arg(long)]
        context: Option<RelationshipContext>,
    },
    /// Delete a contact and its history.
    Remove { name: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Coach,
    Translate,
}

impl From<Mode> for MessageType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Coach => MessageType::Coach,
            Mode::Translate => MessageType::Translate,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => thirdvoice_config::load_and_validate_path(path),
        None => thirdvoice_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            thirdvoice_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    if let Some(user) = cli.user {
        config.app.user_id = Some(user);
    }

    init_tracing(&config.app.log_level);

    let Some(command) = cli.command else {
        println!("thirdvoice: use --help for available commands");
        return;
    };

    if let Err(e) = run(command, config).await {
        report_error(&e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: ThirdVoiceConfig) -> Result<(), ThirdVoiceError> {
    match command {
        Commands::Models => {
            coaching::run_models(&config);
            Ok(())
        }
        Commands::Check { plain } => check::run_check(&config, plain).await,
        Commands::Contact(cmd) => {
            let app = app::App::open(&config, false).await?;
            let result = contacts::run_contact(&app, cmd).await;
            app.close().await;
            result
        }
        Commands::Coach {
            contact,
            message,
            mode,
        } => {
            let app = app::App::open(&config, true).await?;
            let result =
                coaching::run_coach(&app, &contact, &message, mode.map(MessageType::from)).await;
            app.close().await;
            result
        }
        Commands::Interpret { contact, message } => {
            let app = app::App::open(&config, true).await?;
            let result = coaching::run_interpret(&app, &contact, &message).await;
            app.close().await;
            result
        }
        Commands::Health { contact } => {
            let app = app::App::open(&config, false).await?;
            let result = coaching::run_health(&app, &contact).await;
            app.close().await;
            result
        }
        Commands::Insights { contact } => {
            let app = app::App::open(&config, false).await?;
            let result = coaching::run_insights(&app, &contact).await;
            app.close().await;
            result
        }
        Commands::Interpretations { contact } => {
            let app = app::App::open(&config, false).await?;
            let result = coaching::run_interpretations(&app, &contact).await;
            app.close().await;
            result
        }
        Commands::History { contact, limit } => {
            let app = app::App::open(&config, false).await?;
            let result = coaching::run_history(&app, &contact, limit).await;
            app.close().await;
            result
        }
        Commands::Feedback {
            rating,
            text,
            feature,
        } => {
            let app = app::App::open(&config, false).await?;
            let result =
                coaching::run_feedback(&app, rating, text.as_deref(), feature.as_deref()).await;
            app.close().await;
            result
        }
    }
}

fn report_error(error: &ThirdVoiceError) {
    eprintln!("thirdvoice: {error}");
    match error {
        ThirdVoiceError::Unauthenticated => {
            eprintln!("  set app.user_id in thirdvoice.toml or pass --user <id>");
        }
        ThirdVoiceError::MalformedOutput { raw, .. } => {
            eprintln!("  the model replied with:\n{raw}");
        }
        _ => {}
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `app.log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("thirdvoice={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_coach_with_mode() {
        let cli = Cli::try_parse_from([
            "thirdvoice",
            "coach",
            "Sam",
            "you never listen",
            "--mode",
            "translate",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Coach { contact, mode, .. }) => {
                assert_eq!(contact, "Sam");
                assert!(matches!(mode, Some(Mode::Translate)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn contact_context_parses_case_insensitively() {
        let cli = Cli::try_parse_from([
            "thirdvoice",
            "--user",
            "alice",
            "contact",
            "add",
            "Mom",
            "--context",
            "Family",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Some(Commands::Contact(ContactCommand::Add { context, .. })) => {
                assert_eq!(context, RelationshipContext::Family);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_relationship_memory_commands() {
        let cli = Cli::try_parse_from(["thirdvoice", "insights", "Mom"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Insights { ref contact }) if contact == "Mom"));

        let cli = Cli::try_parse_from(["thirdvoice", "interpretations", "Mom"]).unwrap();
        assert!(
            matches!(cli.command, Some(Commands::Interpretations { ref contact }) if contact == "Mom")
        );
    }

    #[test]
    fn unknown_context_is_rejected() {
        let parsed = Cli::try_parse_from(["thirdvoice", "contact", "add", "Mom", "--context", "boss"]);
        assert!(parsed.is_err());
    }
}
