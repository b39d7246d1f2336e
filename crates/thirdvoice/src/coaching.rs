// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coaching, interpretation, and reporting subcommands.

use thirdvoice_config::ThirdVoiceConfig;
use thirdvoice_core::{MessageType, ThirdVoiceError};
use thirdvoice_resilience::ModelRegistry;
use thirdvoice_scoring::HealthTier;

use crate::app::App;

pub fn run_models(config: &ThirdVoiceConfig) {
    let registry = ModelRegistry::from_config(&config.models);
    for (i, model) in registry.list_models().iter().enumerate() {
        println!("  {}. {model}", i + 1);
    }
}

pub async fn run_coach(
    app: &App,
    contact: &str,
    message: &str,
    mode: Option<MessageType>,
) -> Result<(), ThirdVoiceError> {
    let mut session = app.coach.start_session().await?;
    let result = app
        .coach
        .process_message(&mut session, contact, message, mode)
        .await?;

    let heading = match result.message_type {
        MessageType::Translate => "Suggested reply",
        _ => "Try saying",
    };
    println!("{heading}:\n\n  {}\n", result.response_text);
    if let Some(explanation) = &result.explanation {
        println!("Why: {explanation}\n");
    }
    println!(
        "Healing score {}/10 | {} | {} | {}{}",
        result.healing_score,
        result.sentiment,
        result.emotional_state,
        result.model_used,
        if result.from_cache { " (cached)" } else { "" }
    );
    Ok(())
}

pub async fn run_interpret(app: &App, contact: &str, message: &str) -> Result<(), ThirdVoiceError> {
    let mut session = app.coach.start_session().await?;
    let result = app
        .coach
        .interpret_message(&mut session, contact, message)
        .await?;
    println!("{}\n", result.interpretation);
    println!(
        "Insight score {}/10 | {}",
        result.interpretation_score, result.model_used
    );
    Ok(())
}

pub async fn run_health(app: &App, contact: &str) -> Result<(), ThirdVoiceError> {
    let health = app.coach.relationship_health(contact).await?;
    match health.status {
        HealthTier::NoData | HealthTier::Unscored => {
            println!("{contact}: {}", health.status);
        }
        _ => {
            println!(
                "{contact}: {} ({:.1}/10 over {} messages)",
                health.status, health.average, health.sample_size
            );
        }
    }
    println!("  {}", health.status.summary());
    Ok(())
}

pub async fn run_insights(app: &App, contact: &str) -> Result<(), ThirdVoiceError> {
    let report = app.coach.insights(contact).await?;
    println!(
        "{}: {} conversations, {}",
        report.contact_name, report.conversations, report.pattern
    );
    if !report.themes.is_empty() {
        let themes: Vec<String> = report.themes.iter().map(ToString::to_string).collect();
        println!("Recurring themes: {}", themes.join(", "));
    }
    for insight in &report.insights {
        println!("  - {insight}");
    }
    Ok(())
}

pub async fn run_interpretations(app: &App, contact: &str) -> Result<(), ThirdVoiceError> {
    let interpretations = app.coach.interpretations(contact).await?;
    if interpretations.is_empty() {
        println!("No interpretations for {contact} yet.");
    }
    for entry in interpretations {
        println!(
            "[{}] \"{}\" ({}/10, {})\n{}\n",
            entry.created_at,
            entry.original_message,
            entry.interpretation_score,
            entry.model_used,
            entry.interpretation
        );
    }
    Ok(())
}

pub async fn run_history(app: &App, contact: &str, limit: Option<i64>) -> Result<(), ThirdVoiceError> {
    let messages = app.coach.history(contact, limit).await?;
    if messages.is_empty() {
        println!("No messages with {contact} yet.");
    }
    for message in messages {
        match message.message_type {
            MessageType::Incoming => {
                println!("[{}] you: {}", message.created_at, message.original_text);
            }
            kind => {
                println!(
                    "[{}] {kind} ({}/10): {}",
                    message.created_at,
                    message.healing_score,
                    message.result_text.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}

pub async fn run_feedback(
    app: &App,
    rating: u8,
    text: Option<&str>,
    feature: Option<&str>,
) -> Result<(), ThirdVoiceError> {
    let feedback = app.coach.submit_feedback(rating, text, feature).await?;
    println!(
        "Thanks! Recorded {}/5 for {}.",
        feedback.rating, feedback.feature_context
    );
    Ok(())
}
