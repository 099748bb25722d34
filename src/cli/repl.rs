//! Interactive question loop
//!
//! Every command reports its own failures; only a broken input stream ends
//! the session early.

use crate::analysis::AnalysisConfig;
use crate::api::InteractionManager;
use crate::error::{Error, Result};
use crate::utils;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit,
}

pub async fn show_interactions(manager: &InteractionManager) -> Result<()> {
    let records = manager.interactions().await?;
    utils::print_interactions(&records);
    Ok(())
}

/// Print discovered patterns; an empty or degenerate log is reported, not failed
pub async fn show_patterns(manager: &InteractionManager, config: AnalysisConfig) -> Result<()> {
    match manager.discover_patterns_with(config).await {
        Ok(topics) => utils::print_patterns(&topics),
        Err(Error::InsufficientData) => utils::print_error("No interactions found for analysis."),
        Err(e) if e.is_insufficient() => utils::print_error(&e.to_string()),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  view      - List logged interactions");
    println!("  patterns  - Discover topic patterns");
    println!("  exit      - Quit");
    println!("  anything else is sent as a question\n");
}

/// Handle one line of input
pub async fn handle_line(manager: &InteractionManager, line: &str) -> LineOutcome {
    let input = line.trim();
    if input.is_empty() {
        return LineOutcome::Continue;
    }

    let result = match input.to_lowercase().as_str() {
        "exit" => {
            utils::print_success("See you soon.");
            return LineOutcome::Exit;
        }
        "help" => {
            print_help();
            Ok(())
        }
        "view" => show_interactions(manager).await,
        "patterns" => show_patterns(manager, manager.analysis_config().clone()).await,
        _ => manager
            .ask(input)
            .await
            .map(|exchange| utils::print_answer(&exchange.answer)),
    };

    if let Err(e) = result {
        tracing::debug!("Interactive command failed: {}", e);
        utils::print_error(&format!("Error: {}", e));
    }
    LineOutcome::Continue
}

/// Read lines until `exit` or end of input
pub async fn run<R>(manager: &InteractionManager, mut reader: R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        utils::print_prompt("Enter your question: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        if handle_line(manager, &line).await == LineOutcome::Exit {
            return Ok(());
        }
    }
}
