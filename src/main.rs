use anyhow::Result;
use clap::Parser;
use interlog::cli::{repl, Cli, Commands};
use interlog::{utils, InteractionManager, Settings};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = Settings::new()?;
    if let Some(db) = cli.db {
        settings.storage.database_path = db;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api_key = Settings::api_key().ok();
    let manager = if cli.ephemeral {
        InteractionManager::ephemeral(&settings, api_key).await?
    } else {
        InteractionManager::from_settings(&settings, api_key).await?
    };

    match cli.command {
        Commands::Ask { question } => handle_ask(&manager, &question).await?,
        Commands::Interactive => {
            utils::print_banner();
            repl::run(&manager, BufReader::new(tokio::io::stdin())).await?;
        }
        Commands::View => repl::show_interactions(&manager).await?,
        Commands::Patterns {
            topics,
            top_words,
            seed,
        } => {
            let mut config = manager.analysis_config().clone();
            if let Some(n) = topics {
                config.num_topics = n;
            }
            if let Some(n) = top_words {
                config.top_words_per_topic = n;
            }
            if let Some(s) = seed {
                config.random_seed = s;
            }
            repl::show_patterns(&manager, config).await?;
        }
    }

    Ok(())
}

async fn handle_ask(manager: &InteractionManager, question: &str) -> Result<()> {
    utils::print_info("Sending request...");
    let exchange = manager.ask(question).await?;
    utils::print_answer(&exchange.answer);
    Ok(())
}
