use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "interlog")]
#[command(author, version, about = "Log questions and answers, then mine them for recurring topics", long_about = None)]
pub struct Cli {
    /// Path to the interaction database (overrides storage.database_path)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Keep the log in memory for this run only
    #[arg(long, global = true, conflicts_with = "db")]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and log the exchange
    Ask { question: String },

    /// Start an interactive question loop
    Interactive,

    /// List every logged interaction
    View,

    /// Discover topic patterns across the log
    Patterns {
        /// Number of topics to extract
        #[arg(short, long)]
        topics: Option<usize>,

        /// Number of terms reported per topic
        #[arg(short = 'w', long)]
        top_words: Option<usize>,

        /// Seed for the model initialization
        #[arg(short, long)]
        seed: Option<u64>,
    },
}
