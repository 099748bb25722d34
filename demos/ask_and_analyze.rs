//! Log a few exchanges and mine them for topics
//!
//! Runs against an in-memory log. With OPENAI_API_KEY set one extra
//! question is sent to the completion service.

use interlog::{utils, AnalysisConfig, InteractionManager, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    let api_key = Settings::api_key().ok();
    let has_key = api_key.is_some();
    let manager = InteractionManager::ephemeral(&settings, api_key).await?;

    println!("=== Recording Exchanges ===\n");

    let exchanges = [
        ("What is ownership in Rust?", "Each value has a single owner that drops it."),
        ("How does borrowing work in Rust?", "References borrow a value without taking ownership."),
        ("What is a lifetime in Rust?", "A lifetime bounds how long a reference stays valid."),
        ("How do I bake sourdough bread?", "Feed the starter, mix the dough, proof overnight, bake hot."),
        ("Why does bread dough need to rest?", "Resting lets gluten relax and the yeast rise the dough."),
        ("What flour makes the best bread?", "High protein bread flour gives a chewy crumb."),
    ];

    for (question, answer) in exchanges {
        let id = manager.record(question, answer).await?;
        println!("#{} {}", id, question);
    }

    if has_key {
        println!("\n=== Asking The Service ===\n");
        match manager.ask("What is a trait object in Rust?").await {
            Ok(exchange) => utils::print_answer(&exchange.answer),
            Err(e) => utils::print_error(&format!("Error: {}", e)),
        }
    }

    // Configured defaults
    let topics = manager.discover_patterns().await?;
    utils::print_patterns(&topics);

    // Two topics should split the Rust questions from the baking ones
    let config = AnalysisConfig {
        num_topics: 2,
        top_words_per_topic: 5,
        stop_words: vec!["what".into(), "how".into(), "is".into(), "the".into(), "a".into()],
        ..Default::default()
    };
    let topics = manager.discover_patterns_with(config).await?;
    utils::print_patterns(&topics);

    Ok(())
}
