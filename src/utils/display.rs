use crate::analysis::TopicResult;
use crate::storage::InteractionRecord;
use colored::*;

const RULE_WIDTH: usize = 40;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_magenta().bold());
    print_rule();
}

pub fn print_rule() {
    println!("{}", "-".repeat(RULE_WIDTH).blue());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.cyan().bold());
}

pub fn print_banner() {
    let banner = r#"
  _       _             _
 (_)_ __ | |_ ___ _ __ | | ___   __ _
 | | '_ \| __/ _ \ '__|| |/ _ \ / _` |
 | | | | | ||  __/ |   | | (_) | (_| |
 |_|_| |_|\__\___|_|   |_|\___/ \__, |
                                |___/
"#;
    println!("{}", banner.cyan());
    println!(
        "{}",
        format!("interlog v{}", env!("CARGO_PKG_VERSION")).cyan().bold()
    );
    println!(
        "{}\n",
        "Ask anything. Type 'view' for the log, 'patterns' for topics, 'exit' to quit.".cyan()
    );
}

pub fn print_answer(answer: &str) {
    println!("{}", "\nAnswer:".green());
    println!("{}", answer.magenta());
    print_rule();
}

pub fn print_interactions(records: &[InteractionRecord]) {
    if records.is_empty() {
        print_error("No interactions found.");
        return;
    }

    print_header("Question-Answer Interactions:");
    for record in records {
        println!("ID: {}", record.id);
        println!("Question: {}", record.question);
        println!("Answer: {}", record.answer);
        println!("Timestamp: {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
        print_rule();
    }
}

pub fn print_patterns(topics: &[TopicResult]) {
    print_header("Discovered Patterns:");
    for topic in topics {
        println!("Pattern {}: {}", topic.topic_index + 1, topic.top_terms.join(", "));
    }
    print_rule();
}
