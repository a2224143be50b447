use crate::models::JokeReport;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format options
#[derive(Debug, Clone, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Print a tell-a-joke report in the specified format
pub fn print_report(report: &JokeReport, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report),
    }
}

/// Print the report in plain text format
fn print_plain(report: &JokeReport) {
    println!("🎤 JOKE");
    println!("-------");
    println!("{}", report.joke);
    println!();

    println!("📊 RATING");
    println!("---------");
    for (criterion, score) in &report.rating.scores {
        println!("  • {}: {}/10", criterion, score);
    }
    println!("Final score: {}/10", report.rating.final_score);

    if report.attempts > 1 {
        println!();
        println!("(accepted after {} attempts)", report.attempts);
    }
}

/// Print the report in JSON format
fn print_json(report: &JokeReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report to JSON: {}", e),
    }
}
