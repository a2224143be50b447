use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod classifier;
mod client;
mod config;
mod error;
mod generator;
mod models;
mod output;
mod rating;
mod safety;
mod show;
#[cfg(test)]
mod testing;

use crate::classifier::JokeDetector;
use crate::client::{CompletionBackend, OpenAiBackend};
use crate::config::Config;
use crate::generator::JokeGenerator;
use crate::models::JokeReport;
use crate::output::OutputFormat;
use crate::rating::RubricRater;
use crate::safety::SafetyFilter;
use crate::show::StandUpShow;

/// Joke bot demos - generate, safety-screen and rate jokes with an LLM
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,

    /// Verbose output - show each request as it happens
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tell a safety-screened joke and rate it against the rubric
    Tell {
        /// Joke topic; picked at random from the configured list if omitted
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Run the interactive stand-up show, then score the main joke with the
    /// joke detector
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::load(args.config.as_deref())?;
    let api_key = config.generation.resolve_api_key()?;
    let backend: Arc<dyn CompletionBackend> =
        Arc::new(OpenAiBackend::new(&config.generation, api_key));

    match args.command {
        Command::Tell { topic } => {
            let report = tell(&config, backend, topic.as_deref()).await?;
            output::print_report(&report, args.output);
        }
        Command::Show => {
            let show = StandUpShow::new(backend, config.show.clone());
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut out = std::io::stdout();
            let main_joke = show.run(&mut input, &mut out).await?;

            let detector = JokeDetector::new(&config.detector);
            let score = detector.rate(&main_joke).await?;
            println!("Joke confidence: {score:.1}/10");
        }
    }

    Ok(())
}

/// Generate, safety-screen and rubric-rate one joke.
async fn tell(
    config: &Config,
    backend: Arc<dyn CompletionBackend>,
    topic: Option<&str>,
) -> anyhow::Result<JokeReport> {
    let generator = JokeGenerator::new(backend.clone(), config.generation.topics.clone());
    let filter = SafetyFilter::new(generator, backend.clone(), config.safety.max_attempts);
    let rater = RubricRater::new(backend, config.rubric.criteria.clone());

    let screened = filter.tell_safe_joke(topic).await?;
    let rating = rater.rate(&screened.joke).await?;

    Ok(JokeReport {
        joke: screened.joke,
        attempts: screened.attempts,
        rating,
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "jokebot=debug" } else { "jokebot=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
