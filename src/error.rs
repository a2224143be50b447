use thiserror::Error;

/// Error kinds surfaced by the joke bots.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("classifier request failed: {0}")]
    Classifier(#[from] reqwest::Error),

    #[error("could not parse rating reply: {0}")]
    Parse(String),

    #[error("no safe joke accepted after {attempts} attempts")]
    UnsafeLoopOverrun { attempts: u32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
