use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The (system instruction, user instruction) pair sent to the generation
/// service in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPair {
    /// System instruction setting up the request
    pub system: String,
    /// User instruction carrying the actual ask
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// A joke that passed the safety screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenedJoke {
    /// The accepted joke text
    pub joke: String,
    /// How many generate/classify rounds it took to accept
    pub attempts: u32,
}

/// Outcome of rating a joke against the rubric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResult {
    /// Raw score per criterion (1 to 10)
    pub scores: HashMap<String, i64>,
    /// Weighted average, rounded half-up
    pub final_score: i64,
    /// Raw rating reply from the model
    pub raw_response: String,
}

/// Complete result of a tell-a-joke run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokeReport {
    /// The joke that was told
    pub joke: String,
    /// Safety-screen rounds it took to accept the joke
    pub attempts: u32,
    /// Rubric rating of the joke
    pub rating: RatingResult,
}
