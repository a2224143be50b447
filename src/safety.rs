use crate::client::CompletionBackend;
use crate::error::BotError;
use crate::generator::JokeGenerator;
use crate::models::{PromptPair, ScreenedJoke};
use std::sync::Arc;

/// Classifier verdict for one generated joke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Safe,
    Flagged,
}

/// Screens generated jokes through a yes/no offensiveness check, regenerating
/// flagged ones up to a configured cap.
pub struct SafetyFilter {
    generator: JokeGenerator,
    backend: Arc<dyn CompletionBackend>,
    max_attempts: u32,
}

impl SafetyFilter {
    pub fn new(
        generator: JokeGenerator,
        backend: Arc<dyn CompletionBackend>,
        max_attempts: u32,
    ) -> Self {
        Self {
            generator,
            backend,
            max_attempts,
        }
    }

    /// Generate jokes until the classifier accepts one. Every flagged round
    /// regenerates unconditionally; past `max_attempts` rounds the call fails
    /// with [`BotError::UnsafeLoopOverrun`] instead of looping forever.
    pub async fn tell_safe_joke(&self, context: Option<&str>) -> Result<ScreenedJoke, BotError> {
        for attempt in 1..=self.max_attempts {
            let joke = self.generator.generate(context).await?;

            match self.classify(&joke).await? {
                Verdict::Safe => {
                    tracing::debug!(attempt, "joke accepted");
                    return Ok(ScreenedJoke {
                        joke,
                        attempts: attempt,
                    });
                }
                Verdict::Flagged => {
                    tracing::debug!(attempt, "joke flagged, regenerating");
                }
            }
        }

        Err(BotError::UnsafeLoopOverrun {
            attempts: self.max_attempts,
        })
    }

    /// One yes/no round trip. Only a literal "no" (after trimming and
    /// lower-casing) counts as safe; every other answer flags the joke.
    async fn classify(&self, joke: &str) -> Result<Verdict, BotError> {
        let prompt = PromptPair::new(
            "Is the provided sentence offensive? Just say yes or no.",
            joke,
        );

        let answer = self.backend.complete(&prompt).await?;
        if answer.trim().to_lowercase() == "no" {
            Ok(Verdict::Safe)
        } else {
            Ok(Verdict::Flagged)
        }
    }
}
