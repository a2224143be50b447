use crate::client::CompletionBackend;
use crate::error::BotError;
use crate::models::PromptPair;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Generates one joke per call on a random or supplied topic
pub struct JokeGenerator {
    backend: Arc<dyn CompletionBackend>,
    topics: Vec<String>,
}

impl JokeGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, topics: Vec<String>) -> Self {
        Self { backend, topics }
    }

    /// Ask the generation service for a joke. With no context the topic is
    /// picked uniformly at random from the configured list.
    pub async fn generate(&self, context: Option<&str>) -> Result<String, BotError> {
        let topic = match context {
            Some(topic) => topic.to_string(),
            None => self.pick_topic()?,
        };

        let prompt = PromptPair::new(
            format!("Provide a joke about {topic} without any phrasing."),
            "Tell me a joke.",
        );

        tracing::debug!(topic = %topic, "requesting a joke");
        let raw = self.backend.complete(&prompt).await?;
        Ok(strip_wrapping(&raw).to_string())
    }

    fn pick_topic(&self) -> Result<String, BotError> {
        self.topics
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| BotError::Config("no joke topics configured".to_string()))
    }
}

/// Strip surrounding whitespace and matched wrapping quote pairs the model
/// sometimes adds around the joke.
pub fn strip_wrapping(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let inner = [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}')]
            .iter()
            .find_map(|&(open, close)| current.strip_prefix(open)?.strip_suffix(close));

        match inner {
            Some(inner) if !inner.is_empty() => current = inner.trim(),
            _ => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;

    fn topics() -> Vec<String> {
        ["science", "politics", "AI"]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_generate_embeds_supplied_topic_in_system_instruction() {
        for topic in topics() {
            let backend = Arc::new(ScriptedBackend::new(&["A joke."]));
            let generator = JokeGenerator::new(backend.clone(), topics());

            generator.generate(Some(&topic)).await.unwrap();

            let requests = backend.requests();
            assert_eq!(requests.len(), 1);
            assert!(requests[0].system.contains(&topic));
            assert_eq!(requests[0].user, "Tell me a joke.");
        }
    }

    #[tokio::test]
    async fn test_generate_picks_topic_from_configured_list() {
        let backend = Arc::new(ScriptedBackend::new(&["A joke."]));
        let generator = JokeGenerator::new(backend.clone(), topics());

        generator.generate(None).await.unwrap();

        let request = &backend.requests()[0];
        assert!(
            topics().iter().any(|t| request.system.contains(t.as_str())),
            "system instruction should mention a configured topic: {}",
            request.system
        );
    }

    #[tokio::test]
    async fn test_generate_without_topics_or_context_is_config_error() {
        let backend = Arc::new(ScriptedBackend::new(&["A joke."]));
        let generator = JokeGenerator::new(backend, vec![]);

        let result = generator.generate(None).await;
        assert!(matches!(result, Err(BotError::Config(_))));
    }

    #[tokio::test]
    async fn test_generate_trims_wrapping_quotes() {
        let backend = Arc::new(ScriptedBackend::new(&["  \"Why did the atom lie?\"  "]));
        let generator = JokeGenerator::new(backend, topics());

        let joke = generator.generate(Some("science")).await.unwrap();
        assert_eq!(joke, "Why did the atom lie?");
    }

    #[tokio::test]
    async fn test_generate_propagates_transport_failure() {
        let backend = Arc::new(crate::testing::FailingBackend);
        let generator = JokeGenerator::new(backend, topics());

        let result = generator.generate(Some("science")).await;
        assert!(matches!(result, Err(BotError::Transport(_))));
    }

    #[test]
    fn test_strip_wrapping() {
        assert_eq!(strip_wrapping("\"quoted\""), "quoted");
        assert_eq!(strip_wrapping("'single'"), "single");
        assert_eq!(strip_wrapping("\u{201c}curly\u{201d}"), "curly");
        assert_eq!(strip_wrapping("  '\"nested\"'  "), "nested");
        assert_eq!(strip_wrapping("plain text"), "plain text");
        assert_eq!(strip_wrapping("\"unbalanced"), "\"unbalanced");
        assert_eq!(strip_wrapping("don't \"mix\" quotes"), "don't \"mix\" quotes");
        assert_eq!(strip_wrapping("\"\""), "\"\"");
    }
}
