use crate::client::CompletionBackend;
use crate::config::Criterion;
use crate::error::BotError;
use crate::models::{PromptPair, RatingResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Rates a joke against an ordered, weighted rubric via one judge call
pub struct RubricRater {
    backend: Arc<dyn CompletionBackend>,
    criteria: Vec<Criterion>,
}

impl RubricRater {
    pub fn new(backend: Arc<dyn CompletionBackend>, criteria: Vec<Criterion>) -> Self {
        Self { backend, criteria }
    }

    /// Ask the judge for a 1-10 score per criterion and fold the reply into
    /// a weighted average, rounded half-up.
    pub async fn rate(&self, joke: &str) -> Result<RatingResult, BotError> {
        if self.criteria.is_empty() {
            return Err(BotError::Config("no rubric criteria configured".to_string()));
        }

        let names = self
            .criteria
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = PromptPair::new(
            format!(
                "Rate the joke with a scale from 1 (not funny) to 10 (hilarious) based on the \
                 given criteria: {names}. Format your output in JSON with the criteria as keys \
                 and the ratings as values."
            ),
            format!("Is this joke funny? {joke}"),
        );

        let raw = self.backend.complete(&prompt).await?;
        self.parse_ratings(&raw)
    }

    /// Parse the judge reply. A missing criterion, a non-integer value, or a
    /// score outside 1-10 fails with a parse error rather than substituting
    /// a default.
    fn parse_ratings(&self, raw: &str) -> Result<RatingResult, BotError> {
        let parsed = parse_json_reply(raw)?;
        let ratings = parsed
            .as_object()
            .ok_or_else(|| BotError::Parse("rating reply is not a JSON object".to_string()))?;

        let mut scores = HashMap::new();
        let mut weighted_sum = 0.0;
        for criterion in &self.criteria {
            let value = ratings.get(&criterion.name).ok_or_else(|| {
                BotError::Parse(format!(
                    "rating reply is missing criterion {:?}",
                    criterion.name
                ))
            })?;

            let score = value.as_i64().filter(|s| (1..=10).contains(s)).ok_or_else(|| {
                BotError::Parse(format!(
                    "criterion {:?} has an invalid score: {value}",
                    criterion.name
                ))
            })?;

            weighted_sum += criterion.weight * score as f64;
            scores.insert(criterion.name.clone(), score);
        }

        let final_score = round_half_up(weighted_sum / self.criteria.len() as f64);
        Ok(RatingResult {
            scores,
            final_score,
            raw_response: raw.to_string(),
        })
    }
}

/// Parse JSON from the reply, rescuing JSON embedded in surrounding text
fn parse_json_reply(reply: &str) -> Result<Value, BotError> {
    match serde_json::from_str(reply) {
        Ok(parsed) => Ok(parsed),
        Err(_) => try_extract_embedded_json(reply),
    }
}

/// Try to extract JSON that might be embedded in text
fn try_extract_embedded_json(reply: &str) -> Result<Value, BotError> {
    match reply.find('{') {
        Some(start) => match reply.rfind('}') {
            Some(end) => serde_json::from_str(&reply[start..=end])
                .map_err(|e| BotError::Parse(format!("failed to parse extracted JSON: {e}"))),
            None => Err(BotError::Parse(
                "found opening brace but no closing brace in reply".to_string(),
            )),
        },
        None => Err(BotError::Parse("no JSON found in reply".to_string())),
    }
}

/// Round to the nearest integer, with halves rounding up. The aggregation
/// convention is fixed here so the .5 boundary is unambiguous.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RubricConfig;
    use crate::testing::ScriptedBackend;

    fn default_rater(backend: Arc<ScriptedBackend>) -> RubricRater {
        RubricRater::new(backend, RubricConfig::default().criteria)
    }

    #[tokio::test]
    async fn test_rate_sends_criteria_and_joke() {
        let reply = r#"{"Humor": 8, "Creativity": 7, "Timeliness": 6, "Tone and style": 7, "Delivery style": 5}"#;
        let backend = Arc::new(ScriptedBackend::new(&[reply]));
        let rater = default_rater(backend.clone());

        rater.rate("Why did the atom lie?").await.unwrap();

        let request = &backend.requests()[0];
        assert!(request.system.contains("Humor"));
        assert!(request.system.contains("Delivery style"));
        assert!(request.user.contains("Why did the atom lie?"));
    }

    #[tokio::test]
    async fn test_all_tens_round_to_seven_under_default_weights() {
        // (1 + 0.8 + 0.6 + 0.8 + 0.5) * 10 / 5 = 7.4
        let reply = r#"{"Humor": 10, "Creativity": 10, "Timeliness": 10, "Tone and style": 10, "Delivery style": 10}"#;
        let backend = Arc::new(ScriptedBackend::new(&[reply]));
        let rater = default_rater(backend);

        let rating = rater.rate("joke").await.unwrap();
        assert_eq!(rating.final_score, 7);
        assert_eq!(rating.scores.get("Humor"), Some(&10));
        assert_eq!(rating.raw_response, reply);
    }

    #[tokio::test]
    async fn test_rate_parses_json_embedded_in_prose() {
        let reply = r#"Here you go: {"Humor": 8, "Creativity": 8, "Timeliness": 8, "Tone and style": 8, "Delivery style": 8} Enjoy!"#;
        let backend = Arc::new(ScriptedBackend::new(&[reply]));
        let rater = default_rater(backend);

        let rating = rater.rate("joke").await.unwrap();
        // (1 + 0.8 + 0.6 + 0.8 + 0.5) * 8 / 5 = 5.92
        assert_eq!(rating.final_score, 6);
    }

    #[tokio::test]
    async fn test_missing_criterion_is_a_parse_error() {
        let reply = r#"{"Humor": 10, "Creativity": 10, "Timeliness": 10, "Tone and style": 10}"#;
        let backend = Arc::new(ScriptedBackend::new(&[reply]));
        let rater = default_rater(backend);

        let result = rater.rate("joke").await;
        match result {
            Err(BotError::Parse(message)) => assert!(message.contains("Delivery style")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_reply_is_a_parse_error() {
        let backend = Arc::new(ScriptedBackend::new(&["I'd give it a solid 8 out of 10."]));
        let rater = default_rater(backend);

        let result = rater.rate("joke").await;
        assert!(matches!(result, Err(BotError::Parse(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_a_parse_error() {
        let reply = r#"{"Humor": 11, "Creativity": 10, "Timeliness": 10, "Tone and style": 10, "Delivery style": 10}"#;
        let backend = Arc::new(ScriptedBackend::new(&[reply]));
        let rater = default_rater(backend);

        let result = rater.rate("joke").await;
        assert!(matches!(result, Err(BotError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fractional_score_is_a_parse_error() {
        let reply = r#"{"Humor": 7.5, "Creativity": 10, "Timeliness": 10, "Tone and style": 10, "Delivery style": 10}"#;
        let backend = Arc::new(ScriptedBackend::new(&[reply]));
        let rater = default_rater(backend);

        let result = rater.rate("joke").await;
        assert!(matches!(result, Err(BotError::Parse(_))));
    }

    #[tokio::test]
    async fn test_empty_criteria_is_a_config_error() {
        let backend = Arc::new(ScriptedBackend::new(&["{}"]));
        let rater = RubricRater::new(backend, vec![]);

        let result = rater.rate("joke").await;
        assert!(matches!(result, Err(BotError::Config(_))));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(7.4), 7);
        assert_eq!(round_half_up(7.5), 8);
        assert_eq!(round_half_up(7.6), 8);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(10.0), 10);
        assert_eq!(round_half_up(0.0), 0);
    }
}
