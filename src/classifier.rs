use crate::config::DetectorConfig;
use crate::error::BotError;
use serde::Deserialize;

/// One prediction from the joke-detector model
#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f64,
}

/// Binary joke detector backed by an HTTP inference endpoint. Returns a
/// confidence that the text is a joke, scaled to 0-10.
pub struct JokeDetector {
    http: reqwest::Client,
    endpoint: String,
    positive_label: String,
    token: Option<String>,
}

impl JokeDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            positive_label: config.positive_label.clone(),
            token: config.resolve_token(),
        }
    }

    /// Classify the joke and scale the confidence. A positive label uses the
    /// returned score directly; a negative one inverts it first.
    pub async fn rate(&self, joke: &str) -> Result<f64, BotError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": joke }));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(endpoint = %self.endpoint, "classifying joke");
        let response = request.send().await?.error_for_status()?;
        let predictions: Vec<Prediction> = response.json().await?;

        let best = predictions
            .first()
            .ok_or_else(|| BotError::Parse("classifier returned no predictions".to_string()))?;

        let confidence = if best.label == self.positive_label {
            best.score
        } else {
            1.0 - best.score
        };

        Ok(confidence * 10.0)
    }
}
