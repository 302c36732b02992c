//! FinBERT served by the HuggingFace inference API.
//!
//! Provides an implementation of the [`TextClassifier`] trait that posts
//! batches of headlines to a hosted text-classification model and keeps the
//! highest-scoring label per text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::classifier::{Classification, SentimentLabel, TextClassifier};

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "HF_API_TOKEN";

/// Default inference endpoint prefix.
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Default financial sentiment model.
pub const DEFAULT_MODEL: &str = "ProsusAI/finbert";

/// HuggingFace inference API client.
#[derive(Debug)]
pub struct HuggingFace {
    /// HTTP client with the request timeout applied.
    client: Client,
    /// Bearer token.
    api_token: String,
    /// Full model URL.
    url: Url,
}

impl HuggingFace {
    /// Create a client for `model` under `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(
        api_token: impl Into<String>,
        endpoint: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let url = Url::parse(&format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            model.trim_start_matches('/')
        ))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_token: api_token.into(),
            url,
        })
    }

    /// Create a client with the token from `HF_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set or empty.
    pub fn from_env(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let api_token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(Error::Config(ConfigError::MissingField { field: TOKEN_ENV }))?;
        Self::new(api_token, endpoint, model, timeout)
    }

    /// Model URL requests are posted to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Serialize)]
struct Request<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Batched inputs come back as one label list per text; some deployments
/// return only the top label per text instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Response {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl Response {
    fn into_classifications(self) -> Vec<Classification> {
        match self {
            Self::Nested(per_text) => per_text
                .into_iter()
                .map(|labels| {
                    labels
                        .into_iter()
                        .max_by(|a, b| a.score.total_cmp(&b.score))
                        .map_or(
                            Classification::new(SentimentLabel::Neutral, 0.0),
                            LabelScore::into_classification,
                        )
                })
                .collect(),
            Self::Flat(top) => top
                .into_iter()
                .map(LabelScore::into_classification)
                .collect(),
        }
    }
}

impl LabelScore {
    fn into_classification(self) -> Classification {
        Classification::new(SentimentLabel::from_label(&self.label), self.score)
    }
}

#[async_trait]
impl TextClassifier for HuggingFace {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = Request {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Classifier(e.to_string()))?
            .json::<Response>()
            .await?;

        Ok(response.into_classifications())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let texts = vec!["Stocks rally".to_string(), "Earnings miss".to_string()];
        let request = Request {
            inputs: &texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"].as_array().unwrap().len(), 2);
        assert_eq!(json["inputs"][1], "Earnings miss");
        assert_eq!(json["options"]["wait_for_model"], true);
    }

    #[test]
    fn nested_response_keeps_top_label_per_text() {
        let json = r#"[
            [{"label": "positive", "score": 0.91}, {"label": "neutral", "score": 0.06}, {"label": "negative", "score": 0.03}],
            [{"label": "neutral", "score": 0.2}, {"label": "negative", "score": 0.75}, {"label": "positive", "score": 0.05}]
        ]"#;

        let response: Response = serde_json::from_str(json).unwrap();
        let classifications = response.into_classifications();
        assert_eq!(
            classifications,
            vec![
                Classification::new(SentimentLabel::Positive, 0.91),
                Classification::new(SentimentLabel::Negative, 0.75),
            ]
        );
    }

    #[test]
    fn flat_response_is_one_label_per_text() {
        let json = r#"[{"label": "Negative", "score": 0.8}, {"label": "Neutral", "score": 0.6}]"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let classifications = response.into_classifications();
        assert_eq!(classifications.len(), 2);
        assert_eq!(classifications[0].signed_score(), -0.8);
        assert_eq!(classifications[1].signed_score(), 0.0);
    }

    #[test]
    fn error_body_does_not_parse() {
        let json = r#"{"error": "Model ProsusAI/finbert is currently loading"}"#;
        let result: std::result::Result<Response, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let client =
            HuggingFace::new("token", "https://example.com/models/", DEFAULT_MODEL, Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.url().as_str(),
            "https://example.com/models/ProsusAI/finbert"
        );
        assert_eq!(client.name(), "huggingface");
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let result = HuggingFace::new("token", "not a url", DEFAULT_MODEL, Duration::from_secs(5));
        assert!(matches!(result, Err(Error::Url(_))));
    }
}
