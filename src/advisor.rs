//! Reduction tips from a text-generation service
//!
//! The tracker only builds the prompt and hands it to a [`TipProvider`];
//! whatever text comes back is shown as-is.

use std::cmp::Ordering;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AdvisoryError, TransportFailure};
use crate::models::{Category, FootprintRecord};

/// Something that turns a prompt into prose
#[async_trait]
pub trait TipProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Stand-in used when no API key is configured
pub struct UnconfiguredProvider;

#[async_trait]
impl TipProvider for UnconfiguredProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::NotConfigured)
    }
}

/// What the tracker hands to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct TipRequest {
    pub total: f64,
    /// Categories with a nonzero contribution, largest first
    pub categories: Vec<Category>,
}

impl TipRequest {
    pub fn from_record(record: &FootprintRecord) -> Self {
        let mut contributing: Vec<(Category, f64)> = record
            .breakdown()
            .iter()
            .filter(|(_, kg)| *kg > 0.0)
            .collect();
        // stable: ties keep category order
        contributing.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Self {
            total: record.total(),
            categories: contributing.into_iter().map(|(c, _)| c).collect(),
        }
    }

    pub fn needs_tips(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn prompt(&self) -> String {
        let categories = self
            .categories
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "The user's monthly carbon footprint is {:.2} kg CO2e. \
             The main contributing categories are: {}. \
             Please provide 3-5 actionable and practical tips for reducing carbon emissions \
             in these specific areas, suitable for an individual. \
             Focus on easy-to-implement changes and provide a brief explanation for each tip. \
             Format as a bulleted list.",
            self.total, categories
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    Tips(String),
    /// Nothing contributes, so the provider was not asked
    NoSuggestionsNeeded,
}

/// Ask `provider` for tips on `record`, unless nothing contributes.
pub async fn request_tips(
    provider: &dyn TipProvider,
    record: &FootprintRecord,
) -> Result<Advice, AdvisoryError> {
    let request = TipRequest::from_record(record);
    if !request.needs_tips() {
        debug!(target: "carbon_tracker::advisor", "zero footprint, skipping tip request");
        return Ok(Advice::NoSuggestionsNeeded);
    }

    let text = provider.generate(&request.prompt()).await?;
    Ok(Advice::Tips(text))
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn user_prompt(text: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text }],
            }],
        }
    }
}

/// `candidates[0].content.parts[0].text`, if present
fn extract_text(body: &JsonValue) -> Option<&str> {
    body["candidates"][0]["content"]["parts"][0]["text"].as_str()
}

/// Gemini `generateContent` over HTTPS
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn try_new(config: &Config) -> Result<Self, AdvisoryError> {
        let api_key = config.api_key.clone().ok_or(AdvisoryError::NotConfigured)?;

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|err| {
                AdvisoryError::transport(
                    TransportFailure::Request,
                    format!("failed to build HTTP client: {err}"),
                )
            })?;

        let base_url = config.api_base_url.trim_end_matches('/');
        let endpoint = format!("{}/v1beta/models/{}:generateContent", base_url, config.model);

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn error_from_reqwest(err: reqwest::Error) -> AdvisoryError {
        let failure = if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else if let Some(status) = err.status() {
            TransportFailure::Status(status.as_u16())
        } else if err.is_decode() {
            TransportFailure::Decode
        } else {
            TransportFailure::Request
        };
        AdvisoryError::transport(failure, err.to_string())
    }
}

#[async_trait]
impl TipProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let start = Instant::now();
        debug!(
            target: "carbon_tracker::advisor",
            endpoint = %self.endpoint,
            prompt_len = prompt.len(),
            "requesting tips"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::user_prompt(prompt))
            .send()
            .await
            .map_err(Self::error_from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "carbon_tracker::advisor",
                status = status.as_u16(),
                latency_ms = start.elapsed().as_millis() as u64,
                "tip service returned non-success status"
            );
            return Err(AdvisoryError::transport(
                TransportFailure::Status(status.as_u16()),
                format!("tip service answered {status}"),
            ));
        }

        let raw = response.text().await.map_err(Self::error_from_reqwest)?;
        let body: JsonValue = serde_json::from_str(&raw).map_err(|err| {
            AdvisoryError::transport(
                TransportFailure::Decode,
                format!("response was not JSON: {err}"),
            )
        })?;

        let text = extract_text(&body)
            .ok_or_else(AdvisoryError::content_not_found)?
            .to_string();

        info!(
            target: "carbon_tracker::advisor",
            latency_ms = start.elapsed().as_millis() as u64,
            response_len = text.len(),
            "tips received"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Breakdown;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TipProvider for CountingProvider {
        async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(format!("tips for: {prompt}"))
        }
    }

    fn record(breakdown: Breakdown) -> FootprintRecord {
        FootprintRecord::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), breakdown)
    }

    #[test]
    fn categories_sorted_by_contribution_without_zeros() {
        let request = TipRequest::from_record(&record(Breakdown {
            transportation: 105.0,
            electricity: 69.0,
            diet: 150.0,
            waste: 0.0,
        }));
        assert_eq!(
            request.categories,
            vec![Category::Diet, Category::Transportation, Category::Electricity]
        );
        assert_eq!(request.total, 324.0);
    }

    #[test]
    fn ties_keep_category_order() {
        let request = TipRequest::from_record(&record(Breakdown {
            transportation: 5.0,
            electricity: 0.0,
            diet: 5.0,
            waste: 5.0,
        }));
        assert_eq!(
            request.categories,
            vec![Category::Transportation, Category::Diet, Category::Waste]
        );
    }

    #[test]
    fn prompt_embeds_total_and_categories() {
        let request = TipRequest {
            total: 192.0,
            categories: vec![Category::Transportation, Category::Electricity],
        };
        let prompt = request.prompt();
        assert!(prompt.starts_with("The user's monthly carbon footprint is 192.00 kg CO2e."));
        assert!(prompt.contains("The main contributing categories are: Transportation, Electricity."));
        assert!(prompt.ends_with("Format as a bulleted list."));
    }

    #[test]
    fn request_envelope_shape() {
        let body = serde_json::to_value(GenerateContentRequest::user_prompt("hi")).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn extract_text_requires_full_path() {
        let ok = json!({"candidates": [{"content": {"parts": [{"text": "- bike more"}]}}]});
        assert_eq!(extract_text(&ok), Some("- bike more"));

        let missing_parts = json!({"candidates": [{"content": {}}]});
        assert_eq!(extract_text(&missing_parts), None);
        assert_eq!(extract_text(&json!({"candidates": []})), None);
        assert_eq!(extract_text(&json!({"candidates": [{"content": {"parts": [{"text": 3}]}}]})), None);
    }

    #[tokio::test]
    async fn zero_footprint_never_calls_provider() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
        };
        let advice = request_tips(&provider, &record(Breakdown::default())).await.unwrap();

        assert_eq!(advice, Advice::NoSuggestionsNeeded);
        assert_eq!(provider.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn nonzero_footprint_calls_provider_once() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
        };
        let advice = request_tips(
            &provider,
            &record(Breakdown {
                waste: 3.0,
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        match advice {
            Advice::Tips(text) => assert!(text.contains("categories are: Waste.")),
            other => panic!("unexpected advice: {other:?}"),
        }
        assert_eq!(provider.calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn client_requires_api_key() {
        assert!(matches!(
            GeminiClient::try_new(&Config::default()),
            Err(AdvisoryError::NotConfigured)
        ));

        let config = Config {
            api_key: Some("k".into()),
            api_base_url: "http://localhost:1/".into(),
            ..Config::default()
        };
        let client = GeminiClient::try_new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
