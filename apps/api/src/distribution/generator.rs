//! Profession distribution generation via the text-generation API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::distribution::prompts::DISTRIBUTION_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ARRAY_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

/// Share of a profession's workforce located in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceShare {
    pub place: String,
    pub distribution: f64,
}

/// Produces a geographic distribution for a (normalized) profession name.
///
/// Carried in `DistributionService` as `Arc<dyn DistributionGenerator>`.
#[async_trait]
pub trait DistributionGenerator: Send + Sync {
    async fn generate(&self, profession: &str) -> Result<Vec<PlaceShare>, AppError>;
}

pub struct LlmDistributionGenerator(pub LlmClient);

#[async_trait]
impl DistributionGenerator for LlmDistributionGenerator {
    async fn generate(&self, profession: &str) -> Result<Vec<PlaceShare>, AppError> {
        let prompt = DISTRIBUTION_PROMPT_TEMPLATE.replace("{profession}", profession);
        self.0
            .call_json_array::<PlaceShare>(&prompt, JSON_ARRAY_ONLY_SYSTEM)
            .await
            .map_err(|e| AppError::Upstream(format!("Distribution generation failed: {e}")))
    }
}

/// Stand-in used when no API key is configured.
pub struct UnconfiguredGenerator;

#[async_trait]
impl DistributionGenerator for UnconfiguredGenerator {
    async fn generate(&self, _profession: &str) -> Result<Vec<PlaceShare>, AppError> {
        Err(AppError::Upstream(
            "text generation is not configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{parse_json_array, MAX_RETRIES};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_place_shares_parse_from_fenced_reply() {
        let reply = "```json\n[{\"place\": \"milano\", \"distribution\": 0.6}, {\"place\": \"roma\", \"distribution\": 0.4}]\n```";
        let shares: Vec<PlaceShare> = parse_json_array(reply).unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].place, "milano");
        assert!((shares.iter().map(|s| s.distribution).sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_prompt_embeds_profession() {
        let prompt = DISTRIBUTION_PROMPT_TEMPLATE.replace("{profession}", "infermiere");
        assert!(prompt.ends_with("infermiere"));
        assert!(!prompt.contains("{profession}"));
    }

    fn llm_generator(server: &MockServer) -> LlmDistributionGenerator {
        let client = LlmClient::new("test-key".to_string(), server.base_url(), Duration::from_secs(5))
            .unwrap()
            .with_backoff(Duration::from_millis(1));
        LlmDistributionGenerator(client)
    }

    #[tokio::test]
    async fn test_llm_generator_parses_fenced_distribution() {
        let server = MockServer::start_async().await;
        let reply = "Ecco i dati:\n```json\n[{\"place\": \"milano\", \"distribution\": 0.7}, {\"place\": \"torino\", \"distribution\": 0.3}]\n```";
        let messages = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/messages")
                    .body_contains("infermiere");
                then.status(200).json_body(json!({
                    "content": [{"type": "text", "text": reply}],
                    "usage": {"input_tokens": 10, "output_tokens": 20}
                }));
            })
            .await;

        let shares = llm_generator(&server).generate("infermiere").await.unwrap();
        messages.assert_async().await;
        assert_eq!(
            shares,
            vec![
                PlaceShare { place: "milano".to_string(), distribution: 0.7 },
                PlaceShare { place: "torino".to_string(), distribution: 0.3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_llm_generator_surfaces_exhausted_retries_as_upstream() {
        let server = MockServer::start_async().await;
        let unavailable = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(503);
            })
            .await;

        let err = llm_generator(&server).generate("architetto").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        unavailable.assert_hits_async(MAX_RETRIES as usize).await;
    }

    #[tokio::test]
    async fn test_llm_generator_does_not_retry_bad_requests() {
        let server = MockServer::start_async().await;
        let rejected = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(400);
            })
            .await;

        let err = llm_generator(&server).generate("architetto").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        rejected.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_unconfigured_generator_is_an_upstream_error() {
        let err = UnconfiguredGenerator.generate("nurse").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
