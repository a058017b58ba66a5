use crate::analysis::calculator::calculate;
use crate::analysis::traits::DealAnalyzer;
use crate::analysis::types::{DealAnalysisInput, DealMetrics, Roi};
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct RoiResponse {
    #[serde(default)]
    roi: Option<f64>,
}

/// Analyzer backed by the hosted ROI endpoint.
///
/// Totals and profit are derived locally from the same input; only the ROI
/// figure comes from the endpoint. One request per analysis, no retries.
pub struct RemoteAnalyzer {
    client: Client,
    endpoint: String,
}

impl RemoteAnalyzer {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketError::calculation(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: &str, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl DealAnalyzer for RemoteAnalyzer {
    async fn analyze(&self, input: &DealAnalysisInput) -> Result<DealMetrics> {
        let local = calculate(input);
        if local.roi.is_undefined() {
            debug!("Zero total investment, ROI is undefined without asking the endpoint");
            return Ok(local);
        }

        debug!("Posting deal scenario to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(input)
            .send()
            .await
            .map_err(|e| MarketError::calculation(format!("ROI endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "ROI endpoint returned an error");
            return Err(MarketError::calculation(format!(
                "Failed to calculate ROI: endpoint returned {}",
                status
            )));
        }

        let body: RoiResponse = response
            .json()
            .await
            .map_err(|e| MarketError::calculation(format!("unreadable ROI response: {}", e)))?;

        let roi = Roi::from(body.roi);
        info!(roi = %roi, "ROI received from endpoint");

        Ok(DealMetrics { roi, ..local })
    }

    fn engine_name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyzer_for(server: &MockServer) -> RemoteAnalyzer {
        RemoteAnalyzer::new(
            &format!("{}/api/analyze-property", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_posts_camel_case_body_and_reads_roi() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-property"))
            .and(body_json(json!({
                "purchasePrice": 100000.0,
                "rehabCost": 20000.0,
                "arv": 180000.0,
                "holdingCosts": 5000.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "roi": 44.0 })))
            .expect(1)
            .mount(&server)
            .await;

        let input = DealAnalysisInput::new(100_000.0, 20_000.0, 180_000.0, 5_000.0);
        let metrics = analyzer_for(&server).analyze(&input).await.unwrap();

        assert_eq!(metrics.total_investment, 125_000.0);
        assert_eq!(metrics.potential_profit, 55_000.0);
        assert_eq!(metrics.roi, Roi::Percent(44.0));
    }

    #[tokio::test]
    async fn test_null_roi_is_undefined() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "roi": null })))
            .expect(1)
            .mount(&server)
            .await;

        let metrics = analyzer_for(&server)
            .analyze(&DealAnalysisInput::new(1.0, 0.0, 2.0, 0.0))
            .await
            .unwrap();
        assert!(metrics.roi.is_undefined());
        assert_eq!(metrics.total_investment, 1.0);
    }

    #[tokio::test]
    async fn test_zero_investment_is_undefined_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "division by zero" })),
            )
            .expect(0)
            .mount(&server)
            .await;

        let metrics = analyzer_for(&server)
            .analyze(&DealAnalysisInput::new(0.0, 0.0, 50_000.0, 0.0))
            .await
            .unwrap();
        assert_eq!(metrics.roi, Roi::Undefined);
        assert_eq!(metrics.total_investment, 0.0);
        assert_eq!(metrics.potential_profit, 50_000.0);
    }

    #[tokio::test]
    async fn test_server_error_is_a_calculation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-property"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = analyzer_for(&server)
            .analyze(&DealAnalysisInput::new(100_000.0, 0.0, 120_000.0, 0.0))
            .await;

        match result {
            Err(MarketError::Calculation(message)) => assert!(message.contains("500")),
            other => panic!("Expected MarketError::Calculation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_calculation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = analyzer_for(&server)
            .analyze(&DealAnalysisInput::new(1.0, 0.0, 2.0, 0.0))
            .await;
        assert!(matches!(result, Err(MarketError::Calculation(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_calculation_failure() {
        let analyzer =
            RemoteAnalyzer::new("http://127.0.0.1:9/api/analyze-property", Duration::from_secs(2))
                .unwrap();
        let result = analyzer.analyze(&DealAnalysisInput::new(1.0, 0.0, 2.0, 0.0)).await;
        assert!(matches!(result, Err(MarketError::Calculation(_))));
    }
}
