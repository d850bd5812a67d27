//! Symptom analyzer abstraction and HTTP implementation.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use url::Url;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::types::{AnalysisRequest, AnalysisResponse};

/// Boxed future type for analyzer operations.
pub type AnalysisFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait abstraction over the external symptom-analysis service.
pub trait SymptomAnalyzer: Send + Sync {
    /// Analyze one combined user utterance.
    ///
    /// # Errors
    /// Returns an error on network failure, non-success status or malformed payload.
    fn analyze<'a>(&'a self, message: &'a str)
    -> AnalysisFuture<'a, AnalysisResult<AnalysisResponse>>;
}

/// Analyzer that POSTs `{ "message": ... }` to the configured endpoint.
#[derive(Clone)]
pub struct HttpSymptomAnalyzer {
    client: Client,
    endpoint: Url,
}

impl HttpSymptomAnalyzer {
    /// Create a new analyzer from config.
    ///
    /// The per-call timeout is enforced by the flush handler, not the client.
    ///
    /// # Errors
    /// Returns an error if the endpoint is invalid or the client cannot be built.
    pub fn new(config: &AnalysisConfig) -> AnalysisResult<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint this analyzer calls.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl SymptomAnalyzer for HttpSymptomAnalyzer {
    fn analyze<'a>(
        &'a self,
        message: &'a str,
    ) -> AnalysisFuture<'a, AnalysisResult<AnalysisResponse>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint.clone())
                .json(&AnalysisRequest { message })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(AnalysisError::HttpStatus(status.as_u16()));
            }

            let body = response.bytes().await?;
            let parsed: AnalysisResponse = serde_json::from_slice(&body)?;
            tracing::debug!(
                symptoms = parsed.extracted_symptoms.len(),
                "Analysis service answered"
            );
            Ok(parsed)
        })
    }
}
