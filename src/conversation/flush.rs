//! Flush handler: validates a finished utterance, calls the analysis
//! service and replies to the user.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisError, AnalysisResponse, AnalysisResult, SymptomAnalyzer};
use crate::conversation::config::ConversationConfig;
use crate::conversation::debounce::{FlushBatch, FlushFuture, FlushSink};
use crate::conversation::replies;
use crate::transport::ChatTransport;

/// How a flush ended, one variant per reply kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FlushOutcome {
    /// Utterance below the length threshold; no analysis call made.
    TooShort,
    /// The service found nothing.
    NoSymptoms,
    /// Symptoms found without a specialty.
    GeneralPractitioner {
        /// Extracted symptoms.
        symptoms: Vec<String>,
    },
    /// Symptoms found with one or more specialties.
    Specialists {
        /// Extracted symptoms.
        symptoms: Vec<String>,
        /// Suggested specialties.
        specialties: Vec<String>,
    },
    /// The analysis call failed.
    Failed,
}

impl FlushOutcome {
    /// Map an analysis answer to an outcome.
    #[must_use]
    pub fn interpret(response: &AnalysisResponse, sentinel: &str) -> Self {
        let symptoms = &response.extracted_symptoms;
        let nothing_found = match symptoms.as_slice() {
            [] => true,
            [only] => only == sentinel,
            _ => false,
        };
        if nothing_found {
            return Self::NoSymptoms;
        }

        let specialties: Vec<String> = response
            .suggested_specialties
            .as_ref()
            .map(|s| s.names().into_iter().map(str::to_string).collect())
            .unwrap_or_default();

        if specialties.is_empty() {
            Self::GeneralPractitioner {
                symptoms: symptoms.clone(),
            }
        } else {
            Self::Specialists {
                symptoms: symptoms.clone(),
                specialties,
            }
        }
    }

    /// Text sent back to the user.
    #[must_use]
    pub fn reply(&self) -> String {
        match self {
            Self::TooShort => replies::TOO_SHORT.to_string(),
            Self::NoSymptoms => replies::NO_SYMPTOMS.to_string(),
            Self::GeneralPractitioner { symptoms } => replies::general_practitioner(symptoms),
            Self::Specialists {
                symptoms,
                specialties,
            } => replies::specialists(symptoms, specialties),
            Self::Failed => replies::PROCESSING_ERROR.to_string(),
        }
    }
}

/// Turns flushed batches into replies.
pub struct FlushHandler {
    analyzer: Arc<dyn SymptomAnalyzer>,
    transport: Arc<dyn ChatTransport>,
    min_message_chars: usize,
    sentinel: String,
    timeout: Option<Duration>,
}

impl FlushHandler {
    /// Create a handler. `timeout` bounds each analysis call.
    #[must_use]
    pub fn new(
        config: &ConversationConfig,
        analyzer: Arc<dyn SymptomAnalyzer>,
        transport: Arc<dyn ChatTransport>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            analyzer,
            transport,
            min_message_chars: config.min_message_chars,
            sentinel: config.no_symptoms_sentinel.clone(),
            timeout,
        }
    }

    /// Process one batch and send exactly one reply. Never fails.
    pub async fn handle(&self, batch: FlushBatch) -> FlushOutcome {
        let flush_id = Uuid::new_v4();
        let utterance = batch.utterance();
        let chars = utterance.chars().count();
        info!(
            %flush_id,
            conversation = %batch.conversation,
            fragments = batch.fragments.len(),
            chars,
            "Flushing conversation"
        );

        let outcome = if chars < self.min_message_chars {
            FlushOutcome::TooShort
        } else {
            match self.analyze(&utterance).await {
                Ok(response) => FlushOutcome::interpret(&response, &self.sentinel),
                Err(err) => {
                    error!(
                        %flush_id,
                        conversation = %batch.conversation,
                        transient = err.is_transient(),
                        error = %err,
                        "Analysis call failed"
                    );
                    FlushOutcome::Failed
                }
            }
        };

        if let Err(err) = self.transport.send(&batch.conversation, &outcome.reply()).await {
            warn!(%flush_id, conversation = %batch.conversation, ?err, "Failed to send reply");
        }
        outcome
    }

    async fn analyze(&self, utterance: &str) -> AnalysisResult<AnalysisResponse> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.analyzer.analyze(utterance))
                .await
                .unwrap_or(Err(AnalysisError::Timeout(limit))),
            None => self.analyzer.analyze(utterance).await,
        }
    }
}

impl FlushSink for FlushHandler {
    fn flush(&self, batch: FlushBatch) -> FlushFuture<'_> {
        Box::pin(async move {
            self.handle(batch).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::analysis::SuggestedSpecialties;
    use crate::conversation::ids::ConversationId;
    use crate::conversation::testing::{RecordingTransport, Script, ScriptedAnalyzer};

    fn batch(fragments: &[&str]) -> FlushBatch {
        FlushBatch {
            conversation: ConversationId::new("5511@s.whatsapp.net"),
            fragments: fragments.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    fn setup(
        script: Script,
        timeout: Option<Duration>,
    ) -> (FlushHandler, Arc<ScriptedAnalyzer>, Arc<RecordingTransport>) {
        let analyzer = Arc::new(ScriptedAnalyzer::new(script));
        let transport = Arc::new(RecordingTransport::default());
        let handler = FlushHandler::new(
            &ConversationConfig::default(),
            Arc::clone(&analyzer) as Arc<dyn SymptomAnalyzer>,
            Arc::clone(&transport) as Arc<dyn ChatTransport>,
            timeout,
        );
        (handler, analyzer, transport)
    }

    #[tokio::test]
    async fn test_short_utterance_skips_analysis() {
        let (handler, analyzer, transport) =
            setup(Script::Respond(AnalysisResponse::default()), None);

        let outcome = handler.handle(batch(&["dor", "aqui"])).await;

        assert_eq!(outcome, FlushOutcome::TooShort);
        assert_eq!(analyzer.calls(), 0);
        assert_eq!(transport.texts().await, vec![replies::TOO_SHORT.to_string()]);
    }

    #[tokio::test]
    async fn test_length_counts_joining_spaces() {
        // "febre" + " " + "alta" is exactly ten characters.
        let (handler, analyzer, _transport) = setup(
            Script::Respond(AnalysisResponse::new(["febre"], None)),
            None,
        );
        let outcome = handler.handle(batch(&["febre", "alta"])).await;
        assert_ne!(outcome, FlushOutcome::TooShort);
        assert_eq!(analyzer.messages().await, vec!["febre alta".to_string()]);
    }

    #[tokio::test]
    async fn test_sentinel_means_no_symptoms() {
        let (handler, _analyzer, transport) = setup(
            Script::Respond(AnalysisResponse::new(["Nenhum"], None)),
            None,
        );
        let outcome = handler.handle(batch(&["estou me sentindo estranho"])).await;
        assert_eq!(outcome, FlushOutcome::NoSymptoms);
        assert_eq!(transport.texts().await, vec![replies::NO_SYMPTOMS.to_string()]);
    }

    #[tokio::test]
    async fn test_symptoms_without_specialty_recommend_gp() {
        let (handler, _analyzer, transport) = setup(
            Script::Respond(AnalysisResponse::new(["febre", "tosse"], None)),
            None,
        );
        handler.handle(batch(&["tenho febre", "e tosse"])).await;
        assert_eq!(
            transport.texts().await,
            vec!["Seus sintomas: febre, tosse\nConsulte com um médico geral.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_symptoms_with_specialty() {
        let (handler, _analyzer, transport) = setup(
            Script::Respond(AnalysisResponse::new(["febre"], Some("Pneumologia"))),
            None,
        );
        let outcome = handler.handle(batch(&["febre há três dias"])).await;
        assert_eq!(
            outcome,
            FlushOutcome::Specialists {
                symptoms: vec!["febre".to_string()],
                specialties: vec!["Pneumologia".to_string()],
            }
        );
        assert_eq!(
            transport.texts().await,
            vec!["Seus sintomas: febre\nConsulte com um especialista em: Pneumologia".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failure_sends_one_generic_reply() {
        let (handler, analyzer, transport) = setup(Script::Status(500), None);
        let outcome = handler.handle(batch(&["dor forte no peito"])).await;
        assert_eq!(outcome, FlushOutcome::Failed);
        assert_eq!(analyzer.calls(), 1);
        assert_eq!(
            transport.texts().await,
            vec![replies::PROCESSING_ERROR.to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_analysis_times_out() {
        let (handler, _analyzer, transport) =
            setup(Script::Hang, Some(Duration::from_secs(30)));
        let outcome = handler.handle(batch(&["dor forte no peito"])).await;
        assert_eq!(outcome, FlushOutcome::Failed);
        assert_eq!(
            transport.texts().await,
            vec![replies::PROCESSING_ERROR.to_string()]
        );
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(Script::Respond(
            AnalysisResponse::new(["febre"], None),
        )));
        let transport = Arc::new(RecordingTransport::failing());
        let handler = FlushHandler::new(
            &ConversationConfig::default(),
            analyzer,
            Arc::clone(&transport) as Arc<dyn ChatTransport>,
            None,
        );
        let outcome = handler.handle(batch(&["febre e calafrios"])).await;
        assert!(matches!(outcome, FlushOutcome::GeneralPractitioner { .. }));
        assert_eq!(transport.sent().await.len(), 1);
    }

    #[test]
    fn test_interpret_edge_cases() {
        let sentinel = "Nenhum";

        let empty = AnalysisResponse::default();
        assert_eq!(FlushOutcome::interpret(&empty, sentinel), FlushOutcome::NoSymptoms);

        // The sentinel only counts when it stands alone.
        let mixed = AnalysisResponse::new(["Nenhum", "febre"], None);
        assert!(matches!(
            FlushOutcome::interpret(&mixed, sentinel),
            FlushOutcome::GeneralPractitioner { .. }
        ));

        let empty_list = AnalysisResponse {
            extracted_symptoms: vec!["tontura".to_string()],
            suggested_specialties: Some(SuggestedSpecialties::Many(Vec::new())),
        };
        assert!(matches!(
            FlushOutcome::interpret(&empty_list, sentinel),
            FlushOutcome::GeneralPractitioner { .. }
        ));

        let ranked = AnalysisResponse {
            extracted_symptoms: vec!["tontura".to_string()],
            suggested_specialties: Some(SuggestedSpecialties::Many(vec![
                "Neurologia".to_string(),
                "Otorrinolaringologia".to_string(),
            ])),
        };
        assert_eq!(
            FlushOutcome::interpret(&ranked, sentinel).reply(),
            "Seus sintomas: tontura\nConsulte com um especialista em: Neurologia, Otorrinolaringologia"
        );
    }
}
