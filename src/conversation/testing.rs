//! Test doubles for the analysis and transport collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::analysis::{
    AnalysisError, AnalysisFuture, AnalysisResponse, AnalysisResult, SymptomAnalyzer,
};
use crate::conversation::ids::ConversationId;
use crate::transport::{ChatTransport, TransportError, TransportResult};

/// What the scripted analyzer does on every call.
pub enum Script {
    Respond(AnalysisResponse),
    Delayed(Duration, AnalysisResponse),
    Status(u16),
    Hang,
}

pub struct ScriptedAnalyzer {
    script: Script,
    calls: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl ScriptedAnalyzer {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

impl SymptomAnalyzer for ScriptedAnalyzer {
    fn analyze<'a>(
        &'a self,
        message: &'a str,
    ) -> AnalysisFuture<'a, AnalysisResult<AnalysisResponse>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.messages.lock().await.push(message.to_string());
            match &self.script {
                Script::Respond(response) => Ok(response.clone()),
                Script::Delayed(latency, response) => {
                    tokio::time::sleep(*latency).await;
                    Ok(response.clone())
                }
                Script::Status(status) => Err(AnalysisError::HttpStatus(*status)),
                Script::Hang => std::future::pending().await,
            }
        })
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(ConversationId, String)>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn sent(&self) -> Vec<(ConversationId, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, conversation: &ConversationId, text: &str) -> TransportResult<()> {
        self.sent
            .lock()
            .await
            .push((conversation.clone(), text.to_string()));
        if self.fail {
            return Err(TransportError::HttpStatus(502));
        }
        Ok(())
    }
}
