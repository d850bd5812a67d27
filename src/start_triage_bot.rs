//! Startup helpers for the triage bot.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;

use crate::analysis::{HttpSymptomAnalyzer, SymptomAnalyzer};
use crate::config::BotConfig;
use crate::conversation::ConversationRouter;
use crate::server::{self, AppState};
use crate::transport::{ChatTransport, HttpChatTransport, LogTransport};

/// Run the bot until Ctrl+C (used by the `triage-bot` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting triage bot v{}", env!("CARGO_PKG_VERSION"));

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(serve(config)) {
        tracing::error!("Bot error: {e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Build the conversation engine from config.
///
/// # Errors
/// Returns an error if a collaborator cannot be built or the config is invalid.
pub fn build_router(config: &BotConfig) -> anyhow::Result<ConversationRouter> {
    let analyzer =
        HttpSymptomAnalyzer::new(&config.analysis).context("building analysis client")?;
    tracing::info!("Analysis endpoint: {}", analyzer.endpoint());
    let analyzer: Arc<dyn SymptomAnalyzer> = Arc::new(analyzer);

    let transport: Arc<dyn ChatTransport> = match &config.transport.outbound_url {
        Some(url) => {
            tracing::info!("Relaying replies to {url}");
            Arc::new(
                HttpChatTransport::new(url, config.transport.timeout())
                    .context("building relay transport")?,
            )
        }
        None => {
            tracing::warn!("TRIAGE_OUTBOUND_URL not set, replies are only logged");
            Arc::new(LogTransport)
        }
    };

    ConversationRouter::new(
        &config.conversation,
        analyzer,
        transport,
        config.analysis.timeout(),
    )
    .context("building conversation router")
}

/// Serve the webhook gateway, then drain pending buffers on shutdown.
///
/// # Errors
/// Returns an error if the engine cannot be built or the server fails.
pub async fn serve(config: BotConfig) -> anyhow::Result<()> {
    let router = Arc::new(build_router(&config)?);
    let state = AppState::new(Arc::clone(&router));

    server::run_server_with_shutdown(state, config.server.port, shutdown_signal())
        .await
        .context("gateway failed")?;

    tracing::info!("Shutting down, flushing pending conversations");
    router.drain().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl+C handler failed: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_router_with_defaults() {
        let config = BotConfig::default();
        let router = build_router(&config);
        assert!(router.is_ok());
    }

    #[tokio::test]
    async fn test_build_router_with_relay() {
        let mut config = BotConfig::default();
        config.transport.outbound_url = Some("http://127.0.0.1:3001/send".to_string());
        assert!(build_router(&config).is_ok());
    }

    #[test]
    fn test_build_router_rejects_bad_endpoint() {
        let mut config = BotConfig::default();
        config.analysis.endpoint = "analysis service".to_string();
        assert!(build_router(&config).is_err());
    }
}
