//! Intent router — asks the model what to run and runs it
//!
//! Model text → [`Intent`] → diagnostic. Failures on the model side stay
//! typed as [`RouteError`] until they are rendered for the user.

use thiserror::Error;
use tracing::{info, warn};

use netcheck_tools::{DiagnosticResult, NetworkDiagnostics};

use crate::intent::{build_prompt, Intent, IntentError};
use crate::llm::LanguageModel;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("language model request failed: {0:#}")]
    Model(anyhow::Error),
    #[error(transparent)]
    Intent(#[from] IntentError),
}

impl RouteError {
    /// Text shown to the user for this failure
    pub fn render(&self) -> String {
        match self {
            Self::Intent(IntentError::UnknownFunction(_)) => self.to_string(),
            _ => format!("Error processing request: {self}"),
        }
    }
}

/// Render the outcome of one request as the assistant's reply
pub fn render(outcome: Result<DiagnosticResult, RouteError>) -> String {
    match outcome {
        Ok(result) => result.into_message(),
        Err(e) => e.render(),
    }
}

pub struct IntentRouter {
    model: Box<dyn LanguageModel>,
    diagnostics: NetworkDiagnostics,
}

impl IntentRouter {
    pub fn new(model: Box<dyn LanguageModel>, diagnostics: NetworkDiagnostics) -> Self {
        Self { model, diagnostics }
    }

    /// Ask the model which diagnostic fits `user_message`; returns its raw text.
    pub async fn ask(&self, user_message: &str) -> Result<String, RouteError> {
        let prompt = build_prompt(user_message);
        self.model.generate(&prompt).await.map_err(|e| {
            warn!(error = ?e, "Language model request failed");
            RouteError::Model(e)
        })
    }

    /// Validate the model's decision and run the diagnostic it names.
    pub async fn act(&self, model_text: &str) -> Result<DiagnosticResult, RouteError> {
        let intent = Intent::parse(model_text).map_err(|e| {
            warn!(error = %e, "Rejected model decision");
            e
        })?;
        Ok(self.dispatch(&intent).await)
    }

    pub async fn dispatch(&self, intent: &Intent) -> DiagnosticResult {
        info!(function = intent.function_name(), "Running diagnostic");

        let result = match intent {
            Intent::PingTest { host } => self.diagnostics.ping_test(host).await,
            Intent::GatewayPingTest => self.diagnostics.gateway_ping_test().await,
        };

        match result.failure() {
            Some(kind) => info!(function = intent.function_name(), %kind, "Diagnostic failed"),
            None => info!(function = intent.function_name(), "Diagnostic succeeded"),
        }
        result
    }

    /// One full request: model round trip, validation, diagnostic, reply text.
    pub async fn handle_user_request(&self, user_message: &str) -> String {
        match self.ask(user_message).await {
            Ok(model_text) => render(self.act(&model_text).await),
            Err(e) => e.render(),
        }
    }
}
