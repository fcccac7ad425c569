//! Validates an operation request, composes its prompt and forwards it to
//! the completion service.

use std::sync::Arc;

use crate::completion::Completer;
use crate::consts::{NO_RESULT, PROCESSING_ERROR};
use crate::prompts::{Operation, PromptTable};

/// One editor request as submitted by the front end.
///
/// `find`, `replace` and `entities` are carried for the client's benefit but
/// never reach the prompt.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub operation: Option<String>,
    pub text: Option<String>,
    pub find: Option<String>,
    pub replace: Option<String>,
    pub entities: Option<String>,
}

impl DispatchRequest {
    pub fn new(operation: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Why a request produced no completion.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// `operation` or `text` absent or empty.
    #[error("Missing data")]
    MissingData,
    /// `operation` outside the allow-list.
    #[error("Invalid operation")]
    InvalidOperation(String),
    /// Anything that went wrong talking to the completion service.
    #[error("Error processing request")]
    Upstream(#[source] anyhow::Error),
}

impl DispatchError {
    /// Input problems the caller can fix, as opposed to upstream failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::MissingData | Self::InvalidOperation(_))
    }
}

/// A validated request that passed the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub operation: Operation,
    pub result: String,
}

/// Stateless operation dispatcher. Holds only its injected collaborators.
pub struct Dispatcher {
    prompts: PromptTable,
    completer: Arc<dyn Completer>,
}

impl Dispatcher {
    pub fn new(prompts: PromptTable, completer: Arc<dyn Completer>) -> Self {
        Self { prompts, completer }
    }

    /// Check presence and the allow-list. Missing data is reported before an
    /// invalid operation.
    pub fn validate<'a>(&self, request: &'a DispatchRequest) -> Result<(Operation, &'a str), DispatchError> {
        let (Some(label), Some(text)) = (
            request.operation.as_deref().filter(|s| !s.is_empty()),
            request.text.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(DispatchError::MissingData);
        };

        let operation = Operation::from_label(label)
            .ok_or_else(|| DispatchError::InvalidOperation(label.to_string()))?;

        Ok((operation, text))
    }

    /// Run one request end to end.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<Dispatched, DispatchError> {
        let (operation, text) = self.validate(request)?;

        if request.find.is_some() || request.replace.is_some() || request.entities.is_some() {
            tracing::debug!(%operation, "auxiliary fields present; not forwarded");
        }

        let prompt = self.prompts.compose(operation, text);
        let completion = self
            .completer
            .complete(&prompt)
            .await
            .map_err(DispatchError::Upstream)?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                %operation,
                input = usage.input_tokens,
                output = usage.output_tokens,
                "completion tokens"
            );
        }

        let result = completion
            .content
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| NO_RESULT.to_string());

        Ok(Dispatched { operation, result })
    }

    /// Like [`dispatch`](Self::dispatch), but collapses upstream failures
    /// into the generic message. Only input problems remain errors.
    pub async fn respond(&self, request: &DispatchRequest) -> Result<String, DispatchError> {
        match self.dispatch(request).await {
            Ok(dispatched) => Ok(dispatched.result),
            Err(DispatchError::Upstream(e)) => {
                tracing::error!(error = %format!("{e:#}"), "completion request failed");
                Ok(PROCESSING_ERROR.to_string())
            }
            Err(e) => Err(e),
        }
    }
}
