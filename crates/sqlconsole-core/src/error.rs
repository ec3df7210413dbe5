use thiserror::Error;

use crate::safety::REJECTION_MESSAGE;

/// Errors returned by a [`crate::LanguageModel`].
#[derive(Debug, Error)]
pub enum LlmError {
    /// The HTTP request failed before a response arrived (DNS, TLS, reset, …).
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("LLM service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no choices or an empty message.
    #[error("LLM returned an empty completion")]
    EmptyCompletion,

    /// No API key was configured.
    #[error("LLM API key is not configured (set GROQ_API_KEY)")]
    MissingApiKey,
}

/// Errors returned by a [`crate::QueryGateway`].
#[derive(Debug, Error)]
pub enum GatewayClientError {
    /// The gateway could not be reached or the body could not be read.
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-200 status; `detail` is its error text.
    #[error("gateway returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// A 200 response whose body was not a JSON array of objects.
    #[error("gateway returned an unexpected body: {0}")]
    InvalidBody(String),

    /// The configured gateway URL is not a valid URL.
    #[error("invalid gateway URL `{url}`: {message}")]
    InvalidUrl { url: String, message: String },
}

impl GatewayClientError {
    /// `true` when the gateway rejected the statement at its safety gate.
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            GatewayClientError::Status { status: 400, detail } if detail == REJECTION_MESSAGE
        )
    }
}

/// Misuse of the orchestrator by its caller.
///
/// Model and gateway failures never surface here; they become error turns.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("no chat turn at index {0}")]
    NoSuchTurn(usize),

    #[error("chat turn {0} is not a query result")]
    NotAResult(usize),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_the_gate_message_counts_as_forbidden() {
        let gate = GatewayClientError::Status { status: 400, detail: REJECTION_MESSAGE.into() };
        assert!(gate.is_forbidden());

        let malformed = GatewayClientError::Status {
            status: 400,
            detail: "Failed to deserialize query string: duplicate field `sql`".into(),
        };
        assert!(!malformed.is_forbidden());

        let server = GatewayClientError::Status { status: 500, detail: REJECTION_MESSAGE.into() };
        assert!(!server.is_forbidden());
    }
}
