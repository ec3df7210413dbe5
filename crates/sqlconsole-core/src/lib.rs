//! Shared building blocks for the sqlconsole gateway and console.
//!
//! - [`safety`]: keyword blacklist applied before any SQL reaches a database.
//! - [`prompt`]: instruction templates sent to the language model.
//! - [`llm`]: OpenAI-compatible chat-completion client.
//! - [`gateway`]: HTTP client for the query gateway.
//! - [`session`] / [`orchestrator`]: chat history and the per-session flow
//!   question → SQL → rows → optional analysis.

pub mod error;
pub mod gateway;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod record;
pub mod safety;
pub mod session;

pub use error::{GatewayClientError, LlmError, OrchestratorError};
pub use gateway::{HttpGateway, QueryGateway};
pub use llm::{LanguageModel, OpenAiClient};
pub use orchestrator::Orchestrator;
pub use record::Record;
pub use safety::{FORBIDDEN_KEYWORDS, REJECTION_MESSAGE, forbidden_keyword, is_safe};
pub use session::{ChatSession, ChatTurn, Phase, Role, TurnKind};
