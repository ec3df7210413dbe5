//! In-memory chat history for one interactive session.
//!
//! Turns are only ever appended; [`ChatSession::clear`] drops all of them at
//! once and returns the session to [`Phase::Idle`].

use serde::Serialize;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Payload of a chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum TurnKind {
    /// A question typed by the user.
    Text(String),
    /// SQL produced by the model, exactly as it will be sent to the gateway.
    Sql(String),
    /// Rows returned by the gateway, with the question that produced them.
    ResultSet { rows: Vec<Record>, question: String },
    /// Narrative analysis of the result turn at index `of`.
    Insight { of: usize, text: String },
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    #[serde(flatten)]
    pub kind: TurnKind,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, kind: TurnKind::Text(text.into()) }
    }

    pub fn assistant(kind: TurnKind) -> Self {
        Self { role: Role::Assistant, kind }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TurnKind::Error(_))
    }
}

/// Where the session is in the question → SQL → rows → analysis flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingSqlGeneration,
    AwaitingExecution,
    Displaying,
    AwaitingAnalysis,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    phase: Phase,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn turn(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Appends `turn` and returns its index.
    pub fn push(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Drops every turn and returns to [`Phase::Idle`], whatever the current phase.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.phase = Phase::Idle;
    }

    /// Indices of all result-set turns, oldest first.
    pub fn result_indices(&self) -> Vec<usize> {
        self.turns
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(t.kind, TurnKind::ResultSet { .. }))
            .map(|(i, _)| i)
            .collect()
    }
}
