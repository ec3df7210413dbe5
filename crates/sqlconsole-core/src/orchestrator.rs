//! Drives one chat session: question → SQL → rows → optional analysis.
//!
//! Every model or gateway failure is recorded as an error turn and the session
//! stays usable; nothing is retried. Calls are awaited one after another, so a
//! slow model or gateway blocks only this session.

use tracing::{info, warn};

use crate::error::OrchestratorError;
use crate::gateway::QueryGateway;
use crate::llm::LanguageModel;
use crate::prompt;
use crate::session::{ChatSession, ChatTurn, Phase, TurnKind};

pub struct Orchestrator<L, G> {
    llm: L,
    gateway: G,
    model: String,
    session: ChatSession,
}

impl<L: LanguageModel, G: QueryGateway> Orchestrator<L, G> {
    pub fn new(llm: L, gateway: G, model: impl Into<String>) -> Self {
        Self { llm, gateway, model: model.into(), session: ChatSession::new() }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Handles one user question and returns the turns it appended.
    ///
    /// The generated SQL is recorded unconditionally and sent to the gateway
    /// as-is; the model's output is not checked for being SQL.
    pub async fn ask(&mut self, question: &str) -> &[ChatTurn] {
        let start = self.session.len();
        self.session.push(ChatTurn::user(question));
        self.session.set_phase(Phase::AwaitingSqlGeneration);

        let request = prompt::sql_generation_request(&self.model, question);
        let sql = match self.llm.complete(request).await {
            Ok(text) => text.trim().to_owned(),
            Err(e) => {
                warn!(error = %e, "SQL generation failed");
                self.fail(e.to_string());
                return &self.session.turns()[start..];
            }
        };

        info!(sql_len = sql.len(), "SQL generated");
        self.session.push(ChatTurn::assistant(TurnKind::Sql(sql.clone())));
        self.session.set_phase(Phase::AwaitingExecution);

        match self.gateway.run_query(&sql).await {
            Ok(rows) => {
                info!(rows = rows.len(), "query executed");
                self.session.push(ChatTurn::assistant(TurnKind::ResultSet {
                    rows,
                    question: question.to_owned(),
                }));
                self.session.set_phase(Phase::Displaying);
            }
            Err(e) => {
                warn!(error = %e, "query execution failed");
                self.fail(e.to_string());
            }
        }

        &self.session.turns()[start..]
    }

    /// Asks the model to narrate the result turn at `index`.
    ///
    /// On model failure an error turn is appended instead; the result turn is
    /// left untouched either way.
    pub async fn analyze(&mut self, index: usize) -> Result<&ChatTurn, OrchestratorError> {
        let (rows, question) = match self.session.turn(index).map(|t| &t.kind) {
            Some(TurnKind::ResultSet { rows, question }) => (rows.clone(), question.clone()),
            Some(_) => return Err(OrchestratorError::NotAResult(index)),
            None => return Err(OrchestratorError::NoSuchTurn(index)),
        };

        self.session.set_phase(Phase::AwaitingAnalysis);
        let request = prompt::analysis_request(&self.model, &question, &rows);
        let turn = match self.llm.complete(request).await {
            Ok(text) => ChatTurn::assistant(TurnKind::Insight { of: index, text }),
            Err(e) => {
                warn!(error = %e, turn = index, "result analysis failed");
                ChatTurn::assistant(TurnKind::Error(format!("analysis failed: {e}")))
            }
        };
        let appended = self.session.push(turn);
        self.session.set_phase(Phase::Displaying);

        Ok(&self.session.turns()[appended])
    }

    /// Empties the history and returns to [`Phase::Idle`].
    pub fn clear(&mut self) {
        self.session.clear();
    }

    fn fail(&mut self, message: String) {
        self.session.push(ChatTurn::assistant(TurnKind::Error(message)));
        self.session.set_phase(Phase::Idle);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{GatewayClientError, LlmError};
    use crate::llm::ChatCompletionRequest;
    use crate::record::Record;
    use crate::safety::{REJECTION_MESSAGE, is_safe};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Replies with queued results and records every request.
    #[derive(Default)]
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedModel {
        fn replying(replies: Vec<Result<String, LlmError>>) -> Self {
            Self { replies: Mutex::new(replies.into()), requests: Mutex::default() }
        }
    }

    impl LanguageModel for ScriptedModel {
        async fn complete(&self, request: ChatCompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyCompletion))
        }
    }

    /// Applies the safety gate like the real gateway, then answers with fixed rows.
    struct FakeGateway {
        rows: Vec<Record>,
        executed: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn with_rows(rows: Vec<Record>) -> Self {
            Self { rows, executed: Mutex::default() }
        }
    }

    impl QueryGateway for FakeGateway {
        async fn run_query(&self, sql: &str) -> Result<Vec<Record>, GatewayClientError> {
            if !is_safe(sql) {
                return Err(GatewayClientError::Status {
                    status: 400,
                    detail: REJECTION_MESSAGE.into(),
                });
            }
            self.executed.lock().unwrap().push(sql.to_owned());
            Ok(self.rows.clone())
        }
    }

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn successful_question_appends_three_turns() {
        let model = ScriptedModel::replying(vec![Ok("  SELECT name FROM sysjobs \n".into())]);
        let gateway = FakeGateway::with_rows(vec![record(json!({ "name": "backup" }))]);
        let mut orch = Orchestrator::new(model, gateway, "test-model");

        let appended = orch.ask("list jobs").await;
        assert_eq!(appended.len(), 3);
        assert_eq!(appended[0], ChatTurn::user("list jobs"));
        assert_eq!(appended[1].kind, TurnKind::Sql("SELECT name FROM sysjobs".into()));
        match &appended[2].kind {
            TurnKind::ResultSet { rows, question } => {
                assert_eq!(rows[0]["name"], "backup");
                assert_eq!(question, "list jobs");
            }
            other => panic!("unexpected turn: {other:?}"),
        }
        assert_eq!(orch.session().phase(), Phase::Displaying);
        assert_eq!(
            *orch.gateway().executed.lock().unwrap(),
            vec!["SELECT name FROM sysjobs".to_owned()]
        );
    }

    #[tokio::test]
    async fn generation_request_carries_the_question() {
        let model = ScriptedModel::replying(vec![Ok("SELECT 1".into())]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");
        orch.ask("failed jobs today").await;

        let requests = orch.llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], prompt::sql_generation_request("m", "failed jobs today"));
    }

    #[tokio::test]
    async fn non_sql_output_is_still_recorded_and_sent() {
        let model = ScriptedModel::replying(vec![Ok("Sure! Here is your query.".into())]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");
        let appended = orch.ask("q").await;

        assert_eq!(appended[1].kind, TurnKind::Sql("Sure! Here is your query.".into()));
        assert_eq!(orch.gateway().executed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_sql_becomes_error_turn_and_idle() {
        let model = ScriptedModel::replying(vec![Ok("DELETE FROM jobs".into())]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");

        let appended = orch.ask("remove jobs").await;
        assert_eq!(appended.len(), 3);
        assert_eq!(
            appended[2].kind,
            TurnKind::Error(format!("gateway returned 400: {REJECTION_MESSAGE}"))
        );
        assert_eq!(orch.session().phase(), Phase::Idle);
        assert!(orch.gateway().executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn replayed_sql_turn_classifies_like_a_direct_call() {
        let model = ScriptedModel::replying(vec![Ok("DROP TABLE sysjobs".into())]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");
        orch.ask("q").await;

        let TurnKind::Sql(sql) = &orch.session().turns()[1].kind else {
            panic!("expected SQL turn");
        };
        let replayed = orch.gateway().run_query(sql).await.unwrap_err();
        let direct = orch.gateway().run_query("DROP TABLE sysjobs").await.unwrap_err();
        assert_eq!(replayed.is_forbidden(), direct.is_forbidden());
        assert_eq!(replayed.to_string(), direct.to_string());
    }

    #[tokio::test]
    #[traced_test]
    async fn generation_failure_appends_error_without_sql() {
        let model = ScriptedModel::replying(vec![Err(LlmError::MissingApiKey)]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");

        let appended = orch.ask("q").await;
        assert_eq!(appended.len(), 2);
        assert!(appended[1].is_error());
        assert_eq!(orch.session().phase(), Phase::Idle);
        assert!(logs_contain("SQL generation failed"));
    }

    #[tokio::test]
    async fn session_stays_usable_after_failure() {
        let model = ScriptedModel::replying(vec![
            Ok("DELETE FROM t".into()),
            Ok("SELECT 1 AS x".into()),
        ]);
        let gateway = FakeGateway::with_rows(vec![record(json!({ "x": 1 }))]);
        let mut orch = Orchestrator::new(model, gateway, "m");

        orch.ask("first").await;
        let appended = orch.ask("second").await;
        assert!(matches!(appended[2].kind, TurnKind::ResultSet { .. }));
        assert_eq!(orch.session().len(), 6);
    }

    #[tokio::test]
    async fn analyze_appends_insight_for_result_turn() {
        let model = ScriptedModel::replying(vec![
            Ok("SELECT name FROM sysjobs".into()),
            Ok("All jobs look healthy.".into()),
        ]);
        let gateway = FakeGateway::with_rows(vec![record(json!({ "name": "backup" }))]);
        let mut orch = Orchestrator::new(model, gateway, "m");
        orch.ask("list jobs").await;

        let turn = orch.analyze(2).await.unwrap().clone();
        assert_eq!(
            turn.kind,
            TurnKind::Insight { of: 2, text: "All jobs look healthy.".into() }
        );
        assert_eq!(orch.session().phase(), Phase::Displaying);

        let requests = orch.llm.requests.lock().unwrap();
        let rows = vec![record(json!({ "name": "backup" }))];
        assert_eq!(requests[1], prompt::analysis_request("m", "list jobs", &rows));
    }

    #[tokio::test]
    async fn analysis_failure_keeps_result_turn() {
        let model = ScriptedModel::replying(vec![Ok("SELECT 1 AS x".into())]);
        let gateway = FakeGateway::with_rows(vec![record(json!({ "x": 1 }))]);
        let mut orch = Orchestrator::new(model, gateway, "m");
        orch.ask("q").await;
        let before = orch.session().turns()[2].clone();

        let turn = orch.analyze(2).await.unwrap().clone();
        assert!(turn.is_error());
        assert_eq!(orch.session().turns()[2], before);
        assert_eq!(orch.session().len(), 4);
    }

    #[tokio::test]
    async fn analyze_rejects_non_result_turns() {
        let model = ScriptedModel::replying(vec![Ok("SELECT 1".into())]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");
        orch.ask("q").await;

        assert!(matches!(orch.analyze(0).await, Err(OrchestratorError::NotAResult(0))));
        assert!(matches!(orch.analyze(99).await, Err(OrchestratorError::NoSuchTurn(99))));
    }

    #[tokio::test]
    async fn clear_after_results_empties_history() {
        let model = ScriptedModel::replying(vec![Ok("SELECT 1".into())]);
        let mut orch = Orchestrator::new(model, FakeGateway::with_rows(vec![]), "m");
        orch.ask("q").await;
        assert_eq!(orch.session().phase(), Phase::Displaying);

        orch.clear();
        assert!(orch.session().is_empty());
        assert_eq!(orch.session().phase(), Phase::Idle);
    }
}
