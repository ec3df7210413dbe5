//! Prompt templates for SQL generation and result analysis.
//!
//! Both templates are fixed text with the caller's question (and, for
//! analysis, the result set) embedded verbatim. The model's answer is not
//! validated beyond trimming; whatever comes back is treated as one SQL
//! statement.

use crate::llm::{ChatCompletionRequest, ChatMessage};
use crate::record::Record;

const SQL_SYSTEM_MESSAGE: &str = "You are a SQL Server assistant.";
const ANALYSIS_SYSTEM_MESSAGE: &str = "You analyze SQL results and provide enterprise insights.";

const SQL_TEMPERATURE: f32 = 0.0;
const SQL_MAX_TOKENS: u32 = 2000;
const ANALYSIS_TEMPERATURE: f32 = 0.2;
const ANALYSIS_MAX_TOKENS: u32 = 1024;

const SQL_RULES: &str = r#"You are a senior SQL Server Database Engineer and Production DBA.

You generate SQL queries ONLY for Microsoft SQL Server.

STRICT RULES:

1. Database Context:
- Target database: SQL Server
- System tables may include msdb.dbo.sysjobs, msdb.dbo.sysjobhistory, sysjobactivity, etc.
- Always assume SQL Server syntax.

2. Safety Rules:
- NEVER generate INSERT, UPDATE, DELETE, DROP, TRUNCATE, ALTER.
- Generate READ-ONLY queries (SELECT only).
- Do not modify data under any circumstances.

3. SQL Server Intelligence Rules:
- run_date and run_time columns in sysjobhistory are INT.
- When performing arithmetic like run_date * 1000000 + run_time:
    ALWAYS CAST run_date to BIGINT to prevent arithmetic overflow.
    Example:
    CAST(run_date AS BIGINT) * 1000000 + run_time
- Prefer using msdb.dbo.agent_datetime(run_date, run_time)
    instead of manual date math whenever possible.
- Never assume automatic type promotion in SQL Server.

4. Query Design Rules:
- Optimize joins.
- Use appropriate WHERE clauses.
- Avoid SELECT *.
- Use explicit column names.
- Use proper aliasing.

5. SQL Agent Job Questions:
- If the question asks for job names, return the names of enabled jobs.
- If the question asks for a list of jobs, return the job count together with the names.

6. Job Monitoring Intelligence:
- step_id = 0 represents the job-level summary.
- step_id > 0 represents step-level details.
- run_status values:
    0 = Failed
    1 = Succeeded
    2 = Retry
    3 = Canceled
- Always decode run_status into readable text using CASE.
- For job status or recent job runs, follow this example:
    SELECT
    j.name AS [Job Name],
    msdb.dbo.agent_datetime(jh.run_date, jh.run_time) AS [Last Run DateTime],
    CASE jh.run_status
        WHEN 0 THEN 'Failed'
        WHEN 1 THEN 'Succeeded'
        WHEN 2 THEN 'Retry'
        WHEN 3 THEN 'Canceled'
        ELSE 'Unknown'
    END AS [Run Status],
    jh.run_duration AS [Duration (HHMMSS)]
    FROM msdb.dbo.sysjobs j
    JOIN msdb.dbo.sysjobhistory jh ON j.job_id = jh.job_id
    WHERE jh.step_id = 0
    ORDER BY [Last Run DateTime] DESC;

7. Failed Job Error Messages:
- To fetch only the error message of a failed job run, follow this example:
    SELECT TOP 1
        h.message
    FROM msdb.dbo.sysjobhistory h
    WHERE h.run_status = 0
    AND h.step_id > 0
    ORDER BY h.run_date DESC, h.run_time DESC;

8. Output Rules:
- Return ONLY valid SQL query.
- No explanation.
- No markdown.
- No comments.
- No backticks.
- Output must be directly executable in SQL Server.

9. Performance Awareness:
- Avoid unnecessary subqueries.
- Avoid arithmetic overflow.
- Avoid non-SARGable conditions.

10. Parameter Handling:
- Do NOT use SQL variables like @VariableName.
- Do NOT use DECLARE.
- Do NOT use parameter placeholders.
- Always inject user-provided values directly into WHERE clauses.
- Wrap string values in single quotes.

You are operating in a production environment.
Accuracy and safety are critical."#;

/// Prompt asking the model to translate `question` into a single SQL statement.
pub fn build_sql_prompt(question: &str) -> String {
    format!("{SQL_RULES}\n\nQuestion:\n{question}\n")
}

/// Prompt asking the model to narrate `rows`, the result of answering `question`.
pub fn build_analysis_prompt(question: &str, rows: &[Record]) -> String {
    // Serialising a Vec of JSON maps cannot fail.
    let result = serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_owned());
    format!(
        "You are a senior SQL Server monitoring and optimization expert.\n\
         \n\
         Original Question:\n\
         {question}\n\
         \n\
         Query Result:\n\
         {result}\n\
         \n\
         Provide:\n\
         1. Key insights\n\
         2. Potential risks\n\
         3. Suggested next steps\n\
         4. Optimization ideas\n\
         5. If job failures exist, analyze root cause\n\
         \n\
         Respond professionally.\n"
    )
}

/// Complete chat request for SQL generation (deterministic sampling).
pub fn sql_generation_request(model: &str, question: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_owned(),
        messages: vec![
            ChatMessage::system(SQL_SYSTEM_MESSAGE),
            ChatMessage::user(build_sql_prompt(question)),
        ],
        temperature: SQL_TEMPERATURE,
        max_tokens: SQL_MAX_TOKENS,
    }
}

/// Complete chat request for narrating a result set.
pub fn analysis_request(model: &str, question: &str, rows: &[Record]) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_owned(),
        messages: vec![
            ChatMessage::system(ANALYSIS_SYSTEM_MESSAGE),
            ChatMessage::user(build_analysis_prompt(question, rows)),
        ],
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: ANALYSIS_MAX_TOKENS,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn sql_prompt_ends_with_verbatim_question() {
        let prompt = build_sql_prompt("Which jobs failed last night?");
        assert!(prompt.ends_with("Question:\nWhich jobs failed last night?\n"));
        assert!(prompt.contains("Return ONLY valid SQL query."));
        assert!(prompt.contains("msdb.dbo.agent_datetime"));
    }

    #[test]
    fn sql_prompt_is_deterministic() {
        assert_eq!(build_sql_prompt("q"), build_sql_prompt("q"));
    }

    #[test]
    fn analysis_prompt_embeds_question_and_rows() {
        let rows = vec![
            json!({ "Job Name": "nightly backup", "Run Status": "Failed" })
                .as_object()
                .cloned()
                .unwrap(),
        ];
        let prompt = build_analysis_prompt("status of backups", &rows);
        assert!(prompt.contains("Original Question:\nstatus of backups\n"));
        assert!(prompt.contains("\"Job Name\": \"nightly backup\""));
        assert!(prompt.contains("5. If job failures exist, analyze root cause"));
    }

    #[test]
    fn analysis_prompt_with_no_rows() {
        let prompt = build_analysis_prompt("anything?", &[]);
        assert!(prompt.contains("Query Result:\n[]\n"));
    }

    #[test]
    fn generation_request_uses_zero_temperature() {
        let req = sql_generation_request("m", "q");
        assert_eq!(req.model, "m");
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.max_tokens, 2000);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].content, build_sql_prompt("q"));
    }

    #[test]
    fn analysis_request_settings() {
        let req = analysis_request("m", "q", &[]);
        assert_eq!(req.temperature, 0.2);
        assert_eq!(req.max_tokens, 1024);
        assert_eq!(req.messages[0].content, ANALYSIS_SYSTEM_MESSAGE);
    }
}
