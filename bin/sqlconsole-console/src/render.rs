//! Plain-terminal rendering of chat turns.

use colored::Colorize;
use sqlconsole_core::record::{cell_text, column_names};
use sqlconsole_core::{ChatSession, ChatTurn, Record, TurnKind};

/// Cells longer than this are cut and end with `…`.
const MAX_CELL_WIDTH: usize = 60;

/// Renders `turn`. `result_number` is the 1-based display number of a result
/// turn; `result_number_of` maps a turn index to that number for insights.
pub fn render_turn(
    turn: &ChatTurn,
    result_number: Option<usize>,
    result_number_of: impl Fn(usize) -> Option<usize>,
) -> String {
    match &turn.kind {
        TurnKind::Text(text) => format!("{} {}", "you ›".bold().cyan(), text),
        TurnKind::Sql(sql) => format!("{}\n{}", "🧾 Generated SQL".bold(), indent(sql)),
        TurnKind::ResultSet { rows, .. } => {
            let number = result_number.unwrap_or_default();
            format!(
                "{}\n{}\n{}",
                format!("📊 Query Result #{number}").bold().green(),
                indent(&format_table(rows)),
                format!("   (/analyze {number} for insights)").dimmed(),
            )
        }
        TurnKind::Insight { of, text } => {
            let heading = match result_number_of(*of) {
                Some(n) => format!("🧠 AI Insights (result #{n})"),
                None => "🧠 AI Insights".to_owned(),
            };
            format!("{}\n{}", heading.bold().magenta(), indent(text))
        }
        TurnKind::Error(message) => format!("{}\n{}", "⚠ Error".bold().red(), indent(message).red()),
    }
}

/// Renders every turn of `session` in order, separated by blank lines.
pub fn render_session(session: &ChatSession) -> String {
    render_from(session, 0)
}

/// Renders the turns from index `start` on; results keep their session-wide numbers.
pub fn render_from(session: &ChatSession, start: usize) -> String {
    let results = session.result_indices();
    let number_of = |index: usize| results.iter().position(|&i| i == index).map(|p| p + 1);

    session
        .turns()
        .iter()
        .enumerate()
        .skip(start)
        .map(|(index, turn)| render_turn(turn, number_of(index), number_of))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn banner(model: &str, api_url: &str) -> String {
    format!(
        "{}\n{}\n\n{}\n  - SQL Agent job monitoring\n  - database object validation\n  - failure analysis\n\n{}",
        "SQL Server AI Console".bold(),
        format!("model {model} · gateway {api_url}").dimmed(),
        "Ask about:",
        "Type /help for commands.".dimmed(),
    )
}

/// Column-aligned text table with a row-count footer.
pub fn format_table(rows: &[Record]) -> String {
    let columns = column_names(rows);
    if columns.is_empty() {
        return "(0 rows)".to_owned();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(&row.get(c).map(cell_text).unwrap_or_default()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = Vec::with_capacity(rows.len() + 3);
    out.push(join_row(&columns, &widths));
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for row in &cells {
        out.push(join_row(row, &widths));
    }
    let noun = if rows.len() == 1 { "row" } else { "rows" };
    out.push(format!("({} {noun})", rows.len()));
    out.join("\n")
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_owned()
}

fn truncate(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("   {l}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn table_aligns_columns() {
        let rows = vec![
            record(json!({ "Job Name": "backup", "Status": "Failed" })),
            record(json!({ "Job Name": "index maintenance", "Status": null })),
        ];
        let table = format_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Job Name          | Status");
        assert_eq!(lines[1], "------------------+-------");
        assert_eq!(lines[2], "backup            | Failed");
        assert_eq!(lines[3], "index maintenance | NULL");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn empty_result_renders_zero_rows() {
        assert_eq!(format_table(&[]), "(0 rows)");
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(100);
        let table = format_table(&[record(json!({ "message": long }))]);
        let data_line = table.lines().nth(2).unwrap();
        assert_eq!(data_line.chars().count(), MAX_CELL_WIDTH);
        assert!(data_line.ends_with('…'));
    }

    #[test]
    fn session_numbers_results_in_order() {
        let mut session = ChatSession::new();
        session.push(ChatTurn::user("q1"));
        session.push(ChatTurn::assistant(TurnKind::ResultSet {
            rows: vec![record(json!({ "x": 1 }))],
            question: "q1".into(),
        }));
        session.push(ChatTurn::assistant(TurnKind::ResultSet {
            rows: vec![record(json!({ "y": 2 }))],
            question: "q2".into(),
        }));
        session.push(ChatTurn::assistant(TurnKind::Insight { of: 2, text: "fine".into() }));

        let out = render_session(&session);
        assert!(out.contains("Query Result #1"));
        assert!(out.contains("Query Result #2"));
        assert!(out.contains("AI Insights (result #2)"));
        assert!(out.contains("you ›"));
    }

    #[test]
    fn render_from_keeps_result_numbers() {
        let mut session = ChatSession::new();
        for q in ["q1", "q2"] {
            session.push(ChatTurn::user(q));
            session.push(ChatTurn::assistant(TurnKind::ResultSet {
                rows: vec![record(json!({ "x": 1 }))],
                question: q.into(),
            }));
        }
        let out = render_from(&session, 2);
        assert!(out.contains("Query Result #2"));
        assert!(!out.contains("Query Result #1"));
        assert!(!out.contains("q1"));
    }

    #[test]
    fn error_turn_shows_message() {
        let turn = ChatTurn::assistant(TurnKind::Error("gateway returned 400: nope".into()));
        let out = render_turn(&turn, None, |_| None);
        assert!(out.contains("Error"));
        assert!(out.contains("gateway returned 400: nope"));
    }
}
