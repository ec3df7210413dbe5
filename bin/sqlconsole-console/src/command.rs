//! Parsing of one line of console input.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text: a question for the model.
    Ask(String),
    /// `/analyze [n]`: analyse result `n` (1-based, in display order), or the latest.
    Analyze(Option<usize>),
    History,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Ask(line.to_owned());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();
        match (name.as_str(), arg) {
            ("analyze" | "analyse" | "a", None) => Command::Analyze(None),
            ("analyze" | "analyse" | "a", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Analyze(Some(n)),
                _ => Command::Unknown(line.to_owned()),
            },
            ("history" | "h", None) => Command::History,
            ("clear" | "c", None) => Command::Clear,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

/// Turn index that `/analyze n` refers to, given the session's result-turn
/// indices in display order. `None` picks the latest result.
pub fn result_turn(results: &[usize], n: Option<usize>) -> Option<usize> {
    match n {
        Some(n) => results.get(n.checked_sub(1)?).copied(),
        None => results.last().copied(),
    }
}

pub const HELP: &str = "\
Type a question in plain language, for example:
  which SQL Agent jobs failed in the last 24 hours?

Commands:
  /analyze [n]  analyse result n (default: the latest result)
  /history      show the whole conversation again
  /clear        clear the conversation
  /help         show this help
  /quit         exit";
