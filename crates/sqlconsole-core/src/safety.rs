//! Keyword blacklist applied to every SQL string before execution.
//!
//! The check is purely lexical: the text is uppercased and rejected when any
//! forbidden keyword appears as a substring anywhere, including inside string
//! literals, comments and identifiers. Over-blocking is expected. Mutating
//! statements that avoid these literals (`CALL proc()`, for instance) pass.
//! This is a known-weak boundary, not a parser.

/// Keywords whose presence anywhere in a statement rejects it.
pub const FORBIDDEN_KEYWORDS: [&str; 7] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "EXEC",
];

/// Client-facing message returned when the gate rejects a statement.
pub const REJECTION_MESSAGE: &str = "Only SELECT queries are allowed.";

/// Returns the first forbidden keyword contained in `sql`, if any.
pub fn forbidden_keyword(sql: &str) -> Option<&'static str> {
    let upper = sql.to_uppercase();
    FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| upper.contains(keyword))
}

/// `true` when `sql` contains none of [`FORBIDDEN_KEYWORDS`] (case-insensitive).
pub fn is_safe(sql: &str) -> bool {
    forbidden_keyword(sql).is_none()
}
