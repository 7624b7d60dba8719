use std::io;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::ParsedClauses;
use crate::backend::StataBackend;

// A bare `if`/`in` token: at the start of the statement or preceded by
// whitespace, and followed by whitespace so that identifiers like `ingest`
// or `if_total` never split a clause.
static IF_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\A|\s)if\s").unwrap());
static IN_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\A|\s)in\s").unwrap());

/// Decompose one statement into `code [if ...] [in ...]`.
///
/// Clauses must appear in that order; an `in` clause ahead of an `if` clause
/// is a parse miss and the whole statement comes back unchanged in `code`.
/// Absent clauses are empty strings. Never fails.
pub fn parse_clauses(statement: &str) -> ParsedClauses {
    let s = statement.trim();

    let if_m = IF_TOKEN_RE.find(s);
    let in_m = match if_m {
        // The condition needs at least one character of its own before a
        // range clause can start.
        Some(m) => IN_TOKEN_RE.find_at(s, m.end()),
        None => IN_TOKEN_RE.find(s),
    };
    let first_in = IN_TOKEN_RE.find(s);

    match (if_m, in_m) {
        (Some(f), _) if first_in.is_some_and(|n| n.start() < f.start()) => ParsedClauses {
            code: s.to_string(),
            ..Default::default()
        },
        (Some(f), Some(n)) => ParsedClauses {
            code: s[..f.start()].trim().to_string(),
            condition: s[f.start()..n.start()].trim().to_string(),
            range: s[n.start()..].trim().to_string(),
        },
        (Some(f), None) => ParsedClauses {
            code: s[..f.start()].trim().to_string(),
            condition: s[f.start()..].trim().to_string(),
            range: String::new(),
        },
        (None, Some(n)) => ParsedClauses {
            code: s[..n.start()].trim().to_string(),
            condition: String::new(),
            range: s[n.start()..].trim().to_string(),
        },
        (None, None) => ParsedClauses {
            code: s.to_string(),
            ..Default::default()
        },
    }
}

/// Resolve an `in` clause into zero-based observation bounds.
///
/// `a/b` yields `(a - 1, b)`; `f` stands for the first observation and `l`
/// for the last, the latter resolved through the backend's current count.
/// A clause without `/` yields `(None, None)`: no explicit range.
pub fn resolve_range(
    range_clause: &str,
    backend: &mut dyn StataBackend,
) -> io::Result<(Option<u64>, Option<u64>)> {
    let body = range_clause.trim();
    let body = body.strip_prefix("in ").unwrap_or(body).trim();

    let Some((start, end)) = body.split_once('/') else {
        return Ok((None, None));
    };

    let start = match start.trim() {
        "f" => 1,
        s => parse_bound(s)?,
    };
    let end = match end.trim() {
        "l" => backend.count()?,
        s => parse_bound(s)?,
    };

    Ok((Some(start.saturating_sub(1)), Some(end)))
}

fn parse_bound(s: &str) -> io::Result<u64> {
    s.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid observation bound: {:?}", s),
        )
    })
}
