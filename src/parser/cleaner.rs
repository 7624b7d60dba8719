use once_cell::sync::Lazy;
use regex::Regex;

// `///` joins a wrapped statement: the span runs to the end of the physical
// line, trailing newline included. `/* ... */` is matched non-greedily so the
// first `*/` closes the span; Stata does not nest block comments.
static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"///.*(\n|\r)|/\*(?s:.*?)\*/").unwrap());

static LEFT_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]+").unwrap());
static MULTI_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Remove line-continuation and block comment spans, each replaced by one
/// space so token separation survives the removed region.
pub fn strip_comments(code: &str) -> String {
    COMMENT_RE.replace_all(code, " ").into_owned()
}

/// Strip whitespace following a newline, then collapse interior space runs.
/// Idempotent.
pub fn normalize_whitespace(code: &str) -> String {
    let code = LEFT_WS_RE.replace_all(code, "\n");
    MULTI_WS_RE.replace_all(&code, " ").into_owned()
}
