use super::cleaner::{normalize_whitespace, strip_comments};
use super::delimiter::resolve_delimiters;
use super::segmenter::segment;
use super::types::StatementUnit;

/// Resolve custom delimiters, strip multi-line comments and normalize
/// whitespace. The result uses newline as the sole statement separator.
pub fn clean_code(raw: &str) -> String {
    let code = resolve_delimiters(raw);
    let code = strip_comments(&code);
    normalize_whitespace(&code)
}

/// Full pipeline: clean `raw` and group the result into executable units,
/// simple runs and atomic definition blocks, in source order.
pub fn preprocess(raw: &str) -> Vec<StatementUnit> {
    segment(&clean_code(raw))
}
