mod abbrev;
mod cleaner;
mod clauses;
mod delimiter;
mod preprocessor;
mod segmenter;
mod types;

pub use abbrev::starts_with_abbrev;
pub use cleaner::{normalize_whitespace, strip_comments};
pub use clauses::{parse_clauses, resolve_range};
pub use delimiter::resolve_delimiters;
pub use preprocessor::{clean_code, preprocess};
pub use segmenter::{classify_opener, segment, strip_modifiers};
pub use types::{BlockKind, Delimiter, ParsedClauses, StatementUnit, UnitKind};
