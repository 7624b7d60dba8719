use super::abbrev::starts_with_abbrev;
use super::types::{BlockKind, StatementUnit, UnitKind};

/// Prefix modifiers that may stack in front of a definition and must be
/// ignored when classifying a line: abbreviations of `quietly` and `noisily`,
/// plus the unabbreviated `capture` guard.
const MODIFIERS: &[(&str, &str)] = &[("quietly", "qui"), ("noisily", "n")];

/// Brace-terminated loop constructs. Everything `end`-terminated is handled
/// separately because `program` needs lookalike filtering and `mata`/`python`
/// match as whole tokens.
const LOOP_OPENERS: &[(&str, &str)] = &[
    ("forvalues", "forv"),
    ("foreach", "foreach"),
    ("while", "while"),
];

/// `program` lookalikes that share the keyword but do not open a definition.
fn is_program_lookalike(stripped: &str) -> bool {
    stripped == "program di"
        || stripped == "program dir"
        || stripped.starts_with("program drop ")
        || starts_with_abbrev(stripped, "program list", "program l", true)
}

/// Drop stacked leading modifiers from a classification copy of the line.
/// The stored line is never touched.
pub fn strip_modifiers(mut stripped: &str) -> &str {
    loop {
        let is_modifier = stripped.starts_with("capture ")
            || MODIFIERS
                .iter()
                .any(|(full, shortest)| starts_with_abbrev(stripped, full, shortest, true));
        if !is_modifier {
            return stripped;
        }
        match stripped.split_once(char::is_whitespace) {
            Some((_, rest)) => stripped = rest.trim_start(),
            None => return stripped,
        }
    }
}

/// Classify a whitespace-trimmed line as an atomic block opener.
pub fn classify_opener(stripped: &str) -> Option<BlockKind> {
    let cs = strip_modifiers(stripped);

    if starts_with_abbrev(cs, "program", "pr", true) && !is_program_lookalike(cs) {
        return Some(BlockKind::Program);
    }
    // Sub-language entries open a block regardless of modifiers, with or
    // without the trailing colon.
    if cs == "mata" || cs == "mata:" {
        return Some(BlockKind::Mata);
    }
    if cs == "python" || cs == "python:" {
        return Some(BlockKind::Python);
    }
    if cs.ends_with('{')
        && LOOP_OPENERS
            .iter()
            .any(|(full, shortest)| starts_with_abbrev(cs, full, shortest, true))
    {
        return Some(BlockKind::Loop);
    }
    None
}

enum State<'a> {
    Simple(Vec<&'a str>),
    InBlock(BlockKind, Vec<&'a str>),
}

/// Walk normalized lines and group them into maximal runs of simple
/// statements versus atomic definition blocks, in source order.
///
/// Opener detection runs on the modifier-stripped line; block membership and
/// terminator detection use the literal trimmed line. The first terminator
/// closes a block; a block still open at end of input is flushed as-is rather
/// than dropped.
pub fn segment(clean_code: &str) -> Vec<StatementUnit> {
    let mut units = Vec::new();
    let mut state = State::Simple(Vec::new());

    for line in clean_code.lines() {
        let stripped = line.trim();

        state = match state {
            State::Simple(mut pending) => {
                if let Some(kind) = classify_opener(stripped) {
                    flush_simple(&mut units, pending);
                    State::InBlock(kind, vec![line])
                } else {
                    pending.push(line);
                    State::Simple(pending)
                }
            }
            State::InBlock(kind, mut lines) => {
                lines.push(line);
                if stripped == kind.terminator() {
                    units.push(StatementUnit {
                        text: lines.join("\n"),
                        kind: UnitKind::Block(kind),
                    });
                    State::Simple(Vec::new())
                } else {
                    State::InBlock(kind, lines)
                }
            }
        };
    }

    match state {
        State::Simple(pending) => flush_simple(&mut units, pending),
        State::InBlock(kind, lines) => units.push(StatementUnit {
            text: lines.join("\n"),
            kind: UnitKind::Block(kind),
        }),
    }

    units
}

fn flush_simple(units: &mut Vec<StatementUnit>, pending: Vec<&str>) {
    if pending.is_empty() {
        return;
    }
    units.push(StatementUnit {
        text: pending.join("\n"),
        kind: UnitKind::Simple,
    });
}
