use once_cell::sync::Lazy;
use regex::Regex;

use super::types::Delimiter;

// Stata treats any `#delimit x` other than `cr` as switching to `;`, macro
// references included, so the directive value is captured without validation.
static DELIMIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)#delimit(.*)$").unwrap());

/// Rewrite a script that may switch its statement terminator mid-stream so
/// that every statement ends at a newline.
///
/// The directive search is an explicit loop rather than recursion so that a
/// pathological number of `#delimit` switches cannot grow the stack. Text with
/// no directive comes back unchanged apart from outer trimming.
pub fn resolve_delimiters(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code.trim();
    let mut delim = Delimiter::Newline;

    loop {
        let Some(caps) = DELIMIT_RE.captures(rest) else {
            push_span(&mut out, rest, delim);
            return out;
        };
        let whole = caps.get(0).unwrap();
        let value = caps.get(1).unwrap().as_str().trim();

        push_span(&mut out, &rest[..whole.start()], delim);

        if value.is_empty() {
            // Directive with no value: not a switch. Keep the text and let the
            // backend complain about it.
            push_span(&mut out, whole.as_str(), delim);
            rest = &rest[whole.end()..];
        } else {
            delim = if value == "cr" {
                Delimiter::Newline
            } else {
                Delimiter::Semicolon
            };
            rest = rest[whole.end()..].trim();
        }
    }
}

fn push_span(out: &mut String, span: &str, delim: Delimiter) {
    match delim {
        Delimiter::Newline => out.push_str(span),
        Delimiter::Semicolon => {
            // Newlines are insignificant inside a `;` span; the semicolons
            // themselves become the statement terminators.
            for ch in span.chars() {
                match ch {
                    '\r' | '\n' => {}
                    ';' => out.push('\n'),
                    c => out.push(c),
                }
            }
        }
    }
}
