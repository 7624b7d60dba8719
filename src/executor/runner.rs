use std::io;

use tracing::debug;

use crate::backend::StataBackend;
use crate::parser::{preprocess, BlockKind, StatementUnit, UnitKind};

/// Throwaway program used to wrap multi-line simple runs; defining and
/// invoking a program suppresses the per-command echo.
const WRAPPER_PROGRAM: &str = "__stata_preproc_cell";

/// Preprocess `raw` and run each unit without command echo, returning the
/// combined output in source order.
pub fn run_noecho(backend: &mut dyn StataBackend, raw: &str) -> io::Result<String> {
    let mut output = String::new();
    for unit in preprocess(raw) {
        debug!(kind = ?unit.kind, lines = unit.line_count(), "running unit");
        let out = match unit.kind {
            // `quietly` would swallow all mata output, so mata runs loud.
            UnitKind::Block(BlockKind::Mata) => backend.run(&unit.text, false)?.0,
            UnitKind::Block(BlockKind::Program) | UnitKind::Block(BlockKind::Python) => {
                backend.run(&unit.text, true)?.0
            }
            UnitKind::Block(BlockKind::Loop) => run_wrapped(backend, &unit.text)?,
            UnitKind::Simple => run_simple(backend, &unit)?,
        };
        output.push_str(&out);
    }
    Ok(output)
}

/// A single line runs inline to avoid spurious blank output; a longer run is
/// wrapped in the throwaway program.
fn run_simple(backend: &mut dyn StataBackend, unit: &StatementUnit) -> io::Result<String> {
    if unit.line_count() <= 1 {
        Ok(backend.run(&unit.text, false)?.0)
    } else {
        run_wrapped(backend, &unit.text)
    }
}

fn run_wrapped(backend: &mut dyn StataBackend, body: &str) -> io::Result<String> {
    let define = format!("program {}\n{}\nend", WRAPPER_PROGRAM, body);
    backend.run(&define, true)?;

    // The definition now exists in the session; drop it even when the
    // invocation fails, or it would shadow the next cell's wrapper.
    let result = backend.run(WRAPPER_PROGRAM, false);
    backend.run(&format!("program drop {}", WRAPPER_PROGRAM), true)?;

    result.map(|(out, _)| out)
}
