mod console;
mod selvar;

use std::io;

pub use console::StataSession;
pub use selvar::{with_selection, SelVar};

/// The capabilities this crate consumes from an execution backend.
///
/// The preprocessing pipeline itself is pure; only `last`-range resolution and
/// selection-variable materialization reach through this trait. Each
/// invocation is a synchronous round-trip to a single-writer Stata session, so
/// implementations take `&mut self` and need no internal locking.
pub trait StataBackend {
    /// Execute one statement or atomic block. Returns the captured output and
    /// the Stata return code (0 on success). `quietly` suppresses the output.
    fn run(&mut self, cmd: &str, quietly: bool) -> io::Result<(String, i32)>;

    /// Current number of observations (`_N`).
    fn count(&mut self) -> io::Result<u64>;

    /// Materialize `condition` as a 1/0 indicator under a backend-allocated
    /// scratch name, and return that name.
    fn scratch_indicator(&mut self, condition: &str) -> io::Result<String>;

    /// Best-effort drop of a variable; dropping a name that never existed is
    /// not an error.
    fn drop_var(&mut self, name: &str) -> io::Result<()>;

    /// Value of a local macro, empty when unset.
    fn local_macro(&mut self, name: &str) -> io::Result<String>;

    /// Value of a global macro, empty when unset.
    fn global_macro(&mut self, name: &str) -> io::Result<String>;
}

/// Expand a macro reference through the backend: `` `name' `` and `$_name`
/// read a local, `$name` reads a global. Anything else is returned unchanged.
pub fn resolve_macro(backend: &mut dyn StataBackend, token: &str) -> io::Result<String> {
    let token = token.trim();

    if let Some(name) = token
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return backend.local_macro(name);
    }
    if let Some(name) = token.strip_prefix("$_") {
        return backend.local_macro(name);
    }
    if let Some(name) = token.strip_prefix('$') {
        return backend.global_macro(name);
    }
    Ok(token.to_string())
}
