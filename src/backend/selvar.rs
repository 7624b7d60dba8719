use std::io;

use tracing::warn;

use super::StataBackend;

/// A selection indicator materialized in the backend for one operation.
///
/// The variable name comes from the backend's scratch allocator, never from
/// the user, so it cannot collide with session state. An empty condition
/// allocates nothing and `release` is then a no-op.
#[derive(Debug)]
pub struct SelVar {
    varname: Option<String>,
}

impl SelVar {
    /// Materialize `condition` (with or without its leading `if`) as a 1/0
    /// indicator column.
    pub fn create(condition: &str, backend: &mut dyn StataBackend) -> io::Result<Self> {
        let condition = condition.trim();
        let condition = condition.strip_prefix("if ").unwrap_or(condition).trim();

        let varname = if condition.is_empty() {
            None
        } else {
            Some(backend.scratch_indicator(condition)?)
        };
        Ok(Self { varname })
    }

    /// Name of the indicator variable, if one was created.
    pub fn varname(&self) -> Option<&str> {
        self.varname.as_deref()
    }

    /// Drop the indicator. Idempotent: the first call issues at most one drop,
    /// later calls do nothing. A drop failure is logged, not raised — the
    /// variable may never have been created.
    pub fn release(&mut self, backend: &mut dyn StataBackend) {
        if let Some(name) = self.varname.take() {
            if let Err(err) = backend.drop_var(&name) {
                warn!(%name, %err, "failed to drop selection indicator");
            }
        }
    }
}

/// Scoped selection: create the indicator, hand it to `body`, and release it
/// on every exit path, error included. Leaked scratch variables are visible in
/// the user's session, so the drop is unconditional.
pub fn with_selection<T>(
    backend: &mut dyn StataBackend,
    condition: &str,
    body: impl FnOnce(&mut dyn StataBackend, Option<&str>) -> io::Result<T>,
) -> io::Result<T> {
    let mut sel = SelVar::create(condition, backend)?;
    let varname = sel.varname.clone();
    let result = body(backend, varname.as_deref());
    sel.release(backend);
    result
}
