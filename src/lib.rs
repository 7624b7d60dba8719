//! Preprocessing engine for Stata `.do`-file cells.
//!
//! Turns a raw, possibly multi-statement block of script text into normalized
//! executable units: custom `#delimit` resolution, comment stripping,
//! whitespace normalization, abbreviation-aware block segmentation and
//! `code if in` clause decomposition. The pipeline is pure text transforms;
//! only `last`-range resolution and selection-variable materialization reach
//! the execution backend, behind the [`backend::StataBackend`] trait.

pub mod backend;
pub mod executor;
pub mod parser;
