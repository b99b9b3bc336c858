//! # burin-sequence - Procedural Value Generators
//!
//! Named, stateful, seeded numeric generators ("sequences") and the
//! small expression interpreter that feeds almost every numeric
//! parameter of the composition engine.
//!
//! ## Architecture
//!
//! ```text
//! statement ──► parser ──► Sequence (pool + picker + accumulator)
//!                              │
//! expression ──► resolve ──────┴──► f64   (via PatternContext)
//! ```
//!
//! Sequences live in a [`PatternContext`]: an arena keyed by alias.
//! Every engine entry point takes an explicit `&mut PatternContext`, so
//! independent bakes can use isolated contexts and never cross-talk. A
//! process-wide default context is available through [`global`] for
//! single-script use.
//!
//! Failure policy: malformed statements degrade to an empty no-op
//! sequence and unresolved references resolve to zero. Parsing and
//! resolution never panic and never abort the caller; problems are
//! reported through the `log` facade.

mod context;
mod expr;
mod parser;
mod sequence;

use std::sync::Mutex;

use once_cell::sync::Lazy;

pub use context::PatternContext;
pub use parser::{parse_statement, ParseError, RawStatement};
pub use sequence::{Accumulator, Picker, PoolValue, SeqId, SeqRef, Sequence};

static GLOBAL: Lazy<Mutex<PatternContext>> = Lazy::new(|| Mutex::new(PatternContext::new()));

/// The shared default context, for single-script convenience.
///
/// Concurrent bakes that share aliases must either serialize on this
/// lock or use isolated [`PatternContext`] values instead.
pub fn global() -> &'static Mutex<PatternContext> {
    &GLOBAL
}
