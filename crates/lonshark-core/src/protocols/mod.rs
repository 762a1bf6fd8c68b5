//! Wire format decoding.
//!
//! Each format follows a layered structure:
//! - `layout`: byte offsets, ranges and bit masks (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O.

pub mod cnip;
pub mod lon;
