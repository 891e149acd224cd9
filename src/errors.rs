//! Errors used throughout the opening trainer.
//!
//! This module defines the canonical error type returned by catalog loading
//! and the opening index. The enum `OpeningsError` is used as the single
//! error type across the crate to simplify propagation and matching. Each
//! variant carries contextual information where appropriate to aid
//! diagnostics and user-facing error messages.
//!
//! Usage guidelines:
//! - Catalog loading returns `MalformedRecord`/`CatalogUnreadable` and aborts
//!   on the first bad record; there is no partial catalog.
//! - `NoActiveContinuation` is a precondition violation: callers should check
//!   `has_moves_to_make` before asking for a computer move.
//! - `UnknownOpening` signals an identity mismatch between the caller's UI
//!   state and the catalog; it is reported loudly rather than ignored so the
//!   two cannot silently drift apart.

use std::fmt;

/// Unified error type for the opening trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpeningsError {
    /// A catalog record did not have the expected shape.
    ///
    /// Payload: 1-based line number, the raw record text, and the reason the
    /// record was rejected.
    MalformedRecord {
        line_number: usize,
        record: String,
        reason: String,
    },

    /// A catalog file could not be read from disk.
    ///
    /// Payload: the path that was attempted and the underlying I/O failure.
    CatalogUnreadable { path: String, reason: String },

    /// A computer move was requested from a position with no active
    /// continuation (every child line is disabled, or the game is off-trie).
    NoActiveContinuation,

    /// The (name, starting position) identity matched no catalog opening.
    ///
    /// Payload: the identity pair the caller supplied.
    UnknownOpening {
        name: String,
        starting_position: String,
    },
}

impl fmt::Display for OpeningsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpeningsError::MalformedRecord {
                line_number,
                record,
                reason,
            } => write!(
                f,
                "malformed catalog record on line {line_number}: {reason} (record: '{record}')"
            ),
            OpeningsError::CatalogUnreadable { path, reason } => {
                write!(f, "failed reading catalog {path}: {reason}")
            }
            OpeningsError::NoActiveContinuation => {
                write!(f, "no enabled opening continues from the current position")
            }
            OpeningsError::UnknownOpening {
                name,
                starting_position,
            } => write!(
                f,
                "no catalog opening matches name '{name}' at position '{starting_position}'"
            ),
        }
    }
}

impl std::error::Error for OpeningsError {}
