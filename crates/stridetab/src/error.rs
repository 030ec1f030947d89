//! Error types for the stridetab library
//!
//! Stridetab uses a unified error type that wraps errors from all
//! sub-components. Compilation is a one-shot batch operation; every error
//! here is a hard failure surfaced to the caller, never retried.

use thiserror::Error;

/// Main error type for stridetab operations
#[derive(Error, Debug)]
pub enum StridetabError {
    /// Error from automaton construction
    #[error(transparent)]
    Automaton(#[from] stridetab_automaton::AutomatonError),

    /// I/O error (pattern file loading)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed automaton dump: duplicate origin ids, or edges/failure
    /// links referencing unknown origin ids
    #[error("Invalid automaton dump: {0}")]
    InvalidDump(String),

    /// Invalid compiler configuration (e.g., zero stride)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Table emission error
    #[error("Table error: {0}")]
    Table(String),
}

/// Result type alias for stridetab operations
pub type Result<T> = std::result::Result<T, StridetabError>;

// Re-export the component error type for users who need it
pub use stridetab_automaton::AutomatonError;
