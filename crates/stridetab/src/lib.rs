//! Stridetab - Multi-Stride DFA Table Compiler
//!
//! Stridetab compiles a set of byte-string patterns into fixed-width lookup
//! tables that a match-action execution engine (for example a table in
//! programmable network or security hardware) can scan with, consuming
//! `stride` bytes of input per lookup cycle.
//!
//! # Quick Start
//!
//! ```rust
//! use stridetab::TableCompiler;
//!
//! // Two patterns, two bytes per lookup, table id 0
//! let compiler = TableCompiler::new(2, 0)?;
//! let compilation = compiler.compile(&[b"dog".as_slice(), b"cat"])?;
//!
//! for entry in compilation.tables().mat_entries() {
//!     // match=(state, seq), action=goto, params=(next_state, modifier)
//!     assert_eq!(entry.seq.len(), 2);
//! }
//! # Ok::<(), stridetab::StridetabError>(())
//! ```
//!
//! # Architecture
//!
//! Compilation is a strict five-stage pipeline; each stage consumes only the
//! previous stage's output:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  1. Automaton adapter     (dense renumbering) │
//! │  2. Failure completion    (single-stride DFA) │
//! │  3. Multi-stride extender (path enumeration)  │
//! │  4. Failure coverage      (stride-level)      │
//! │  5. Table emitter         (MAT / key-value)   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The automaton (trie + failure links) comes from the companion
//! `stridetab-automaton` crate, or from any collaborator producing the same
//! dump contract. The compiler only builds tables; it never scans input data
//! itself.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules (documented API)

/// Compiler pipeline front door
pub mod compiler;
/// Single-stride DFA: adapter and failure completion
pub mod dfa;
/// Error types for stridetab operations
pub mod error;
/// Fixed-layout binary encoding for table loaders
pub mod map_format;
/// Multi-stride extension and stride-level failure coverage
pub mod multistride;
/// Table emission: match-action and key-value views
pub mod table;
/// Post-compilation validation of emitted tables
pub mod validation;

// Re-exports for Rust consumers

/// One-shot pattern-set-to-tables compiler
pub use crate::compiler::{Compilation, TableCompiler};

/// Single-stride DFA types
pub use crate::dfa::{Dfa, DfaEdge, EdgeKind, StateId};

/// Main error type for stridetab operations
pub use crate::error::{Result, StridetabError};

/// Multi-stride DFA types
pub use crate::multistride::{MsEdge, MultiStrideDfa, Seq, Sym};

/// Emitted table types
pub use crate::table::{Action, KeyValueEntry, MatEntry, Tables, MODIFIER_BITS};

/// Table validation entry point
pub use crate::validation::{validate_tables, TableStats, TableValidationResult};

// Re-export the automaton crate for callers that build dumps themselves
pub use stridetab_automaton as automaton;

/// Component error type from automaton construction
pub use stridetab_automaton::AutomatonError;

// Version information
/// Library version string
pub const STRIDETAB_VERSION: &str = env!("CARGO_PKG_VERSION");
