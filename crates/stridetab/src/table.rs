//! Table emission: the completed multi-stride DFA rendered as match-action
//! entries and as a plain key-value mapping.
//!
//! Both views are snapshots over the same edge set, in edge order. The table
//! id is an opaque tag carried alongside the entries for the downstream
//! loader; the compiler never interprets it.

use serde::Serialize;

use crate::dfa::{Dfa, StateId};
use crate::error::{Result, StridetabError};
use crate::multistride::{MultiStrideDfa, Seq};

/// Width of the pattern-match bitmask; the implicit limit on distinguishable
/// accepting states.
pub const MODIFIER_BITS: u32 = u64::BITS;

/// Action of a match-action entry. The table only ever transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Transition to the next state
    Goto,
}

/// One match-action table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatEntry {
    /// Match key: current state
    pub state: StateId,
    /// Match key: input sequence of exactly `stride` symbols
    pub seq: Seq,
    /// Action to take on match
    pub action: Action,
    /// Action parameter: next state
    pub next_state: StateId,
    /// Action parameter: pattern-match bitmask, bit `p-1` set when the next
    /// state accepts pattern `p`; 0 otherwise
    pub modifier: u64,
}

/// One key-value table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValueEntry {
    /// Key: current state
    pub state: StateId,
    /// Key: input sequence of exactly `stride` symbols
    pub seq: Seq,
    /// Value: next state
    pub next_state: StateId,
    /// Value: accept index of the next state (0 if non-accepting)
    pub accept: u32,
}

/// The two interchangeable table views over one compiled multi-stride DFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tables {
    table_id: u32,
    stride: usize,
    mat_entries: Vec<MatEntry>,
    key_value_entries: Vec<KeyValueEntry>,
}

impl Tables {
    /// Render the multi-stride DFA as table entries, in edge order.
    ///
    /// # Errors
    ///
    /// [`StridetabError::Table`] when an accept index exceeds
    /// [`MODIFIER_BITS`]; its pattern would be indistinguishable in the
    /// bitmask.
    pub fn from_multi_stride(dfa: &Dfa, msdfa: &MultiStrideDfa, table_id: u32) -> Result<Self> {
        let mut mat_entries = Vec::with_capacity(msdfa.edges().len());
        let mut key_value_entries = Vec::with_capacity(msdfa.edges().len());

        for edge in msdfa.edges() {
            let accept = dfa.accept(edge.to);
            let modifier = if accept == 0 {
                0u64
            } else {
                if accept > MODIFIER_BITS {
                    return Err(StridetabError::Table(format!(
                        "accept index {} exceeds the {}-bit match bitmask",
                        accept, MODIFIER_BITS
                    )));
                }
                1u64 << (accept - 1)
            };

            mat_entries.push(MatEntry {
                state: edge.from,
                seq: edge.seq.clone(),
                action: Action::Goto,
                next_state: edge.to,
                modifier,
            });
            key_value_entries.push(KeyValueEntry {
                state: edge.from,
                seq: edge.seq.clone(),
                next_state: edge.to,
                accept,
            });
        }

        Ok(Self {
            table_id,
            stride: msdfa.stride(),
            mat_entries,
            key_value_entries,
        })
    }

    /// Opaque table id supplied at compile time.
    pub fn table_id(&self) -> u32 {
        self.table_id
    }

    /// Bytes consumed per table lookup.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Match-action view.
    pub fn mat_entries(&self) -> &[MatEntry] {
        &self.mat_entries
    }

    /// Key-value view.
    pub fn key_value_entries(&self) -> &[KeyValueEntry] {
        &self.key_value_entries
    }
}
