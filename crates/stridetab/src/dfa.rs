//! Single-stride DFA: automaton adapter and failure-link completion.
//!
//! [`Dfa::from_dump`] renumbers a collaborator-provided automaton dump into a
//! dense, zero-based state space and assigns accept indexes.
//! [`Dfa::resolve_failures`] then flattens failure links into concrete
//! derived transitions, producing one resolved choice per input byte per
//! state (direct where the trie has an edge, derived otherwise).

use std::collections::HashMap;

use serde::Serialize;
use stridetab_automaton::AutomatonDump;

use crate::error::{Result, StridetabError};

/// Dense state identifier; state 0 is always the initial/root state.
pub type StateId = u32;

/// Provenance of a transition.
///
/// Direct edges come from the trie; derived edges are synthesized by
/// failure-link resolution. Direct edges always win over derived ones for
/// the same lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    /// Edge present in the trie construction
    Direct,
    /// Edge synthesized from a failure link
    Derived,
}

/// A single-byte transition of the completed DFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfaEdge {
    /// Source state
    pub from: StateId,
    /// Input byte consumed
    pub byte: u8,
    /// Target state
    pub to: StateId,
    /// Direct (trie) or derived (failure-resolved)
    pub kind: EdgeKind,
}

/// Single-stride DFA over dense state ids.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Accept index per state: 0 for non-accepting, else a strictly
    /// increasing pattern index assigned in state-id order.
    accepts: Vec<u32>,
    /// All transitions, direct first, derived appended by
    /// [`Dfa::resolve_failures`].
    edges: Vec<DfaEdge>,
    /// Direct-only adjacency per state; derived edges never enter this so
    /// the multi-stride walk enumerates trie paths only.
    next: Vec<Vec<(u8, StateId)>>,
    /// Failure links `(state, fallback)`, a read-only side lookup.
    failure_links: Vec<(StateId, StateId)>,
}

impl Dfa {
    /// Adapt a collaborator automaton dump into the dense state space.
    ///
    /// Node order in the dump defines the dense numbering; the first node
    /// becomes state 0. Accepting nodes receive accept indexes 1, 2, ... in
    /// that same order.
    ///
    /// # Errors
    ///
    /// [`StridetabError::InvalidDump`] if the same origin id appears twice in
    /// `nodes`, or an edge or failure link references an unknown origin id.
    pub fn from_dump(dump: &AutomatonDump) -> Result<Self> {
        let mut converse: HashMap<u32, StateId> = HashMap::with_capacity(dump.nodes.len());
        let mut accepts = Vec::with_capacity(dump.nodes.len());
        let mut pattern_idx = 0u32;

        for (state_id, &(origin_id, accepting)) in dump.nodes.iter().enumerate() {
            if converse.insert(origin_id, state_id as StateId).is_some() {
                return Err(StridetabError::InvalidDump(format!(
                    "duplicate origin id {} in nodes",
                    origin_id
                )));
            }
            if accepting {
                pattern_idx += 1;
                accepts.push(pattern_idx);
            } else {
                accepts.push(0);
            }
        }

        let resolve = |origin_id: u32| -> Result<StateId> {
            converse.get(&origin_id).copied().ok_or_else(|| {
                StridetabError::InvalidDump(format!("unknown origin id {}", origin_id))
            })
        };

        let mut edges = Vec::with_capacity(dump.edges.len());
        let mut next: Vec<Vec<(u8, StateId)>> = vec![Vec::new(); dump.nodes.len()];
        for &(origin_from, byte, origin_to) in &dump.edges {
            let from = resolve(origin_from)?;
            let to = resolve(origin_to)?;
            edges.push(DfaEdge {
                from,
                byte,
                to,
                kind: EdgeKind::Direct,
            });
            next[from as usize].push((byte, to));
        }

        let mut failure_links = Vec::with_capacity(dump.failure_links.len());
        for &(origin_from, origin_to) in &dump.failure_links {
            failure_links.push((resolve(origin_from)?, resolve(origin_to)?));
        }

        Ok(Self {
            accepts,
            edges,
            next,
            failure_links,
        })
    }

    /// Flatten failure links into derived transitions.
    ///
    /// For each failure link `(s, f)`, every direct transition of `f` whose
    /// byte is not already covered by a direct transition of `s` is appended
    /// as a derived edge of `s`. Direct edges are never overwritten.
    pub fn resolve_failures(&mut self) {
        for &(state, fallback) in &self.failure_links {
            for &(byte, target) in &self.next[fallback as usize] {
                let covered = self.next[state as usize]
                    .iter()
                    .any(|&(existing, _)| existing == byte);
                if !covered {
                    self.edges.push(DfaEdge {
                        from: state,
                        byte,
                        to: target,
                        kind: EdgeKind::Derived,
                    });
                }
            }
        }
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.accepts.len()
    }

    /// Accept index of a state: 0 if non-accepting, else `p >= 1`.
    pub fn accept(&self, state: StateId) -> u32 {
        self.accepts[state as usize]
    }

    /// All transitions, direct and derived.
    pub fn edges(&self) -> &[DfaEdge] {
        &self.edges
    }

    /// Direct transitions out of a state, in dump order.
    pub fn next(&self, state: StateId) -> &[(u8, StateId)] {
        &self.next[state as usize]
    }

    /// Failure links `(state, fallback_state)`.
    pub fn failure_links(&self) -> &[(StateId, StateId)] {
        &self.failure_links
    }
}
