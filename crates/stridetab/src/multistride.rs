//! Multi-stride extension of the completed single-stride DFA.
//!
//! [`MultiStrideDfa::extend`] regroups single-byte transitions into
//! fixed-length `stride`-byte transitions by exhaustive path enumeration over
//! the direct-edge graph, with wildcard padding at the alignment boundaries:
//! leading padding at the root (a pattern may begin at any offset within a
//! stride window) and trailing padding after accepting states (the rest of
//! the window is irrelevant once a pattern completes).
//!
//! [`MultiStrideDfa::resolve_failures`] then re-applies failure-link
//! flattening at stride granularity so every state maps every possible
//! stride-length input to a next state through at most one failure hop.

use serde::Serialize;

use crate::dfa::{Dfa, EdgeKind, StateId};

/// One position of a multi-stride transition sequence.
///
/// `Any` matches any input byte at its position. Modeling the wildcard as a
/// tagged variant (rather than reserving a byte value such as `0xFF`) keeps
/// patterns containing every literal byte representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sym {
    /// Matches exactly this byte
    Byte(u8),
    /// Matches any byte
    Any,
}

impl Sym {
    /// Whether this (existing-edge) symbol covers `other` at one position.
    pub fn covers(self, other: Sym) -> bool {
        self == Sym::Any || self == other
    }

    /// Whether this symbol matches a concrete input byte.
    pub fn matches(self, byte: u8) -> bool {
        match self {
            Sym::Any => true,
            Sym::Byte(b) => b == byte,
        }
    }
}

/// A transition sequence of length exactly `stride`.
pub type Seq = Vec<Sym>;

/// Whether `existing` covers `candidate` at every position.
pub(crate) fn seq_covers(existing: &[Sym], candidate: &[Sym]) -> bool {
    existing
        .iter()
        .zip(candidate.iter())
        .all(|(&e, &c)| e.covers(c))
}

/// A `stride`-byte transition of the multi-stride DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsEdge {
    /// Source state
    pub from: StateId,
    /// Sequence of exactly `stride` symbols
    pub seq: Seq,
    /// Target state
    pub to: StateId,
    /// Direct (path-enumerated) or derived (failure-resolved)
    pub kind: EdgeKind,
}

/// Multi-stride DFA sharing the single-stride DFA's state space.
#[derive(Debug, Clone)]
pub struct MultiStrideDfa {
    stride: usize,
    /// All multi-stride transitions, direct first, derived appended by
    /// [`MultiStrideDfa::resolve_failures`].
    edges: Vec<MsEdge>,
    /// Direct-only adjacency per state, used for coverage checks.
    next: Vec<Vec<(Seq, StateId)>>,
}

impl MultiStrideDfa {
    /// Enumerate all `stride`-byte direct transitions of the DFA.
    ///
    /// Padding applies only to direct edges: each direct edge out of state 0
    /// gains leading-wildcard copies, and each direct edge into an accepting
    /// state gains trailing-wildcard copies. The walk then emits one edge per
    /// distinct path of exactly `stride` symbols; branches that overshoot the
    /// stride are dead and dropped.
    pub fn extend(dfa: &Dfa, stride: usize) -> Self {
        let state_count = dfa.state_count();

        // Padded direct adjacency: the single-byte edges as length-1
        // sequences plus the boundary-alignment variants.
        let mut padded: Vec<Vec<(Seq, StateId)>> = (0..state_count)
            .map(|s| {
                dfa.next(s as StateId)
                    .iter()
                    .map(|&(byte, to)| (vec![Sym::Byte(byte)], to))
                    .collect()
            })
            .collect();

        for edge in dfa.edges().iter().filter(|e| e.kind == EdgeKind::Direct) {
            if edge.from == 0 {
                for star_num in 1..stride {
                    let mut seq = vec![Sym::Any; star_num];
                    seq.push(Sym::Byte(edge.byte));
                    padded[0].push((seq, edge.to));
                }
            }
            if dfa.accept(edge.to) != 0 {
                for star_num in 1..stride {
                    let mut seq = vec![Sym::Byte(edge.byte)];
                    seq.extend(std::iter::repeat(Sym::Any).take(star_num));
                    padded[edge.from as usize].push((seq, edge.to));
                }
            }
        }

        let mut edges = Vec::new();
        let mut next: Vec<Vec<(Seq, StateId)>> = vec![Vec::new(); state_count];
        for start in 0..state_count as StateId {
            walk(&mut edges, &mut next, &padded, start, &[], start, stride);
        }

        Self {
            stride,
            edges,
            next,
        }
    }

    /// Flatten failure links at stride granularity.
    ///
    /// For each failure link `(s, f)`, every direct multi-stride edge of `f`
    /// whose sequence is not covered by one of `s`'s direct multi-stride
    /// edges (wildcards in the existing edge matching anything) is appended
    /// as a derived edge of `s`. One hop suffices: fallback targets are
    /// themselves already complete.
    pub fn resolve_failures(&mut self, failure_links: &[(StateId, StateId)]) {
        for &(state, fallback) in failure_links {
            for (seq, target) in &self.next[fallback as usize] {
                let covered = self.next[state as usize]
                    .iter()
                    .any(|(existing, _)| seq_covers(existing, seq));
                if !covered {
                    self.edges.push(MsEdge {
                        from: state,
                        seq: seq.clone(),
                        to: *target,
                        kind: EdgeKind::Derived,
                    });
                }
            }
        }
    }

    /// Bytes consumed per transition.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// All multi-stride transitions, direct and derived.
    pub fn edges(&self) -> &[MsEdge] {
        &self.edges
    }

    /// Direct multi-stride transitions out of a state.
    pub fn next(&self, state: StateId) -> &[(Seq, StateId)] {
        &self.next[state as usize]
    }
}

/// Depth-first path enumeration from `start`, accumulating `path`.
fn walk(
    edges: &mut Vec<MsEdge>,
    next: &mut [Vec<(Seq, StateId)>],
    padded: &[Vec<(Seq, StateId)>],
    start: StateId,
    path: &[Sym],
    node: StateId,
    stride: usize,
) {
    for (step, target) in &padded[node as usize] {
        let mut seq = path.to_vec();
        seq.extend_from_slice(step);
        if seq.len() < stride {
            walk(edges, next, padded, start, &seq, *target, stride);
        } else if seq.len() == stride {
            edges.push(MsEdge {
                from: start,
                seq: seq.clone(),
                to: *target,
                kind: EdgeKind::Direct,
            });
            next[start as usize].push((seq, *target));
        }
        // Longer than the stride: dead branch
    }
}
