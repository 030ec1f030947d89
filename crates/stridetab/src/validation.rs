//! Post-compilation validation of emitted tables.
//!
//! Checks the structural guarantees the pipeline is supposed to deliver:
//! stride-length sequences, direct-over-derived precedence, modifier
//! consistency between the two table views, reachability, and (for small
//! strides) exhaustive input-space completeness.

use std::collections::HashSet;

use crate::compiler::Compilation;
use crate::dfa::{EdgeKind, StateId};
use crate::multistride::Sym;

/// Largest stride for which every concrete input sequence is enumerated.
/// Above this the input space (256^stride) stops being tractable and the
/// exhaustive check is skipped with a warning.
const EXHAUSTIVE_STRIDE_LIMIT: usize = 2;

/// Validation result for compiled tables
#[derive(Debug, Clone)]
pub struct TableValidationResult {
    /// Critical errors that make the tables unusable
    pub errors: Vec<String>,
    /// Warnings about potential issues (non-fatal)
    pub warnings: Vec<String>,
    /// Statistics gathered during validation
    pub stats: TableStats,
}

/// Statistics gathered during table validation
#[derive(Debug, Clone, Default)]
pub struct TableStats {
    /// Number of DFA states
    pub state_count: u32,
    /// Number of direct multi-stride edges
    pub direct_edges: u32,
    /// Number of derived multi-stride edges
    pub derived_edges: u32,
    /// Number of states unreachable from the root via multi-stride edges
    pub orphaned_count: u32,
}

impl TableValidationResult {
    fn new(state_count: usize) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: TableStats {
                state_count: state_count as u32,
                ..TableStats::default()
            },
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a compilation's emitted tables.
///
/// Validates:
/// - Every sequence has length exactly `stride`
/// - No duplicate `(state, sequence)` keys; where a direct and a derived
///   candidate collide the direct one must be the survivor
/// - The match-action and key-value views are parallel and agree on the
///   modifier math
/// - Coverage: every concrete `stride`-byte input the fallback state resolves
///   directly also resolves at the falling-back state (exhaustive up to
///   stride 2)
/// - Reachability of all states from the root (warning only)
pub fn validate_tables(compilation: &Compilation) -> TableValidationResult {
    let dfa = compilation.dfa();
    let msdfa = compilation.multi_stride_dfa();
    let tables = compilation.tables();
    let stride = msdfa.stride();

    let mut result = TableValidationResult::new(dfa.state_count());

    for edge in msdfa.edges() {
        match edge.kind {
            EdgeKind::Direct => result.stats.direct_edges += 1,
            EdgeKind::Derived => result.stats.derived_edges += 1,
        }
    }

    // Stride invariant
    for (i, entry) in tables.key_value_entries().iter().enumerate() {
        if entry.seq.len() != stride {
            result.errors.push(format!(
                "entry {} has sequence length {} (stride is {})",
                i,
                entry.seq.len(),
                stride
            ));
        }
    }

    // Key uniqueness and direct-over-derived precedence
    let mut seen: HashSet<(StateId, Vec<Sym>)> = HashSet::new();
    for edge in msdfa.edges() {
        if !seen.insert((edge.from, edge.seq.clone())) {
            result.errors.push(format!(
                "duplicate key: state {} sequence {:?}",
                edge.from, edge.seq
            ));
        }
    }
    for edge in msdfa.edges().iter().filter(|e| e.kind == EdgeKind::Derived) {
        let shadowed = msdfa
            .next(edge.from)
            .iter()
            .any(|(existing, _)| existing == &edge.seq);
        if shadowed {
            result.errors.push(format!(
                "derived edge shadows a direct edge: state {} sequence {:?}",
                edge.from, edge.seq
            ));
        }
    }

    // The two views must be parallel and agree on modifiers
    if tables.mat_entries().len() != tables.key_value_entries().len() {
        result.errors.push(format!(
            "view length mismatch: {} match-action vs {} key-value entries",
            tables.mat_entries().len(),
            tables.key_value_entries().len()
        ));
    } else {
        for (i, (mat, kv)) in tables
            .mat_entries()
            .iter()
            .zip(tables.key_value_entries())
            .enumerate()
        {
            if mat.state != kv.state || mat.seq != kv.seq || mat.next_state != kv.next_state {
                result
                    .errors
                    .push(format!("entry {} differs between the two views", i));
                continue;
            }
            let expected = if kv.accept == 0 {
                0
            } else {
                1u64 << (kv.accept - 1)
            };
            if mat.modifier != expected {
                result.errors.push(format!(
                    "entry {} modifier {:#x} does not match accept index {}",
                    i, mat.modifier, kv.accept
                ));
            }
        }
    }

    // Completeness over the concrete input space
    if stride <= EXHAUSTIVE_STRIDE_LIMIT {
        check_completeness(compilation, &mut result);
    } else {
        result.warnings.push(format!(
            "stride {} above exhaustive check limit {}; completeness not verified",
            stride, EXHAUSTIVE_STRIDE_LIMIT
        ));
    }

    check_reachability(compilation, &mut result);

    result
}

/// Enumerate every concrete `stride`-byte input and verify the coverage
/// invariant: any input the fallback state resolves directly must resolve at
/// the falling-back state too (through its direct or derived edges). Inputs
/// no state resolves hit the loader's table-miss default (restart at root)
/// and are not errors.
fn check_completeness(compilation: &Compilation, result: &mut TableValidationResult) {
    let dfa = compilation.dfa();
    let msdfa = compilation.multi_stride_dfa();
    let stride = msdfa.stride();

    let mut per_state: Vec<Vec<(&[Sym], EdgeKind)>> = vec![Vec::new(); dfa.state_count()];
    for edge in msdfa.edges() {
        per_state[edge.from as usize].push((&edge.seq, edge.kind));
    }

    let total = 256usize.pow(stride as u32);
    let mut input = vec![0u8; stride];

    for &(state, fallback) in dfa.failure_links() {
        let mut uncovered = 0usize;
        for code in 0..total {
            for (i, byte) in input.iter_mut().enumerate() {
                *byte = ((code >> (8 * i)) & 0xff) as u8;
            }
            let fallback_resolves = msdfa
                .next(fallback)
                .iter()
                .any(|(seq, _)| seq.iter().zip(input.iter()).all(|(sym, &b)| sym.matches(b)));
            if !fallback_resolves {
                continue;
            }
            let resolves = per_state[state as usize]
                .iter()
                .any(|(seq, _)| seq.iter().zip(input.iter()).all(|(sym, &b)| sym.matches(b)));
            if !resolves {
                uncovered += 1;
            }
        }
        if uncovered > 0 {
            result.errors.push(format!(
                "state {} misses {} of {} inputs its fallback {} resolves directly",
                state, uncovered, total, fallback
            ));
        }
    }

    // Overlapping wildcard-padded direct edges are resolved by entry
    // priority in the loader; report them so nothing overlaps silently.
    for (state, entries) in per_state.iter().enumerate() {
        let mut ambiguous = 0usize;
        for code in 0..total {
            for (i, byte) in input.iter_mut().enumerate() {
                *byte = ((code >> (8 * i)) & 0xff) as u8;
            }
            let direct_hits = entries
                .iter()
                .filter(|(seq, kind)| {
                    *kind == EdgeKind::Direct
                        && seq.iter().zip(input.iter()).all(|(sym, &b)| sym.matches(b))
                })
                .count();
            if direct_hits > 1 {
                ambiguous += 1;
            }
        }
        if ambiguous > 0 {
            result.warnings.push(format!(
                "state {} has {} inputs matched by multiple direct edges",
                state, ambiguous
            ));
        }
    }
}

/// BFS from the root over multi-stride edges; unreachable states indicate a
/// construction bug upstream, reported as a warning.
fn check_reachability(compilation: &Compilation, result: &mut TableValidationResult) {
    let dfa = compilation.dfa();
    let msdfa = compilation.multi_stride_dfa();

    if dfa.state_count() == 0 {
        return;
    }

    let mut reachable = vec![false; dfa.state_count()];
    let mut queue = vec![0usize];
    reachable[0] = true;

    while let Some(state) = queue.pop() {
        for edge in msdfa.edges().iter().filter(|e| e.from == state as StateId) {
            let to = edge.to as usize;
            if !reachable[to] {
                reachable[to] = true;
                queue.push(to);
            }
        }
    }

    let orphaned_count = reachable.iter().filter(|&&r| !r).count();
    result.stats.orphaned_count = orphaned_count as u32;
    if orphaned_count > 0 {
        result.warnings.push(format!(
            "Found {} states not reachable from the root via multi-stride edges",
            orphaned_count
        ));
    }
}
