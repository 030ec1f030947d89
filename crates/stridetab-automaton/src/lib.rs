//! Multi-pattern trie and failure-link automaton.
//!
//! This crate builds the classical multi-pattern matching automaton (a byte
//! trie with failure links) from a set of byte-string patterns and exposes it
//! as a serialized graph descriptor via [`PatternAutomaton::dump`]. It does
//! not perform any matching itself; the `stridetab` compiler consumes the
//! dump and turns it into hardware lookup tables.

use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Error type for automaton construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// An empty pattern was supplied
    EmptyPattern,
    /// Resource limit exceeded (e.g., too many states)
    ResourceLimitExceeded(String),
}

impl fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::EmptyPattern => write!(f, "Empty pattern"),
            AutomatonError::ResourceLimitExceeded(msg) => {
                write!(f, "Resource limit exceeded: {}", msg)
            }
        }
    }
}

impl std::error::Error for AutomatonError {}

/// Serialized automaton graph descriptor.
///
/// This is the hand-off contract between automaton construction and the table
/// compiler. State ids in here are opaque origin ids; the compiler renumbers
/// them into a dense space. Edge lists are emitted in deterministic order
/// (states in id order, transitions in ascending byte order) so that two
/// automatons built from the same pattern sequence dump identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonDump {
    /// `(origin_id, accepting)` for every state, in state-id order
    pub nodes: Vec<(u32, bool)>,
    /// Direct trie edges `(from, byte, to)`
    pub edges: Vec<(u32, u8, u32)>,
    /// Failure links `(state, fallback_state)` for every non-root state
    pub failure_links: Vec<(u32, u32)>,
}

/// Per-state data used during construction
#[derive(Debug, Clone)]
struct TrieState {
    transitions: HashMap<u8, u32>,
    failure: u32,
    accepting: bool,
}

impl TrieState {
    fn new() -> Self {
        Self {
            transitions: HashMap::new(),
            failure: 0,
            accepting: false,
        }
    }

    /// Transitions in ascending byte order
    fn sorted_transitions(&self) -> Vec<(u8, u32)> {
        let mut edges: Vec<(u8, u32)> = self
            .transitions
            .iter()
            .map(|(&ch, &next)| (ch, next))
            .collect();
        edges.sort_by_key(|(ch, _)| *ch);
        edges
    }
}

/// Multi-pattern matching automaton (trie + failure links).
///
/// # Example
///
/// ```rust
/// use stridetab_automaton::PatternAutomaton;
///
/// let mut automaton = PatternAutomaton::new();
/// automaton.add_pattern(b"dog")?;
/// automaton.add_pattern(b"cat")?;
/// automaton.build();
/// let dump = automaton.dump();
/// assert_eq!(dump.nodes.len(), 7); // root + 3 + 3
/// # Ok::<(), stridetab_automaton::AutomatonError>(())
/// ```
pub struct PatternAutomaton {
    states: Vec<TrieState>,
    pattern_count: u32,
}

impl PatternAutomaton {
    /// Create an automaton containing only the root state.
    pub fn new() -> Self {
        Self {
            states: vec![TrieState::new()],
            pattern_count: 0,
        }
    }

    /// Build an automaton from a pattern list and compute its failure links.
    ///
    /// An empty pattern list is valid and yields a root-only automaton.
    pub fn from_patterns<P: AsRef<[u8]>>(patterns: &[P]) -> Result<Self, AutomatonError> {
        let mut automaton = Self::new();
        for pattern in patterns {
            automaton.add_pattern(pattern.as_ref())?;
        }
        automaton.build();
        Ok(automaton)
    }

    /// Add a pattern to the trie.
    ///
    /// Returns the pattern's insertion index. Patterns are arbitrary byte
    /// strings; adding the same pattern twice marks the same terminal state.
    pub fn add_pattern(&mut self, pattern: &[u8]) -> Result<u32, AutomatonError> {
        if pattern.is_empty() {
            return Err(AutomatonError::EmptyPattern);
        }

        let pattern_id = self.pattern_count;
        self.pattern_count += 1;

        // Build trie path
        let mut current = 0u32;
        for &ch in pattern {
            if let Some(&next) = self.states[current as usize].transitions.get(&ch) {
                current = next;
            } else {
                let new_id = self.states.len() as u32;
                if new_id == u32::MAX {
                    return Err(AutomatonError::ResourceLimitExceeded(format!(
                        "too many automaton states ({})",
                        new_id
                    )));
                }
                self.states.push(TrieState::new());
                self.states[current as usize].transitions.insert(ch, new_id);
                current = new_id;
            }
        }

        self.states[current as usize].accepting = true;
        Ok(pattern_id)
    }

    /// Compute failure links for all states via BFS over the trie.
    ///
    /// Must be called after the last `add_pattern` and before `dump`. Safe to
    /// call repeatedly; each call recomputes the links from scratch.
    pub fn build(&mut self) {
        let mut queue = VecDeque::new();

        // Depth-1 states fail to root
        let root_children: Vec<u32> = self.states[0].transitions.values().copied().collect();
        for child in root_children {
            self.states[child as usize].failure = 0;
            queue.push_back(child);
        }

        while let Some(state_id) = queue.pop_front() {
            let transitions: Vec<(u8, u32)> = self.states[state_id as usize]
                .transitions
                .iter()
                .map(|(&ch, &next)| (ch, next))
                .collect();

            for (ch, next_state) in transitions {
                queue.push_back(next_state);

                // Follow the failure chain looking for a state with an edge on 'ch'
                let mut fail = self.states[state_id as usize].failure;
                let mut failure_found = false;
                loop {
                    if let Some(&target) = self.states[fail as usize].transitions.get(&ch) {
                        if target != next_state {
                            self.states[next_state as usize].failure = target;
                            failure_found = true;
                        }
                        break;
                    }
                    if fail == 0 {
                        break;
                    }
                    fail = self.states[fail as usize].failure;
                }

                if !failure_found {
                    self.states[next_state as usize].failure = 0;
                }
            }
        }
    }

    /// Number of states, including the root.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of patterns added so far (duplicates counted).
    pub fn pattern_count(&self) -> u32 {
        self.pattern_count
    }

    /// Serialize the automaton graph for the table compiler.
    pub fn dump(&self) -> AutomatonDump {
        let mut nodes = Vec::with_capacity(self.states.len());
        let mut edges = Vec::new();
        let mut failure_links = Vec::with_capacity(self.states.len().saturating_sub(1));

        for (id, state) in self.states.iter().enumerate() {
            let id = id as u32;
            nodes.push((id, state.accepting));
            for (ch, target) in state.sorted_transitions() {
                edges.push((id, ch, target));
            }
            if id != 0 {
                failure_links.push((id, state.failure));
            }
        }

        AutomatonDump {
            nodes,
            edges,
            failure_links,
        }
    }
}

impl Default for PatternAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automaton(patterns: &[&[u8]]) -> PatternAutomaton {
        PatternAutomaton::from_patterns(patterns).unwrap()
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut a = PatternAutomaton::new();
        assert_eq!(a.add_pattern(b""), Err(AutomatonError::EmptyPattern));
    }

    #[test]
    fn test_trie_shape() {
        // "dog" and "cat" share no prefix: root + 6 states
        let a = automaton(&[b"dog", b"cat"]);
        assert_eq!(a.state_count(), 7);

        // "he" and "hers" share "he": root + 4 states
        let a = automaton(&[b"he", b"hers"]);
        assert_eq!(a.state_count(), 5);
    }

    #[test]
    fn test_duplicate_pattern_shares_state() {
        let a = automaton(&[b"dog", b"dog"]);
        assert_eq!(a.state_count(), 4);
        assert_eq!(a.pattern_count(), 2);
        assert_eq!(a.dump().nodes.iter().filter(|(_, acc)| *acc).count(), 1);
    }

    #[test]
    fn test_failure_links_share_suffix() {
        // "his" and "is": the 's' state of "his" must fail into the 's'
        // state of "is", and the 'i' state of "his" into the 'i' of "is".
        let mut a = PatternAutomaton::new();
        a.add_pattern(b"his").unwrap();
        a.add_pattern(b"is").unwrap();
        a.build();
        let dump = a.dump();

        // States: 0 root, 1 'h', 2 'hi', 3 'his', 4 'i', 5 'is'
        let fail_of = |s: u32| {
            dump.failure_links
                .iter()
                .find(|(from, _)| *from == s)
                .map(|(_, to)| *to)
                .unwrap()
        };
        assert_eq!(fail_of(2), 4);
        assert_eq!(fail_of(3), 5);
        assert_eq!(fail_of(1), 0);
    }

    #[test]
    fn test_dump_deterministic() {
        let a = automaton(&[b"dog", b"cat", b"do"]);
        let b = automaton(&[b"dog", b"cat", b"do"]);
        assert_eq!(a.dump(), b.dump());
    }

    #[test]
    fn test_dump_edges_sorted_per_state() {
        let a = automaton(&[b"zb", b"ab", b"mb"]);
        let dump = a.dump();
        let root_edges: Vec<u8> = dump
            .edges
            .iter()
            .filter(|(from, _, _)| *from == 0)
            .map(|(_, ch, _)| *ch)
            .collect();
        assert_eq!(root_edges, vec![b'a', b'm', b'z']);
    }

    #[test]
    fn test_failure_link_never_self() {
        // Single pattern "aa": state for "a" must not fail to itself even
        // though root has an 'a' edge pointing at it.
        let a = automaton(&[b"aa"]);
        let dump = a.dump();
        for (from, to) in &dump.failure_links {
            assert_ne!(from, to);
        }
    }

    #[test]
    fn test_repeated_byte_failure_chain() {
        // "aaa": failure of "aa" is "a", failure of "aaa" is "aa".
        let a = automaton(&[b"aaa"]);
        let dump = a.dump();
        let fail_of = |s: u32| {
            dump.failure_links
                .iter()
                .find(|(from, _)| *from == s)
                .map(|(_, to)| *to)
                .unwrap()
        };
        assert_eq!(fail_of(1), 0);
        assert_eq!(fail_of(2), 1);
        assert_eq!(fail_of(3), 2);
    }
}
