//! Compiler front door: patterns in, tables out.
//!
//! The pipeline is strictly staged: automaton dump → dense single-stride DFA
//! → failure-link completion → multi-stride extension → stride-level failure
//! coverage → table emission. One invocation compiles one pattern set; there
//! is no incremental update, a new set recompiles from scratch.

use std::path::Path;

use stridetab_automaton::{AutomatonDump, PatternAutomaton};

use crate::dfa::Dfa;
use crate::error::{Result, StridetabError};
use crate::multistride::MultiStrideDfa;
use crate::table::Tables;

/// One-shot compiler from a pattern set to multi-stride lookup tables.
///
/// # Example
///
/// ```rust
/// use stridetab::TableCompiler;
///
/// let compiler = TableCompiler::new(2, 0)?;
/// let compilation = compiler.compile(&[b"dog".as_slice(), b"cat"])?;
/// for entry in compilation.tables().mat_entries() {
///     assert_eq!(entry.seq.len(), 2);
/// }
/// # Ok::<(), stridetab::StridetabError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TableCompiler {
    stride: usize,
    table_id: u32,
}

impl TableCompiler {
    /// Create a compiler for the given stride and table id.
    ///
    /// `stride` is the number of input bytes consumed per table lookup;
    /// `table_id` is an opaque tag carried through to the emitted tables.
    ///
    /// # Errors
    ///
    /// [`StridetabError::Config`] when `stride` is zero.
    pub fn new(stride: usize, table_id: u32) -> Result<Self> {
        if stride == 0 {
            return Err(StridetabError::Config(
                "stride must be at least 1".to_string(),
            ));
        }
        Ok(Self { stride, table_id })
    }

    /// Bytes consumed per table lookup.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Opaque table id carried through to the emitted tables.
    pub fn table_id(&self) -> u32 {
        self.table_id
    }

    /// Compile an in-memory pattern list.
    ///
    /// An empty list is valid and compiles to the trivial one-state DFA with
    /// no accepting states (and, for `stride > 1`, no transitions at all).
    pub fn compile<P: AsRef<[u8]>>(&self, patterns: &[P]) -> Result<Compilation> {
        let automaton = PatternAutomaton::from_patterns(patterns)?;
        self.compile_dump(&automaton.dump())
    }

    /// Compile a newline-delimited pattern file, one pattern per line.
    ///
    /// Trailing newlines are stripped and empty lines skipped, so a trailing
    /// newline at end of file does not produce an empty pattern.
    pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<Compilation> {
        let data = std::fs::read(path)?;
        let patterns: Vec<&[u8]> = data
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .collect();
        self.compile(&patterns)
    }

    /// Compile directly from a collaborator automaton dump.
    ///
    /// This is the seam for automaton implementations other than
    /// [`PatternAutomaton`]; the dump contract is validated here.
    pub fn compile_dump(&self, dump: &AutomatonDump) -> Result<Compilation> {
        let mut dfa = Dfa::from_dump(dump)?;
        dfa.resolve_failures();

        let mut msdfa = MultiStrideDfa::extend(&dfa, self.stride);
        msdfa.resolve_failures(dfa.failure_links());

        let tables = Tables::from_multi_stride(&dfa, &msdfa, self.table_id)?;

        Ok(Compilation {
            dfa,
            msdfa,
            tables,
        })
    }
}

/// Result of a compilation: the intermediate automata plus the emitted
/// tables, all owned snapshots with no ties back to the compiler.
#[derive(Debug, Clone)]
pub struct Compilation {
    dfa: Dfa,
    msdfa: MultiStrideDfa,
    tables: Tables,
}

impl Compilation {
    /// The completed single-stride DFA (stages 1-2).
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// The completed multi-stride DFA (stages 3-4).
    pub fn multi_stride_dfa(&self) -> &MultiStrideDfa {
        &self.msdfa
    }

    /// The emitted tables (stage 5).
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Consume the compilation, keeping only the tables.
    pub fn into_tables(self) -> Tables {
        self.tables
    }
}
