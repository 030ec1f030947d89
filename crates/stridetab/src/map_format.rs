//! Fixed-layout binary encoding of the key-value table.
//!
//! Hardware and kernel table loaders consume entries as fixed-width records
//! rather than structured values. This module lays the key-value view out as
//! `#[repr(C)]` structs with explicit padding, so the whole entry list can be
//! handed over as one byte buffer.
//!
//! The key holds the current state and the stride window; wildcard positions
//! are encoded out-of-band in `wildcard_mask` (bit `i` set when position `i`
//! matches any byte), with the corresponding unit byte zeroed. Unused trailing
//! units (stride below [`MAP_UNIT_WIDTH`]) are encoded the same way.

use std::mem;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Result, StridetabError};
use crate::multistride::Sym;
use crate::table::Tables;

/// Fixed key width of the lookup map; strides 1 through 4 are encodable.
pub const MAP_UNIT_WIDTH: usize = 4;

/// Lookup key of one map entry.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct InspectMapKey {
    /// Current state
    pub state: u16,
    /// The stride window, one byte per position; zero where wildcarded
    pub units: [u8; MAP_UNIT_WIDTH],
    /// Bit `i` set when unit `i` matches any byte
    pub wildcard_mask: u8,
    /// Explicit padding, always zero
    pub padding: u8,
}

/// Value of one map entry.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct InspectMapValue {
    /// Pattern-match bitmask of the next state (0 when non-accepting)
    pub modifier: u64,
    /// Next state
    pub state: u16,
    /// Accept index of the next state (0 when non-accepting)
    pub accept: u16,
    /// Explicit padding, always zero
    pub padding: u32,
}

/// Encode the table as fixed-layout key-value records.
///
/// # Errors
///
/// [`StridetabError::Table`] when the stride exceeds [`MAP_UNIT_WIDTH`] or a
/// state id does not fit the map's 16-bit state field.
pub fn encode_entries(tables: &Tables) -> Result<Vec<(InspectMapKey, InspectMapValue)>> {
    if tables.stride() > MAP_UNIT_WIDTH {
        return Err(StridetabError::Table(format!(
            "stride {} exceeds map key width {}",
            tables.stride(),
            MAP_UNIT_WIDTH
        )));
    }

    let state_u16 = |state: u32| -> Result<u16> {
        u16::try_from(state).map_err(|_| {
            StridetabError::Table(format!("state id {} exceeds the map's 16-bit field", state))
        })
    };

    let mut entries = Vec::with_capacity(tables.key_value_entries().len());
    for (mat, kv) in tables
        .mat_entries()
        .iter()
        .zip(tables.key_value_entries())
    {
        let mut units = [0u8; MAP_UNIT_WIDTH];
        let mut wildcard_mask = 0u8;
        for (i, sym) in kv.seq.iter().enumerate() {
            match sym {
                Sym::Byte(b) => units[i] = *b,
                Sym::Any => wildcard_mask |= 1 << i,
            }
        }
        // Positions past the stride match anything
        for i in kv.seq.len()..MAP_UNIT_WIDTH {
            wildcard_mask |= 1 << i;
        }

        let key = InspectMapKey {
            state: state_u16(kv.state)?,
            units,
            wildcard_mask,
            padding: 0,
        };
        let value = InspectMapValue {
            modifier: mat.modifier,
            state: state_u16(kv.next_state)?,
            accept: kv.accept as u16,
            padding: 0,
        };
        entries.push((key, value));
    }

    Ok(entries)
}

/// Encode the table as one contiguous byte buffer of key/value records.
pub fn encode_bytes(tables: &Tables) -> Result<Vec<u8>> {
    let entries = encode_entries(tables)?;
    let record_size = mem::size_of::<InspectMapKey>() + mem::size_of::<InspectMapValue>();
    let mut buffer = Vec::with_capacity(entries.len() * record_size);
    for (key, value) in &entries {
        buffer.extend_from_slice(key.as_bytes());
        buffer.extend_from_slice(value.as_bytes());
    }
    Ok(buffer)
}
