//! The cells shared between the three interrupt contexts.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// The currently strobed matrix column.
///
/// There is always exactly one active column; "no column selected" is not
/// representable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Column {
    Col1 = 0,
    Col2 = 1,
    Col3 = 2,
}

impl Column {
    /// Cyclic successor: Col1 → Col2 → Col3 → Col1.
    pub const fn next(self) -> Self {
        match self {
            Column::Col1 => Column::Col2,
            Column::Col2 => Column::Col3,
            Column::Col3 => Column::Col1,
        }
    }

    /// Decode a raw byte as stored in [`ScanState`].
    ///
    /// An out-of-range value cannot be produced by this crate; if one shows
    /// up anyway it folds back to `Col1` so the sweep stays live instead of
    /// wedging.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Column::Col2,
            2 => Column::Col3,
            _ => Column::Col1,
        }
    }
}

/// A matrix row line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Row {
    Row1 = 0,
    Row2 = 1,
    Row3 = 2,
}

/// The set of row lines that triggered within one edge-interrupt batch.
///
/// Ephemeral: built by the interrupt handler from the pending-line flags
/// and consumed synchronously by [`crate::Detector::on_row_edge`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowSet(u8);

impl RowSet {
    pub const fn empty() -> Self {
        RowSet(0)
    }

    pub const fn single(row: Row) -> Self {
        RowSet(1 << row as u8)
    }

    /// `self` plus `row`, for building sets in const context.
    pub const fn with(self, row: Row) -> Self {
        RowSet(self.0 | 1 << row as u8)
    }

    pub fn insert(&mut self, row: Row) {
        self.0 |= 1 << row as u8;
    }

    pub const fn contains(self, row: Row) -> bool {
        self.0 & (1 << row as u8) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Process-wide scan state, shared by reference with every handler.
///
/// Access rules per field:
///
/// - `column`: the active scan column. Single writer: the column
///   sequencer's periodic tick. Everything else only reads it.
/// - `gate`: the debounce gate, `true` = open. Written by exactly two
///   parties under a strict protocol: the detector closes it on an
///   accepted event, the debounce-expiry handler reopens it. Once closed
///   it stays closed until the one-shot fires. Redundant closes and opens
///   are harmless no-ops.
///
/// Both fields are byte-sized and every handler runs to completion on a
/// single core, so `Relaxed` loads and stores are all that is needed;
/// there is no lock.
pub struct ScanState {
    column: AtomicU8,
    gate: AtomicBool,
}

impl ScanState {
    /// Initial state: column 1 active, gate open.
    pub const fn new() -> Self {
        ScanState {
            column: AtomicU8::new(Column::Col1 as u8),
            gate: AtomicBool::new(true),
        }
    }

    pub fn column(&self) -> Column {
        Column::from_raw(self.column.load(Ordering::Relaxed))
    }

    pub(crate) fn set_column(&self, column: Column) {
        self.column.store(column as u8, Ordering::Relaxed);
    }

    pub fn gate_open(&self) -> bool {
        self.gate.load(Ordering::Relaxed)
    }

    pub(crate) fn close_gate(&self) {
        self.gate.store(false, Ordering::Relaxed);
    }

    pub(crate) fn open_gate(&self) {
        self.gate.store(true, Ordering::Relaxed);
    }
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_cycles_with_period_three() {
        let mut col = Column::Col1;
        let mut seen = [col; 6];
        for slot in seen.iter_mut().skip(1) {
            col = col.next();
            *slot = col;
        }
        assert_eq!(
            seen,
            [
                Column::Col1,
                Column::Col2,
                Column::Col3,
                Column::Col1,
                Column::Col2,
                Column::Col3,
            ]
        );
    }

    #[test]
    fn raw_decode_coerces_junk_to_col1() {
        assert_eq!(Column::from_raw(0), Column::Col1);
        assert_eq!(Column::from_raw(1), Column::Col2);
        assert_eq!(Column::from_raw(2), Column::Col3);
        assert_eq!(Column::from_raw(3), Column::Col1);
        assert_eq!(Column::from_raw(0xFF), Column::Col1);
    }

    #[test]
    fn initial_state_is_col1_gate_open() {
        let state = ScanState::new();
        assert_eq!(state.column(), Column::Col1);
        assert!(state.gate_open());
    }

    #[test]
    fn redundant_gate_transitions_are_noops() {
        let state = ScanState::new();
        state.open_gate();
        assert!(state.gate_open());
        state.close_gate();
        state.close_gate();
        assert!(!state.gate_open());
        state.open_gate();
        assert!(state.gate_open());
    }

    #[test]
    fn rowset_membership() {
        let mut rows = RowSet::empty();
        assert!(rows.is_empty());
        rows.insert(Row::Row2);
        assert!(rows.contains(Row::Row2));
        assert!(!rows.contains(Row::Row1));
        assert!(!rows.contains(Row::Row3));

        let both = RowSet::single(Row::Row1).with(Row::Row3);
        assert!(both.contains(Row::Row1));
        assert!(both.contains(Row::Row3));
        assert!(!both.contains(Row::Row2));
    }
}
