//! The static key-to-indicator binding table.

use crate::state::{Column, Row, RowSet};

/// Which indicator output a bound key drives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    A,
    B,
}

/// One (row, column) → indicator entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    pub row: Row,
    pub column: Column,
    pub indicator: Indicator,
}

/// The bound keys, in priority order.
///
/// Every other (row, column) intersection exists electrically but is
/// unbound: pressing it closes the debounce gate like any accepted event
/// but dispatches nothing.
pub static BINDINGS: [Binding; 2] = [
    Binding {
        row: Row::Row1,
        column: Column::Col1,
        indicator: Indicator::A,
    },
    Binding {
        row: Row::Row3,
        column: Column::Col3,
        indicator: Indicator::B,
    },
];

/// The first binding matching any triggered row at the active column.
///
/// Declaration order is the priority order: when two bound rows trigger in
/// the same batch, only the earlier entry wins.
pub fn lookup(rows: RowSet, column: Column) -> Option<Indicator> {
    BINDINGS
        .iter()
        .find(|binding| binding.column == column && rows.contains(binding.row))
        .map(|binding| binding.indicator)
}
