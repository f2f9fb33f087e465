//! Periodic column sweep.

use embedded_hal::digital::v2::OutputPin;

use crate::state::{Column, ScanState};

/// Drives the three column lines from the periodic sweep timer.
///
/// The active column is asserted LOW and the other two are parked HIGH, so
/// a pressed key pulls exactly one row line down while its column is
/// strobed. Row lines are inputs with pull-ups and are never written here.
///
/// [`on_tick`](Sequencer::on_tick) is the entire body of the sweep timer's
/// interrupt handler: a column advance plus three pin writes, bounded and
/// short, since it runs in interrupt context and would otherwise push back
/// the timer's subsequent firings.
pub struct Sequencer<C1, C2, C3> {
    cols: (C1, C2, C3),
}

impl<C1, C2, C3, E> Sequencer<C1, C2, C3>
where
    C1: OutputPin<Error = E>,
    C2: OutputPin<Error = E>,
    C3: OutputPin<Error = E>,
{
    pub fn new(col1: C1, col2: C2, col3: C3) -> Self {
        Sequencer {
            cols: (col1, col2, col3),
        }
    }

    /// Assert the strobe pattern for the initial column.
    ///
    /// Called once at start-up so "exactly one column LOW" holds from the
    /// first instant rather than from the first tick.
    pub fn drive_initial(&mut self, state: &ScanState) -> Result<(), E> {
        self.drive(state.column())
    }

    /// Periodic tick: advance the active column and restrobe the lines.
    ///
    /// The column cell is written before the pins; a row edge racing this
    /// handler sees either the old or the new column, both of which are
    /// consistent with some instant of the sweep.
    pub fn on_tick(&mut self, state: &ScanState) -> Result<(), E> {
        let column = state.column().next();
        state.set_column(column);
        self.drive(column)
    }

    /// Park the inactive columns HIGH first, then pull the active one LOW,
    /// so no two columns are ever asserted at once.
    fn drive(&mut self, column: Column) -> Result<(), E> {
        match column {
            Column::Col1 => {
                self.cols.1.set_high()?;
                self.cols.2.set_high()?;
                self.cols.0.set_low()?;
            }
            Column::Col2 => {
                self.cols.0.set_high()?;
                self.cols.2.set_high()?;
                self.cols.1.set_low()?;
            }
            Column::Col3 => {
                self.cols.0.set_high()?;
                self.cols.1.set_high()?;
                self.cols.2.set_low()?;
            }
        }
        Ok(())
    }
}
