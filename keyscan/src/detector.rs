//! Row-edge key detection.

use embedded_hal::digital::v2::ToggleableOutputPin;

use crate::keys::{self, Indicator};
use crate::outputs::Outputs;
use crate::state::{RowSet, ScanState};
use crate::timer::OneShotTimer;

/// Recognizes key presses from row-edge interrupts.
///
/// [`on_row_edge`](Detector::on_row_edge) is the logic half of every
/// row-line interrupt handler. The caller owns the other half of the
/// contract: after it returns, whatever the gate state was, the ISR must
/// acknowledge the edge-interrupt flags of *all* row lines, so a stale
/// flag can never re-enter the handler. The row-edge interrupt itself is
/// never disabled; the gate alone limits dispatch to one action per
/// debounce window.
pub struct Detector<A, B> {
    outputs: Outputs<A, B>,
}

impl<A, B, E> Detector<A, B>
where
    A: ToggleableOutputPin<Error = E>,
    B: ToggleableOutputPin<Error = E>,
{
    pub fn new(outputs: Outputs<A, B>) -> Self {
        Detector { outputs }
    }

    /// Handle one batch of row edges.
    ///
    /// With the gate closed this is an intentional drop, not a failure:
    /// nothing toggles, the gate stays closed, and the one-shot is left
    /// alone. With the gate open, the gate closes and the quiet window is
    /// armed, then the first binding matching (a triggered row, the active
    /// column) gets its indicator toggled. Unbound presses close the gate
    /// all the same, so bounce on any key is swallowed the same way. The
    /// gate closes and the window arms even if the pin write fails.
    ///
    /// Returns the indicator that toggled, if any.
    pub fn on_row_edge(
        &mut self,
        rows: RowSet,
        state: &ScanState,
        debounce: &mut impl OneShotTimer,
    ) -> Result<Option<Indicator>, E> {
        if !state.gate_open() {
            return Ok(None);
        }

        let hit = keys::lookup(rows, state.column());
        state.close_gate();
        debounce.rearm();
        if let Some(indicator) = hit {
            self.outputs.toggle(indicator)?;
        }
        Ok(hit)
    }
}
