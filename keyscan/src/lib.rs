//! Interrupt-driven scan/debounce engine for a 3-column key matrix.
//!
//! # Theory of operation
//!
//! The matrix is multiplexed: a periodic timer strobes one column line LOW
//! at a time while the row lines sit as pulled-HIGH inputs with
//! falling-edge interrupts. Pressing a key shorts its row to the strobed
//! column, the row line falls, and the edge interrupt fires. Which key was
//! pressed is recovered from (triggered row, currently strobed column).
//!
//! Three interrupt sources drive the whole thing; there is no main-loop
//! polling and no blocking wait anywhere:
//!
//! - the periodic sweep timer advances the active column
//!   ([`Sequencer::on_tick`]),
//! - the row-edge interrupt recognizes presses and toggles the bound
//!   indicator output ([`Detector::on_row_edge`]),
//! - a one-shot debounce timer reopens the acceptance gate after each
//!   accepted event ([`timer::on_debounce_elapsed`]).
//!
//! They coordinate only through the two byte-sized cells in [`ScanState`]:
//!
//! ```text
//!               tick                 tick                 tick
//! column:  Col1 ───► Col2 ───► Col3 ───► Col1 ───► ...      (sweep timer)
//!
//!          row edge, gate open           debounce expiry
//! gate:    Open ──────[toggle?]──► Closed ──────────► Open   (detector /
//!          row edge, gate closed: flags cleared, no action    one-shot)
//! ```
//!
//! Every handler runs to completion in bounded time. The row-edge
//! interrupt is configured at a strictly higher priority than both timers,
//! so a press racing a column advance observes either the old or the new
//! column, never a torn value.
//!
//! The hardware side (timers, pin modes, edge-interrupt plumbing) is the
//! platform's business: column and indicator pins come in as
//! `embedded-hal` digital pins, and the debounce timer as a
//! [`timer::OneShotTimer`] implementation.

#![no_std]

pub mod detector;
pub mod keys;
pub mod outputs;
pub mod sequencer;
pub mod state;
pub mod timer;

pub use detector::Detector;
pub use keys::{Binding, Indicator, BINDINGS};
pub use outputs::Outputs;
pub use sequencer::Sequencer;
pub use state::{Column, Row, RowSet, ScanState};
pub use timer::{ClockSource, OneShotTimer, TimerConfig, TimerMode};
