//! Timer configuration and the one-shot debounce collaborator.
//!
//! There are no recoverable configuration errors here. An out-of-range
//! value is replaced by a documented default instead of being rejected: a
//! keypad with no operator console is better off scanning at a wrong rate
//! than not scanning at all.

use crate::state::ScanState;

/// Smallest compare value the counter accepts; below it the hardware
/// enters an undefined state.
pub const MIN_INTERVAL: u32 = 2;
/// Largest value of the 24-bit compare register.
pub const MAX_INTERVAL: u32 = 16_777_215;
/// Substituted when a configured interval is out of range.
pub const DEFAULT_INTERVAL: u32 = 1000;
/// Prescale values below this produce an unstable timer output.
pub const MIN_PRESCALE: u8 = 3;
/// Substituted when a configured prescale is out of range.
pub const DEFAULT_PRESCALE: u8 = 5;

/// Input clock feeding a timer's prescaler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// 12 MHz high-speed crystal.
    Hxt12M,
    /// 32.768 kHz low-speed crystal.
    Lxt32K,
    /// The core clock, whatever it was configured to.
    Hclk,
    /// 22.1184 MHz high-speed RC oscillator.
    Hirc22M,
}

impl ClockSource {
    /// Nominal tick rate of the source. `Hclk` has no fixed rate; the
    /// caller supplies the configured core frequency.
    pub const fn hz(self, hclk: u32) -> u32 {
        match self {
            ClockSource::Hxt12M => 12_000_000,
            ClockSource::Lxt32K => 32_768,
            ClockSource::Hclk => hclk,
            ClockSource::Hirc22M => 22_118_400,
        }
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        ClockSource::Hxt12M
    }
}

/// Counter operating mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerMode {
    /// Fires exactly once per arm.
    OneShot,
    /// Fires at every interval boundary.
    Periodic,
    Toggle,
    Continuous,
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Periodic
    }
}

/// A timer's start-up configuration.
///
/// `interval` is expressed in prescaled source ticks. [`sanitized`]
/// replaces out-of-range fields with the defaults above; nothing here ever
/// fails.
///
/// [`sanitized`]: TimerConfig::sanitized
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    pub source: ClockSource,
    pub prescale: u8,
    pub mode: TimerMode,
    pub interval: u32,
}

impl TimerConfig {
    /// A periodic configuration on the 12 MHz crystal with the stock
    /// prescale.
    pub const fn periodic(interval: u32) -> Self {
        TimerConfig {
            source: ClockSource::Hxt12M,
            prescale: DEFAULT_PRESCALE,
            mode: TimerMode::Periodic,
            interval,
        }
    }

    /// A one-shot configuration on the 12 MHz crystal with the stock
    /// prescale.
    pub const fn one_shot(interval: u32) -> Self {
        TimerConfig {
            source: ClockSource::Hxt12M,
            prescale: DEFAULT_PRESCALE,
            mode: TimerMode::OneShot,
            interval,
        }
    }

    /// The configuration with out-of-range fields replaced by defaults.
    pub const fn sanitized(self) -> Self {
        let interval = if self.interval < MIN_INTERVAL || self.interval > MAX_INTERVAL {
            DEFAULT_INTERVAL
        } else {
            self.interval
        };
        let prescale = if self.prescale < MIN_PRESCALE {
            DEFAULT_PRESCALE
        } else {
            self.prescale
        };
        TimerConfig {
            source: self.source,
            prescale,
            mode: self.mode,
            interval,
        }
    }

    /// Callback rate implied by this configuration, in Hz.
    ///
    /// The prescaler divides the source by `prescale + 1`. Integer
    /// division: configurations slower than 1 Hz come out as 0 and are the
    /// caller's problem to reject.
    pub const fn frequency_hz(self, hclk: u32) -> u32 {
        let config = self.sanitized();
        config.source.hz(hclk) / ((config.prescale as u32 + 1) * config.interval)
    }
}

/// The debounce one-shot, as provided by the hardware platform.
pub trait OneShotTimer {
    /// Restart the quiet-period countdown from zero.
    ///
    /// Re-arming a timer that is already running restarts its interval
    /// rather than queuing a second expiry. The timer never re-arms
    /// itself: every firing requires a fresh call.
    fn rearm(&mut self);
}

/// One-shot expiry: reopen the debounce gate.
///
/// This is the entire logic half of the debounce timer's interrupt
/// handler; acknowledging the timer's own interrupt flag stays with the
/// platform's ISR.
pub fn on_debounce_elapsed(state: &ScanState) {
    state.open_gate();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_minimum_interval_falls_back_to_default() {
        let config = TimerConfig::periodic(1).sanitized();
        assert_eq!(config.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn zero_and_oversize_intervals_fall_back_to_default() {
        assert_eq!(TimerConfig::periodic(0).sanitized().interval, DEFAULT_INTERVAL);
        assert_eq!(
            TimerConfig::one_shot(MAX_INTERVAL + 1).sanitized().interval,
            DEFAULT_INTERVAL
        );
    }

    #[test]
    fn in_range_intervals_pass_through() {
        assert_eq!(TimerConfig::periodic(MIN_INTERVAL).sanitized().interval, MIN_INTERVAL);
        assert_eq!(TimerConfig::periodic(MAX_INTERVAL).sanitized().interval, MAX_INTERVAL);
        assert_eq!(TimerConfig::periodic(1000).sanitized().interval, 1000);
    }

    #[test]
    fn small_prescale_falls_back_to_default() {
        let mut config = TimerConfig::periodic(1000);
        config.prescale = 2;
        assert_eq!(config.sanitized().prescale, DEFAULT_PRESCALE);
        config.prescale = MIN_PRESCALE;
        assert_eq!(config.sanitized().prescale, MIN_PRESCALE);
    }

    #[test]
    fn shipped_rates_come_out_right() {
        // 12 MHz / 6 / 1000 = 2 kHz sweep.
        assert_eq!(TimerConfig::periodic(1000).frequency_hz(0), 2_000);
        // 12 MHz / 6 / 1e6 = 2 Hz, a 500 ms quiet window.
        assert_eq!(TimerConfig::one_shot(1_000_000).frequency_hz(0), 2);
    }

    #[test]
    fn hclk_rate_comes_from_the_caller() {
        let mut config = TimerConfig::periodic(1000);
        config.source = ClockSource::Hclk;
        assert_eq!(config.frequency_hz(72_000_000), 12_000);
    }

    #[test]
    fn expiry_reopens_the_gate() {
        let state = ScanState::new();
        state.close_gate();
        on_debounce_elapsed(&state);
        assert!(state.gate_open());
    }
}
