//! The two indicator outputs.

use embedded_hal::digital::v2::ToggleableOutputPin;

use crate::keys::Indicator;

/// Two independent toggleable outputs.
///
/// There is no stored logical level: the physical pin is the sole source
/// of truth, and a toggle takes effect immediately and synchronously.
pub struct Outputs<A, B> {
    a: A,
    b: B,
}

impl<A, B, E> Outputs<A, B>
where
    A: ToggleableOutputPin<Error = E>,
    B: ToggleableOutputPin<Error = E>,
{
    pub fn new(a: A, b: B) -> Self {
        Outputs { a, b }
    }

    /// Flip one output's level.
    pub fn toggle(&mut self, which: Indicator) -> Result<(), E> {
        match which {
            Indicator::A => self.a.toggle(),
            Indicator::B => self.b.toggle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;

    struct TestPin<'a>(&'a Cell<bool>);

    impl ToggleableOutputPin for TestPin<'_> {
        type Error = Infallible;
        fn toggle(&mut self) -> Result<(), Infallible> {
            self.0.set(!self.0.get());
            Ok(())
        }
    }

    #[test]
    fn outputs_toggle_independently() {
        let (a, b) = (Cell::new(false), Cell::new(false));
        let mut outputs = Outputs::new(TestPin(&a), TestPin(&b));

        outputs.toggle(Indicator::A).unwrap();
        assert!(a.get());
        assert!(!b.get());

        outputs.toggle(Indicator::B).unwrap();
        assert!(a.get());
        assert!(b.get());
    }

    #[test]
    fn double_toggle_round_trips() {
        let (a, b) = (Cell::new(false), Cell::new(true));
        let mut outputs = Outputs::new(TestPin(&a), TestPin(&b));

        outputs.toggle(Indicator::A).unwrap();
        outputs.toggle(Indicator::A).unwrap();
        assert!(!a.get());

        outputs.toggle(Indicator::B).unwrap();
        outputs.toggle(Indicator::B).unwrap();
        assert!(b.get());
    }
}
