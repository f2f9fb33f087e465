//! STM32F103 (blue pill) binding for the keyscan engine.
//!
//! Pinout:
//!
//! Pin  | Role
//! -----|------------------------------------------
//! PA0  | matrix column 1 strobe (push-pull, active LOW)
//! PA1  | matrix column 2 strobe
//! PA2  | matrix column 3 strobe
//! PA3  | matrix row 1 (pull-up input, falling-edge EXTI3)
//! PA4  | matrix row 2 (pull-up input, falling-edge EXTI4)
//! PA5  | matrix row 3 (pull-up input, falling-edge EXTI9_5)
//! PC13 | indicator A
//! PC14 | indicator B
//!
//! Three interrupt sources, nothing else: TIM2 sweeps the columns, the
//! EXTI lines catch presses, TIM3 times the debounce quiet window. The
//! row-edge tasks run at a strictly higher priority than both timer
//! tasks, so a press racing a column advance sees a consistent column.
//! The idle task is empty; the whole device lives in its handlers.

#![no_main]
#![no_std]

use panic_halt as _;

#[rtic::app(device = stm32f1xx_hal::pac, peripherals = true)]
mod app {
    use keyscan::timer::{self, OneShotTimer, TimerConfig};
    use keyscan::{Detector, Outputs, Row, RowSet, ScanState, Sequencer};
    use rtic::mutex_prelude::*;
    use stm32f1xx_hal::gpio::gpioa::{PA0, PA1, PA2, PA3, PA4, PA5};
    use stm32f1xx_hal::gpio::gpioc::{PC13, PC14};
    use stm32f1xx_hal::gpio::{Edge, ExtiPin, Input, Output, PullUp, PushPull, State};
    use stm32f1xx_hal::pac::{TIM2, TIM3};
    use stm32f1xx_hal::prelude::*;
    use stm32f1xx_hal::time::Hertz;
    use stm32f1xx_hal::timer::{CountDownTimer, Event, Timer};

    /// Sweep timer: 12 MHz crystal, /6 prescale, 1000-tick period = 2 kHz.
    const SWEEP: TimerConfig = TimerConfig::periodic(1_000);
    /// Debounce window: 1M ticks at the same rate = 2 Hz, a 500 ms quiet
    /// period. Must stay much longer than the sweep period so a full
    /// column cycle fits inside every window.
    const DEBOUNCE: TimerConfig = TimerConfig::one_shot(1_000_000);
    /// Core clock after the PLL; only consulted if a config picks `Hclk`.
    const HCLK_HZ: u32 = 72_000_000;

    /// The interrupt-shared cells. A `static` rather than an RTIC
    /// resource: every field is an atomic with documented single-writer
    /// rules, so handlers can share it without a lock.
    static SCAN: ScanState = ScanState::new();

    type ColumnSequencer =
        Sequencer<PA0<Output<PushPull>>, PA1<Output<PushPull>>, PA2<Output<PushPull>>>;
    type KeyDetector = Detector<PC13<Output<PushPull>>, PC14<Output<PushPull>>>;

    /// The three row inputs with their EXTI lines.
    pub struct RowPins {
        row1: PA3<Input<PullUp>>,
        row2: PA4<Input<PullUp>>,
        row3: PA5<Input<PullUp>>,
    }

    impl RowPins {
        /// The rows whose edge flags are pending right now. Lines that
        /// fired close together land in the same batch no matter which
        /// EXTI vector got us here.
        fn pending(&mut self) -> RowSet {
            let mut rows = RowSet::empty();
            if self.row1.check_interrupt() {
                rows.insert(Row::Row1);
            }
            if self.row2.check_interrupt() {
                rows.insert(Row::Row2);
            }
            if self.row3.check_interrupt() {
                rows.insert(Row::Row3);
            }
            rows
        }

        /// Clear the pending flags of all three lines, triggered or not,
        /// so no stale flag can re-enter a handler.
        fn acknowledge_all(&mut self) {
            self.row1.clear_interrupt_pending_bit();
            self.row2.clear_interrupt_pending_bit();
            self.row3.clear_interrupt_pending_bit();
        }
    }

    /// TIM3 dressed up as the engine's one-shot. The hardware timer is
    /// free-running periodic; one-shot behavior comes from only listening
    /// between `rearm` and expiry.
    pub struct DebounceTimer {
        timer: CountDownTimer<TIM3>,
        rate: Hertz,
    }

    impl DebounceTimer {
        fn new(timer: Timer<TIM3>, rate_hz: u32) -> Self {
            let rate = rate_hz.hz();
            DebounceTimer {
                timer: timer.start_count_down(rate),
                rate,
            }
        }

        /// Expiry half: silence the timer until the next arm.
        fn expire(&mut self) {
            self.timer.clear_update_interrupt_flag();
            self.timer.unlisten(Event::Update);
        }
    }

    impl OneShotTimer for DebounceTimer {
        fn rearm(&mut self) {
            // start() restarts the count from zero, so re-arming while
            // running stretches the window instead of queuing a second
            // expiry.
            self.timer.start(self.rate);
            self.timer.clear_update_interrupt_flag();
            self.timer.listen(Event::Update);
        }
    }

    #[shared]
    struct Shared {
        rows: RowPins,
        detector: KeyDetector,
        debounce: DebounceTimer,
    }

    #[local]
    struct Local {
        sweep: CountDownTimer<TIM2>,
        sequencer: ColumnSequencer,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let dp = cx.device;
        let mut flash = dp.FLASH.constrain();
        let mut rcc = dp.RCC.constrain();
        let exti = dp.EXTI;

        let clocks = rcc
            .cfgr
            .use_hse(8_u32.mhz())
            .sysclk(72_u32.mhz())
            .pclk1(36_u32.mhz())
            .freeze(&mut flash.acr);

        let mut afio = dp.AFIO.constrain(&mut rcc.apb2);
        let mut gpioa = dp.GPIOA.split(&mut rcc.apb2);
        let mut gpioc = dp.GPIOC.split(&mut rcc.apb2);

        // Columns come up HIGH (inactive); the engine strobes column 1
        // LOW before the sweep timer starts.
        let col1 = gpioa
            .pa0
            .into_push_pull_output_with_state(&mut gpioa.crl, State::High);
        let col2 = gpioa
            .pa1
            .into_push_pull_output_with_state(&mut gpioa.crl, State::High);
        let col3 = gpioa
            .pa2
            .into_push_pull_output_with_state(&mut gpioa.crl, State::High);
        let mut sequencer = Sequencer::new(col1, col2, col3);
        // Push-pull writes on this HAL are infallible.
        match sequencer.drive_initial(&SCAN) {
            Ok(()) => (),
            Err(_) => panic!(),
        }

        let mut row1 = gpioa.pa3.into_pull_up_input(&mut gpioa.crl);
        row1.make_interrupt_source(&mut afio);
        row1.trigger_on_edge(&exti, Edge::FALLING);
        row1.enable_interrupt(&exti);
        let mut row2 = gpioa.pa4.into_pull_up_input(&mut gpioa.crl);
        row2.make_interrupt_source(&mut afio);
        row2.trigger_on_edge(&exti, Edge::FALLING);
        row2.enable_interrupt(&exti);
        let mut row3 = gpioa.pa5.into_pull_up_input(&mut gpioa.crl);
        row3.make_interrupt_source(&mut afio);
        row3.trigger_on_edge(&exti, Edge::FALLING);
        row3.enable_interrupt(&exti);

        let led_a = gpioc.pc13.into_push_pull_output(&mut gpioc.crh);
        let led_b = gpioc.pc14.into_push_pull_output(&mut gpioc.crh);
        let detector = Detector::new(Outputs::new(led_a, led_b));

        let mut sweep = Timer::tim2(dp.TIM2, &clocks, &mut rcc.apb1)
            .start_count_down(SWEEP.frequency_hz(HCLK_HZ).hz());
        sweep.listen(Event::Update);

        // Configured but silent; only the detector arms it.
        let debounce = DebounceTimer::new(
            Timer::tim3(dp.TIM3, &clocks, &mut rcc.apb1),
            DEBOUNCE.frequency_hz(HCLK_HZ),
        );

        (
            Shared {
                rows: RowPins { row1, row2, row3 },
                detector,
                debounce,
            },
            Local { sweep, sequencer },
            init::Monotonics(),
        )
    }

    /// Sweep tick: advance the strobed column.
    #[task(binds = TIM2, priority = 1, local = [sweep, sequencer])]
    fn sweep_tick(cx: sweep_tick::Context) {
        match cx.local.sequencer.on_tick(&SCAN) {
            Ok(()) => (),
            Err(_) => panic!(),
        }
        cx.local.sweep.clear_update_interrupt_flag();
    }

    /// Debounce expiry: reopen the gate and silence TIM3 until the next
    /// arm.
    #[task(binds = TIM3, priority = 1, shared = [debounce])]
    fn debounce_elapsed(mut cx: debounce_elapsed::Context) {
        cx.shared.debounce.lock(|debounce| debounce.expire());
        timer::on_debounce_elapsed(&SCAN);
    }

    #[task(binds = EXTI3, priority = 2, shared = [rows, detector, debounce])]
    fn row1_edge(cx: row1_edge::Context) {
        service_row_edges(cx.shared.rows, cx.shared.detector, cx.shared.debounce);
    }

    #[task(binds = EXTI4, priority = 2, shared = [rows, detector, debounce])]
    fn row2_edge(cx: row2_edge::Context) {
        service_row_edges(cx.shared.rows, cx.shared.detector, cx.shared.debounce);
    }

    #[task(binds = EXTI9_5, priority = 2, shared = [rows, detector, debounce])]
    fn row3_edge(cx: row3_edge::Context) {
        service_row_edges(cx.shared.rows, cx.shared.detector, cx.shared.debounce);
    }

    /// Shared body of the three row-edge vectors: collect the batch, run
    /// the detector, then acknowledge every row line's flag.
    fn service_row_edges(
        rows: impl rtic::Mutex<T = RowPins>,
        detector: impl rtic::Mutex<T = KeyDetector>,
        debounce: impl rtic::Mutex<T = DebounceTimer>,
    ) {
        (rows, detector, debounce).lock(|rows, detector, debounce| {
            let batch = rows.pending();
            match detector.on_row_edge(batch, &SCAN, debounce) {
                Ok(_) => (),
                Err(_) => panic!(),
            }
            rows.acknowledge_all();
        });
    }
}
