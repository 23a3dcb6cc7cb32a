//! Timed pulse renderer with state management.
//!
//! Provides [`Transmitter`] which plays an encoded pulse sequence on a
//! display, one pulse per schedule slot, and the [`FlashDisplay`] trait for
//! hardware abstraction.

use crate::colors::PulsePalette;
use crate::command::TransmitterAction;
use crate::encoder::Encoder;
use crate::schedule::TransmitSchedule;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{EncodeError, Pulse, PulseSequence};
use palette::Srgb;

/// Trait for abstracting the flashing surface (screen, LED panel, lamp).
pub trait FlashDisplay {
    /// Fills the display with the specified color.
    ///
    /// Color components are in the range 0.0-1.0. Handle any hardware errors
    /// internally - this method cannot fail.
    fn set_color(&mut self, color: Srgb);
}

/// The current state of a transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitterState {
    /// No message loaded. Display shows the idle color.
    Idle,
    /// Message loaded and ready to send. Display shows the idle color.
    Loaded,
    /// Pulses are being rendered.
    Running,
    /// Every pulse has been shown. Display keeps the last pulse color.
    Complete,
}

/// Timing information returned by service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Current pulse stays on screen. Service again after this delay.
    Delay(D),

    /// Transmission finished. No further servicing needed until a new
    /// message is loaded or the transmission is restarted.
    Complete,
}

/// Errors that can occur during transmitter operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitterError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: TransmitterState,
    },
    /// No message is loaded.
    NoMessageLoaded,
    /// Message could not be encoded.
    Encode(EncodeError),
}

impl core::fmt::Display for TransmitterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransmitterError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but transmitter is in {:?}",
                    expected, actual
                )
            }
            TransmitterError::NoMessageLoaded => write!(f, "no message loaded"),
            TransmitterError::Encode(err) => write!(f, "encoding failed: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransmitterError {}

impl From<EncodeError> for TransmitterError {
    fn from(err: EncodeError) -> Self {
        TransmitterError::Encode(err)
    }
}

/// Plays an encoded message on a display at a fixed cadence.
///
/// Only one transmission runs at a time. Stopping mid-sequence is allowed;
/// the remote receiver then sees a truncated message, since the link has no
/// acknowledgment.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - Display implementation type
/// * `T` - Time source implementation type
/// * `N` - Maximum number of pulses in a message
pub struct Transmitter<'t, I: TimeInstant, S: FlashDisplay, T: TimeSource<I>, const N: usize> {
    display: S,
    time_source: &'t T,
    palette: PulsePalette,
    schedule: TransmitSchedule<I::Duration>,
    state: TransmitterState,
    pulses: Option<PulseSequence<N>>,
    start_time: Option<I>,
    shown_at: Option<I>,
    position: Option<usize>,
    current_color: Srgb,
}

impl<'t, I: TimeInstant, S: FlashDisplay, T: TimeSource<I>, const N: usize>
    Transmitter<'t, I, S, T, N>
{
    /// Creates an idle transmitter with the reference palette and cadence.
    pub fn new(display: S, time_source: &'t T) -> Self {
        Self::with_config(
            display,
            time_source,
            PulsePalette::default(),
            TransmitSchedule::default(),
        )
    }

    /// Creates an idle transmitter with a custom palette and cadence.
    pub fn with_config(
        mut display: S,
        time_source: &'t T,
        palette: PulsePalette,
        schedule: TransmitSchedule<I::Duration>,
    ) -> Self {
        display.set_color(palette.idle);

        Self {
            display,
            time_source,
            palette,
            schedule,
            state: TransmitterState::Idle,
            pulses: None,
            start_time: None,
            shown_at: None,
            position: None,
            current_color: palette.idle,
        }
    }

    /// Handles a transmitter action by dispatching to the appropriate method.
    pub fn handle_action(
        &mut self,
        action: TransmitterAction<N>,
    ) -> Result<ServiceTiming<I::Duration>, TransmitterError> {
        match action {
            TransmitterAction::Load(pulses) => {
                self.load(pulses);
                Ok(ServiceTiming::Complete)
            }
            TransmitterAction::Start => self.start(),
            TransmitterAction::Stop => {
                self.stop()?;
                Ok(ServiceTiming::Complete)
            }
            TransmitterAction::Restart => self.restart(),
            TransmitterAction::Clear => {
                self.clear();
                Ok(ServiceTiming::Complete)
            }
        }
    }

    /// Loads a pulse sequence. Can be called from any state.
    ///
    /// Aborts any running transmission, shows the idle color and transitions
    /// to `Loaded`.
    pub fn load(&mut self, pulses: PulseSequence<N>) {
        if matches!(
            self.state,
            TransmitterState::Running | TransmitterState::Complete
        ) {
            self.show(self.palette.idle);
        }
        self.pulses = Some(pulses);
        self.rewind();
        self.state = TransmitterState::Loaded;
    }

    /// Encodes `message` and loads the result.
    ///
    /// # Errors
    /// * `Encode` - The message does not fit in `N` pulses; the previously
    ///   loaded message is kept
    pub fn load_message(&mut self, encoder: &Encoder, message: &str) -> Result<(), TransmitterError> {
        let pulses = encoder.encode::<N>(message)?;
        self.load(pulses);
        Ok(())
    }

    /// Starts sending the loaded message from its first pulse.
    ///
    /// Must be called from `Loaded` state.
    pub fn start(&mut self) -> Result<ServiceTiming<I::Duration>, TransmitterError> {
        if self.state != TransmitterState::Loaded {
            return Err(TransmitterError::InvalidState {
                expected: "Loaded",
                actual: self.state,
            });
        }

        if self.pulses.is_none() {
            return Err(TransmitterError::NoMessageLoaded);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("transmitter: start");

        self.start_time = Some(self.time_source.now());
        self.state = TransmitterState::Running;
        self.service()
    }

    /// Sends the loaded message again from its first pulse.
    ///
    /// Can be called from `Running` or `Complete` states.
    pub fn restart(&mut self) -> Result<ServiceTiming<I::Duration>, TransmitterError> {
        match self.state {
            TransmitterState::Running | TransmitterState::Complete => {
                if self.pulses.is_none() {
                    return Err(TransmitterError::NoMessageLoaded);
                }

                self.rewind();
                self.start_time = Some(self.time_source.now());
                self.state = TransmitterState::Running;
                self.service()
            }
            _ => Err(TransmitterError::InvalidState {
                expected: "Running or Complete",
                actual: self.state,
            }),
        }
    }

    /// Services the transmitter, updating the display if necessary.
    ///
    /// Each call shows at most one new pulse, and a pulse is replaced only
    /// after it has been on screen for its full hold. A late call delays the
    /// rest of the message instead of skipping pulses.
    ///
    /// Must be called from `Running` state.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(duration))` - Current pulse holds, service after this delay
    /// - `Ok(ServiceTiming::Complete)` - Every pulse shown, transitions to `Complete` state
    /// - `Err` - Invalid state
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, TransmitterError> {
        if self.state != TransmitterState::Running {
            return Err(TransmitterError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        }

        let Some(pulses) = self.pulses.as_ref() else {
            return Err(TransmitterError::NoMessageLoaded);
        };
        let now = self.time_source.now();

        let next = match (self.position, self.shown_at) {
            (Some(index), Some(shown_at)) => {
                let hold = self.schedule.hold_for(index);
                let on_screen = now.duration_since(shown_at);
                if on_screen.as_millis() < hold.as_millis() {
                    return Ok(ServiceTiming::Delay(hold.saturating_sub(on_screen)));
                }
                index + 1
            }
            _ => 0,
        };

        let Some(pulse) = pulses.get(next).copied() else {
            #[cfg(feature = "defmt")]
            defmt::debug!("transmitter: complete after {} pulses", pulses.len());

            self.state = TransmitterState::Complete;
            return Ok(ServiceTiming::Complete);
        };

        self.position = Some(next);
        self.shown_at = Some(now);
        let color = self.palette.color_for(pulse);
        // Update display only if color changed
        if color != self.current_color {
            self.show(color);
        }

        Ok(ServiceTiming::Delay(self.schedule.hold_for(next)))
    }

    /// Aborts the transmission and shows the idle color.
    ///
    /// The message remains loaded and the transmitter transitions to `Loaded`.
    /// Can be called from `Running` or `Complete`.
    pub fn stop(&mut self) -> Result<(), TransmitterError> {
        match self.state {
            TransmitterState::Running | TransmitterState::Complete => {
                #[cfg(feature = "defmt")]
                defmt::debug!("transmitter: stop at pulse {}", self.position);

                self.rewind();
                self.state = TransmitterState::Loaded;
                self.show(self.palette.idle);
                Ok(())
            }
            _ => Err(TransmitterError::InvalidState {
                expected: "Running or Complete",
                actual: self.state,
            }),
        }
    }

    /// Removes the loaded message and shows the idle color.
    ///
    /// Transitions to `Idle`. Can be called from any state.
    pub fn clear(&mut self) {
        self.pulses = None;
        self.rewind();
        self.state = TransmitterState::Idle;
        self.show(self.palette.idle);
    }

    fn rewind(&mut self) {
        self.start_time = None;
        self.shown_at = None;
        self.position = None;
    }

    fn show(&mut self, color: Srgb) {
        self.display.set_color(color);
        self.current_color = color;
    }

    /// Returns the current state of the transmitter.
    pub fn state(&self) -> TransmitterState {
        self.state
    }

    /// Returns the color currently on the display.
    pub fn current_color(&self) -> Srgb {
        self.current_color
    }

    /// Returns true while pulses are being rendered.
    pub fn is_running(&self) -> bool {
        self.state == TransmitterState::Running
    }

    /// Index of the pulse last put on screen, if a transmission is under way.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Pulse last put on screen, if a transmission is under way.
    pub fn current_pulse(&self) -> Option<Pulse> {
        let index = self.position?;
        self.pulses.as_ref()?.get(index).copied()
    }

    /// Returns the loaded pulse sequence, if any.
    pub fn pulses(&self) -> Option<&[Pulse]> {
        self.pulses.as_deref()
    }

    /// Returns the cadence used to render pulses.
    pub fn schedule(&self) -> TransmitSchedule<I::Duration> {
        self.schedule
    }

    /// Returns the palette used to render pulses.
    pub fn palette(&self) -> PulsePalette {
        self.palette
    }

    /// Returns the elapsed time since the transmission started, if it has.
    pub fn elapsed_time(&self) -> Option<I::Duration> {
        self.start_time.map(|start| self.time_source.now().duration_since(start))
    }

    /// Returns a reference to the display.
    pub fn display(&self) -> &S {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, START_RED, WHITE};
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestDuration(u64);

    impl TimeDuration for TestDuration {
        const ZERO: Self = TestDuration(0);

        fn as_millis(&self) -> u64 {
            self.0
        }

        fn from_millis(millis: u64) -> Self {
            TestDuration(millis)
        }

        fn saturating_sub(self, other: Self) -> Self {
            TestDuration(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestInstant(u64);

    impl TimeInstant for TestInstant {
        type Duration = TestDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            TestDuration(self.0 - earlier.0)
        }
    }

    // Mock display that records color changes
    struct MockDisplay {
        history: Vec<Srgb, 32>,
    }

    impl MockDisplay {
        fn new() -> Self {
            Self {
                history: Vec::new(),
            }
        }
    }

    impl FlashDisplay for MockDisplay {
        fn set_color(&mut self, color: Srgb) {
            let _ = self.history.push(color);
        }
    }

    struct MockTimeSource {
        current_time: core::cell::Cell<TestInstant>,
    }

    impl MockTimeSource {
        fn new() -> Self {
            Self {
                current_time: core::cell::Cell::new(TestInstant(0)),
            }
        }

        fn advance(&self, millis: u64) {
            let current = self.current_time.get();
            self.current_time.set(TestInstant(current.0 + millis));
        }
    }

    impl TimeSource<TestInstant> for MockTimeSource {
        fn now(&self) -> TestInstant {
            self.current_time.get()
        }
    }

    type TestTransmitter<'t> = Transmitter<'t, TestInstant, MockDisplay, MockTimeSource, 32>;

    fn pulses(items: &[Pulse]) -> PulseSequence<32> {
        let mut seq = PulseSequence::new();
        for pulse in items {
            seq.push(*pulse).unwrap();
        }
        seq
    }

    #[test]
    fn start_requires_loaded_state() {
        let timer = MockTimeSource::new();
        let mut tx = TestTransmitter::new(MockDisplay::new(), &timer);

        let result = tx.start();
        assert!(matches!(result, Err(TransmitterError::InvalidState { .. })));
    }

    #[test]
    fn service_requires_running_state() {
        let timer = MockTimeSource::new();
        let mut tx = TestTransmitter::new(MockDisplay::new(), &timer);
        tx.load(pulses(&[Pulse::Start]));

        let result = tx.service();
        assert!(matches!(result, Err(TransmitterError::InvalidState { .. })));
    }

    #[test]
    fn display_only_updates_when_color_changes() {
        let timer = MockTimeSource::new();
        let mut tx = TestTransmitter::new(MockDisplay::new(), &timer);
        tx.load(pulses(&[Pulse::Start, Pulse::Start, Pulse::Low, Pulse::Low, Pulse::High]));

        assert_eq!(tx.start(), Ok(ServiceTiming::Delay(TestDuration(2000))));
        timer.advance(2000);
        tx.service().unwrap();
        for _ in 0..3 {
            timer.advance(300);
            assert_eq!(tx.service(), Ok(ServiceTiming::Delay(TestDuration(300))));
        }
        timer.advance(300);
        assert_eq!(tx.service(), Ok(ServiceTiming::Complete));

        // idle, red, black, white
        assert_eq!(tx.display().history.as_slice(), &[BLACK, START_RED, BLACK, WHITE]);
    }

    #[test]
    fn finishes_after_last_tick() {
        let timer = MockTimeSource::new();
        let mut tx = TestTransmitter::new(MockDisplay::new(), &timer);
        tx.load(pulses(&[Pulse::Start, Pulse::High]));
        tx.start().unwrap();

        timer.advance(2000);
        assert_eq!(tx.service(), Ok(ServiceTiming::Delay(TestDuration(300))));
        assert_eq!(tx.current_pulse(), Some(Pulse::High));

        timer.advance(300);
        assert_eq!(tx.service(), Ok(ServiceTiming::Complete));
        assert_eq!(tx.state(), TransmitterState::Complete);
        assert_eq!(tx.current_color(), WHITE);
    }

    #[test]
    fn error_messages_format_correctly_for_display() {
        extern crate std;
        use std::string::ToString;

        let err = TransmitterError::InvalidState {
            expected: "Loaded",
            actual: TransmitterState::Idle,
        };
        assert_eq!(
            err.to_string(),
            "invalid state: expected Loaded, but transmitter is in Idle"
        );
        assert_eq!(TransmitterError::NoMessageLoaded.to_string(), "no message loaded");
    }
}
