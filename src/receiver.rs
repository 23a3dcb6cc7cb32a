//! Sensor-facing receive session.
//!
//! [`Receiver`] is the push interface a light-sensor callback talks to. It
//! thresholds raw readings, suppresses repeats, timestamps transitions with
//! its time source and collects decoded characters into a fixed-capacity
//! message buffer.

use crate::code_table::CodeTable;
use crate::command::ReceiverAction;
use crate::decoder::{Decoder, DecoderState, DecoderStats, SymbolWindows};
use crate::sensor::{LightThresholds, TransitionDetector};
use crate::time::{TimeInstant, TimeSource};
use crate::types::Pulse;
use heapless::String;

/// Receive-side configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReceiverConfig {
    /// Table used to look up received characters.
    pub table: CodeTable,
    /// Duration windows for symbol classification.
    pub windows: SymbolWindows,
    /// Intensity bands for raw sensor readings.
    pub thresholds: LightThresholds,
}

/// Decodes light-sensor readings into a text message.
///
/// The message buffer is cleared whenever a framing marker arrives, so it
/// always holds the text of the latest transmission.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `N` - Capacity of the message buffer, in bytes
pub struct Receiver<'t, I: TimeInstant, T: TimeSource<I>, const N: usize> {
    time_source: &'t T,
    detector: TransitionDetector,
    decoder: Decoder<I>,
    message: String<N>,
    dropped: u32,
}

impl<'t, I: TimeInstant, T: TimeSource<I>, const N: usize> Receiver<'t, I, T, N> {
    /// Creates a receiver with the reference configuration. No session is
    /// open yet.
    pub fn new(time_source: &'t T) -> Self {
        Self::with_config(time_source, ReceiverConfig::default())
    }

    /// Creates a receiver with a custom configuration.
    pub fn with_config(time_source: &'t T, config: ReceiverConfig) -> Self {
        Self {
            time_source,
            detector: TransitionDetector::new(config.thresholds),
            decoder: Decoder::with_windows(config.table, config.windows),
            message: String::new(),
            dropped: 0,
        }
    }

    /// Handles a receiver action by dispatching to the appropriate method.
    pub fn handle_action(&mut self, action: ReceiverAction) {
        match action {
            ReceiverAction::StartSession => self.start_session(),
            ReceiverAction::EndSession => self.end_session(),
            ReceiverAction::Reset => self.reset(),
        }
    }

    /// Opens a session and clears the message buffer.
    pub fn start_session(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("receiver: session start");

        self.detector.reset();
        self.decoder.start_session();
        self.message.clear();
    }

    /// Closes the session. The received message stays readable.
    pub fn end_session(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("receiver: session end, {} chars", self.message.len());

        self.detector.reset();
        self.decoder.end_session();
    }

    /// Drops partial input and the received message.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.decoder.reset();
        self.message.clear();
    }

    /// Feeds one raw sensor reading, timestamped now.
    ///
    /// Returns the character decoded by this reading, if any.
    pub fn on_sample(&mut self, value: f32) -> Option<char> {
        let label = self.detector.observe(value)?;
        self.on_label(label)
    }

    /// Feeds one label from an external classifier, timestamped now.
    ///
    /// Repeated labels are ignored by the decoder.
    pub fn on_label(&mut self, label: Pulse) -> Option<char> {
        if label == Pulse::Start && self.decoder.state() != DecoderState::Idle {
            self.message.clear();
        }

        let c = self.decoder.classify(label, self.time_source.now())?;
        if self.message.push(c).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
        Some(c)
    }

    /// Text received since the last framing marker.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Characters decoded but not stored because the buffer was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Current decoder state.
    pub fn state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// Decoder diagnostic counters.
    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    /// Number of raw readings outside every intensity band.
    pub fn unclassified_samples(&self) -> u32 {
        self.detector.unclassified()
    }

    /// Returns a reference to the decoder.
    pub fn decoder(&self) -> &Decoder<I> {
        &self.decoder
    }
}
