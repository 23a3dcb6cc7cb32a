//! Command-based control for link endpoints.

use crate::types::PulseSequence;

/// Actions for controlling a transmitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmitterAction<const N: usize> {
    /// Load pulse sequence.
    Load(PulseSequence<N>),
    /// Start sending.
    Start,
    /// Abort sending.
    Stop,
    /// Send again from the first pulse.
    Restart,
    /// Drop the loaded message.
    Clear,
}

/// Actions for controlling a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiverAction {
    /// Begin listening for a framing marker.
    StartSession,
    /// Stop decoding; further samples are ignored.
    EndSession,
    /// Drop partial input and received text, keeping the session state.
    Reset,
}
