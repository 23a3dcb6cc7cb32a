#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Symbol`**: Abstract code unit (`Dot`, `Dash`, `EndOfCharacter`)
//! - **`Pulse`**: One color on the light channel (`Start`, `Low`, `High`)
//! - **`CodeTable`**: Character to symbol mapping (`INTERNATIONAL` or `LEGACY`)
//! - **`Encoder`**: Turns text into a framed pulse sequence
//! - **`TransmitSchedule`**: Long first hold, then one tick per pulse
//! - **`Transmitter`**: Renders a pulse sequence on a `FlashDisplay`
//! - **`Decoder`**: Turns timestamped pulse labels back into characters
//! - **`Receiver`**: Sensor-facing session around a `Decoder`
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! The transmitter renders `Srgb<f32>` colors (0.0-1.0 range). When
//! implementing `FlashDisplay`, convert these to your device's native format.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod code_table;
pub mod colors;
pub mod command;
pub mod decoder;
pub mod encoder;
pub mod receiver;
pub mod schedule;
pub mod sensor;
pub mod time;
pub mod transmitter;
pub mod types;

pub use code_table::{CodeTable, MAX_CODE_LEN};
pub use colors::{BLACK, PulsePalette, START_RED, WHITE};
pub use command::{ReceiverAction, TransmitterAction};
pub use decoder::{
    Decoder, DecoderState, DecoderStats, DurationWindow, SymbolWindows, UNKNOWN_CHAR,
};
pub use encoder::{Encoder, FRAMING_MARKER, encode_message};
pub use receiver::{Receiver, ReceiverConfig};
pub use schedule::{RenderCursor, RenderFrame, TransmitSchedule};
pub use sensor::{IntensityBand, LightThresholds, TransitionDetector};
#[cfg(feature = "std")]
pub use time::StdClock;
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use transmitter::{FlashDisplay, ServiceTiming, Transmitter, TransmitterError, TransmitterState};
pub use types::{ConfigError, EncodeError, Pulse, PulseSequence, Symbol};

/// Pulse sequence with room for 64 pulses (about five characters).
pub type PulseSequence64 = PulseSequence<64>;

/// Pulse sequence with room for 256 pulses.
pub type PulseSequence256 = PulseSequence<256>;
