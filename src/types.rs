//! Core types shared by the encoder, decoder and renderer.

use heapless::Vec;

/// Abstract code unit, independent of its color or duration representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Short mark: low color held for one tick.
    Dot,

    /// Long mark: low color held for two ticks.
    Dash,

    /// Character boundary: low color held for three ticks.
    EndOfCharacter,
}

impl Symbol {
    /// Returns the pulses this symbol expands to on the light channel.
    pub const fn pulses(self) -> &'static [Pulse] {
        match self {
            Symbol::Dot => &[Pulse::Low, Pulse::High],
            Symbol::Dash => &[Pulse::Low, Pulse::Low, Pulse::High],
            Symbol::EndOfCharacter => &[Pulse::Low, Pulse::Low, Pulse::Low, Pulse::High],
        }
    }

    /// Number of ticks the low color is held before the closing high pulse.
    pub const fn low_ticks(self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 2,
            Symbol::EndOfCharacter => 3,
        }
    }

    /// Returns true for `Dot` and `Dash`.
    pub const fn is_mark(self) -> bool {
        !matches!(self, Symbol::EndOfCharacter)
    }
}

/// One discrete color on the light channel.
///
/// Used both for pulses the transmitter renders and for the labels a light
/// classifier reports to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    /// Framing color (red on the reference devices).
    Start,

    /// Dark color that carries symbol timing (black).
    Low,

    /// Bright color that closes a symbol (white).
    High,
}

/// Fixed-capacity buffer of pulses produced by the encoder.
pub type PulseSequence<const N: usize> = Vec<Pulse, N>;

/// Encoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Pulse buffer capacity exceeded.
    CapacityExceeded {
        /// Pulses the message needs.
        required: usize,
        /// Capacity of the target buffer.
        capacity: usize,
    },
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::CapacityExceeded { required, capacity } => {
                write!(
                    f,
                    "encoded message needs {} pulses but buffer holds {}",
                    required, capacity
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration window has no interior (`min >= max`).
    EmptyWindow,

    /// Duration windows overlap or are not ordered dot < dash < end.
    OverlappingWindows,

    /// An intensity band has no interior (`min >= max`).
    EmptyBand,

    /// Two intensity bands overlap.
    OverlappingBands,

    /// Render tick of zero length.
    ZeroTick,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::EmptyWindow => write!(f, "duration window must have min < max"),
            ConfigError::OverlappingWindows => {
                write!(f, "duration windows must be ordered dot < dash < end without overlap")
            }
            ConfigError::EmptyBand => write!(f, "intensity band must have min < max"),
            ConfigError::OverlappingBands => write!(f, "intensity bands must not overlap"),
            ConfigError::ZeroTick => write!(f, "render tick must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
