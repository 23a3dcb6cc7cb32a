//! Display colors for the light channel.
//!
//! The reference devices flash red for framing, black for the low pulse and
//! white for the high pulse. Any three colors work as long as the receiving
//! light sensor sees them in separate intensity bands.

use crate::types::Pulse;
use palette::Srgb;

/// Framing red (`#FA0404`).
pub const START_RED: Srgb = Srgb::new(250.0 / 255.0, 4.0 / 255.0, 4.0 / 255.0);

/// Low pulse color.
pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);

/// High pulse color.
pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

/// Maps pulses to the colors a transmitter renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulsePalette {
    /// Color for [`Pulse::Start`].
    pub start: Srgb,

    /// Color for [`Pulse::Low`].
    pub low: Srgb,

    /// Color for [`Pulse::High`].
    pub high: Srgb,

    /// Color shown when nothing is being transmitted.
    pub idle: Srgb,
}

impl PulsePalette {
    /// Red, black and white on a black idle screen.
    pub const REFERENCE: PulsePalette = PulsePalette {
        start: START_RED,
        low: BLACK,
        high: WHITE,
        idle: BLACK,
    };

    /// Returns the display color for a pulse.
    #[inline]
    pub fn color_for(&self, pulse: Pulse) -> Srgb {
        match pulse {
            Pulse::Start => self.start,
            Pulse::Low => self.low,
            Pulse::High => self.high,
        }
    }

    /// Returns the pulse rendered with exactly this color, if any.
    pub fn pulse_for(&self, color: Srgb) -> Option<Pulse> {
        [Pulse::Start, Pulse::Low, Pulse::High]
            .into_iter()
            .find(|pulse| self.color_for(*pulse) == color)
    }
}

impl Default for PulsePalette {
    fn default() -> Self {
        PulsePalette::REFERENCE
    }
}
