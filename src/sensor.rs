//! Light-intensity thresholding.
//!
//! Raw sensor readings are mapped to [`Pulse`] labels by three intensity
//! bands. Band limits are device calibration, not protocol constants: the
//! defaults match the reference handsets, where the red framing color reads
//! between 10 and 30 units, a white screen below 10 and a black screen
//! between 100 and 150.

use crate::types::{ConfigError, Pulse};

/// Open interval of raw sensor readings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntensityBand {
    /// Exclusive lower bound.
    pub min: f32,
    /// Exclusive upper bound.
    pub max: f32,
}

impl IntensityBand {
    /// Creates a band `(min, max)`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies strictly inside the band.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value > self.min && value < self.max
    }

    fn overlaps(&self, other: &IntensityBand) -> bool {
        self.min < other.max && other.min < self.max
    }
}

/// Intensity bands for each pulse color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightThresholds {
    start: IntensityBand,
    low: IntensityBand,
    high: IntensityBand,
}

impl LightThresholds {
    /// Calibration of the reference handsets.
    pub const REFERENCE: LightThresholds = LightThresholds {
        start: IntensityBand::new(10.0, 30.0),
        low: IntensityBand::new(100.0, 150.0),
        high: IntensityBand::new(0.0, 10.0),
    };

    /// Creates a builder starting from the reference calibration.
    pub fn builder() -> LightThresholdsBuilder {
        LightThresholdsBuilder {
            thresholds: Self::REFERENCE,
        }
    }

    /// Maps a raw reading to a pulse label, or `None` if no band contains it.
    pub fn classify(&self, value: f32) -> Option<Pulse> {
        if self.start.contains(value) {
            Some(Pulse::Start)
        } else if self.high.contains(value) {
            Some(Pulse::High)
        } else if self.low.contains(value) {
            Some(Pulse::Low)
        } else {
            None
        }
    }

    /// Band for [`Pulse::Start`].
    pub fn start(&self) -> IntensityBand {
        self.start
    }

    /// Band for [`Pulse::Low`].
    pub fn low(&self) -> IntensityBand {
        self.low
    }

    /// Band for [`Pulse::High`].
    pub fn high(&self) -> IntensityBand {
        self.high
    }
}

impl Default for LightThresholds {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Builder for validated [`LightThresholds`].
#[derive(Debug, Clone, Copy)]
pub struct LightThresholdsBuilder {
    thresholds: LightThresholds,
}

impl LightThresholdsBuilder {
    /// Sets the band read while the framing color is shown.
    pub fn start(mut self, min: f32, max: f32) -> Self {
        self.thresholds.start = IntensityBand::new(min, max);
        self
    }

    /// Sets the band read while the low color is shown.
    pub fn low(mut self, min: f32, max: f32) -> Self {
        self.thresholds.low = IntensityBand::new(min, max);
        self
    }

    /// Sets the band read while the high color is shown.
    pub fn high(mut self, min: f32, max: f32) -> Self {
        self.thresholds.high = IntensityBand::new(min, max);
        self
    }

    /// Builds and validates the thresholds.
    ///
    /// # Errors
    /// * `EmptyBand` - A band has `min >= max` (or a NaN bound)
    /// * `OverlappingBands` - Two bands share readings
    pub fn build(self) -> Result<LightThresholds, ConfigError> {
        let t = self.thresholds;
        let bands = [t.start, t.low, t.high];

        if bands.iter().any(|band| !(band.min < band.max)) {
            return Err(ConfigError::EmptyBand);
        }
        if t.start.overlaps(&t.low) || t.start.overlaps(&t.high) || t.low.overlaps(&t.high) {
            return Err(ConfigError::OverlappingBands);
        }

        Ok(t)
    }
}

/// Reports a label only when the classified color changes.
///
/// Sustained light levels produce many identical readings; only the first one
/// after a change is passed on, so the decoder sees transitions.
#[derive(Debug, Clone)]
pub struct TransitionDetector {
    thresholds: LightThresholds,
    last: Option<Pulse>,
    unclassified: u32,
}

impl TransitionDetector {
    /// Creates a detector with no previous label.
    pub fn new(thresholds: LightThresholds) -> Self {
        Self {
            thresholds,
            last: None,
            unclassified: 0,
        }
    }

    /// Feeds one raw reading.
    ///
    /// Returns the new label on a color change, `None` for repeats and for
    /// readings outside every band. Out-of-band readings do not reset the
    /// last label.
    pub fn observe(&mut self, value: f32) -> Option<Pulse> {
        let Some(label) = self.thresholds.classify(value) else {
            self.unclassified = self.unclassified.saturating_add(1);
            return None;
        };

        if self.last == Some(label) {
            return None;
        }
        self.last = Some(label);
        Some(label)
    }

    /// Forgets the last label so the next classified reading is reported.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Last label reported.
    pub fn last(&self) -> Option<Pulse> {
        self.last
    }

    /// Number of readings that fell outside every band.
    pub fn unclassified(&self) -> u32 {
        self.unclassified
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> LightThresholds {
        self.thresholds
    }
}

impl Default for TransitionDetector {
    fn default() -> Self {
        Self::new(LightThresholds::default())
    }
}
