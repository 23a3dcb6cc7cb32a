//! Render cadence for transmitted pulses.
//!
//! Pulses are shown back to back. The first pulse is held longer than the
//! rest so the operator has time to line the screen up with the receiving
//! sensor; every later pulse lasts one tick.

use crate::time::TimeDuration;
use crate::types::{ConfigError, Pulse};

/// Two-phase timing schedule: one long first hold, then fixed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitSchedule<D: TimeDuration> {
    first_hold: D,
    tick: D,
}

impl<D: TimeDuration> TransmitSchedule<D> {
    /// Hold time of the first pulse on the reference devices.
    pub const REFERENCE_FIRST_HOLD_MS: u64 = 2000;

    /// Hold time of every later pulse on the reference devices.
    pub const REFERENCE_TICK_MS: u64 = 300;

    /// Creates a schedule.
    ///
    /// # Errors
    /// * `ZeroTick` - `tick` is zero
    pub fn new(first_hold: D, tick: D) -> Result<Self, ConfigError> {
        if tick.as_millis() == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(Self { first_hold, tick })
    }

    /// Hold time of the first pulse.
    pub fn first_hold(&self) -> D {
        self.first_hold
    }

    /// Hold time of every later pulse.
    pub fn tick(&self) -> D {
        self.tick
    }

    /// Hold time of the pulse at `index`.
    pub fn hold_for(&self, index: usize) -> D {
        if index == 0 { self.first_hold } else { self.tick }
    }

    /// Time from the start of transmission until pulse `index` is shown.
    pub fn offset_of(&self, index: usize) -> D {
        if index == 0 {
            return D::ZERO;
        }
        let later = (index as u64 - 1).saturating_mul(self.tick.as_millis());
        D::from_millis(self.first_hold.as_millis().saturating_add(later))
    }

    /// Total time needed to show `len` pulses.
    pub fn total_duration(&self, len: usize) -> D {
        self.offset_of(len)
    }

    /// Index of the pulse on screen after `elapsed` time.
    ///
    /// May be past the end of the sequence; callers compare against its length.
    pub fn pulse_index_at(&self, elapsed: D) -> usize {
        let elapsed_millis = elapsed.as_millis();
        let first_millis = self.first_hold.as_millis();
        if elapsed_millis < first_millis {
            return 0;
        }
        let ticks = (elapsed_millis - first_millis) / self.tick.as_millis();
        usize::try_from(ticks).map_or(usize::MAX, |t| t.saturating_add(1))
    }

    /// Time left until the pulse on screen at `elapsed` is replaced.
    pub fn remaining_at(&self, elapsed: D) -> D {
        let index = self.pulse_index_at(elapsed);
        let next = self.offset_of(index.saturating_add(1));
        next.saturating_sub(elapsed)
    }

    /// Returns a cursor that walks `pulses` with their hold times.
    pub fn cursor<'a>(&self, pulses: &'a [Pulse]) -> RenderCursor<'a, D> {
        RenderCursor {
            schedule: *self,
            pulses,
            index: 0,
        }
    }
}

impl<D: TimeDuration> Default for TransmitSchedule<D> {
    fn default() -> Self {
        Self {
            first_hold: D::from_millis(Self::REFERENCE_FIRST_HOLD_MS),
            tick: D::from_millis(Self::REFERENCE_TICK_MS),
        }
    }
}

/// One pulse together with how long to show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderFrame<D: TimeDuration> {
    /// Pulse to display.
    pub pulse: Pulse,

    /// How long to hold it.
    pub hold: D,
}

/// Explicit cursor over a pulse sequence for blocking render loops.
///
/// ```
/// use core::time::Duration;
/// use flash_link::{Pulse, TransmitSchedule};
///
/// let schedule = TransmitSchedule::<Duration>::default();
/// let pulses = [Pulse::Start, Pulse::Start, Pulse::Low, Pulse::High];
/// let mut cursor = schedule.cursor(&pulses);
///
/// let first = cursor.next().unwrap();
/// assert_eq!(first.hold, Duration::from_millis(2000));
/// assert_eq!(cursor.next().unwrap().hold, Duration::from_millis(300));
/// assert_eq!(cursor.position(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RenderCursor<'a, D: TimeDuration> {
    schedule: TransmitSchedule<D>,
    pulses: &'a [Pulse],
    index: usize,
}

impl<'a, D: TimeDuration> RenderCursor<'a, D> {
    /// Number of frames already yielded.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Returns true once every pulse has been yielded.
    pub fn is_finished(&self) -> bool {
        self.index >= self.pulses.len()
    }
}

impl<'a, D: TimeDuration> Iterator for RenderCursor<'a, D> {
    type Item = RenderFrame<D>;

    fn next(&mut self) -> Option<Self::Item> {
        let pulse = *self.pulses.get(self.index)?;
        let hold = self.schedule.hold_for(self.index);
        self.index += 1;
        Some(RenderFrame { pulse, hold })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pulses.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, D: TimeDuration> ExactSizeIterator for RenderCursor<'a, D> {}
