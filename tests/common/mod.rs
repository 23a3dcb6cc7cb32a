//! Shared test infrastructure for flash-link integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use flash_link::{FlashDisplay, Pulse, PulsePalette, Srgb, TimeDuration, TimeInstant, TimeSource};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

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

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Display that records every color change together with when it happened
pub struct RecordingDisplay<'t> {
    timer: &'t MockTimeSource,
    history: Vec<(Srgb, TestInstant)>,
}

impl<'t> RecordingDisplay<'t> {
    pub fn new(timer: &'t MockTimeSource) -> Self {
        Self {
            timer,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[(Srgb, TestInstant)] {
        &self.history
    }

    /// Recorded changes mapped back to pulses; the idle color maps to `Low`
    /// with the reference palette.
    pub fn pulses(&self, palette: &PulsePalette) -> Vec<(Pulse, TestInstant)> {
        self.history
            .iter()
            .filter_map(|(color, at)| palette.pulse_for(*color).map(|pulse| (pulse, *at)))
            .collect()
    }
}

impl FlashDisplay for RecordingDisplay<'_> {
    fn set_color(&mut self, color: Srgb) {
        self.history.push((color, self.timer.now()));
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Labels and timestamps a receiver would observe for a pulse sequence
/// rendered with the given first hold and tick.
pub fn observed_transitions(pulses: &[Pulse], first_hold: u64, tick: u64) -> Vec<(Pulse, TestInstant)> {
    let mut out: Vec<(Pulse, TestInstant)> = Vec::new();
    let mut t = 0;
    for (i, pulse) in pulses.iter().enumerate() {
        if out.last().map(|(p, _)| p) != Some(pulse) {
            out.push((*pulse, TestInstant(t)));
        }
        t += if i == 0 { first_hold } else { tick };
    }
    out
}
