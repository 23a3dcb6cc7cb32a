//! Streaming pulse-timing decoder.
//!
//! The decoder does not read symbols from colors directly. A symbol is the
//! time the channel stays low: the decoder notes when a low label arrives
//! and, on the following high label, classifies the elapsed time against
//! [`SymbolWindows`]. An end-of-character symbol completes a frame and the
//! collected marks are looked up in the [`CodeTable`].
//!
//! ```text
//!            start_session            Start
//!   Idle ───────────────────▶ Armed ─────────▶ Receiving ◀──┐
//!    ▲                          │                 │   Start │
//!    └──────── end_session ─────┴─────────────────┘─────────┘
//! ```

use crate::code_table::{CodeTable, MAX_CODE_LEN};
use crate::time::{TimeDuration, TimeInstant};
use crate::types::{ConfigError, Pulse, Symbol};
use heapless::Vec;

/// Character emitted for a frame that matches no table entry.
pub const UNKNOWN_CHAR: char = '*';

/// Open interval of low-hold durations, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DurationWindow {
    /// Exclusive lower bound.
    pub min_millis: u64,
    /// Exclusive upper bound.
    pub max_millis: u64,
}

impl DurationWindow {
    /// Creates a window `(min_millis, max_millis)`.
    pub const fn new(min_millis: u64, max_millis: u64) -> Self {
        Self {
            min_millis,
            max_millis,
        }
    }

    /// Returns true if `millis` lies strictly inside the window.
    #[inline]
    pub fn contains(&self, millis: u64) -> bool {
        millis > self.min_millis && millis < self.max_millis
    }
}

/// Classification windows mapping low-hold durations to symbols.
///
/// Durations between windows belong to no symbol and are dropped by the
/// decoder (and counted in [`DecoderStats::ignored_durations`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SymbolWindows {
    dot: DurationWindow,
    dash: DurationWindow,
    end: DurationWindow,
}

impl SymbolWindows {
    /// Windows matching the reference 300 ms tick: dot (200, 450),
    /// dash (500, 700), end of character (800, 1000).
    pub const REFERENCE: SymbolWindows = SymbolWindows {
        dot: DurationWindow::new(200, 450),
        dash: DurationWindow::new(500, 700),
        end: DurationWindow::new(800, 1000),
    };

    /// Creates a builder starting from the reference windows.
    pub fn builder() -> SymbolWindowsBuilder {
        SymbolWindowsBuilder {
            windows: Self::REFERENCE,
        }
    }

    /// Classifies a low-hold duration.
    pub fn classify(&self, millis: u64) -> Option<Symbol> {
        if self.dash.contains(millis) {
            Some(Symbol::Dash)
        } else if self.dot.contains(millis) {
            Some(Symbol::Dot)
        } else if self.end.contains(millis) {
            Some(Symbol::EndOfCharacter)
        } else {
            None
        }
    }

    /// Window for [`Symbol::Dot`].
    pub fn dot(&self) -> DurationWindow {
        self.dot
    }

    /// Window for [`Symbol::Dash`].
    pub fn dash(&self) -> DurationWindow {
        self.dash
    }

    /// Window for [`Symbol::EndOfCharacter`].
    pub fn end(&self) -> DurationWindow {
        self.end
    }
}

impl Default for SymbolWindows {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Builder for validated [`SymbolWindows`].
#[derive(Debug, Clone, Copy)]
pub struct SymbolWindowsBuilder {
    windows: SymbolWindows,
}

impl SymbolWindowsBuilder {
    /// Sets the dot window.
    pub fn dot(mut self, min_millis: u64, max_millis: u64) -> Self {
        self.windows.dot = DurationWindow::new(min_millis, max_millis);
        self
    }

    /// Sets the dash window.
    pub fn dash(mut self, min_millis: u64, max_millis: u64) -> Self {
        self.windows.dash = DurationWindow::new(min_millis, max_millis);
        self
    }

    /// Sets the end-of-character window.
    pub fn end(mut self, min_millis: u64, max_millis: u64) -> Self {
        self.windows.end = DurationWindow::new(min_millis, max_millis);
        self
    }

    /// Builds and validates the windows.
    ///
    /// # Errors
    /// * `EmptyWindow` - A window has `min >= max`
    /// * `OverlappingWindows` - Windows are not ordered dot < dash < end
    pub fn build(self) -> Result<SymbolWindows, ConfigError> {
        let w = self.windows;
        if [w.dot, w.dash, w.end]
            .iter()
            .any(|window| window.min_millis >= window.max_millis)
        {
            return Err(ConfigError::EmptyWindow);
        }
        // Bounds are exclusive, so adjacent windows may share an endpoint.
        if w.dot.max_millis > w.dash.min_millis || w.dash.max_millis > w.end.min_millis {
            return Err(ConfigError::OverlappingWindows);
        }
        Ok(w)
    }
}

/// The current state of a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// No session. Every label is ignored.
    Idle,
    /// Session open, waiting for a framing marker.
    Armed,
    /// Collecting symbols for the current character.
    Receiving,
}

/// Diagnostic counters, accumulated for the lifetime of the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Dots and dashes recorded.
    pub symbols: u32,
    /// Characters emitted, including unknown ones.
    pub characters: u32,
    /// Characters emitted as [`UNKNOWN_CHAR`].
    pub unknown_characters: u32,
    /// Low-hold durations outside every window.
    pub ignored_durations: u32,
    /// Partial characters discarded by a new framing marker.
    pub discarded_frames: u32,
    /// Labels dropped because they repeated the previous label.
    pub repeated_labels: u32,
}

/// Decodes a stream of timestamped pulse labels into characters.
///
/// Labels are pushed one at a time with [`Decoder::classify`]; the decoder
/// never blocks and never fails. Noise degrades to ignored durations or
/// [`UNKNOWN_CHAR`].
///
/// # Type Parameters
/// * `I` - Time instant type used for label timestamps
#[derive(Debug, Clone)]
pub struct Decoder<I: TimeInstant> {
    table: CodeTable,
    windows: SymbolWindows,
    state: DecoderState,
    marks: Vec<Symbol, MAX_CODE_LEN>,
    overflowed: bool,
    low_since: Option<I>,
    last_label: Option<Pulse>,
    stats: DecoderStats,
}

impl<I: TimeInstant> Decoder<I> {
    /// Creates an idle decoder with the reference windows.
    pub fn new(table: CodeTable) -> Self {
        Self::with_windows(table, SymbolWindows::default())
    }

    /// Creates an idle decoder with custom windows.
    pub fn with_windows(table: CodeTable, windows: SymbolWindows) -> Self {
        Self {
            table,
            windows,
            state: DecoderState::Idle,
            marks: Vec::new(),
            overflowed: false,
            low_since: None,
            last_label: None,
            stats: DecoderStats::default(),
        }
    }

    /// Opens a session: the decoder waits for a framing marker.
    ///
    /// Restarting an open session discards any partial character.
    pub fn start_session(&mut self) {
        self.clear_frame();
        self.last_label = None;
        self.state = DecoderState::Armed;
    }

    /// Closes the session; labels are ignored until the next
    /// [`Decoder::start_session`].
    pub fn end_session(&mut self) {
        self.clear_frame();
        self.last_label = None;
        self.state = DecoderState::Idle;
    }

    /// Drops any partial character and re-arms an open session.
    pub fn reset(&mut self) {
        self.clear_frame();
        self.last_label = None;
        if self.state == DecoderState::Receiving {
            self.state = DecoderState::Armed;
        }
    }

    /// Feeds one classified label observed at `at`.
    ///
    /// Returns a character when an end-of-character symbol completes a frame.
    /// A label equal to the previous one is ignored, so runs of identical
    /// samples cannot record duplicate symbols.
    pub fn classify(&mut self, label: Pulse, at: I) -> Option<char> {
        if self.state == DecoderState::Idle {
            return None;
        }

        if self.last_label == Some(label) {
            self.stats.repeated_labels = self.stats.repeated_labels.saturating_add(1);
            return None;
        }
        self.last_label = Some(label);

        match (label, self.state) {
            (Pulse::Start, _) => {
                if self.state == DecoderState::Receiving && (!self.marks.is_empty() || self.overflowed) {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("decoder: framing marker discards {} marks", self.marks.len());

                    self.stats.discarded_frames = self.stats.discarded_frames.saturating_add(1);
                }
                self.clear_frame();
                self.state = DecoderState::Receiving;
                None
            }
            (Pulse::Low, DecoderState::Receiving) => {
                self.low_since = Some(at);
                None
            }
            (Pulse::High, DecoderState::Receiving) => {
                let since = self.low_since.take()?;
                self.record(at.duration_since(since).as_millis())
            }
            _ => None,
        }
    }

    fn record(&mut self, millis: u64) -> Option<char> {
        let Some(symbol) = self.windows.classify(millis) else {
            #[cfg(feature = "defmt")]
            defmt::debug!("decoder: ignoring {} ms low hold", millis);

            self.stats.ignored_durations = self.stats.ignored_durations.saturating_add(1);
            return None;
        };

        if symbol.is_mark() {
            self.stats.symbols = self.stats.symbols.saturating_add(1);
            if self.marks.push(symbol).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let decoded = if self.overflowed {
            None
        } else {
            self.table.lookup(&self.marks)
        };
        let c = decoded.unwrap_or(UNKNOWN_CHAR);

        #[cfg(feature = "defmt")]
        defmt::debug!("decoder: {} marks -> {}", self.marks.len(), c);

        self.stats.characters = self.stats.characters.saturating_add(1);
        if decoded.is_none() {
            self.stats.unknown_characters = self.stats.unknown_characters.saturating_add(1);
        }
        self.marks.clear();
        self.overflowed = false;
        Some(c)
    }

    fn clear_frame(&mut self) {
        self.marks.clear();
        self.overflowed = false;
        self.low_since = None;
    }

    /// Returns the current state of the decoder.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Marks collected for the character being received.
    pub fn pending(&self) -> &[Symbol] {
        &self.marks
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Table used for lookups.
    pub fn table(&self) -> CodeTable {
        self.table
    }

    /// Classification windows in use.
    pub fn windows(&self) -> SymbolWindows {
        self.windows
    }
}
