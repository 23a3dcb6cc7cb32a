//! Text to pulse encoding.
//!
//! A message is lower-cased, each character is looked up in a [`CodeTable`]
//! and its symbols are expanded into pulses. Characters the table does not
//! know are skipped. Every transmission opens with [`FRAMING_MARKER`].

use crate::code_table::CodeTable;
use crate::types::{EncodeError, Pulse, PulseSequence, Symbol};

/// Leading pulses that frame every transmission.
///
/// Two start pulses give the receiver a wider detection window than one.
pub const FRAMING_MARKER: [Pulse; 2] = [Pulse::Start, Pulse::Start];

/// Encodes text into pulses using a fixed code table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    table: CodeTable,
}

impl Encoder {
    /// Creates an encoder for the given table.
    pub const fn new(table: CodeTable) -> Self {
        Self { table }
    }

    /// Returns the table this encoder uses.
    pub fn table(self) -> CodeTable {
        self.table
    }

    /// Lazily yields the flat symbol sequence for a message.
    ///
    /// End-of-character markers stay embedded between characters.
    pub fn symbols(self, message: &str) -> impl Iterator<Item = Symbol> {
        message
            .chars()
            .filter_map(move |c| self.table.symbols_for(c))
            .flatten()
    }

    /// Lazily yields the complete pulse sequence for a message, framing
    /// marker first.
    pub fn pulses(self, message: &str) -> impl Iterator<Item = Pulse> {
        FRAMING_MARKER.into_iter().chain(
            self.symbols(message)
                .flat_map(|symbol| symbol.pulses().iter().copied()),
        )
    }

    /// Number of pulses [`Encoder::pulses`] yields for a message.
    pub fn encoded_len(&self, message: &str) -> usize {
        FRAMING_MARKER.len()
            + self
                .symbols(message)
                .map(|symbol| symbol.pulses().len())
                .sum::<usize>()
    }

    /// Encodes a message into a fixed-capacity buffer.
    ///
    /// # Errors
    /// * `CapacityExceeded` - The message needs more than `N` pulses
    pub fn encode<const N: usize>(&self, message: &str) -> Result<PulseSequence<N>, EncodeError> {
        let required = self.encoded_len(message);
        if required > N {
            return Err(EncodeError::CapacityExceeded {
                required,
                capacity: N,
            });
        }

        let mut sequence = PulseSequence::new();
        for pulse in self.pulses(message) {
            sequence.push(pulse).map_err(|_| EncodeError::CapacityExceeded {
                required,
                capacity: N,
            })?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("encoded {} chars into {} pulses", message.chars().count(), sequence.len());

        Ok(sequence)
    }
}

/// Encodes a message with [`CodeTable::INTERNATIONAL`].
pub fn encode_message<const N: usize>(message: &str) -> Result<PulseSequence<N>, EncodeError> {
    Encoder::default().encode(message)
}
