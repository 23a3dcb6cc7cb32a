//! Character to symbol tables.
//!
//! A [`CodeTable`] maps the letters `a`-`z` and digits `0`-`9` to their mark
//! patterns (dots and dashes). Patterns are stored without the trailing
//! [`Symbol::EndOfCharacter`]; [`CodeTable::symbols_for`] appends it.
//!
//! Two tables are provided:
//!
//! - [`CodeTable::INTERNATIONAL`] (the default) uses International Morse code
//!   and satisfies the round-trip law: every character decodes back to itself.
//! - [`CodeTable::LEGACY`] reproduces the table of the reference handset app,
//!   bugs included. Its encode and decode lists disagree for `k` and `u`-`z`,
//!   so a legacy receiver turns `k`, `w`, `x`, `y`, `z` into `u` and `v` into
//!   the unknown character. Use it only to talk to devices running that app.

use crate::types::Symbol;
use crate::types::Symbol::{Dash, Dot};

/// Longest mark pattern in any table.
pub const MAX_CODE_LEN: usize = 5;

type Entry = (char, &'static [Symbol]);

const DIGITS: [Entry; 10] = [
    ('1', &[Dot, Dash, Dash, Dash, Dash]),
    ('2', &[Dot, Dot, Dash, Dash, Dash]),
    ('3', &[Dot, Dot, Dot, Dash, Dash]),
    ('4', &[Dot, Dot, Dot, Dot, Dash]),
    ('5', &[Dot, Dot, Dot, Dot, Dot]),
    ('6', &[Dash, Dot, Dot, Dot, Dot]),
    ('7', &[Dash, Dash, Dot, Dot, Dot]),
    ('8', &[Dash, Dash, Dash, Dot, Dot]),
    ('9', &[Dash, Dash, Dash, Dash, Dot]),
    ('0', &[Dash, Dash, Dash, Dash, Dash]),
];

const INTERNATIONAL_ENTRIES: [Entry; 36] = [
    ('a', &[Dot, Dash]),
    ('b', &[Dash, Dot, Dot, Dot]),
    ('c', &[Dash, Dot, Dash, Dot]),
    ('d', &[Dash, Dot, Dot]),
    ('e', &[Dot]),
    ('f', &[Dot, Dot, Dash, Dot]),
    ('g', &[Dash, Dash, Dot]),
    ('h', &[Dot, Dot, Dot, Dot]),
    ('i', &[Dot, Dot]),
    ('j', &[Dot, Dash, Dash, Dash]),
    ('k', &[Dash, Dot, Dash]),
    ('l', &[Dot, Dash, Dot, Dot]),
    ('m', &[Dash, Dash]),
    ('n', &[Dash, Dot]),
    ('o', &[Dash, Dash, Dash]),
    ('p', &[Dot, Dash, Dash, Dot]),
    ('q', &[Dash, Dash, Dot, Dash]),
    ('r', &[Dot, Dash, Dot]),
    ('s', &[Dot, Dot, Dot]),
    ('t', &[Dash]),
    ('u', &[Dot, Dot, Dash]),
    ('v', &[Dot, Dot, Dot, Dash]),
    ('w', &[Dot, Dash, Dash]),
    ('x', &[Dash, Dot, Dot, Dash]),
    ('y', &[Dash, Dot, Dash, Dash]),
    ('z', &[Dash, Dash, Dot, Dot]),
    DIGITS[0],
    DIGITS[1],
    DIGITS[2],
    DIGITS[3],
    DIGITS[4],
    DIGITS[5],
    DIGITS[6],
    DIGITS[7],
    DIGITS[8],
    DIGITS[9],
];

// The legacy letters a-t agree with International Morse; u-z do not.
const LEGACY_ENCODE_ENTRIES: [Entry; 36] = [
    INTERNATIONAL_ENTRIES[0],
    INTERNATIONAL_ENTRIES[1],
    INTERNATIONAL_ENTRIES[2],
    INTERNATIONAL_ENTRIES[3],
    INTERNATIONAL_ENTRIES[4],
    INTERNATIONAL_ENTRIES[5],
    INTERNATIONAL_ENTRIES[6],
    INTERNATIONAL_ENTRIES[7],
    INTERNATIONAL_ENTRIES[8],
    INTERNATIONAL_ENTRIES[9],
    INTERNATIONAL_ENTRIES[10],
    INTERNATIONAL_ENTRIES[11],
    INTERNATIONAL_ENTRIES[12],
    INTERNATIONAL_ENTRIES[13],
    INTERNATIONAL_ENTRIES[14],
    INTERNATIONAL_ENTRIES[15],
    INTERNATIONAL_ENTRIES[16],
    INTERNATIONAL_ENTRIES[17],
    INTERNATIONAL_ENTRIES[18],
    INTERNATIONAL_ENTRIES[19],
    ('u', &[Dash, Dot, Dash]),
    ('v', &[Dot, Dot, Dot, Dash]),
    ('w', &[Dash, Dot, Dash]),
    ('x', &[Dash, Dot, Dash]),
    ('y', &[Dash, Dot, Dash]),
    ('z', &[Dash, Dot, Dash]),
    DIGITS[0],
    DIGITS[1],
    DIGITS[2],
    DIGITS[3],
    DIGITS[4],
    DIGITS[5],
    DIGITS[6],
    DIGITS[7],
    DIGITS[8],
    DIGITS[9],
];

// Searched in order, first match wins. `k` is listed with j's pattern and
// every letter from u to z shares k's real pattern.
const LEGACY_DECODE_ENTRIES: [Entry; 36] = [
    INTERNATIONAL_ENTRIES[0],
    INTERNATIONAL_ENTRIES[1],
    INTERNATIONAL_ENTRIES[2],
    INTERNATIONAL_ENTRIES[3],
    INTERNATIONAL_ENTRIES[4],
    INTERNATIONAL_ENTRIES[5],
    INTERNATIONAL_ENTRIES[6],
    INTERNATIONAL_ENTRIES[7],
    INTERNATIONAL_ENTRIES[8],
    INTERNATIONAL_ENTRIES[9],
    ('k', &[Dot, Dash, Dash, Dash]),
    INTERNATIONAL_ENTRIES[11],
    INTERNATIONAL_ENTRIES[12],
    INTERNATIONAL_ENTRIES[13],
    INTERNATIONAL_ENTRIES[14],
    INTERNATIONAL_ENTRIES[15],
    INTERNATIONAL_ENTRIES[16],
    INTERNATIONAL_ENTRIES[17],
    INTERNATIONAL_ENTRIES[18],
    INTERNATIONAL_ENTRIES[19],
    ('u', &[Dash, Dot, Dash]),
    ('v', &[Dash, Dot, Dash]),
    ('w', &[Dash, Dot, Dash]),
    ('x', &[Dash, Dot, Dash]),
    ('y', &[Dash, Dot, Dash]),
    ('z', &[Dash, Dot, Dash]),
    DIGITS[0],
    DIGITS[1],
    DIGITS[2],
    DIGITS[3],
    DIGITS[4],
    DIGITS[5],
    DIGITS[6],
    DIGITS[7],
    DIGITS[8],
    DIGITS[9],
];

/// Bidirectional mapping between characters and mark patterns.
///
/// Tables are plain `Copy` values pointing at static data, so encoder and
/// decoder can each hold one without sharing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTable {
    encode: &'static [Entry],
    decode: &'static [Entry],
}

impl CodeTable {
    /// International Morse code for `a`-`z` and `0`-`9`.
    pub const INTERNATIONAL: CodeTable = CodeTable {
        encode: &INTERNATIONAL_ENTRIES,
        decode: &INTERNATIONAL_ENTRIES,
    };

    /// Verbatim table of the reference handset app, including its defects.
    pub const LEGACY: CodeTable = CodeTable {
        encode: &LEGACY_ENCODE_ENTRIES,
        decode: &LEGACY_DECODE_ENTRIES,
    };

    /// Returns the mark pattern for a character, ignoring ASCII case.
    ///
    /// Returns `None` for characters outside the table.
    pub fn code_for(self, c: char) -> Option<&'static [Symbol]> {
        let c = c.to_ascii_lowercase();
        self.encode
            .iter()
            .find(|(key, _)| *key == c)
            .map(|(_, code)| *code)
    }

    /// Returns the full symbol sequence for a character: its marks followed
    /// by [`Symbol::EndOfCharacter`].
    pub fn symbols_for(self, c: char) -> Option<impl Iterator<Item = Symbol>> {
        self.code_for(c)
            .map(|code| code.iter().copied().chain(core::iter::once(Symbol::EndOfCharacter)))
    }

    /// Looks up the character for a mark pattern (no trailing end marker).
    pub fn lookup(self, marks: &[Symbol]) -> Option<char> {
        self.decode
            .iter()
            .find(|(_, code)| *code == marks)
            .map(|(c, _)| *c)
    }

    /// Decodes a complete symbol sequence.
    ///
    /// The sequence must end with exactly one [`Symbol::EndOfCharacter`] and
    /// contain no other end markers.
    pub fn decode(self, symbols: &[Symbol]) -> Option<char> {
        match symbols.split_last() {
            Some((Symbol::EndOfCharacter, marks)) if marks.iter().all(|s| s.is_mark()) => {
                self.lookup(marks)
            }
            _ => None,
        }
    }

    /// Iterates over every encodable character in table order.
    pub fn chars(self) -> impl Iterator<Item = char> {
        self.encode.iter().map(|(c, _)| *c)
    }

    /// Iterates over characters whose encoding does not decode back to them.
    ///
    /// Empty for [`CodeTable::INTERNATIONAL`].
    pub fn round_trip_failures(self) -> impl Iterator<Item = char> {
        self.encode
            .iter()
            .filter(move |(c, code)| self.lookup(code) != Some(*c))
            .map(|(c, _)| *c)
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable::INTERNATIONAL
    }
}
