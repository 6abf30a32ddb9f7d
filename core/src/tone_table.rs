use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToneCheckError};

/// Standard telephony keypad symbol
///
/// Each symbol is the sum of one low-group tone (697, 770, 852, 941 Hz)
/// and one high-group tone (1209, 1336, 1477, 1633 Hz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub enum DtmfSymbol {
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
    D9,
    Star,
    Pound,
    A,
    B,
    C,
    D,
}

/// One row of the frequency plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEntry {
    pub symbol: DtmfSymbol,
    pub low: f64,
    pub high: f64,
}

const fn entry(symbol: DtmfSymbol, low: f64, high: f64) -> ToneEntry {
    ToneEntry { symbol, low, high }
}

/// Frequency plan in classification order. Ties during nearest-pair
/// search resolve to the earlier row.
pub static TONE_TABLE: [ToneEntry; 16] = [
    entry(DtmfSymbol::D0, 941.0, 1336.0),
    entry(DtmfSymbol::Star, 941.0, 1209.0),
    entry(DtmfSymbol::Pound, 941.0, 1477.0),
    entry(DtmfSymbol::D1, 697.0, 1209.0),
    entry(DtmfSymbol::D2, 697.0, 1336.0),
    entry(DtmfSymbol::D3, 697.0, 1477.0),
    entry(DtmfSymbol::D4, 770.0, 1209.0),
    entry(DtmfSymbol::D5, 770.0, 1336.0),
    entry(DtmfSymbol::D6, 770.0, 1477.0),
    entry(DtmfSymbol::D7, 852.0, 1209.0),
    entry(DtmfSymbol::D8, 852.0, 1336.0),
    entry(DtmfSymbol::D9, 852.0, 1477.0),
    entry(DtmfSymbol::A, 697.0, 1633.0),
    entry(DtmfSymbol::B, 770.0, 1633.0),
    entry(DtmfSymbol::C, 852.0, 1633.0),
    entry(DtmfSymbol::D, 941.0, 1633.0),
];

impl DtmfSymbol {
    pub const ALL: [DtmfSymbol; 16] = [
        DtmfSymbol::D0,
        DtmfSymbol::D1,
        DtmfSymbol::D2,
        DtmfSymbol::D3,
        DtmfSymbol::D4,
        DtmfSymbol::D5,
        DtmfSymbol::D6,
        DtmfSymbol::D7,
        DtmfSymbol::D8,
        DtmfSymbol::D9,
        DtmfSymbol::Star,
        DtmfSymbol::Pound,
        DtmfSymbol::A,
        DtmfSymbol::B,
        DtmfSymbol::C,
        DtmfSymbol::D,
    ];

    /// (low, high) frequency pair in Hz
    pub fn frequencies(self) -> (f64, f64) {
        match self {
            DtmfSymbol::D1 => (697.0, 1209.0),
            DtmfSymbol::D2 => (697.0, 1336.0),
            DtmfSymbol::D3 => (697.0, 1477.0),
            DtmfSymbol::A => (697.0, 1633.0),
            DtmfSymbol::D4 => (770.0, 1209.0),
            DtmfSymbol::D5 => (770.0, 1336.0),
            DtmfSymbol::D6 => (770.0, 1477.0),
            DtmfSymbol::B => (770.0, 1633.0),
            DtmfSymbol::D7 => (852.0, 1209.0),
            DtmfSymbol::D8 => (852.0, 1336.0),
            DtmfSymbol::D9 => (852.0, 1477.0),
            DtmfSymbol::C => (852.0, 1633.0),
            DtmfSymbol::Star => (941.0, 1209.0),
            DtmfSymbol::D0 => (941.0, 1336.0),
            DtmfSymbol::Pound => (941.0, 1477.0),
            DtmfSymbol::D => (941.0, 1633.0),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            DtmfSymbol::D0 => '0',
            DtmfSymbol::D1 => '1',
            DtmfSymbol::D2 => '2',
            DtmfSymbol::D3 => '3',
            DtmfSymbol::D4 => '4',
            DtmfSymbol::D5 => '5',
            DtmfSymbol::D6 => '6',
            DtmfSymbol::D7 => '7',
            DtmfSymbol::D8 => '8',
            DtmfSymbol::D9 => '9',
            DtmfSymbol::Star => '*',
            DtmfSymbol::Pound => '#',
            DtmfSymbol::A => 'A',
            DtmfSymbol::B => 'B',
            DtmfSymbol::C => 'C',
            DtmfSymbol::D => 'D',
        }
    }
}

impl TryFrom<char> for DtmfSymbol {
    type Error = ToneCheckError;

    fn try_from(c: char) -> Result<Self> {
        let symbol = match c {
            '0' => DtmfSymbol::D0,
            '1' => DtmfSymbol::D1,
            '2' => DtmfSymbol::D2,
            '3' => DtmfSymbol::D3,
            '4' => DtmfSymbol::D4,
            '5' => DtmfSymbol::D5,
            '6' => DtmfSymbol::D6,
            '7' => DtmfSymbol::D7,
            '8' => DtmfSymbol::D8,
            '9' => DtmfSymbol::D9,
            '*' => DtmfSymbol::Star,
            '#' => DtmfSymbol::Pound,
            'A' => DtmfSymbol::A,
            'B' => DtmfSymbol::B,
            'C' => DtmfSymbol::C,
            'D' => DtmfSymbol::D,
            other => return Err(ToneCheckError::UnknownSymbol(other)),
        };
        Ok(symbol)
    }
}

impl From<DtmfSymbol> for char {
    fn from(symbol: DtmfSymbol) -> char {
        symbol.as_char()
    }
}

impl fmt::Display for DtmfSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Ordered run of keypad symbols
///
/// Parses from a plain string (`"1243"`) and displays space separated
/// (`1 2 4 3`) for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DtmfSequence(Vec<DtmfSymbol>);

impl DtmfSequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, symbol: DtmfSymbol) {
        self.0.push(symbol);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DtmfSymbol> {
        self.0.get(index).copied()
    }

    pub fn symbols(&self) -> &[DtmfSymbol] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = DtmfSymbol> + '_ {
        self.0.iter().copied()
    }

    /// Symbols without separators, the inverse of parsing
    pub fn to_compact_string(&self) -> String {
        self.0.iter().map(|s| s.as_char()).collect()
    }
}

impl From<Vec<DtmfSymbol>> for DtmfSequence {
    fn from(symbols: Vec<DtmfSymbol>) -> Self {
        Self(symbols)
    }
}

impl FromIterator<DtmfSymbol> for DtmfSequence {
    fn from_iter<I: IntoIterator<Item = DtmfSymbol>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for DtmfSequence {
    type Err = ToneCheckError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars().map(DtmfSymbol::try_from).collect()
    }
}

impl TryFrom<String> for DtmfSequence {
    type Error = ToneCheckError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DtmfSequence> for String {
    fn from(sequence: DtmfSequence) -> String {
        sequence.to_compact_string()
    }
}

impl fmt::Display for DtmfSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}
