use thiserror::Error;

use crate::tone_table::{DtmfSequence, DtmfSymbol};

/// Why a decoded stream failed to match its expectation
///
/// Every variant carries the decoded buffer up to the failure and the
/// expected sequence for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceMismatch {
    #[error("decoded extra symbol {decoded} at position {position} (decoded: {buffer}, expected: {expected})")]
    Surplus {
        position: usize,
        decoded: DtmfSymbol,
        buffer: DtmfSequence,
        expected: DtmfSequence,
    },

    #[error("expected {wanted} at position {position} but decoded {decoded} (decoded: {buffer}, expected: {expected})")]
    Divergent {
        position: usize,
        wanted: DtmfSymbol,
        decoded: DtmfSymbol,
        buffer: DtmfSequence,
        expected: DtmfSequence,
    },

    #[error("decoded sequence [{buffer}] does not match expected [{expected}]")]
    Incomplete {
        buffer: DtmfSequence,
        expected: DtmfSequence,
    },
}

impl SequenceMismatch {
    pub fn decoded(&self) -> &DtmfSequence {
        match self {
            SequenceMismatch::Surplus { buffer, .. }
            | SequenceMismatch::Divergent { buffer, .. }
            | SequenceMismatch::Incomplete { buffer, .. } => buffer,
        }
    }

    pub fn expected(&self) -> &DtmfSequence {
        match self {
            SequenceMismatch::Surplus { expected, .. }
            | SequenceMismatch::Divergent { expected, .. }
            | SequenceMismatch::Incomplete { expected, .. } => expected,
        }
    }

    /// Index of the offending symbol, if the failure happened mid-stream
    pub fn position(&self) -> Option<usize> {
        match self {
            SequenceMismatch::Surplus { position, .. }
            | SequenceMismatch::Divergent { position, .. } => Some(*position),
            SequenceMismatch::Incomplete { .. } => None,
        }
    }
}

/// Incremental comparison of decoded symbols against an expectation
///
/// Symbols arrive in segment order. The first surplus or divergent symbol
/// fails immediately; `finish` then requires the whole expectation to
/// have been seen.
#[derive(Debug, Clone)]
pub struct SequenceVerifier {
    expected: DtmfSequence,
    buffer: DtmfSequence,
    cursor: usize,
}

impl SequenceVerifier {
    pub fn new(expected: DtmfSequence) -> Self {
        Self {
            expected,
            buffer: DtmfSequence::new(),
            cursor: 0,
        }
    }

    pub fn push(&mut self, symbol: DtmfSymbol) -> Result<(), SequenceMismatch> {
        self.buffer.push(symbol);
        let position = self.cursor;

        match self.expected.get(position) {
            None => Err(SequenceMismatch::Surplus {
                position,
                decoded: symbol,
                buffer: self.buffer.clone(),
                expected: self.expected.clone(),
            }),
            Some(wanted) if wanted != symbol => Err(SequenceMismatch::Divergent {
                position,
                wanted,
                decoded: symbol,
                buffer: self.buffer.clone(),
                expected: self.expected.clone(),
            }),
            Some(_) => {
                self.cursor += 1;
                Ok(())
            }
        }
    }

    /// Symbols matched so far
    pub fn matched(&self) -> usize {
        self.cursor
    }

    pub fn decoded(&self) -> &DtmfSequence {
        &self.buffer
    }

    pub fn expected(&self) -> &DtmfSequence {
        &self.expected
    }

    pub fn finish(self) -> Result<DtmfSequence, SequenceMismatch> {
        if self.buffer == self.expected {
            Ok(self.buffer)
        } else {
            Err(SequenceMismatch::Incomplete {
                buffer: self.buffer,
                expected: self.expected,
            })
        }
    }
}
