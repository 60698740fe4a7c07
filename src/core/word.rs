//! 256-bit Words
//!
//! Seeds and random numbers are arbitrary-width integers at the protocol
//! boundary. They are carried as 32-byte big-endian words, which is also the
//! encoding fed into commitment and proof hashing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of a word in bytes.
pub const WORD_BYTES: usize = 32;

/// Fixed-size 256-bit unsigned integer, big-endian.
///
/// Ordering of the byte array is numeric ordering, so `Word` can key a
/// `BTreeMap` and iterate in ascending numeric order.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Word(pub [u8; WORD_BYTES]);

impl Word {
    /// The value zero.
    pub const ZERO: Self = Self([0; WORD_BYTES]);

    /// The maximum representable value (2^256 - 1).
    pub const MAX: Self = Self([0xFF; WORD_BYTES]);

    /// Create a word from big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }

    /// Big-endian bytes of this word.
    pub const fn to_be_bytes(self) -> [u8; WORD_BYTES] {
        self.0
    }

    /// Borrow the big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; WORD_BYTES] {
        &self.0
    }

    /// Widen a `u64`.
    pub const fn from_u64(value: u64) -> Self {
        Self::from_u128(value as u128)
    }

    /// Widen a `u128`.
    pub const fn from_u128(value: u128) -> Self {
        let low = value.to_be_bytes();
        let mut out = [0u8; WORD_BYTES];
        let mut i = 0;
        while i < 16 {
            out[16 + i] = low[i];
            i += 1;
        }
        Self(out)
    }

    /// Narrow to `u128`, or `None` if the upper half is non-zero.
    pub fn to_u128(&self) -> Option<u128> {
        let (high, low) = self.0.split_at(16);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(low);
        Some(u128::from_be_bytes(buf))
    }

    /// True for the value zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Minimal `0x`-prefixed hex form (`0x0` for zero).
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.to_hex())
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for Word {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<[u8; WORD_BYTES]> for Word {
    fn from(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }
}

/// Errors parsing a word from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWordError {
    /// Empty input or empty hex body.
    #[error("empty word literal")]
    Empty,
    /// Hex literal longer than 64 digits.
    #[error("hex literal has {0} digits, at most 64 allowed")]
    TooLong(usize),
    /// Hex literal contains a non-hex character.
    #[error("invalid hex literal: {0}")]
    InvalidHex(String),
    /// Decimal literal contains a non-digit character.
    #[error("invalid decimal literal: {0}")]
    InvalidDecimal(String),
    /// Literal does not fit in 256 bits.
    #[error("literal exceeds 256 bits")]
    Overflow,
}

impl FromStr for Word {
    type Err = ParseWordError;

    /// Accepts `0x`-prefixed hex or decimal, both up to 256 bits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseWordError::Empty);
        }

        let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
            return parse_decimal(s);
        };

        if digits.is_empty() {
            return Err(ParseWordError::Empty);
        }
        if digits.len() > WORD_BYTES * 2 {
            return Err(ParseWordError::TooLong(digits.len()));
        }

        let padded = format!("{:0>width$}", digits, width = WORD_BYTES * 2);
        let mut out = [0u8; WORD_BYTES];
        hex::decode_to_slice(&padded, &mut out)
            .map_err(|e| ParseWordError::InvalidHex(e.to_string()))?;
        Ok(Self(out))
    }
}

/// Accumulate base-10 digits into a big-endian 32-byte buffer.
fn parse_decimal(s: &str) -> Result<Word, ParseWordError> {
    let mut out = [0u8; WORD_BYTES];
    for c in s.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| ParseWordError::InvalidDecimal(s.to_string()))?;

        let mut carry = digit;
        for byte in out.iter_mut().rev() {
            let v = u32::from(*byte) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        if carry != 0 {
            return Err(ParseWordError::Overflow);
        }
    }
    Ok(Word(out))
}

/// Declares a word-backed newtype with the shared conversions.
macro_rules! word_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Word);

        impl $name {
            /// Wrap a word.
            pub const fn new(word: Word) -> Self {
                Self(word)
            }

            /// The underlying word.
            pub fn word(&self) -> &Word {
                &self.0
            }
        }

        impl From<Word> for $name {
            fn from(word: Word) -> Self {
                Self(word)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(Word::from_u64(value))
            }
        }

        impl From<u128> for $name {
            fn from(value: u128) -> Self {
                Self(Word::from_u128(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ParseWordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<Word>().map(Self)
            }
        }
    };
}

word_newtype!(
    /// Caller-chosen identifier naming one randomness request.
    Seed
);

word_newtype!(
    /// Value delivered to a callback at settlement. Never range-checked.
    RandomNumber
);
