//! Decimal conversion without division.
//!
//! Rendering is the double-dabble scheme: walk the bits from the top,
//! doubling a buffer of ASCII digits and feeding each bit in as the carry
//! into the least significant digit.

use std::fmt;
use std::str::FromStr;

use super::{ArithmeticError, FixedWidthInt, WORD_BITS};

/// Digit buffer length for an `words`-word value.
///
/// `30_103 / 100_000` slightly exceeds `log10(2)`, so this is at least
/// `ceil(64 * words * log10(2)) + 1`.
#[must_use]
pub const fn decimal_capacity(words: usize) -> usize {
    words * WORD_BITS as usize * 30_103 / 100_000 + 2
}

impl<const N: usize> FixedWidthInt<N> {
    /// Render the value in base 10. Zero renders as `"0"`.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::Allocation` when the digit buffer cannot be
    /// reserved. No partial string is returned.
    pub fn to_decimal_string(&self) -> Result<String, ArithmeticError> {
        let capacity = decimal_capacity(N);
        let mut digits: Vec<u8> = Vec::new();
        digits
            .try_reserve_exact(capacity)
            .map_err(|e| ArithmeticError::Allocation(e.to_string()))?;
        digits.resize(capacity, b'0');

        let top = self.len;
        let mut value = *self;
        for _ in 0..top * WORD_BITS as usize {
            let mut carry = u8::from(value.words[top - 1] >> (WORD_BITS - 1) == 1);
            for digit in digits.iter_mut().rev() {
                let doubled = (*digit - b'0') * 2 + carry;
                carry = u8::from(doubled >= 10);
                *digit = b'0' + doubled - 10 * carry;
            }
            value = value.shl_bits(1);
        }

        let first = digits
            .iter()
            .position(|&d| d != b'0')
            .unwrap_or(capacity - 1);
        let mut out = String::new();
        out.try_reserve_exact(capacity - first)
            .map_err(|e| ArithmeticError::Allocation(e.to_string()))?;
        out.extend(digits[first..].iter().map(|&d| char::from(d)));
        Ok(out)
    }

    /// Parse a non-empty string of ASCII digits.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::Parse` for empty input or a non-digit character,
    /// `ArithmeticError::Overflow` when the value does not fit.
    pub fn from_decimal_str(s: &str) -> Result<Self, ArithmeticError> {
        if s.is_empty() {
            return Err(ArithmeticError::Parse("empty string".into()));
        }
        let ten = Self::from_u64(10);
        let mut value = Self::zero();
        for ch in s.chars() {
            let digit = ch
                .to_digit(10)
                .ok_or_else(|| ArithmeticError::Parse(format!("unexpected character {ch:?}")))?;
            value = value
                .checked_mul(&ten)?
                .checked_add(&Self::from_u64(u64::from(digit)))?;
        }
        Ok(value)
    }
}

impl<const N: usize> fmt::Display for FixedWidthInt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.to_decimal_string().map_err(|_| fmt::Error)?;
        f.pad_integral(true, "", &digits)
    }
}

impl<const N: usize> FromStr for FixedWidthInt<N> {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}
