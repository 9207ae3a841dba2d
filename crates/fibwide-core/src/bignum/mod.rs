//! Fixed-width multi-word unsigned integers.
//!
//! `FixedWidthInt<N>` stores `N` 64-bit words, least significant first, so
//! its value is `sum(words[i] * 2^(64 * i))`. The width never grows: bits
//! carried or shifted past word `N - 1` are dropped. This is a
//! bounded-precision engine, not a general bignum.
//!
//! Alongside the words the type keeps a significant word count: every
//! word at or above it is zero and the word just below it is not. Hot
//! loops use it to skip leading zero words.

mod arith;
mod decimal;
pub mod error;
mod shift;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

pub use arith::MulStrategy;
pub use decimal::decimal_capacity;
pub use error::ArithmeticError;

/// Bits per storage word.
pub const WORD_BITS: u32 = u64::BITS;

/// Unsigned integer made of `N` 64-bit words.
///
/// # Example
/// ```
/// use fibwide_core::bignum::FixedWidthInt;
///
/// let a = FixedWidthInt::<4>::from_u64(u64::MAX);
/// let b = a.wrapping_add(&FixedWidthInt::one());
/// assert_eq!(b.word(1), Some(1));
/// assert_eq!(b.to_string(), "18446744073709551616");
/// ```
#[derive(Clone, Copy)]
pub struct FixedWidthInt<const N: usize> {
    words: [u64; N],
    len: usize,
}

impl<const N: usize> FixedWidthInt<N> {
    const NONEMPTY: () = assert!(N > 0, "FixedWidthInt needs at least one word");

    /// Total number of bits of magnitude.
    #[allow(clippy::cast_possible_truncation)]
    pub const BITS: u32 = WORD_BITS * N as u32;

    /// The value zero.
    #[must_use]
    pub const fn zero() -> Self {
        let () = Self::NONEMPTY;
        Self {
            words: [0; N],
            len: 0,
        }
    }

    /// The value one.
    #[must_use]
    pub const fn one() -> Self {
        Self::from_u64(1)
    }

    /// A single-word value.
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        let mut out = Self::zero();
        if value != 0 {
            out.words[0] = value;
            out.len = 1;
        }
        out
    }

    /// Build a value from its raw words (least significant first).
    #[must_use]
    pub fn from_words(words: [u64; N]) -> Self {
        let mut out = Self { words, len: N };
        out.normalize();
        out
    }

    /// The largest representable value, `2^(64 * N) - 1`.
    #[must_use]
    pub const fn max_value() -> Self {
        let () = Self::NONEMPTY;
        Self {
            words: [u64::MAX; N],
            len: N,
        }
    }

    /// Set `words[pos] = value`, keeping the significant length in step.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::WordIndex` when `pos >= N`.
    pub fn set_word(&mut self, pos: usize, value: u64) -> Result<(), ArithmeticError> {
        if pos >= N {
            return Err(ArithmeticError::WordIndex { pos, width: N });
        }
        self.words[pos] = value;
        if value != 0 {
            self.len = self.len.max(pos + 1);
        } else if pos + 1 == self.len {
            self.normalize();
        }
        Ok(())
    }

    /// The word at `pos`, or `None` past the width.
    #[must_use]
    pub fn word(&self, pos: usize) -> Option<u64> {
        self.words.get(pos).copied()
    }

    /// All `N` words, least significant first.
    #[must_use]
    pub fn words(&self) -> &[u64; N] {
        &self.words
    }

    /// Number of low-order words that may be nonzero.
    #[must_use]
    pub fn significant_len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Number of bits needed to represent the value (0 for zero).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn bits(&self) -> u32 {
        match self.len {
            0 => 0,
            len => WORD_BITS * (len as u32) - self.words[len - 1].leading_zeros(),
        }
    }

    /// Index of the lowest set bit, or `None` for zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn trailing_zeros(&self) -> Option<u32> {
        self.words[..self.len]
            .iter()
            .position(|&w| w != 0)
            .map(|i| WORD_BITS * i as u32 + self.words[i].trailing_zeros())
    }

    /// Whether bit `i` is set. Bits past the width read as zero.
    #[must_use]
    pub fn bit(&self, i: u32) -> bool {
        let word = (i / WORD_BITS) as usize;
        word < self.len && (self.words[word] >> (i % WORD_BITS)) & 1 == 1
    }

    /// The value as a `u64`, if it fits in one word.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match self.len {
            0 => Some(0),
            1 => Some(self.words[0]),
            _ => None,
        }
    }

    /// Shrink `len` until the top counted word is nonzero.
    fn normalize(&mut self) {
        while self.len > 0 && self.words[self.len - 1] == 0 {
            self.len -= 1;
        }
    }
}

impl<const N: usize> Default for FixedWidthInt<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<u64> for FixedWidthInt<N> {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl<const N: usize> PartialEq for FixedWidthInt<N> {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl<const N: usize> Eq for FixedWidthInt<N> {}

impl<const N: usize> Hash for FixedWidthInt<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.words.hash(state);
    }
}

impl<const N: usize> Ord for FixedWidthInt<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len.cmp(&other.len).then_with(|| {
            self.words[..self.len]
                .iter()
                .rev()
                .cmp(other.words[..other.len].iter().rev())
        })
    }
}

impl<const N: usize> PartialOrd for FixedWidthInt<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> fmt::Debug for FixedWidthInt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedWidthInt")
            .field("width", &N)
            .field("words", &&self.words[..self.len])
            .finish()
    }
}
