//! Logical shifts across the word array.
//!
//! The single-step shifts move bits by `0..64`, carrying bits between
//! neighbouring words. Larger moves combine them with whole-word shifts.

use std::ops::{Shl, Shr};

use super::{ArithmeticError, FixedWidthInt, WORD_BITS};

fn check_shift(n: u32) -> Result<(), ArithmeticError> {
    if n >= WORD_BITS {
        return Err(ArithmeticError::ShiftAmount(n));
    }
    Ok(())
}

impl<const N: usize> FixedWidthInt<N> {
    /// `self << n` for `0 <= n < 64`. Bits leaving word `N - 1` are lost.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::ShiftAmount` when `n >= 64`.
    pub fn shift_left_logical(&self, n: u32) -> Result<Self, ArithmeticError> {
        check_shift(n)?;
        Ok(self.shl_bits(n))
    }

    /// `self >> n` for `0 <= n < 64`.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::ShiftAmount` when `n >= 64`.
    pub fn shift_right_logical(&self, n: u32) -> Result<Self, ArithmeticError> {
        check_shift(n)?;
        Ok(self.shr_bits(n))
    }

    pub(crate) fn shl_bits(&self, n: u32) -> Self {
        debug_assert!(n < WORD_BITS);
        if n == 0 || self.len == 0 {
            return *self;
        }
        let mut out = Self::zero();
        // One word above the current top may pick up the carried bits.
        let top = self.len.min(N - 1);
        for i in (1..=top).rev() {
            out.words[i] = self.words[i] << n | self.words[i - 1] >> (WORD_BITS - n);
        }
        out.words[0] = self.words[0] << n;
        out.len = top + 1;
        out.normalize();
        out
    }

    pub(crate) fn shr_bits(&self, n: u32) -> Self {
        debug_assert!(n < WORD_BITS);
        if n == 0 || self.len == 0 {
            return *self;
        }
        let mut out = Self::zero();
        let last = self.len - 1;
        for i in 0..last {
            out.words[i] = self.words[i] >> n | self.words[i + 1] << (WORD_BITS - n);
        }
        out.words[last] = self.words[last] >> n;
        out.len = self.len;
        out.normalize();
        out
    }

    /// Move every word `k` places up. Words pushed past `N - 1` are lost.
    #[must_use]
    pub fn shift_words_left(&self, k: usize) -> Self {
        if k == 0 || self.len == 0 {
            return *self;
        }
        if k >= N {
            return Self::zero();
        }
        let mut out = Self::zero();
        let keep = self.len.min(N - k);
        out.words[k..k + keep].copy_from_slice(&self.words[..keep]);
        out.len = k + keep;
        out.normalize();
        out
    }

    /// Move every word `k` places down, discarding the lowest `k` words.
    #[must_use]
    pub fn shift_words_right(&self, k: usize) -> Self {
        if k == 0 {
            return *self;
        }
        if k >= self.len {
            return Self::zero();
        }
        let mut out = Self::zero();
        let keep = self.len - k;
        out.words[..keep].copy_from_slice(&self.words[k..self.len]);
        out.len = keep;
        out
    }
}

/// Shift by any amount; amounts of `BITS` or more give zero.
impl<const N: usize> Shl<u32> for FixedWidthInt<N> {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self {
        self.shift_words_left((rhs / WORD_BITS) as usize)
            .shl_bits(rhs % WORD_BITS)
    }
}

impl<const N: usize> Shr<u32> for FixedWidthInt<N> {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self {
        self.shift_words_right((rhs / WORD_BITS) as usize)
            .shr_bits(rhs % WORD_BITS)
    }
}
