//! Addition, subtraction and shift-and-add multiplication.
//!
//! Wrapping forms reduce modulo `2^(64 * N)`. Checked forms report
//! `Overflow` / `Underflow` instead.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::{ArithmeticError, FixedWidthInt, WORD_BITS};

/// How `wrapping_mul` walks the bits of the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MulStrategy {
    /// Visit all `64 * N` bit positions.
    Naive,
    /// Jump over runs of zero bits and whole zero words.
    #[default]
    SkipZeros,
}

impl MulStrategy {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::SkipZeros => "skip-zeros",
        }
    }
}

impl<const N: usize> FixedWidthInt<N> {
    /// Sum and whether a carry left word `N - 1`.
    #[must_use]
    pub fn overflowing_add(&self, other: &Self) -> (Self, bool) {
        let mut out = Self::zero();
        let span = self.len.max(other.len);
        let mut carry = false;
        for i in 0..span {
            let (s1, c1) = self.words[i].overflowing_add(other.words[i]);
            let (s2, c2) = s1.overflowing_add(u64::from(carry));
            out.words[i] = s2;
            carry = c1 | c2;
        }
        let overflow = if carry && span < N {
            out.words[span] = 1;
            out.len = span + 1;
            false
        } else {
            out.len = span;
            carry
        };
        out.normalize();
        (out, overflow)
    }

    /// Sum modulo `2^(64 * N)`; the final carry is discarded.
    #[must_use]
    pub fn wrapping_add(&self, other: &Self) -> Self {
        self.overflowing_add(other).0
    }

    /// # Errors
    ///
    /// `ArithmeticError::Overflow` when the sum needs more than `N` words.
    pub fn checked_add(&self, other: &Self) -> Result<Self, ArithmeticError> {
        match self.overflowing_add(other) {
            (sum, false) => Ok(sum),
            (_, true) => Err(ArithmeticError::Overflow),
        }
    }

    /// Difference and whether a borrow left word `N - 1`.
    #[must_use]
    pub fn overflowing_sub(&self, other: &Self) -> (Self, bool) {
        let mut out = Self::zero();
        let span = self.len.max(other.len);
        let mut borrow = false;
        for i in 0..span {
            let (d1, b1) = self.words[i].overflowing_sub(other.words[i]);
            let (d2, b2) = d1.overflowing_sub(u64::from(borrow));
            out.words[i] = d2;
            borrow = b1 | b2;
        }
        if borrow {
            // The borrow runs through every zero word above the span.
            out.words[span..].fill(u64::MAX);
            out.len = N;
        } else {
            out.len = span;
        }
        out.normalize();
        (out, borrow)
    }

    /// `self - other`, defined only for `self >= other`.
    ///
    /// # Errors
    ///
    /// `ArithmeticError::Underflow` when `self < other`.
    pub fn sub(&self, other: &Self) -> Result<Self, ArithmeticError> {
        match self.overflowing_sub(other) {
            (diff, false) => Ok(diff),
            (_, true) => Err(ArithmeticError::Underflow),
        }
    }

    /// Difference modulo `2^(64 * N)`.
    #[must_use]
    pub fn wrapping_sub(&self, other: &Self) -> Self {
        self.overflowing_sub(other).0
    }

    /// Binary long multiplication over every bit position of `other`.
    #[must_use]
    pub fn mul_naive(&self, other: &Self) -> Self {
        let mut acc = Self::zero();
        let mut shifted = *self;
        for i in 0..Self::BITS {
            if other.bit(i) {
                acc = acc.wrapping_add(&shifted);
            }
            shifted = shifted.shl_bits(1);
        }
        acc
    }

    /// Shift-and-add multiplication that skips zero runs in `other`.
    ///
    /// Produces the same truncated product as [`mul_naive`](Self::mul_naive).
    #[must_use]
    pub fn mul_skip_zeros(&self, other: &Self) -> Self {
        self.overflowing_mul(other).0
    }

    /// Truncated product and whether any bit of the exact product was lost.
    ///
    /// Loop invariant: `acc + a * b` equals the exact product. Every shift
    /// of `a` happens while `b` is still nonzero, so bits shifted out of
    /// `a` would have been added later and mean overflow.
    #[must_use]
    pub fn overflowing_mul(&self, other: &Self) -> (Self, bool) {
        let mut acc = Self::zero();
        let mut a = *self;
        let mut b = *other;
        let mut overflow = false;
        while !b.is_zero() && !a.is_zero() {
            if b.words[0] == 0 {
                overflow |= a.words[N - 1] != 0;
                a = a.shift_words_left(1);
                b = b.shift_words_right(1);
                continue;
            }
            let z = b.words[0].trailing_zeros();
            if z > 0 {
                overflow |= a.words[N - 1] >> (WORD_BITS - z) != 0;
                a = a.shl_bits(z);
                b = b.shr_bits(z);
            }
            let (sum, carried) = acc.overflowing_add(&a);
            acc = sum;
            overflow |= carried;
            b.words[0] &= !1;
            b.normalize();
        }
        (acc, overflow)
    }

    /// Product modulo `2^(64 * N)` using the given strategy.
    #[must_use]
    pub fn wrapping_mul(&self, other: &Self, strategy: MulStrategy) -> Self {
        match strategy {
            MulStrategy::Naive => self.mul_naive(other),
            MulStrategy::SkipZeros => self.mul_skip_zeros(other),
        }
    }

    /// # Errors
    ///
    /// `ArithmeticError::Overflow` when the product needs more than `N` words.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, ArithmeticError> {
        match self.overflowing_mul(other) {
            (product, false) => Ok(product),
            (_, true) => Err(ArithmeticError::Overflow),
        }
    }
}

/// Wrapping addition.
impl<const N: usize> Add for &FixedWidthInt<N> {
    type Output = FixedWidthInt<N>;

    fn add(self, rhs: Self) -> FixedWidthInt<N> {
        self.wrapping_add(rhs)
    }
}

/// Wrapping multiplication with [`MulStrategy::SkipZeros`].
impl<const N: usize> Mul for &FixedWidthInt<N> {
    type Output = FixedWidthInt<N>;

    fn mul(self, rhs: Self) -> FixedWidthInt<N> {
        self.mul_skip_zeros(rhs)
    }
}
