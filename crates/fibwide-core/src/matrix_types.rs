//! 2x2 matrices over fixed-width integers for matrix exponentiation.

use crate::bignum::{FixedWidthInt, MulStrategy};

/// 2x2 matrix `[[a, b], [c, d]]`. Arithmetic wraps modulo `2^(64 * N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix<const N: usize> {
    pub a: FixedWidthInt<N>, // [0][0]
    pub b: FixedWidthInt<N>, // [0][1]
    pub c: FixedWidthInt<N>, // [1][0]
    pub d: FixedWidthInt<N>, // [1][1]
}

impl<const N: usize> Matrix<N> {
    /// Create the Fibonacci Q matrix [[1,1],[1,0]].
    #[must_use]
    pub fn fibonacci_q() -> Self {
        Self {
            a: FixedWidthInt::one(),
            b: FixedWidthInt::one(),
            c: FixedWidthInt::one(),
            d: FixedWidthInt::zero(),
        }
    }

    /// Whether `b == c`. Every power of Q is symmetric.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.b == self.c
    }

    /// Full product `self * other`: 8 multiplications, 4 additions.
    #[must_use]
    pub fn multiply(&self, other: &Self, strategy: MulStrategy) -> Self {
        let mul = |x: &FixedWidthInt<N>, y: &FixedWidthInt<N>| x.wrapping_mul(y, strategy);
        Self {
            a: mul(&self.a, &other.a).wrapping_add(&mul(&self.b, &other.c)),
            b: mul(&self.a, &other.b).wrapping_add(&mul(&self.b, &other.d)),
            c: mul(&self.c, &other.a).wrapping_add(&mul(&self.d, &other.c)),
            d: mul(&self.c, &other.b).wrapping_add(&mul(&self.d, &other.d)),
        }
    }

    /// `self * self`.
    ///
    /// Symmetric matrices take 4 multiplications and 3 additions:
    /// `a^2 + b^2`, `b (a + d)`, `b^2 + d^2`. Others fall back to
    /// [`multiply`](Self::multiply).
    #[must_use]
    pub fn square(&self, strategy: MulStrategy) -> Self {
        if !self.is_symmetric() {
            return self.multiply(self, strategy);
        }
        let a2 = self.a.wrapping_mul(&self.a, strategy);
        let b2 = self.b.wrapping_mul(&self.b, strategy);
        let d2 = self.d.wrapping_mul(&self.d, strategy);
        let off = self
            .b
            .wrapping_mul(&self.a.wrapping_add(&self.d), strategy);
        Self {
            a: a2.wrapping_add(&b2),
            b: off,
            c: off,
            d: b2.wrapping_add(&d2),
        }
    }

    /// Matrix-vector product `self * [x, y]`.
    #[must_use]
    pub fn apply(
        &self,
        v: &[FixedWidthInt<N>; 2],
        strategy: MulStrategy,
    ) -> [FixedWidthInt<N>; 2] {
        let [x, y] = v;
        [
            self.a
                .wrapping_mul(x, strategy)
                .wrapping_add(&self.b.wrapping_mul(y, strategy)),
            self.c
                .wrapping_mul(x, strategy)
                .wrapping_add(&self.d.wrapping_mul(y, strategy)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type M4 = Matrix<4>;

    fn w(v: u64) -> FixedWidthInt<4> {
        FixedWidthInt::from_u64(v)
    }

    #[test]
    fn fibonacci_q_matrix() {
        let q = M4::fibonacci_q();
        assert_eq!(q.a, w(1));
        assert_eq!(q.b, w(1));
        assert_eq!(q.c, w(1));
        assert!(q.d.is_zero());
        assert!(q.is_symmetric());
    }

    #[test]
    fn symmetric_square_matches_full_product() {
        let mut m = M4::fibonacci_q();
        for _ in 0..6 {
            let fast = m.square(MulStrategy::SkipZeros);
            let full = m.multiply(&m, MulStrategy::Naive);
            assert_eq!(fast, full);
            m = fast;
        }
        // Q^64 = [[F(65), F(64)], [F(64), F(63)]]
        assert_eq!(m.b, w(10_610_209_857_723));
        assert_eq!(m.d, w(6_557_470_319_842));
    }

    #[test]
    fn non_symmetric_square() {
        let m = M4 {
            a: w(1),
            b: w(2),
            c: w(3),
            d: w(4),
        };
        let sq = m.square(MulStrategy::SkipZeros);
        assert_eq!([sq.a, sq.b, sq.c, sq.d], [w(7), w(10), w(15), w(22)]);
    }

    #[test]
    fn apply_to_vector() {
        let q = M4::fibonacci_q();
        let v = q.apply(&[w(1), w(0)], MulStrategy::SkipZeros);
        assert_eq!(v, [w(1), w(1)]);
        let v = q.apply(&v, MulStrategy::Naive);
        assert_eq!(v, [w(2), w(1)]);
        let m = M4 {
            a: w(1),
            b: w(2),
            c: w(3),
            d: w(4),
        };
        assert_eq!(m.apply(&[w(5), w(9)], MulStrategy::SkipZeros), [w(23), w(51)]);
    }
}
