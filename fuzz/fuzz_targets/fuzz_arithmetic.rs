#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

use fibwide_core::bignum::{FixedWidthInt, MulStrategy};

type W4 = FixedWidthInt<4>;

fn words(data: &[u8]) -> [u64; 4] {
    let mut out = [0u64; 4];
    for (word, chunk) in out.iter_mut().zip(data.chunks(8)) {
        let mut bytes = [0u8; 8];
        bytes[..chunk.len()].copy_from_slice(chunk);
        *word = u64::from_le_bytes(bytes);
    }
    out
}

fn to_big(x: &W4) -> BigUint {
    let mut bytes = Vec::with_capacity(32);
    for w in x.words() {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 65 {
        return;
    }
    let a = W4::from_words(words(&data[..32]));
    let b = W4::from_words(words(&data[32..64]));
    let shift = u32::from(data[64]) % 64;
    let modulus = BigUint::from(1u8) << 256;

    assert_eq!(
        to_big(&a.wrapping_add(&b)),
        (to_big(&a) + to_big(&b)) % &modulus
    );
    assert_eq!(
        a.wrapping_mul(&b, MulStrategy::Naive),
        a.wrapping_mul(&b, MulStrategy::SkipZeros)
    );
    assert_eq!(
        to_big(&a.wrapping_mul(&b, MulStrategy::SkipZeros)),
        (to_big(&a) * to_big(&b)) % &modulus
    );
    assert_eq!(a.wrapping_add(&b).wrapping_sub(&b), a);
    assert_eq!(to_big(&(a >> shift)), to_big(&a) >> shift);
    assert_eq!(to_big(&(a << shift)), (to_big(&a) << shift) % &modulus);
});
