#![no_main]

use libfuzzer_sys::fuzz_target;

use fibwide_core::bignum::MulStrategy;
use fibwide_core::engine::{compute_unchecked, Algorithm};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // Indices past the ceiling are fine here: all three must wrap the same way.
    let n = u64::from(u16::from_le_bytes([data[0], data[1]]) % 4096);

    let linear = compute_unchecked::<11>(Algorithm::Linear, n, MulStrategy::SkipZeros);
    let matrix = compute_unchecked::<11>(Algorithm::Matrix, n, MulStrategy::Naive);
    let fast = compute_unchecked::<11>(Algorithm::FastDoubling, n, MulStrategy::SkipZeros);

    assert_eq!(linear, matrix, "Linear != Matrix at n={n}");
    assert_eq!(linear, fast, "Linear != FastDoubling at n={n}");
});
