#![no_main]

use libfuzzer_sys::fuzz_target;

use fibwide_core::bignum::FixedWidthInt;

type W4 = FixedWidthInt<4>;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Arbitrary input must never panic; accepted input must render back.
    if let Ok(value) = text.parse::<W4>() {
        let rendered = value.to_string();
        assert_eq!(rendered.parse::<W4>().ok(), Some(value));
        let trimmed = text.trim_start_matches('0');
        let expected = if trimmed.is_empty() { "0" } else { trimmed };
        assert_eq!(rendered, expected);
    }
});
