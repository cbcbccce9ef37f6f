#![no_main]
use libfuzzer_sys::fuzz_target;
use squeeze::rice;

fuzz_target!(|input: &[u8]| {
    if input.is_empty() {
        return;
    }

    let (compressed, bits) = rice::easy_encode(input).unwrap();
    let mut restored = vec![0u8; input.len()];
    let produced = rice::easy_decode(&compressed, bits, &mut restored).unwrap();
    assert_eq!(produced, input.len());
    assert_eq!(restored, input);

    // Truncated streams must error out, never panic.
    if bits > 5 {
        let _ = rice::easy_decode(&compressed, bits - 5, &mut restored);
    }
});
