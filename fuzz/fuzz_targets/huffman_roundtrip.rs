#![no_main]
use libfuzzer_sys::fuzz_target;
use squeeze::huffman;

fuzz_target!(|input: &[u8]| {
    if input.is_empty() {
        return;
    }

    let (compressed, bits) = huffman::easy_encode(input).unwrap();
    let mut restored = vec![0u8; input.len()];
    let produced = huffman::easy_decode(&compressed, bits, &mut restored).unwrap();
    assert_eq!(produced, input.len());
    assert_eq!(restored, input);

    // Decoding arbitrary garbage must error out, never panic.
    let mut sink = vec![0u8; 64];
    let _ = huffman::easy_decode(input, input.len() * 8, &mut sink);
});
