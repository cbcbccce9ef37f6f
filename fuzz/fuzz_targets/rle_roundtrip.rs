#![no_main]
use libfuzzer_sys::fuzz_target;
use squeeze::rle;

fuzz_target!(|input: &[u8]| {
    // Worst case is one packet per input byte.
    let mut compressed = vec![0u8; input.len() * 3 + 8];

    let used = rle::easy_encode::<u8>(input, &mut compressed).unwrap();
    let mut restored = vec![0u8; input.len()];
    let produced = rle::easy_decode::<u8>(&compressed[..used], &mut restored).unwrap();
    assert_eq!(produced, input.len());
    assert_eq!(restored, input);

    let used = rle::easy_encode::<u16>(input, &mut compressed).unwrap();
    let produced = rle::easy_decode::<u16>(&compressed[..used], &mut restored).unwrap();
    assert_eq!(produced, input.len());
    assert_eq!(restored, input);
});
