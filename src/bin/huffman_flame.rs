use squeeze::huffman;

fn main() {
    // Enough skew that the tree is interesting, enough data that the
    // decode table scan dominates a profile.
    let input: Vec<u8> = (0..64 * 1024)
        .map(|i: usize| {
            if i % 11 < 7 {
                (i % 4) as u8
            } else {
                ((i * 131 + 17) % 256) as u8
            }
        })
        .collect();

    let mut restored = vec![0u8; input.len()];
    for _ in 0..100 {
        let (compressed, bits) = huffman::easy_encode(&input).unwrap();
        let produced = huffman::easy_decode(&compressed, bits, &mut restored).unwrap();
        assert_eq!(produced, input.len());
    }
}
