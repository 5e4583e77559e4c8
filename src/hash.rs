/// Maps a string key to a bucket index in `[0, bucket_count)`.
///
/// Deterministic bit-mixing hash: each byte is folded into a 32 bit
/// accumulator with two alternating shift/xor formulas (the odd-position
/// formula additionally complements the mixed value), the sign bit is masked
/// off and the result is reduced modulo the bucket count. The function is
/// pure, so the same key always lands in the same bucket for a given table
/// size.
pub fn bucket_index(key: &str, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    let mut code: u32 = 0;
    for (pos, byte) in key.bytes().enumerate() {
        let byte = u32::from(byte);
        let mixed = if pos % 2 == 0 {
            (code << 7) ^ byte ^ (code >> 3)
        } else {
            !((code << 11) ^ byte ^ (code >> 5))
        };
        code ^= mixed;
    }
    ((code & 0x7FFF_FFFF) as usize) % bucket_count
}
