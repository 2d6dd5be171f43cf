/// Deterministic string-to-bucket hash used for location assignment,
/// display jitter, and metric seeds.
///
/// Folds the string's UTF-16 code units into a 32-bit signed accumulator
/// (`acc = acc * 31 + unit` under wraparound), then takes the absolute
/// value modulo the requested bound. Stable across processes and restarts:
/// the same input always yields the same bucket, with a spread that is even
/// enough for display purposes.
///
/// Not cryptographic. The output is guessable by construction and must
/// never be used where unpredictability matters.
///
/// Callers derive independent-looking values from one identity by
/// appending suffixes (`"lat"`, `"lng"`, `"metrics"`); the values are not
/// independent beyond looking uncorrelated on screen.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[must_use]
pub fn identity_hash(key: &str, modulus: usize) -> usize {
    assert!(modulus > 0, "modulus must be non-zero");

    let mut acc: i32 = 0;
    for unit in key.encode_utf16() {
        acc = acc.wrapping_shl(5).wrapping_sub(acc).wrapping_add(i32::from(unit));
    }

    acc.unsigned_abs() as usize % modulus
}
