use crate::foundation::math::{Fnv1a64, splitmix64, unit_f64};

/// Deterministic pseudo-random value in `[0, 1)` keyed by an arbitrary string.
///
/// The same seed always yields the same value on every platform. Callers build seeds from stable
/// identifiers (column, row, quantized frame) so procedural jitter is stable between re-renders.
pub fn random(seed: &str) -> f64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(seed.as_bytes());
    unit_f64(splitmix64(h.finish()))
}

/// `floor(random(seed) * len)`; `len` must be non-zero.
pub fn random_index(seed: &str, len: usize) -> usize {
    debug_assert!(len > 0);
    ((random(seed) * len as f64) as usize).min(len.saturating_sub(1))
}

/// Pick one glyph of `alphabet` keyed by `seed`, or a space for an empty alphabet.
pub fn random_glyph(seed: &str, alphabet: &[char]) -> char {
    if alphabet.is_empty() {
        return ' ';
    }
    alphabet[random_index(seed, alphabet.len())]
}
