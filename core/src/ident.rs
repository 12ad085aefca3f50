//! Short identifier generation for entities and log records.

use crate::rng::RandomSource;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_LEN: usize = 12;

/// A 12-character alphanumeric id. Practically unique: 62^12 values.
pub fn short_id<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.pick_index(ALPHABET.len())] as char)
        .collect()
}
