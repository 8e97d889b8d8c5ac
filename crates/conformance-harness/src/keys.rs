//! Key generation for state runs.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of generated keys.
pub const KEY_LENGTH: usize = 8;

/// Returns a random alphanumeric key of [`KEY_LENGTH`] characters.
#[must_use]
pub fn random_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns the key for the `index`th bulk record derived from `base`.
#[must_use]
pub fn bulk_key(base: &str, index: usize) -> String {
    format!("{base}-{index}")
}
