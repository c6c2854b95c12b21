//! Generated one-off passwords for administrator-created accounts.

use rand::Rng;
use rand::seq::SliceRandom;
use zeroize::Zeroizing;

/// Length of generated temporary passwords.
pub const TEMPORARY_PASSWORD_LENGTH: usize = 12;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Draw a temporary password of lowercase letters and digits from `rng`.
///
/// # Examples
/// ```
/// use kudotrio::domain::{generate_temporary_password, TEMPORARY_PASSWORD_LENGTH};
///
/// let password = generate_temporary_password(&mut rand::thread_rng());
/// assert_eq!(password.len(), TEMPORARY_PASSWORD_LENGTH);
/// ```
pub fn generate_temporary_password<R: Rng + ?Sized>(rng: &mut R) -> Zeroizing<String> {
    Zeroizing::new(
        (0..TEMPORARY_PASSWORD_LENGTH)
            .filter_map(|_| ALPHABET.choose(rng))
            .map(|byte| char::from(*byte))
            .collect(),
    )
}
