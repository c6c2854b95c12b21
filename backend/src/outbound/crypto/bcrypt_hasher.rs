//! Bcrypt implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl BcryptPasswordHasher {
    /// Hasher with a custom work factor, clamped to bcrypt's valid range.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, 31),
        }
    }
}

fn failed(error: impl ToString) -> PasswordHasherError {
    PasswordHasherError::failed(error.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(failed)?
            .map(PasswordHash::new)
            .map_err(failed)
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let hash = hash.as_str().to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(failed)?;
        // Unparseable hashes never match.
        Ok(outcome.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn verifies_its_own_hashes() {
        let hasher = BcryptPasswordHasher::with_cost(MIN_COST);
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn salts_each_hash() {
        let hasher = BcryptPasswordHasher::with_cost(MIN_COST);
        let first = hasher.hash("same").await.expect("hash");
        let second = hasher.hash("same").await.expect("hash");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hash_is_a_mismatch() {
        let hasher = BcryptPasswordHasher::with_cost(MIN_COST);
        let verdict = hasher
            .verify("anything", &PasswordHash::new("not-a-bcrypt-hash"))
            .await
            .expect("verify");
        assert!(!verdict);
    }

    #[rstest]
    #[case(0, MIN_COST)]
    #[case(10, 10)]
    #[case(99, 31)]
    fn cost_is_clamped(#[case] requested: u32, #[case] expected: u32) {
        assert_eq!(BcryptPasswordHasher::with_cost(requested).cost, expected);
    }
}
