//! The key pairs
use crate::{
    arithmetics::{g_pow_p, ElementModP, ElementModQ},
    constants::TWO_MOD_Q,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// An ElGamal key pair: a secret exponent `s` and the public key `K = G^s mod P`
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct ElGamalKeyPair {
    secret_key: ElementModQ,
    public_key: ElementModP,
}

impl ElGamalKeyPair {
    /// Derive the key pair of a secret exponent. Secrets below 2 are rejected, since their public
    /// keys reveal them.
    pub fn from_secret(secret_key: &ElementModQ) -> Result<Self> {
        if !secret_key.is_in_bounds() {
            return Err(Error::OutOfRange(
                "secret key is not less than the small prime".to_string(),
            ));
        }
        if secret_key.get_value() < TWO_MOD_Q.get_value() {
            return Err(Error::InvalidArgument(
                "secret key must be at least 2".to_string(),
            ));
        }
        return Ok(Self {
            secret_key: *secret_key,
            public_key: g_pow_p(secret_key),
        });
    }

    /// Generate a key pair from a fresh random secret
    pub fn generate() -> Self {
        loop {
            if let Ok(keypair) = Self::from_secret(&ElementModQ::rand_q()) {
                return keypair;
            }
        }
    }

    pub fn get_secret_key(&self) -> &ElementModQ {
        return &self.secret_key;
    }

    pub fn get_public_key(&self) -> &ElementModP {
        return &self.public_key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{G, ONE_MOD_Q, ZERO_MOD_Q};

    #[test]
    fn test_keypair_from_secret() {
        let keypair = ElGamalKeyPair::from_secret(&TWO_MOD_Q).unwrap();
        assert_eq!(keypair.get_secret_key(), &TWO_MOD_Q);
        assert_eq!(
            keypair.get_public_key(),
            &crate::arithmetics::mult_p(&G, &G)
        );
    }

    #[test]
    fn test_small_secrets_are_rejected() {
        assert!(ElGamalKeyPair::from_secret(&ZERO_MOD_Q).is_err());
        assert!(ElGamalKeyPair::from_secret(&ONE_MOD_Q).is_err());
    }

    #[test]
    fn test_generate() {
        let keypair = ElGamalKeyPair::generate();
        assert!(keypair.get_public_key().is_valid_residue());
        assert_eq!(keypair.get_public_key(), &g_pow_p(keypair.get_secret_key()));
    }
}
