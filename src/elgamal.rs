//! Exponential ElGamal over the order-`Q` subgroup of `Z_P^*`.
//!
//! A message `m` under public key `K` and nonce `r` encrypts to `(G^r, K^r * G^m)`. Multiplying
//! two ciphertexts component-wise encrypts the sum of their messages under the sum of their
//! nonces, which is how a contest's selections are aggregated.
use crate::{
    arithmetics::{discrete_log, g_pow_p, mult_p, negate_q, pow_p, ElementModP, ElementModQ},
    constants::{ONE_MOD_P, ONE_MOD_Q},
    error::{Error, Result},
    hash::CryptoHashable,
    MAX_DLOG_EXPONENT,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalCiphertext {
    /// `G^r`
    pad: ElementModP,
    /// `K^r * G^m`
    data: ElementModP,
}

impl ElGamalCiphertext {
    pub fn new(pad: ElementModP, data: ElementModP) -> Self {
        return Self { pad, data };
    }

    pub fn get_pad(&self) -> &ElementModP {
        return &self.pad;
    }

    pub fn get_data(&self) -> &ElementModP {
        return &self.data;
    }

    /// Homomorphic addition of the two encrypted messages
    pub fn add(&self, other: &Self) -> Self {
        return Self::new(
            mult_p(&self.pad, &other.pad),
            mult_p(&self.data, &other.data),
        );
    }

    /// Both components are members of the order-`Q` subgroup
    pub fn is_valid_residue(&self) -> bool {
        return self.pad.is_valid_residue() && self.data.is_valid_residue();
    }

    /// Decrypt with the secret key by computing `data * pad^(-s)` and taking its discrete log
    pub fn decrypt_with_secret(&self, secret_key: &ElementModQ) -> Result<u64> {
        let pad_inverse = pow_p(&self.pad, &negate_q(secret_key));
        return Self::decode(&mult_p(&self.data, &pad_inverse));
    }

    /// Decrypt with the public key and the nonce the message was encrypted with
    pub fn decrypt_known_nonce(
        &self,
        public_key: &ElementModP,
        nonce: &ElementModQ,
    ) -> Result<u64> {
        let blind_inverse = pow_p(public_key, &negate_q(nonce));
        return Self::decode(&mult_p(&self.data, &blind_inverse));
    }

    /// Decrypt given the blinding product `K^s` computed elsewhere
    pub fn decrypt_known_product(&self, product: &ElementModP) -> Result<u64> {
        let inverse = pow_p(product, &negate_q(&ONE_MOD_Q));
        return Self::decode(&mult_p(&self.data, &inverse));
    }

    fn decode(g_to_m: &ElementModP) -> Result<u64> {
        return discrete_log(g_to_m, MAX_DLOG_EXPONENT).ok_or_else(|| {
            Error::Runtime("decrypted message exceeds the discrete log bound".to_string())
        });
    }
}

impl CryptoHashable for ElGamalCiphertext {
    fn crypto_hash(&self) -> ElementModQ {
        return crate::hash_elems!(self.pad, self.data);
    }
}

/// Encrypt a message under a public key with the given nonce. A zero nonce would publish the
/// message in the clear and is rejected.
pub fn elgamal_encrypt(
    message: u64,
    nonce: &ElementModQ,
    public_key: &ElementModP,
) -> Result<ElGamalCiphertext> {
    if nonce.is_zero() {
        return Err(Error::InvalidArgument(
            "ElGamal encryption requires a non-zero nonce".to_string(),
        ));
    }
    let pad = g_pow_p(nonce);
    let g_to_m = g_pow_p(&ElementModQ::from_u64(message));
    let data = mult_p(&pow_p(public_key, nonce), &g_to_m);
    return Ok(ElGamalCiphertext::new(pad, data));
}

/// Homomorphically add any number of ciphertexts; the empty sum is `(1, 1)`, an encryption of
/// zero under the zero nonce
pub fn elgamal_add(ciphertexts: &[ElGamalCiphertext]) -> ElGamalCiphertext {
    return ciphertexts.iter().fold(
        ElGamalCiphertext::new(ONE_MOD_P, ONE_MOD_P),
        |acc, ciphertext| acc.add(ciphertext),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arithmetics::add_q, constants::ZERO_MOD_Q, keys::ElGamalKeyPair};

    #[test]
    fn test_encrypt_then_decrypt() {
        let keypair = ElGamalKeyPair::generate();
        for message in [0u64, 1, 5] {
            let nonce = ElementModQ::rand_q();
            let ciphertext = elgamal_encrypt(message, &nonce, keypair.get_public_key()).unwrap();
            assert_eq!(
                ciphertext
                    .decrypt_with_secret(keypair.get_secret_key())
                    .unwrap(),
                message
            );
            assert_eq!(
                ciphertext
                    .decrypt_known_nonce(keypair.get_public_key(), &nonce)
                    .unwrap(),
                message
            );
            let product = pow_p(keypair.get_public_key(), &nonce);
            assert_eq!(ciphertext.decrypt_known_product(&product).unwrap(), message);
            assert!(ciphertext.is_valid_residue());
        }
    }

    #[test]
    fn test_zero_nonce_is_rejected() {
        let keypair = ElGamalKeyPair::generate();
        let result = elgamal_encrypt(1, &ZERO_MOD_Q, keypair.get_public_key());
        assert_eq!(
            result.unwrap_err().status(),
            crate::Status::InvalidArgument
        );
    }

    #[test]
    fn test_homomorphic_addition() {
        let keypair = ElGamalKeyPair::generate();
        let r1 = ElementModQ::rand_q();
        let r2 = ElementModQ::rand_q();
        let c1 = elgamal_encrypt(2, &r1, keypair.get_public_key()).unwrap();
        let c2 = elgamal_encrypt(3, &r2, keypair.get_public_key()).unwrap();
        let sum = elgamal_add(&[c1, c2]);
        assert_eq!(sum, c1.add(&c2));
        assert_eq!(sum.decrypt_with_secret(keypair.get_secret_key()).unwrap(), 5);
        assert_eq!(
            sum.decrypt_known_nonce(keypair.get_public_key(), &add_q(&r1, &r2))
                .unwrap(),
            5
        );
    }

    #[test]
    fn test_crypto_hash_binds_both_components() {
        let keypair = ElGamalKeyPair::generate();
        let c = elgamal_encrypt(1, &ElementModQ::rand_q(), keypair.get_public_key()).unwrap();
        let swapped = ElGamalCiphertext::new(*c.get_data(), *c.get_pad());
        assert_ne!(c.crypto_hash(), swapped.crypto_hash());
    }
}
