//! Constant Chaum-Pedersen proof that a ciphertext `(α, β)` encrypts a publicly known constant
//! `L`, without revealing the nonce.
use crate::{
    arithmetics::{a_plus_bc_q, g_pow_p, mult_p, mult_q, pow_p, ElementModP, ElementModQ},
    elgamal::ElGamalCiphertext,
    hash::Nonces,
    hash_elems,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantChaumPedersenProof {
    /// `a = g^u`
    pad: ElementModP,
    /// `b = K^u`
    data: ElementModP,
    challenge: ElementModQ,
    response: ElementModQ,
    constant: u64,
}

impl ConstantChaumPedersenProof {
    /// Prove that `message`, encrypted under `k` with nonce `r`, encrypts `constant`. The
    /// challenge is bound to `hash_header`, the extended base hash of the election.
    pub fn make(
        message: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        seed: &ElementModQ,
        hash_header: &ElementModQ,
        constant: u64,
    ) -> Self {
        let (alpha, beta) = (message.get_pad(), message.get_data());
        let u = Nonces::new(seed, &["constant-chaum-pedersen-proof".into()]).get(0);
        let a = g_pow_p(&u);
        let b = pow_p(k, &u);
        let c = hash_elems!(hash_header, alpha, beta, a, b);
        let v = a_plus_bc_q(&u, &c, r);
        return Self {
            pad: a,
            data: b,
            challenge: c,
            response: v,
            constant,
        };
    }

    /// Check the proof against the ciphertext it was made for
    pub fn is_valid(&self, message: &ElGamalCiphertext, k: &ElementModP, q: &ElementModQ) -> bool {
        let (alpha, beta) = (message.get_pad(), message.get_data());
        let (a, b, c, v) = (&self.pad, &self.data, &self.challenge, &self.response);

        let in_bounds = [alpha, beta, a, b]
            .iter()
            .all(|element| element.is_valid_residue())
            && c.is_in_bounds()
            && v.is_in_bounds();
        if !in_bounds {
            tracing::debug!("constant proof has elements out of range");
            return false;
        }

        let consistent_challenge = *c == hash_elems!(q, alpha, beta, a, b);
        // g^v = a * α^c
        let pad = g_pow_p(v) == mult_p(a, &pow_p(alpha, c));
        // g^(c * L) * K^v = b * β^c
        let constant = ElementModQ::from_u64(self.constant);
        let data = mult_p(&g_pow_p(&mult_q(c, &constant)), &pow_p(k, v))
            == mult_p(b, &pow_p(beta, c));

        let valid = consistent_challenge && pad && data;
        if !valid {
            tracing::debug!(
                consistent_challenge,
                pad,
                data,
                constant = self.constant,
                "constant proof failed verification"
            );
        }
        return valid;
    }

    pub fn get_pad(&self) -> &ElementModP {
        return &self.pad;
    }

    pub fn get_data(&self) -> &ElementModP {
        return &self.data;
    }

    pub fn get_challenge(&self) -> &ElementModQ {
        return &self.challenge;
    }

    pub fn get_response(&self) -> &ElementModQ {
        return &self.response;
    }

    pub fn get_constant(&self) -> u64 {
        return self.constant;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arithmetics::add_q,
        constants::{G, ONE_MOD_Q},
        elgamal::{elgamal_add, elgamal_encrypt},
        keys::ElGamalKeyPair,
    };

    #[test]
    fn test_correctness() {
        let keypair = ElGamalKeyPair::from_secret(&ElementModQ::from_u64(2718)).unwrap();
        let k = keypair.get_public_key();
        let q = ElementModQ::from_u64(99);
        let seed = ElementModQ::from_u64(100);

        // three selections with one vote, encrypted and summed as in a contest
        let nonces = [3u64, 5, 7].map(ElementModQ::from_u64);
        let ciphertexts: Vec<ElGamalCiphertext> = [0u64, 1, 0]
            .iter()
            .zip(nonces.iter())
            .map(|(vote, nonce)| elgamal_encrypt(*vote, nonce, k).unwrap())
            .collect();
        let sum = elgamal_add(&ciphertexts);
        let aggregate_nonce = nonces.iter().fold(crate::constants::ZERO_MOD_Q, |acc, n| add_q(&acc, n));

        let proof = ConstantChaumPedersenProof::make(&sum, &aggregate_nonce, k, &seed, &q, 1);
        assert!(proof.is_valid(&sum, k, &q));
        assert_eq!(
            proof,
            ConstantChaumPedersenProof::make(&sum, &aggregate_nonce, k, &seed, &q, 1)
        );

        let wrong_constant = ConstantChaumPedersenProof::make(&sum, &aggregate_nonce, k, &seed, &q, 2);
        assert!(!wrong_constant.is_valid(&sum, k, &q));
    }

    #[test]
    fn test_tampering() {
        let keypair = ElGamalKeyPair::from_secret(&ElementModQ::from_u64(2718)).unwrap();
        let k = keypair.get_public_key();
        let q = ElementModQ::from_u64(99);
        let r = ElementModQ::from_u64(42);
        let message = elgamal_encrypt(2, &r, k).unwrap();
        let proof = ConstantChaumPedersenProof::make(&message, &r, k, &ONE_MOD_Q, &q, 2);
        assert!(proof.is_valid(&message, k, &q));

        let mut tampered = vec![];
        let mut t = proof.clone();
        t.pad = mult_p(&t.pad, &G);
        tampered.push(t);
        let mut t = proof.clone();
        t.data = mult_p(&t.data, &G);
        tampered.push(t);
        let mut t = proof.clone();
        t.challenge = add_q(&t.challenge, &ONE_MOD_Q);
        tampered.push(t);
        let mut t = proof.clone();
        t.response = add_q(&t.response, &ONE_MOD_Q);
        tampered.push(t);
        let mut t = proof.clone();
        t.constant = 3;
        tampered.push(t);

        for t in tampered {
            assert!(!t.is_valid(&message, k, &q));
        }
    }
}
