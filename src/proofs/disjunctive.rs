//! Disjunctive Chaum-Pedersen proof that a ciphertext `(α, β)` encrypts 0 or 1.
//!
//! The prover runs the honest protocol for the branch of the true plaintext and simulates the
//! other branch by picking its challenge and response first. The overall challenge
//! `c = H(q, α, β, a0, b0, a1, b1)` splits into `c0 + c1`, so only one branch could have been
//! simulated.
use crate::{
    arithmetics::{
        a_minus_b_q, a_plus_bc_q, add_q, g_pow_p, mult_p, negate_q, pow_p, ElementModP,
        ElementModQ,
    },
    elgamal::ElGamalCiphertext,
    error::{Error, Result},
    hash::Nonces,
    hash_elems,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisjunctiveChaumPedersenProof {
    /// `a0`, the zero branch's commitment to the pad
    proof_zero_pad: ElementModP,
    /// `b0`, the zero branch's commitment to the data
    proof_zero_data: ElementModP,
    proof_one_pad: ElementModP,
    proof_one_data: ElementModP,
    proof_zero_challenge: ElementModQ,
    proof_one_challenge: ElementModQ,
    challenge: ElementModQ,
    proof_zero_response: ElementModQ,
    proof_one_response: ElementModQ,
}

impl DisjunctiveChaumPedersenProof {
    /// Prove that `message` encrypts `plaintext`, which must be 0 or 1.
    ///
    /// - `r`: the nonce the message was encrypted with
    /// - `k`: the public key
    /// - `q`: the extended base hash of the election
    /// - `seed`: the source of all randomness of the proof
    pub fn make(
        message: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        q: &ElementModQ,
        seed: &ElementModQ,
        plaintext: u64,
    ) -> Result<Self> {
        return match plaintext {
            0 => Ok(Self::make_zero(message, r, k, q, seed)),
            1 => Ok(Self::make_one(message, r, k, q, seed)),
            _ => Err(Error::InvalidArgument(format!(
                "cannot prove that {plaintext} is 0 or 1"
            ))),
        };
    }

    fn nonces(seed: &ElementModQ) -> Nonces {
        return Nonces::new(seed, &["disjoint-chaum-pedersen-proof".into()]);
    }

    fn make_zero(
        message: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        q: &ElementModQ,
        seed: &ElementModQ,
    ) -> Self {
        let (alpha, beta) = (message.get_pad(), message.get_data());
        let nonces = Self::nonces(seed);
        let (c1, v1, u0) = (nonces.get(0), nonces.get(1), nonces.get(2));

        // real branch
        let a0 = g_pow_p(&u0);
        let b0 = pow_p(k, &u0);

        // simulated branch
        let minus_c1 = negate_q(&c1);
        let a1 = mult_p(&g_pow_p(&v1), &pow_p(alpha, &minus_c1));
        let b1 = mult_p(
            &mult_p(&pow_p(k, &v1), &g_pow_p(&c1)),
            &pow_p(beta, &minus_c1),
        );

        let c = hash_elems!(q, alpha, beta, a0, b0, a1, b1);
        let c0 = a_minus_b_q(&c, &c1);
        let v0 = a_plus_bc_q(&u0, &c0, r);

        return Self {
            proof_zero_pad: a0,
            proof_zero_data: b0,
            proof_one_pad: a1,
            proof_one_data: b1,
            proof_zero_challenge: c0,
            proof_one_challenge: c1,
            challenge: c,
            proof_zero_response: v0,
            proof_one_response: v1,
        };
    }

    fn make_one(
        message: &ElGamalCiphertext,
        r: &ElementModQ,
        k: &ElementModP,
        q: &ElementModQ,
        seed: &ElementModQ,
    ) -> Self {
        let (alpha, beta) = (message.get_pad(), message.get_data());
        let nonces = Self::nonces(seed);
        let (c0, v0, u1) = (nonces.get(0), nonces.get(1), nonces.get(2));

        // simulated branch
        let minus_c0 = negate_q(&c0);
        let a0 = mult_p(&g_pow_p(&v0), &pow_p(alpha, &minus_c0));
        let b0 = mult_p(&pow_p(k, &v0), &pow_p(beta, &minus_c0));

        // real branch
        let a1 = g_pow_p(&u1);
        let b1 = pow_p(k, &u1);

        let c = hash_elems!(q, alpha, beta, a0, b0, a1, b1);
        let c1 = a_minus_b_q(&c, &c0);
        let v1 = a_plus_bc_q(&u1, &c1, r);

        return Self {
            proof_zero_pad: a0,
            proof_zero_data: b0,
            proof_one_pad: a1,
            proof_one_data: b1,
            proof_zero_challenge: c0,
            proof_one_challenge: c1,
            challenge: c,
            proof_zero_response: v0,
            proof_one_response: v1,
        };
    }

    /// Check the proof against the ciphertext it was made for. Any mismatch, including
    /// elements out of range, makes the proof invalid.
    pub fn is_valid(&self, message: &ElGamalCiphertext, k: &ElementModP, q: &ElementModQ) -> bool {
        let (alpha, beta) = (message.get_pad(), message.get_data());
        let (a0, b0) = (&self.proof_zero_pad, &self.proof_zero_data);
        let (a1, b1) = (&self.proof_one_pad, &self.proof_one_data);
        let (c0, c1, c) = (
            &self.proof_zero_challenge,
            &self.proof_one_challenge,
            &self.challenge,
        );
        let (v0, v1) = (&self.proof_zero_response, &self.proof_one_response);

        let in_bounds = [alpha, beta, a0, b0, a1, b1]
            .iter()
            .all(|element| element.is_valid_residue())
            && [c0, c1, c, v0, v1]
                .iter()
                .all(|element| element.is_in_bounds());
        if !in_bounds {
            tracing::debug!("disjunctive proof has elements out of range");
            return false;
        }

        let recomputed = hash_elems!(q, alpha, beta, a0, b0, a1, b1);
        let consistent_challenge = *c == recomputed && add_q(c0, c1) == *c;

        // g^v0 = a0 * α^c0
        let zero_pad = g_pow_p(v0) == mult_p(a0, &pow_p(alpha, c0));
        // g^v1 = a1 * α^c1
        let one_pad = g_pow_p(v1) == mult_p(a1, &pow_p(alpha, c1));
        // K^v0 = b0 * β^c0
        let zero_data = pow_p(k, v0) == mult_p(b0, &pow_p(beta, c0));
        // g^c1 * K^v1 = b1 * β^c1
        let one_data =
            mult_p(&g_pow_p(c1), &pow_p(k, v1)) == mult_p(b1, &pow_p(beta, c1));

        let valid = consistent_challenge && zero_pad && one_pad && zero_data && one_data;
        if !valid {
            tracing::debug!(
                consistent_challenge,
                zero_pad,
                one_pad,
                zero_data,
                one_data,
                "disjunctive proof failed verification"
            );
        }
        return valid;
    }

    pub fn get_challenge(&self) -> &ElementModQ {
        return &self.challenge;
    }

    pub fn get_proof_zero_challenge(&self) -> &ElementModQ {
        return &self.proof_zero_challenge;
    }

    pub fn get_proof_one_challenge(&self) -> &ElementModQ {
        return &self.proof_one_challenge;
    }

    pub fn get_proof_zero_response(&self) -> &ElementModQ {
        return &self.proof_zero_response;
    }

    pub fn get_proof_one_response(&self) -> &ElementModQ {
        return &self.proof_one_response;
    }

    pub fn get_proof_zero_pad(&self) -> &ElementModP {
        return &self.proof_zero_pad;
    }

    pub fn get_proof_zero_data(&self) -> &ElementModP {
        return &self.proof_zero_data;
    }

    pub fn get_proof_one_pad(&self) -> &ElementModP {
        return &self.proof_one_pad;
    }

    pub fn get_proof_one_data(&self) -> &ElementModP {
        return &self.proof_one_data;
    }
}
