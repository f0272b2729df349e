//! Elements of the two fields the protocol works in, and the arithmetic between them.
//!
//! An [`ElementModP`] lives in `Z_P^*`, where ciphertexts and public keys live. An
//! [`ElementModQ`] lives in `Z_Q` and is used for exponents: secret keys, nonces, proof
//! challenges and responses, and hashes.
use crate::{
    constants::{p_params, q_params, G, LARGE_PRIME, ONE_MOD_P, SMALL_PRIME},
    error::{Error, Result},
    BigIntP, BigIntQ, P_BYTES, P_LIMBS, Q_BITS, Q_BYTES, Q_LIMBS,
};
use crypto_bigint::{modular::runtime_mod::DynResidue, Encoding, Random};
use rand::rngs::OsRng;
use std::fmt;

/// An element of `Z_P^*`, `[0, P)` when constructed through the checked constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementModP(BigIntP);

/// An element of `Z_Q`, `[0, Q)` when constructed through the checked constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementModQ(BigIntQ);

impl ElementModP {
    /// Wrap a value, failing with [`Error::OutOfRange`] if it is not less than `P`
    pub fn new(value: BigIntP) -> Result<Self> {
        if value >= LARGE_PRIME {
            return Err(Error::OutOfRange(
                "element is not less than the large prime".to_string(),
            ));
        }
        return Ok(Self(value));
    }

    /// Wrap a value without checking its range. Only for values that are known to be valid.
    pub const fn new_unchecked(value: BigIntP) -> Self {
        return Self(value);
    }

    pub fn get_value(&self) -> &BigIntP {
        return &self.0;
    }

    pub fn is_in_bounds(&self) -> bool {
        return self.0 < LARGE_PRIME;
    }

    /// In range and a member of the order-`Q` subgroup
    pub fn is_valid_residue(&self) -> bool {
        if !self.is_in_bounds() || self.0 == BigIntP::ZERO {
            return false;
        }
        let order = widen(&SMALL_PRIME);
        return self.to_residue().pow_bounded_exp(&order, Q_BITS).retrieve() == BigIntP::ONE;
    }

    /// Parse big-endian bytes; shorter inputs are zero-extended on the left
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        return Self::new(BigIntP::from_be_slice(&left_pad::<P_BYTES>(bytes)?));
    }

    /// Fixed-width big-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        return self.0.to_be_bytes().to_vec();
    }

    /// Parse a hex string of either case; an odd number of digits is accepted
    pub fn from_hex(hex: &str) -> Result<Self> {
        return Self::from_bytes(&decode_hex(hex)?);
    }

    /// Upper-case hex without leading zero bytes
    pub fn to_hex(&self) -> String {
        return encode_hex(&self.to_bytes());
    }

    pub(crate) fn to_residue(&self) -> DynResidue<P_LIMBS> {
        return DynResidue::new(&self.0, p_params());
    }

    fn from_residue(residue: DynResidue<P_LIMBS>) -> Self {
        return Self(residue.retrieve());
    }
}

impl ElementModQ {
    /// Wrap a value, failing with [`Error::OutOfRange`] if it is not less than `Q`
    pub fn new(value: BigIntQ) -> Result<Self> {
        if value >= SMALL_PRIME {
            return Err(Error::OutOfRange(
                "element is not less than the small prime".to_string(),
            ));
        }
        return Ok(Self(value));
    }

    /// Wrap a value without checking its range. Only for values that are known to be valid.
    pub const fn new_unchecked(value: BigIntQ) -> Self {
        return Self(value);
    }

    pub fn from_u64(value: u64) -> Self {
        return Self(BigIntQ::from_u64(value));
    }

    /// Reduce any 256-bit value mod `Q`
    pub fn reduce(value: &BigIntQ) -> Self {
        return Self::from_residue(DynResidue::new(value, q_params()));
    }

    pub fn get_value(&self) -> &BigIntQ {
        return &self.0;
    }

    pub fn is_in_bounds(&self) -> bool {
        return self.0 < SMALL_PRIME;
    }

    pub fn is_zero(&self) -> bool {
        return self.0 == BigIntQ::ZERO;
    }

    /// A uniformly random element of `Z_Q`, drawn from the OS randomness source
    pub fn rand_q() -> Self {
        loop {
            let candidate = BigIntQ::random(&mut OsRng);
            if candidate < SMALL_PRIME {
                return Self(candidate);
            }
        }
    }

    /// Parse big-endian bytes; shorter inputs are zero-extended on the left
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        return Self::new(BigIntQ::from_be_slice(&left_pad::<Q_BYTES>(bytes)?));
    }

    /// Fixed-width big-endian bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        return self.0.to_be_bytes().to_vec();
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        return Self::from_bytes(&decode_hex(hex)?);
    }

    /// Upper-case hex without leading zero bytes
    pub fn to_hex(&self) -> String {
        return encode_hex(&self.to_bytes());
    }

    pub(crate) fn to_residue(&self) -> DynResidue<Q_LIMBS> {
        return DynResidue::new(&self.0, q_params());
    }

    fn from_residue(residue: DynResidue<Q_LIMBS>) -> Self {
        return Self(residue.retrieve());
    }
}

impl fmt::Display for ElementModP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.to_hex());
    }
}

impl fmt::Display for ElementModQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.to_hex());
    }
}

fn left_pad<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    if bytes.len() > N {
        return Err(Error::OutOfRange(format!(
            "{} bytes do not fit in {} bytes",
            bytes.len(),
            N
        )));
    }
    let mut padded = [0u8; N];
    padded[N - bytes.len()..].copy_from_slice(bytes);
    return Ok(padded);
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 == 1 {
        return Ok(hex::decode(format!("0{hex}"))?);
    }
    return Ok(hex::decode(hex)?);
}

fn encode_hex(bytes: &[u8]) -> String {
    let first = bytes.iter().position(|byte| *byte != 0);
    return match first {
        Some(first) => hex::encode_upper(&bytes[first..]),
        None => "00".to_string(),
    };
}

/// Zero-extend an exponent to the width of the large modulus so that it can be used with
/// residues mod `P`
pub(crate) fn widen(value: &BigIntQ) -> BigIntP {
    let mut bytes = [0u8; P_BYTES];
    bytes[P_BYTES - Q_BYTES..].copy_from_slice(&value.to_be_bytes());
    return BigIntP::from_be_slice(&bytes);
}

/// `G^exponent mod P`
pub fn g_pow_p(exponent: &ElementModQ) -> ElementModP {
    return pow_p(&G, exponent);
}

/// `base^exponent mod P`, in time independent of the exponent's value
pub fn pow_p(base: &ElementModP, exponent: &ElementModQ) -> ElementModP {
    let exponent = widen(exponent.get_value());
    return ElementModP::from_residue(base.to_residue().pow_bounded_exp(&exponent, Q_BITS));
}

/// `a * b mod P`
pub fn mult_p(a: &ElementModP, b: &ElementModP) -> ElementModP {
    return ElementModP::from_residue(a.to_residue().mul(&b.to_residue()));
}

/// The product of all elements mod `P`; the empty product is one
pub fn mult_all_p<'a>(elements: impl IntoIterator<Item = &'a ElementModP>) -> ElementModP {
    return elements
        .into_iter()
        .fold(ONE_MOD_P, |acc, element| mult_p(&acc, element));
}

/// `a + b mod Q`
pub fn add_q(a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
    return ElementModQ::from_residue(a.to_residue().add(&b.to_residue()));
}

/// `a - b mod Q`
pub fn a_minus_b_q(a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
    return ElementModQ::from_residue(a.to_residue().sub(&b.to_residue()));
}

/// `a * b mod Q`
pub fn mult_q(a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
    return ElementModQ::from_residue(a.to_residue().mul(&b.to_residue()));
}

/// `a + b * c mod Q`
pub fn a_plus_bc_q(a: &ElementModQ, b: &ElementModQ, c: &ElementModQ) -> ElementModQ {
    return add_q(a, &mult_q(b, c));
}

/// `-a mod Q`
pub fn negate_q(a: &ElementModQ) -> ElementModQ {
    let zero = DynResidue::new(&BigIntQ::ZERO, q_params());
    return ElementModQ::from_residue(zero.sub(&a.to_residue()));
}

/// Brute-force discrete log with base `G`: find the smallest `e <= bound` such that
/// `G^e == target`. If no such exponent exists, return None.
pub fn discrete_log(target: &ElementModP, bound: u64) -> Option<u64> {
    let mut exp = 0u64;
    let mut acc = ONE_MOD_P;
    while exp <= bound {
        if acc == *target {
            return Some(exp);
        }
        acc = mult_p(&acc, &G);
        exp += 1;
    }
    return None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ONE_MOD_Q, TWO_MOD_Q, ZERO_MOD_Q};

    #[test]
    fn test_checked_constructors() {
        assert!(ElementModP::new(LARGE_PRIME).is_err());
        assert!(ElementModQ::new(SMALL_PRIME).is_err());
        let below_q = SMALL_PRIME.wrapping_sub(&BigIntQ::ONE);
        assert!(ElementModQ::new(below_q).is_ok());
        assert_eq!(
            ElementModP::new(LARGE_PRIME).unwrap_err().status(),
            crate::Status::OutOfRange
        );
    }

    #[test]
    fn test_bytes_and_hex() {
        let x = ElementModQ::rand_q();
        assert_eq!(ElementModQ::from_bytes(&x.to_bytes()).unwrap(), x);
        assert_eq!(ElementModQ::from_hex(&x.to_hex()).unwrap(), x);

        let gx = g_pow_p(&x);
        assert_eq!(gx.to_bytes().len(), P_BYTES);
        assert_eq!(ElementModP::from_bytes(&gx.to_bytes()).unwrap(), gx);
        assert_eq!(ElementModP::from_hex(&gx.to_hex()).unwrap(), gx);

        assert_eq!(ElementModQ::from_u64(255).to_hex(), "FF");
        assert_eq!(ElementModQ::from_hex("abc").unwrap(), ElementModQ::from_u64(0xabc));
        assert_eq!(ZERO_MOD_Q.to_hex(), "00");
        assert!(ElementModQ::from_hex("not hex").is_err());
        assert!(ElementModQ::from_bytes(&[1u8; Q_BYTES + 1]).is_err());
    }

    #[test]
    fn test_field_arithmetic() {
        let a = ElementModQ::rand_q();
        let b = ElementModQ::rand_q();
        assert_eq!(a_minus_b_q(&add_q(&a, &b), &b), a);
        assert_eq!(add_q(&a, &negate_q(&a)), ZERO_MOD_Q);
        assert_eq!(mult_q(&a, &ONE_MOD_Q), a);
        assert_eq!(a_plus_bc_q(&a, &b, &TWO_MOD_Q), add_q(&a, &add_q(&b, &b)));

        // g^a * g^b = g^(a + b)
        assert_eq!(mult_p(&g_pow_p(&a), &g_pow_p(&b)), g_pow_p(&add_q(&a, &b)));
        // (g^a)^b = g^(ab)
        assert_eq!(pow_p(&g_pow_p(&a), &b), g_pow_p(&mult_q(&a, &b)));
        assert!(g_pow_p(&a).is_valid_residue());
    }

    #[test]
    fn test_discrete_log() {
        for exp in [0u64, 1, 2, 17, 300] {
            let target = g_pow_p(&ElementModQ::from_u64(exp));
            assert_eq!(discrete_log(&target, 1000), Some(exp));
        }
        let out_of_bound = g_pow_p(&ElementModQ::from_u64(12));
        assert_eq!(discrete_log(&out_of_bound, 10), None);
    }
}
