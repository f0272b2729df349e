//! The fixed group parameters of the election and the process-wide constant elements.
//!
//! `Q = 2^256 - 189` is the order of the subgroup in which every exponent lives. `P` is a
//! 4096-bit prime of the form `Q * R + 1`, and `G = 2^R mod P` generates the order-`Q`
//! subgroup of `Z_P^*`.
use crate::{
    arithmetics::{ElementModP, ElementModQ},
    error::{Error, Result},
    BigIntP, BigIntQ, P_LIMBS,
};
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The large prime modulus `P`
pub const LARGE_PRIME: BigIntP = BigIntP::from_be_hex(concat!(
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFBA",
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE0175E30B1B0E791DB502994F24DFB1",
));

/// The small prime `Q`, order of the subgroup generated by `G`
pub const SMALL_PRIME: BigIntQ = BigIntQ::from_be_hex(
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF43",
);

/// The cofactor `R = (P - 1) / Q`
pub const COFACTOR: BigIntP = BigIntP::from_be_hex(concat!(
    "0000000000000000000000000000000000000000000000000000000000000001",
    "00000000000000000000000000000000000000000000000000000000000000BD",
    "0000000000000000000000000000000000000000000000000000000000008B89",
    "0000000000000000000000000000000000000000000000000000000000670425",
    "000000000000000000000000000000000000000000000000000000004C0E0F51",
    "0000000000000000000000000000000000000000000000000000003826614ECD",
    "0000000000000000000000000000000000000000000000000000297455D72D59",
    "000000000000000000000000000000000000000000000000001E9AE35FDC7AB5",
    "000000000000000000000000000000000000000000000000169859DDC5C697A1",
    "000000000000000000000000000000000000000000000010AE7A58BB039DF1DD",
    "000000000000000000000000000000000000000000000C50D0538211AB9B9029",
    "0000000000000000000000000000000000000000000917A9CDA7070BB1D96E45",
    "000000000000000000000000000000000000000006B6785CD45033A24D8668F1",
    "0000000000000000000000000000000000000004F4B6DC88BF361ED33C3B79ED",
    "00000000000000000000000000000000000003A8AB00D0F52AF4C1F377E903F9",
    "000000000000000000000000000000000002B3863F9A4500B6B330BF8707EE90",
));

/// The generator `G` of the order-`Q` subgroup
pub const GENERATOR: BigIntP = BigIntP::from_be_hex(concat!(
    "9B61C275E06F3E38372F9A9ADE0CDC4C82F4CE5337B3EF0ED28BEDBC01342EB8",
    "9977C8116D741270D45B0EBE12D96C5AEE997FEFDEA18569018AFE1284E702BB",
    "9B8C78E03E697F378D25BCBCB94FEFD12B7F97047F63423268881C3B96B389E1",
    "34CB3162CB73ED8052F7946C7E72907FD8B96862D443B5C26F7B0E3FDC9F035C",
    "BF0F5AAB670B79011A8BCDEBCF421CC9CBBE12C788E50328041EB59D81079497",
    "B667B96049DA04C79D60F527B1C02F7ECBA66849179CB5CFBE7C990CD888B69C",
    "44171E4F54C21A8CFE9D821F195F7553B73A705707263EAEA3B7AFA7DED79ACF",
    "5A64F3BFB939B815C52085F40714F4C6460B0B0C3598E31746A06C2A3457676C",
    "B345C8A390EBB9428CEECEFA6FCB1C27A9E527A6C55B8D6B2B1868D6EC719E18",
    "9A799605C540F8641F135D5DC7FB62D58E0DE0B6AE3AB90E91FB996505D7D928",
    "3DA833FF0CB6CC8CA7BAFA0E90BB1ADB81545A801F0016DC7088A4DF2CFB7D6D",
    "D876A2A5807BDAA4000DAFA2DFB6FBB0ED9D775589156DDBFC24FF2203FFF9C5",
    "CF7C85C68F66DE94C98331F50FEF59CF8E7CE9D95FA008F7C1672D269C163751",
    "012826C4C8F5B5F4C11EDB62550F3CF93D86F3CC6E22B0E769AC659157F40383",
    "B5DF9DB9F8414F6CB5FA7D17BDDD3BC90DC7BDC39BAF3BE602A99E2A37CE3A5C",
    "098A8C1EFD3CD28A6B79306CA2C20C55174218A3935F697E813628D2D861BE54",
));

/// The constant `G` as a group element
pub const G: ElementModP = ElementModP::new_unchecked(GENERATOR);
/// The modulus `P` itself. Only valid as a hash input; not a member of the group.
pub const P: ElementModP = ElementModP::new_unchecked(LARGE_PRIME);
/// The modulus `Q` itself. Only valid as a hash input; not an exponent.
pub const Q: ElementModQ = ElementModQ::new_unchecked(SMALL_PRIME);

pub const ZERO_MOD_P: ElementModP = ElementModP::new_unchecked(BigIntP::ZERO);
pub const ONE_MOD_P: ElementModP = ElementModP::new_unchecked(BigIntP::ONE);
pub const TWO_MOD_P: ElementModP = ElementModP::new_unchecked(BigIntP::from_u8(2));

pub const ZERO_MOD_Q: ElementModQ = ElementModQ::new_unchecked(BigIntQ::ZERO);
pub const ONE_MOD_Q: ElementModQ = ElementModQ::new_unchecked(BigIntQ::ONE);
pub const TWO_MOD_Q: ElementModQ = ElementModQ::new_unchecked(BigIntQ::from_u8(2));

static P_PARAMS: OnceLock<DynResidueParams<P_LIMBS>> = OnceLock::new();
static Q_PARAMS: OnceLock<DynResidueParams<{ crate::Q_LIMBS }>> = OnceLock::new();

/// Montgomery parameters of `P`, computed on first use and shared by every thread
pub fn p_params() -> DynResidueParams<P_LIMBS> {
    return *P_PARAMS.get_or_init(|| DynResidueParams::new(&LARGE_PRIME));
}

/// Montgomery parameters of `Q`, computed on first use and shared by every thread
pub fn q_params() -> DynResidueParams<{ crate::Q_LIMBS }> {
    return *Q_PARAMS.get_or_init(|| DynResidueParams::new(&SMALL_PRIME));
}

/// The group parameters that an election is bound to. They enter the base hash of every
/// [`crate::CiphertextElectionContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConstants {
    large_prime: ElementModP,
    small_prime: ElementModQ,
    cofactor: ElementModP,
    generator: ElementModP,
}

impl Default for ElectionConstants {
    fn default() -> Self {
        return Self {
            large_prime: P,
            small_prime: Q,
            cofactor: ElementModP::new_unchecked(COFACTOR),
            generator: G,
        };
    }
}

impl ElectionConstants {
    pub fn get_large_prime(&self) -> &ElementModP {
        return &self.large_prime;
    }

    pub fn get_small_prime(&self) -> &ElementModQ {
        return &self.small_prime;
    }

    pub fn get_cofactor(&self) -> &ElementModP {
        return &self.cofactor;
    }

    pub fn get_generator(&self) -> &ElementModP {
        return &self.generator;
    }

    /// Check the relations between the parameters:
    /// 1. P and Q are prime
    /// 2. P = Q * R + 1, and Q does not divide R
    /// 3. G is not 1 and G^Q = 1 (mod P), so that G generates the order-Q subgroup
    pub fn is_valid(&self) -> bool {
        let p = self.large_prime.get_value();
        let q = self.small_prime.get_value();
        let r = self.cofactor.get_value();
        if !crypto_primes::is_prime(p) || !crypto_primes::is_prime(q) {
            return false;
        }

        let q_wide = crate::arithmetics::widen(q);
        if q_wide.wrapping_mul(r).wrapping_add(&BigIntP::ONE) != *p {
            return false;
        }
        if r.wrapping_rem(&q_wide) == BigIntP::ZERO {
            return false;
        }

        let params = DynResidueParams::new(p);
        let g = DynResidue::new(self.generator.get_value(), params);
        if g.retrieve() == BigIntP::ONE {
            return false;
        }
        return g.pow_bounded_exp(&q_wide, crate::Q_BITS).retrieve() == BigIntP::ONE;
    }

    /// Fail with [`Error::InvalidArgument`] unless [`Self::is_valid`] holds
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        return Err(Error::InvalidArgument(
            "election constants do not describe a prime-order subgroup".to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_election_constants_are_valid() {
        assert!(ElectionConstants::default().is_valid());
    }

    #[test]
    fn test_generator_has_order_q() {
        let g = DynResidue::new(&GENERATOR, p_params());
        let q = crate::arithmetics::widen(&SMALL_PRIME);
        assert_eq!(g.pow_bounded_exp(&q, crate::Q_BITS).retrieve(), BigIntP::ONE);
        assert_ne!(GENERATOR, BigIntP::ONE);
    }

    #[test]
    fn test_constant_elements() {
        assert!(G.is_in_bounds());
        assert!(!P.is_in_bounds());
        assert!(!Q.is_in_bounds());
        assert!(ONE_MOD_P.is_in_bounds());
        assert_eq!(TWO_MOD_Q.get_value(), &BigIntQ::from_u8(2));
    }
}
