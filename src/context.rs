//! The election-wide cryptographic context every ballot is encrypted under
use crate::{
    arithmetics::{ElementModP, ElementModQ},
    constants::{G, P, Q},
    error::{Error, Result},
    hash_elems,
};
use serde::{Deserialize, Serialize};

/// The joint public key of the guardians, the hashes binding the election together, and the
/// threshold parameters of the key ceremony.
///
/// - `crypto_base_hash = H(P, Q, G, number_of_guardians, quorum, manifest_hash)`
/// - `crypto_extended_base_hash = H(crypto_base_hash, commitment_hash)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextElectionContext {
    number_of_guardians: u64,
    quorum: u64,
    elgamal_public_key: ElementModP,
    commitment_hash: ElementModQ,
    manifest_hash: ElementModQ,
    crypto_base_hash: ElementModQ,
    crypto_extended_base_hash: ElementModQ,
}

impl CiphertextElectionContext {
    /// Derive the context. The public key must be a member of the order-`Q` subgroup and
    /// `1 <= quorum <= number_of_guardians`.
    pub fn make(
        number_of_guardians: u64,
        quorum: u64,
        elgamal_public_key: &ElementModP,
        commitment_hash: &ElementModQ,
        manifest_hash: &ElementModQ,
    ) -> Result<Self> {
        if quorum == 0 || quorum > number_of_guardians {
            return Err(Error::InvalidArgument(format!(
                "quorum {quorum} is not between 1 and the {number_of_guardians} guardians"
            )));
        }
        if !elgamal_public_key.is_valid_residue() {
            return Err(Error::InvalidArgument(
                "public key is not a member of the subgroup".to_string(),
            ));
        }
        let crypto_base_hash = hash_elems!(P, Q, G, number_of_guardians, quorum, manifest_hash);
        let crypto_extended_base_hash = hash_elems!(crypto_base_hash, commitment_hash);
        return Ok(Self {
            number_of_guardians,
            quorum,
            elgamal_public_key: *elgamal_public_key,
            commitment_hash: *commitment_hash,
            manifest_hash: *manifest_hash,
            crypto_base_hash,
            crypto_extended_base_hash,
        });
    }

    /// [`Self::make`] from hex-encoded elements
    pub fn make_from_hex(
        number_of_guardians: u64,
        quorum: u64,
        elgamal_public_key: &str,
        commitment_hash: &str,
        manifest_hash: &str,
    ) -> Result<Self> {
        return Self::make(
            number_of_guardians,
            quorum,
            &ElementModP::from_hex(elgamal_public_key)?,
            &ElementModQ::from_hex(commitment_hash)?,
            &ElementModQ::from_hex(manifest_hash)?,
        );
    }

    pub fn get_number_of_guardians(&self) -> u64 {
        return self.number_of_guardians;
    }

    pub fn get_quorum(&self) -> u64 {
        return self.quorum;
    }

    pub fn get_elgamal_public_key(&self) -> &ElementModP {
        return &self.elgamal_public_key;
    }

    pub fn get_commitment_hash(&self) -> &ElementModQ {
        return &self.commitment_hash;
    }

    pub fn get_manifest_hash(&self) -> &ElementModQ {
        return &self.manifest_hash;
    }

    pub fn get_crypto_base_hash(&self) -> &ElementModQ {
        return &self.crypto_base_hash;
    }

    pub fn get_crypto_extended_base_hash(&self) -> &ElementModQ {
        return &self.crypto_extended_base_hash;
    }

    pub fn to_json(&self) -> Result<String> {
        return crate::to_json(self);
    }

    /// Parse a context, recomputing its hashes from the parsed inputs
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: Self = crate::from_json(json)?;
        let context = Self::make(
            parsed.number_of_guardians,
            parsed.quorum,
            &parsed.elgamal_public_key,
            &parsed.commitment_hash,
            &parsed.manifest_hash,
        )?;
        if context != parsed {
            return Err(Error::InvalidArgument(
                "context hashes do not match their inputs".to_string(),
            ));
        }
        return Ok(context);
    }
}
