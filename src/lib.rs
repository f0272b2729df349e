//! Verifiable ballot encryption for end-to-end verifiable elections.
//!
//! A voter's plaintext selections are turned into exponential ElGamal ciphertexts over a
//! 4096-bit prime field, each accompanied by a disjunctive Chaum-Pedersen proof that it
//! encrypts 0 or 1. Every contest additionally carries the homomorphic sum of its selections and
//! a constant Chaum-Pedersen proof that the sum equals the number of votes allowed. A chain of
//! hashes binds every ballot to the election manifest and to the ballots encrypted before it on
//! the same device (the "ballot code").
//!
//! The pipeline, leaves first:
//!
//! - [`arithmetics`] and [`constants`]: elements mod `P` and mod `Q`
//! - [`hash`]: the order-sensitive crypto hash and deterministic nonce sequences
//! - [`keys`] and [`elgamal`]: key pairs and ciphertexts
//! - [`proofs`]: disjunctive and constant Chaum-Pedersen proofs
//! - [`manifest`]: the election definition and its placeholder-augmented projection
//! - [`context`]: election-wide public key and base hashes
//! - [`ballot`]: plaintext, ciphertext, submitted and compact ballots
//! - [`encrypt`]: the encryption functions and the [`encrypt::EncryptionMediator`]
use crypto_bigint::Uint;

/// Limbs of an element mod P: 64 words of 64 bits, 4096 bits in total
pub const P_LIMBS: usize = 4096 / 64;
/// Limbs of an element mod Q: 4 words of 64 bits, 256 bits in total
pub const Q_LIMBS: usize = 256 / 64;

/// Bit length of exponents; every exponent is an element mod Q
pub const Q_BITS: usize = 256;

/// Byte length of the big-endian encoding of an element mod P
pub const P_BYTES: usize = 4096 / 8;
/// Byte length of the big-endian encoding of an element mod Q
pub const Q_BYTES: usize = 256 / 8;

/// Upper bound of the brute-force discrete log used for decryption. Plaintexts are vote
/// counts, so anything above this bound is treated as a decryption failure.
pub const MAX_DLOG_EXPONENT: u64 = 1 << 16;

pub type BigIntP = Uint<P_LIMBS>;
pub type BigIntQ = Uint<Q_LIMBS>;

pub mod arithmetics;
pub mod ballot;
pub mod constants;
pub mod context;
pub mod elgamal;
pub mod encrypt;
pub mod error;
pub mod hash;
pub mod keys;
pub mod manifest;
pub mod proofs;
mod serialize;

pub use crate::{
    arithmetics::{ElementModP, ElementModQ},
    ballot::{
        BallotBoxState, CiphertextBallot, CiphertextBallotContest, CiphertextBallotSelection,
        CompactCiphertextBallot, CompactPlaintextBallot, ExtendedData, PlaintextBallot,
        PlaintextBallotContest, PlaintextBallotSelection, SubmittedBallot,
    },
    context::CiphertextElectionContext,
    elgamal::{elgamal_encrypt, ElGamalCiphertext},
    encrypt::{EncryptionDevice, EncryptionMediator},
    error::{Error, Result, Status},
    hash::{CryptoHashInput, CryptoHashable, Nonces},
    keys::ElGamalKeyPair,
    manifest::{InternalManifest, Manifest},
    proofs::{ConstantChaumPedersenProof, DisjunctiveChaumPedersenProof},
    serialize::{from_bytes, from_json, to_bytes, to_json},
};
