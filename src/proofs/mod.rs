//! Non-interactive zero-knowledge proofs attached to encrypted ballots. Both are Chaum-Pedersen
//! sigma protocols made non-interactive with a Fiat–Shamir challenge from the crypto hash, and
//! all of their randomness is derived from a caller-supplied seed, so equal inputs give equal
//! proofs.

pub mod constant; // the homomorphic sum of a contest encrypts its allowed vote count
pub mod disjunctive; // a selection encrypts either 0 or 1

pub use constant::ConstantChaumPedersenProof;
pub use disjunctive::DisjunctiveChaumPedersenProof;
