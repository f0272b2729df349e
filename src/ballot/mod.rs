//! Ballots at every stage: marked by the voter, encrypted, compacted and submitted

pub mod ciphertext;
pub mod compact;
pub mod plaintext;

pub use ciphertext::{
    BallotBoxState, CiphertextBallot, CiphertextBallotContest, CiphertextBallotSelection,
    SubmittedBallot,
};
pub use compact::{CompactCiphertextBallot, CompactPlaintextBallot};
pub use plaintext::{
    ExtendedData, PlaintextBallot, PlaintextBallotContest, PlaintextBallotSelection,
};
