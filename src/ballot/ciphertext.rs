//! Encrypted ballots, their proofs and the hash chain that binds them together
use crate::{
    arithmetics::{add_q, ElementModP, ElementModQ},
    constants::ZERO_MOD_Q,
    elgamal::{elgamal_add, ElGamalCiphertext},
    error::{Error, Result},
    hash::CryptoHashable,
    hash_elems,
    manifest::{ContestDescriptionWithPlaceholders, InternalManifest},
    proofs::{ConstantChaumPedersenProof, DisjunctiveChaumPedersenProof},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a ballot ended up after encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotBoxState {
    /// Counted in the tally
    Cast,
    /// Decrypted on its own for auditing; never counted
    Spoiled,
    Unknown,
}

impl BallotBoxState {
    pub fn code(&self) -> u32 {
        return match self {
            BallotBoxState::Cast => 1,
            BallotBoxState::Spoiled => 2,
            BallotBoxState::Unknown => 999,
        };
    }
}

/// The encryption of one selection, or of one placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallotSelection {
    object_id: String,
    sequence_order: u64,
    description_hash: ElementModQ,
    ciphertext: ElGamalCiphertext,
    crypto_hash: ElementModQ,
    is_placeholder_selection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<ElementModQ>,
    proof: DisjunctiveChaumPedersenProof,
}

impl CiphertextBallotSelection {
    /// Assemble a selection from its ciphertext and prove that it encrypts `plaintext`.
    ///
    /// - `elgamal_public_key`, `extended_base_hash`: from the election context
    /// - `proof_seed`: the randomness of the disjunctive proof
    /// - `nonce`: the nonce `ciphertext` was encrypted with
    #[allow(clippy::too_many_arguments)]
    pub fn make(
        object_id: &str,
        sequence_order: u64,
        description_hash: &ElementModQ,
        ciphertext: ElGamalCiphertext,
        elgamal_public_key: &ElementModP,
        extended_base_hash: &ElementModQ,
        proof_seed: &ElementModQ,
        plaintext: u64,
        is_placeholder_selection: bool,
        nonce: &ElementModQ,
    ) -> Result<Self> {
        let crypto_hash = Self::hash_of(object_id, description_hash, &ciphertext);
        let proof = DisjunctiveChaumPedersenProof::make(
            &ciphertext,
            nonce,
            elgamal_public_key,
            extended_base_hash,
            proof_seed,
            plaintext,
        )?;
        return Ok(Self {
            object_id: object_id.to_string(),
            sequence_order,
            description_hash: *description_hash,
            ciphertext,
            crypto_hash,
            is_placeholder_selection,
            nonce: Some(*nonce),
            proof,
        });
    }

    fn hash_of(
        object_id: &str,
        seed_hash: &ElementModQ,
        ciphertext: &ElGamalCiphertext,
    ) -> ElementModQ {
        return hash_elems!(object_id, seed_hash, ciphertext.crypto_hash());
    }

    /// `H(object_id, seed_hash, H(ciphertext))`
    pub fn crypto_hash_with(&self, seed_hash: &ElementModQ) -> ElementModQ {
        return Self::hash_of(&self.object_id, seed_hash, &self.ciphertext);
    }

    /// The selection belongs to the described selection, its hash is intact and its proof
    /// verifies
    pub fn is_valid_encryption(
        &self,
        encryption_seed: &ElementModQ,
        elgamal_public_key: &ElementModP,
        extended_base_hash: &ElementModQ,
    ) -> bool {
        if *encryption_seed != self.description_hash {
            tracing::debug!(object_id = %self.object_id, "selection description hash mismatch");
            return false;
        }
        if self.crypto_hash_with(encryption_seed) != self.crypto_hash {
            tracing::debug!(object_id = %self.object_id, "selection crypto hash mismatch");
            return false;
        }
        return self
            .proof
            .is_valid(&self.ciphertext, elgamal_public_key, extended_base_hash);
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_sequence_order(&self) -> u64 {
        return self.sequence_order;
    }

    pub fn get_description_hash(&self) -> &ElementModQ {
        return &self.description_hash;
    }

    pub fn get_ciphertext(&self) -> &ElGamalCiphertext {
        return &self.ciphertext;
    }

    pub fn get_crypto_hash(&self) -> &ElementModQ {
        return &self.crypto_hash;
    }

    pub fn is_placeholder(&self) -> bool {
        return self.is_placeholder_selection;
    }

    pub fn get_nonce(&self) -> Option<&ElementModQ> {
        return self.nonce.as_ref();
    }

    pub fn get_proof(&self) -> &DisjunctiveChaumPedersenProof {
        return &self.proof;
    }

    fn strip_nonce(&mut self) {
        self.nonce = None;
    }
}

/// The encryption of one contest: its selections and placeholders, their homomorphic sum, and
/// the proof that the sum encrypts the number of votes allowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallotContest {
    object_id: String,
    sequence_order: u64,
    description_hash: ElementModQ,
    ballot_selections: Vec<CiphertextBallotSelection>,
    ciphertext_accumulation: ElGamalCiphertext,
    crypto_hash: ElementModQ,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<ElementModQ>,
    proof: ConstantChaumPedersenProof,
}

impl CiphertextBallotContest {
    /// Aggregate the selections and prove that their sum encrypts `votes_allowed`. Every
    /// selection must still carry its nonce.
    ///
    /// `nonce` is the contest nonce the selection nonces were derived from.
    #[allow(clippy::too_many_arguments)]
    pub fn make(
        object_id: &str,
        sequence_order: u64,
        description_hash: &ElementModQ,
        ballot_selections: Vec<CiphertextBallotSelection>,
        elgamal_public_key: &ElementModP,
        extended_base_hash: &ElementModQ,
        proof_seed: &ElementModQ,
        votes_allowed: u64,
        nonce: &ElementModQ,
    ) -> Result<Self> {
        let ciphertext_accumulation = Self::elgamal_accumulate(&ballot_selections);
        let aggregate_nonce = Self::aggregate_nonce(&ballot_selections).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "contest `{object_id}` has selections without nonces"
            ))
        })?;
        let crypto_hash = Self::hash_of(object_id, description_hash, &ballot_selections);
        let proof = ConstantChaumPedersenProof::make(
            &ciphertext_accumulation,
            &aggregate_nonce,
            elgamal_public_key,
            proof_seed,
            extended_base_hash,
            votes_allowed,
        );
        return Ok(Self {
            object_id: object_id.to_string(),
            sequence_order,
            description_hash: *description_hash,
            ballot_selections,
            ciphertext_accumulation,
            crypto_hash,
            nonce: Some(*nonce),
            proof,
        });
    }

    /// The sum of the selection nonces, or None if any selection has lost its nonce
    pub fn aggregate_nonce(selections: &[CiphertextBallotSelection]) -> Option<ElementModQ> {
        let mut sum = ZERO_MOD_Q;
        for selection in selections {
            sum = add_q(&sum, selection.get_nonce()?);
        }
        return Some(sum);
    }

    /// The homomorphic sum of the selection ciphertexts
    pub fn elgamal_accumulate(selections: &[CiphertextBallotSelection]) -> ElGamalCiphertext {
        let ciphertexts: Vec<ElGamalCiphertext> = selections
            .iter()
            .map(|selection| *selection.get_ciphertext())
            .collect();
        return elgamal_add(&ciphertexts);
    }

    fn hash_of(
        object_id: &str,
        seed_hash: &ElementModQ,
        selections: &[CiphertextBallotSelection],
    ) -> ElementModQ {
        let selection_hashes: Vec<ElementModQ> = selections
            .iter()
            .map(|selection| *selection.get_crypto_hash())
            .collect();
        return hash_elems!(object_id, seed_hash, selection_hashes);
    }

    /// `H(object_id, seed_hash, [selection hashes])`
    pub fn crypto_hash_with(&self, seed_hash: &ElementModQ) -> ElementModQ {
        return Self::hash_of(&self.object_id, seed_hash, &self.ballot_selections);
    }

    /// The contest belongs to the described contest, its hash and accumulation are intact,
    /// every proof in it verifies, and the constant proof is made for `votes_allowed`
    pub fn is_valid_encryption(
        &self,
        encryption_seed: &ElementModQ,
        votes_allowed: u64,
        elgamal_public_key: &ElementModP,
        extended_base_hash: &ElementModQ,
    ) -> bool {
        if *encryption_seed != self.description_hash {
            tracing::debug!(object_id = %self.object_id, "contest description hash mismatch");
            return false;
        }
        if self.proof.get_constant() != votes_allowed {
            tracing::debug!(
                object_id = %self.object_id,
                constant = self.proof.get_constant(),
                votes_allowed,
                "contest proves the wrong number of votes"
            );
            return false;
        }
        if self.crypto_hash_with(encryption_seed) != self.crypto_hash {
            tracing::debug!(object_id = %self.object_id, "contest crypto hash mismatch");
            return false;
        }
        if Self::elgamal_accumulate(&self.ballot_selections) != self.ciphertext_accumulation {
            tracing::debug!(object_id = %self.object_id, "contest accumulation mismatch");
            return false;
        }
        let selections_valid = self.ballot_selections.iter().all(|selection| {
            selection.is_valid_encryption(
                selection.get_description_hash(),
                elgamal_public_key,
                extended_base_hash,
            )
        });
        return selections_valid
            && self.proof.is_valid(
                &self.ciphertext_accumulation,
                elgamal_public_key,
                extended_base_hash,
            );
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_sequence_order(&self) -> u64 {
        return self.sequence_order;
    }

    pub fn get_description_hash(&self) -> &ElementModQ {
        return &self.description_hash;
    }

    pub fn get_selections(&self) -> &[CiphertextBallotSelection] {
        return &self.ballot_selections;
    }

    pub fn get_ciphertext_accumulation(&self) -> &ElGamalCiphertext {
        return &self.ciphertext_accumulation;
    }

    pub fn get_crypto_hash(&self) -> &ElementModQ {
        return &self.crypto_hash;
    }

    pub fn get_nonce(&self) -> Option<&ElementModQ> {
        return self.nonce.as_ref();
    }

    pub fn get_proof(&self) -> &ConstantChaumPedersenProof {
        return &self.proof;
    }

    fn strip_nonces(&mut self) {
        self.nonce = None;
        self.ballot_selections
            .iter_mut()
            .for_each(CiphertextBallotSelection::strip_nonce);
    }
}

/// An encrypted ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextBallot {
    object_id: String,
    style_id: String,
    manifest_hash: ElementModQ,
    code_seed: ElementModQ,
    contests: Vec<CiphertextBallotContest>,
    code: ElementModQ,
    timestamp: u64,
    crypto_hash: ElementModQ,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<ElementModQ>,
}

impl CiphertextBallot {
    /// Assemble a ballot from its contests and compute its ballot code. Without a timestamp
    /// the current time is used.
    pub fn make(
        object_id: &str,
        style_id: &str,
        manifest_hash: &ElementModQ,
        code_seed: &ElementModQ,
        contests: Vec<CiphertextBallotContest>,
        nonce: Option<ElementModQ>,
        timestamp: Option<u64>,
    ) -> Result<Self> {
        if contests.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "ballot `{object_id}` has no contests"
            )));
        }
        let timestamp = timestamp.unwrap_or_else(now);
        let crypto_hash = Self::hash_of(object_id, manifest_hash, &contests);
        let code = Self::ballot_code(code_seed, &contests, timestamp, &crypto_hash);
        return Ok(Self {
            object_id: object_id.to_string(),
            style_id: style_id.to_string(),
            manifest_hash: *manifest_hash,
            code_seed: *code_seed,
            contests,
            code,
            timestamp,
            crypto_hash,
            nonce,
        });
    }

    /// The seed all nonces of a ballot are derived from: `H(manifest_hash, object_id, nonce)`
    pub fn nonce_seed(
        manifest_hash: &ElementModQ,
        object_id: &str,
        nonce: &ElementModQ,
    ) -> ElementModQ {
        return hash_elems!(manifest_hash, object_id, nonce);
    }

    /// Chain the code seed through the contest hashes, then bind the timestamp and the ballot
    /// hash
    fn ballot_code(
        code_seed: &ElementModQ,
        contests: &[CiphertextBallotContest],
        timestamp: u64,
        crypto_hash: &ElementModQ,
    ) -> ElementModQ {
        let chained = contests.iter().fold(*code_seed, |code, contest| {
            hash_elems!(code, contest.get_crypto_hash())
        });
        return hash_elems!(chained, timestamp, crypto_hash);
    }

    fn hash_of(
        object_id: &str,
        seed_hash: &ElementModQ,
        contests: &[CiphertextBallotContest],
    ) -> ElementModQ {
        let contest_hashes: Vec<ElementModQ> = contests
            .iter()
            .map(|contest| *contest.get_crypto_hash())
            .collect();
        return hash_elems!(object_id, seed_hash, contest_hashes);
    }

    /// `H(object_id, seed_hash, [contest hashes])`
    pub fn crypto_hash_with(&self, seed_hash: &ElementModQ) -> ElementModQ {
        return Self::hash_of(&self.object_id, seed_hash, &self.contests);
    }

    /// The ballot belongs to the manifest, its hashes and its code are intact, and every proof
    /// in it verifies. Each contest must be one of the ballot style's contests, in manifest
    /// order, with exactly the described selections and placeholders, and must prove its
    /// `votes_allowed`.
    pub fn is_valid_encryption(
        &self,
        manifest: &InternalManifest,
        elgamal_public_key: &ElementModP,
        extended_base_hash: &ElementModQ,
    ) -> bool {
        let manifest_hash = manifest.get_manifest_hash();
        if *manifest_hash != self.manifest_hash {
            tracing::debug!(object_id = %self.object_id, "ballot manifest hash mismatch");
            return false;
        }
        if self.crypto_hash_with(manifest_hash) != self.crypto_hash {
            tracing::debug!(object_id = %self.object_id, "ballot crypto hash mismatch");
            return false;
        }
        let code = Self::ballot_code(
            &self.code_seed,
            &self.contests,
            self.timestamp,
            &self.crypto_hash,
        );
        if code != self.code {
            tracing::debug!(object_id = %self.object_id, "ballot code mismatch");
            return false;
        }
        let descriptions = match manifest.get_contests_for(&self.style_id) {
            Ok(descriptions) => descriptions,
            Err(_) => {
                tracing::debug!(object_id = %self.object_id, "ballot style not in manifest");
                return false;
            }
        };
        if descriptions.len() != self.contests.len() {
            tracing::debug!(object_id = %self.object_id, "ballot contests do not match its style");
            return false;
        }
        return self
            .contests
            .iter()
            .zip(descriptions)
            .all(|(contest, description)| {
                Self::matches_description(contest, description)
                    && contest.is_valid_encryption(
                        &description.crypto_hash(),
                        description.get_votes_allowed(),
                        elgamal_public_key,
                        extended_base_hash,
                    )
            });
    }

    fn matches_description(
        contest: &CiphertextBallotContest,
        description: &ContestDescriptionWithPlaceholders,
    ) -> bool {
        let expected = description.get_selections().len() + description.get_placeholders().len();
        let ids: HashSet<&str> = contest
            .get_selections()
            .iter()
            .map(|selection| selection.get_object_id())
            .collect();
        let matches = contest.get_object_id() == description.get_object_id()
            && contest.get_selections().len() == expected
            && ids.len() == expected
            && contest.get_selections().iter().all(|selection| {
                description
                    .selection_for_id(selection.get_object_id())
                    .is_some_and(|selection_description| {
                        selection_description.crypto_hash() == *selection.get_description_hash()
                    })
            });
        if !matches {
            tracing::debug!(
                object_id = %contest.get_object_id(),
                "contest does not match its description"
            );
        }
        return matches;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_style_id(&self) -> &str {
        return &self.style_id;
    }

    pub fn get_manifest_hash(&self) -> &ElementModQ {
        return &self.manifest_hash;
    }

    pub fn get_code_seed(&self) -> &ElementModQ {
        return &self.code_seed;
    }

    pub fn get_contests(&self) -> &[CiphertextBallotContest] {
        return &self.contests;
    }

    pub fn get_contest(&self, contest_id: &str) -> Option<&CiphertextBallotContest> {
        return self
            .contests
            .iter()
            .find(|contest| contest.get_object_id() == contest_id);
    }

    /// The ballot code, the public tracking code of the ballot
    pub fn get_code(&self) -> &ElementModQ {
        return &self.code;
    }

    pub fn get_timestamp(&self) -> u64 {
        return self.timestamp;
    }

    pub fn get_crypto_hash(&self) -> &ElementModQ {
        return &self.crypto_hash;
    }

    /// The ballot nonce; None once the ballot has been exported without nonces or submitted
    pub fn get_nonce(&self) -> Option<&ElementModQ> {
        return self.nonce.as_ref();
    }

    /// A copy of the ballot with every nonce removed
    pub fn without_nonces(&self) -> Self {
        let mut ballot = self.clone();
        ballot.nonce = None;
        ballot
            .contests
            .iter_mut()
            .for_each(CiphertextBallotContest::strip_nonces);
        return ballot;
    }

    /// JSON without any nonce
    pub fn to_json(&self) -> Result<String> {
        return crate::to_json(&self.without_nonces());
    }

    /// JSON including the nonces. Whoever holds this export can decrypt the ballot.
    pub fn to_json_with_nonces(&self) -> Result<String> {
        return crate::to_json(self);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        return crate::from_json(json);
    }

    pub fn cast(&self) -> SubmittedBallot {
        return SubmittedBallot::from_ballot(self, BallotBoxState::Cast);
    }

    pub fn spoil(&self) -> SubmittedBallot {
        return SubmittedBallot::from_ballot(self, BallotBoxState::Spoiled);
    }
}

impl CryptoHashable for CiphertextBallot {
    fn crypto_hash(&self) -> ElementModQ {
        return self.crypto_hash;
    }
}

fn now() -> u64 {
    return SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
}

/// An encrypted ballot in the ballot box. It carries no nonces, so it can only be decrypted
/// with the guardians' keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedBallot {
    ballot: CiphertextBallot,
    state: BallotBoxState,
}

impl SubmittedBallot {
    pub fn from_ballot(ballot: &CiphertextBallot, state: BallotBoxState) -> Self {
        tracing::debug!(object_id = %ballot.get_object_id(), ?state, "ballot submitted");
        return Self {
            ballot: ballot.without_nonces(),
            state,
        };
    }

    pub fn get_state(&self) -> BallotBoxState {
        return self.state;
    }

    pub fn get_ballot(&self) -> &CiphertextBallot {
        return &self.ballot;
    }

    /// Only cast ballots are counted
    pub fn is_tallyable(&self) -> bool {
        return self.state == BallotBoxState::Cast;
    }

    pub fn to_json(&self) -> Result<String> {
        return crate::to_json(self);
    }

    /// Parse a submitted ballot; one that still carries nonces is rejected
    pub fn from_json(json: &str) -> Result<Self> {
        let ballot: Self = crate::from_json(json)?;
        if ballot.ballot != ballot.ballot.without_nonces() {
            return Err(Error::InvalidArgument(
                "a submitted ballot must not carry nonces".to_string(),
            ));
        }
        return Ok(ballot);
    }
}

impl Deref for SubmittedBallot {
    type Target = CiphertextBallot;

    fn deref(&self) -> &Self::Target {
        return &self.ballot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arithmetics::mult_p,
        constants::G,
        elgamal::elgamal_encrypt,
        keys::ElGamalKeyPair,
    };

    struct Fixture {
        keypair: ElGamalKeyPair,
        q: ElementModQ,
        description_hash: ElementModQ,
    }

    fn fixture() -> Fixture {
        return Fixture {
            keypair: ElGamalKeyPair::from_secret(&ElementModQ::from_u64(4242)).unwrap(),
            q: ElementModQ::from_u64(7),
            description_hash: ElementModQ::from_u64(8),
        };
    }

    fn selection(
        fixture: &Fixture,
        id: &str,
        sequence_order: u64,
        vote: u64,
    ) -> CiphertextBallotSelection {
        let k = fixture.keypair.get_public_key();
        let nonce = ElementModQ::from_u64(100 + sequence_order);
        let ciphertext = elgamal_encrypt(vote, &nonce, k).unwrap();
        return CiphertextBallotSelection::make(
            id,
            sequence_order,
            &fixture.description_hash,
            ciphertext,
            k,
            &fixture.q,
            &ElementModQ::from_u64(200 + sequence_order),
            vote,
            false,
            &nonce,
        )
        .unwrap();
    }

    fn contest(fixture: &Fixture) -> CiphertextBallotContest {
        let selections = vec![
            selection(fixture, "a", 0, 1),
            selection(fixture, "b", 1, 0),
            selection(fixture, "p", 2, 0),
        ];
        return CiphertextBallotContest::make(
            "contest",
            0,
            &fixture.description_hash,
            selections,
            fixture.keypair.get_public_key(),
            &fixture.q,
            &ElementModQ::from_u64(300),
            1,
            &ElementModQ::from_u64(400),
        )
        .unwrap();
    }

    #[test]
    fn test_selection_validity() {
        let fixture = fixture();
        let k = fixture.keypair.get_public_key();
        let selection = selection(&fixture, "a", 0, 1);
        assert!(selection.is_valid_encryption(&fixture.description_hash, k, &fixture.q));
        assert!(!selection.is_valid_encryption(&ElementModQ::from_u64(9), k, &fixture.q));
    }

    #[test]
    fn test_contest_aggregation() {
        let fixture = fixture();
        let k = fixture.keypair.get_public_key();
        let contest = contest(&fixture);
        assert!(contest.is_valid_encryption(&fixture.description_hash, 1, k, &fixture.q));
        assert_eq!(
            CiphertextBallotContest::aggregate_nonce(contest.get_selections()),
            Some(ElementModQ::from_u64(100 + 101 + 102))
        );
        let total = contest
            .get_ciphertext_accumulation()
            .decrypt_with_secret(fixture.keypair.get_secret_key())
            .unwrap();
        assert_eq!(total, 1);

        let mut tampered = contest.clone();
        tampered.ciphertext_accumulation = ElGamalCiphertext::new(
            mult_p(tampered.ciphertext_accumulation.get_pad(), &G),
            *tampered.ciphertext_accumulation.get_data(),
        );
        assert!(!tampered.is_valid_encryption(&fixture.description_hash, 1, k, &fixture.q));
    }

    #[test]
    fn test_overvoted_contest_is_rejected() {
        let fixture = fixture();
        let k = fixture.keypair.get_public_key();
        let selections = vec![
            selection(&fixture, "a", 0, 1),
            selection(&fixture, "b", 1, 1),
            selection(&fixture, "p", 2, 1),
        ];
        // an honest proof that the contest holds three votes
        let overvoted = CiphertextBallotContest::make(
            "contest",
            0,
            &fixture.description_hash,
            selections,
            k,
            &fixture.q,
            &ElementModQ::from_u64(300),
            3,
            &ElementModQ::from_u64(400),
        )
        .unwrap();
        assert_eq!(overvoted.get_proof().get_constant(), 3);
        assert!(overvoted.is_valid_encryption(&fixture.description_hash, 3, k, &fixture.q));
        assert!(!overvoted.is_valid_encryption(&fixture.description_hash, 1, k, &fixture.q));
    }

    #[test]
    fn test_ballot_code_and_submission() {
        let fixture = fixture();
        let manifest_hash = ElementModQ::from_u64(11);
        let seed = ElementModQ::from_u64(12);
        let ballot = CiphertextBallot::make(
            "ballot",
            "style",
            &manifest_hash,
            &seed,
            vec![contest(&fixture)],
            Some(ElementModQ::from_u64(13)),
            Some(1_700_000_000),
        )
        .unwrap();

        let first = hash_elems!(seed, ballot.get_contests()[0].get_crypto_hash());
        assert_eq!(
            ballot.get_code(),
            &hash_elems!(first, 1_700_000_000u64, ballot.get_crypto_hash())
        );

        let submitted = ballot.cast();
        assert_eq!(submitted.get_state(), BallotBoxState::Cast);
        assert!(submitted.is_tallyable());
        assert!(submitted.get_nonce().is_none());
        assert!(submitted.get_contests()[0].get_nonce().is_none());
        assert!(submitted.get_contests()[0].get_selections()[0].get_nonce().is_none());
        assert_eq!(submitted.get_code(), ballot.get_code());
        assert!(!ballot.spoil().is_tallyable());
    }

    #[test]
    fn test_json_export() {
        let fixture = fixture();
        let ballot = CiphertextBallot::make(
            "ballot",
            "style",
            &ElementModQ::from_u64(11),
            &ElementModQ::from_u64(12),
            vec![contest(&fixture)],
            Some(ElementModQ::from_u64(13)),
            Some(1),
        )
        .unwrap();

        let with_nonces = ballot.to_json_with_nonces().unwrap();
        assert_eq!(CiphertextBallot::from_json(&with_nonces).unwrap(), ballot);
        let without = CiphertextBallot::from_json(&ballot.to_json().unwrap()).unwrap();
        assert_eq!(without, ballot.without_nonces());
        assert!(!ballot.to_json().unwrap().contains("\"nonce\""));

        let submitted = ballot.spoil();
        assert_eq!(SubmittedBallot::from_json(&submitted.to_json().unwrap()).unwrap(), submitted);
        let smuggled = format!("{{\"ballot\":{with_nonces},\"state\":\"cast\"}}");
        assert!(SubmittedBallot::from_json(&smuggled).is_err());
    }
}
