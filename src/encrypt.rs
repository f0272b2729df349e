//! Turning plaintext ballots into encrypted ballots.
//!
//! All randomness of a ballot is derived from a single ballot nonce `N`:
//! - the ballot nonce seed `S = H(manifest_hash, ballot_id, N)`
//! - for each contest, the contest nonce `C = Nonces(contest_hash, S)[sequence_order]` and the
//!   constant proof seed `Nonces(contest_hash, S, "constant-proof-seed")[sequence_order]`
//! - for each selection, the selection nonce `Nonces(selection_hash, C)[sequence_order]` and the
//!   disjunctive proof seed `Nonces(selection_hash, C, "disjunctive-proof-seed")[sequence_order]`
//!
//! Given the same ballot nonce, code seed and timestamp, the encryption is byte-identical,
//! which is what lets a compact ciphertext ballot be expanded again.
use crate::{
    arithmetics::{ElementModP, ElementModQ},
    ballot::{
        CiphertextBallot, CiphertextBallotContest, CiphertextBallotSelection,
        CompactCiphertextBallot, CompactPlaintextBallot, PlaintextBallot, PlaintextBallotContest,
        PlaintextBallotSelection,
    },
    context::CiphertextElectionContext,
    elgamal::elgamal_encrypt,
    error::{Error, Result},
    hash::{CryptoHashable, Nonces},
    hash_elems,
    manifest::{ContestDescriptionWithPlaceholders, InternalManifest, SelectionDescription},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// The machine ballots are encrypted on. Its hash seeds the ballot code chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionDevice {
    device_id: u64,
    session_id: u64,
    launch_code: u64,
    location: String,
}

impl EncryptionDevice {
    pub fn new(device_id: u64, session_id: u64, launch_code: u64, location: &str) -> Self {
        return Self {
            device_id,
            session_id,
            launch_code,
            location: location.to_string(),
        };
    }

    /// `H(device_id, session_id, launch_code, location)`
    pub fn get_hash(&self) -> ElementModQ {
        return hash_elems!(
            self.device_id,
            self.session_id,
            self.launch_code,
            &self.location
        );
    }

    pub fn get_device_id(&self) -> u64 {
        return self.device_id;
    }

    pub fn get_session_id(&self) -> u64 {
        return self.session_id;
    }

    pub fn get_launch_code(&self) -> u64 {
        return self.launch_code;
    }

    pub fn get_location(&self) -> &str {
        return &self.location;
    }
}

/// A plaintext selection for a described selection
pub fn selection_from(
    description: &SelectionDescription,
    is_placeholder: bool,
    is_affirmative: bool,
) -> PlaintextBallotSelection {
    let vote = is_affirmative as u64;
    if is_placeholder {
        return PlaintextBallotSelection::new_placeholder(description.get_object_id(), vote);
    }
    return PlaintextBallotSelection::new(description.get_object_id(), vote);
}

/// An unmarked plaintext contest for a described contest
pub fn contest_from(description: &ContestDescriptionWithPlaceholders) -> PlaintextBallotContest {
    let selections = description
        .sorted_selections()
        .into_iter()
        .map(|selection| selection_from(selection, false, false))
        .collect();
    return PlaintextBallotContest::new(description.get_object_id(), selections);
}

/// Encrypt one selection and prove that it encrypts 0 or 1.
///
/// `nonce_seed` is the contest nonce. With `should_verify`, the proof is checked right away
/// and a failure is returned as [`Error::ProofVerification`].
pub fn encrypt_selection(
    selection: &PlaintextBallotSelection,
    description: &SelectionDescription,
    elgamal_public_key: &ElementModP,
    extended_base_hash: &ElementModQ,
    nonce_seed: &ElementModQ,
    should_verify: bool,
) -> Result<CiphertextBallotSelection> {
    if !selection.is_valid(description.get_object_id()) {
        return Err(Error::InvalidArgument(format!(
            "selection `{}` does not answer `{}` with 0 or 1",
            selection.get_object_id(),
            description.get_object_id()
        )));
    }

    let description_hash = description.crypto_hash();
    let sequence_order = description.get_sequence_order();
    let selection_nonce = Nonces::new(&description_hash, &[nonce_seed.into()]).get(sequence_order);
    let proof_seed = Nonces::new(
        &description_hash,
        &[nonce_seed.into(), "disjunctive-proof-seed".into()],
    )
    .get(sequence_order);

    let ciphertext = elgamal_encrypt(selection.get_vote(), &selection_nonce, elgamal_public_key)?;
    let encrypted = CiphertextBallotSelection::make(
        selection.get_object_id(),
        sequence_order,
        &description_hash,
        ciphertext,
        elgamal_public_key,
        extended_base_hash,
        &proof_seed,
        selection.get_vote(),
        selection.is_placeholder(),
        &selection_nonce,
    )?;

    if should_verify
        && !encrypted.is_valid_encryption(&description_hash, elgamal_public_key, extended_base_hash)
    {
        tracing::warn!(object_id = %selection.get_object_id(), "selection failed verification");
        return Err(Error::ProofVerification(format!(
            "selection `{}`",
            selection.get_object_id()
        )));
    }
    return Ok(encrypted);
}

/// Encrypt one contest: its selections in sequence order, then one placeholder per allowed
/// vote, where the first `votes_allowed - votes` placeholders are marked. The contest's sum
/// therefore always encrypts `votes_allowed`.
///
/// `nonce_seed` is the ballot nonce seed.
pub fn encrypt_contest(
    contest: &PlaintextBallotContest,
    description: &ContestDescriptionWithPlaceholders,
    elgamal_public_key: &ElementModP,
    extended_base_hash: &ElementModQ,
    nonce_seed: &ElementModQ,
    should_verify: bool,
) -> Result<CiphertextBallotContest> {
    contest.validate_against(description)?;

    let description_hash = description.crypto_hash();
    let sequence_order = description.get_sequence_order();
    let contest_nonce = Nonces::new(&description_hash, &[nonce_seed.into()]).get(sequence_order);
    let proof_seed = Nonces::new(
        &description_hash,
        &[nonce_seed.into(), "constant-proof-seed".into()],
    )
    .get(sequence_order);

    let mut selections = vec![];
    let mut votes = 0u64;
    for selection_description in description.sorted_selections() {
        let selection = contest
            .get_selection(selection_description.get_object_id())
            .ok_or_else(|| Error::NotFound {
                kind: "selection",
                id: selection_description.get_object_id().to_string(),
            })?;
        votes += selection.get_vote();
        selections.push(encrypt_selection(
            selection,
            selection_description,
            elgamal_public_key,
            extended_base_hash,
            &contest_nonce,
            should_verify,
        )?);
    }

    let votes_allowed = description.get_votes_allowed();
    for placeholder in description.get_placeholders() {
        let is_affirmative = votes < votes_allowed;
        if is_affirmative {
            votes += 1;
        }
        selections.push(encrypt_selection(
            &selection_from(placeholder, true, is_affirmative),
            placeholder,
            elgamal_public_key,
            extended_base_hash,
            &contest_nonce,
            should_verify,
        )?);
    }

    let encrypted = CiphertextBallotContest::make(
        contest.get_object_id(),
        sequence_order,
        &description_hash,
        selections,
        elgamal_public_key,
        extended_base_hash,
        &proof_seed,
        votes_allowed,
        &contest_nonce,
    )?;

    if should_verify
        && !encrypted.is_valid_encryption(
            &description_hash,
            votes_allowed,
            elgamal_public_key,
            extended_base_hash,
        )
    {
        tracing::warn!(object_id = %contest.get_object_id(), "contest failed verification");
        return Err(Error::ProofVerification(format!(
            "contest `{}`",
            contest.get_object_id()
        )));
    }
    return Ok(encrypted);
}

/// Encrypt a ballot. Contests of the ballot's style that the voter did not mark are encrypted
/// as unmarked.
///
/// - `code_seed`: the previous ballot code of the device, or the device hash for the first
///   ballot
/// - `nonce`: the ballot nonce; a fresh random one is drawn if None
/// - `timestamp`: seconds since the epoch; the current time if None
///
/// Either a complete, verified ballot is returned or an error; nothing partial.
pub fn encrypt_ballot(
    ballot: &PlaintextBallot,
    manifest: &InternalManifest,
    context: &CiphertextElectionContext,
    code_seed: &ElementModQ,
    nonce: Option<ElementModQ>,
    timestamp: Option<u64>,
    should_verify: bool,
) -> Result<CiphertextBallot> {
    tracing::debug!(object_id = %ballot.get_object_id(), "encrypting ballot");
    if manifest.get_manifest_hash() != context.get_manifest_hash() {
        return Err(Error::InvalidArgument(
            "the manifest does not belong to the election context".to_string(),
        ));
    }
    let descriptions = ballot.validate_against(manifest)?;

    let nonce = nonce.unwrap_or_else(ElementModQ::rand_q);
    let nonce_seed =
        CiphertextBallot::nonce_seed(manifest.get_manifest_hash(), ballot.get_object_id(), &nonce);
    let public_key = context.get_elgamal_public_key();
    let extended_base_hash = context.get_crypto_extended_base_hash();

    let contests = descriptions
        .par_iter()
        .map(|description| {
            let unmarked;
            let contest = match ballot.get_contest(description.get_object_id()) {
                Some(contest) => contest,
                None => {
                    unmarked = contest_from(description);
                    &unmarked
                }
            };
            encrypt_contest(
                contest,
                description,
                public_key,
                extended_base_hash,
                &nonce_seed,
                should_verify,
            )
        })
        .collect::<Result<Vec<CiphertextBallotContest>>>()?;

    let encrypted = CiphertextBallot::make(
        ballot.get_object_id(),
        ballot.get_style_id(),
        manifest.get_manifest_hash(),
        code_seed,
        contests,
        Some(nonce),
        timestamp,
    )?;

    if should_verify
        && !encrypted.is_valid_encryption(manifest, public_key, extended_base_hash)
    {
        tracing::warn!(object_id = %ballot.get_object_id(), "ballot failed verification");
        return Err(Error::ProofVerification(format!(
            "ballot `{}`",
            ballot.get_object_id()
        )));
    }
    tracing::debug!(
        object_id = %ballot.get_object_id(),
        code = %encrypted.get_code(),
        "ballot encrypted"
    );
    return Ok(encrypted);
}

/// Encrypt a ballot and keep only what is needed to re-derive the encryption
pub fn encrypt_compact_ballot(
    ballot: &PlaintextBallot,
    manifest: &InternalManifest,
    context: &CiphertextElectionContext,
    code_seed: &ElementModQ,
    nonce: Option<ElementModQ>,
    timestamp: Option<u64>,
    should_verify: bool,
) -> Result<CompactCiphertextBallot> {
    let plaintext = CompactPlaintextBallot::from_plaintext(ballot, manifest)?;
    let ciphertext = encrypt_ballot(
        ballot,
        manifest,
        context,
        code_seed,
        nonce,
        timestamp,
        should_verify,
    )?;
    return CompactCiphertextBallot::make(plaintext, &ciphertext);
}

/// Re-derive the full encrypted ballot from its compact form. The result is identical to the
/// ballot the compact form was made from; a ballot code that does not match is rejected.
pub fn expand_compact_ciphertext_ballot(
    compact: &CompactCiphertextBallot,
    manifest: &InternalManifest,
    context: &CiphertextElectionContext,
) -> Result<CiphertextBallot> {
    let plaintext = compact.get_plaintext().to_plaintext(manifest)?;
    let ballot = encrypt_ballot(
        &plaintext,
        manifest,
        context,
        compact.get_code_seed(),
        Some(*compact.get_ballot_nonce()),
        Some(compact.get_timestamp()),
        false,
    )?;
    if ballot.get_code() != compact.get_code() {
        tracing::warn!(
            object_id = %compact.get_object_id(),
            "expanded ballot code does not match the compact ballot"
        );
        return Err(Error::InvalidArgument(format!(
            "compact ballot `{}` does not expand to its ballot code",
            compact.get_object_id()
        )));
    }
    return Ok(ballot);
}

/// Encrypts the ballots of one device in a session. Each ballot's code seeds the code chain of
/// the next one, starting from the device hash.
#[derive(Debug, Clone)]
pub struct EncryptionMediator {
    manifest: InternalManifest,
    context: CiphertextElectionContext,
    device: EncryptionDevice,
    code_seed: ElementModQ,
}

impl EncryptionMediator {
    pub fn new(
        manifest: InternalManifest,
        context: CiphertextElectionContext,
        device: EncryptionDevice,
    ) -> Result<Self> {
        if manifest.get_manifest_hash() != context.get_manifest_hash() {
            return Err(Error::InvalidArgument(
                "the manifest does not belong to the election context".to_string(),
            ));
        }
        let code_seed = device.get_hash();
        return Ok(Self {
            manifest,
            context,
            device,
            code_seed,
        });
    }

    pub fn get_manifest(&self) -> &InternalManifest {
        return &self.manifest;
    }

    pub fn get_context(&self) -> &CiphertextElectionContext {
        return &self.context;
    }

    pub fn get_device(&self) -> &EncryptionDevice {
        return &self.device;
    }

    /// The seed of the next ballot's code
    pub fn get_code_seed(&self) -> &ElementModQ {
        return &self.code_seed;
    }

    /// Encrypt with a fresh random ballot nonce
    pub fn encrypt(
        &mut self,
        ballot: &PlaintextBallot,
        should_verify_proofs: bool,
    ) -> Result<CiphertextBallot> {
        return self.encrypt_inner(ballot, None, should_verify_proofs);
    }

    /// Encrypt with a caller-supplied ballot nonce
    pub fn encrypt_with_nonce(
        &mut self,
        ballot: &PlaintextBallot,
        nonce: &ElementModQ,
        should_verify_proofs: bool,
    ) -> Result<CiphertextBallot> {
        return self.encrypt_inner(ballot, Some(*nonce), should_verify_proofs);
    }

    pub fn compact_encrypt(
        &mut self,
        ballot: &PlaintextBallot,
        should_verify_proofs: bool,
    ) -> Result<CompactCiphertextBallot> {
        let plaintext = CompactPlaintextBallot::from_plaintext(ballot, &self.manifest)?;
        let ciphertext = self.encrypt_inner(ballot, None, should_verify_proofs)?;
        return CompactCiphertextBallot::make(plaintext, &ciphertext);
    }

    fn encrypt_inner(
        &mut self,
        ballot: &PlaintextBallot,
        nonce: Option<ElementModQ>,
        should_verify_proofs: bool,
    ) -> Result<CiphertextBallot> {
        let encrypted = encrypt_ballot(
            ballot,
            &self.manifest,
            &self.context,
            &self.code_seed,
            nonce,
            None,
            should_verify_proofs,
        )?;
        self.code_seed = *encrypted.get_code();
        return Ok(encrypted);
    }
}
