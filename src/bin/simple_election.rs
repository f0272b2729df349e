//! A sample election procedure
use electionguard_encryption::{
    elgamal::elgamal_add,
    manifest::{
        BallotStyle, Candidate, ContestDescription, ElectionType, GeopoliticalUnit,
        InternationalizedText, Language, ReportingUnitType, SelectionDescription,
        VoteVariationType,
    },
    CiphertextElectionContext, ElGamalCiphertext, ElGamalKeyPair, ElementModQ, EncryptionDevice,
    EncryptionMediator, InternalManifest, Manifest, PlaintextBallot, PlaintextBallotContest,
    PlaintextBallotSelection,
};
use rand::{rngs::OsRng, Rng};

const CANDIDATES: [&str; 3] = ["alice", "bob", "carol"];
const VOTERS: usize = 10;

fn text(value: &str) -> InternationalizedText {
    return InternationalizedText::new(vec![Language::new(value, "en")]);
}

fn manifest() -> Manifest {
    let selections = CANDIDATES
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            SelectionDescription::new(&format!("mayor-{candidate}"), candidate, i as u64)
        })
        .collect();
    return Manifest::new(
        "sample-election",
        ElectionType::General,
        "2026-11-03T07:00:00Z",
        "2026-11-03T20:00:00Z",
        vec![GeopoliticalUnit::new(
            "city",
            "Sample City",
            ReportingUnitType::City,
        )],
        vec![],
        CANDIDATES
            .iter()
            .map(|candidate| Candidate::new(candidate, text(candidate), false))
            .collect(),
        vec![ContestDescription::new(
            "mayor",
            "city",
            0,
            VoteVariationType::OneOfM,
            1,
            "Mayor",
            selections,
        )],
        vec![BallotStyle::new("city-style", &["city"])],
    );
}

fn main() {
    let keypair = ElGamalKeyPair::generate();
    let manifest = InternalManifest::new(&manifest()).expect("sample manifest is valid");
    let context = CiphertextElectionContext::make(
        1,
        1,
        keypair.get_public_key(),
        &ElementModQ::rand_q(),
        manifest.get_manifest_hash(),
    )
    .expect("sample context is valid");
    let device = EncryptionDevice::new(1, 1, 1, "sample-polling-place");
    let mut mediator = EncryptionMediator::new(manifest, context.clone(), device)
        .expect("manifest and context match");

    // Every voter picks one candidate, or none at all
    let mut true_tally = [0u64; CANDIDATES.len()];
    let mut submitted = vec![];
    for voter in 0..VOTERS {
        let choice = OsRng.gen_range(0..=CANDIDATES.len());
        let selections = CANDIDATES
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                PlaintextBallotSelection::new(&format!("mayor-{candidate}"), (i == choice) as u64)
            })
            .collect();
        if choice < CANDIDATES.len() {
            true_tally[choice] += 1;
        }
        let ballot = PlaintextBallot::new(
            &format!("ballot-{voter}"),
            "city-style",
            vec![PlaintextBallotContest::new("mayor", selections)],
        );

        let encrypted = match mediator.encrypt(&ballot, true) {
            Ok(encrypted) => encrypted,
            Err(e) => panic!("ballot {voter} failed to encrypt: {e}"),
        };
        if !encrypted.is_valid_encryption(
            mediator.get_manifest(),
            context.get_elgamal_public_key(),
            context.get_crypto_extended_base_hash(),
        ) {
            panic!("ballot {voter} failed to verify");
        }
        println!("ballot {voter}: code {}", encrypted.get_code());
        submitted.push(encrypted.cast());
    }

    // Tally the cast ballots homomorphically and decrypt the totals
    for (i, candidate) in CANDIDATES.iter().enumerate() {
        let ciphertexts: Vec<ElGamalCiphertext> = submitted
            .iter()
            .filter(|ballot| ballot.is_tallyable())
            .map(|ballot| *ballot.get_contests()[0].get_selections()[i].get_ciphertext())
            .collect();
        let total = elgamal_add(&ciphertexts)
            .decrypt_with_secret(keypair.get_secret_key())
            .expect("the tally is small enough to decrypt");
        if total != true_tally[i] {
            panic!("the final tally of {candidate} is incorrect!");
        }
        println!("{candidate}: {total}");
    }
    println!("The election is a success!");
}
