use electionguard_encryption::{
    encrypt::{
        encrypt_ballot, encrypt_compact_ballot, expand_compact_ciphertext_ballot,
    },
    manifest::{
        BallotStyle, Candidate, ContestDescription, ElectionType, GeopoliticalUnit,
        InternationalizedText, Language, ReportingUnitType, SelectionDescription,
        VoteVariationType,
    },
    elgamal_encrypt, BallotBoxState, CiphertextBallot, CiphertextBallotContest,
    CiphertextBallotSelection, CiphertextElectionContext, CompactCiphertextBallot, CryptoHashable,
    ElGamalKeyPair, ElementModQ, EncryptionDevice, EncryptionMediator, InternalManifest, Manifest,
    PlaintextBallot, PlaintextBallotContest, PlaintextBallotSelection, Status, SubmittedBallot,
};

const TIMESTAMP: u64 = 1_790_000_000;

struct Election {
    keypair: ElGamalKeyPair,
    manifest: InternalManifest,
    context: CiphertextElectionContext,
}

fn text(value: &str) -> InternationalizedText {
    return InternationalizedText::new(vec![Language::new(value, "en")]);
}

/// A 1-of-2 referendum and a 2-of-3 board race in one district
fn election() -> Election {
    let manifest = Manifest::new(
        "test-election",
        ElectionType::Special,
        "2026-06-01T07:00:00Z",
        "2026-06-01T20:00:00Z",
        vec![GeopoliticalUnit::new(
            "district",
            "District 9",
            ReportingUnitType::School,
        )],
        vec![],
        vec![
            Candidate::new("yes", text("Yes"), false),
            Candidate::new("no", text("No"), false),
            Candidate::new("hana", text("Hana"), false),
            Candidate::new("ivo", text("Ivo"), false),
            Candidate::new("jun", text("Jun"), false),
        ],
        vec![
            ContestDescription::new(
                "referendum",
                "district",
                0,
                VoteVariationType::OneOfM,
                1,
                "Measure A",
                vec![
                    SelectionDescription::new("referendum-yes", "yes", 0),
                    SelectionDescription::new("referendum-no", "no", 1),
                ],
            ),
            ContestDescription::new(
                "board",
                "district",
                1,
                VoteVariationType::NOfM,
                2,
                "School Board",
                vec![
                    SelectionDescription::new("board-hana", "hana", 0),
                    SelectionDescription::new("board-ivo", "ivo", 1),
                    SelectionDescription::new("board-jun", "jun", 2),
                ],
            ),
        ],
        vec![BallotStyle::new("district-style", &["district"])],
    );
    let keypair = ElGamalKeyPair::from_secret(&ElementModQ::from_u64(31_415_926)).unwrap();
    let manifest = InternalManifest::new(&manifest).unwrap();
    let context = CiphertextElectionContext::make(
        5,
        3,
        keypair.get_public_key(),
        &ElementModQ::from_u64(271_828),
        manifest.get_manifest_hash(),
    )
    .unwrap();
    return Election {
        keypair,
        manifest,
        context,
    };
}

fn contest(object_id: &str, votes: &[(&str, u64)]) -> PlaintextBallotContest {
    return PlaintextBallotContest::new(
        object_id,
        votes
            .iter()
            .map(|(id, vote)| PlaintextBallotSelection::new(id, *vote))
            .collect(),
    );
}

fn yes_ballot() -> PlaintextBallot {
    return PlaintextBallot::new(
        "ballot-yes",
        "district-style",
        vec![contest(
            "referendum",
            &[("referendum-yes", 1), ("referendum-no", 0)],
        )],
    );
}

fn encrypt(election: &Election, ballot: &PlaintextBallot, nonce: u64) -> CiphertextBallot {
    return encrypt_ballot(
        ballot,
        &election.manifest,
        &election.context,
        &ElementModQ::from_u64(99),
        Some(ElementModQ::from_u64(nonce)),
        Some(TIMESTAMP),
        true,
    )
    .unwrap();
}

fn verify(election: &Election, ballot: &CiphertextBallot) -> bool {
    return ballot.is_valid_encryption(
        &election.manifest,
        election.context.get_elgamal_public_key(),
        election.context.get_crypto_extended_base_hash(),
    );
}

#[test]
fn test_encrypted_ballot_verifies_and_decrypts() {
    let election = election();
    let encrypted = encrypt(&election, &yes_ballot(), 1);
    assert!(verify(&election, &encrypted));
    assert_eq!(encrypted.get_contests().len(), 2);

    let secret = election.keypair.get_secret_key();
    let referendum = encrypted.get_contest("referendum").unwrap();
    let votes: Vec<u64> = referendum
        .get_selections()
        .iter()
        .map(|s| s.get_ciphertext().decrypt_with_secret(secret).unwrap())
        .collect();
    // yes, no, then the single placeholder
    assert_eq!(votes, vec![1, 0, 0]);
    assert_eq!(referendum.get_proof().get_constant(), 1);
    assert!(referendum.get_proof().is_valid(
        referendum.get_ciphertext_accumulation(),
        election.context.get_elgamal_public_key(),
        election.context.get_crypto_extended_base_hash(),
    ));

    // the board race was left blank, so both placeholders carry the votes
    let board = encrypted.get_contest("board").unwrap();
    let votes: Vec<u64> = board
        .get_selections()
        .iter()
        .map(|s| s.get_ciphertext().decrypt_with_secret(secret).unwrap())
        .collect();
    assert_eq!(votes, vec![0, 0, 0, 1, 1]);
    assert_eq!(
        board.get_proof().get_constant(),
        election.manifest.get_contest("board").unwrap().get_votes_allowed()
    );
    let total = board
        .get_ciphertext_accumulation()
        .decrypt_with_secret(secret)
        .unwrap();
    assert_eq!(total, 2);
}

#[test]
fn test_overvoted_contest_fails_ballot_verification() {
    let election = election();
    let k = election.context.get_elgamal_public_key();
    let q = election.context.get_crypto_extended_base_hash();
    let description = election.manifest.get_contest("referendum").unwrap();

    // mark yes, no and the placeholder, then honestly prove a sum of three
    let selections: Vec<CiphertextBallotSelection> = description
        .sorted_selections()
        .into_iter()
        .chain(description.get_placeholders().iter())
        .enumerate()
        .map(|(i, selection)| {
            let nonce = ElementModQ::from_u64(10 + i as u64);
            CiphertextBallotSelection::make(
                selection.get_object_id(),
                selection.get_sequence_order(),
                &selection.crypto_hash(),
                elgamal_encrypt(1, &nonce, k).unwrap(),
                k,
                q,
                &ElementModQ::from_u64(20 + i as u64),
                1,
                description.is_placeholder(selection),
                &nonce,
            )
            .unwrap()
        })
        .collect();
    let overvoted = CiphertextBallotContest::make(
        description.get_object_id(),
        description.get_sequence_order(),
        &description.crypto_hash(),
        selections,
        k,
        q,
        &ElementModQ::from_u64(30),
        3,
        &ElementModQ::from_u64(40),
    )
    .unwrap();
    assert!(overvoted
        .get_proof()
        .is_valid(overvoted.get_ciphertext_accumulation(), k, q));
    let total = overvoted
        .get_ciphertext_accumulation()
        .decrypt_with_secret(election.keypair.get_secret_key())
        .unwrap();
    assert_eq!(total, 3);

    let honest = encrypt(&election, &yes_ballot(), 6);
    let board = honest.get_contest("board").unwrap().clone();
    let rebuild = |referendum: CiphertextBallotContest| {
        CiphertextBallot::make(
            "ballot-forged",
            "district-style",
            election.manifest.get_manifest_hash(),
            &ElementModQ::from_u64(99),
            vec![referendum, board.clone()],
            None,
            Some(TIMESTAMP),
        )
        .unwrap()
    };
    let honest_referendum = honest.get_contest("referendum").unwrap().clone();
    assert!(verify(&election, &rebuild(honest_referendum)));
    assert!(!verify(&election, &rebuild(overvoted)));
}

#[test]
fn test_ballot_with_missing_contest_fails_verification() {
    let election = election();
    let honest = encrypt(&election, &yes_ballot(), 7);
    let partial = CiphertextBallot::make(
        "ballot-partial",
        "district-style",
        election.manifest.get_manifest_hash(),
        &ElementModQ::from_u64(99),
        vec![honest.get_contest("referendum").unwrap().clone()],
        None,
        Some(TIMESTAMP),
    )
    .unwrap();
    assert!(!verify(&election, &partial));
}

#[test]
fn test_cast_ballot_has_no_nonces() {
    let election = election();
    let encrypted = encrypt(&election, &yes_ballot(), 2);
    assert!(encrypted.get_nonce().is_some());

    let cast = encrypted.cast();
    assert_eq!(cast.get_state(), BallotBoxState::Cast);
    assert!(cast.get_nonce().is_none());
    assert!(cast
        .get_contests()
        .iter()
        .flat_map(|contest| contest.get_selections())
        .all(|selection| selection.get_nonce().is_none()));
    assert!(verify(&election, &cast));

    let parsed = SubmittedBallot::from_json(&cast.to_json().unwrap()).unwrap();
    assert_eq!(parsed, cast);
}

#[test]
fn test_encryption_is_deterministic() {
    let election = election();
    let first = encrypt(&election, &yes_ballot(), 3);
    let second = encrypt(&election, &yes_ballot(), 3);
    assert_eq!(first, second);
    assert_eq!(
        first.to_json_with_nonces().unwrap(),
        second.to_json_with_nonces().unwrap()
    );

    let other = encrypt(&election, &yes_ballot(), 4);
    assert_ne!(first.get_code(), other.get_code());
}

#[test]
fn test_compact_ballot_expands_to_the_same_ballot() {
    let election = election();
    let ballot = PlaintextBallot::new(
        "ballot-compact",
        "district-style",
        vec![
            contest("referendum", &[("referendum-yes", 0), ("referendum-no", 1)]),
            contest(
                "board",
                &[("board-hana", 1), ("board-ivo", 0), ("board-jun", 1)],
            ),
        ],
    );
    let compact = encrypt_compact_ballot(
        &ballot,
        &election.manifest,
        &election.context,
        &ElementModQ::from_u64(99),
        Some(ElementModQ::from_u64(5)),
        Some(TIMESTAMP),
        true,
    )
    .unwrap();
    let decoded = CompactCiphertextBallot::from_bytes(&compact.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, compact);

    let expanded =
        expand_compact_ciphertext_ballot(&decoded, &election.manifest, &election.context).unwrap();
    assert_eq!(expanded, encrypt(&election, &ballot, 5));
    assert_eq!(expanded.get_code(), compact.get_code());
}

#[test]
fn test_invalid_ballots_are_rejected() {
    let election = election();
    let missing_selection = PlaintextBallot::new(
        "ballot-short",
        "district-style",
        vec![contest("referendum", &[("referendum-yes", 1)])],
    );
    let overvote = PlaintextBallot::new(
        "ballot-over",
        "district-style",
        vec![contest(
            "referendum",
            &[("referendum-yes", 1), ("referendum-no", 1)],
        )],
    );
    for ballot in [missing_selection, overvote] {
        let err = encrypt_ballot(
            &ballot,
            &election.manifest,
            &election.context,
            &ElementModQ::from_u64(99),
            None,
            None,
            true,
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::InvalidArgument);
    }

    let unknown_style = PlaintextBallot::new("ballot-lost", "elsewhere", vec![]);
    let err = encrypt_ballot(
        &unknown_style,
        &election.manifest,
        &election.context,
        &ElementModQ::from_u64(99),
        None,
        None,
        true,
    )
    .unwrap_err();
    assert_eq!(err.status(), Status::InvalidArgument);
}

#[test]
fn test_mediator_codes_form_a_chain() {
    let election = election();
    let device = EncryptionDevice::new(7, 8, 9, "precinct-12");
    let mut mediator = EncryptionMediator::new(
        election.manifest.clone(),
        election.context.clone(),
        device.clone(),
    )
    .unwrap();

    let mut previous = device.get_hash();
    for i in 0..3 {
        let ballot = PlaintextBallot::new(&format!("ballot-{i}"), "district-style", vec![]);
        let encrypted = mediator.encrypt(&ballot, true).unwrap();
        assert_eq!(encrypted.get_code_seed(), &previous);
        assert!(verify(&election, &encrypted));
        previous = *encrypted.get_code();
    }
    assert_eq!(mediator.get_code_seed(), &previous);

    let compact = mediator.compact_encrypt(&yes_ballot(), false).unwrap();
    assert_eq!(compact.get_code_seed(), &previous);
    assert_eq!(mediator.get_code_seed(), compact.get_code());
}
