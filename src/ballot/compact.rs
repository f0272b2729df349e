//! Space-saving forms of ballots.
//!
//! A compact plaintext ballot keeps one flag per selection of its ballot style, in manifest
//! order, and the extended data by selection index. A compact ciphertext ballot keeps only the
//! compact plaintext and the values that seed the encryption (ballot nonce, code seed and
//! timestamp); every ciphertext and proof is re-derived from them on expansion.
use crate::{
    arithmetics::ElementModQ,
    ballot::{
        CiphertextBallot, ExtendedData, PlaintextBallot, PlaintextBallotContest,
        PlaintextBallotSelection,
    },
    error::{Error, Result},
    manifest::InternalManifest,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactPlaintextBallot {
    object_id: String,
    style_id: String,
    selections: Vec<bool>,
    extended_data: BTreeMap<u64, ExtendedData>,
}

impl CompactPlaintextBallot {
    /// Flatten a ballot against its style. Unmarked contests and selections become `false`.
    pub fn from_plaintext(ballot: &PlaintextBallot, manifest: &InternalManifest) -> Result<Self> {
        let contests = ballot.validate_against(manifest)?;
        let mut selections = vec![];
        let mut extended_data = BTreeMap::new();
        for description in contests {
            let contest = ballot.get_contest(description.get_object_id());
            for selection_description in description.sorted_selections() {
                let selection = contest
                    .and_then(|contest| contest.get_selection(selection_description.get_object_id()));
                if let Some(data) = selection.and_then(|selection| selection.get_extended_data()) {
                    extended_data.insert(selections.len() as u64, data.clone());
                }
                selections.push(selection.map(|selection| selection.get_vote() == 1).unwrap_or(false));
            }
        }
        return Ok(Self {
            object_id: ballot.get_object_id().to_string(),
            style_id: ballot.get_style_id().to_string(),
            selections,
            extended_data,
        });
    }

    /// Rebuild the full plaintext ballot, with every contest of the style in sequence order
    pub fn to_plaintext(&self, manifest: &InternalManifest) -> Result<PlaintextBallot> {
        let contests = manifest.get_contests_for(&self.style_id)?;
        let expected: usize = contests.iter().map(|c| c.get_selections().len()).sum();
        if expected != self.selections.len() {
            return Err(Error::InvalidArgument(format!(
                "compact ballot `{}` has {} selections, its style has {}",
                self.object_id,
                self.selections.len(),
                expected
            )));
        }

        let mut index = 0usize;
        let mut plaintext_contests = vec![];
        for description in contests {
            let mut plaintext_selections = vec![];
            for selection_description in description.sorted_selections() {
                let mut selection = PlaintextBallotSelection::new(
                    selection_description.get_object_id(),
                    self.selections[index] as u64,
                );
                if let Some(data) = self.extended_data.get(&(index as u64)) {
                    selection = selection.with_extended_data(data.clone());
                }
                plaintext_selections.push(selection);
                index += 1;
            }
            plaintext_contests.push(PlaintextBallotContest::new(
                description.get_object_id(),
                plaintext_selections,
            ));
        }
        return Ok(PlaintextBallot::new(
            &self.object_id,
            &self.style_id,
            plaintext_contests,
        ));
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_style_id(&self) -> &str {
        return &self.style_id;
    }

    pub fn get_selections(&self) -> &[bool] {
        return &self.selections;
    }

    pub fn get_extended_data(&self) -> &BTreeMap<u64, ExtendedData> {
        return &self.extended_data;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        return crate::to_bytes(self);
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        return crate::from_bytes(bytes);
    }
}

/// A ciphertext ballot reduced to what is needed to re-encrypt it bit for bit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactCiphertextBallot {
    plaintext: CompactPlaintextBallot,
    timestamp: u64,
    ballot_nonce: ElementModQ,
    code_seed: ElementModQ,
    code: ElementModQ,
}

impl CompactCiphertextBallot {
    /// Compact an encrypted ballot. The ballot must still carry its nonce.
    pub fn make(plaintext: CompactPlaintextBallot, ciphertext: &CiphertextBallot) -> Result<Self> {
        if plaintext.get_object_id() != ciphertext.get_object_id() {
            return Err(Error::InvalidArgument(format!(
                "plaintext `{}` and ciphertext `{}` are different ballots",
                plaintext.get_object_id(),
                ciphertext.get_object_id()
            )));
        }
        let ballot_nonce = ciphertext.get_nonce().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "ballot `{}` has no nonce to compact with",
                ciphertext.get_object_id()
            ))
        })?;
        return Ok(Self {
            plaintext,
            timestamp: ciphertext.get_timestamp(),
            ballot_nonce: *ballot_nonce,
            code_seed: *ciphertext.get_code_seed(),
            code: *ciphertext.get_code(),
        });
    }

    pub fn get_plaintext(&self) -> &CompactPlaintextBallot {
        return &self.plaintext;
    }

    pub fn get_object_id(&self) -> &str {
        return self.plaintext.get_object_id();
    }

    pub fn get_timestamp(&self) -> u64 {
        return self.timestamp;
    }

    pub fn get_ballot_nonce(&self) -> &ElementModQ {
        return &self.ballot_nonce;
    }

    pub fn get_code_seed(&self) -> &ElementModQ {
        return &self.code_seed;
    }

    pub fn get_code(&self) -> &ElementModQ {
        return &self.code;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        return crate::to_bytes(self);
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        return crate::from_bytes(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample_manifest;

    fn ballot() -> PlaintextBallot {
        return PlaintextBallot::new(
            "ballot-1",
            "county-style",
            vec![
                PlaintextBallotContest::new(
                    "mayor",
                    vec![
                        PlaintextBallotSelection::new("mayor-alice", 0),
                        PlaintextBallotSelection::new("mayor-bob", 1),
                    ],
                ),
                PlaintextBallotContest::new(
                    "council",
                    vec![
                        PlaintextBallotSelection::new("council-carol", 1),
                        PlaintextBallotSelection::new("council-dave", 0),
                        PlaintextBallotSelection::new("council-erin", 1)
                            .with_extended_data(ExtendedData::new("write-in: Frank")),
                    ],
                ),
            ],
        );
    }

    #[test]
    fn test_compact_plaintext_round_trip() {
        let manifest = InternalManifest::new(&sample_manifest()).unwrap();
        let compact = CompactPlaintextBallot::from_plaintext(&ballot(), &manifest).unwrap();
        assert_eq!(compact.get_selections(), &[false, true, true, false, true]);
        assert_eq!(compact.get_extended_data().len(), 1);
        assert!(compact.get_extended_data().contains_key(&4));

        let decoded = CompactPlaintextBallot::from_bytes(&compact.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, compact);
        assert_eq!(decoded.to_plaintext(&manifest).unwrap(), ballot());
    }

    #[test]
    fn test_missing_contest_is_unmarked() {
        let manifest = InternalManifest::new(&sample_manifest()).unwrap();
        let partial = PlaintextBallot::new(
            "ballot-2",
            "county-style",
            vec![ballot().get_contests()[0].clone()],
        );
        let compact = CompactPlaintextBallot::from_plaintext(&partial, &manifest).unwrap();
        assert_eq!(compact.get_selections(), &[false, true, false, false, false]);
        let expanded = compact.to_plaintext(&manifest).unwrap();
        assert_eq!(expanded.get_contests().len(), 2);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let manifest = InternalManifest::new(&sample_manifest()).unwrap();
        let mut compact = CompactPlaintextBallot::from_plaintext(&ballot(), &manifest).unwrap();
        compact.selections.push(false);
        assert!(compact.to_plaintext(&manifest).is_err());
    }
}
