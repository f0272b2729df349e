//! The election manifest: every district, party, candidate, contest and ballot style of an
//! election, and the hash that binds encrypted ballots to it.

pub mod entities;
pub mod internal;

pub use entities::{
    AnnotatedString, BallotStyle, Candidate, ContactInformation, ContestDescription,
    ElectionType, GeopoliticalUnit, InternationalizedText, Language, Party, ReportingUnitType,
    SelectionDescription, VoteVariationType,
};
pub use internal::{ContestDescriptionWithPlaceholders, InternalManifest};

use crate::{
    arithmetics::ElementModQ,
    error::{Error, Result},
    hash::CryptoHashable,
    hash_elems,
};
use entities::hashes;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    election_scope_id: String,
    #[serde(rename = "type")]
    election_type: ElectionType,
    /// ISO-8601 timestamps
    start_date: String,
    end_date: String,
    geopolitical_units: Vec<GeopoliticalUnit>,
    parties: Vec<Party>,
    candidates: Vec<Candidate>,
    contests: Vec<ContestDescription>,
    ballot_styles: Vec<BallotStyle>,
    name: Option<InternationalizedText>,
    contact_information: Option<ContactInformation>,
}

impl Manifest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        election_scope_id: &str,
        election_type: ElectionType,
        start_date: &str,
        end_date: &str,
        geopolitical_units: Vec<GeopoliticalUnit>,
        parties: Vec<Party>,
        candidates: Vec<Candidate>,
        contests: Vec<ContestDescription>,
        ballot_styles: Vec<BallotStyle>,
    ) -> Self {
        return Self {
            election_scope_id: election_scope_id.to_string(),
            election_type,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            geopolitical_units,
            parties,
            candidates,
            contests,
            ballot_styles,
            name: None,
            contact_information: None,
        };
    }

    pub fn with_name(mut self, name: InternationalizedText) -> Self {
        self.name = Some(name);
        return self;
    }

    pub fn with_contact_information(mut self, contact: ContactInformation) -> Self {
        self.contact_information = Some(contact);
        return self;
    }

    pub fn get_election_scope_id(&self) -> &str {
        return &self.election_scope_id;
    }

    pub fn get_election_type(&self) -> ElectionType {
        return self.election_type;
    }

    pub fn get_start_date(&self) -> &str {
        return &self.start_date;
    }

    pub fn get_end_date(&self) -> &str {
        return &self.end_date;
    }

    pub fn get_geopolitical_units(&self) -> &[GeopoliticalUnit] {
        return &self.geopolitical_units;
    }

    pub fn get_parties(&self) -> &[Party] {
        return &self.parties;
    }

    pub fn get_candidates(&self) -> &[Candidate] {
        return &self.candidates;
    }

    pub fn get_contests(&self) -> &[ContestDescription] {
        return &self.contests;
    }

    pub fn get_ballot_styles(&self) -> &[BallotStyle] {
        return &self.ballot_styles;
    }

    pub fn get_name(&self) -> Option<&InternationalizedText> {
        return self.name.as_ref();
    }

    pub fn get_contact_information(&self) -> Option<&ContactInformation> {
        return self.contact_information.as_ref();
    }

    pub fn get_geopolitical_unit(&self, object_id: &str) -> Option<&GeopoliticalUnit> {
        return self
            .geopolitical_units
            .iter()
            .find(|unit| unit.get_object_id() == object_id);
    }

    pub fn get_party(&self, object_id: &str) -> Option<&Party> {
        return self
            .parties
            .iter()
            .find(|party| party.get_object_id() == object_id);
    }

    pub fn get_candidate(&self, object_id: &str) -> Option<&Candidate> {
        return self
            .candidates
            .iter()
            .find(|candidate| candidate.get_object_id() == object_id);
    }

    pub fn get_contest(&self, object_id: &str) -> Option<&ContestDescription> {
        return self
            .contests
            .iter()
            .find(|contest| contest.get_object_id() == object_id);
    }

    pub fn get_ballot_style(&self, object_id: &str) -> Option<&BallotStyle> {
        return self
            .ballot_styles
            .iter()
            .find(|style| style.get_object_id() == object_id);
    }

    /// Check the structure of the manifest:
    /// 1. ids are unique within each kind of entity, and contest sequence orders are unique
    /// 2. every reference (district, party, candidate, geopolitical unit) resolves
    /// 3. every contest is valid on its own
    pub fn validate(&self) -> Result<()> {
        unique_ids(
            "geopolitical unit",
            self.geopolitical_units.iter().map(|u| u.get_object_id()),
        )?;
        unique_ids("party", self.parties.iter().map(|p| p.get_object_id()))?;
        unique_ids("candidate", self.candidates.iter().map(|c| c.get_object_id()))?;
        unique_ids("contest", self.contests.iter().map(|c| c.get_object_id()))?;
        unique_ids(
            "ballot style",
            self.ballot_styles.iter().map(|s| s.get_object_id()),
        )?;
        let sequence_orders: Vec<String> = self
            .contests
            .iter()
            .map(|c| c.get_sequence_order().to_string())
            .collect();
        unique_ids(
            "contest sequence order",
            sequence_orders.iter().map(String::as_str),
        )?;

        for style in &self.ballot_styles {
            for unit_id in style.get_geopolitical_unit_ids() {
                require("geopolitical unit", unit_id, self.get_geopolitical_unit(unit_id))?;
            }
            for party_id in style.get_party_ids() {
                require("party", party_id, self.get_party(party_id))?;
            }
        }
        for candidate in &self.candidates {
            if let Some(party_id) = candidate.get_party_id() {
                require("party", party_id, self.get_party(party_id))?;
            }
        }
        for contest in &self.contests {
            let district = contest.get_electoral_district_id();
            require("geopolitical unit", district, self.get_geopolitical_unit(district))?;
            if !contest.is_valid() {
                return Err(Error::InvalidArgument(format!(
                    "contest `{}` has inconsistent selections or vote counts",
                    contest.get_object_id()
                )));
            }
            for selection in contest.get_selections() {
                let candidate_id = selection.get_candidate_id();
                require("candidate", candidate_id, self.get_candidate(candidate_id))?;
            }
        }
        return Ok(());
    }

    pub fn is_valid(&self) -> bool {
        let validation = self.validate();
        if let Err(err) = &validation {
            tracing::warn!(%err, election_scope_id = %self.election_scope_id, "invalid manifest");
        }
        return validation.is_ok();
    }

    pub fn to_json(&self) -> Result<String> {
        return crate::to_json(self);
    }

    /// Parse and validate a manifest
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = crate::from_json(json)?;
        manifest.validate()?;
        return Ok(manifest);
    }
}

fn require<T>(kind: &'static str, id: &str, found: Option<T>) -> Result<T> {
    return found.ok_or_else(|| Error::NotFound {
        kind,
        id: id.to_string(),
    });
}

fn unique_ids<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::AlreadyExists {
                kind,
                id: id.to_string(),
            });
        }
    }
    return Ok(());
}

impl CryptoHashable for Manifest {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            &self.election_scope_id,
            self.election_type.as_str(),
            &self.start_date,
            &self.end_date,
            self.name.as_ref().map(|n| n.crypto_hash()),
            self.contact_information.as_ref().map(|c| c.crypto_hash()),
            hashes(&self.geopolitical_units),
            hashes(&self.parties),
            hashes(&self.candidates),
            hashes(&self.contests),
            hashes(&self.ballot_styles),
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Status;

    fn text(value: &str) -> InternationalizedText {
        return InternationalizedText::new(vec![Language::new(value, "en")]);
    }

    /// One county with a 1-of-2 mayoral race and a 2-of-3 council race
    pub(crate) fn sample_manifest() -> Manifest {
        let units = vec![GeopoliticalUnit::new(
            "county",
            "Jefferson County",
            ReportingUnitType::County,
        )];
        let parties = vec![Party::new("party-a", text("Party A")).with_details(
            "A",
            "blue",
            "https://example.org/a.png",
        )];
        let candidates = vec![
            Candidate::new("alice", text("Alice"), false).with_party_id("party-a"),
            Candidate::new("bob", text("Bob"), false),
            Candidate::new("carol", text("Carol"), false),
            Candidate::new("dave", text("Dave"), false),
            Candidate::new("erin", text("Erin"), false),
        ];
        let contests = vec![
            ContestDescription::new(
                "mayor",
                "county",
                0,
                VoteVariationType::OneOfM,
                1,
                "Mayor",
                vec![
                    SelectionDescription::new("mayor-alice", "alice", 0),
                    SelectionDescription::new("mayor-bob", "bob", 1),
                ],
            ),
            ContestDescription::new(
                "council",
                "county",
                1,
                VoteVariationType::NOfM,
                2,
                "Council",
                vec![
                    SelectionDescription::new("council-carol", "carol", 0),
                    SelectionDescription::new("council-dave", "dave", 1),
                    SelectionDescription::new("council-erin", "erin", 2),
                ],
            )
            .with_votes_allowed(2),
        ];
        let styles = vec![BallotStyle::new("county-style", &["county"])];
        return Manifest::new(
            "jefferson-general",
            ElectionType::General,
            "2026-11-03T07:00:00Z",
            "2026-11-03T20:00:00Z",
            units,
            parties,
            candidates,
            contests,
            styles,
        )
        .with_name(text("Jefferson County General Election"));
    }

    #[test]
    fn test_sample_manifest_is_valid() {
        let manifest = sample_manifest();
        assert!(manifest.is_valid());
        assert!(manifest.get_contest("mayor").is_some());
        assert!(manifest.get_candidate("zed").is_none());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut manifest = sample_manifest();
        manifest.candidates.push(Candidate::new("bob", text("Bob"), false));
        let err = manifest.validate().unwrap_err();
        assert_eq!(err.status(), Status::AlreadyExists);
    }

    #[test]
    fn test_dangling_references() {
        let mut manifest = sample_manifest();
        manifest.ballot_styles.push(BallotStyle::new("other-style", &["nowhere"]));
        assert_eq!(
            manifest.validate().unwrap_err(),
            Error::NotFound {
                kind: "geopolitical unit",
                id: "nowhere".to_string()
            }
        );

        let mut manifest = sample_manifest();
        manifest.contests.push(ContestDescription::new(
            "sheriff",
            "county",
            2,
            VoteVariationType::OneOfM,
            1,
            "Sheriff",
            vec![SelectionDescription::new("sheriff-zed", "zed", 0)],
        ));
        assert!(!manifest.is_valid());
    }

    #[test]
    fn test_json_round_trip() {
        let manifest = sample_manifest();
        let json = manifest.to_json().unwrap();
        let parsed = Manifest::from_json(&json).unwrap();
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.crypto_hash(), manifest.crypto_hash());
        assert!(Manifest::from_json("{\"election_scope_id\": 3}").is_err());
    }
}
