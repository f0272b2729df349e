//! The projection of a manifest that the encryption pipeline works from.
//!
//! Each contest is extended with one placeholder selection per allowed vote. On an encrypted
//! ballot the placeholders absorb the votes the voter did not cast, so that every contest
//! encrypts exactly `votes_allowed` votes and a single constant proof covers undervotes.
use crate::{
    arithmetics::ElementModQ,
    error::{Error, Result},
    hash::CryptoHashable,
    manifest::{BallotStyle, ContestDescription, GeopoliticalUnit, Manifest, SelectionDescription},
};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A contest description together with its placeholder selections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestDescriptionWithPlaceholders {
    description: ContestDescription,
    placeholder_selections: Vec<SelectionDescription>,
}

impl ContestDescriptionWithPlaceholders {
    pub fn new(description: ContestDescription) -> Self {
        let placeholder_selections = generate_placeholder_selections(&description);
        return Self {
            description,
            placeholder_selections,
        };
    }

    pub fn get_description(&self) -> &ContestDescription {
        return &self.description;
    }

    pub fn get_placeholders(&self) -> &[SelectionDescription] {
        return &self.placeholder_selections;
    }

    pub fn is_placeholder(&self, selection: &SelectionDescription) -> bool {
        return self.placeholder_selections.contains(selection);
    }

    /// Look up a selection, real or placeholder, by its id
    pub fn selection_for_id(&self, selection_id: &str) -> Option<&SelectionDescription> {
        return self
            .description
            .get_selections()
            .iter()
            .chain(self.placeholder_selections.iter())
            .find(|selection| selection.get_object_id() == selection_id);
    }

    /// The real selections in sequence order
    pub fn sorted_selections(&self) -> Vec<&SelectionDescription> {
        let mut selections: Vec<&SelectionDescription> =
            self.description.get_selections().iter().collect();
        selections.sort_by_key(|selection| selection.get_sequence_order());
        return selections;
    }
}

impl Deref for ContestDescriptionWithPlaceholders {
    type Target = ContestDescription;

    fn deref(&self) -> &Self::Target {
        return &self.description;
    }
}

impl CryptoHashable for ContestDescriptionWithPlaceholders {
    fn crypto_hash(&self) -> ElementModQ {
        return self.description.crypto_hash();
    }
}

/// One placeholder per allowed vote, numbered after the highest sequence order of the real
/// selections
pub fn generate_placeholder_selections(contest: &ContestDescription) -> Vec<SelectionDescription> {
    let max_sequence_order = contest
        .get_selections()
        .iter()
        .map(|selection| selection.get_sequence_order())
        .max()
        .unwrap_or(0);
    return (1..=contest.get_votes_allowed())
        .map(|offset| {
            let sequence_order = max_sequence_order + offset;
            let contest_id = contest.get_object_id();
            SelectionDescription::new(
                &format!("{contest_id}-{sequence_order}-placeholder"),
                &format!("{contest_id}-{sequence_order}-candidate"),
                sequence_order,
            )
        })
        .collect();
}

/// The validated, placeholder-augmented view of a [`Manifest`] and its hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalManifest {
    manifest_hash: ElementModQ,
    geopolitical_units: Vec<GeopoliticalUnit>,
    contests: Vec<ContestDescriptionWithPlaceholders>,
    ballot_styles: Vec<BallotStyle>,
}

impl InternalManifest {
    /// Validate the manifest and derive its internal representation
    pub fn new(manifest: &Manifest) -> Result<Self> {
        manifest.validate()?;
        let mut contests: Vec<ContestDescriptionWithPlaceholders> = manifest
            .get_contests()
            .iter()
            .cloned()
            .map(ContestDescriptionWithPlaceholders::new)
            .collect();
        contests.sort_by_key(|contest| contest.get_sequence_order());
        return Ok(Self {
            manifest_hash: manifest.crypto_hash(),
            geopolitical_units: manifest.get_geopolitical_units().to_vec(),
            contests,
            ballot_styles: manifest.get_ballot_styles().to_vec(),
        });
    }

    pub fn get_manifest_hash(&self) -> &ElementModQ {
        return &self.manifest_hash;
    }

    pub fn get_geopolitical_units(&self) -> &[GeopoliticalUnit] {
        return &self.geopolitical_units;
    }

    /// Every contest, in sequence order
    pub fn get_contests(&self) -> &[ContestDescriptionWithPlaceholders] {
        return &self.contests;
    }

    pub fn get_ballot_styles(&self) -> &[BallotStyle] {
        return &self.ballot_styles;
    }

    pub fn get_contest(&self, contest_id: &str) -> Option<&ContestDescriptionWithPlaceholders> {
        return self
            .contests
            .iter()
            .find(|contest| contest.get_object_id() == contest_id);
    }

    pub fn get_ballot_style(&self, style_id: &str) -> Result<&BallotStyle> {
        return self
            .ballot_styles
            .iter()
            .find(|style| style.get_object_id() == style_id)
            .ok_or_else(|| Error::NotFound {
                kind: "ballot style",
                id: style_id.to_string(),
            });
    }

    /// The contests on a ballot of the given style, in sequence order
    pub fn get_contests_for(&self, style_id: &str) -> Result<Vec<&ContestDescriptionWithPlaceholders>> {
        let style = self.get_ballot_style(style_id)?;
        let units = style.get_geopolitical_unit_ids();
        return Ok(self
            .contests
            .iter()
            .filter(|contest| {
                units
                    .iter()
                    .any(|unit| unit.as_str() == contest.get_electoral_district_id())
            })
            .collect());
    }

    pub fn to_json(&self) -> Result<String> {
        return crate::to_json(self);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        return crate::from_json(json);
    }
}
