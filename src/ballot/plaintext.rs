//! What a voter marked, before encryption
use crate::{
    error::{Error, Result},
    manifest::{ContestDescriptionWithPlaceholders, InternalManifest},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Free text attached to a selection, such as a write-in name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedData {
    value: String,
    length: u64,
}

impl ExtendedData {
    pub fn new(value: &str) -> Self {
        return Self {
            value: value.to_string(),
            length: value.len() as u64,
        };
    }

    pub fn get_value(&self) -> &str {
        return &self.value;
    }

    pub fn get_length(&self) -> u64 {
        return self.length;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextBallotSelection {
    object_id: String,
    vote: u64,
    #[serde(default)]
    is_placeholder_selection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extended_data: Option<ExtendedData>,
}

impl PlaintextBallotSelection {
    pub fn new(object_id: &str, vote: u64) -> Self {
        return Self {
            object_id: object_id.to_string(),
            vote,
            is_placeholder_selection: false,
            extended_data: None,
        };
    }

    pub fn new_placeholder(object_id: &str, vote: u64) -> Self {
        return Self {
            is_placeholder_selection: true,
            ..Self::new(object_id, vote)
        };
    }

    pub fn with_extended_data(mut self, extended_data: ExtendedData) -> Self {
        self.extended_data = Some(extended_data);
        return self;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_vote(&self) -> u64 {
        return self.vote;
    }

    pub fn is_placeholder(&self) -> bool {
        return self.is_placeholder_selection;
    }

    pub fn get_extended_data(&self) -> Option<&ExtendedData> {
        return self.extended_data.as_ref();
    }

    /// The selection answers the given description id with a vote of 0 or 1
    pub fn is_valid(&self, expected_object_id: &str) -> bool {
        if self.object_id != expected_object_id {
            tracing::debug!(
                expected = expected_object_id,
                actual = %self.object_id,
                "selection id mismatch"
            );
            return false;
        }
        return self.vote <= 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextBallotContest {
    object_id: String,
    ballot_selections: Vec<PlaintextBallotSelection>,
}

impl PlaintextBallotContest {
    pub fn new(object_id: &str, ballot_selections: Vec<PlaintextBallotSelection>) -> Self {
        return Self {
            object_id: object_id.to_string(),
            ballot_selections,
        };
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_selections(&self) -> &[PlaintextBallotSelection] {
        return &self.ballot_selections;
    }

    pub fn get_selection(&self, selection_id: &str) -> Option<&PlaintextBallotSelection> {
        return self
            .ballot_selections
            .iter()
            .find(|selection| selection.get_object_id() == selection_id);
    }

    /// Check the contest against its description:
    /// 1. the contest lists every described selection exactly once and no placeholders
    /// 2. every vote is 0 or 1
    /// 3. no more votes than `votes_allowed`
    pub fn validate_against(&self, description: &ContestDescriptionWithPlaceholders) -> Result<()> {
        if self.object_id != description.get_object_id() {
            return Err(Error::InvalidArgument(format!(
                "contest `{}` does not match description `{}`",
                self.object_id,
                description.get_object_id()
            )));
        }
        let expected = description.get_selections().len();
        if self.ballot_selections.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "contest `{}` has {} selections, expected {}",
                self.object_id,
                self.ballot_selections.len(),
                expected
            )));
        }

        let mut seen = HashSet::new();
        let mut votes = 0u64;
        for selection in &self.ballot_selections {
            let id = selection.get_object_id();
            if selection.is_placeholder() {
                return Err(Error::InvalidArgument(format!(
                    "placeholder `{id}` cannot be marked by a voter"
                )));
            }
            if description.get_selection(id).is_none() {
                return Err(Error::NotFound {
                    kind: "selection",
                    id: id.to_string(),
                });
            }
            if !seen.insert(id) {
                return Err(Error::InvalidArgument(format!(
                    "selection `{id}` appears more than once"
                )));
            }
            if !selection.is_valid(id) {
                return Err(Error::InvalidArgument(format!(
                    "selection `{id}` has vote {}, expected 0 or 1",
                    selection.get_vote()
                )));
            }
            votes += selection.get_vote();
        }

        if votes > description.get_votes_allowed() {
            return Err(Error::InvalidArgument(format!(
                "contest `{}` is overvoted: {} votes, {} allowed",
                self.object_id,
                votes,
                description.get_votes_allowed()
            )));
        }
        return Ok(());
    }
}

/// A voter's marked ballot. Contests missing from the ballot are treated as unmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextBallot {
    object_id: String,
    style_id: String,
    contests: Vec<PlaintextBallotContest>,
}

impl PlaintextBallot {
    pub fn new(object_id: &str, style_id: &str, contests: Vec<PlaintextBallotContest>) -> Self {
        return Self {
            object_id: object_id.to_string(),
            style_id: style_id.to_string(),
            contests,
        };
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_style_id(&self) -> &str {
        return &self.style_id;
    }

    pub fn get_contests(&self) -> &[PlaintextBallotContest] {
        return &self.contests;
    }

    pub fn get_contest(&self, contest_id: &str) -> Option<&PlaintextBallotContest> {
        return self
            .contests
            .iter()
            .find(|contest| contest.get_object_id() == contest_id);
    }

    /// Check the ballot against the manifest and return the contests of its style, in
    /// sequence order. Every contest on the ballot must belong to the style, appear once and
    /// be valid against its description; contests of the style may be missing.
    pub fn validate_against<'a>(
        &self,
        manifest: &'a InternalManifest,
    ) -> Result<Vec<&'a ContestDescriptionWithPlaceholders>> {
        if self.object_id.is_empty() {
            return Err(Error::InvalidArgument("ballot has no object id".to_string()));
        }
        let contests = manifest.get_contests_for(&self.style_id)?;
        let mut seen = HashSet::new();
        for contest in &self.contests {
            let id = contest.get_object_id();
            if !seen.insert(id) {
                return Err(Error::InvalidArgument(format!(
                    "contest `{id}` appears more than once"
                )));
            }
            let description = contests
                .iter()
                .find(|description| description.get_object_id() == id)
                .ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "contest `{id}` is not on ballot style `{}`",
                        self.style_id
                    ))
                })?;
            contest.validate_against(description)?;
        }
        return Ok(contests);
    }

    pub fn to_json(&self) -> Result<String> {
        return crate::to_json(self);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        return crate::from_json(json);
    }
}
