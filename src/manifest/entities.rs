//! The value types an election manifest is assembled from. Every type that takes part in the
//! manifest hash implements [`CryptoHashable`].
use crate::{arithmetics::ElementModQ, hash::CryptoHashable, hash_elems};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionType {
    Unknown,
    General,
    PartisanPrimaryClosed,
    PartisanPrimaryOpen,
    Primary,
    Runoff,
    Special,
    Other,
}

impl ElectionType {
    pub fn as_str(&self) -> &'static str {
        return match self {
            ElectionType::Unknown => "unknown",
            ElectionType::General => "general",
            ElectionType::PartisanPrimaryClosed => "partisan_primary_closed",
            ElectionType::PartisanPrimaryOpen => "partisan_primary_open",
            ElectionType::Primary => "primary",
            ElectionType::Runoff => "runoff",
            ElectionType::Special => "special",
            ElectionType::Other => "other",
        };
    }
}

/// The kind of district a geopolitical unit is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingUnitType {
    Unknown,
    BallotBatch,
    BallotStyleArea,
    Borough,
    City,
    CityCouncil,
    CombinedPrecinct,
    Congressional,
    Country,
    County,
    CountyCouncil,
    DropBox,
    Judicial,
    Municipality,
    PollingPlace,
    Precinct,
    School,
    Special,
    SplitPrecinct,
    State,
    StateHouse,
    StateSenate,
    Township,
    Utility,
    Village,
    VoteCenter,
    Ward,
    Water,
    Other,
}

impl ReportingUnitType {
    pub fn as_str(&self) -> &'static str {
        return match self {
            ReportingUnitType::Unknown => "unknown",
            ReportingUnitType::BallotBatch => "ballot_batch",
            ReportingUnitType::BallotStyleArea => "ballot_style_area",
            ReportingUnitType::Borough => "borough",
            ReportingUnitType::City => "city",
            ReportingUnitType::CityCouncil => "city_council",
            ReportingUnitType::CombinedPrecinct => "combined_precinct",
            ReportingUnitType::Congressional => "congressional",
            ReportingUnitType::Country => "country",
            ReportingUnitType::County => "county",
            ReportingUnitType::CountyCouncil => "county_council",
            ReportingUnitType::DropBox => "drop_box",
            ReportingUnitType::Judicial => "judicial",
            ReportingUnitType::Municipality => "municipality",
            ReportingUnitType::PollingPlace => "polling_place",
            ReportingUnitType::Precinct => "precinct",
            ReportingUnitType::School => "school",
            ReportingUnitType::Special => "special",
            ReportingUnitType::SplitPrecinct => "split_precinct",
            ReportingUnitType::State => "state",
            ReportingUnitType::StateHouse => "state_house",
            ReportingUnitType::StateSenate => "state_senate",
            ReportingUnitType::Township => "township",
            ReportingUnitType::Utility => "utility",
            ReportingUnitType::Village => "village",
            ReportingUnitType::VoteCenter => "vote_center",
            ReportingUnitType::Ward => "ward",
            ReportingUnitType::Water => "water",
            ReportingUnitType::Other => "other",
        };
    }
}

/// How the votes of a contest are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteVariationType {
    Unknown,
    OneOfM,
    Approval,
    Borda,
    Cumulative,
    Majority,
    NOfM,
    Plurality,
    Proportional,
    Range,
    Rcv,
    SuperMajority,
    Other,
}

impl VoteVariationType {
    pub fn as_str(&self) -> &'static str {
        return match self {
            VoteVariationType::Unknown => "unknown",
            VoteVariationType::OneOfM => "one_of_m",
            VoteVariationType::Approval => "approval",
            VoteVariationType::Borda => "borda",
            VoteVariationType::Cumulative => "cumulative",
            VoteVariationType::Majority => "majority",
            VoteVariationType::NOfM => "n_of_m",
            VoteVariationType::Plurality => "plurality",
            VoteVariationType::Proportional => "proportional",
            VoteVariationType::Range => "range",
            VoteVariationType::Rcv => "rcv",
            VoteVariationType::SuperMajority => "super_majority",
            VoteVariationType::Other => "other",
        };
    }
}

/// A string with an annotation describing what it is, e.g. an email labelled "work"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedString {
    annotation: String,
    value: String,
}

impl AnnotatedString {
    pub fn new(annotation: &str, value: &str) -> Self {
        return Self {
            annotation: annotation.to_string(),
            value: value.to_string(),
        };
    }

    pub fn get_annotation(&self) -> &str {
        return &self.annotation;
    }

    pub fn get_value(&self) -> &str {
        return &self.value;
    }
}

impl CryptoHashable for AnnotatedString {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(&self.annotation, &self.value);
    }
}

/// Text in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    value: String,
    language: String,
}

impl Language {
    pub fn new(value: &str, language: &str) -> Self {
        return Self {
            value: value.to_string(),
            language: language.to_string(),
        };
    }

    pub fn get_value(&self) -> &str {
        return &self.value;
    }

    pub fn get_language(&self) -> &str {
        return &self.language;
    }
}

impl CryptoHashable for Language {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(&self.value, &self.language);
    }
}

/// The same text in several languages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InternationalizedText {
    text: Vec<Language>,
}

impl InternationalizedText {
    pub fn new(text: Vec<Language>) -> Self {
        return Self { text };
    }

    pub fn get_text(&self) -> &[Language] {
        return &self.text;
    }
}

impl CryptoHashable for InternationalizedText {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(hashes(&self.text));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactInformation {
    name: Option<String>,
    address_line: Vec<String>,
    email: Vec<AnnotatedString>,
    phone: Vec<AnnotatedString>,
}

impl ContactInformation {
    pub fn new(name: Option<&str>) -> Self {
        return Self {
            name: name.map(str::to_string),
            ..Default::default()
        };
    }

    pub fn with_address_line(mut self, line: &str) -> Self {
        self.address_line.push(line.to_string());
        return self;
    }

    pub fn with_email(mut self, email: AnnotatedString) -> Self {
        self.email.push(email);
        return self;
    }

    pub fn with_phone(mut self, phone: AnnotatedString) -> Self {
        self.phone.push(phone);
        return self;
    }

    pub fn get_name(&self) -> Option<&str> {
        return self.name.as_deref();
    }

    pub fn get_address_line(&self) -> &[String] {
        return &self.address_line;
    }

    pub fn get_email(&self) -> &[AnnotatedString] {
        return &self.email;
    }

    pub fn get_phone(&self) -> &[AnnotatedString] {
        return &self.phone;
    }
}

impl CryptoHashable for ContactInformation {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            self.name.as_ref(),
            self.address_line.clone(),
            hashes(&self.email),
            hashes(&self.phone),
        );
    }
}

/// A district that contests are held in, such as a county or a precinct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeopoliticalUnit {
    object_id: String,
    name: String,
    #[serde(rename = "type")]
    unit_type: ReportingUnitType,
    contact_information: Option<ContactInformation>,
}

impl GeopoliticalUnit {
    pub fn new(object_id: &str, name: &str, unit_type: ReportingUnitType) -> Self {
        return Self {
            object_id: object_id.to_string(),
            name: name.to_string(),
            unit_type,
            contact_information: None,
        };
    }

    pub fn with_contact_information(mut self, contact: ContactInformation) -> Self {
        self.contact_information = Some(contact);
        return self;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_name(&self) -> &str {
        return &self.name;
    }

    pub fn get_type(&self) -> ReportingUnitType {
        return self.unit_type;
    }

    pub fn get_contact_information(&self) -> Option<&ContactInformation> {
        return self.contact_information.as_ref();
    }
}

impl CryptoHashable for GeopoliticalUnit {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            &self.object_id,
            &self.name,
            self.unit_type.as_str(),
            self.contact_information.as_ref().map(|c| c.crypto_hash()),
        );
    }
}

/// The set of geopolitical units a physical ballot is printed for. A ballot of this style
/// carries every contest held in any of the units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotStyle {
    object_id: String,
    geopolitical_unit_ids: Vec<String>,
    party_ids: Vec<String>,
    image_uri: Option<String>,
}

impl BallotStyle {
    pub fn new(object_id: &str, geopolitical_unit_ids: &[&str]) -> Self {
        return Self {
            object_id: object_id.to_string(),
            geopolitical_unit_ids: geopolitical_unit_ids.iter().map(|id| id.to_string()).collect(),
            party_ids: vec![],
            image_uri: None,
        };
    }

    pub fn with_party_ids(mut self, party_ids: &[&str]) -> Self {
        self.party_ids = party_ids.iter().map(|id| id.to_string()).collect();
        return self;
    }

    pub fn with_image_uri(mut self, image_uri: &str) -> Self {
        self.image_uri = Some(image_uri.to_string());
        return self;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_geopolitical_unit_ids(&self) -> &[String] {
        return &self.geopolitical_unit_ids;
    }

    pub fn get_party_ids(&self) -> &[String] {
        return &self.party_ids;
    }

    pub fn get_image_uri(&self) -> Option<&str> {
        return self.image_uri.as_deref();
    }
}

impl CryptoHashable for BallotStyle {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            &self.object_id,
            self.geopolitical_unit_ids.clone(),
            self.party_ids.clone(),
            self.image_uri.as_ref(),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    object_id: String,
    name: InternationalizedText,
    abbreviation: Option<String>,
    color: Option<String>,
    logo_uri: Option<String>,
}

impl Party {
    pub fn new(object_id: &str, name: InternationalizedText) -> Self {
        return Self {
            object_id: object_id.to_string(),
            name,
            abbreviation: None,
            color: None,
            logo_uri: None,
        };
    }

    pub fn with_details(mut self, abbreviation: &str, color: &str, logo_uri: &str) -> Self {
        self.abbreviation = Some(abbreviation.to_string());
        self.color = Some(color.to_string());
        self.logo_uri = Some(logo_uri.to_string());
        return self;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_name(&self) -> &InternationalizedText {
        return &self.name;
    }

    pub fn get_abbreviation(&self) -> Option<&str> {
        return self.abbreviation.as_deref();
    }

    pub fn get_color(&self) -> Option<&str> {
        return self.color.as_deref();
    }

    pub fn get_logo_uri(&self) -> Option<&str> {
        return self.logo_uri.as_deref();
    }
}

impl CryptoHashable for Party {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            &self.object_id,
            self.name.crypto_hash(),
            self.abbreviation.as_ref(),
            self.color.as_ref(),
            self.logo_uri.as_ref(),
        );
    }
}

/// A choice that can be made in a contest: a person, a yes/no answer, or a write-in slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    object_id: String,
    name: InternationalizedText,
    party_id: Option<String>,
    image_uri: Option<String>,
    is_write_in: bool,
}

impl Candidate {
    pub fn new(object_id: &str, name: InternationalizedText, is_write_in: bool) -> Self {
        return Self {
            object_id: object_id.to_string(),
            name,
            party_id: None,
            image_uri: None,
            is_write_in,
        };
    }

    pub fn with_party_id(mut self, party_id: &str) -> Self {
        self.party_id = Some(party_id.to_string());
        return self;
    }

    pub fn with_image_uri(mut self, image_uri: &str) -> Self {
        self.image_uri = Some(image_uri.to_string());
        return self;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_name(&self) -> &InternationalizedText {
        return &self.name;
    }

    pub fn get_party_id(&self) -> Option<&str> {
        return self.party_id.as_deref();
    }

    pub fn get_image_uri(&self) -> Option<&str> {
        return self.image_uri.as_deref();
    }

    pub fn is_write_in(&self) -> bool {
        return self.is_write_in;
    }
}

impl CryptoHashable for Candidate {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            &self.object_id,
            self.name.crypto_hash(),
            self.party_id.as_ref(),
            self.image_uri.as_ref(),
        );
    }
}

/// One option of a contest, pointing at a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDescription {
    object_id: String,
    candidate_id: String,
    sequence_order: u64,
}

impl SelectionDescription {
    pub fn new(object_id: &str, candidate_id: &str, sequence_order: u64) -> Self {
        return Self {
            object_id: object_id.to_string(),
            candidate_id: candidate_id.to_string(),
            sequence_order,
        };
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_candidate_id(&self) -> &str {
        return &self.candidate_id;
    }

    pub fn get_sequence_order(&self) -> u64 {
        return self.sequence_order;
    }
}

impl CryptoHashable for SelectionDescription {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(&self.object_id, self.sequence_order, &self.candidate_id);
    }
}

/// A question on the ballot and the selections that answer it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestDescription {
    object_id: String,
    electoral_district_id: String,
    sequence_order: u64,
    vote_variation: VoteVariationType,
    number_elected: u64,
    votes_allowed: Option<u64>,
    name: String,
    ballot_title: Option<InternationalizedText>,
    ballot_subtitle: Option<InternationalizedText>,
    ballot_selections: Vec<SelectionDescription>,
    primary_party_ids: Vec<String>,
}

impl ContestDescription {
    pub fn new(
        object_id: &str,
        electoral_district_id: &str,
        sequence_order: u64,
        vote_variation: VoteVariationType,
        number_elected: u64,
        name: &str,
        ballot_selections: Vec<SelectionDescription>,
    ) -> Self {
        return Self {
            object_id: object_id.to_string(),
            electoral_district_id: electoral_district_id.to_string(),
            sequence_order,
            vote_variation,
            number_elected,
            votes_allowed: None,
            name: name.to_string(),
            ballot_title: None,
            ballot_subtitle: None,
            ballot_selections,
            primary_party_ids: vec![],
        };
    }

    pub fn with_votes_allowed(mut self, votes_allowed: u64) -> Self {
        self.votes_allowed = Some(votes_allowed);
        return self;
    }

    pub fn with_titles(
        mut self,
        ballot_title: InternationalizedText,
        ballot_subtitle: InternationalizedText,
    ) -> Self {
        self.ballot_title = Some(ballot_title);
        self.ballot_subtitle = Some(ballot_subtitle);
        return self;
    }

    pub fn with_primary_party_ids(mut self, party_ids: &[&str]) -> Self {
        self.primary_party_ids = party_ids.iter().map(|id| id.to_string()).collect();
        return self;
    }

    pub fn get_object_id(&self) -> &str {
        return &self.object_id;
    }

    pub fn get_electoral_district_id(&self) -> &str {
        return &self.electoral_district_id;
    }

    pub fn get_sequence_order(&self) -> u64 {
        return self.sequence_order;
    }

    pub fn get_vote_variation(&self) -> VoteVariationType {
        return self.vote_variation;
    }

    pub fn get_number_elected(&self) -> u64 {
        return self.number_elected;
    }

    /// The maximum number of selections a voter may mark; defaults to the number elected
    pub fn get_votes_allowed(&self) -> u64 {
        return self.votes_allowed.unwrap_or(self.number_elected);
    }

    pub fn get_name(&self) -> &str {
        return &self.name;
    }

    pub fn get_ballot_title(&self) -> Option<&InternationalizedText> {
        return self.ballot_title.as_ref();
    }

    pub fn get_ballot_subtitle(&self) -> Option<&InternationalizedText> {
        return self.ballot_subtitle.as_ref();
    }

    pub fn get_selections(&self) -> &[SelectionDescription] {
        return &self.ballot_selections;
    }

    pub fn get_primary_party_ids(&self) -> &[String] {
        return &self.primary_party_ids;
    }

    pub fn get_selection(&self, selection_id: &str) -> Option<&SelectionDescription> {
        return self
            .ballot_selections
            .iter()
            .find(|selection| selection.get_object_id() == selection_id);
    }

    /// Selection ids, sequence orders and candidate ids are unique within the contest, and the
    /// vote counts are consistent with the number of selections
    pub fn is_valid(&self) -> bool {
        let count = self.ballot_selections.len();
        let ids: HashSet<&str> = self
            .ballot_selections
            .iter()
            .map(|s| s.get_object_id())
            .collect();
        let sequence_orders: HashSet<u64> = self
            .ballot_selections
            .iter()
            .map(|s| s.get_sequence_order())
            .collect();
        let candidates: HashSet<&str> = self
            .ballot_selections
            .iter()
            .map(|s| s.get_candidate_id())
            .collect();

        let unique = ids.len() == count && sequence_orders.len() == count && candidates.len() == count;
        let valid_number_elected = self.number_elected as usize <= count;
        let valid_votes_allowed = match self.votes_allowed {
            Some(votes_allowed) => self.number_elected <= votes_allowed,
            None => true,
        };
        return count > 0 && unique && valid_number_elected && valid_votes_allowed;
    }
}

impl CryptoHashable for ContestDescription {
    fn crypto_hash(&self) -> ElementModQ {
        return hash_elems!(
            &self.object_id,
            self.sequence_order,
            &self.electoral_district_id,
            self.vote_variation.as_str(),
            self.ballot_title.as_ref().map(|t| t.crypto_hash()),
            self.ballot_subtitle.as_ref().map(|t| t.crypto_hash()),
            &self.name,
            self.number_elected,
            self.votes_allowed,
            hashes(&self.ballot_selections),
        );
    }
}

/// The crypto hashes of a list of entities, in order
pub(crate) fn hashes<T: CryptoHashable>(items: &[T]) -> Vec<ElementModQ> {
    return items.iter().map(CryptoHashable::crypto_hash).collect();
}
