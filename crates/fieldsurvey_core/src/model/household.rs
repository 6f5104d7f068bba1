//! Household domain model.
//!
//! # Responsibility
//! - Define the canonical surveyed-dwelling record and its residents.
//! - Provide capture/seed templates and sync-state helpers.
//!
//! # Invariants
//! - `id` is stable and never reassigned after capture.
//! - Edits set `sync_status = Pending` and refresh `last_modified`.
//! - Only the sync path sets `sync_status = Synced`.
//! - `residents.len()` is not reconciled against `total_residents`.

use crate::model::location::{is_valid_coordinate, GeoFix};
use crate::model::timestamp::to_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable household identifier.
///
/// Captured households use `house_<uuid>`; seeded/imported records keep
/// whatever id they arrived with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseholdId(String);

impl HouseholdId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh id for the capture workflow.
    pub fn generate() -> Self {
        Self(format!("house_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HouseholdId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HouseholdId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Declares a categorical field with its persisted wire strings.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Persisted wire value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Reconciliation state against the assumed remote authority.
    SyncStatus {
        Synced => "synced",
        Pending => "pending",
        Offline => "offline",
    }
);

wire_enum!(
    /// Social category recorded for the household.
    Caste {
        General => "General",
        Sc => "SC",
        St => "ST",
        Obc => "OBC",
    }
);

wire_enum!(
    HouseType {
        Owned => "owned",
        Rented => "rented",
        Slum => "slum",
        Temporary => "temporary",
    }
);

wire_enum!(
    /// Primary occupation of the household.
    Occupation {
        Farmer => "farmer",
        Laborer => "laborer",
        GovtEmployee => "govt-employee",
        SelfEmployed => "self-employed",
        PrivateJob => "private-job",
        Business => "business",
        Unemployed => "unemployed",
    }
);

wire_enum!(
    /// Monthly household income bucket in rupees.
    IncomeBracket {
        UpTo15k => "0-15000",
        From15kTo25k => "15000-25000",
        From25kTo50k => "25000-50000",
        From50kTo75k => "50000-75000",
        Above75k => "75000+",
    }
);

wire_enum!(
    EducationLevel {
        NoFormal => "None",
        Primary => "Primary",
        Secondary => "Secondary",
        HigherSecondary => "Higher Secondary",
        Graduate => "Graduate",
        PostGraduate => "Post Graduate",
        Professional => "Professional",
    }
);

wire_enum!(
    Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
);

wire_enum!(
    ResidentEmployment {
        Employed => "Employed",
        Unemployed => "Unemployed",
        Student => "Student",
        Retired => "Retired",
        Homemaker => "Homemaker",
        Child => "Child",
    }
);

/// One person living in a surveyed household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub relation: String,
    pub has_voter_id: bool,
    #[serde(default)]
    pub education: Option<EducationLevel>,
    #[serde(default)]
    pub employment: Option<ResidentEmployment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,
}

/// One surveyed dwelling.
///
/// Serialized with camelCase keys; this is the persisted blob schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: HouseholdId,
    pub lat: f64,
    pub lng: f64,

    pub house_number: String,
    pub address: String,
    pub head_of_household: String,
    pub caste: Caste,
    pub religion: String,
    pub language: String,
    pub total_residents: u32,
    pub house_type: HouseType,

    pub employed: u32,
    pub unemployed: u32,
    #[serde(default)]
    pub occupation: Option<Occupation>,
    #[serde(default)]
    pub monthly_income: Option<IncomeBracket>,
    #[serde(default)]
    pub welfare_schemes: Vec<String>,

    pub total_children: u32,
    pub children_under5: u32,
    pub children_in_school: u32,
    pub literate_adults: u32,
    #[serde(default)]
    pub highest_education: Option<EducationLevel>,
    pub dropouts: u32,

    pub has_toilet: bool,
    pub has_clean_water: bool,
    pub has_chronic_illness: bool,

    pub voter_id_available: bool,
    pub aadhaar_available: bool,
    pub eligible_voters_listed: bool,
    pub polling_booth: String,
    pub voter_list_issues: String,

    pub surveyed_by: String,
    #[serde(serialize_with = "crate::model::timestamp::serialize")]
    pub survey_date: DateTime<Utc>,
    #[serde(serialize_with = "crate::model::timestamp::serialize")]
    pub last_modified: DateTime<Utc>,
    pub sync_status: SyncStatus,

    #[serde(default)]
    pub residents: Vec<Resident>,
}

/// Household validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseholdValidationError {
    EmptyId,
    InvalidCoordinate { lat: f64, lng: f64 },
}

impl Display for HouseholdValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "household id cannot be empty"),
            Self::InvalidCoordinate { lat, lng } => {
                write!(f, "household location out of range: lat={lat} lng={lng}")
            }
        }
    }
}

impl Error for HouseholdValidationError {}

impl Household {
    /// Blank capture template at a GPS fix.
    ///
    /// # Invariants
    /// - Gets a freshly generated id.
    /// - Starts as `SyncStatus::Offline`; nothing has been edited yet.
    pub fn blank_at(fix: GeoFix, surveyed_by: impl Into<String>, now: DateTime<Utc>) -> Self {
        let now = to_millis(now);
        Self {
            id: HouseholdId::generate(),
            lat: fix.lat,
            lng: fix.lng,
            house_number: String::new(),
            address: String::new(),
            head_of_household: String::new(),
            caste: Caste::General,
            religion: String::new(),
            language: String::new(),
            total_residents: 0,
            house_type: HouseType::Owned,
            employed: 0,
            unemployed: 0,
            occupation: None,
            monthly_income: None,
            welfare_schemes: Vec::new(),
            total_children: 0,
            children_under5: 0,
            children_in_school: 0,
            literate_adults: 0,
            highest_education: None,
            dropouts: 0,
            has_toilet: false,
            has_clean_water: false,
            has_chronic_illness: false,
            voter_id_available: false,
            aadhaar_available: false,
            eligible_voters_listed: false,
            polling_booth: String::new(),
            voter_list_issues: String::new(),
            surveyed_by: surveyed_by.into(),
            survey_date: now,
            last_modified: now,
            sync_status: SyncStatus::Offline,
            residents: Vec::new(),
        }
    }

    /// Seed record written when local storage holds no collection yet.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let now = to_millis(now);
        Self {
            id: HouseholdId::new("sample_1"),
            lat: 28.6139,
            lng: 77.209,
            house_number: "A-101".to_string(),
            address: "Sector 15, Dwarka, New Delhi".to_string(),
            head_of_household: "Rajesh Kumar".to_string(),
            caste: Caste::General,
            religion: "Hindu".to_string(),
            language: "Hindi".to_string(),
            total_residents: 4,
            house_type: HouseType::Owned,
            employed: 2,
            unemployed: 0,
            occupation: Some(Occupation::GovtEmployee),
            monthly_income: Some(IncomeBracket::From50kTo75k),
            welfare_schemes: vec!["PDS".to_string()],
            total_children: 2,
            children_under5: 1,
            children_in_school: 1,
            literate_adults: 2,
            highest_education: Some(EducationLevel::Graduate),
            dropouts: 0,
            has_toilet: true,
            has_clean_water: true,
            has_chronic_illness: false,
            voter_id_available: true,
            aadhaar_available: true,
            eligible_voters_listed: true,
            polling_booth: "Booth 101".to_string(),
            voter_list_issues: String::new(),
            surveyed_by: "Field Agent 1".to_string(),
            survey_date: now,
            last_modified: now,
            sync_status: SyncStatus::Synced,
            residents: vec![
                Resident {
                    name: "Rajesh Kumar".to_string(),
                    age: 35,
                    gender: Gender::Male,
                    relation: "Head".to_string(),
                    has_voter_id: true,
                    education: Some(EducationLevel::Graduate),
                    employment: Some(ResidentEmployment::Employed),
                    phone_number: None,
                    aadhaar_number: None,
                },
                Resident {
                    name: "Priya Kumar".to_string(),
                    age: 32,
                    gender: Gender::Female,
                    relation: "Wife".to_string(),
                    has_voter_id: true,
                    education: Some(EducationLevel::Graduate),
                    employment: Some(ResidentEmployment::Employed),
                    phone_number: None,
                    aadhaar_number: None,
                },
            ],
        }
    }

    /// Checks structural invariants required before persistence.
    pub fn validate(&self) -> Result<(), HouseholdValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(HouseholdValidationError::EmptyId);
        }
        if !is_valid_coordinate(self.lat, self.lng) {
            return Err(HouseholdValidationError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        Ok(())
    }

    /// Identity equality; field contents are ignored.
    pub fn same_identity(&self, other: &Household) -> bool {
        self.id == other.id
    }

    /// Whether this record still has to be reconciled.
    pub fn needs_sync(&self) -> bool {
        matches!(self.sync_status, SyncStatus::Pending | SyncStatus::Offline)
    }

    /// Truncates `survey_date` and `last_modified` to millisecond precision.
    pub fn truncate_timestamps(&mut self) {
        self.survey_date = to_millis(self.survey_date);
        self.last_modified = to_millis(self.last_modified);
    }

    /// Applies edit bookkeeping: `Pending` plus a refreshed `last_modified`.
    pub fn mark_edited(&mut self, now: DateTime<Utc>) {
        self.sync_status = SyncStatus::Pending;
        self.last_modified = to_millis(now);
    }

    /// Sync acknowledgement; leaves every other field untouched.
    pub fn mark_synced(&mut self) {
        self.sync_status = SyncStatus::Synced;
    }

    /// Returns `(declared, listed)` when `total_residents` disagrees with the
    /// resident roster. Reported only; never enforced.
    pub fn resident_count_mismatch(&self) -> Option<(u32, usize)> {
        let listed = self.residents.len();
        if usize::try_from(self.total_residents).ok() == Some(listed) {
            None
        } else {
            Some((self.total_residents, listed))
        }
    }

    /// Replaces the location with a device fix (form "use current location").
    pub fn set_location(&mut self, fix: GeoFix) {
        self.lat = fix.lat;
        self.lng = fix.lng;
    }
}
