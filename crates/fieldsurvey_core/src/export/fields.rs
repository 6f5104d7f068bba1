//! Exportable field catalog.

use crate::model::household::Household;

/// Grouping used by the export field picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    Basic,
    Employment,
    Education,
    Health,
    Electoral,
    Meta,
    Location,
}

impl FieldCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic Information",
            Self::Employment => "Employment & Income",
            Self::Education => "Education",
            Self::Health => "Health & Sanitation",
            Self::Electoral => "Electoral Information",
            Self::Meta => "Survey Metadata",
            Self::Location => "Location Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportField {
    HouseNumber,
    Address,
    HeadOfHousehold,
    TotalResidents,
    Caste,
    Religion,
    Language,
    HouseType,
    Employed,
    Unemployed,
    Occupation,
    MonthlyIncome,
    WelfareSchemes,
    TotalChildren,
    ChildrenUnder5,
    ChildrenInSchool,
    LiterateAdults,
    HighestEducation,
    Dropouts,
    HasToilet,
    HasCleanWater,
    HasChronicIllness,
    VoterIdAvailable,
    AadhaarAvailable,
    EligibleVotersListed,
    PollingBooth,
    VoterListIssues,
    SurveyedBy,
    SurveyDate,
    Lat,
    Lng,
}

/// Fields preselected in the export dialog.
pub const DEFAULT_EXPORT_FIELDS: &[ExportField] = &[
    ExportField::HouseNumber,
    ExportField::Address,
    ExportField::HeadOfHousehold,
    ExportField::TotalResidents,
    ExportField::Caste,
    ExportField::Religion,
];

impl ExportField {
    pub const ALL: &'static [ExportField] = &[
        Self::HouseNumber,
        Self::Address,
        Self::HeadOfHousehold,
        Self::TotalResidents,
        Self::Caste,
        Self::Religion,
        Self::Language,
        Self::HouseType,
        Self::Employed,
        Self::Unemployed,
        Self::Occupation,
        Self::MonthlyIncome,
        Self::WelfareSchemes,
        Self::TotalChildren,
        Self::ChildrenUnder5,
        Self::ChildrenInSchool,
        Self::LiterateAdults,
        Self::HighestEducation,
        Self::Dropouts,
        Self::HasToilet,
        Self::HasCleanWater,
        Self::HasChronicIllness,
        Self::VoterIdAvailable,
        Self::AadhaarAvailable,
        Self::EligibleVotersListed,
        Self::PollingBooth,
        Self::VoterListIssues,
        Self::SurveyedBy,
        Self::SurveyDate,
        Self::Lat,
        Self::Lng,
    ];

    /// Wire id, identical to the persisted household key.
    pub fn id(self) -> &'static str {
        match self {
            Self::HouseNumber => "houseNumber",
            Self::Address => "address",
            Self::HeadOfHousehold => "headOfHousehold",
            Self::TotalResidents => "totalResidents",
            Self::Caste => "caste",
            Self::Religion => "religion",
            Self::Language => "language",
            Self::HouseType => "houseType",
            Self::Employed => "employed",
            Self::Unemployed => "unemployed",
            Self::Occupation => "occupation",
            Self::MonthlyIncome => "monthlyIncome",
            Self::WelfareSchemes => "welfareSchemes",
            Self::TotalChildren => "totalChildren",
            Self::ChildrenUnder5 => "childrenUnder5",
            Self::ChildrenInSchool => "childrenInSchool",
            Self::LiterateAdults => "literateAdults",
            Self::HighestEducation => "highestEducation",
            Self::Dropouts => "dropouts",
            Self::HasToilet => "hasToilet",
            Self::HasCleanWater => "hasCleanWater",
            Self::HasChronicIllness => "hasChronicIllness",
            Self::VoterIdAvailable => "voterIdAvailable",
            Self::AadhaarAvailable => "aadhaarAvailable",
            Self::EligibleVotersListed => "eligibleVotersListed",
            Self::PollingBooth => "pollingBooth",
            Self::VoterListIssues => "voterListIssues",
            Self::SurveyedBy => "surveyedBy",
            Self::SurveyDate => "surveyDate",
            Self::Lat => "lat",
            Self::Lng => "lng",
        }
    }

    /// Column header.
    pub fn label(self) -> &'static str {
        match self {
            Self::HouseNumber => "House Number",
            Self::Address => "Address",
            Self::HeadOfHousehold => "Head of Household",
            Self::TotalResidents => "Total Residents",
            Self::Caste => "Caste Category",
            Self::Religion => "Religion",
            Self::Language => "Language",
            Self::HouseType => "House Type",
            Self::Employed => "Employed Persons",
            Self::Unemployed => "Unemployed Persons",
            Self::Occupation => "Primary Occupation",
            Self::MonthlyIncome => "Monthly Income",
            Self::WelfareSchemes => "Welfare Schemes",
            Self::TotalChildren => "Total Children",
            Self::ChildrenUnder5 => "Children Under 5",
            Self::ChildrenInSchool => "Children in School",
            Self::LiterateAdults => "Literate Adults",
            Self::HighestEducation => "Highest Education",
            Self::Dropouts => "School Dropouts",
            Self::HasToilet => "Has Toilet",
            Self::HasCleanWater => "Has Clean Water",
            Self::HasChronicIllness => "Chronic Illness",
            Self::VoterIdAvailable => "Voter ID Available",
            Self::AadhaarAvailable => "Aadhaar Available",
            Self::EligibleVotersListed => "Eligible Voters Listed",
            Self::PollingBooth => "Polling Booth",
            Self::VoterListIssues => "Voter List Issues",
            Self::SurveyedBy => "Surveyed By",
            Self::SurveyDate => "Survey Date",
            Self::Lat => "Latitude",
            Self::Lng => "Longitude",
        }
    }

    pub fn category(self) -> FieldCategory {
        match self {
            Self::HouseNumber
            | Self::Address
            | Self::HeadOfHousehold
            | Self::TotalResidents
            | Self::Caste
            | Self::Religion
            | Self::Language
            | Self::HouseType => FieldCategory::Basic,
            Self::Employed
            | Self::Unemployed
            | Self::Occupation
            | Self::MonthlyIncome
            | Self::WelfareSchemes => FieldCategory::Employment,
            Self::TotalChildren
            | Self::ChildrenUnder5
            | Self::ChildrenInSchool
            | Self::LiterateAdults
            | Self::HighestEducation
            | Self::Dropouts => FieldCategory::Education,
            Self::HasToilet | Self::HasCleanWater | Self::HasChronicIllness => {
                FieldCategory::Health
            }
            Self::VoterIdAvailable
            | Self::AadhaarAvailable
            | Self::EligibleVotersListed
            | Self::PollingBooth
            | Self::VoterListIssues => FieldCategory::Electoral,
            Self::SurveyedBy | Self::SurveyDate => FieldCategory::Meta,
            Self::Lat | Self::Lng => FieldCategory::Location,
        }
    }

    /// Looks a field up by its wire id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.id() == id.trim())
    }

    /// Fields in `category`, catalog order.
    pub fn in_category(category: FieldCategory) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|field| field.category() == category)
            .collect()
    }

    /// Renders this field of `household` as a cell value.
    pub fn render(self, household: &Household) -> String {
        fn yes_no(value: bool) -> String {
            (if value { "Yes" } else { "No" }).to_string()
        }
        fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
            value.map(|inner| inner.to_string()).unwrap_or_default()
        }

        match self {
            Self::HouseNumber => household.house_number.clone(),
            Self::Address => household.address.clone(),
            Self::HeadOfHousehold => household.head_of_household.clone(),
            Self::TotalResidents => household.total_residents.to_string(),
            Self::Caste => household.caste.to_string(),
            Self::Religion => household.religion.clone(),
            Self::Language => household.language.clone(),
            Self::HouseType => household.house_type.to_string(),
            Self::Employed => household.employed.to_string(),
            Self::Unemployed => household.unemployed.to_string(),
            Self::Occupation => opt(household.occupation),
            Self::MonthlyIncome => opt(household.monthly_income),
            Self::WelfareSchemes => household.welfare_schemes.join(", "),
            Self::TotalChildren => household.total_children.to_string(),
            Self::ChildrenUnder5 => household.children_under5.to_string(),
            Self::ChildrenInSchool => household.children_in_school.to_string(),
            Self::LiterateAdults => household.literate_adults.to_string(),
            Self::HighestEducation => opt(household.highest_education),
            Self::Dropouts => household.dropouts.to_string(),
            Self::HasToilet => yes_no(household.has_toilet),
            Self::HasCleanWater => yes_no(household.has_clean_water),
            Self::HasChronicIllness => yes_no(household.has_chronic_illness),
            Self::VoterIdAvailable => yes_no(household.voter_id_available),
            Self::AadhaarAvailable => yes_no(household.aadhaar_available),
            Self::EligibleVotersListed => yes_no(household.eligible_voters_listed),
            Self::PollingBooth => household.polling_booth.clone(),
            Self::VoterListIssues => household.voter_list_issues.clone(),
            Self::SurveyedBy => household.surveyed_by.clone(),
            Self::SurveyDate => household.survey_date.format("%Y-%m-%d").to_string(),
            Self::Lat => household.lat.to_string(),
            Self::Lng => household.lng.to_string(),
        }
    }
}
