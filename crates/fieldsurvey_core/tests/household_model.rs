use chrono::{TimeZone, Utc};
use fieldsurvey_core::{
    Caste, EducationLevel, GeoFix, HouseType, Household, HouseholdId, HouseholdValidationError,
    IncomeBracket, Occupation, SyncStatus,
};

fn at(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, hour, 0, 0).unwrap()
}

#[test]
fn blank_capture_starts_offline_with_fresh_id() {
    let first = Household::blank_at(GeoFix::new(28.61, 77.2), "Field Agent", at(9));
    let second = Household::blank_at(GeoFix::new(28.61, 77.2), "Field Agent", at(9));

    assert!(first.id.as_str().starts_with("house_"));
    assert_ne!(first.id, second.id);
    assert_eq!(first.sync_status, SyncStatus::Offline);
    assert_eq!(first.caste, Caste::General);
    assert_eq!(first.house_type, HouseType::Owned);
    assert_eq!(first.survey_date, at(9));
    assert_eq!(first.last_modified, at(9));
    assert!(first.residents.is_empty());
    assert!(first.needs_sync());
}

#[test]
fn sample_is_synced_and_valid() {
    let sample = Household::sample(at(9));
    assert_eq!(sample.id.as_str(), "sample_1");
    assert_eq!(sample.sync_status, SyncStatus::Synced);
    assert_eq!(sample.residents.len(), 2);
    assert!(!sample.needs_sync());
    sample.validate().unwrap();
}

#[test]
fn serialization_uses_persisted_wire_names() {
    let sample = Household::sample(at(9));
    let json = serde_json::to_value(&sample).unwrap();

    assert_eq!(json["id"], "sample_1");
    assert_eq!(json["houseNumber"], "A-101");
    assert_eq!(json["childrenUnder5"], 1);
    assert_eq!(json["occupation"], "govt-employee");
    assert_eq!(json["monthlyIncome"], "50000-75000");
    assert_eq!(json["highestEducation"], "Graduate");
    assert_eq!(json["syncStatus"], "synced");
    assert_eq!(json["residents"][0]["hasVoterId"], true);
    assert!(json["residents"][0].get("phoneNumber").is_none());
}

#[test]
fn deserializes_unset_categories_as_none() {
    let blank = Household::blank_at(GeoFix::new(12.97, 77.59), "Agent", at(10));
    let mut json = serde_json::to_value(&blank).unwrap();
    json.as_object_mut().unwrap().remove("welfareSchemes");
    json["highestEducation"] = serde_json::Value::Null;

    let parsed: Household = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.occupation, None);
    assert_eq!(parsed.highest_education, None);
    assert!(parsed.welfare_schemes.is_empty());
}

#[test]
fn enum_wire_values_match_form_options() {
    assert_eq!(Caste::Obc.as_str(), "OBC");
    assert_eq!(Occupation::SelfEmployed.as_str(), "self-employed");
    assert_eq!(IncomeBracket::Above75k.as_str(), "75000+");
    assert_eq!(EducationLevel::HigherSecondary.as_str(), "Higher Secondary");
    assert_eq!(EducationLevel::NoFormal.as_str(), "None");

    let parsed: IncomeBracket = serde_json::from_str("\"0-15000\"").unwrap();
    assert_eq!(parsed, IncomeBracket::UpTo15k);
    assert!(serde_json::from_str::<SyncStatus>("\"unknown\"").is_err());
}

#[test]
fn validate_rejects_empty_id_and_bad_coordinates() {
    let mut household = Household::sample(at(9));
    household.id = HouseholdId::new("  ");
    assert_eq!(household.validate(), Err(HouseholdValidationError::EmptyId));

    let mut household = Household::sample(at(9));
    household.lat = 123.0;
    assert!(matches!(
        household.validate(),
        Err(HouseholdValidationError::InvalidCoordinate { .. })
    ));
}

#[test]
fn resident_count_mismatch_is_reported_not_enforced() {
    let sample = Household::sample(at(9));
    assert_eq!(sample.resident_count_mismatch(), Some((4, 2)));
    sample.validate().unwrap();

    let mut matching = sample.clone();
    matching.total_residents = 2;
    assert_eq!(matching.resident_count_mismatch(), None);
}

#[test]
fn edit_and_sync_helpers_follow_status_lifecycle() {
    let mut household = Household::blank_at(GeoFix::new(28.0, 77.0), "Agent", at(9));
    household.mark_edited(at(11));
    assert_eq!(household.sync_status, SyncStatus::Pending);
    assert_eq!(household.last_modified, at(11));

    household.mark_synced();
    assert_eq!(household.sync_status, SyncStatus::Synced);
    assert_eq!(household.last_modified, at(11));

    let copy = household.clone();
    household.address = "changed".to_string();
    assert!(household.same_identity(&copy));
}
