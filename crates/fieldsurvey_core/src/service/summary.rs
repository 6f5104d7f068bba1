//! Dashboard summary statistics.

use crate::model::household::Household;
use serde::Serialize;

/// Aggregate figures shown on the dashboard summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub total_households: usize,
    pub total_population: u64,
    /// Literate adults over declared residents, percent.
    pub literacy_rate: u32,
    /// Unemployed over (employed + unemployed), percent.
    pub unemployment_rate: u32,
    pub missing_voter_ids: usize,
    pub pending_sync: usize,
    /// Households with a house number filled in, percent.
    pub survey_progress: u32,
}

impl SurveySummary {
    pub fn from_households(households: &[Household]) -> Self {
        let total_population: u64 = households
            .iter()
            .map(|household| u64::from(household.total_residents))
            .sum();
        let literate: u64 = households
            .iter()
            .map(|household| u64::from(household.literate_adults))
            .sum();
        let unemployed: u64 = households
            .iter()
            .map(|household| u64::from(household.unemployed))
            .sum();
        let workforce: u64 = households
            .iter()
            .map(|household| u64::from(household.employed) + u64::from(household.unemployed))
            .sum();
        let with_house_number = households
            .iter()
            .filter(|household| !household.house_number.trim().is_empty())
            .count();

        Self {
            total_households: households.len(),
            total_population,
            literacy_rate: percent(literate, total_population),
            unemployment_rate: percent(unemployed, workforce),
            missing_voter_ids: households
                .iter()
                .filter(|household| !household.voter_id_available)
                .count(),
            pending_sync: households
                .iter()
                .filter(|household| household.needs_sync())
                .count(),
            survey_progress: percent(with_house_number as u64, households.len() as u64),
        }
    }
}

/// Rounded integer percentage; zero denominators yield 0.
fn percent(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let rounded = (numerator as f64 / denominator as f64 * 100.0).round();
    rounded.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::{percent, SurveySummary};
    use crate::model::household::{Household, HouseholdId, SyncStatus};
    use crate::model::location::GeoFix;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_collection_has_zero_rates() {
        let summary = SurveySummary::from_households(&[]);
        assert_eq!(summary.total_households, 0);
        assert_eq!(summary.literacy_rate, 0);
        assert_eq!(summary.unemployment_rate, 0);
        assert_eq!(summary.survey_progress, 0);
    }

    #[test]
    fn aggregates_sample_and_blank_capture() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let sample = Household::sample(now);
        let mut blank = Household::blank_at(GeoFix::new(28.7, 77.1), "Agent", now);
        blank.id = HouseholdId::new("house_2");
        blank.unemployed = 2;

        let summary = SurveySummary::from_households(&[sample, blank]);
        assert_eq!(summary.total_households, 2);
        assert_eq!(summary.total_population, 4);
        assert_eq!(summary.literacy_rate, 50);
        assert_eq!(summary.unemployment_rate, 50);
        assert_eq!(summary.missing_voter_ids, 1);
        assert_eq!(summary.pending_sync, 1);
        assert_eq!(summary.survey_progress, 50);
        assert_eq!(SyncStatus::Offline.as_str(), "offline");
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 0), 0);
    }
}
