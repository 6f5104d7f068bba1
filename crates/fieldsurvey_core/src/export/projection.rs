//! Scope filtering, row projection and CSV output.

use crate::export::fields::ExportField;
use crate::model::household::{Household, HouseholdId};
use crate::model::location::MapBounds;
use chrono::{DateTime, Utc};
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Which households an export covers.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportScope {
    All,
    /// Households inside the current map viewport (inclusive).
    Visible(MapBounds),
    /// Households explicitly picked by the agent.
    Selected(HashSet<HouseholdId>),
}

impl ExportScope {
    /// Visible scope; falls back to `All` before the map reports bounds.
    pub fn visible(bounds: Option<MapBounds>) -> Self {
        bounds.map_or(Self::All, Self::Visible)
    }

    fn includes(&self, household: &Household) -> bool {
        match self {
            Self::All => true,
            Self::Visible(bounds) => bounds.contains(household.lat, household.lng),
            Self::Selected(ids) => ids.contains(&household.id),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    NoFields,
    Csv(csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFields => write!(f, "select at least one field to export"),
            Self::Csv(err) => write!(f, "failed to write export: {err}"),
            Self::Io(err) => write!(f, "failed to write export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoFields => None,
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Households in `scope`, collection order preserved.
pub fn filter_scope<'a>(households: &'a [Household], scope: &ExportScope) -> Vec<&'a Household> {
    households
        .iter()
        .filter(|household| scope.includes(household))
        .collect()
}

/// One row of rendered cells per household, columns in `fields` order.
pub fn project(households: &[&Household], fields: &[ExportField]) -> Vec<Vec<String>> {
    households
        .iter()
        .map(|household| fields.iter().map(|field| field.render(household)).collect())
        .collect()
}

/// Writes a labelled CSV export; returns the number of data rows.
pub fn write_csv<W: Write>(
    writer: W,
    households: &[&Household],
    fields: &[ExportField],
) -> Result<usize, ExportError> {
    if fields.is_empty() {
        return Err(ExportError::NoFields);
    }

    let result = (|| -> Result<usize, ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(fields.iter().map(|field| field.label()))?;
        let rows = project(households, fields);
        for row in &rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(rows.len())
    })();

    match &result {
        Ok(rows) => info!(
            "event=export module=export status=ok format=csv rows={} fields={}",
            rows,
            fields.len()
        ),
        Err(err) => error!("event=export module=export status=error format=csv error={err}"),
    }
    result
}

/// Default file name stem, e.g. `population_data_2026-10-18`.
pub fn export_file_stem(now: DateTime<Utc>) -> String {
    format!("population_data_{}", now.format("%Y-%m-%d"))
}
