//! Flat field projection of households for spreadsheet export.
//!
//! # Responsibility
//! - Catalog exportable fields with labels and categories.
//! - Filter by export scope and project households into string rows.
//! - Write CSV; richer document formats are produced by external tools.

mod fields;
mod projection;

pub use fields::{ExportField, FieldCategory, DEFAULT_EXPORT_FIELDS};
pub use projection::{export_file_stem, filter_scope, project, write_csv, ExportError, ExportScope};
