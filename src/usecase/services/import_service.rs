use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::entities::fleet::UserStatus;
use crate::domain::entities::measurement::MeasurementValues;
use crate::domain::format::parse_float_lenient;
use crate::domain::forms::{normalize_department, normalize_role, UserForm};
use crate::domain::schema::{describe_issues, Candidate, ColumnMapping, FieldIssue, RowSchema};
use crate::infra::import::{read_first_sheet, RawRow, RawSheet};

/// How many row errors an aggregated failure message spells out.
pub const MAX_REPORTED_ERRORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub row_number: usize,
    pub reason: String,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.reason)
    }
}

/// Rows that passed validation plus the ones that were left out, with why.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport<T> {
    pub rows: Vec<T>,
    pub skipped: Vec<RowIssue>,
}

impl<T> ImportReport<T> {
    pub fn summary(&self) -> String {
        let imported = self.rows.len();
        let plural = if imported == 1 { "" } else { "s" };
        if self.skipped.is_empty() {
            format!("Imported {imported} row{plural}")
        } else {
            format!(
                "Imported {imported} row{plural}, skipped {} invalid: {}",
                self.skipped.len(),
                summarize_issues(&self.skipped)
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("No worksheet found in the spreadsheet")]
    NoWorksheet,
    #[error("The spreadsheet appears to be empty")]
    EmptySheet,
    #[error("Validation failed:\n{}", summarize_issues(.0))]
    AllRowsInvalid(Vec<RowIssue>),
    #[error("Failed to read spreadsheet: {0}")]
    Read(String),
}

/// First few issues one per line, the remainder counted.
pub fn summarize_issues(issues: &[RowIssue]) -> String {
    let mut text = issues
        .iter()
        .take(MAX_REPORTED_ERRORS)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    if issues.len() > MAX_REPORTED_ERRORS {
        text.push_str(&format!(
            "\n...and {} more errors",
            issues.len() - MAX_REPORTED_ERRORS
        ));
    }
    text
}

/// Numeric candidate for one sheet row: per field, the first alias with a
/// populated cell, coerced to a float.
pub fn numeric_candidate(row: &RawRow, mapping: &ColumnMapping) -> Candidate {
    mapping
        .entries()
        .filter_map(|(key, _)| {
            let text = mapping.resolve(key, &row.cells)?;
            Some((key.to_string(), parse_float_lenient(text)))
        })
        .collect()
}

pub fn user_column_mapping() -> ColumnMapping {
    ColumnMapping::new()
        .with("name", ["Name", "name", "Full Name"])
        .with("email", ["Email", "email", "Email Address"])
        .with("role", ["Role", "role"])
        .with("department", ["Department", "department"])
        .with("status", ["Status", "status"])
        .with("joinDate", ["Join Date", "joinDate", "Start Date"])
}

fn parse_join_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(trimmed.get(..10)?, "%Y-%m-%d").ok())
}

pub fn user_from_row(row: &RawRow, mapping: &ColumnMapping) -> Result<UserForm, Vec<FieldIssue>> {
    let text = |key: &str| mapping.resolve(key, &row.cells).unwrap_or_default();
    let form = UserForm {
        name: text("name").trim().to_string(),
        email: text("email").trim().to_string(),
        role: normalize_role(text("role")),
        department: normalize_department(text("department")),
        status: UserStatus::normalize(text("status")),
        join_date: parse_join_date(text("joinDate")).unwrap_or_else(|| Utc::now().date_naive()),
    };
    form.validate()?;
    Ok(form)
}

#[derive(Debug, Clone)]
pub struct ImportService {
    preview_limit: usize,
}

impl Default for ImportService {
    fn default() -> Self {
        Self { preview_limit: 5 }
    }
}

impl ImportService {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    pub fn read_sheet(&self, path: &Path) -> Result<RawSheet, ImportError> {
        match read_first_sheet(path) {
            Ok(Some(sheet)) => Ok(sheet),
            Ok(None) => Err(ImportError::NoWorksheet),
            Err(err) => Err(ImportError::Read(format!("{err:#}"))),
        }
    }

    /// Leading data rows shown before an import is committed.
    pub fn preview<'a>(&self, sheet: &'a RawSheet) -> &'a [RawRow] {
        &sheet.rows[..sheet.rows.len().min(self.preview_limit)]
    }

    /// Builds every row with `build`. Fails when the sheet has no data rows
    /// or when no row builds; otherwise failed rows are reported as skipped.
    pub fn map_sheet<T, F>(
        &self,
        sheet: &RawSheet,
        build: F,
    ) -> Result<ImportReport<T>, ImportError>
    where
        F: Fn(&RawRow) -> Result<T, Vec<FieldIssue>>,
    {
        if sheet.rows.is_empty() {
            return Err(ImportError::EmptySheet);
        }

        let mut report = ImportReport {
            rows: Vec::new(),
            skipped: Vec::new(),
        };
        for row in &sheet.rows {
            match build(row) {
                Ok(value) => report.rows.push(value),
                Err(issues) => report.skipped.push(RowIssue {
                    row_number: row.number,
                    reason: describe_issues(&issues),
                }),
            }
        }

        if report.rows.is_empty() {
            warn!(
                sheet = %sheet.name,
                errors = report.skipped.len(),
                "every row failed validation"
            );
            return Err(ImportError::AllRowsInvalid(report.skipped));
        }
        Ok(report)
    }

    pub fn map_measurements(
        &self,
        sheet: &RawSheet,
        schema: &RowSchema,
        mapping: &ColumnMapping,
    ) -> Result<ImportReport<MeasurementValues>, ImportError> {
        self.map_sheet(sheet, |row| schema.validate(&numeric_candidate(row, mapping)))
    }

    pub fn import_measurements(
        &self,
        path: &Path,
        schema: &RowSchema,
        mapping: &ColumnMapping,
    ) -> Result<ImportReport<MeasurementValues>, ImportError> {
        let sheet = self.read_sheet(path)?;
        let report = self.map_measurements(&sheet, schema, mapping)?;
        info!(
            path = %path.display(),
            imported = report.rows.len(),
            skipped = report.skipped.len(),
            "measurement import mapped"
        );
        Ok(report)
    }

    pub fn map_users(&self, sheet: &RawSheet) -> Result<ImportReport<UserForm>, ImportError> {
        let mapping = user_column_mapping();
        self.map_sheet(sheet, |row| user_from_row(row, &mapping))
    }

    pub fn import_users(&self, path: &Path) -> Result<ImportReport<UserForm>, ImportError> {
        let sheet = self.read_sheet(path)?;
        let report = self.map_users(&sheet)?;
        info!(
            path = %path.display(),
            imported = report.rows.len(),
            skipped = report.skipped.len(),
            "user import mapped"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::measurement::MeasurementKind;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn maps_value_alias_to_schema_key() {
        let sheet = RawSheet::from_grid("Sheet1", grid(&[&["Value 1"], &["12.5"]]));
        let schema = RowSchema::numeric(["value1"]);
        let mapping = ColumnMapping::new().with("value1", ["Value 1", "value1", "V1"]);

        let report = ImportService::default()
            .map_measurements(&sheet, &schema, &mapping)
            .expect("import should pass");

        assert_eq!(
            report.rows,
            vec![MeasurementValues::from([("value1".to_string(), 12.5)])]
        );
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn unparseable_cell_becomes_zero() {
        let sheet = RawSheet::from_grid("Sheet1", grid(&[&["V1"], &["n/a"]]));
        let schema = RowSchema::numeric(["value1"]);
        let mapping = MeasurementKind::Part.column_mapping();

        let report = ImportService::default()
            .map_measurements(&sheet, &schema, &mapping)
            .expect("import should pass");

        assert_eq!(report.rows[0].get("value1"), Some(&0.0));
    }

    #[test]
    fn all_rows_failing_aggregates_first_three() {
        let rows: Vec<&[&str]> = vec![&["Value 2"], &["1"], &["2"], &["3"], &["4"], &["5"]];
        let sheet = RawSheet::from_grid("Sheet1", grid(&rows));
        let schema = RowSchema::numeric(["value1"]);
        let mapping = MeasurementKind::Part.column_mapping();

        let err = ImportService::default()
            .map_measurements(&sheet, &schema, &mapping)
            .expect_err("every row lacks value1");

        assert_eq!(
            err.to_string(),
            "Validation failed:\nRow 2: value1: Required\nRow 3: value1: Required\nRow 4: value1: Required\n...and 2 more errors"
        );
    }

    #[test]
    fn partial_failure_reports_skipped_rows() {
        let sheet = RawSheet::from_grid(
            "Sheet1",
            grid(&[&["Value 1", "Value 2"], &["1", "2"], &["3", ""], &["", ""], &["5", "6"]]),
        );
        let schema = RowSchema::numeric(["value1", "value2"]);
        let mapping = MeasurementKind::Part.column_mapping();

        let report = ImportService::default()
            .map_measurements(&sheet, &schema, &mapping)
            .expect("two rows are valid");

        assert_eq!(report.rows.len(), 2);
        assert_eq!(
            report.skipped,
            vec![RowIssue {
                row_number: 3,
                reason: "value2: Required".to_string(),
            }]
        );
        assert_eq!(
            report.summary(),
            "Imported 2 rows, skipped 1 invalid: Row 3: value2: Required"
        );
    }

    #[test]
    fn header_only_sheet_is_empty() {
        let sheet = RawSheet::from_grid("Sheet1", grid(&[&["Value 1"], &["", ""]]));
        let err = ImportService::default()
            .map_measurements(&sheet, &RowSchema::numeric(["value1"]), &ColumnMapping::new())
            .expect_err("no data rows");
        assert_eq!(err, ImportError::EmptySheet);
    }

    #[test]
    fn users_are_normalized_and_defaulted() {
        let sheet = RawSheet::from_grid(
            "Users",
            grid(&[
                &["Full Name", "Email Address", "Role", "Department", "Status", "Start Date"],
                &["Dana Lee", "dana@example.com", "Intern", "HR", "INACTIVE", "2024-05-01"],
                &["No Email", "", "admin", "sales", "", ""],
            ]),
        );

        let report = ImportService::default().map_users(&sheet).expect("one user is valid");

        assert_eq!(report.rows.len(), 1);
        let user = &report.rows[0];
        assert_eq!(user.name, "Dana Lee");
        assert_eq!(user.role, "employee");
        assert_eq!(user.department, "hr");
        assert_eq!(user.status, UserStatus::Inactive);
        assert_eq!(user.join_date, NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"));
        assert_eq!(report.skipped[0].row_number, 3);
    }

    #[test]
    fn preview_is_limited() {
        let mut rows = vec![vec!["name".to_string()]];
        rows.extend((0..8).map(|i| vec![format!("user {i}")]));
        let sheet = RawSheet::from_grid("Users", rows);

        assert_eq!(ImportService::default().preview(&sheet).len(), 5);
        assert_eq!(ImportService::new(20).preview(&sheet).len(), 8);
    }
}
