use std::collections::BTreeMap;

use crate::domain::entities::measurement::MeasurementValues;

/// Numeric values produced by spreadsheet mapping, before validation.
pub type Candidate = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The expected shape of one imported row: every key required, every value
/// a finite number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSchema {
    keys: Vec<String>,
}

impl RowSchema {
    pub fn numeric<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks every key and returns the candidate restricted to schema keys.
    pub fn validate(&self, candidate: &Candidate) -> Result<MeasurementValues, Vec<FieldIssue>> {
        let mut issues = Vec::new();
        let mut accepted = MeasurementValues::new();

        for key in &self.keys {
            match candidate.get(key) {
                Some(number) if number.is_finite() => {
                    accepted.insert(key.clone(), *number);
                }
                Some(_) => issues.push(FieldIssue::new(key, "Expected a finite number")),
                None => issues.push(FieldIssue::new(key, "Required")),
            }
        }

        if issues.is_empty() {
            Ok(accepted)
        } else {
            Err(issues)
        }
    }
}

/// Internal field key -> acceptable spreadsheet headers, first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K, I, S>(mut self, key: K, aliases: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push((key.into(), aliases.into_iter().map(Into::into).collect()));
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, aliases)| (key.as_str(), aliases.as_slice()))
    }

    pub fn aliases(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, aliases)| aliases.as_slice())
    }

    /// The first alias of `key` present among `cells`, with its text.
    pub fn resolve<'a>(&self, key: &str, cells: &'a BTreeMap<String, String>) -> Option<&'a str> {
        self.aliases(key)?
            .iter()
            .find_map(|alias| cells.get(alias).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_schema_reports_every_missing_field() {
        let schema = RowSchema::numeric(["value1", "value2", "value3"]);
        let candidate = Candidate::from([("value2".to_string(), 1.0)]);

        let issues = schema.validate(&candidate).expect_err("should fail");

        assert_eq!(
            issues,
            vec![
                FieldIssue::new("value1", "Required"),
                FieldIssue::new("value3", "Required"),
            ]
        );
    }

    #[test]
    fn numeric_schema_strips_unknown_keys() {
        let schema = RowSchema::numeric(["value1"]);
        let candidate = Candidate::from([
            ("value1".to_string(), 12.5),
            ("extra".to_string(), 3.0),
        ]);

        let values = schema.validate(&candidate).expect("should pass");

        assert_eq!(values, MeasurementValues::from([("value1".to_string(), 12.5)]));
    }

    #[test]
    fn numeric_schema_rejects_non_finite_values() {
        let schema = RowSchema::numeric(["value1", "value2"]);
        let candidate = Candidate::from([
            ("value1".to_string(), f64::INFINITY),
            ("value2".to_string(), f64::NAN),
        ]);

        let issues = schema.validate(&candidate).expect_err("should fail");
        assert_eq!(
            issues,
            vec![
                FieldIssue::new("value1", "Expected a finite number"),
                FieldIssue::new("value2", "Expected a finite number"),
            ]
        );
    }

    #[test]
    fn resolve_uses_first_present_alias() {
        let mapping = ColumnMapping::new().with("value1", ["Value 1", "value1", "V1"]);
        let cells = BTreeMap::from([
            ("V1".to_string(), "3".to_string()),
            ("value1".to_string(), "2".to_string()),
        ]);

        assert_eq!(mapping.resolve("value1", &cells), Some("2"));
        assert_eq!(mapping.resolve("value2", &cells), None);
    }
}
