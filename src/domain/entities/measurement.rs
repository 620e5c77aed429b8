use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::entities::record::{FieldValue, Record};
use crate::domain::schema::{ColumnMapping, RowSchema};

/// Field key -> value for one measurement row.
pub type MeasurementValues = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub parent_id: Option<String>,
    pub values: MeasurementValues,
}

impl MeasurementRow {
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

impl Record for MeasurementRow {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "createdAt" => Some(FieldValue::Timestamp(self.created_at)),
            "parentId" => Some(self.parent_id.as_deref().into()),
            _ => self.values.get(key).map(|value| FieldValue::Number(*value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementColumn {
    pub key: String,
    pub label: String,
    pub export_header: Option<String>,
}

impl MeasurementColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            export_header: None,
        }
    }

    pub fn with_export_header(mut self, header: impl Into<String>) -> Self {
        self.export_header = Some(header.into());
        self
    }

    /// Spreadsheet header: the alternate header when configured, else the label.
    pub fn header(&self) -> &str {
        self.export_header.as_deref().unwrap_or(&self.label)
    }
}

/// The two row layouts in the fleet: part rows and ship rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Part,
    Ship,
}

impl MeasurementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementKind::Part => "part",
            MeasurementKind::Ship => "ship",
        }
    }

    pub fn field_count(self) -> usize {
        match self {
            MeasurementKind::Part => 7,
            MeasurementKind::Ship => 11,
        }
    }

    pub fn field_keys(self) -> Vec<String> {
        (1..=self.field_count()).map(|i| format!("value{i}")).collect()
    }

    pub fn columns(self) -> Vec<MeasurementColumn> {
        (1..=self.field_count())
            .map(|i| {
                MeasurementColumn::new(format!("value{i}"), format!("V{i}"))
                    .with_export_header(format!("Value {i}"))
            })
            .collect()
    }

    pub fn column_mapping(self) -> ColumnMapping {
        (1..=self.field_count()).fold(ColumnMapping::new(), |mapping, i| {
            mapping.with(
                format!("value{i}"),
                [format!("Value {i}"), format!("value{i}"), format!("V{i}")],
            )
        })
    }

    pub fn schema(self) -> RowSchema {
        RowSchema::numeric(self.field_keys())
    }

    pub fn export_filename(self) -> &'static str {
        match self {
            MeasurementKind::Part => "rowpart-data.xlsx",
            MeasurementKind::Ship => "rowship-data.xlsx",
        }
    }

    pub fn sheet_name(self) -> &'static str {
        match self {
            MeasurementKind::Part => "Part Measurements",
            MeasurementKind::Ship => "Ship Measurements",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MeasurementKind::Part => "Manage part measurement data",
            MeasurementKind::Ship => "Manage ship measurement data",
        }
    }
}

/// A value map with every key present and set to zero.
pub fn zeroed_values(columns: &[MeasurementColumn]) -> MeasurementValues {
    columns
        .iter()
        .map(|column| (column.key.clone(), 0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_rows_have_eleven_aliased_columns() {
        let columns = MeasurementKind::Ship.columns();
        assert_eq!(columns.len(), 11);
        assert_eq!(columns[10].key, "value11");
        assert_eq!(columns[10].label, "V11");
        assert_eq!(columns[10].header(), "Value 11");

        let mapping = MeasurementKind::Ship.column_mapping();
        assert_eq!(
            mapping.aliases("value3"),
            Some(&["Value 3".to_string(), "value3".to_string(), "V3".to_string()][..])
        );
    }

    #[test]
    fn header_falls_back_to_label() {
        let column = MeasurementColumn::new("value1", "V1");
        assert_eq!(column.header(), "V1");
    }

    #[test]
    fn unknown_row_field_is_none() {
        let row = MeasurementRow {
            id: "r1".to_string(),
            created_at: Utc::now(),
            parent_id: None,
            values: zeroed_values(&MeasurementKind::Part.columns()),
        };
        assert_eq!(row.field("value7"), Some(FieldValue::Number(0.0)));
        assert_eq!(row.field("value8"), None);
        assert_eq!(row.field("parentId"), Some(FieldValue::Empty));
    }
}
