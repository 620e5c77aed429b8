use std::cmp::Ordering;

use crate::domain::entities::record::FieldValue;
use crate::domain::format::format_f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// At most one sorted column. `toggle` walks none -> asc -> desc -> none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    pub fn active(&self) -> Option<&SortSpec> {
        self.active.as_ref()
    }

    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        self.active
            .as_ref()
            .filter(|spec| spec.key == key)
            .map(|spec| spec.direction)
    }

    pub fn toggle(&mut self, key: &str) {
        self.active = match self.active.take() {
            Some(SortSpec {
                key: current,
                direction: SortDirection::Asc,
            }) if current == key => Some(SortSpec {
                key: current,
                direction: SortDirection::Desc,
            }),
            Some(SortSpec {
                key: current,
                direction: SortDirection::Desc,
            }) if current == key => None,
            _ => Some(SortSpec {
                key: key.to_string(),
                direction: SortDirection::Asc,
            }),
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Visual tone of a badge cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Neutral,
    Positive,
    Warning,
    Negative,
    Accent,
}

/// What a column renders for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Badge { label: String, tone: BadgeTone },
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn badge(label: impl Into<String>, tone: BadgeTone) -> Self {
        CellValue::Badge {
            label: label.into(),
            tone,
        }
    }

    /// Text for primitive cells; rich cells (badges) return `None`.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            CellValue::Text(value) => Some(value.clone()),
            CellValue::Number(value) => Some(format_f64(*value)),
            CellValue::Empty => Some(String::new()),
            CellValue::Badge { .. } => None,
        }
    }

    /// Text shown on screen, including badge labels.
    pub fn display(&self) -> String {
        match self {
            CellValue::Badge { label, .. } => label.clone(),
            other => other.primitive_text().unwrap_or_default(),
        }
    }
}

impl From<FieldValue> for CellValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Number(number) => CellValue::Number(number),
            FieldValue::Empty => CellValue::Empty,
            other => CellValue::Text(other.to_string()),
        }
    }
}
