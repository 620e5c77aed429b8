use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::entities::record::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipStatus {
    Active,
    Retired,
    UnderRepair,
}

impl ShipStatus {
    pub const ALL: [ShipStatus; 3] = [
        ShipStatus::Active,
        ShipStatus::Retired,
        ShipStatus::UnderRepair,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShipStatus::Active => "ACTIVE",
            ShipStatus::Retired => "RETIRED",
            ShipStatus::UnderRepair => "UNDER_REPAIR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShipStatus::Active => "Active",
            ShipStatus::Retired => "Retired",
            ShipStatus::UnderRepair => "Under repair",
        }
    }
}

impl fmt::Display for ShipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ShipStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShipStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    /// Anything other than "inactive" counts as active.
    pub fn normalize(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("inactive") {
            UserStatus::Inactive
        } else {
            UserStatus::Active
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub status: UserStatus,
    pub join_date: NaiveDate,
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value: FieldValue = match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.as_str().into(),
            "department" => self.department.as_str().into(),
            "status" => self.status.as_str().into(),
            "joinDate" => FieldValue::Date(self.join_date),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub id: String,
    pub name: String,
    pub ship_type: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub description: String,
    pub status: ShipStatus,
    pub created_at: DateTime<Utc>,
    pub year_built: Option<i64>,
}

impl Record for Ship {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value: FieldValue = match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "type" => self.ship_type.as_str().into(),
            "length" => self.length.into(),
            "width" => self.width.into(),
            "height" => self.height.into(),
            "description" => self.description.as_str().into(),
            "status" => self.status.as_str().into(),
            "createdAt" => FieldValue::Timestamp(self.created_at),
            "yearBuilt" => self.year_built.into(),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ship_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Part {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value: FieldValue = match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.as_str().into(),
            "shipId" => self.ship_id.as_str().into(),
            "createdAt" => self
                .created_at
                .map(FieldValue::Timestamp)
                .unwrap_or(FieldValue::Empty),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_status_parses_case_insensitively() {
        assert_eq!("under_repair".parse::<ShipStatus>(), Ok(ShipStatus::UnderRepair));
        assert_eq!("ACTIVE".parse::<ShipStatus>(), Ok(ShipStatus::Active));
        assert!("sunk".parse::<ShipStatus>().is_err());
    }

    #[test]
    fn user_status_defaults_to_active() {
        assert_eq!(UserStatus::normalize(" Inactive "), UserStatus::Inactive);
        assert_eq!(UserStatus::normalize("on leave"), UserStatus::Active);
    }

    #[test]
    fn ship_field_lookup_covers_year_built() {
        let ship = Ship {
            id: "1".to_string(),
            name: "HMS Victory".to_string(),
            ship_type: "Battleship".to_string(),
            length: 69.3,
            width: 15.8,
            height: 62.5,
            description: String::new(),
            status: ShipStatus::Active,
            created_at: Utc::now(),
            year_built: None,
        };

        assert_eq!(ship.field("yearBuilt"), Some(FieldValue::Empty));
        assert_eq!(ship.field("type"), Some(FieldValue::Text("Battleship".to_string())));
        assert_eq!(ship.field("crew"), None);
    }
}
