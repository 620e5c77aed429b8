use chrono::{Datelike, NaiveDate, Utc};

use crate::domain::entities::fleet::{Part, Ship, ShipStatus, User, UserStatus};
use crate::domain::schema::FieldIssue;

pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const EARLIEST_YEAR_BUILT: i64 = 1800;

pub const USER_ROLES: [&str; 4] = ["admin", "manager", "employee", "contractor"];
pub const USER_DEPARTMENTS: [&str; 5] = ["engineering", "marketing", "sales", "hr", "finance"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

fn require_text(issues: &mut Vec<FieldIssue>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, message));
    }
}

fn limit_description(issues: &mut Vec<FieldIssue>, value: &str) {
    if value.chars().count() > DESCRIPTION_MAX_CHARS {
        issues.push(FieldIssue::new(
            "description",
            format!("Description must be less than {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }
}

fn finish(issues: Vec<FieldIssue>) -> Result<(), Vec<FieldIssue>> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipForm {
    pub name: String,
    pub ship_type: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub description: String,
    pub status: Option<ShipStatus>,
    pub year_built: Option<i64>,
    /// Year input that did not parse as a whole number.
    pub year_built_unparsed: Option<String>,
}

impl ShipForm {
    pub fn from_ship(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            ship_type: ship.ship_type.clone(),
            length: ship.length,
            width: ship.width,
            height: ship.height,
            description: ship.description.clone(),
            status: Some(ship.status),
            year_built: ship.year_built,
            year_built_unparsed: None,
        }
    }

    /// Applies the raw year input; blank clears the year.
    pub fn set_year_built_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.year_built = None;
            self.year_built_unparsed = None;
            return;
        }
        match trimmed.parse::<i64>() {
            Ok(year) => {
                self.year_built = Some(year);
                self.year_built_unparsed = None;
            }
            Err(_) => {
                self.year_built = None;
                self.year_built_unparsed = Some(trimmed.to_string());
            }
        }
    }

    pub fn year_built_text(&self) -> String {
        match (&self.year_built_unparsed, self.year_built) {
            (Some(text), _) => text.clone(),
            (None, Some(year)) => year.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn validate(&self, mode: FormMode) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        require_text(&mut issues, "name", &self.name, "Ship name is required");
        require_text(&mut issues, "type", &self.ship_type, "Ship type is required");
        for (field, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                issues.push(FieldIssue::new(field, format!("{field} must be greater than 0")));
            }
        }
        limit_description(&mut issues, &self.description);
        if mode == FormMode::Edit && self.status.is_none() {
            issues.push(FieldIssue::new("status", "Status is required"));
        }
        if self.year_built_unparsed.is_some() {
            issues.push(FieldIssue::new("yearBuilt", "Year must be a whole number"));
        } else if let Some(year) = self.year_built {
            let current_year = i64::from(Utc::now().year());
            if year < EARLIEST_YEAR_BUILT {
                issues.push(FieldIssue::new("yearBuilt", "Year must be after 1800"));
            } else if year > current_year {
                issues.push(FieldIssue::new("yearBuilt", "Year cannot be in the future"));
            }
        }
        finish(issues)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartForm {
    pub name: String,
    pub description: String,
    pub ship_id: String,
}

impl PartForm {
    pub fn from_part(part: &Part) -> Self {
        Self {
            name: part.name.clone(),
            description: part.description.clone(),
            ship_id: part.ship_id.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        require_text(&mut issues, "name", &self.name, "Part name is required");
        limit_description(&mut issues, &self.description);
        require_text(&mut issues, "shipId", &self.ship_id, "Ship is required");
        finish(issues)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub status: UserStatus,
    pub join_date: NaiveDate,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: String::new(),
            department: String::new(),
            status: UserStatus::Active,
            join_date: Utc::now().date_naive(),
        }
    }
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            department: user.department.clone(),
            status: user.status,
            join_date: user.join_date,
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        require_text(&mut issues, "name", &self.name, "Name is required");
        require_text(&mut issues, "email", &self.email, "Email is required");
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            issues.push(FieldIssue::new("email", "Email address is invalid"));
        }
        require_text(&mut issues, "role", &self.role, "Role is required");
        require_text(&mut issues, "department", &self.department, "Department is required");
        finish(issues)
    }
}

/// Known role, else "employee".
pub fn normalize_role(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    if USER_ROLES.contains(&normalized.as_str()) {
        normalized
    } else {
        "employee".to_string()
    }
}

/// Known department, else "general".
pub fn normalize_department(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    if USER_DEPARTMENTS.contains(&normalized.as_str()) {
        normalized
    } else {
        "general".to_string()
    }
}
