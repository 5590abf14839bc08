//! Typed records stored as whitespace-delimited lines.
//!
//! Every store holds one record per line with space-separated fields and no
//! quoting. This module is the boundary between those raw lines and the typed
//! [`Car`], [`Credential`] and [`AuditEntry`] values the services work with.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::StoreName;

/// A value that round-trips through a single store line.
pub trait Record: Sized {
    /// Parse a trimmed, non-empty line.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the line is not a valid record.
    fn parse_line(line: &str) -> std::result::Result<Self, String>;

    /// Render the record as a single line without a trailing newline.
    fn to_line(&self) -> String;
}

/// Parse every line of `store` into records of type `R`.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] for the first line that fails to parse.
pub fn parse_all<R: Record>(store: StoreName, lines: &[String]) -> Result<Vec<R>> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            R::parse_line(line).map_err(|reason| Error::malformed(store, idx + 1, reason))
        })
        .collect()
}

/// Check that `value` can be stored as exactly one field.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the value is empty or contains whitespace.
pub fn validate_token(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_field(field, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::invalid_field(
            field,
            format!("'{value}' must not contain whitespace"),
        ));
    }
    Ok(())
}

fn expect_fields(line: &str, min: usize, exact: bool) -> std::result::Result<Vec<&str>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < min || (exact && fields.len() != min) {
        return Err(format!("expected {min} fields, found {}", fields.len()));
    }
    Ok(fields)
}

/// Availability of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarStatus {
    /// Can be rented.
    Available,
    /// Currently out with a user.
    Rented,
}

impl std::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Rented => write!(f, "Rented"),
        }
    }
}

impl FromStr for CarStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Rented" => Ok(Self::Rented),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// A car in the inventory.
///
/// `model` is the lookup key, but uniqueness is not enforced: the store may
/// hold several records with the same model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// Model name, e.g. `Corolla`.
    pub model: String,
    /// Body type, e.g. `Sedan`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Model year.
    pub year: i32,
    /// Rental rate.
    pub rate: f64,
    /// Current availability.
    pub status: CarStatus,
}

impl Car {
    /// Create an available car, validating every text field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if a field is empty, contains
    /// whitespace, or the rate is not a finite number.
    pub fn new(model: &str, kind: &str, year: i32, rate: f64) -> Result<Self> {
        validate_token("model", model)?;
        validate_token("type", kind)?;
        if !rate.is_finite() {
            return Err(Error::invalid_field(
                "rate",
                format!("{rate} is not a finite number"),
            ));
        }
        Ok(Self {
            model: model.to_string(),
            kind: kind.to_string(),
            year,
            rate,
            status: CarStatus::Available,
        })
    }

    /// Whether the car can be rented.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == CarStatus::Available
    }
}

impl Record for Car {
    fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields = expect_fields(line, 5, true)?;
        let year = fields[2]
            .parse()
            .map_err(|_| format!("invalid year '{}'", fields[2]))?;
        let rate: f64 = fields[3]
            .parse()
            .map_err(|_| format!("invalid rate '{}'", fields[3]))?;
        if !rate.is_finite() {
            return Err(format!("invalid rate '{}'", fields[3]));
        }
        Ok(Self {
            model: fields[0].to_string(),
            kind: fields[1].to_string(),
            year,
            rate,
            status: fields[4].parse()?,
        })
    }

    fn to_line(&self) -> String {
        // f64's Display drops a trailing ".0", so integral rates stay as written.
        format!(
            "{} {} {} {} {}",
            self.model, self.kind, self.year, self.rate, self.status
        )
    }
}

/// A plaintext username/password pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Login name, unique within one role's store.
    pub username: String,
    /// Password, stored and compared verbatim.
    pub password: String,
}

impl Credential {
    /// Create a credential, validating both fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if either field is empty or contains
    /// whitespace.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        validate_token("username", username)?;
        validate_token("password", password)?;
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Exact match on both username and password.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Record for Credential {
    fn parse_line(line: &str) -> std::result::Result<Self, String> {
        // Trailing fields are tolerated and dropped.
        let fields = expect_fields(line, 2, false)?;
        Ok(Self {
            username: fields[0].to_string(),
            password: fields[1].to_string(),
        })
    }

    fn to_line(&self) -> String {
        format!("{} {}", self.username, self.password)
    }
}

/// The transition an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// `Available` to `Rented`; written to the waiting log.
    Rented,
    /// `Rented` to `Available`; written to the returned log.
    Returned,
}

impl AuditAction {
    /// The store entries of this action are appended to.
    #[must_use]
    pub fn store(self) -> StoreName {
        match self {
            Self::Rented => StoreName::Waiting,
            Self::Returned => StoreName::Returned,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rented => write!(f, "rented"),
            Self::Returned => write!(f, "returned"),
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rented" => Ok(Self::Rented),
            "returned" => Ok(Self::Returned),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// One line of a rental audit log: `<actor> <action> <model>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Username that performed the action.
    pub actor: String,
    /// What happened.
    pub action: AuditAction,
    /// Model the action applied to.
    pub model: String,
}

impl AuditEntry {
    /// Create an audit entry.
    #[must_use]
    pub fn new(actor: impl Into<String>, action: AuditAction, model: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action,
            model: model.into(),
        }
    }
}

impl Record for AuditEntry {
    fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields = expect_fields(line, 3, true)?;
        Ok(Self {
            actor: fields[0].to_string(),
            action: fields[1].parse()?,
            model: fields[2].to_string(),
        })
    }

    fn to_line(&self) -> String {
        format!("{} {} {}", self.actor, self.action, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_car() {
        let car = Car::parse_line("Corolla Sedan 2015 8000 Available").unwrap();
        assert_eq!(car.model, "Corolla");
        assert_eq!(car.kind, "Sedan");
        assert_eq!(car.year, 2015);
        assert!((car.rate - 8000.0).abs() < f64::EPSILON);
        assert_eq!(car.status, CarStatus::Available);
    }

    #[test]
    fn test_car_line_keeps_integral_rate() {
        let car = Car::new("Tesla", "EV", 2024, 15000.0).unwrap();
        assert_eq!(car.to_line(), "Tesla EV 2024 15000 Available");
    }

    #[test]
    fn test_car_line_fractional_rate() {
        let mut car = Car::new("Alto", "Hatchback", 2020, 4999.5).unwrap();
        car.status = CarStatus::Rented;
        assert_eq!(car.to_line(), "Alto Hatchback 2020 4999.5 Rented");
    }

    #[test]
    fn test_parse_car_collapses_extra_spaces() {
        let car = Car::parse_line("City   Sedan 2019  11000 Rented").unwrap();
        assert_eq!(car.to_line(), "City Sedan 2019 11000 Rented");
    }

    #[test]
    fn test_parse_car_wrong_field_count() {
        let err = Car::parse_line("Civic Sedan 2018").unwrap_err();
        assert!(err.contains("expected 5 fields, found 3"));

        let err = Car::parse_line("Civic Sedan 2018 10000 Available extra").unwrap_err();
        assert!(err.contains("found 6"));
    }

    #[test]
    fn test_parse_car_bad_fields() {
        assert!(Car::parse_line("Civic Sedan twenty 10000 Available")
            .unwrap_err()
            .contains("invalid year"));
        assert!(Car::parse_line("Civic Sedan 2018 cheap Available")
            .unwrap_err()
            .contains("invalid rate"));
        assert!(Car::parse_line("Civic Sedan 2018 10000 Stolen")
            .unwrap_err()
            .contains("unknown status"));
    }

    #[test]
    fn test_car_new_rejects_whitespace() {
        let err = Car::new("Land Cruiser", "SUV", 2020, 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "model", .. }));

        let err = Car::new("Prado", "", 2020, 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "type", .. }));

        let err = Car::new("Prado", "SUV", 2020, f64::NAN).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "rate", .. }));
    }

    #[test]
    fn test_parse_credential_ignores_extra_fields() {
        let cred = Credential::parse_line("alice pw trailing junk").unwrap();
        assert_eq!(cred.username, "alice");
        assert_eq!(cred.password, "pw");
        assert_eq!(cred.to_line(), "alice pw");
    }

    #[test]
    fn test_parse_credential_too_short() {
        assert!(Credential::parse_line("alice").is_err());
    }

    #[test]
    fn test_credential_matches_exactly() {
        let cred = Credential::new("alice", "pw").unwrap();
        assert!(cred.matches("alice", "pw"));
        assert!(!cred.matches("alice", "PW"));
        assert!(!cred.matches("alic", "pw"));
    }

    #[test]
    fn test_audit_entry_line() {
        let entry = AuditEntry::new("bob", AuditAction::Rented, "Tesla");
        assert_eq!(entry.to_line(), "bob rented Tesla");
        assert_eq!(AuditEntry::parse_line("bob rented Tesla").unwrap(), entry);
    }

    #[test]
    fn test_audit_action_store() {
        assert_eq!(AuditAction::Rented.store(), StoreName::Waiting);
        assert_eq!(AuditAction::Returned.store(), StoreName::Returned);
    }

    #[test]
    fn test_parse_all_reports_position() {
        let lines = vec![
            "Civic Sedan 2018 10000 Available".to_string(),
            "broken".to_string(),
        ];
        let err = parse_all::<Car>(StoreName::Cars, &lines).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRecord {
                store: StoreName::Cars,
                record: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_car_serializes_type_field() {
        let car = Car::new("Yaris", "Sedan", 2022, 13000.0).unwrap();
        let json = serde_json::to_string(&car).unwrap();
        assert!(json.contains("\"type\":\"Sedan\""));
        assert!(json.contains("\"status\":\"Available\""));
    }
}
