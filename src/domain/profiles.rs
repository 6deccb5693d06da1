//! Profile domain types
//!
//! The single managed record and the request body shared by create and update.
//! Field names are lowercase on the wire and in memory; no other casing is
//! accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Store-assigned profile identifier. Strictly increasing, never reused.
pub type ProfileId = i64;

/// Profile entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: i32,
}

impl Profile {
    /// The mutable part of the record, without its id.
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            age: self.age,
        }
    }
}

/// Validated descriptive fields of a profile.
///
/// This is also the body the client sends for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: i32,
}

impl ProfileFields {
    pub fn into_profile(self, id: ProfileId) -> Profile {
        Profile {
            id,
            name: self.name,
            email: self.email,
            gender: self.gender,
            age: self.age,
        }
    }
}

/// Request DTO for creating or replacing a profile.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a validation error listing it, instead of a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Integer, or decimal digits as typed into a form.
    #[serde(default)]
    pub age: Option<Value>,
}

/// One or more required fields were missing, empty or unparseable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or invalid fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<String>,
}

impl ProfileRequest {
    /// Check required-field presence and parse `age`.
    ///
    /// All offending fields are reported together, in declaration order.
    pub fn validate(self) -> Result<ProfileFields, ValidationError> {
        let mut missing = Vec::new();

        let name = required_text(self.name, "name", &mut missing);
        let email = required_text(self.email, "email", &mut missing);
        let gender = required_text(self.gender, "gender", &mut missing);
        let age = self.age.as_ref().and_then(parse_age);
        if age.is_none() {
            missing.push("age".to_string());
        }

        match (name, email, gender, age) {
            (Some(name), Some(email), Some(gender), Some(age)) => Ok(ProfileFields {
                name,
                email,
                gender,
                age,
            }),
            _ => Err(ValidationError { fields: missing }),
        }
    }
}

fn required_text(value: Option<String>, field: &str, missing: &mut Vec<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(field.to_string());
            None
        }
    }
}

fn parse_age(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        }
        _ => None,
    }
}
