//! Person domain model.
//!
//! # Responsibility
//! - Define the single record routed between the ADULTS and MINORS stores.
//! - Enforce field-level validation before any store write.
//!
//! # Invariants
//! - `id` is store-local: it is unique only inside the partition that issued it.
//! - `id`, `created_at` and `updated_at` are assigned by the owning store.
//! - A missing `date_of_birth` is legal and classifies the person as an adult.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-local auto-generated identifier.
pub type PersonId = i64;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_PHONE_CHARS: usize = 20;
pub const MAX_EMAIL_CHARS: usize = 255;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validation failure raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// A required name field is empty after trimming.
    EmptyName(&'static str),
    /// A bounded text field exceeds its column width.
    FieldTooLong { field: &'static str, max_chars: usize },
    /// Email is present but does not look like `local@domain.tld`.
    InvalidEmail(String),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(field) => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "{field} exceeds {max_chars} characters")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
        }
    }
}

impl Error for PersonValidationError {}

/// A person record as stored in exactly one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// `None` until the owning store assigns one on insert.
    pub id: Option<PersonId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Drives partition selection at write time.
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Unix epoch milliseconds, store-assigned.
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds, store-assigned.
    pub updated_at: Option<i64>,
}

impl Person {
    /// Creates an unsaved person with only the required name fields set.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone_number: None,
            date_of_birth: None,
            address: None,
            city: None,
            country: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_birth_date(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Sets street address, city and country in one call.
    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        self.address = Some(address.into());
        self.city = Some(city.into());
        self.country = Some(country.into());
        self
    }

    /// `"<first> <last>"`, used in routing summaries.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Validates field-level constraints mirrored by the `persons` DDL.
    ///
    /// # Errors
    /// - `EmptyName` when first or last name is blank.
    /// - `FieldTooLong` when a bounded column would overflow.
    /// - `InvalidEmail` when a present email has no `local@domain.tld` shape.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        check_name("first_name", &self.first_name)?;
        check_name("last_name", &self.last_name)?;

        if let Some(phone) = self.phone_number.as_deref() {
            check_len("phone_number", phone, MAX_PHONE_CHARS)?;
        }

        if let Some(email) = self.email.as_deref() {
            check_len("email", email, MAX_EMAIL_CHARS)?;
            if !EMAIL_RE.is_match(email) {
                return Err(PersonValidationError::InvalidEmail(email.to_string()));
            }
        }

        Ok(())
    }
}

fn check_name(field: &'static str, value: &str) -> Result<(), PersonValidationError> {
    if value.trim().is_empty() {
        return Err(PersonValidationError::EmptyName(field));
    }
    check_len(field, value, MAX_NAME_CHARS)
}

fn check_len(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), PersonValidationError> {
    if value.chars().count() > max_chars {
        return Err(PersonValidationError::FieldTooLong { field, max_chars });
    }
    Ok(())
}
