//! Form field catalog
//!
//! Every field the wizard collects is named here. The wire names (used in
//! record files and JSON output) are the camelCase identifiers; labels and
//! input kinds drive the prompt layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The nine registration form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldId {
    #[serde(rename = "fullName")]
    FullName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "street")]
    Street,
    #[serde(rename = "city")]
    City,
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "username")]
    Username,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "confirmPassword")]
    ConfirmPassword,
}

/// How a field is entered and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Password,
}

impl FieldId {
    /// Get the wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::FullName => "fullName",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::Street => "street",
            FieldId::City => "city",
            FieldId::Zip => "zip",
            FieldId::Username => "username",
            FieldId::Password => "password",
            FieldId::ConfirmPassword => "confirmPassword",
        }
    }

    /// Human label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::FullName => "Full Name",
            FieldId::Email => "Email Address",
            FieldId::Phone => "Phone Number",
            FieldId::Street => "Street Address",
            FieldId::City => "City",
            FieldId::Zip => "Zip Code",
            FieldId::Username => "Username",
            FieldId::Password => "Password",
            FieldId::ConfirmPassword => "Confirm Password",
        }
    }

    /// Input kind for the prompt layer
    pub fn kind(&self) -> InputKind {
        match self {
            FieldId::Email => InputKind::Email,
            FieldId::Phone => InputKind::Tel,
            FieldId::Password | FieldId::ConfirmPassword => InputKind::Password,
            _ => InputKind::Text,
        }
    }

    /// Whether the value must never be echoed back in clear text
    pub fn is_secret(&self) -> bool {
        matches!(self.kind(), InputKind::Password)
    }

    /// All fields, in form order
    pub fn all() -> &'static [FieldId] {
        &[
            FieldId::FullName,
            FieldId::Email,
            FieldId::Phone,
            FieldId::Street,
            FieldId::City,
            FieldId::Zip,
            FieldId::Username,
            FieldId::Password,
            FieldId::ConfirmPassword,
        ]
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unknown field names
#[derive(Debug, Error)]
#[error("unknown field name: {0}")]
pub struct ParseFieldError(String);

impl FromStr for FieldId {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_roundtrip() {
        for field in FieldId::all() {
            let parsed: FieldId = field.as_str().parse().unwrap();
            assert_eq!(*field, parsed);
        }
    }

    #[test]
    fn test_unknown_name_fails() {
        assert!("streetAddress".parse::<FieldId>().is_err());
        assert!("zipCode".parse::<FieldId>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&FieldId::ConfirmPassword).unwrap();
        assert_eq!(json, "\"confirmPassword\"");
        let parsed: FieldId = serde_json::from_str("\"fullName\"").unwrap();
        assert_eq!(parsed, FieldId::FullName);
    }

    #[test]
    fn test_secret_fields_are_password_kind() {
        assert!(FieldId::Password.is_secret());
        assert!(FieldId::ConfirmPassword.is_secret());
        assert!(!FieldId::Email.is_secret());
    }
}
