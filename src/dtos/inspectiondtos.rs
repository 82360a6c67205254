use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInfoDto {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Phone number is required"),
        custom = "validate_phone_number"
    )]
    pub phone_number: String,
}

impl BuyerInfoDto {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            phone_number: phone_number.into().trim().to_string(),
        }
    }
}

lazy_static! {
    static ref PHONE_PATTERN: Regex = Regex::new(r"^\+?[0-9]+([- ][0-9]+)*$").unwrap();
}

// 10-15 digits, optional leading +, single spaces or dashes between groups
fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_PATTERN.is_match(phone) || !(10..=15).contains(&digits) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "Phone number must be in a valid format (e.g., +2348012345678 or 0801-234-5678)",
        ));
        return Err(error);
    }
    Ok(())
}

/// Result of the single upload endpoint, normalised from
/// `{imageUrl}`, `{url}` or `{data: {url}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub url: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SubmitInspectionData {
    #[serde(default)]
    pub transaction: Option<PaymentTransaction>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaymentTransaction {
    #[serde(default)]
    pub authorization_url: Option<String>,
}

impl SubmitInspectionData {
    pub fn authorization_url(&self) -> Option<&str> {
        self.transaction
            .as_ref()
            .and_then(|t| t.authorization_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}
