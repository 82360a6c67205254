use serde::{Deserialize, Serialize};

use crate::dtos::inspectiondtos::BuyerInfoDto;

/// Logged-in user's display fields, kept in memory for the session only.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub token: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl UserSession {
    pub fn new(token: impl Into<String>, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            full_name: full_name.into(),
            email: email.into(),
            phone_number: None,
        }
    }

    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Buyer info prefilled for the checkout form.
    pub fn buyer_info(&self) -> BuyerInfoDto {
        BuyerInfoDto::new(
            self.full_name.clone(),
            self.email.clone(),
            self.phone_number.clone().unwrap_or_default(),
        )
    }
}
