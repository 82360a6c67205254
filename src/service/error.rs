use thiserror::Error;

use crate::models::{inspectionmodel::CheckoutStep, propertymodel::MarketTab};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("You can only select up to {max} properties for inspection")]
    MaxSelectionReached { max: usize },

    #[error("Property {0} is not selected for inspection")]
    PropertyNotSelected(String),

    #[error("Negotiated price {negotiated} cannot be higher than the listed price {original}")]
    NegotiatedPriceTooHigh { original: i64, negotiated: i64 },

    #[error("{action} is not available on the {tab:?} tab")]
    UnsupportedForTab { tab: MarketTab, action: &'static str },

    #[error("Cannot move from {from:?} to {to:?}: {reason}")]
    InvalidTransition {
        from: CheckoutStep,
        to: CheckoutStep,
        reason: String,
    },

    #[error("Checkout is not open")]
    WizardNotOpen,

    #[error("An inspection request is already being submitted")]
    AlreadySubmitting,

    #[error("Please login to continue")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{}", .0.as_deref().unwrap_or("Request failed"))]
    Backend(Option<String>),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ServiceError {
    /// True for errors raised locally, before any network call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::MaxSelectionReached { .. }
                | ServiceError::PropertyNotSelected(_)
                | ServiceError::NegotiatedPriceTooHigh { .. }
                | ServiceError::UnsupportedForTab { .. }
                | ServiceError::InvalidTransition { .. }
                | ServiceError::WizardNotOpen
                | ServiceError::AlreadySubmitting
                | ServiceError::NotAuthenticated
        )
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::UnexpectedResponse(err.to_string())
    }
}
