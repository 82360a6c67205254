use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InspectionMode {
    InPerson,
    Virtual,
}

impl Default for InspectionMode {
    fn default() -> Self {
        InspectionMode::InPerson
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum InspectionType {
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "LOI")]
    Loi,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Selection,
    DateTime,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStatus {
    Closed,
    Open(CheckoutStep),
    Complete,
}

/// Upload sub-state of the payment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    Empty,
    Uploading { file_name: String },
    Uploaded { file_name: String, url: String },
    Failed { message: String },
}

impl Default for ReceiptStatus {
    fn default() -> Self {
        ReceiptStatus::Empty
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestedBy {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionDetails {
    pub date: NaiveDate,
    pub time: String,
    pub mode: InspectionMode,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionTransaction {
    pub full_name: String,
    pub transaction_receipt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestSource {
    pub page: Option<String>,
    pub meta: Option<JsonValue>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionProperty {
    pub property_id: String,
    pub inspection_type: InspectionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negotiation_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_of_intention: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_source: Option<RequestSource>,
}

/// Assembled once on submit and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRequest {
    pub requested_by: RequestedBy,
    pub inspection_details: InspectionDetails,
    pub transaction: InspectionTransaction,
    pub properties: Vec<InspectionProperty>,
}
