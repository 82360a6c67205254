use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The four property-transaction categories. Each tab keeps its own search
/// and selection state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MarketTab {
    Buy,
    Rent,
    Jv,
    Shortlet,
}

impl MarketTab {
    pub const ALL: [MarketTab; 4] = [MarketTab::Buy, MarketTab::Rent, MarketTab::Jv, MarketTab::Shortlet];

    /// Buy and rent listings can carry a negotiated price.
    pub fn supports_negotiation(&self) -> bool {
        matches!(self, MarketTab::Buy | MarketTab::Rent)
    }

    /// Joint-venture listings take a Letter of Intent instead.
    pub fn supports_loi(&self) -> bool {
        matches!(self, MarketTab::Jv)
    }

    /// `briefType` value the backend filters on.
    pub fn brief_type(&self) -> &'static str {
        match self {
            MarketTab::Buy => "Outright Sales",
            MarketTab::Rent => "Rent",
            MarketTab::Jv => "Joint Venture",
            MarketTab::Shortlet => "Shortlet",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLocation {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "lga")]
    pub local_government: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl PropertyLocation {
    /// Normalised LGA used for fee comparison. Blank values count as missing.
    pub fn lga_key(&self) -> Option<String> {
        self.local_government
            .as_deref()
            .map(|lga| lga.trim().to_lowercase())
            .filter(|lga| !lga.is_empty())
    }
}

/// Denormalised listing snapshot, enough to render a card without refetching.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub brief_type: Option<String>,
    #[serde(default)]
    pub location: PropertyLocation,
    #[serde(default)]
    pub price: i64,
    #[serde(default, alias = "pictures")]
    pub images: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProperty {
    pub property_id: String,
    pub property: PropertySummary,
    pub source_tab: MarketTab,
    // Provenance tags, forwarded untouched with the inspection request
    pub source_page: Option<String>,
    pub source_meta: Option<JsonValue>,
}

impl SelectedProperty {
    pub fn new(property: PropertySummary, source_tab: MarketTab) -> Self {
        Self {
            property_id: property.id.clone(),
            property,
            source_tab,
            source_page: None,
            source_meta: None,
        }
    }

    pub fn with_source(mut self, page: impl Into<String>, meta: Option<JsonValue>) -> Self {
        self.source_page = Some(page.into());
        self.source_meta = meta;
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NegotiatedPrice {
    pub property_id: String,
    pub original_price: i64,
    pub negotiated_price: i64,
}

/// In-memory file handle picked by the user (receipt or LOI).
#[derive(Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoiDocument {
    pub property_id: String,
    pub document: Option<UploadFile>,
    pub document_url: Option<String>,
}

impl LoiDocument {
    /// Has a local document that still needs uploading.
    pub fn needs_upload(&self) -> bool {
        self.document.is_some() && self.document_url.is_none()
    }
}
