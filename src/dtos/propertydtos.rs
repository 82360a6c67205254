use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::{
    models::propertymodel::{MarketTab, PropertySummary},
    service::error::ServiceError,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BuyFilters {
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Minimum price cannot be negative"))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0, message = "Maximum price cannot be negative"))]
    pub max_price: Option<i64>,
    pub property_type: Option<String>,
    pub document_types: Vec<String>,
    #[validate(range(min = 1, max = 20, message = "Bedrooms must be between 1 and 20"))]
    pub bedrooms: Option<u32>,
    #[validate(range(min = 1, max = 20, message = "Bathrooms must be between 1 and 20"))]
    pub bathrooms: Option<u32>,
    #[validate(range(min = 0.0, message = "Land size cannot be negative"))]
    pub land_size: Option<f64>,
    pub land_size_unit: Option<String>,
    pub desired_features: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RentFilters {
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Minimum price cannot be negative"))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0, message = "Maximum price cannot be negative"))]
    pub max_price: Option<i64>,
    pub property_type: Option<String>,
    #[validate(range(min = 1, max = 20, message = "Bedrooms must be between 1 and 20"))]
    pub bedrooms: Option<u32>,
    #[validate(range(min = 1, max = 20, message = "Bathrooms must be between 1 and 20"))]
    pub bathrooms: Option<u32>,
    pub desired_features: Vec<String>,
    pub tenant_criteria: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct JvFilters {
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Minimum price cannot be negative"))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0, message = "Maximum price cannot be negative"))]
    pub max_price: Option<i64>,
    pub property_type: Option<String>,
    pub document_types: Vec<String>,
    #[validate(range(min = 0.0, message = "Land size cannot be negative"))]
    pub land_size: Option<f64>,
    pub land_size_unit: Option<String>,
    pub desired_features: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShortletFilters {
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Minimum price cannot be negative"))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0, message = "Maximum price cannot be negative"))]
    pub max_price: Option<i64>,
    pub property_type: Option<String>,
    #[validate(range(min = 1, max = 20, message = "Bedrooms must be between 1 and 20"))]
    pub bedrooms: Option<u32>,
    #[validate(range(min = 1, max = 20, message = "Bathrooms must be between 1 and 20"))]
    pub bathrooms: Option<u32>,
    pub desired_features: Vec<String>,
}

/// Per-tab filter configuration. Each tab has a fixed field set.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilters {
    Buy(BuyFilters),
    Rent(RentFilters),
    JointVenture(JvFilters),
    Shortlet(ShortletFilters),
}

impl SearchFilters {
    pub fn default_for(tab: MarketTab) -> Self {
        match tab {
            MarketTab::Buy => SearchFilters::Buy(BuyFilters::default()),
            MarketTab::Rent => SearchFilters::Rent(RentFilters::default()),
            MarketTab::Jv => SearchFilters::JointVenture(JvFilters::default()),
            MarketTab::Shortlet => SearchFilters::Shortlet(ShortletFilters::default()),
        }
    }

    pub fn tab(&self) -> MarketTab {
        match self {
            SearchFilters::Buy(_) => MarketTab::Buy,
            SearchFilters::Rent(_) => MarketTab::Rent,
            SearchFilters::JointVenture(_) => MarketTab::Jv,
            SearchFilters::Shortlet(_) => MarketTab::Shortlet,
        }
    }

    /// Boundary validation, run before anything is serialized.
    pub fn validate_filters(&self) -> Result<(), ServiceError> {
        let (min_price, max_price) = match self {
            SearchFilters::Buy(f) => {
                f.validate()?;
                (f.min_price, f.max_price)
            }
            SearchFilters::Rent(f) => {
                f.validate()?;
                (f.min_price, f.max_price)
            }
            SearchFilters::JointVenture(f) => {
                f.validate()?;
                (f.min_price, f.max_price)
            }
            SearchFilters::Shortlet(f) => {
                f.validate()?;
                (f.min_price, f.max_price)
            }
        };

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(ServiceError::Validation(
                    "Minimum price cannot be greater than maximum price".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn to_query(&self, page: u32, limit: u32) -> Result<String, ServiceError> {
        let mut query = PropertySearchQuery {
            brief_type: self.tab().brief_type(),
            page,
            limit,
            ..Default::default()
        };

        match self {
            SearchFilters::Buy(f) => {
                query.location = non_blank(&f.location);
                query.min_price = f.min_price;
                query.max_price = f.max_price;
                query.property_type = non_blank(&f.property_type);
                query.document_type = join_list(&f.document_types);
                query.bedroom = f.bedrooms;
                query.bathroom = f.bathrooms;
                query.land_size = f.land_size;
                query.land_size_type = non_blank(&f.land_size_unit);
                query.desired_features = join_list(&f.desired_features);
            }
            SearchFilters::Rent(f) => {
                query.location = non_blank(&f.location);
                query.min_price = f.min_price;
                query.max_price = f.max_price;
                query.property_type = non_blank(&f.property_type);
                query.bedroom = f.bedrooms;
                query.bathroom = f.bathrooms;
                query.desired_features = join_list(&f.desired_features);
                query.tenant_criteria = join_list(&f.tenant_criteria);
            }
            SearchFilters::JointVenture(f) => {
                query.location = non_blank(&f.location);
                query.min_price = f.min_price;
                query.max_price = f.max_price;
                query.property_type = non_blank(&f.property_type);
                query.document_type = join_list(&f.document_types);
                query.land_size = f.land_size;
                query.land_size_type = non_blank(&f.land_size_unit);
                query.desired_features = join_list(&f.desired_features);
            }
            SearchFilters::Shortlet(f) => {
                query.location = non_blank(&f.location);
                query.min_price = f.min_price;
                query.max_price = f.max_price;
                query.property_type = non_blank(&f.property_type);
                query.bedroom = f.bedrooms;
                query.bathroom = f.bathrooms;
                query.desired_features = join_list(&f.desired_features);
            }
        }

        serde_urlencoded::to_string(&query)
            .map_err(|e| ServiceError::Validation(format!("Invalid search filters: {}", e)))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn join_list(values: &[String]) -> Option<String> {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Flat wire form of `SearchFilters` for `GET /properties`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct PropertySearchQuery {
    brief_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bedroom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bathroom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    land_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    land_size_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    desired_features: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_criteria: Option<String>,
    page: u32,
    limit: u32,
}

/// `{success, data, error}` envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn failure(self) -> ServiceError {
        ServiceError::Backend(self.error.or(self.message))
    }

    pub fn into_result(self) -> Result<T, ServiceError> {
        if !self.success {
            return Err(self.failure());
        }
        self.data
            .ok_or_else(|| ServiceError::UnexpectedResponse("response has no data".to_string()))
    }
}

impl<T: Default> ApiResponse<T> {
    /// Like `into_result`, but a successful envelope without `data` is fine.
    pub fn into_result_or_default(self) -> Result<T, ServiceError> {
        if !self.success {
            return Err(self.failure());
        }
        Ok(self.data.unwrap_or_default())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesPage {
    #[serde(default)]
    pub properties: Vec<PropertySummary>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceMatches {
    #[serde(default)]
    pub match_details: JsonValue,
    #[serde(default)]
    pub preference: JsonValue,
    #[serde(default)]
    pub matched_properties: Vec<PropertySummary>,
}
