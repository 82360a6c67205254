// service/search_service.rs
use serde_json::{json, Value as JsonValue};

use crate::{
    dtos::propertydtos::{PreferenceMatches, PropertiesPage, SearchFilters},
    models::propertymodel::{MarketTab, PropertySummary},
    service::{api_client::MarketplaceApi, error::ServiceError},
};

pub const SEARCH_SOURCE_PAGE: &str = "marketplace";
pub const MATCHES_SOURCE_PAGE: &str = "preference-matches";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Pending,
    Success,
    Failed,
}

/// Where the current result list came from. Carried onto selections as
/// provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSource {
    pub page: String,
    pub meta: Option<JsonValue>,
}

/// Filters, paging and the last fetched page for one tab.
#[derive(Debug, Clone)]
pub struct TabSearchState {
    tab: MarketTab,
    filters: SearchFilters,
    current_page: u32,
    page_limit: u32,
    properties: Vec<PropertySummary>,
    total_pages: u32,
    total_items: u64,
    status: SearchStatus,
    not_found: bool,
    error: Option<String>,
    source: ResultSource,
}

impl TabSearchState {
    pub fn new(tab: MarketTab, page_limit: u32) -> Self {
        Self {
            tab,
            filters: SearchFilters::default_for(tab),
            current_page: 1,
            page_limit,
            properties: Vec::new(),
            total_pages: 0,
            total_items: 0,
            status: SearchStatus::Idle,
            not_found: false,
            error: None,
            source: ResultSource {
                page: SEARCH_SOURCE_PAGE.to_string(),
                meta: None,
            },
        }
    }

    pub fn tab(&self) -> MarketTab {
        self.tab
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn properties(&self) -> &[PropertySummary] {
        &self.properties
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Last search succeeded but matched nothing. Not an error.
    pub fn not_found(&self) -> bool {
        self.not_found
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> &ResultSource {
        &self.source
    }

    pub fn find(&self, property_id: &str) -> Option<&PropertySummary> {
        self.properties.iter().find(|p| p.id == property_id)
    }

    /// Validates the filters and moves to `Pending`. Rejected filters leave
    /// the state untouched.
    pub fn begin_search(&mut self, filters: SearchFilters, page: u32) -> Result<(), ServiceError> {
        if filters.tab() != self.tab {
            return Err(ServiceError::Validation(format!(
                "{:?} filters cannot be used on the {:?} tab",
                filters.tab(),
                self.tab
            )));
        }
        if page == 0 {
            return Err(ServiceError::Validation("Page numbers start at 1".to_string()));
        }
        filters.validate_filters()?;

        self.filters = filters;
        self.current_page = page;
        self.status = SearchStatus::Pending;
        self.error = None;
        Ok(())
    }

    pub fn complete_search(&mut self, result: Result<PropertiesPage, ServiceError>) -> Result<(), ServiceError> {
        match result {
            Ok(page) => {
                self.not_found = page.properties.is_empty();
                if self.not_found {
                    tracing::info!("No {:?} properties matched the current filters", self.tab);
                }
                self.properties = page.properties;
                self.total_pages = page.total_pages;
                self.total_items = page.total_items;
                self.status = SearchStatus::Success;
                self.source = ResultSource {
                    page: SEARCH_SOURCE_PAGE.to_string(),
                    meta: None,
                };
                Ok(())
            }
            Err(e) => {
                tracing::error!("🔥 {:?} search failed: {}", self.tab, e);
                self.status = SearchStatus::Failed;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn search(
        &mut self,
        api: &dyn MarketplaceApi,
        filters: SearchFilters,
    ) -> Result<(), ServiceError> {
        self.run(api, filters, 1).await
    }

    /// Re-issues the last search on another page, filters unchanged.
    pub async fn set_page(&mut self, api: &dyn MarketplaceApi, page: u32) -> Result<(), ServiceError> {
        let filters = self.filters.clone();
        self.run(api, filters, page).await
    }

    pub async fn clear_filters(&mut self, api: &dyn MarketplaceApi) -> Result<(), ServiceError> {
        self.run(api, SearchFilters::default_for(self.tab), 1).await
    }

    async fn run(
        &mut self,
        api: &dyn MarketplaceApi,
        filters: SearchFilters,
        page: u32,
    ) -> Result<(), ServiceError> {
        self.begin_search(filters, page)?;
        let result = api
            .search_properties(&self.filters, self.current_page, self.page_limit)
            .await;
        self.complete_search(result)
    }

    /// Replaces the result list with the properties matched to a buyer
    /// preference.
    pub async fn load_matches(
        &mut self,
        api: &dyn MarketplaceApi,
        matched_id: &str,
        preference_id: &str,
    ) -> Result<(), ServiceError> {
        self.status = SearchStatus::Pending;
        self.error = None;

        match api.get_preference_matches(matched_id, preference_id).await {
            Ok(PreferenceMatches { matched_properties, .. }) => {
                self.not_found = matched_properties.is_empty();
                self.total_items = matched_properties.len() as u64;
                self.total_pages = if matched_properties.is_empty() { 0 } else { 1 };
                self.current_page = 1;
                self.properties = matched_properties;
                self.status = SearchStatus::Success;
                self.source = ResultSource {
                    page: MATCHES_SOURCE_PAGE.to_string(),
                    meta: Some(json!({
                        "matchedId": matched_id,
                        "preferenceId": preference_id,
                    })),
                };
                Ok(())
            }
            Err(e) => {
                tracing::error!("🔥 Preference matches {} failed: {}", preference_id, e);
                self.status = SearchStatus::Failed;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
