//! In-memory `MarketplaceApi` used by the service tests.
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use serde_json::json;

use crate::{
    dtos::{
        inspectiondtos::{PaymentTransaction, SubmitInspectionData, UploadedFile},
        propertydtos::{PreferenceMatches, PropertiesPage, SearchFilters},
    },
    models::{
        inspectionmodel::InspectionRequest,
        propertymodel::{PropertyLocation, PropertySummary, UploadFile},
    },
    service::{api_client::MarketplaceApi, error::ServiceError},
};

pub fn listing(id: &str, lga: Option<&str>, price: i64) -> PropertySummary {
    PropertySummary {
        id: id.to_string(),
        property_type: Some("Detached Duplex".into()),
        brief_type: None,
        location: PropertyLocation {
            state: Some("Lagos".into()),
            local_government: lga.map(str::to_string),
            area: None,
        },
        price,
        images: vec![format!("https://cdn.test/{}.jpg", id)],
    }
}

#[derive(Default)]
pub struct MockApi {
    pub properties: Mutex<Vec<PropertySummary>>,
    pub total_pages: Mutex<u32>,
    pub authorization_url: Mutex<Option<String>>,
    pub fail_search: AtomicBool,
    pub fail_upload: AtomicBool,
    pub fail_submit: AtomicBool,
    pub search_calls: AtomicUsize,
    pub match_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub last_search: Mutex<Option<(SearchFilters, u32)>>,
    pub last_request: Mutex<Option<InspectionRequest>>,
    pub uploaded_names: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with_properties(properties: Vec<PropertySummary>) -> Self {
        let api = Self::default();
        *api.total_pages.lock().unwrap() = 1;
        *api.properties.lock().unwrap() = properties;
        api
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketplaceApi for MockApi {
    async fn search_properties(
        &self,
        filters: &SearchFilters,
        page: u32,
        _limit: u32,
    ) -> Result<PropertiesPage, ServiceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock().unwrap() = Some((filters.clone(), page));
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(ServiceError::Backend(Some("Search is unavailable".into())));
        }
        let properties = self.properties.lock().unwrap().clone();
        Ok(PropertiesPage {
            total_items: properties.len() as u64,
            total_pages: *self.total_pages.lock().unwrap(),
            properties,
        })
    }

    async fn get_preference_matches(
        &self,
        matched_id: &str,
        preference_id: &str,
    ) -> Result<PreferenceMatches, ServiceError> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PreferenceMatches {
            match_details: json!({ "id": matched_id }),
            preference: json!({ "id": preference_id }),
            matched_properties: self.properties.lock().unwrap().clone(),
        })
    }

    async fn upload_file(&self, _token: &str, file: &UploadFile) -> Result<UploadedFile, ServiceError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ServiceError::Backend(Some("Upload failed".into())));
        }
        self.uploaded_names.lock().unwrap().push(file.file_name.clone());
        Ok(UploadedFile {
            url: format!("https://cdn.test/uploads/{}", file.file_name),
        })
    }

    async fn submit_inspection(
        &self,
        _token: &str,
        request: &InspectionRequest,
    ) -> Result<SubmitInspectionData, ServiceError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ServiceError::Backend(Some("Could not book inspection".into())));
        }
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(SubmitInspectionData {
            transaction: Some(PaymentTransaction {
                authorization_url: self.authorization_url.lock().unwrap().clone(),
            }),
        })
    }
}
