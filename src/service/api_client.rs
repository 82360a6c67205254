// service/api_client.rs
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::{
    config::Config,
    dtos::{
        inspectiondtos::{SubmitInspectionData, UploadedFile},
        propertydtos::{ApiResponse, PreferenceMatches, PropertiesPage, SearchFilters},
    },
    models::{inspectionmodel::InspectionRequest, propertymodel::UploadFile},
    service::error::ServiceError,
};

/// Remote marketplace backend. The store and wizard only talk to this trait,
/// so tests can swap in an in-memory double.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn search_properties(
        &self,
        filters: &SearchFilters,
        page: u32,
        limit: u32,
    ) -> Result<PropertiesPage, ServiceError>;

    async fn get_preference_matches(
        &self,
        matched_id: &str,
        preference_id: &str,
    ) -> Result<PreferenceMatches, ServiceError>;

    async fn upload_file(&self, token: &str, file: &UploadFile) -> Result<UploadedFile, ServiceError>;

    async fn submit_inspection(
        &self,
        token: &str,
        request: &InspectionRequest,
    ) -> Result<SubmitInspectionData, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, ServiceError> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ServiceError::Backend(Some(format!(
                "Request failed with status {}",
                status.as_u16()
            )))),
            Err(e) => Err(ServiceError::UnexpectedResponse(e.to_string())),
        }
    }
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    async fn search_properties(
        &self,
        filters: &SearchFilters,
        page: u32,
        limit: u32,
    ) -> Result<PropertiesPage, ServiceError> {
        let query = filters.to_query(page, limit)?;
        let url = format!("{}?{}", self.url("/properties"), query);
        tracing::debug!("🔍 GET {}", url);

        let response = self.client.get(&url).send().await?;
        Self::read_envelope::<PropertiesPage>(response).await?.into_result()
    }

    async fn get_preference_matches(
        &self,
        matched_id: &str,
        preference_id: &str,
    ) -> Result<PreferenceMatches, ServiceError> {
        let url = self.url(&format!(
            "/properties/{}/{}/matches",
            urlencoding::encode(matched_id),
            urlencoding::encode(preference_id)
        ));
        tracing::debug!("🔍 GET {}", url);

        let response = self.client.get(&url).send().await?;
        Self::read_envelope::<PreferenceMatches>(response).await?.into_result()
    }

    async fn upload_file(&self, token: &str, file: &UploadFile) -> Result<UploadedFile, ServiceError> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload-image"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let body: JsonValue = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                ServiceError::UnexpectedResponse(e.to_string())
            } else {
                ServiceError::Backend(Some(format!("Upload failed with status {}", status.as_u16())))
            }
        })?;

        let explicit_failure = body["success"].as_bool() == Some(false);
        let url = body["imageUrl"]
            .as_str()
            .or_else(|| body["url"].as_str())
            .or_else(|| body["data"]["url"].as_str())
            .filter(|url| !url.is_empty());

        match url {
            Some(url) if status.is_success() && !explicit_failure => Ok(UploadedFile { url: url.to_string() }),
            _ => Err(ServiceError::Backend(
                body["error"]
                    .as_str()
                    .or_else(|| body["message"].as_str())
                    .map(str::to_string)
                    .or_else(|| Some("Failed to upload file".to_string())),
            )),
        }
    }

    async fn submit_inspection(
        &self,
        token: &str,
        request: &InspectionRequest,
    ) -> Result<SubmitInspectionData, ServiceError> {
        let response = self
            .client
            .post(self.url("/inspections"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        Self::read_envelope::<SubmitInspectionData>(response)
            .await?
            .into_result_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use axum::{
        body::Bytes,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::{
        dtos::propertydtos::BuyFilters,
        models::inspectionmodel::{
            InspectionDetails, InspectionMode, InspectionProperty, InspectionTransaction,
            InspectionType, RequestedBy,
        },
    };

    async fn spawn_backend(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ApiClient::new(&Config::new(format!("http://{}/", addr)))
    }

    fn sample_request() -> InspectionRequest {
        InspectionRequest {
            requested_by: RequestedBy {
                full_name: "Ada Obi".into(),
                email: "ada@example.com".into(),
                phone_number: "08012345678".into(),
            },
            inspection_details: InspectionDetails {
                date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
                time: "10:00 AM".into(),
                mode: InspectionMode::Virtual,
            },
            transaction: InspectionTransaction {
                full_name: "Ada Obi".into(),
                transaction_receipt: "https://cdn.example/receipt.png".into(),
            },
            properties: vec![InspectionProperty {
                property_id: "p-1".into(),
                inspection_type: InspectionType::Price,
                negotiation_price: None,
                letter_of_intention: None,
                request_source: None,
            }],
        }
    }

    #[tokio::test]
    async fn search_sends_filters_and_reads_page() {
        let seen = Arc::new(Mutex::new(HashMap::new()));
        let seen_in_handler = seen.clone();
        let router = Router::new().route(
            "/properties",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let seen = seen_in_handler.clone();
                async move {
                    *seen.lock().unwrap() = params;
                    Json(json!({
                        "success": true,
                        "data": {
                            "properties": [{ "_id": "p-1", "price": 5000000,
                                "location": { "localGovernment": "Ikeja" } }],
                            "totalItems": 1,
                            "totalPages": 1
                        }
                    }))
                }
            }),
        );
        let client = spawn_backend(router).await;

        let filters = SearchFilters::Buy(BuyFilters {
            location: Some("Lagos".into()),
            ..Default::default()
        });
        let page = client.search_properties(&filters, 1, 12).await.unwrap();

        assert_eq!(page.properties.len(), 1);
        assert_eq!(page.total_items, 1);
        let params = seen.lock().unwrap().clone();
        assert_eq!(params.get("briefType").map(String::as_str), Some("Outright Sales"));
        assert_eq!(params.get("location").map(String::as_str), Some("Lagos"));
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn search_surfaces_backend_error_message() {
        let router = Router::new().route(
            "/properties",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": "Invalid location" })),
                )
            }),
        );
        let client = spawn_backend(router).await;

        let err = client
            .search_properties(&SearchFilters::default_for(crate::models::propertymodel::MarketTab::Rent), 1, 12)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid location");
    }

    #[tokio::test]
    async fn non_json_failure_is_a_backend_error() {
        let router = Router::new().route(
            "/properties",
            get(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
        );
        let client = spawn_backend(router).await;

        let err = client
            .search_properties(&SearchFilters::default_for(crate::models::propertymodel::MarketTab::Buy), 1, 12)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Backend(Some(ref m)) if m.contains("502")));
    }

    #[tokio::test]
    async fn preference_matches_hits_nested_path() {
        let router = Router::new().route(
            "/properties/:matched_id/:preference_id/matches",
            get(|Path((matched_id, preference_id)): Path<(String, String)>| async move {
                Json(json!({
                    "success": true,
                    "data": {
                        "matchDetails": { "id": matched_id },
                        "preference": { "id": preference_id },
                        "matchedProperties": [{ "_id": "p-9" }]
                    }
                }))
            }),
        );
        let client = spawn_backend(router).await;

        let matches = client.get_preference_matches("m-1", "pref-2").await.unwrap();
        assert_eq!(matches.match_details["id"], json!("m-1"));
        assert_eq!(matches.preference["id"], json!("pref-2"));
        assert_eq!(matches.matched_properties[0].id, "p-9");
    }

    #[tokio::test]
    async fn upload_reads_nested_url_and_sends_bearer() {
        let router = Router::new().route(
            "/upload-image",
            post(|headers: HeaderMap, body: Bytes| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth != "Bearer token-123" || body.is_empty() {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "error": "Unauthorized" })));
                }
                (StatusCode::OK, Json(json!({ "success": true, "data": { "url": "https://cdn.example/r.png" } })))
            }),
        );
        let client = spawn_backend(router).await;

        let file = UploadFile::new("r.png", "image/png", vec![1, 2, 3]);
        let uploaded = client.upload_file("token-123", &file).await.unwrap();
        assert_eq!(uploaded.url, "https://cdn.example/r.png");

        let err = client.upload_file("wrong", &file).await.unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[tokio::test]
    async fn upload_accepts_flat_image_url() {
        let router = Router::new().route(
            "/upload-image",
            post(|| async { Json(json!({ "imageUrl": "https://cdn.example/flat.jpg" })) }),
        );
        let client = spawn_backend(router).await;

        let file = UploadFile::new("r.jpg", "image/jpeg", vec![9]);
        let uploaded = client.upload_file("t", &file).await.unwrap();
        assert_eq!(uploaded.url, "https://cdn.example/flat.jpg");
    }

    #[tokio::test]
    async fn submit_posts_request_and_reads_authorization_url() {
        let received = Arc::new(Mutex::new(None::<JsonValue>));
        let received_in_handler = received.clone();
        let router = Router::new().route(
            "/inspections",
            post(move |Json(body): Json<JsonValue>| {
                let received = received_in_handler.clone();
                async move {
                    *received.lock().unwrap() = Some(body);
                    Json(json!({
                        "success": true,
                        "data": { "transaction": { "authorization_url": "https://pay.example/abc" } }
                    }))
                }
            }),
        );
        let client = spawn_backend(router).await;

        let data = client.submit_inspection("t", &sample_request()).await.unwrap();
        assert_eq!(data.authorization_url(), Some("https://pay.example/abc"));

        let body = received.lock().unwrap().clone().unwrap();
        assert_eq!(body["requestedBy"]["fullName"], json!("Ada Obi"));
        assert_eq!(body["inspectionDetails"]["mode"], json!("virtual"));
        assert_eq!(body["properties"][0]["propertyId"], json!("p-1"));
    }

    #[tokio::test]
    async fn submit_without_data_is_still_success() {
        let router = Router::new().route("/inspections", post(|| async { Json(json!({ "success": true })) }));
        let client = spawn_backend(router).await;

        let data = client.submit_inspection("t", &sample_request()).await.unwrap();
        assert_eq!(data.authorization_url(), None);
    }
}
