// service/receipt_upload.rs
use crate::{
    dtos::inspectiondtos::UploadedFile,
    models::{inspectionmodel::ReceiptStatus, propertymodel::UploadFile},
    service::{api_client::MarketplaceApi, error::ServiceError},
    utils::file_utils::validate_upload,
};

/// Payment receipt sub-state: `Empty -> Uploading -> {Uploaded, Failed}`.
/// A failed upload is not retried; the user picks the file again.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptUpload {
    status: ReceiptStatus,
    max_size_mb: usize,
}

impl ReceiptUpload {
    pub fn new(max_size_mb: usize) -> Self {
        Self {
            status: ReceiptStatus::Empty,
            max_size_mb,
        }
    }

    pub fn status(&self) -> &ReceiptStatus {
        &self.status
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.status, ReceiptStatus::Uploading { .. })
    }

    /// Durable URL of the uploaded receipt, if there is one.
    pub fn url(&self) -> Option<&str> {
        match &self.status {
            ReceiptStatus::Uploaded { url, .. } => Some(url.as_str()),
            _ => None,
        }
    }

    /// Validates the picked file and moves to `Uploading`. A rejected file
    /// leaves the current state as it was.
    pub fn begin(&mut self, mut file: UploadFile) -> Result<UploadFile, ServiceError> {
        if self.is_uploading() {
            return Err(ServiceError::Validation(
                "A receipt is already being uploaded".to_string(),
            ));
        }
        let content_type = validate_upload(&file, self.max_size_mb)?;
        file.content_type = content_type.to_string();

        self.status = ReceiptStatus::Uploading {
            file_name: file.file_name.clone(),
        };
        Ok(file)
    }

    pub fn complete(&mut self, result: Result<UploadedFile, ServiceError>) -> Result<String, ServiceError> {
        let file_name = match &self.status {
            ReceiptStatus::Uploading { file_name } => file_name.clone(),
            _ => {
                return Err(ServiceError::Validation(
                    "No receipt upload is in progress".to_string(),
                ))
            }
        };

        match result {
            Ok(uploaded) => {
                tracing::info!("✅ Receipt {} uploaded", file_name);
                self.status = ReceiptStatus::Uploaded {
                    file_name,
                    url: uploaded.url.clone(),
                };
                Ok(uploaded.url)
            }
            Err(e) => {
                tracing::warn!("Receipt {} failed to upload: {}", file_name, e);
                self.status = ReceiptStatus::Failed { message: e.to_string() };
                Err(e)
            }
        }
    }

    /// Picking a file triggers the upload straight away.
    pub async fn select_and_upload(
        &mut self,
        api: &dyn MarketplaceApi,
        token: &str,
        file: UploadFile,
    ) -> Result<String, ServiceError> {
        let file = self.begin(file)?;
        let result = api.upload_file(token, &file).await;
        self.complete(result)
    }

    pub fn reset(&mut self) {
        self.status = ReceiptStatus::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(size: usize) -> UploadFile {
        UploadFile::new("receipt.png", "image/png", vec![7; size])
    }

    #[test]
    fn happy_path() {
        let mut receipt = ReceiptUpload::new(5);
        let file = receipt.begin(png(10)).unwrap();
        assert_eq!(file.content_type, "image/png");
        assert!(receipt.is_uploading());
        assert_eq!(receipt.url(), None);

        let url = receipt
            .complete(Ok(UploadedFile { url: "https://cdn.example/r.png".into() }))
            .unwrap();
        assert_eq!(url, "https://cdn.example/r.png");
        assert_eq!(receipt.url(), Some("https://cdn.example/r.png"));
    }

    #[test]
    fn oversized_file_is_rejected_without_state_change() {
        let mut receipt = ReceiptUpload::new(5);
        let err = receipt.begin(png(6 * 1024 * 1024)).unwrap_err();
        assert!(err.to_string().contains("5MB"));
        assert_eq!(receipt.status(), &ReceiptStatus::Empty);
    }

    #[test]
    fn failure_requires_reselect() {
        let mut receipt = ReceiptUpload::new(5);
        receipt.begin(png(10)).unwrap();
        assert!(receipt.complete(Err(ServiceError::Backend(Some("boom".into())))).is_err());
        assert!(matches!(receipt.status(), ReceiptStatus::Failed { message } if message == "boom"));
        assert_eq!(receipt.url(), None);

        // nothing to complete until a new file is picked
        assert!(receipt
            .complete(Ok(UploadedFile { url: "x".into() }))
            .is_err());
        assert!(receipt.begin(png(10)).is_ok());
    }

    #[test]
    fn cannot_start_second_upload_while_uploading() {
        let mut receipt = ReceiptUpload::new(5);
        receipt.begin(png(10)).unwrap();
        assert!(receipt.begin(png(10)).is_err());
    }
}
