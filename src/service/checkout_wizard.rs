// service/checkout_wizard.rs
use std::time::Duration;

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    dtos::inspectiondtos::{BuyerInfoDto, SubmitInspectionData},
    models::{
        inspectionmodel::{
            CheckoutStep, InspectionDetails, InspectionMode, InspectionProperty, InspectionRequest,
            InspectionTransaction, InspectionType, RequestSource, RequestedBy, WizardStatus,
        },
        propertymodel::{MarketTab, SelectedProperty, UploadFile},
    },
    service::{
        api_client::MarketplaceApi,
        error::ServiceError,
        receipt_upload::ReceiptUpload,
        selection::{SelectionRegistry, MAX_SELECTION},
    },
    utils::schedule::{available_dates, validate_inspection_date, validate_time_slot},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleForm {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub mode: InspectionMode,
}

/// What the caller gets back after a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub request: InspectionRequest,
    /// Payment page to send the user to, if the backend started a payment.
    pub authorization_url: Option<String>,
    pub redirect_after: Option<Duration>,
}

/// Three-step inspection checkout: selection, date/time, payment.
///
/// `Closed` is reachable from any step; `Complete` only from a successful
/// submission on the payment step. A failed submission stays on payment with
/// the uploaded receipt kept, so the user can retry without re-uploading.
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    id: Uuid,
    tab: MarketTab,
    status: WizardStatus,
    schedule: ScheduleForm,
    buyer: BuyerInfoDto,
    receipt: ReceiptUpload,
    payer_name: String,
    is_submitting: bool,
    submit_attempts: u32,
    last_error: Option<String>,
    min_lead_days: i64,
    redirect_delay: Duration,
}

impl CheckoutWizard {
    pub fn open(tab: MarketTab, config: &Config) -> Self {
        let wizard = Self {
            id: Uuid::new_v4(),
            tab,
            status: WizardStatus::Open(CheckoutStep::Selection),
            schedule: ScheduleForm::default(),
            buyer: BuyerInfoDto::default(),
            receipt: ReceiptUpload::new(config.max_upload_size_mb),
            payer_name: String::new(),
            is_submitting: false,
            submit_attempts: 0,
            last_error: None,
            min_lead_days: config.min_lead_days,
            redirect_delay: config.payment_redirect_delay,
        };
        tracing::debug!("Checkout {} opened for {:?}", wizard.id, tab);
        wizard
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tab(&self) -> MarketTab {
        self.tab
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn step(&self) -> Option<CheckoutStep> {
        match self.status {
            WizardStatus::Open(step) => Some(step),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn submit_attempts(&self) -> u32 {
        self.submit_attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn schedule(&self) -> &ScheduleForm {
        &self.schedule
    }

    pub fn buyer(&self) -> &BuyerInfoDto {
        &self.buyer
    }

    pub fn receipt(&self) -> &ReceiptUpload {
        &self.receipt
    }

    pub fn payer_name(&self) -> &str {
        &self.payer_name
    }

    /// The two inspection slots, filled in selection order.
    pub fn slots<'a>(&self, registry: &'a SelectionRegistry) -> [Option<&'a SelectedProperty>; MAX_SELECTION] {
        std::array::from_fn(|i| registry.selected().get(i))
    }

    fn require_step(&self, expected: CheckoutStep, to: CheckoutStep) -> Result<(), ServiceError> {
        match self.status {
            WizardStatus::Open(step) if step == expected => Ok(()),
            WizardStatus::Open(step) => Err(ServiceError::InvalidTransition {
                from: step,
                to,
                reason: format!("checkout is on the {:?} step", step),
            }),
            _ => Err(ServiceError::WizardNotOpen),
        }
    }

    fn require_registry(&self, registry: &SelectionRegistry) -> Result<(), ServiceError> {
        if registry.tab() != self.tab {
            return Err(ServiceError::Validation(format!(
                "Checkout was opened for the {:?} tab",
                self.tab
            )));
        }
        Ok(())
    }

    pub fn proceed_to_datetime(&mut self, registry: &SelectionRegistry) -> Result<(), ServiceError> {
        self.require_step(CheckoutStep::Selection, CheckoutStep::DateTime)?;
        self.require_registry(registry)?;
        if registry.is_empty() {
            return Err(ServiceError::InvalidTransition {
                from: CheckoutStep::Selection,
                to: CheckoutStep::DateTime,
                reason: "select at least one property".to_string(),
            });
        }

        self.status = WizardStatus::Open(CheckoutStep::DateTime);
        tracing::debug!("Checkout {} -> date/time", self.id);
        Ok(())
    }

    /// The next `count` dates this checkout accepts.
    pub fn available_dates(&self, today: NaiveDate, count: usize) -> Vec<NaiveDate> {
        available_dates(today, self.min_lead_days, count)
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.schedule.date = Some(date);
    }

    pub fn set_time(&mut self, slot: impl Into<String>) {
        self.schedule.time = Some(slot.into().trim().to_string());
    }

    pub fn set_mode(&mut self, mode: InspectionMode) {
        self.schedule.mode = mode;
    }

    pub fn set_buyer_info(&mut self, buyer: BuyerInfoDto) {
        self.buyer = BuyerInfoDto::new(buyer.full_name, buyer.email, buyer.phone_number);
    }

    pub fn set_payer_name(&mut self, name: impl Into<String>) {
        self.payer_name = name.into().trim().to_string();
    }

    /// Everything the date/time step collects, checked against `today`.
    pub fn validate_datetime(&self, today: NaiveDate) -> Result<(), ServiceError> {
        let date = self
            .schedule
            .date
            .ok_or_else(|| ServiceError::Validation("Please select an inspection date".to_string()))?;
        validate_inspection_date(date, today, self.min_lead_days)?;

        let time = self
            .schedule
            .time
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("Please select an inspection time".to_string()))?;
        validate_time_slot(time)?;

        self.buyer.validate()?;
        Ok(())
    }

    pub fn proceed_to_payment(&mut self, today: NaiveDate) -> Result<(), ServiceError> {
        self.require_step(CheckoutStep::DateTime, CheckoutStep::Payment)?;
        self.validate_datetime(today)?;

        self.status = WizardStatus::Open(CheckoutStep::Payment);
        tracing::debug!("Checkout {} -> payment", self.id);
        Ok(())
    }

    /// Picks a receipt and uploads it immediately.
    pub async fn upload_receipt(
        &mut self,
        api: &dyn MarketplaceApi,
        token: &str,
        file: UploadFile,
    ) -> Result<String, ServiceError> {
        self.require_step(CheckoutStep::Payment, CheckoutStep::Payment)?;
        match self.receipt.select_and_upload(api, token, file).await {
            Ok(url) => {
                self.last_error = None;
                Ok(url)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Every local check a submission must pass: the payment step fields
    /// plus the date/time step fields. Pending LOI uploads are not checked
    /// here.
    pub fn validate_for_submit(&self, registry: &SelectionRegistry, today: NaiveDate) -> Result<(), ServiceError> {
        self.require_step(CheckoutStep::Payment, CheckoutStep::Payment)?;
        self.require_registry(registry)?;
        if registry.is_empty() {
            return Err(ServiceError::Validation(
                "Select at least one property for inspection".to_string(),
            ));
        }
        if self.receipt.url().is_none() {
            return Err(ServiceError::Validation("Please upload your payment receipt".to_string()));
        }
        if self.payer_name.is_empty() {
            return Err(ServiceError::Validation(
                "Please enter the name on the account you paid from".to_string(),
            ));
        }
        self.validate_datetime(today)
    }

    /// Assembles the request from the wizard and the tab's selection.
    pub fn build_request(&self, registry: &SelectionRegistry, today: NaiveDate) -> Result<InspectionRequest, ServiceError> {
        self.validate_for_submit(registry, today)?;

        let receipt_url = self
            .receipt
            .url()
            .ok_or_else(|| ServiceError::Validation("Please upload your payment receipt".to_string()))?;
        let (date, time) = match (self.schedule.date, self.schedule.time.clone()) {
            (Some(date), Some(time)) => (date, time),
            _ => {
                return Err(ServiceError::Validation(
                    "Inspection date and time are required".to_string(),
                ))
            }
        };
        if !registry.pending_loi_uploads().is_empty() {
            return Err(ServiceError::Validation(
                "Letter of intent has not been uploaded yet".to_string(),
            ));
        }

        let properties = registry
            .selected()
            .iter()
            .map(|selected| {
                let letter_of_intention = registry
                    .loi_document(&selected.property_id)
                    .and_then(|loi| loi.document_url.clone());
                let inspection_type = if letter_of_intention.is_some() {
                    InspectionType::Loi
                } else {
                    InspectionType::Price
                };
                let request_source = if selected.source_page.is_some() || selected.source_meta.is_some() {
                    Some(RequestSource {
                        page: selected.source_page.clone(),
                        meta: selected.source_meta.clone(),
                    })
                } else {
                    None
                };

                InspectionProperty {
                    property_id: selected.property_id.clone(),
                    inspection_type,
                    negotiation_price: registry
                        .negotiated_price(&selected.property_id)
                        .map(|n| n.negotiated_price),
                    letter_of_intention,
                    request_source,
                }
            })
            .collect();

        Ok(InspectionRequest {
            requested_by: RequestedBy {
                full_name: self.buyer.full_name.clone(),
                email: self.buyer.email.clone(),
                phone_number: self.buyer.phone_number.clone(),
            },
            inspection_details: InspectionDetails {
                date,
                time,
                mode: self.schedule.mode,
            },
            transaction: InspectionTransaction {
                full_name: self.payer_name.clone(),
                transaction_receipt: receipt_url.to_string(),
            },
            properties,
        })
    }

    /// Marks the submission in flight and hands back the request to send.
    /// Refuses while a previous submission is still running.
    pub fn begin_submit(
        &mut self,
        registry: &SelectionRegistry,
        today: NaiveDate,
    ) -> Result<InspectionRequest, ServiceError> {
        if self.is_submitting {
            tracing::warn!("Checkout {} ignored a duplicate submit", self.id);
            return Err(ServiceError::AlreadySubmitting);
        }
        let request = self.build_request(registry, today)?;

        self.is_submitting = true;
        self.submit_attempts += 1;
        self.last_error = None;
        Ok(request)
    }

    pub fn finish_submit(
        &mut self,
        request: InspectionRequest,
        result: Result<SubmitInspectionData, ServiceError>,
    ) -> Result<SubmissionOutcome, ServiceError> {
        self.is_submitting = false;

        match result {
            Ok(data) => {
                self.status = WizardStatus::Complete;
                let authorization_url = data.authorization_url().map(str::to_string);
                tracing::info!(
                    "✅ Checkout {} submitted {} propert(ies) after {} attempt(s)",
                    self.id,
                    request.properties.len(),
                    self.submit_attempts
                );
                Ok(SubmissionOutcome {
                    redirect_after: authorization_url.as_ref().map(|_| self.redirect_delay),
                    authorization_url,
                    request,
                })
            }
            Err(e) => {
                tracing::error!("🔥 Checkout {} submission failed: {}", self.id, e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn MarketplaceApi,
        token: &str,
        registry: &SelectionRegistry,
        today: NaiveDate,
    ) -> Result<SubmissionOutcome, ServiceError> {
        let request = self.begin_submit(registry, today)?;
        let result = api.submit_inspection(token, &request).await;
        self.finish_submit(request, result)
    }

    /// One step back; backing out of the selection step closes checkout.
    pub fn back(&mut self) -> WizardStatus {
        if !self.is_submitting {
            self.status = match self.status {
                WizardStatus::Open(CheckoutStep::Payment) => WizardStatus::Open(CheckoutStep::DateTime),
                WizardStatus::Open(CheckoutStep::DateTime) => WizardStatus::Open(CheckoutStep::Selection),
                WizardStatus::Open(CheckoutStep::Selection) => WizardStatus::Closed,
                other => other,
            };
        }
        self.status
    }

    pub fn close(&mut self) {
        if self.status != WizardStatus::Complete {
            self.status = WizardStatus::Closed;
        }
    }
}
