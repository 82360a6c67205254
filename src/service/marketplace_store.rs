// service/marketplace_store.rs
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    config::Config,
    dtos::propertydtos::SearchFilters,
    models::{
        inspectionmodel::CheckoutStep,
        propertymodel::{MarketTab, SelectedProperty, UploadFile},
        usermodel::UserSession,
    },
    service::{
        api_client::{ApiClient, MarketplaceApi},
        checkout_wizard::{CheckoutWizard, SubmissionOutcome},
        error::ServiceError,
        fee_calculator::{calculate_inspection_fee, FeeSchedule, InspectionFee},
        search_service::TabSearchState,
        selection::{SelectionAction, SelectionRegistry},
    },
    utils::{currency::parse_naira_amount, file_utils::validate_upload},
};

#[derive(Debug, Clone)]
pub struct TabState {
    pub search: TabSearchState,
    pub selection: SelectionRegistry,
}

impl TabState {
    fn new(tab: MarketTab, page_limit: u32) -> Self {
        Self {
            search: TabSearchState::new(tab, page_limit),
            selection: SelectionRegistry::new(tab),
        }
    }
}

fn tab_index(tab: MarketTab) -> usize {
    match tab {
        MarketTab::Buy => 0,
        MarketTab::Rent => 1,
        MarketTab::Jv => 2,
        MarketTab::Shortlet => 3,
    }
}

/// Owns every tab's search and selection state, the session and the open
/// checkout. Built with an injected `MarketplaceApi`, so it can be driven
/// without any UI.
pub struct MarketplaceStore {
    config: Config,
    api: Arc<dyn MarketplaceApi>,
    session: Option<UserSession>,
    tabs: [TabState; 4],
    checkout: Option<CheckoutWizard>,
}

impl MarketplaceStore {
    pub fn new(config: Config, api: Arc<dyn MarketplaceApi>) -> Self {
        let limit = config.search_page_limit;
        Self {
            tabs: MarketTab::ALL.map(|tab| TabState::new(tab, limit)),
            config,
            api,
            session: None,
            checkout: None,
        }
    }

    /// Store talking to the real backend at `config.api_base_url`.
    pub fn from_config(config: Config) -> Self {
        let api: Arc<dyn MarketplaceApi> = Arc::new(ApiClient::new(&config));
        Self::new(config, api)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub fn login(&mut self, session: UserSession) {
        tracing::info!("Session started for {}", session.email);
        self.session = Some(session);
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.checkout = None;
    }

    pub fn tab(&self, tab: MarketTab) -> &TabState {
        &self.tabs[tab_index(tab)]
    }

    fn tab_mut(&mut self, tab: MarketTab) -> &mut TabState {
        &mut self.tabs[tab_index(tab)]
    }

    pub fn selection(&self, tab: MarketTab) -> &SelectionRegistry {
        &self.tab(tab).selection
    }

    // ---- search ----

    pub async fn search(&mut self, tab: MarketTab, filters: SearchFilters) -> Result<(), ServiceError> {
        let api = self.api.clone();
        self.tab_mut(tab).search.search(api.as_ref(), filters).await
    }

    pub async fn set_page(&mut self, tab: MarketTab, page: u32) -> Result<(), ServiceError> {
        let api = self.api.clone();
        self.tab_mut(tab).search.set_page(api.as_ref(), page).await
    }

    pub async fn clear_filters(&mut self, tab: MarketTab) -> Result<(), ServiceError> {
        let api = self.api.clone();
        self.tab_mut(tab).search.clear_filters(api.as_ref()).await
    }

    pub async fn load_preference_matches(
        &mut self,
        tab: MarketTab,
        matched_id: &str,
        preference_id: &str,
    ) -> Result<(), ServiceError> {
        let api = self.api.clone();
        self.tab_mut(tab)
            .search
            .load_matches(api.as_ref(), matched_id, preference_id)
            .await
    }

    // ---- selection ----

    /// Applies one selection transition. The registry is swapped whole, so a
    /// failed transition leaves it untouched.
    pub fn dispatch(&mut self, tab: MarketTab, action: SelectionAction) -> Result<&SelectionRegistry, ServiceError> {
        let state = self.tab_mut(tab);
        let next = state.selection.apply(action)?;
        state.selection = next;
        Ok(&state.selection)
    }

    /// Toggles a listing from the tab's current results, tagging it with
    /// where the results came from.
    pub fn toggle_listing(&mut self, tab: MarketTab, property_id: &str) -> Result<&SelectionRegistry, ServiceError> {
        let state = self.tab(tab);
        let selected = match state.selection.get(property_id) {
            Some(existing) => existing.clone(),
            None => {
                let property = state.search.find(property_id).cloned().ok_or_else(|| {
                    ServiceError::Validation(format!("Property {} is not in the current results", property_id))
                })?;
                let source = state.search.source();
                SelectedProperty::new(property, tab).with_source(source.page.clone(), source.meta.clone())
            }
        };
        self.dispatch(tab, SelectionAction::Toggle(selected))
    }

    pub fn toggle_selection(
        &mut self,
        tab: MarketTab,
        property: SelectedProperty,
    ) -> Result<&SelectionRegistry, ServiceError> {
        self.dispatch(tab, SelectionAction::Toggle(property))
    }

    pub fn remove_selection(&mut self, tab: MarketTab, property_id: &str) -> Result<&SelectionRegistry, ServiceError> {
        self.dispatch(tab, SelectionAction::Remove(property_id.to_string()))
    }

    pub fn clear_selection(&mut self, tab: MarketTab) -> Result<&SelectionRegistry, ServiceError> {
        self.dispatch(tab, SelectionAction::Clear)
    }

    pub fn can_select(&self, tab: MarketTab, property_id: &str) -> bool {
        self.selection(tab).can_select(property_id)
    }

    pub fn set_negotiated_price(
        &mut self,
        tab: MarketTab,
        property_id: &str,
        negotiated_price: i64,
    ) -> Result<&SelectionRegistry, ServiceError> {
        self.dispatch(
            tab,
            SelectionAction::SetNegotiatedPrice {
                property_id: property_id.to_string(),
                negotiated_price,
            },
        )
    }

    /// Negotiated price as typed by the user, e.g. `4,500,000` or `₦4500000`.
    pub fn negotiate_price(
        &mut self,
        tab: MarketTab,
        property_id: &str,
        amount: &str,
    ) -> Result<&SelectionRegistry, ServiceError> {
        let negotiated_price = parse_naira_amount(amount)?;
        self.set_negotiated_price(tab, property_id, negotiated_price)
    }

    pub fn clear_negotiated_price(&mut self, tab: MarketTab, property_id: &str) -> Result<&SelectionRegistry, ServiceError> {
        self.dispatch(tab, SelectionAction::ClearNegotiatedPrice(property_id.to_string()))
    }

    /// Attaches a Letter of Intent to a selected joint-venture property. The
    /// document is uploaded when the inspection is submitted.
    pub fn attach_loi(
        &mut self,
        tab: MarketTab,
        property_id: &str,
        mut document: UploadFile,
    ) -> Result<&SelectionRegistry, ServiceError> {
        let content_type = validate_upload(&document, self.config.max_upload_size_mb)?;
        document.content_type = content_type.to_string();
        self.dispatch(
            tab,
            SelectionAction::AttachLoi {
                property_id: property_id.to_string(),
                document,
            },
        )
    }

    pub fn inspection_fee(&self, tab: MarketTab) -> InspectionFee {
        calculate_inspection_fee(self.selection(tab).selected(), FeeSchedule::from_config(&self.config))
    }

    // ---- checkout ----

    pub fn open_checkout(&mut self, tab: MarketTab) -> Result<&mut CheckoutWizard, ServiceError> {
        let session = self.session.as_ref().ok_or(ServiceError::NotAuthenticated)?;
        let mut wizard = CheckoutWizard::open(tab, &self.config);
        wizard.set_buyer_info(session.buyer_info());
        Ok(self.checkout.insert(wizard))
    }

    pub fn checkout(&self) -> Option<&CheckoutWizard> {
        self.checkout.as_ref()
    }

    pub fn checkout_mut(&mut self) -> Option<&mut CheckoutWizard> {
        self.checkout.as_mut()
    }

    /// Moves the open checkout forward one step.
    pub fn checkout_next(&mut self, today: NaiveDate) -> Result<CheckoutStep, ServiceError> {
        let wizard = self.checkout.as_mut().ok_or(ServiceError::WizardNotOpen)?;
        let registry = &self.tabs[tab_index(wizard.tab())].selection;

        match wizard.step() {
            Some(CheckoutStep::Selection) => wizard.proceed_to_datetime(registry)?,
            Some(CheckoutStep::DateTime) => wizard.proceed_to_payment(today)?,
            Some(CheckoutStep::Payment) => {
                return Err(ServiceError::Validation(
                    "Submit the inspection request to finish checkout".to_string(),
                ))
            }
            None => return Err(ServiceError::WizardNotOpen),
        }
        wizard.step().ok_or(ServiceError::WizardNotOpen)
    }

    pub async fn upload_receipt(&mut self, file: UploadFile) -> Result<String, ServiceError> {
        let token = self
            .session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ServiceError::NotAuthenticated)?;
        let wizard = self.checkout.as_mut().ok_or(ServiceError::WizardNotOpen)?;
        wizard.upload_receipt(self.api.as_ref(), &token, file).await
    }

    /// Checks the whole form, uploads outstanding LOI documents, submits the
    /// inspection and, on success, clears the tab's selection. Nothing is
    /// sent while any local check fails.
    pub async fn submit_checkout(&mut self, today: NaiveDate) -> Result<SubmissionOutcome, ServiceError> {
        let Self {
            api,
            session,
            tabs,
            checkout,
            ..
        } = self;

        let wizard = checkout.as_mut().ok_or(ServiceError::WizardNotOpen)?;
        if wizard.is_submitting() {
            return Err(ServiceError::AlreadySubmitting);
        }
        let token = session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ServiceError::NotAuthenticated)?;
        let tab = wizard.tab();
        let state = &mut tabs[tab_index(tab)];

        wizard.validate_for_submit(&state.selection, today)?;

        let pending: Vec<(String, UploadFile)> = state
            .selection
            .pending_loi_uploads()
            .into_iter()
            .filter_map(|loi| loi.document.clone().map(|doc| (loi.property_id.clone(), doc)))
            .collect();

        for (property_id, document) in pending {
            let uploaded = api.upload_file(&token, &document).await?;
            tracing::debug!("LOI for {} uploaded", property_id);
            let next = state.selection.apply(SelectionAction::SetLoiUrl {
                property_id,
                url: uploaded.url,
            })?;
            state.selection = next;
        }

        let outcome = wizard.submit(api.as_ref(), &token, &state.selection, today).await?;
        state.selection = state.selection.apply(SelectionAction::Clear)?;
        Ok(outcome)
    }

    pub fn close_checkout(&mut self) {
        if let Some(wizard) = self.checkout.as_mut() {
            wizard.close();
        }
        self.checkout = None;
    }
}
