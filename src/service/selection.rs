// service/selection.rs
use std::collections::HashMap;

use crate::{
    models::propertymodel::{LoiDocument, MarketTab, NegotiatedPrice, SelectedProperty, UploadFile},
    service::error::ServiceError,
};

/// Most properties a tab can hold for a single inspection.
pub const MAX_SELECTION: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    Toggle(SelectedProperty),
    Remove(String),
    Clear,
    SetNegotiatedPrice { property_id: String, negotiated_price: i64 },
    ClearNegotiatedPrice(String),
    AttachLoi { property_id: String, document: UploadFile },
    SetLoiUrl { property_id: String, url: String },
}

/// Per-tab selection state. Transitions never mutate in place: `apply`
/// returns the next full state, so removal and its cascade land together.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRegistry {
    tab: MarketTab,
    selected: Vec<SelectedProperty>,
    negotiated_prices: HashMap<String, NegotiatedPrice>,
    loi_documents: HashMap<String, LoiDocument>,
}

impl SelectionRegistry {
    pub fn new(tab: MarketTab) -> Self {
        Self {
            tab,
            selected: Vec::new(),
            negotiated_prices: HashMap::new(),
            loi_documents: HashMap::new(),
        }
    }

    pub fn tab(&self) -> MarketTab {
        self.tab
    }

    pub fn selected(&self) -> &[SelectedProperty] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() >= MAX_SELECTION
    }

    pub fn contains(&self, property_id: &str) -> bool {
        self.selected.iter().any(|p| p.property_id == property_id)
    }

    /// Whether the "select for inspection" control should be enabled.
    pub fn can_select(&self, property_id: &str) -> bool {
        self.contains(property_id) || !self.is_full()
    }

    pub fn get(&self, property_id: &str) -> Option<&SelectedProperty> {
        self.selected.iter().find(|p| p.property_id == property_id)
    }

    pub fn negotiated_price(&self, property_id: &str) -> Option<&NegotiatedPrice> {
        self.negotiated_prices.get(property_id)
    }

    pub fn loi_document(&self, property_id: &str) -> Option<&LoiDocument> {
        self.loi_documents.get(property_id)
    }

    pub fn negotiated_prices(&self) -> impl Iterator<Item = &NegotiatedPrice> {
        self.negotiated_prices.values()
    }

    pub fn loi_documents(&self) -> impl Iterator<Item = &LoiDocument> {
        self.loi_documents.values()
    }

    /// LOI documents picked locally but not uploaded yet.
    pub fn pending_loi_uploads(&self) -> Vec<&LoiDocument> {
        self.selected
            .iter()
            .filter_map(|p| self.loi_documents.get(&p.property_id))
            .filter(|loi| loi.needs_upload())
            .collect()
    }

    pub fn apply(&self, action: SelectionAction) -> Result<SelectionRegistry, ServiceError> {
        match action {
            SelectionAction::Toggle(property) => self.toggle(property),
            SelectionAction::Remove(property_id) => Ok(self.clone().without(&property_id)),
            SelectionAction::Clear => Ok(SelectionRegistry::new(self.tab)),
            SelectionAction::SetNegotiatedPrice {
                property_id,
                negotiated_price,
            } => self.set_negotiated_price(property_id, negotiated_price),
            SelectionAction::ClearNegotiatedPrice(property_id) => {
                let mut next = self.clone();
                next.negotiated_prices.remove(&property_id);
                Ok(next)
            }
            SelectionAction::AttachLoi { property_id, document } => self.attach_loi(property_id, document),
            SelectionAction::SetLoiUrl { property_id, url } => self.set_loi_url(property_id, url),
        }
    }

    fn toggle(&self, property: SelectedProperty) -> Result<SelectionRegistry, ServiceError> {
        if self.contains(&property.property_id) {
            return Ok(self.clone().without(&property.property_id));
        }
        if property.source_tab != self.tab {
            return Err(ServiceError::Validation(format!(
                "Property {} belongs to the {:?} tab",
                property.property_id, property.source_tab
            )));
        }
        if self.is_full() {
            tracing::debug!(
                "Selection on {:?} is full, refusing {}",
                self.tab,
                property.property_id
            );
            return Err(ServiceError::MaxSelectionReached { max: MAX_SELECTION });
        }

        let mut next = self.clone();
        next.selected.push(property);
        Ok(next)
    }

    // Removal always takes the property's negotiated price and LOI with it.
    fn without(mut self, property_id: &str) -> SelectionRegistry {
        self.selected.retain(|p| p.property_id != property_id);
        self.negotiated_prices.remove(property_id);
        self.loi_documents.remove(property_id);
        self
    }

    fn set_negotiated_price(
        &self,
        property_id: String,
        negotiated_price: i64,
    ) -> Result<SelectionRegistry, ServiceError> {
        if !self.tab.supports_negotiation() {
            return Err(ServiceError::UnsupportedForTab {
                tab: self.tab,
                action: "Price negotiation",
            });
        }
        let original_price = self
            .get(&property_id)
            .map(|p| p.property.price)
            .ok_or_else(|| ServiceError::PropertyNotSelected(property_id.clone()))?;

        if negotiated_price <= 0 {
            return Err(ServiceError::Validation(
                "Negotiated price must be greater than zero".to_string(),
            ));
        }
        if negotiated_price > original_price {
            return Err(ServiceError::NegotiatedPriceTooHigh {
                original: original_price,
                negotiated: negotiated_price,
            });
        }

        let mut next = self.clone();
        next.negotiated_prices.insert(
            property_id.clone(),
            NegotiatedPrice {
                property_id,
                original_price,
                negotiated_price,
            },
        );
        Ok(next)
    }

    fn attach_loi(&self, property_id: String, document: UploadFile) -> Result<SelectionRegistry, ServiceError> {
        if !self.tab.supports_loi() {
            return Err(ServiceError::UnsupportedForTab {
                tab: self.tab,
                action: "Letter of Intent",
            });
        }
        if !self.contains(&property_id) {
            return Err(ServiceError::PropertyNotSelected(property_id));
        }

        let mut next = self.clone();
        next.loi_documents.insert(
            property_id.clone(),
            LoiDocument {
                property_id,
                document: Some(document),
                document_url: None,
            },
        );
        Ok(next)
    }

    fn set_loi_url(&self, property_id: String, url: String) -> Result<SelectionRegistry, ServiceError> {
        if !self.contains(&property_id) {
            return Err(ServiceError::PropertyNotSelected(property_id));
        }

        let mut next = self.clone();
        let loi = next
            .loi_documents
            .entry(property_id.clone())
            .or_insert_with(|| LoiDocument {
                property_id,
                document: None,
                document_url: None,
            });
        loi.document_url = Some(url);
        Ok(next)
    }
}
