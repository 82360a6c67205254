pub mod api_client;
pub mod checkout_wizard;
pub mod error;
pub mod fee_calculator;
pub mod marketplace_store;
pub mod receipt_upload;
pub mod search_service;
pub mod selection;

#[cfg(test)]
pub mod mock_api;
