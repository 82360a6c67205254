// config.rs
use std::time::Duration;

use dotenv::dotenv;

use crate::utils::schedule::MAX_LEAD_DAYS;

const DEFAULT_BASE_FEE: i64 = 10_000;
const DEFAULT_LGA_SURCHARGE: i64 = 5_000;
const DEFAULT_RECEIPT_MAX_SIZE_MB: usize = 5;
const DEFAULT_MIN_LEAD_DAYS: i64 = 3;
const DEFAULT_PAGE_LIMIT: u32 = 12;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    // Inspection pricing, in naira
    pub inspection_base_fee: i64,
    pub inspection_lga_surcharge: i64,
    // Uploads
    pub max_upload_size_mb: usize,
    // Scheduling
    pub min_lead_days: i64,
    pub search_page_limit: u32,
    pub payment_redirect_delay: Duration,
}

impl Config {
    /// Reads configuration from the environment, after loading `.env` if
    /// one is present.
    pub fn init() -> Config {
        dotenv().ok();

        let api_base_url = std::env::var("API_BASE_URL").expect("API_BASE_URL must be set");

        let inspection_base_fee = env_or("INSPECTION_BASE_FEE", DEFAULT_BASE_FEE);
        let inspection_lga_surcharge = env_or("INSPECTION_LGA_SURCHARGE", DEFAULT_LGA_SURCHARGE);
        let max_upload_size_mb = env_or("RECEIPT_MAX_SIZE_MB", DEFAULT_RECEIPT_MAX_SIZE_MB);
        let min_lead_days = env_or("INSPECTION_MIN_LEAD_DAYS", DEFAULT_MIN_LEAD_DAYS).clamp(0, MAX_LEAD_DAYS);
        let search_page_limit = env_or("SEARCH_PAGE_LIMIT", DEFAULT_PAGE_LIMIT);
        let redirect_delay_ms = env_or("PAYMENT_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS);

        Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            inspection_base_fee,
            inspection_lga_surcharge,
            max_upload_size_mb,
            min_lead_days,
            search_page_limit,
            payment_redirect_delay: Duration::from_millis(redirect_delay_ms),
        }
    }

    /// Same defaults as `init`, without reading the environment.
    pub fn new(api_base_url: impl Into<String>) -> Config {
        let api_base_url: String = api_base_url.into();
        Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            inspection_base_fee: DEFAULT_BASE_FEE,
            inspection_lga_surcharge: DEFAULT_LGA_SURCHARGE,
            max_upload_size_mb: DEFAULT_RECEIPT_MAX_SIZE_MB,
            min_lead_days: DEFAULT_MIN_LEAD_DAYS,
            search_page_limit: DEFAULT_PAGE_LIMIT,
            payment_redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("⚠️  {} has an invalid value ({}), using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
