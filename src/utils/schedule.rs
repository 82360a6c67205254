// utils/schedule.rs
use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::service::error::ServiceError;

/// Hourly inspection slots within business hours.
pub const TIME_SLOTS: [&str; 9] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "1:00 PM", "2:00 PM", "3:00 PM", "4:00 PM",
    "5:00 PM",
];

/// Sundays are reserved; every other day takes inspections.
pub fn is_operating_day(date: NaiveDate) -> bool {
    date.weekday() != Weekday::Sun
}

/// Upper bound on the booking lead time, in days.
pub const MAX_LEAD_DAYS: i64 = 365;

// `today` plus the lead, with the lead clamped to 0..=MAX_LEAD_DAYS.
fn lead_cutoff(today: NaiveDate, min_lead_days: i64) -> NaiveDate {
    let lead = Duration::days(min_lead_days.clamp(0, MAX_LEAD_DAYS));
    today.checked_add_signed(lead).unwrap_or(NaiveDate::MAX)
}

/// First bookable date: `min_lead_days` after today, pushed past a Sunday.
pub fn earliest_inspection_date(today: NaiveDate, min_lead_days: i64) -> NaiveDate {
    let mut date = lead_cutoff(today, min_lead_days);
    while !is_operating_day(date) {
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    date
}

/// The next `count` bookable dates, in order.
pub fn available_dates(today: NaiveDate, min_lead_days: i64, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut date = Some(earliest_inspection_date(today, min_lead_days));
    while let Some(current) = date {
        if dates.len() >= count {
            break;
        }
        if is_operating_day(current) {
            dates.push(current);
        }
        date = current.succ_opt();
    }
    dates
}

pub fn validate_inspection_date(
    date: NaiveDate,
    today: NaiveDate,
    min_lead_days: i64,
) -> Result<(), ServiceError> {
    if date < lead_cutoff(today, min_lead_days) {
        return Err(ServiceError::Validation(format!(
            "Inspection date must be at least {} days from today",
            min_lead_days.clamp(0, MAX_LEAD_DAYS)
        )));
    }
    if !is_operating_day(date) {
        return Err(ServiceError::Validation(
            "Inspections are not available on Sundays".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_time_slot(slot: &str) -> Result<(), ServiceError> {
    let slot = slot.trim();
    if TIME_SLOTS.iter().any(|s| s.eq_ignore_ascii_case(slot)) {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!("{} is not an available time slot", slot)))
    }
}
