/// Currency helpers for naira amounts.
///
/// Listing prices and inspection fees are whole naira, held as `i64`.
use crate::service::error::ServiceError;

/// Format a naira amount with thousands separators, e.g. `₦15,000`.
pub fn format_naira(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-₦{}", grouped)
    } else {
        format!("₦{}", grouped)
    }
}

/// Parse a user-typed amount such as `4,500,000` or `₦4500000`.
pub fn parse_naira_amount(input: &str) -> Result<i64, ServiceError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('₦')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let amount = cleaned
        .parse::<i64>()
        .map_err(|_| ServiceError::Validation("Invalid amount format".to_string()))?;

    if amount <= 0 {
        return Err(ServiceError::Validation("Amount must be greater than zero".to_string()));
    }
    Ok(amount)
}
