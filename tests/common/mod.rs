//! Shared fixtures for integration tests

use chrono::{Duration, TimeZone, Utc};
use payment_search::models::{Amount, GlResponse, PaymentRecord};

/// Build a payment record with sensible defaults, `days_ago` before a fixed
/// reference instant so ordering is deterministic across runs
pub fn record(id: &str, psp: &str, scheme: &str, country: &str, days_ago: i64) -> PaymentRecord {
    PaymentRecord {
        grab_link_id: id.to_string(),
        psp: psp.to_string(),
        transaction_date: Utc.with_ymd_and_hms(2025, 5, 26, 12, 0, 0).unwrap()
            - Duration::days(days_ago),
        scheme: scheme.to_string(),
        amount: Amount {
            value: 250.0,
            currency: "MYR".to_string(),
        },
        gl_response: GlResponse {
            code: 50000.0,
            status: "50000 - Success".to_string(),
        },
        bin: "457812".to_string(),
        last4: "4242".to_string(),
        customer_email: "jane.doe@example.com".to_string(),
        merchant_name: "Acme Sdn Bhd".to_string(),
        transaction_type: "capture".to_string(),
        country_code: country.to_string(),
    }
}
