//! Payment transaction record as stored in the search index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monetary amount with its currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    /// Transaction value (indexed as both integer and double)
    pub value: f64,

    /// ISO currency code (e.g. "MYR", "SGD")
    pub currency: String,
}

/// Gateway/ledger response attached to a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlResponse {
    /// Numeric response code (e.g. 50000)
    pub code: f64,

    /// Human-readable status (e.g. "50000 - Success")
    pub status: String,
}

/// One payment transaction record
///
/// Field names follow the index mapping, so this type serializes directly
/// into the wire shape exchanged with the retrieval engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Unique link identifier; also the stable pagination tie-breaker
    #[serde(rename = "grabLinkID")]
    pub grab_link_id: String,

    /// Payment service provider (e.g. "MaybankV2", "StripeDirect")
    pub psp: String,

    /// When the transaction happened
    pub transaction_date: DateTime<Utc>,

    /// Card scheme short code (e.g. "visa", "mc")
    pub scheme: String,

    pub amount: Amount,

    pub gl_response: GlResponse,

    /// First six digits of the card number
    pub bin: String,

    /// Last four digits of the card number
    pub last4: String,

    pub customer_email: String,

    pub merchant_name: String,

    /// capture / authorize / refund / void
    pub transaction_type: String,

    /// ISO country code (e.g. "MY", "SG")
    pub country_code: String,
}
