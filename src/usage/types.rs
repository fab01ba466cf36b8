use serde::{Deserialize, Serialize};

/// Quota usage from the primary metering API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// Amount used in the current billing period
    pub used: f64,
    /// Hard limit for the billing period
    pub total: f64,
}

/// Usage response (amounts in cents)
#[derive(Debug, Clone, Deserialize)]
pub struct BillingUsageResponse {
    pub total_usage: Option<f64>,
    pub error: Option<BillingApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingApiError {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
}

/// Subscription response
#[derive(Debug, Clone, Deserialize)]
pub struct BillingSubscriptionResponse {
    pub hard_limit_usd: Option<f64>,
}

/// Secondary billing endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct CreditGrantsResponse {
    pub total_available: f64,
}
