//! Primary metering API client

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Utc};
use reqwest::StatusCode;

use super::types::{BillingSubscriptionResponse, BillingUsageResponse, UsageReport};
use crate::config::OPENAI_BASE_URL;
use crate::error::{Result, UpdateError};
use crate::http::{HeaderSource, HttpTransport};

/// Reports quota usage for the current billing period
#[async_trait]
pub trait MeteringApi: Send + Sync {
    /// `None` when the backend does not report usage
    async fn usage(&self) -> Result<Option<UsageReport>>;
}

/// Metering client for OpenAI-compatible billing dashboards
pub struct OpenAiMetering {
    transport: Arc<dyn HttpTransport>,
    headers: Arc<dyn HeaderSource>,
    base_url: String,
}

impl OpenAiMetering {
    pub fn new(transport: Arc<dyn HttpTransport>, headers: Arc<dyn HeaderSource>) -> Self {
        Self::with_base_url(transport, headers, OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        transport: Arc<dyn HttpTransport>,
        headers: Arc<dyn HeaderSource>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            headers,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn usage_url(&self, today: NaiveDate) -> String {
        let (start, end) = billing_range(today);
        format!(
            "{}/dashboard/billing/usage?start_date={}&end_date={}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    fn subscription_url(&self) -> String {
        format!("{}/dashboard/billing/subscription", self.base_url)
    }
}

#[async_trait]
impl MeteringApi for OpenAiMetering {
    async fn usage(&self) -> Result<Option<UsageReport>> {
        let today = Utc::now().date_naive();

        let used = self
            .transport
            .get(&self.usage_url(today), self.headers.headers()?)
            .await?;
        let subscription = self
            .transport
            .get(&self.subscription_url(), self.headers.headers()?)
            .await?;

        if used.status == StatusCode::UNAUTHORIZED {
            return Err(UpdateError::Unauthorized(
                "Metering API rejected the access token".to_string(),
            ));
        }
        if !used.status.is_success() || !subscription.status.is_success() {
            return Err(UpdateError::Network(format!(
                "Failed to query usage: status {} / {}",
                used.status, subscription.status
            )));
        }

        let usage: BillingUsageResponse = used.json()?;
        let limit: BillingSubscriptionResponse = subscription.json()?;

        if let Some(error) = usage.error {
            if error.kind.is_some() {
                return Err(UpdateError::Network(
                    error
                        .message
                        .unwrap_or_else(|| "Unknown billing error".to_string()),
                ));
            }
        }

        Ok(to_report(usage.total_usage, limit.hard_limit_usd))
    }
}

/// First day of the current month through tomorrow
fn billing_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let end = today.checked_add_days(Days::new(1)).unwrap_or(today);
    (start, end)
}

/// Usage is reported in cents, the limit in dollars
fn to_report(total_usage: Option<f64>, hard_limit_usd: Option<f64>) -> Option<UsageReport> {
    let used = total_usage?.round() / 100.0;
    let total = (hard_limit_usd? * 100.0).round() / 100.0;
    Some(UsageReport { used, total })
}
