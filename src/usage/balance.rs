//! Secondary billing endpoint (prepaid balance)

use std::sync::Arc;

use super::types::CreditGrantsResponse;
use crate::error::Result;
use crate::http::{HeaderSource, HttpTransport};

/// Fetches the prepaid balance; every call hits the endpoint
pub struct BalanceClient {
    transport: Arc<dyn HttpTransport>,
    headers: Arc<dyn HeaderSource>,
    url: String,
}

impl BalanceClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        headers: Arc<dyn HeaderSource>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            headers,
            url: url.into(),
        }
    }

    /// Current `total_available` balance
    pub async fn fetch_balance(&self) -> Result<f64> {
        let response = self
            .transport
            .get(&self.url, self.headers.headers()?)
            .await?
            .error_for_status()?;

        let grants: CreditGrantsResponse = response.json()?;
        Ok(grants.total_available)
    }
}
