//! Quota and balance fetching
//!
//! - Primary metering API (used / total quota)
//! - Secondary billing endpoint (prepaid balance)

pub mod balance;
pub mod metering;
pub mod types;

pub use balance::BalanceClient;
pub use metering::{MeteringApi, OpenAiMetering};
pub use types::UsageReport;
