//! Version tracking
//!
//! Two versioning schemes are supported:
//! - `date`: builds are identified by the upstream commit time (epoch ms)
//! - `tag`: builds are identified by a released tag name

pub mod format;
pub mod resolver;
pub mod types;

pub use format::format_version;
pub use resolver::VersionResolver;
pub use types::{BuildVersion, VersionScheme};
