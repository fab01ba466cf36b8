use serde::{Deserialize, Serialize};

use super::format::format_version;

/// Which versioning scheme identifies builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionScheme {
    /// Upstream commit timestamp, raw form is epoch milliseconds
    Date,
    /// Release tag name
    #[default]
    Tag,
}

/// A raw version identifier tagged with its scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildVersion {
    Date(String),
    Tag(String),
}

impl BuildVersion {
    pub fn new(scheme: VersionScheme, raw: impl Into<String>) -> Self {
        match scheme {
            VersionScheme::Date => Self::Date(raw.into()),
            VersionScheme::Tag => Self::Tag(raw.into()),
        }
    }

    pub fn scheme(&self) -> VersionScheme {
        match self {
            Self::Date(_) => VersionScheme::Date,
            Self::Tag(_) => VersionScheme::Tag,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Date(raw) | Self::Tag(raw) => raw,
        }
    }

    /// Comparable display form (`YYYYMMDD` for dates, the tag otherwise)
    pub fn display(&self) -> String {
        format_version(self.scheme(), self.raw())
    }
}

/// Commit record from the commit-list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetails {
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    /// RFC 3339 author date
    pub date: Option<String>,
}

/// Tag record from the tag-list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TagRecord {
    pub name: String,
}
