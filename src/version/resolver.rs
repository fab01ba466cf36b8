//! Latest upstream version lookup

use std::sync::Arc;

use chrono::DateTime;
use reqwest::header::HeaderMap;

use super::types::{CommitRecord, TagRecord, VersionScheme};
use crate::config::Endpoints;
use crate::error::{Result, UpdateError};
use crate::http::{HttpResponse, HttpTransport};

/// Fetches the newest upstream identifier for a versioning scheme
pub struct VersionResolver {
    transport: Arc<dyn HttpTransport>,
    commit_url: String,
    tag_url: String,
}

impl VersionResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: &Endpoints) -> Self {
        Self {
            transport,
            commit_url: endpoints.commit_url.clone(),
            tag_url: endpoints.tag_url.clone(),
        }
    }

    /// Resolve the latest identifier in the raw form of `scheme`
    ///
    /// The date scheme always yields a value or an error. The tag scheme
    /// yields `None` when upstream has no tags yet.
    pub async fn resolve(&self, scheme: VersionScheme) -> Result<Option<String>> {
        match scheme {
            VersionScheme::Date => {
                let response = self.fetch(&self.commit_url).await?;
                parse_latest_commit(&response).map(Some)
            }
            VersionScheme::Tag => {
                let response = self.fetch(&self.tag_url).await?;
                parse_latest_tag(&response)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<HttpResponse> {
        self.transport
            .get(url, HeaderMap::new())
            .await?
            .error_for_status()
    }
}

/// First commit's author date as an epoch-millisecond string
fn parse_latest_commit(response: &HttpResponse) -> Result<String> {
    let commits: Vec<CommitRecord> = response.json()?;
    let latest = commits
        .into_iter()
        .next()
        .ok_or_else(|| UpdateError::MalformedResponse("Commit list is empty".to_string()))?;

    let date = latest
        .commit
        .author
        .and_then(|author| author.date)
        .ok_or_else(|| {
            UpdateError::MalformedResponse("Latest commit has no author date".to_string())
        })?;

    let parsed = DateTime::parse_from_rfc3339(&date).map_err(|e| {
        UpdateError::MalformedResponse(format!("Invalid commit date '{date}': {e}"))
    })?;

    Ok(parsed.timestamp_millis().to_string())
}

fn parse_latest_tag(response: &HttpResponse) -> Result<Option<String>> {
    let tags: Vec<TagRecord> = response.json()?;
    Ok(tags.into_iter().next().map(|tag| tag.name))
}
