//! Data provider configuration.
//!
//! [`ProviderConfig`] holds everything the `Identify` verb advertises plus
//! the knobs the dispatcher needs (set support, paging, token lifetime). It
//! is a plain read-only value handed to the provider at construction time.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!   "repositoryName": "Sample Repository",
//!   "baseUrl": "http://example.org/oai",
//!   "earliestDatestamp": "2000-01-01T00:00:00Z",
//!   "deletedRecord": "persistent",
//!   "granularity": "YYYY-MM-DDThh:mm:ssZ",
//!   "adminEmails": ["admin@example.org"],
//!   "supportsSets": true
//! }
//! ```

use crate::datestamp::Granularity;
use crate::error::{BuildError, BuildResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a repository reports deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletedRecordPolicy {
    /// Deletions are not tracked
    #[default]
    No,
    /// Deletions are kept forever
    Persistent,
    /// Deletions may be forgotten
    Transient,
}

impl DeletedRecordPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletedRecordPolicy::No => "no",
            DeletedRecordPolicy::Persistent => "persistent",
            DeletedRecordPolicy::Transient => "transient",
        }
    }
}

impl fmt::Display for DeletedRecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub repository_name: String,

    /// Base URL of the OAI-PMH endpoint, echoed in every `<request>`.
    pub base_url: String,

    pub protocol_version: String,

    pub earliest_datestamp: DateTime<Utc>,

    #[serde(rename = "deletedRecord")]
    pub deleted_record_policy: DeletedRecordPolicy,

    pub granularity: Granularity,

    pub admin_emails: Vec<String>,

    pub compressions: Vec<String>,

    /// Pre-rendered `<description>` contents.
    pub descriptions: Vec<String>,

    /// Whether records may be filtered by set.
    pub supports_sets: bool,

    /// Lifetime of issued resumption tokens, in seconds.
    pub resumption_token_ttl_secs: u64,

    /// Maximum number of records per list page.
    pub page_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            repository_name: "OAI-PMH Repository".to_string(),
            base_url: "http://localhost/oai".to_string(),
            protocol_version: "2.0".to_string(),
            earliest_datestamp: Utc
                .timestamp_opt(0, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            deleted_record_policy: DeletedRecordPolicy::No,
            granularity: Granularity::Seconds,
            admin_emails: Vec::new(),
            compressions: Vec::new(),
            descriptions: Vec::new(),
            supports_sets: false,
            resumption_token_ttl_secs: 3600,
            page_size: 100,
        }
    }
}

impl ProviderConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> BuildResult<Self> {
        let config: ProviderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Lifetime of issued resumption tokens.
    pub fn resumption_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.resumption_token_ttl_secs).unwrap_or(i64::MAX))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BuildResult<()> {
        if self.repository_name.trim().is_empty() {
            return Err(BuildError::invalid("Repository name cannot be empty"));
        }

        if self.base_url.is_empty() {
            return Err(BuildError::invalid("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(BuildError::invalid(
                "Base URL must start with http:// or https://",
            ));
        }

        if self.protocol_version.trim().is_empty() {
            return Err(BuildError::invalid("Protocol version cannot be empty"));
        }

        if self.page_size == 0 {
            return Err(BuildError::invalid("Page size must be at least 1"));
        }

        if self.resumption_token_ttl_secs == 0 || self.resumption_token_ttl_secs > i64::MAX as u64
        {
            return Err(BuildError::invalid(
                "Resumption token lifetime must be positive",
            ));
        }

        Ok(())
    }
}
