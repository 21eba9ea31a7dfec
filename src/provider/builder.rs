//! Builder for configuring data provider instances.

use crate::config::{DeletedRecordPolicy, ProviderConfig};
use crate::datestamp::{DateConverter, Granularity, UtcDateConverter};
use crate::error::BuildResult;
use crate::provider::core::DataProvider;
use crate::repository::{MetadataFormatRepository, RecordRepository};
use std::sync::Arc;

/// Builder for [`DataProvider`].
///
/// Starts from [`ProviderConfig::default`] and validates the final
/// configuration in [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use oai_pmh_provider::DataProviderBuilder;
/// use oai_pmh_provider::datestamp::Granularity;
/// use oai_pmh_provider::repository::{InMemoryFormatRepository, InMemoryRecordRepository};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = DataProviderBuilder::new(
///     InMemoryRecordRepository::default(),
///     InMemoryFormatRepository::new(),
/// )
/// .with_repository_name("Sample")
/// .with_base_url("https://example.org/oai")
/// .with_granularity(Granularity::Day)
/// .with_admin_email("admin@example.org")
/// .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DataProviderBuilder<R, F> {
    records: R,
    formats: F,
    config: ProviderConfig,
    dates: Arc<dyn DateConverter>,
}

impl<R: RecordRepository, F: MetadataFormatRepository> DataProviderBuilder<R, F> {
    /// Create a builder with default configuration.
    pub fn new(records: R, formats: F) -> Self {
        Self {
            records,
            formats,
            config: ProviderConfig::default(),
            dates: Arc::new(UtcDateConverter),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_repository_name(mut self, name: impl Into<String>) -> Self {
        self.config.repository_name = name.into();
        self
    }

    /// Set the base URL echoed in every response.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.config.granularity = granularity;
        self
    }

    pub fn with_deleted_record_policy(mut self, policy: DeletedRecordPolicy) -> Self {
        self.config.deleted_record_policy = policy;
        self
    }

    pub fn with_admin_email(mut self, email: impl Into<String>) -> Self {
        self.config.admin_emails.push(email.into());
        self
    }

    /// Allow the `set` argument on list requests.
    pub fn with_sets(mut self, supported: bool) -> Self {
        self.config.supports_sets = supported;
        self
    }

    /// Use a custom date converter (and clock).
    pub fn with_date_converter(mut self, dates: Arc<dyn DateConverter>) -> Self {
        self.dates = dates;
        self
    }

    /// Build the configured provider.
    ///
    /// # Errors
    ///
    /// Returns a `BuildError` if the configuration is invalid.
    pub fn build(self) -> BuildResult<DataProvider<R, F>> {
        DataProvider::with_date_converter(self.config, self.records, self.formats, self.dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryFormatRepository, InMemoryRecordRepository};

    #[test]
    fn test_builder_pattern() {
        let provider = DataProviderBuilder::new(
            InMemoryRecordRepository::default(),
            InMemoryFormatRepository::new(),
        )
        .with_repository_name("Sample")
        .with_base_url("https://example.org/oai")
        .with_sets(true)
        .with_deleted_record_policy(DeletedRecordPolicy::Persistent)
        .build()
        .unwrap();

        assert_eq!(provider.config().repository_name, "Sample");
        assert!(provider.config().supports_sets);
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = DataProviderBuilder::new(
            InMemoryRecordRepository::default(),
            InMemoryFormatRepository::new(),
        )
        .with_base_url("not-a-url")
        .build();
        assert!(result.is_err());
    }
}
