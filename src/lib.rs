//! OAI-PMH 2.0 data provider library for Rust.
//!
//! Turns a request's argument set into a complete, schema-conformant
//! OAI-PMH response document. Storage is pluggable: the provider consumes
//! a record repository and a metadata format repository and never indexes
//! records itself.
//!
//! # Core Components
//!
//! - [`DataProvider`] - Verb dispatcher producing [`OaiResponse`] documents
//! - [`RecordRepository`] - Trait for implementing record storage backends
//! - [`ResumptionToken`] - Stateless continuation of list requests
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use oai_pmh_provider::{DataProviderBuilder, model::MetadataFormat};
//! use oai_pmh_provider::repository::{InMemoryFormatRepository, InMemoryRecordRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let formats = InMemoryFormatRepository::new();
//! formats.insert(MetadataFormat::oai_dc()).await;
//!
//! let provider = DataProviderBuilder::new(InMemoryRecordRepository::default(), formats)
//!     .with_repository_name("Sample")
//!     .with_base_url("http://example.org/oai")
//!     .build()?;
//!
//! let response = provider.handle_pairs([("verb", "Identify")]).await?;
//! println!("{}", response.to_xml_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod datestamp;
pub mod document;
pub mod error;
pub mod model;
pub mod provider;
pub mod repository;
pub mod request;
pub mod resumption;
pub mod validation;
pub mod xml;

// Re-export commonly used types for convenience
pub use config::{DeletedRecordPolicy, ProviderConfig};
pub use datestamp::{DateConverter, Datestamp, Granularity, UtcDateConverter};
pub use document::OaiResponse;
pub use error::{BuildError, BuildResult, OaiError, OaiResult, ProviderError, ProviderResult};
pub use provider::{DataProvider, DataProviderBuilder};
pub use repository::{ListQuery, MetadataFormatRepository, RecordRepository};
pub use request::{Argument, ArgumentSet, Verb};
pub use resumption::{ResumptionToken, TokenError};
