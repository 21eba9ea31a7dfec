//! OAI-PMH verb dispatcher.
//!
//! This module turns an argument set into a complete response document:
//! it classifies the verb, validates the arguments, queries the two
//! repositories and renders either the verb payload or a single error.
//!
//! # Key Types
//!
//! - [`DataProvider`] - Main dispatcher for processing requests
//! - [`DataProviderBuilder`] - Fluent construction with validated configuration
//!
//! # Examples
//!
//! ```rust
//! use oai_pmh_provider::{DataProvider, ProviderConfig};
//! use oai_pmh_provider::repository::{InMemoryFormatRepository, InMemoryRecordRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = DataProvider::new(
//!     ProviderConfig::default(),
//!     InMemoryRecordRepository::default(),
//!     InMemoryFormatRepository::new(),
//! )?;
//!
//! let response = provider
//!     .handle_pairs([("verb", "ListMetadataFormats")])
//!     .await?;
//! assert_eq!(response.error_code(), Some("noMetadataFormats"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod core;
mod errors;
mod handlers;

pub use builder::DataProviderBuilder;
pub use core::DataProvider;
