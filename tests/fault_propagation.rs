//! Repository faults escape the dispatcher as `Err`, never as a document.

mod common;

use common::*;
use oai_pmh_provider::{ArgumentSet, DataProvider, ProviderError};
use std::sync::Arc;

fn failing_provider() -> DataProvider<FailingRepository, FailingRepository> {
    init_logging();
    DataProvider::with_date_converter(
        sample_config(),
        FailingRepository,
        FailingRepository,
        Arc::new(FixedClock(fixed_now())),
    )
    .unwrap()
}

#[tokio::test]
async fn test_repository_faults_are_errors() {
    let provider = failing_provider();

    let requests = [
        ArgumentSet::new("GetRecord")
            .with_identifier("oai:x:1")
            .with_metadata_prefix("oai_dc"),
        ArgumentSet::new("ListMetadataFormats"),
        ArgumentSet::new("ListMetadataFormats").with_identifier("oai:x:1"),
        ArgumentSet::new("ListRecords").with_metadata_prefix("oai_dc"),
        ArgumentSet::new("ListIdentifiers").with_metadata_prefix("oai_dc"),
    ];

    for request in &requests {
        let result = provider.handle(request).await;
        match result {
            Err(ProviderError::Repository(source)) => {
                assert!(source.to_string().contains("backend offline"));
            }
            other => panic!("expected repository fault for {:?}, got {:?}", request.verb(), other),
        }
    }
}

#[tokio::test]
async fn test_protocol_errors_precede_repository_access() {
    let provider = failing_provider();

    // These never reach a repository, so they still produce documents.
    let identify = provider.handle(&ArgumentSet::new("Identify")).await.unwrap();
    assert!(!identify.is_error());

    let sets = provider.handle(&ArgumentSet::new("ListSets")).await.unwrap();
    assert_eq!(sets.error_code(), Some("noSetHierarchy"));

    let bad_verb = provider.handle_pairs([("verb", "Harvest")]).await.unwrap();
    assert_eq!(bad_verb.error_code(), Some("badVerb"));

    let bad_date = provider
        .handle(
            &ArgumentSet::new("ListRecords")
                .with_metadata_prefix("oai_dc")
                .with_from("soon"),
        )
        .await
        .unwrap();
    assert_eq!(bad_date.error_code(), Some("badFromArgument"));

    let bad_token = provider
        .handle(&ArgumentSet::new("ListIdentifiers").with_resumption_token("garbage"))
        .await
        .unwrap();
    assert_eq!(bad_token.error_code(), Some("badResumptionToken"));
}
