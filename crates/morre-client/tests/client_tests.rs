//! Integration tests for MorreClient against a mock MORRE server
//!
//! These tests cover:
//! - Request bodies for every query endpoint
//! - Response envelope handling
//! - Mapping of failures onto the client/communication/service tiers
//! - Vocabulary fetching, caching and validation
//! - Independence of concurrent calls

use morre_client::{
    ClientConfig, ClientError, CommunicationError, ErrorKind, FeatureSet, MorreClient,
    MorreError, QueryResult,
};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// MORRE usually runs as a server extension below a context path
const CONTEXT: &str = "/morre";

fn client_for(server: &MockServer) -> MorreClient {
    MorreClient::new(&format!("{}{}", server.uri(), CONTEXT)).expect("valid mock URL")
}

fn endpoint(name: &str) -> String {
    format!("{CONTEXT}/query/{name}")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn glycolysis_models() -> serde_json::Value {
    json!([
        {
            "modelID": "BIOMD0000000064",
            "modelName": "Teusink2000_Glycolysis",
            "documentURI": "http://www.ebi.ac.uk/biomodels-main/BIOMD0000000064",
            "score": 3.2
        },
        {
            "modelID": "BIOMD0000000172",
            "modelName": "Pritchard2002_glycolysis",
            "score": 1.7
        }
    ])
}

async fn mount_features(server: &MockServer, query_type: &str, keywords: &[&str], times: u64) {
    Mock::given(method("POST"))
        .and(path(endpoint("get_query_features")))
        .and(body_json(json!({ "queryType": query_type })))
        .respond_with(ok(json!(keywords)))
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Model queries
// ============================================================================

#[tokio::test]
async fn test_model_query_returns_fixture_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("model_query")))
        .and(body_json(json!({ "keyword": "glycolysis" })))
        .respond_with(ok(glycolysis_models()))
        .expect(1)
        .mount(&server)
        .await;

    let models = client_for(&server).model_query("glycolysis").await.unwrap();

    assert_eq!(models.len(), 2);
    assert!(models.iter().any(|m| m.identifier() == "BIOMD0000000064"));
    assert_eq!(models[0].model_name.as_deref(), Some("Teusink2000_Glycolysis"));
}

#[tokio::test]
async fn test_empty_model_query_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for query in ["", "   "] {
        let err = client.model_query(query).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Client, "{query:?}");
    }
}

#[tokio::test]
async fn test_no_op_aggregation_matches_plain_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("model_query")))
        .respond_with(ok(glycolysis_models()))
        .mount(&server)
        .await;

    // Same models, different order
    let mut reversed = glycolysis_models().as_array().cloned().unwrap();
    reversed.reverse();

    Mock::given(method("POST"))
        .and(path(endpoint("aggregated_model_query")))
        .and(body_json(json!({
            "keyword": "glycolysis",
            "aggregationType": "none",
            "rankersWeights": ""
        })))
        .respond_with(ok(json!(reversed)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let plain = client.model_query("glycolysis").await.unwrap();
    let aggregated = client
        .aggregated_model_query("glycolysis", "none", "")
        .await
        .unwrap();

    let ids = |models: &[morre_client::ModelResult]| -> HashSet<String> {
        models.iter().map(|m| m.model_id.clone()).collect()
    };
    assert_eq!(ids(&plain), ids(&aggregated));
}

#[tokio::test]
async fn test_simple_aggregated_model_query_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("simple_aggregated_model_query")))
        .and(body_json(json!({
            "queryType": "model_query",
            "keyword": "insulin",
            "aggregationType": "RANK_AGGREGATION",
            "rankersWeights": "0.5,0.5"
        })))
        .respond_with(ok(json!([{ "modelID": "BIOMD0000000223" }])))
        .expect(1)
        .mount(&server)
        .await;

    let models = client_for(&server)
        .do_simple_aggregated_model_query("model_query", "insulin", "RANK_AGGREGATION", "0.5,0.5")
        .await
        .unwrap();

    assert_eq!(models[0].model_id, "BIOMD0000000223");
}

#[tokio::test]
async fn test_simple_query_on_unsupported_type_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("simple_model_query")))
        .and(body_partial_json(json!({ "queryType": "publication_query" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "query type publication_query does not support single keyword search"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .do_simple_model_query("publication_query", "Teusink")
        .await
        .unwrap_err();

    match err {
        MorreError::Service(service) => {
            assert_eq!(service.status, Some(400));
            assert!(service.message.contains("single keyword"));
            assert_eq!(service.endpoint, "query/simple_model_query");
        },
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_false_envelope_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("simple_model_query")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "unknown query type 'frobnicate'"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .do_simple_model_query("frobnicate", "glucose")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(err.to_string().contains("frobnicate"));
}

// ============================================================================
// Feature vocabularies
// ============================================================================

#[tokio::test]
async fn test_query_features_then_feature_query() {
    let server = MockServer::start().await;
    mount_features(&server, "model_query", &["NAME", "AUTHOR", "ELEMENT_NAME"], 1).await;

    Mock::given(method("POST"))
        .and(path(endpoint("feature_model_query")))
        .and(body_json(json!({
            "queryType": "model_query",
            "features": { "NAME": "glycolysis", "AUTHOR": "Teusink", "ELEMENT_NAME": "glucose" }
        })))
        .respond_with(ok(glycolysis_models()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let keywords = client.query_features("model_query").await.unwrap();
    assert_eq!(keywords, vec!["NAME", "AUTHOR", "ELEMENT_NAME"]);

    // Every advertised keyword is accepted; the snapshot is reused
    let values = ["glycolysis", "Teusink", "glucose"];
    let features: FeatureSet = keywords.iter().cloned().zip(values).collect();

    for _ in 0..2 {
        let models = client.do_model_query("model_query", &features).await.unwrap();
        assert_eq!(models.len(), 2);
    }
}

#[tokio::test]
async fn test_vocabulary_fetched_lazily_once() {
    let server = MockServer::start().await;
    mount_features(&server, "person_query", &["FIRSTNAME", "LASTNAME"], 1).await;

    Mock::given(method("POST"))
        .and(path(endpoint("person_query")))
        .and(body_json(json!({ "features": { "LASTNAME": "Teusink" } })))
        .respond_with(ok(json!([
            { "id": "p-17", "firstName": "Bas", "lastName": "Teusink", "models": ["BIOMD0000000064"] }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let features = FeatureSet::new().with("LASTNAME", "Teusink");

    let first = client.do_person_query(&features).await.unwrap();
    let second = client.do_person_query(&features).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].full_name().as_deref(), Some("Bas Teusink"));
    assert!(client.cached_vocabulary("person_query").is_some());
}

#[tokio::test]
async fn test_unknown_feature_rejected_before_query() {
    let server = MockServer::start().await;
    mount_features(&server, "publication_query", &["TITLE", "JOURNAL"], 1).await;

    Mock::given(method("POST"))
        .and(path(endpoint("publication_query")))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let features = FeatureSet::new().with("TITLE", "glycolysis").with("IMPACT", "high");
    let err = client_for(&server)
        .do_publication_query(&features)
        .await
        .unwrap_err();

    match err {
        MorreError::Client(ClientError::UnknownFeature { query_type, keyword }) => {
            assert_eq!(query_type, "publication_query");
            assert_eq!(keyword, "IMPACT");
        },
        other => panic!("expected unknown feature error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_disabled_skips_vocabulary() {
    let server = MockServer::start().await;
    mount_features(&server, "publication_query", &["TITLE"], 0).await;

    Mock::given(method("POST"))
        .and(path(endpoint("publication_query")))
        .respond_with(ok(json!([
            {
                "id": "pub-1",
                "title": "Can yeast glycolysis be understood in terms of in vitro kinetics?",
                "journal": "Eur J Biochem",
                "year": "2000",
                "authors": [{ "id": "p-17", "lastName": "Teusink" }]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(&format!("{}{}", server.uri(), CONTEXT))
        .unwrap()
        .with_validate_features(false);
    let client = MorreClient::with_config(config).unwrap();

    let features = FeatureSet::new().with("ANYTHING", "goes");
    let publications = client.do_publication_query(&features).await.unwrap();

    assert_eq!(publications[0].journal.as_deref(), Some("Eur J Biochem"));
    assert_eq!(publications[0].authors[0].id, "p-17");
}

#[tokio::test]
async fn test_vocabulary_fetch_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("get_query_features")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "unknown query type 'gene_query'"
        })))
        .mount(&server)
        .await;

    let features = FeatureSet::new().with("SYMBOL", "HK1");
    let err = client_for(&server)
        .do_model_query("gene_query", &features)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Service);
}

// ============================================================================
// Annotation queries
// ============================================================================

#[tokio::test]
async fn test_annotation_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("annotation_query")))
        .and(body_json(json!({ "keyword": "GO:0006096" })))
        .respond_with(ok(json!([
            {
                "id": "a-1",
                "resourceURI": "http://identifiers.org/go/GO:0006096",
                "score": 4.0,
                "models": ["BIOMD0000000064", "BIOMD0000000172"]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let annotations = client_for(&server)
        .do_annotation_query("GO:0006096")
        .await
        .unwrap();

    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].score(), Some(4.0));
    assert_eq!(annotations[0].models.len(), 2);
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_plain_text_error_status_is_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).model_query("glycolysis").await.unwrap_err();
    match err {
        MorreError::Service(service) => {
            assert_eq!(service.status, Some(502));
            assert_eq!(service.message, "HTTP 502");
        },
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_communication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"success\": tru"))
        .mount(&server)
        .await;

    let err = client_for(&server).model_query("glycolysis").await.unwrap_err();
    assert!(matches!(
        err,
        MorreError::Communication(CommunicationError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_success_without_data_is_communication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = client_for(&server).model_query("glycolysis").await.unwrap_err();
    assert!(matches!(
        err,
        MorreError::Communication(CommunicationError::MissingData { .. })
    ));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ok(glycolysis_models()).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = ClientConfig::new(&format!("{}{}", server.uri(), CONTEXT))
        .unwrap()
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let client = MorreClient::with_config(config).unwrap();

    let err = client.model_query("glycolysis").await.unwrap_err();
    assert!(matches!(
        err,
        MorreError::Communication(CommunicationError::Timeout { .. })
    ));
    assert!(err.is_retryable());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_queries_keep_results_apart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("model_query")))
        .and(body_json(json!({ "keyword": "glycolysis" })))
        .respond_with(ok(glycolysis_models()).set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(endpoint("model_query")))
        .and(body_json(json!({ "keyword": "circadian" })))
        .respond_with(ok(json!([{ "modelID": "BIOMD0000000021", "modelName": "Leloup1999_CircadianRhythms" }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let other = client.clone();

    let (glycolysis, circadian) = tokio::join!(
        client.model_query("glycolysis"),
        tokio::spawn(async move { other.model_query("circadian").await }),
    );

    let glycolysis = glycolysis.unwrap();
    let circadian = circadian.unwrap().unwrap();

    assert_eq!(glycolysis.len(), 2);
    assert_eq!(circadian.len(), 1);
    assert_eq!(circadian[0].model_id, "BIOMD0000000021");
    assert!(glycolysis.iter().all(|m| m.model_id != "BIOMD0000000021"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_vocabulary_misses_share_one_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(endpoint("get_query_features")))
        .and(body_json(json!({ "queryType": "person_query" })))
        .respond_with(ok(json!(["FIRSTNAME", "LASTNAME"])).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let other = client.clone();

    let (first, second) = tokio::join!(
        client.vocabulary("person_query"),
        tokio::spawn(async move { other.vocabulary("person_query").await }),
    );

    let first = first.unwrap();
    let second = second.unwrap().unwrap();
    assert_eq!(first.keywords(), second.keywords());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "one vocabulary fetch per query type");
}
