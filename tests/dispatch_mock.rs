#![cfg(feature = "mock")]

use blue_connector::{
    dispatch, Credentials, Error, MockConfig, MockTransport, OperationContext, Parameters,
};
use serde_json::json;

fn ctx(params: serde_json::Value) -> OperationContext {
    OperationContext::new(
        0,
        Credentials::new("token-id-test", "token-secret-test"),
        Parameters::from_value(params),
    )
}

#[tokio::test]
async fn unknown_operation_is_a_dispatch_error() {
    let transport = MockTransport::new(MockConfig::default());

    let err = dispatch("doesNotExist", &ctx(json!({})), &transport)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Dispatch(_)));
    assert_eq!(transport.sent_count(), 0);
}

#[tokio::test]
async fn records_request_carries_company_scope() {
    let transport = MockTransport::new(
        MockConfig::default().with_data(json!({ "todoQueries": { "todos": { "items": [] } } })),
    );
    let params = json!({
        "companyId": "c1",
        "searchTerm": "patient",
        "showCompleted": true,
    });

    let result = dispatch("getRecords", &ctx(params), &transport)
        .await
        .unwrap();
    assert!(result.success);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let (request, scope) = &sent[0];
    assert_eq!(scope.company_id.as_deref(), Some("c1"));
    assert!(request.query.contains(r#"search: "patient""#));
    assert!(request.query.contains("showCompleted: true"));
    assert!(!request.query.contains("projectIds:"));
}

#[tokio::test]
async fn server_reported_errors_fold_into_the_result() {
    let transport = MockTransport::new(
        MockConfig::default().with_graphql_errors(vec!["A".into(), "B".into()]),
    );

    let result = dispatch("getCompanies", &ctx(json!({})), &transport)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("A, B"));
}

#[tokio::test]
async fn exhausted_fixture_queue_fails_cleanly() {
    let transport = MockTransport::new(MockConfig::default());

    let result = dispatch("getCompanies", &ctx(json!({})), &transport)
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.error.unwrap().contains("no mock response queued"));
}
