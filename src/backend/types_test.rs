use super::*;

#[test]
fn drawing_body_uses_csv_field() {
    let body = DrawingBody { csv: "1,2,CIRCLE".into() };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "csv": "1,2,CIRCLE" }));
}

#[test]
fn drawing_body_rejects_missing_csv() {
    let result: Result<DrawingBody, _> = serde_json::from_str(r#"{"data": "x"}"#);
    assert!(result.is_err());
}

#[test]
fn retryable_covers_transport_and_server_errors() {
    assert!(BackendError::ApiRequest("timeout".into()).retryable());
    assert!(BackendError::ApiResponse { status: 503, body: String::new() }.retryable());
    assert!(BackendError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(!BackendError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!BackendError::ApiParse("bad".into()).retryable());
    assert!(!BackendError::ConfigParse("bad".into()).retryable());
}

#[test]
fn error_messages_name_the_failure() {
    let err = BackendError::ApiResponse { status: 502, body: "gateway".into() };
    assert_eq!(err.to_string(), "API response error: status 502");
    assert!(BackendError::HttpClientBuild("tls".into()).to_string().contains("tls"));
}
