use axum::{http::StatusCode, routing::get, Json, Router};
use govi_client::{
    BootstrapError, ClientConfig, ConnectOutcome, ConnectionDetailsSource, HttpConnectionSource,
    SessionController,
};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_from_default_path_on_base_url() {
    let base = spawn_backend(Router::new().route(
        "/api/connection-details",
        get(|| async {
            Json(json!({
                "serverUrl": "wss://rt.example.com",
                "roomName": "room",
                "participantName": "user",
                "participantToken": "jwt"
            }))
        }),
    ))
    .await;

    let source = HttpConnectionSource::new(&ClientConfig::new(base)).unwrap();
    let controller = SessionController::new(source);

    let outcome = controller.connect().await.unwrap();
    let ConnectOutcome::Ready(details) = outcome else {
        panic!("expected Ready, got {outcome:?}");
    };
    assert_eq!(details.room_name, "room");
    assert_eq!(details.participant_token, "jwt");
}

#[tokio::test]
async fn partial_document_is_accepted() {
    let base = spawn_backend(Router::new().route(
        "/details",
        get(|| async { Json(json!({ "serverUrl": "wss://x", "participantToken": "abc" })) }),
    ))
    .await;

    let config = ClientConfig {
        api_base_url: base,
        connection_details_endpoint: Some("/details".to_string()),
        worker_start_url: None,
    };
    let controller = SessionController::new(HttpConnectionSource::new(&config).unwrap());

    let outcome = controller.connect().await.unwrap();
    assert!(matches!(outcome, ConnectOutcome::Ready(ref d) if d.server_url == "wss://x"));
}

#[tokio::test]
async fn error_body_message_is_reported() {
    let base = spawn_backend(Router::new().route(
        "/api/connection-details",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "configuration error: missing livekit settings" })),
            )
        }),
    ))
    .await;

    let source = HttpConnectionSource::new(&ClientConfig::new(base)).unwrap();
    match source.fetch().await {
        Err(BootstrapError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "configuration error: missing livekit settings");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_is_decode_error() {
    let base = spawn_backend(Router::new().route(
        "/api/connection-details",
        get(|| async { "<html>not json</html>" }),
    ))
    .await;

    let source = HttpConnectionSource::new(&ClientConfig::new(base)).unwrap();
    assert!(matches!(
        source.fetch().await,
        Err(BootstrapError::Decode(_))
    ));
}

#[tokio::test]
async fn unreachable_service_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpConnectionSource::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    assert!(matches!(
        source.fetch().await,
        Err(BootstrapError::Request(_))
    ));
}
