use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use govi_server::{app, config::Config, AppState};
use govi_voice::LiveKitConfig;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

const LIVEKIT_URL: &str = "wss://livekit.example.com";
const LIVEKIT_KEY: &str = "devkey";
const LIVEKIT_SECRET: &str = "devsecret-devsecret-devsecret-00";

fn token_config() -> Config {
    let mut config = Config::default();
    config.livekit = LiveKitConfig::new(LIVEKIT_URL, LIVEKIT_KEY, LIVEKIT_SECRET);
    config
}

fn build_app(config: Config) -> Router {
    app(AppState::from_config(config).unwrap())
}

fn request(method: Method, uri: &str) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    req.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        40000,
    )));
    req
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[derive(Deserialize)]
struct Claims {
    exp: u64,
    sub: String,
    video: VideoClaims,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct VideoClaims {
    room: String,
    room_join: bool,
    room_admin: bool,
    room_create: bool,
    can_publish: bool,
    can_publish_data: bool,
    can_publish_sources: Vec<String>,
    can_subscribe: bool,
}

#[tokio::test]
async fn connection_details_returns_fresh_document() {
    let app = build_app(token_config());

    let response = app
        .oneshot(request(Method::GET, "/api/connection-details"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );

    let json = body_json(response).await;
    assert_eq!(json["serverUrl"], LIVEKIT_URL);
    let room = json["roomName"].as_str().unwrap();
    let participant = json["participantName"].as_str().unwrap();
    assert!(!room.is_empty());
    assert!(!participant.is_empty());

    let token = json["participantToken"].as_str().unwrap();
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(LIVEKIT_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .expect("token should verify with the configured secret")
    .claims;

    assert_eq!(claims.sub, participant);
    assert_eq!(claims.video.room, room);
    assert!(claims.video.room_join);
    assert!(claims.video.can_publish);
    assert_eq!(claims.video.can_publish_sources, vec!["microphone"]);
    assert!(claims.video.can_publish_data);
    assert!(claims.video.can_subscribe);
    assert!(!claims.video.room_admin);
    assert!(!claims.video.room_create);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    assert!(claims.exp <= now + 15 * 60);
}

#[tokio::test]
async fn repeated_calls_yield_distinct_rooms_and_identities() {
    let app = build_app(token_config());

    let first = body_json(
        app.clone()
            .oneshot(request(Method::GET, "/api/connection-details"))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        app.oneshot(request(Method::GET, "/api/connection-details"))
            .await
            .unwrap(),
    )
    .await;

    assert_ne!(first["roomName"], second["roomName"]);
    assert_ne!(first["participantName"], second["participantName"]);
    assert_ne!(first["participantToken"], second["participantToken"]);
}

#[tokio::test]
async fn missing_livekit_settings_is_server_error_without_document() {
    let mut config = Config::default();
    config.livekit = LiveKitConfig::new(LIVEKIT_URL, "", "");
    let app = build_app(config);

    let response = app
        .oneshot(request(Method::GET, "/api/connection-details"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );

    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("api_key"), "unexpected error: {error}");
    assert!(json.get("serverUrl").is_none());
    assert!(json.get("participantToken").is_none());
}

#[tokio::test]
async fn start_worker_without_backend_is_config_error() {
    let app = build_app(token_config());

    let response = app
        .oneshot(request(Method::POST, "/api/start-worker"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("GOVI_BACKEND_WORKER_URL"));
}

#[tokio::test]
async fn root_and_health_report_service() {
    let app = build_app(Config::default());

    let response = app.clone().oneshot(request(Method::GET, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "online");
    assert_eq!(json["health_check"], "/health");

    let response = app.oneshot(request(Method::GET, "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn credential_routes_are_rate_limited_per_ip() {
    let mut config = token_config();
    config.rate_limit.requests_per_minute = 2;
    let app = build_app(config);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/connection-details"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/connection-details"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("too many requests"));
    assert!(json.get("participantToken").is_none());

    // Service-info routes are not limited.
    let response = app.oneshot(request(Method::GET, "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn request_without_client_address_fails_closed_with_json_error() {
    let app = build_app(token_config());

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/connection-details")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("connect info"));
    assert!(json.get("participantToken").is_none());
}
