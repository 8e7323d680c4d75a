//! Integration tests for the API proxy flow.
//!
//! A wiremock server stands in for `api.bigcommerce.com`.

mod common;

use bigcommerce_app::session::SessionId;
use bigcommerce_app::{AccessToken, HttpMethod};
use common::{app, store_hash, CLIENT_ID};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn test_v2_call_is_suffixed_and_relayed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s1/catalog/v2/products.json"))
        .and(header("X-Auth-Client", CLIENT_ID))
        .and(header("X-Auth-Token", "tok"))
        .respond_with(ResponseTemplate::new(207).set_body_string(r#"[{"id":1}]"#))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let session = SessionId::generate();
    app.binder()
        .bind(&session, store_hash("s1"), AccessToken::new("tok").unwrap())
        .await
        .unwrap();

    let response = app
        .proxy(HttpMethod::Get, "catalog/v2/products", None, &session)
        .await;

    assert_eq!(response.status, 207);
    assert_eq!(response.body, r#"[{"id":1}]"#);
    assert_eq!(response.content_type, "application/json");
}

#[tokio::test]
async fn test_v3_path_is_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stores/xyz789/v3/catalog/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let session = SessionId::generate();
    app.binder()
        .bind(
            &session,
            store_hash("stores/xyz789"),
            AccessToken::new("tok").unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .proxy(HttpMethod::Get, "/v3/catalog/products", None, &session)
        .await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_v2_call_keeps_query_after_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s1/v2/orders.json"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let session = SessionId::generate();
    app.binder()
        .bind(&session, store_hash("s1"), AccessToken::new("tok").unwrap())
        .await
        .unwrap();

    let response = app
        .proxy(HttpMethod::Get, "v2/orders?limit=5", None, &session)
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "[]");
}

#[tokio::test]
async fn test_upstream_errors_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/s1/v3/catalog/products/5"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"title":"Not Found"}"#))
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let session = SessionId::generate();
    app.binder()
        .bind(&session, store_hash("s1"), AccessToken::new("tok").unwrap())
        .await
        .unwrap();

    let response = app
        .proxy(HttpMethod::Delete, "v3/catalog/products/5", None, &session)
        .await;
    assert_eq!(response.status, 404);
    assert_eq!(response.body, r#"{"title":"Not Found"}"#);
}

#[tokio::test]
async fn test_get_never_forwards_a_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s1/v3/orders"))
        .respond_with(|request: &Request| {
            if request.body.is_empty() {
                ResponseTemplate::new(200)
            } else {
                ResponseTemplate::new(400)
            }
        })
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let session = SessionId::generate();
    app.binder()
        .bind(&session, store_hash("s1"), AccessToken::new("tok").unwrap())
        .await
        .unwrap();

    let response = app
        .proxy(
            HttpMethod::Get,
            "v3/orders",
            Some(r#"{"ignored":true}"#.to_string()),
            &session,
        )
        .await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_unbound_session_gets_401_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let response = app
        .proxy(HttpMethod::Get, "v3/orders", None, &SessionId::generate())
        .await;

    assert_eq!(response.status, 401);
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Unauthenticated"));
}

#[tokio::test]
async fn test_endpoint_escaping_store_path_gets_400() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let session = SessionId::generate();
    app.binder()
        .bind(
            &session,
            store_hash("stores/aaa"),
            AccessToken::new("tok").unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .proxy(HttpMethod::Get, "../../stores/bbb/v3/orders", None, &session)
        .await;

    assert_eq!(response.status, 400);
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("path traversal"));
}

#[tokio::test]
async fn test_unreachable_upstream_gets_502() {
    let (app, _) = app("http://127.0.0.1:9");
    let session = SessionId::generate();
    app.binder()
        .bind(&session, store_hash("s1"), AccessToken::new("tok").unwrap())
        .await
        .unwrap();

    let response = app
        .proxy(HttpMethod::Get, "v3/orders", None, &session)
        .await;
    assert_eq!(response.status, 502);
}
