use std::collections::BTreeSet;

use super::*;
use crate::net::fake_api::{FakeApi, Reply};
use crate::state::auth::{AuthState, Role, Session};

fn session(token: &str) -> Session {
    Session {
        subject_id: 1,
        username: "ana".to_owned(),
        email: None,
        phone_number: None,
        roles: BTreeSet::from([Role::ClientBasic]),
        token: token.to_owned(),
    }
}

// =============================================================================
// headers
// =============================================================================

#[tokio::test]
async fn include_auth_without_session_sends_no_authorization() {
    let api = FakeApi::start(Reply::raw(204, None, "")).await;
    let gateway = api.gateway();

    let body = gateway.request("/listings/saved-searches", RequestOptions::get(), true).await.unwrap();
    assert!(body.is_none());
    assert_eq!(api.last().header("authorization"), None);
}

#[tokio::test]
async fn include_auth_with_session_sends_bearer_token() {
    let api = FakeApi::start(Reply::raw(204, None, "")).await;
    let gateway = api.gateway();
    gateway.session().replace(AuthState::Authenticated(session("abc.def.ghi")));

    gateway.request("/catalog/manufacturers", RequestOptions::post(), true).await.unwrap();
    assert_eq!(api.last().header("authorization"), Some("Bearer abc.def.ghi"));
}

#[tokio::test]
async fn session_without_include_auth_sends_no_authorization() {
    let api = FakeApi::start(Reply::raw(204, None, "")).await;
    let gateway = api.gateway();
    gateway.session().replace(AuthState::Authenticated(session("tok")));

    gateway.request("/listings", RequestOptions::get(), false).await.unwrap();
    assert_eq!(api.last().header("authorization"), None);
}

#[tokio::test]
async fn json_content_type_is_default_and_caller_overrides() {
    let api = FakeApi::start(Reply::raw(204, None, "")).await;
    let gateway = api.gateway();

    gateway.request("/a", RequestOptions::get(), false).await.unwrap();
    assert_eq!(api.last().header("content-type"), Some("application/json"));

    let options = RequestOptions::post().header("Content-Type", "text/csv").unwrap();
    gateway.request("/b", options, false).await.unwrap();
    assert_eq!(api.last().header("content-type"), Some("text/csv"));
}

#[tokio::test]
async fn multipart_keeps_boundary_content_type() {
    let api = FakeApi::start(Reply::raw(204, None, "")).await;
    let gateway = api.gateway();

    let form = reqwest::multipart::Form::new().text("field", "value");
    gateway.request("/upload", RequestOptions::post().multipart(form), false).await.unwrap();

    let captured = api.last();
    let content_type = captured.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");
}

#[tokio::test]
async fn query_and_json_body_are_sent() {
    let api = FakeApi::start(Reply::raw(204, None, "")).await;
    let gateway = api.gateway();

    let options = RequestOptions::put()
        .query("listingId", 5)
        .json(&serde_json::json!([{ "id": 1, "order": 0 }]))
        .unwrap();
    gateway.request("/listings/images/reorder", options, true).await.unwrap();

    let captured = api.last();
    assert_eq!(captured.method, reqwest::Method::PUT);
    assert_eq!(captured.path, "/listings/images/reorder");
    assert_eq!(captured.query.as_deref(), Some("listingId=5"));
    assert_eq!(captured.json(), serde_json::json!([{ "id": 1, "order": 0 }]));
}

// =============================================================================
// responses
// =============================================================================

#[tokio::test]
async fn non_success_status_is_request_failed_with_body() {
    let api = FakeApi::start(Reply::text(404, "not found")).await;
    let err = api.gateway().request("/listings/99", RequestOptions::get(), false).await.unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed { status: 404, ref body } if body == "not found"), "{err:?}");
}

#[tokio::test]
async fn empty_json_body_is_none() {
    let api = FakeApi::start(Reply::raw(200, Some("application/json"), "")).await;
    let body = api.gateway().request("/x", RequestOptions::get(), false).await.unwrap();
    assert!(body.is_none());
}

#[tokio::test]
async fn non_json_body_is_none() {
    let api = FakeApi::start(Reply::text(200, "hello")).await;
    let body = api.gateway().request("/x", RequestOptions::get(), false).await.unwrap();
    assert!(body.is_none());
}

#[tokio::test]
async fn json_body_is_parsed() {
    let api = FakeApi::start(Reply::json(&serde_json::json!({ "token": "t" }))).await;
    let body = api.gateway().request("/x", RequestOptions::get(), false).await.unwrap();
    assert_eq!(body, Some(serde_json::json!({ "token": "t" })));
}

#[tokio::test]
async fn json_with_charset_is_parsed() {
    let api = FakeApi::start(Reply::raw(200, Some("application/json; charset=utf-8"), "[1,2]")).await;
    let body = api.gateway().request("/x", RequestOptions::get(), false).await.unwrap();
    assert_eq!(body, Some(serde_json::json!([1, 2])));
}

#[tokio::test]
async fn declared_json_that_does_not_parse_is_malformed() {
    let api = FakeApi::start(Reply::raw(200, Some("application/json"), "{not json")).await;
    let err = api.gateway().request("/x", RequestOptions::get(), false).await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)));
}

#[tokio::test]
async fn request_as_wrong_shape_is_malformed() {
    let api = FakeApi::start(Reply::json(&serde_json::json!({ "unexpected": true }))).await;
    let err = api
        .gateway()
        .request_as::<Vec<i64>>("/x", RequestOptions::get(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_origin_is_transport_error() {
    let gateway = Gateway::new(&ClientConfig::new("http://127.0.0.1:1"), SessionHandle::default()).unwrap();
    let err = gateway.request("/x", RequestOptions::get(), false).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

// =============================================================================
// helpers
// =============================================================================

#[test]
fn expect_body_rejects_none() {
    assert_eq!(expect_body("/x", Some(3)).unwrap(), 3);
    assert!(matches!(expect_body::<i32>("/x", None), Err(ApiError::MalformedResponse(_))));
}

#[test]
fn header_rejects_invalid_value() {
    assert!(matches!(RequestOptions::get().header("x-test", "bad\nvalue"), Err(ApiError::InvalidRequest(_))));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let gateway = Gateway::new(&ClientConfig::new("http://api.test/"), SessionHandle::default()).unwrap();
    assert_eq!(gateway.base_url(), "http://api.test");
}
