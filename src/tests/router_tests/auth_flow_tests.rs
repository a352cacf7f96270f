// src/tests/router_tests/auth_flow_tests.rs
use crate::auth::sessions;
use crate::router::handle;
use crate::tests::utils::{now_unix, test_ctx};
use astra::{Body, Request};
use http::Method;

fn get(path: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = path.parse().unwrap();
    req
}

fn location(resp: &astra::Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

#[test]
fn incidents_without_a_session_redirects_to_login() {
    let ctx = test_ctx();

    let resp = handle(get("/incidents"), &ctx).unwrap();

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn a_revoked_session_redirects_to_login() {
    let ctx = test_ctx();

    let raw_token = ctx
        .db
        .with_conn(|conn| sessions::create_session(conn, "api-token", 9, "C. Rojas", now_unix()))
        .unwrap();

    let session = ctx
        .db
        .with_conn(|conn| sessions::load_session(conn, &raw_token, now_unix()))
        .unwrap()
        .unwrap();
    ctx.db
        .with_conn(|conn| sessions::revoke_session(conn, session.id, now_unix()))
        .unwrap();

    let mut req = get("/incidents");
    req.headers_mut().insert(
        "Cookie",
        format!("session={raw_token}").parse().unwrap(),
    );

    let resp = handle(req, &ctx).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn logout_clears_the_cookie_and_redirects() {
    let ctx = test_ctx();

    let raw_token = ctx
        .db
        .with_conn(|conn| sessions::create_session(conn, "api-token", 9, "C. Rojas", now_unix()))
        .unwrap();

    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::POST;
    *req.uri_mut() = "/logout".parse().unwrap();
    req.headers_mut().insert(
        "Cookie",
        format!("session={raw_token}").parse().unwrap(),
    );

    let resp = handle(req, &ctx).unwrap();

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(set_cookie.contains("Max-Age=0"));

    // the session row is now revoked
    let loaded = ctx
        .db
        .with_conn(|conn| sessions::load_session(conn, &raw_token, now_unix()))
        .unwrap();
    assert!(loaded.is_none());
}
