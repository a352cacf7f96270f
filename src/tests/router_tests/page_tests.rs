// src/tests/router_tests/page_tests.rs
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::test_ctx;
use astra::{Body, Request};
use http::Method;
use std::io::Read;

fn get(path: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = path.parse().unwrap();
    req
}

fn body_string(resp: &mut astra::Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn root_redirects_to_the_incident_list() {
    let ctx = test_ctx();

    let resp = handle(get("/"), &ctx).unwrap();

    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers()
            .get("Location")
            .and_then(|v| v.to_str().ok()),
        Some("/incidents")
    );
}

#[test]
fn login_page_renders_without_a_session() {
    let ctx = test_ctx();

    let mut resp = handle(get("/login"), &ctx).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("API token"));
    assert!(body.contains("Incident Desk"));
}

#[test]
fn unknown_paths_are_not_found() {
    let ctx = test_ctx();

    match handle(get("/nope"), &ctx) {
        Err(ServerError::NotFound) => {}
        other => panic!("expected NotFound, got: {:?}", other),
    }
}

#[test]
fn non_numeric_incident_ids_are_rejected() {
    let ctx = test_ctx();

    match handle(get("/incidents/twelve/edit"), &ctx) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {:?}", other),
    }
}
