//! Event-exposure subscription resource tests against the composed router.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::StatusCode;
use serde_json::json;

use udm_sbi::consumer::InMemoryEeStore;
use udm_sbi::models::{EeSubscription, PatchOperation, ProblemDetails};

mod common;
use common::{body_json, json_request, router_with, send, StubEeService, EE_PREFIX};

fn subscription(value: serde_json::Value) -> EeSubscription {
    EeSubscription::try_from(value).unwrap()
}

#[tokio::test]
async fn create_returns_created_subscription() {
    let stub = Arc::new(StubEeService::creating(subscription(
        json!({"id": "sub1", "filter": "x"}),
    )));
    let router = router_with(stub.clone(), false);

    let response = send(
        &router,
        json_request(
            "POST",
            &format!("{EE_PREFIX}/imsi-001/ee-subscriptions"),
            r#"{"filter":"x"}"#,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, json!({"id": "sub1", "filter": "x"}));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn malformed_bodies_are_rejected_before_the_collaborator() {
    let stub = Arc::new(StubEeService::default());
    let router = router_with(stub.clone(), false);

    let cases = [
        ("POST", "/imsi-001/ee-subscriptions", "{not json"),
        ("POST", "/imsi-001/ee-subscriptions", "[1, 2]"),
        ("POST", "/imsi-001/ee-subscriptions", ""),
        ("PATCH", "/imsi-001/ee-subscriptions/sub1", r#"{"op":"replace"}"#),
        ("PATCH", "/imsi-001/ee-subscriptions/sub1", r#"[{"op":"frobnicate","path":"/a"}]"#),
        ("PATCH", "/imsi-001/ee-subscriptions/sub1", "[{"),
    ];

    for (method, path, body) in cases {
        let response = send(
            &router,
            json_request(method, &format!("{EE_PREFIX}{path}"), body),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {body}");

        let problem = body_json(response).await;
        assert_eq!(problem["status"], 400);
        assert_eq!(problem["title"], "Malformed request syntax");
        assert!(problem["detail"].as_str().unwrap().starts_with("[Request Body] "));
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn collaborator_problem_status_is_propagated() {
    let problem = ProblemDetails::new(StatusCode::FORBIDDEN)
        .with_title("Forbidden")
        .with_cause("USER_NOT_ALLOWED");
    let router = router_with(Arc::new(StubEeService::rejecting(problem)), false);

    let created = send(
        &router,
        json_request("POST", &format!("{EE_PREFIX}/imsi-001/ee-subscriptions"), "{}"),
    )
    .await;
    assert_eq!(created.status(), StatusCode::FORBIDDEN);
    let body = body_json(created).await;
    assert_eq!(body["status"], 403);
    assert_eq!(body["cause"], "USER_NOT_ALLOWED");

    let patched = send(
        &router,
        json_request("PATCH", &format!("{EE_PREFIX}/imsi-001/ee-subscriptions/sub1"), "[]"),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(patched).await["cause"], "USER_NOT_ALLOWED");
}

#[tokio::test]
async fn create_without_result_or_problem_is_unspecified_failure() {
    let router = router_with(Arc::new(StubEeService::default()), false);

    let response = send(
        &router,
        json_request("POST", &format!("{EE_PREFIX}/imsi-001/ee-subscriptions"), "{}"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let problem = body_json(response).await;
    assert_eq!(problem["status"], 500);
    assert_eq!(problem["cause"], "UNSPECIFIED_NF_FAILURE");
}

#[tokio::test]
async fn body_read_failure_is_system_failure() {
    let stub = Arc::new(StubEeService::default());
    let router = router_with(stub.clone(), false);

    for (method, path) in [
        ("POST", "/imsi-001/ee-subscriptions"),
        ("PATCH", "/imsi-001/ee-subscriptions/sub1"),
    ] {
        let broken = Body::from_stream(futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"{\"fil")),
            Err(std::io::Error::other("connection reset")),
        ]));
        let response = send(
            &router,
            json_request(method, &format!("{EE_PREFIX}{path}"), broken),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let problem = body_json(response).await;
        assert_eq!(problem["status"], 500);
        assert_eq!(problem["cause"], "SYSTEM_FAILURE");
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn update_passes_ordered_patch_and_returns_no_content() {
    let stub = Arc::new(StubEeService::default());
    let router = router_with(stub.clone(), false);

    let response = send(
        &router,
        json_request(
            "PATCH",
            &format!("{EE_PREFIX}/imsi-001/ee-subscriptions/sub1"),
            r#"[{"op":"replace","path":"/filter","value":"y"},{"op":"remove","path":"/old"}]"#,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());

    let patch = stub.last_patch.lock().unwrap().clone().unwrap();
    assert_eq!(patch.len(), 2);
    assert_eq!(patch[0].op, PatchOperation::Replace);
    assert_eq!(patch[0].path, "/filter");
    assert_eq!(patch[1].op, PatchOperation::Remove);
}

#[tokio::test]
async fn delete_is_always_no_content() {
    let stub = Arc::new(StubEeService::default());
    let router = router_with(stub.clone(), false);

    for id in ["sub-missing", "sub1", "sub1"] {
        let response = send(
            &router,
            json_request(
                "DELETE",
                &format!("{EE_PREFIX}/imsi-001/ee-subscriptions/{id}"),
                Body::empty(),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(stub.calls(), 3);
}

#[tokio::test]
async fn in_memory_store_round_trip_over_http() {
    let router = router_with(Arc::new(InMemoryEeStore::new()), false);
    let collection = format!("{EE_PREFIX}/imsi-001/ee-subscriptions");

    let created = send(
        &router,
        json_request(
            "POST",
            &collection,
            r#"{"callbackReference":"http://nef/cb","filter":"x"}"#,
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = body_json(created).await;
    let id = body["subscriptionId"].as_str().unwrap().to_string();
    assert_eq!(body["filter"], "x");

    let resource = format!("{collection}/{id}");
    let patched = send(
        &router,
        json_request("PATCH", &resource, r#"[{"op":"replace","path":"/filter","value":"y"}]"#),
    )
    .await;
    assert_eq!(patched.status(), StatusCode::NO_CONTENT);

    let bad_patch = send(
        &router,
        json_request("PATCH", &resource, r#"[{"op":"remove","path":"/missing"}]"#),
    )
    .await;
    assert_eq!(bad_patch.status(), StatusCode::BAD_REQUEST);

    let missing = send(
        &router,
        json_request("PATCH", &format!("{collection}/unknown"), "[]"),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let rejected = send(&router, json_request("POST", &collection, "{}")).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(rejected).await["cause"], "MANDATORY_IE_MISSING");
}

#[tokio::test]
async fn undecodable_path_parameters() {
    let stub = Arc::new(StubEeService::creating(subscription(json!({"id": "sub1"}))));
    let router = router_with(stub.clone(), false);

    let deleted = send(
        &router,
        json_request(
            "DELETE",
            &format!("{EE_PREFIX}/imsi-%FF/ee-subscriptions/sub1"),
            Body::empty(),
        ),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let body = axum::body::to_bytes(deleted.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());

    for (method, path, body) in [
        ("POST", "/imsi-%FF/ee-subscriptions", r#"{"filter":"x"}"#),
        ("PATCH", "/imsi-001/ee-subscriptions/sub-%FF", "[]"),
    ] {
        let response = send(
            &router,
            json_request(method, &format!("{EE_PREFIX}{path}"), body),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {path}");
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "{method} {path}"
        );

        let problem = body_json(response).await;
        assert_eq!(problem["status"], 400);
        assert_eq!(problem["title"], "Malformed request syntax");
        assert!(problem["detail"].as_str().unwrap().starts_with("[Request Path] "));
    }
    assert_eq!(stub.calls(), 0);
}
