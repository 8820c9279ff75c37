//! End-to-end gating behaviour through an axum router.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;
use warden_auth::{CustomGate, ErrorStyle, FailureResponder, GateLayer, basic};
use warden_telemetry::{Metrics, OUTCOME_ALLOW, OUTCOME_DENY};
use warden_test_support::{basic_header, get as get_request, get_with_basic, send};

fn router(style: ErrorStyle, metrics: Option<Metrics>) -> Router {
    let responder = FailureResponder::new(style);

    let mut protected =
        GateLayer::new(basic("bob", "bobisthebest")).with_responder(responder.clone());
    let mut custom = GateLayer::new(CustomGate::from_async(|head| async move {
        head.query_param("letmein").as_deref() == Some("now")
    }))
    .with_responder(responder);
    if let Some(metrics) = metrics {
        protected = protected.with_metrics(metrics.clone());
        custom = custom.with_metrics(metrics);
    }

    Router::new()
        .route("/public", get(|| async { "public" }))
        .route("/protected", get(|| async { "protected" }).route_layer(protected))
        .route("/custom", get(|| async { "custom" }).route_layer(custom))
}

#[tokio::test]
async fn public_route_ignores_credentials() -> anyhow::Result<()> {
    let app = router(ErrorStyle::Minimal, None);
    for request in [
        get_request("/public")?,
        get_with_basic("/public", "alice", "nope")?,
    ] {
        let response = send(&app, request).await?;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text()?, "public");
    }
    Ok(())
}

#[tokio::test]
async fn missing_credentials_get_challenge_and_minimal_body() -> anyhow::Result<()> {
    let app = router(ErrorStyle::Minimal, None);
    let response = send(&app, get_request("/protected")?).await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), Some("Basic"));
    assert_eq!(
        response.json()?,
        json!({"error": {"message": "Authentication Failed"}})
    );
    Ok(())
}

#[tokio::test]
async fn only_the_configured_pair_is_admitted() -> anyhow::Result<()> {
    let app = router(ErrorStyle::Minimal, None);

    let allowed = send(&app, get_with_basic("/protected", "bob", "bobisthebest")?).await?;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.text()?, "protected");
    assert!(allowed.header("www-authenticate").is_none());

    for (username, password) in [
        ("alice", "bobisthebest"),
        ("bob", "wrong"),
        ("alice", "aliceisthebest"),
    ] {
        let denied = send(&app, get_with_basic("/protected", username, password)?).await?;
        assert_eq!(denied.status, StatusCode::UNAUTHORIZED, "{username}");
        assert_eq!(denied.header("www-authenticate"), Some("Basic"));
    }
    Ok(())
}

#[tokio::test]
async fn custom_gate_follows_query_rule() -> anyhow::Result<()> {
    let app = router(ErrorStyle::Minimal, None);

    let denied = send(&app, get_request("/custom")?).await?;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.header("www-authenticate"), Some("Basic"));

    let allowed = send(&app, get_request("/custom?letmein=now")?).await?;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.text()?, "custom");
    Ok(())
}

#[tokio::test]
async fn structured_style_names_the_error() -> anyhow::Result<()> {
    let app = router(ErrorStyle::Structured, None);

    for request in [get_request("/protected")?, get_request("/custom")?] {
        let response = send(&app, request).await?;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json()?,
            json!({"error": {
                "type": "client",
                "name": "ErrorUnauthorized",
                "message": "Authentication Failed"
            }})
        );
    }
    Ok(())
}

#[tokio::test]
async fn realm_appears_in_challenge() -> anyhow::Result<()> {
    let responder = FailureResponder::default().with_realm("warden")?;
    let app = Router::new().route(
        "/protected",
        get(|| async { "protected" })
            .route_layer(GateLayer::new(basic("bob", "pw")).with_responder(responder)),
    );

    let response = send(&app, get_request("/protected")?).await?;
    assert_eq!(
        response.header("www-authenticate"),
        Some("Basic realm=\"warden\"")
    );
    Ok(())
}

#[tokio::test]
async fn callback_gate_answers_once_across_tasks() -> anyhow::Result<()> {
    let late_results = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&late_results);
    let gate = CustomGate::from_callback(move |head, completion| {
        let counter = Arc::clone(&counter);
        let allow = head.headers.contains_key("x-allow");
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            completion.complete(allow);
            if completion.complete(!allow) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
    });
    let app = Router::new().route(
        "/custom",
        get(|| async { "custom" }).route_layer(GateLayer::new(gate)),
    );

    let denied = send(&app, get_request("/custom")?).await?;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let mut request = get_request("/custom")?;
    request.headers_mut().insert("x-allow", "1".parse()?);
    let allowed = send(&app, request).await?;
    assert_eq!(allowed.status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(late_results.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn failing_decision_functions_deny() -> anyhow::Result<()> {
    let erroring = CustomGate::try_from_async(|_| async {
        Err::<bool, _>(std::io::Error::other("backend unavailable"))
    });
    let abandoning = CustomGate::from_callback(|_, completion| drop(completion));
    let app = Router::new()
        .route(
            "/erroring",
            get(|| async { "unreachable" }).route_layer(GateLayer::new(erroring)),
        )
        .route(
            "/abandoning",
            get(|| async { "unreachable" }).route_layer(GateLayer::new(abandoning)),
        );

    for uri in ["/erroring", "/abandoning"] {
        let response = send(&app, get_request(uri)?).await?;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            response.json()?,
            json!({"error": {"message": "Authentication Failed"}})
        );
    }
    Ok(())
}

#[tokio::test]
async fn decisions_are_counted_per_gate() -> anyhow::Result<()> {
    let metrics = Metrics::new()?;
    let app = router(ErrorStyle::Minimal, Some(metrics.clone()));

    send(&app, get_with_basic("/protected", "bob", "bobisthebest")?).await?;
    send(&app, get_request("/protected")?).await?;
    send(&app, get_request("/custom?letmein=now")?).await?;
    send(&app, get_request("/public")?).await?;

    assert_eq!(metrics.auth_decisions("basic", OUTCOME_ALLOW), 1);
    assert_eq!(metrics.auth_decisions("basic", OUTCOME_DENY), 1);
    assert_eq!(metrics.auth_decisions("custom", OUTCOME_ALLOW), 1);
    assert_eq!(metrics.auth_decisions("custom", OUTCOME_DENY), 0);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.auth_allowed_total, 2);
    assert_eq!(snapshot.auth_denied_total, 1);
    assert!(metrics.render()?.contains("auth_decisions_total"));
    Ok(())
}

#[test]
fn header_helper_matches_wire_format() {
    assert_eq!(
        basic_header("bob", "bobisthebest"),
        "Basic Ym9iOmJvYmlzdGhlYmVzdA=="
    );
}
