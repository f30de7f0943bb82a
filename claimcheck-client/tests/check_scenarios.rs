//! End-to-end checks of the session against a mocked `/check` backend.

use async_trait::async_trait;
use claimcheck_client::render::{self, Body, SectionContent, SectionKind};
use claimcheck_client::{
    BannerCategory, CheckOutcome, ClaimBackend, ClaimRequest, ClaimSession, GENERIC_FAILURE_MESSAGE,
    HttpBackend, SubmitBlocked, UiState,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.uri(), "/check").expect("valid backend url")
}

#[tokio::test]
async fn scenario_a_fake_claim_with_confidence_and_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "claim": "The Earth is flat" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verdict": "Fake",
            "confidence": "95%",
            "explanation": "Satellite photos and circumnavigation show a spherical Earth.",
            "sources": ["https://example.com/a"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = ClaimSession::with_claim("  The Earth is flat  ");
    let state = session
        .submit(&backend_for(&server))
        .await
        .expect("submitted");
    assert!(matches!(state, UiState::Success(_)));

    let screen = render::view(&session);
    let Body::Result(view) = &screen.body else {
        panic!("expected a result, got {:?}", screen.body);
    };
    assert_eq!(view.banner.category, BannerCategory::Fake);
    assert!(view.banner.to_string().ends_with("(Confidence: 95%)"));
    assert_eq!(
        view.section(SectionKind::Explanation).unwrap().content,
        SectionContent::Text(
            "Satellite photos and circumnavigation show a spherical Earth.".into()
        )
    );
    assert_eq!(
        view.section(SectionKind::Sources).unwrap().content,
        SectionContent::Links(vec!["https://example.com/a".into()])
    );
    assert!(screen.submit.enabled);
}

#[tokio::test]
async fn scenario_b_server_error_with_empty_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = ClaimSession::with_claim("The moon landing was staged");
    session.submit(&backend_for(&server)).await.expect("submitted");

    assert_eq!(session.state().error(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(
        render::view(&session).body,
        Body::Error(GENERIC_FAILURE_MESSAGE.into())
    );
}

#[tokio::test]
async fn scenario_c_unreachable_backend() {
    // Grab a free port, then close it so nothing is listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let backend = HttpBackend::new(&format!("http://{addr}"), "/check").unwrap();

    let mut session = ClaimSession::with_claim("The Earth is flat");
    session.submit(&backend).await.expect("submitted");

    let message = session.state().error().expect("failed state");
    assert!(message.contains("Make sure the backend server is running"));
    assert!(message.contains(&addr.to_string()));
    assert!(session.state().result().is_none());
    assert!(session.can_submit());
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/factcheck/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verdict": "Real",
            "explanation": "Routed through the gateway."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&format!("{}/factcheck", server.uri()), "/check").unwrap();
    let mut session = ClaimSession::with_claim("Water is wet");
    session.submit(&backend).await.expect("submitted");
    assert!(session.state().result().is_some());
}

#[tokio::test]
async fn backend_error_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Claim is required" })),
        )
        .mount(&server)
        .await;

    let mut session = ClaimSession::with_claim("x");
    session.submit(&backend_for(&server)).await.expect("submitted");
    assert_eq!(session.state().error(), Some("Claim is required"));
}

#[tokio::test]
async fn unparsable_error_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let mut session = ClaimSession::with_claim("x");
    session.submit(&backend_for(&server)).await.expect("submitted");
    assert_eq!(session.state().error(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn malformed_success_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "verdict": "Real" })))
        .mount(&server)
        .await;

    let mut session = ClaimSession::with_claim("x");
    session.submit(&backend_for(&server)).await.expect("submitted");
    assert_eq!(session.state().error(), Some(GENERIC_FAILURE_MESSAGE));
    assert!(session.state().result().is_none());
}

#[tokio::test]
async fn whitespace_claim_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    for claim in ["", "   ", "\n\t  \r\n"] {
        let mut session = ClaimSession::with_claim(claim);
        assert_eq!(
            session.submit(&backend).await.unwrap_err(),
            SubmitBlocked::EmptyClaim
        );
        assert_eq!(
            session.state().error(),
            Some("Please enter a claim to check")
        );
    }
}

/// Counts calls and answers with a fixed outcome.
struct Scripted {
    calls: AtomicUsize,
    outcome: CheckOutcome,
}

#[async_trait]
impl ClaimBackend for Scripted {
    async fn check(&self, _request: &ClaimRequest) -> CheckOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn location(&self) -> String {
        "scripted".into()
    }
}

#[tokio::test]
async fn each_submit_issues_exactly_one_request() {
    let backend = Scripted {
        calls: AtomicUsize::new(0),
        outcome: CheckOutcome::Rejected {
            status: Some(503),
            message: None,
        },
    };

    let mut session = ClaimSession::with_claim("Coffee stunts growth");
    session.submit(&backend).await.unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert!(!session.state().is_loading());

    session.submit(&backend).await.unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn submit_while_in_flight_is_blocked() {
    let backend = Scripted {
        calls: AtomicUsize::new(0),
        outcome: CheckOutcome::Malformed {
            detail: "n/a".into(),
        },
    };

    let mut session = ClaimSession::with_claim("x");
    let ticket = session.begin().unwrap();
    assert_eq!(
        session.submit(&backend).await.unwrap_err(),
        SubmitBlocked::InFlight
    );
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert!(session.settle(ticket, CheckOutcome::Malformed { detail: "n/a".into() }));
}
