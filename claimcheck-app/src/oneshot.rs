use anyhow::{Context, Result};
use claimcheck_client::{ClaimBackend, ClaimSession, render};
use std::io::Write;

/// Check `claim` once and write the outcome to `out`. Returns whether the
/// check succeeded.
pub async fn run_once<W: Write>(
    backend: &dyn ClaimBackend,
    claim: &str,
    json: bool,
    out: &mut W,
) -> Result<bool> {
    let mut session = ClaimSession::with_claim(claim);
    if let Err(blocked) = session.submit(backend).await {
        tracing::info!(reason = %blocked, "oneshot.not_submitted");
    }

    match (json, session.state().result()) {
        (true, Some(result)) => {
            let text = serde_json::to_string_pretty(result).context("encoding result")?;
            writeln!(out, "{text}")?;
        }
        _ => write!(out, "{}", render::body_text(&render::view(&session).body))?,
    }
    out.flush()?;
    Ok(session.state().result().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_client::HttpBackend;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/check"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn prints_rendered_result() {
        let server = server_with(
            200,
            json!({ "verdict": "Unverified", "explanation": "Sparse evidence." }),
        )
        .await;
        let backend = HttpBackend::new(&server.uri(), "/check").unwrap();

        let mut out = Vec::new();
        let ok = run_once(&backend, "Bigfoot exists", false, &mut out).await.unwrap();
        assert!(ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "CLAIM UNVERIFIED: Unverified\n\nAnalysis:\n  Sparse evidence.\n"
        );
    }

    #[tokio::test]
    async fn json_mode_prints_the_result_object() {
        let server = server_with(
            200,
            json!({ "verdict": "Real", "explanation": "x", "whyMisinfo": "y" }),
        )
        .await;
        let backend = HttpBackend::new(&server.uri(), "/check").unwrap();

        let mut out = Vec::new();
        assert!(run_once(&backend, "claim", true, &mut out).await.unwrap());
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["verdict"], "Real");
        assert_eq!(printed["whyMisinfo"], "y");
    }

    #[tokio::test]
    async fn failure_prints_error_and_reports_false() {
        let server = server_with(429, json!({ "error": "Rate limit exceeded" })).await;
        let backend = HttpBackend::new(&server.uri(), "/check").unwrap();

        let mut out = Vec::new();
        assert!(!run_once(&backend, "claim", true, &mut out).await.unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Error: Rate limit exceeded\n");
    }

    #[tokio::test]
    async fn blank_claim_fails_locally() {
        let backend = HttpBackend::new("http://127.0.0.1:9", "/check").unwrap();
        let mut out = Vec::new();
        assert!(!run_once(&backend, "   ", false, &mut out).await.unwrap());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Please enter a claim to check\n"
        );
    }
}
