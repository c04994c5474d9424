pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate API
        .route("/api/v1/candidates", get(profile::handle_list_candidates))
        .route(
            "/api/v1/candidates/parse",
            post(profile::handle_parse_upload).layer(upload_limit),
        )
        .route(
            "/api/v1/candidates/parse-text",
            post(profile::handle_parse_text),
        )
        .route("/api/v1/candidates/demo", post(profile::handle_load_demo))
        .route(
            "/api/v1/candidates/:name",
            get(profile::handle_get_candidate),
        )
        // Matching API
        .route(
            "/api/v1/candidates/:name/analysis",
            post(matching::handle_analyze),
        )
        .route(
            "/api/v1/candidates/:name/outreach",
            post(matching::handle_outreach),
        )
        .route("/api/v1/session", delete(profile::handle_clear_session))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES};
    use crate::llm_client::testing::{StubCompletion, StubFactory};
    use crate::llm_client::Provider;
    use crate::profile::document::fixtures::pdf_with_text;
    use crate::profile::parser::{ExtractionOptions, LLM_FALLBACK_NOTE};
    use crate::session::SessionStore;

    const CV_TEXT: &str = "Curriculum Vitae. H-Index: 19. Research on Neurobiology and \
        Plasticity, published in Cell.";

    fn state_with(factory: Arc<StubFactory>, openai_key: Option<&str>) -> AppState {
        AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                llm_provider: Provider::OpenAi,
                llm_model: None,
                openai_api_key: openai_key.map(|k| SecretString::from(k.to_string())),
                anthropic_api_key: None,
                extraction: ExtractionOptions::default(),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            sessions: SessionStore::default(),
            completions: factory,
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    const BOUNDARY: &str = "scout-boundary";

    /// Multipart upload of `pdf` as `file`, plus plain text fields.
    fn upload_request(pdf: &[u8], fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
                 Content-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(pdf);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/candidates/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub), None));
        let (status, body) = send(&app, empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "scout-api");
    }

    #[tokio::test]
    async fn test_heuristic_parse_is_listed() {
        let stub = StubCompletion::replying("{}");
        let factory = StubFactory::new(stub.clone());
        let app = build_router(state_with(factory.clone(), None));

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/parse-text",
                json!({"text": CV_TEXT, "candidate_name": "Dr. Lena Fischer", "use_llm": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["name"], "Dr. Lena Fischer");
        assert_eq!(body["profile"]["h_index"], "19");
        assert_eq!(body["profile"]["key_publications"][0]["journal"], "Cell");
        assert_eq!(stub.calls(), 0);
        assert_eq!(factory.connects(), 0);

        let (status, body) = send(&app, empty_request("GET", "/api/v1/candidates")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"][0]["name"], "Dr. Lena Fischer");
        assert_eq!(body["candidates"][0]["publications"], "Cell");
    }

    #[tokio::test]
    async fn test_llm_parse_without_key_is_rejected() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub.clone()), None));
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/parse-text",
                json!({"text": CV_TEXT}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Provide an API key or disable LLM parsing."
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_provider_never_reaches_backend() {
        let stub = StubCompletion::replying("{}");
        let factory = StubFactory::new(stub.clone());
        let app = build_router(state_with(factory.clone(), Some("sk-env")));
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/parse-text",
                json!({
                    "text": CV_TEXT,
                    "model": {"provider": "unsupported-vendor", "api_key": "sk-x"}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
        assert_eq!(factory.connects(), 0);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_llm_reply_falls_back_to_heuristic() {
        let stub = StubCompletion::replying("I could not find a CV here.");
        let app = build_router(state_with(StubFactory::new(stub.clone()), Some("sk-env")));
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/parse-text",
                json!({"text": CV_TEXT}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stub.calls(), 1);
        assert_eq!(body["profile"]["h_index"], "19");
        assert!(body["profile"]["notes"]
            .as_str()
            .unwrap()
            .ends_with(LLM_FALLBACK_NOTE));
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_not_found() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub), Some("sk-env")));
        let (status, _) = send(&app, empty_request("GET", "/api/v1/candidates/Nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/Nobody/analysis",
                json!({"target_direction": "Immunology"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_demo_analysis_keeps_unparseable_reply() {
        let stub = StubCompletion::replying("Not JSON");
        let app = build_router(state_with(StubFactory::new(stub.clone()), Some("sk-env")));

        let (status, _) = send(&app, empty_request("POST", "/api/v1/candidates/demo")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/Dr.%20Ada%20Zhang/analysis",
                json!({"target_direction": "Tumor immunology"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suitability_score"], "N/A");
        assert_eq!(body["reasoning"], "Not JSON");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let stub = StubCompletion::failing(429, "rate limited");
        let app = build_router(state_with(StubFactory::new(stub), Some("sk-env")));
        send(&app, empty_request("POST", "/api/v1/candidates/demo")).await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/Dr.%20Ada%20Zhang/analysis",
                json!({"target_direction": "Tumor immunology"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("rate limited"));
    }

    #[tokio::test]
    async fn test_outreach_requires_prior_analysis() {
        let stub = StubCompletion::replying(r#"{"suitability_score": 88, "reasoning": "Strong fit"}"#);
        let app = build_router(state_with(StubFactory::new(stub.clone()), Some("sk-env")));
        send(&app, empty_request("POST", "/api/v1/candidates/demo")).await;

        let outreach = || {
            json_request(
                "POST",
                "/api/v1/candidates/Dr.%20Ada%20Zhang/outreach",
                json!({"institute_value": "Shared cryo-EM facility", "language": "Chinese"}),
            )
        };

        let (status, body) = send(&app, outreach()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Run a matching analysis first to prepare outreach content."
        );
        assert_eq!(stub.calls(), 0);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/candidates/Dr.%20Ada%20Zhang/analysis",
                json!({"target_direction": "Tumor immunology"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suitability_score"], 88.0);

        let (status, body) = send(&app, outreach()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidate"], "Dr. Ada Zhang");
        assert_eq!(body["language"], "Chinese");
        // the stub echoes its canned reply verbatim
        assert_eq!(
            body["email"],
            r#"{"suitability_score": 88, "reasoning": "Strong fit"}"#
        );
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_session_empties_table() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub), None));
        send(&app, empty_request("POST", "/api/v1/candidates/demo")).await;

        let (status, _) = send(&app, empty_request("DELETE", "/api/v1/session")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, empty_request("GET", "/api/v1/candidates")).await;
        assert_eq!(body["candidates"], json!([]));
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub), None));
        let boundary = "scout-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"candidate_name\"\r\n\r\n\
             Dr. Lena Fischer\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/candidates/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please upload a PDF file first.");
    }

    #[tokio::test]
    async fn test_pdf_upload_above_two_megabytes_is_parsed() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub.clone()), None));
        let pdf = pdf_with_text("H-Index: 37 published in Nature", 3 * 1024 * 1024);
        assert!(pdf.len() > 3 * 1024 * 1024);

        let (status, body) = send(
            &app,
            upload_request(&pdf, &[("candidate_name", "Dr. Omar Haddad"), ("use_llm", "false")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["h_index"], "37");
        assert_eq!(body["profile"]["key_publications"][0]["journal"], "Nature");
        assert_eq!(stub.calls(), 0);

        let (status, body) = send(
            &app,
            empty_request("GET", "/api/v1/candidates/Dr.%20Omar%20Haddad"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["h_index"], "37");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_payload_too_large() {
        let stub = StubCompletion::replying("{}");
        let mut state = state_with(StubFactory::new(stub), None);
        state.config.max_upload_bytes = 64 * 1024;
        let app = build_router(state);

        let pdf = pdf_with_text("Nature", 256 * 1024);
        let (status, body) = send(&app, upload_request(&pdf, &[("use_llm", "false")])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_route_segment_names_are_rejected() {
        let stub = StubCompletion::replying("{}");
        let app = build_router(state_with(StubFactory::new(stub), None));

        for name in ["demo", "parse", "Zhang/Li"] {
            let (status, body) = send(
                &app,
                json_request(
                    "POST",
                    "/api/v1/candidates/parse-text",
                    json!({"text": CV_TEXT, "candidate_name": name, "use_llm": false}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        let (_, body) = send(&app, empty_request("GET", "/api/v1/candidates")).await;
        assert_eq!(body["candidates"], json!([]));
    }
}
