//! End-to-end tests of the HTTP clients against an in-process responder.

mod common;

use common::MockServer;
use reimagine_core::{
    ApiKey, Config, ConfigError, Describer, Description, Fetcher, Generator, HttpFetcher,
    ImageFormat, ImageInput, OpenAiDescriber, OpenAiGenerator, Pipeline, PipelineError,
    PipelineOptions, SaveOutcome,
};

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const VISION_OK: &str = r#"{
    "id": "chatcmpl-123",
    "model": "gpt-4o-mini",
    "choices": [{"index": 0, "message": {"role": "assistant", "content": "A yellow electric mouse."}}],
    "usage": {"prompt_tokens": 100, "completion_tokens": 7, "total_tokens": 107}
}"#;

fn test_config(server: &MockServer, output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.url("/v1");
    config.api.api_key = "sk-from-config".to_string();
    config.output.dir = output_dir.to_path_buf();
    config
}

fn write_png(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("pikachu_0.png");
    std::fs::write(&path, PNG_HEADER).unwrap();
    path
}

#[tokio::test]
async fn describer_sends_authenticated_chat_request() {
    let server = MockServer::start().await;
    server.json("/v1/chat/completions", 200, VISION_OK);

    let describer = OpenAiDescriber::new(
        ApiKey::new("sk-test"),
        &server.url("/v1"),
        &Config::default().vision,
    );
    let image = ImageInput::from_bytes(&PNG_HEADER, ImageFormat::Png);
    let reply = describer.describe(&image).await.unwrap();

    assert_eq!(reply.description.as_str(), "A yellow electric mouse.");
    assert_eq!(reply.tokens_used, Some(107));
    assert!(reply.raw_response.contains("chatcmpl-123"));

    let requests = server.requests_to("/v1/chat/completions");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
    assert!(request
        .header("content-type")
        .unwrap_or_default()
        .starts_with("application/json"));

    let body = request.json();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 200);
    assert_eq!(body["messages"][0]["role"], "user");
    let url = body["messages"][0]["content"][1]["image_url"]["url"]
        .as_str()
        .unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn describer_surfaces_404_status_and_body() {
    let server = MockServer::start().await;
    server.json(
        "/v1/chat/completions",
        404,
        r#"{"error":{"message":"The model does not exist"}}"#,
    );

    let describer = OpenAiDescriber::new(
        ApiKey::new("sk-test"),
        &server.url("/v1"),
        &Config::default().vision,
    );
    let image = ImageInput::from_bytes(&PNG_HEADER, ImageFormat::Png);
    let err = describer.describe(&image).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("The model does not exist"));
}

#[tokio::test]
async fn generator_returns_first_image_url() {
    let server = MockServer::start().await;
    server.json(
        "/v1/images/generations",
        200,
        r#"{"created":1700000000,"data":[{"url":"https://cdn.example.com/img-1.png","revised_prompt":"A mouse."}]}"#,
    );

    let generator = OpenAiGenerator::new(
        ApiKey::new("sk-test"),
        &server.url("/v1"),
        &Config::default().generation,
    );
    let prompt = Description::new("A yellow electric mouse.").unwrap();
    let image = generator.generate(&prompt).await.unwrap();

    assert_eq!(image.url.as_str(), "https://cdn.example.com/img-1.png");

    let request = &server.requests_to("/v1/images/generations")[0];
    let body = request.json();
    assert_eq!(body["prompt"], "A yellow electric mouse.");
    assert_eq!(body["n"], 1);
    assert_eq!(body["quality"], "hd");
    assert_eq!(body["style"], "vivid");
    assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
}

#[tokio::test]
async fn generator_rejects_server_error() {
    let server = MockServer::start().await;
    server.json("/v1/images/generations", 500, r#"{"error":"boom"}"#);

    let generator = OpenAiGenerator::new(
        ApiKey::new("sk-test"),
        &server.url("/v1"),
        &Config::default().generation,
    );
    let prompt = Description::new("anything").unwrap();
    let err = generator.generate(&prompt).await.unwrap_err();

    assert!(matches!(err, PipelineError::GenerateStatus { status: 500, .. }));
}

#[tokio::test]
async fn fetcher_reports_http_errors() {
    let server = MockServer::start().await;
    server.route("/files/gone.png", 410, "text/plain", b"expired");

    let fetcher = HttpFetcher::new(5_000, 1024);
    let url = server.url("/files/gone.png").parse().unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, PipelineError::Download { .. }));
}

#[tokio::test]
async fn fetcher_rejects_oversized_content_length() {
    let server = MockServer::start().await;
    server.raw(
        "/files/huge.png",
        b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 4398046511104\r\nConnection: close\r\n\r\nabc",
    );

    let fetcher = HttpFetcher::new(5_000, Config::default().download.max_bytes());
    let url = server.url("/files/huge.png").parse().unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, PipelineError::Download { .. }));
    assert!(err.to_string().contains("exceeds limit"));
}

#[tokio::test]
async fn fetcher_rejects_body_over_limit() {
    let server = MockServer::start().await;
    server.route("/files/big.png", 200, "image/png", &[7u8; 64]);

    let fetcher = HttpFetcher::new(5_000, 16);
    let url = server.url("/files/big.png").parse().unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, PipelineError::Download { .. }));
}

#[tokio::test]
async fn oversized_download_skips_save() {
    let server = MockServer::start().await;
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    server.json("/v1/chat/completions", 200, VISION_OK);
    server.json(
        "/v1/images/generations",
        200,
        &format!(r#"{{"data":[{{"url":"{}"}}]}}"#, server.url("/files/huge.png")),
    );
    server.raw(
        "/files/huge.png",
        b"HTTP/1.1 200 OK\r\nContent-Length: 4398046511104\r\nConnection: close\r\n\r\nabc",
    );

    let config = test_config(&server, output_dir.path());
    let pipeline = Pipeline::try_from_config(&config, None).unwrap();
    let report = pipeline
        .run(&write_png(input_dir.path()), |_| {})
        .await
        .unwrap();

    assert!(matches!(report.save, SaveOutcome::DownloadSkipped(_)));
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unreachable_vision_endpoint_is_a_transport_error() {
    // Bind then drop to get a local port nobody is listening on.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_url = format!("http://{}/v1", closed.local_addr().unwrap());
    drop(closed);

    let server = MockServer::start().await;
    server.json(
        "/v1/images/generations",
        200,
        &format!(r#"{{"data":[{{"url":"{}"}}]}}"#, server.url("/files/a.png")),
    );
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let config = Config::default();

    let pipeline = Pipeline::new(
        Box::new(OpenAiDescriber::new(
            ApiKey::new("sk-test"),
            &closed_url,
            &config.vision,
        )),
        Box::new(OpenAiGenerator::new(
            ApiKey::new("sk-test"),
            &server.url("/v1"),
            &config.generation,
        )),
        Box::new(HttpFetcher::new(5_000, 1024)),
        PipelineOptions {
            limits: config.limits.clone(),
            output_dir: output_dir.path().to_path_buf(),
            file_name: "dall.png".to_string(),
        },
    );

    let err = pipeline
        .run(&write_png(input_dir.path()), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Transport { stage: "vision", .. }));
    assert_eq!(server.hits(), 0);
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn full_pipeline_writes_unique_file() {
    let server = MockServer::start().await;
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    std::fs::write(output_dir.path().join("dall.png"), b"previous").unwrap();

    server.json("/v1/chat/completions", 200, VISION_OK);
    server.json(
        "/v1/images/generations",
        200,
        &format!(
            r#"{{"data":[{{"url":"{}"}}]}}"#,
            server.url("/files/generated.png")
        ),
    );
    server.route("/files/generated.png", 200, "image/png", b"\x89PNG fresh");

    let config = test_config(&server, output_dir.path());
    let pipeline = Pipeline::try_from_config(&config, None).unwrap();
    let report = pipeline
        .run(&write_png(input_dir.path()), |_| {})
        .await
        .unwrap();

    let expected = output_dir.path().join("dall_1.png");
    assert_eq!(report.save, SaveOutcome::Saved(expected.clone()));
    assert_eq!(std::fs::read(&expected).unwrap(), b"\x89PNG fresh");
    assert_eq!(
        std::fs::read(output_dir.path().join("dall.png")).unwrap(),
        b"previous"
    );
    assert_eq!(server.hits(), 3);
    assert_eq!(
        server.requests_to("/v1/chat/completions")[0].header("authorization"),
        Some("Bearer sk-from-config")
    );
}

#[tokio::test]
async fn vision_404_never_reaches_generation_endpoint() {
    let server = MockServer::start().await;
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    server.json("/v1/chat/completions", 404, r#"{"error":"not found"}"#);
    server.json("/v1/images/generations", 200, r#"{"data":[]}"#);

    let config = test_config(&server, output_dir.path());
    let pipeline = Pipeline::try_from_config(&config, None).unwrap();
    let err = pipeline
        .run(&write_png(input_dir.path()), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::DescribeStatus { status: 404, .. }));
    assert_eq!(server.hits(), 1);
    assert!(server.requests_to("/v1/images/generations").is_empty());
}

#[tokio::test]
async fn failed_download_skips_save() {
    let server = MockServer::start().await;
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    server.json("/v1/chat/completions", 200, VISION_OK);
    server.json(
        "/v1/images/generations",
        200,
        &format!(r#"{{"data":[{{"url":"{}"}}]}}"#, server.url("/files/missing.png")),
    );

    let config = test_config(&server, output_dir.path());
    let pipeline = Pipeline::try_from_config(&config, None).unwrap();
    let report = pipeline
        .run(&write_png(input_dir.path()), |_| {})
        .await
        .unwrap();

    assert!(matches!(report.save, SaveOutcome::DownloadSkipped(_)));
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_credential_fails_before_any_request() {
    let server = MockServer::start().await;
    server.json("/v1/chat/completions", 200, VISION_OK);
    let output_dir = tempfile::tempdir().unwrap();

    let mut config = test_config(&server, output_dir.path());
    config.api.api_key = "${REIMAGINE_TEST_KEY_THAT_IS_NEVER_SET}".to_string();

    let result = Pipeline::try_from_config(&config, None);

    assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    assert_eq!(server.hits(), 0);
}
