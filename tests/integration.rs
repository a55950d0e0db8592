use futureself_server::ai::{MockAgingClient, MockLetterClient};
use futureself_server::app::{App, AppServices};
use futureself_server::models::Config;
use futureself_server::routes;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::sync::Arc;

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn build_app(dir: &tempfile::TempDir, aging: MockAgingClient, letter: MockLetterClient) -> App {
    App::with_services(
        AppServices {
            image_aging: Box::new(aging),
            letter: Box::new(letter),
        },
        dir.path().to_path_buf(),
    )
}

async fn spawn_server(app: App) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = routes::router(Arc::new(app));

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn photo_form(dream: &str) -> Form {
    Form::new()
        .part(
            "image",
            Part::bytes(PNG_BYTES.to_vec()).file_name("selfie.jpg"),
        )
        .text("dream", dream.to_string())
}

fn upload_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn test_generate_returns_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let aging =
        MockAgingClient::new().with_image_url("https://replicate.delivery/out.png".to_string());
    let letter = MockLetterClient::new()
        .with_letter("Dear past self, the ocean is everything we hoped.".to_string());
    let aging_probe = aging.clone();

    let base = spawn_server(build_app(&dir, aging, letter)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(photo_form("becoming a marine biologist"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["aged_image_url"], "https://replicate.delivery/out.png");
    assert_eq!(
        body["wisdom_letter"],
        "Dear past self, the ocean is everything we hoped."
    );

    assert_eq!(
        aging_probe.last_dream(),
        Some("becoming a marine biologist".to_string())
    );
    assert_eq!(upload_count(dir.path()), 0);
}

#[tokio::test]
async fn test_missing_image_is_rejected_without_writing_to_storage() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(build_app(&dir, MockAgingClient::new(), MockLetterClient::new())).await;

    let form = Form::new().text("dream", "becoming a pilot".to_string());
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No image file provided");
    assert_eq!(upload_count(dir.path()), 0);
}

#[tokio::test]
async fn test_missing_dream_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(build_app(&dir, MockAgingClient::new(), MockLetterClient::new())).await;

    let form = Form::new().part(
        "image",
        Part::bytes(PNG_BYTES.to_vec()).file_name("selfie.jpg"),
    );
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Dream text is required");
}

#[tokio::test]
async fn test_whitespace_only_dream_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(build_app(&dir, MockAgingClient::new(), MockLetterClient::new())).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(photo_form("   \n\t  "))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Dream text is required");
    assert_eq!(upload_count(dir.path()), 0);
}

#[tokio::test]
async fn test_aging_failure_passes_message_through_and_skips_letter() {
    let dir = tempfile::tempdir().unwrap();
    let aging =
        MockAgingClient::new().with_error("Prediction failed: NSFW content detected".to_string());
    let letter = MockLetterClient::new();
    let letter_probe = letter.clone();

    let base = spawn_server(build_app(&dir, aging, letter)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(photo_form("a dream"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("NSFW content detected"));

    assert_eq!(letter_probe.get_call_count(), 0);
    assert_eq!(upload_count(dir.path()), 0);
}

#[tokio::test]
async fn test_letter_failure_still_cleans_up_upload() {
    let dir = tempfile::tempdir().unwrap();
    let aging = MockAgingClient::new();
    let letter = MockLetterClient::new().with_error("rate limited".to_string());

    let base = spawn_server(build_app(&dir, aging, letter)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(photo_form("a dream"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("rate limited"));
    assert_eq!(upload_count(dir.path()), 0);
}

#[tokio::test]
async fn test_missing_credentials_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        replicate_api_token: None,
        openai_api_key: None,
        openai_project_id: None,
        upload_dir: dir.path().to_path_buf(),
        port: 0,
    };
    let app = App::from_config(&config).unwrap();

    let base = spawn_server(app).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(photo_form("a dream"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("API keys are missing"));
    assert_eq!(upload_count(dir.path()), 0);
}

#[tokio::test]
async fn test_healthz_reports_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(build_app(&dir, MockAgingClient::new(), MockLetterClient::new())).await;

    let response = reqwest::get(format!("{}/healthz", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["configured"], true);
}

#[tokio::test]
async fn test_index_serves_landing_page() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(build_app(&dir, MockAgingClient::new(), MockLetterClient::new())).await;

    let response = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Future Self"));
}
