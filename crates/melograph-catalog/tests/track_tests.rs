use melograph_catalog::track::Track;
use melograph_client::{Client, MelographError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "FILDTEOIK2HBORODV";

fn client(server: &MockServer) -> Client {
    Client::builder(API_KEY)
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_profile_returns_sanitized_audio_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/track/profile"))
        .and(query_param("id", "TRTLKZV12E5AC92E11"))
        .and(query_param("bucket", "audio_summary"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "status": {"code": 0, "message": "Success"},
                "track": {
                    "id": "TRTLKZV12E5AC92E11",
                    "title": "Paranoid Android",
                    "artist": "Radiohead",
                    "status": "complete",
                    "audio_summary": {"energy": 0.5, "tempo": 84.0}
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let track = Track::new(client(&server));
    let profile = track.profile("TRTLKZV12E5AC92E11").await.unwrap();

    assert_eq!(profile.id, "TRTLKZV12E5AC92E11");
    assert_eq!(profile.title.as_deref(), Some("Paranoid Android"));
    assert_eq!(profile.status.as_deref(), Some("complete"));

    // speechiness was absent on the wire and must come back as 0.
    let summary = profile.audio_summary.unwrap();
    assert_eq!(summary["energy"], json!(0.5));
    assert_eq!(summary["speechiness"], json!(0));
}

#[tokio::test]
async fn test_profile_keeps_reported_speechiness() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/track/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "status": {"code": 0},
                "track": {
                    "id": "TR1",
                    "audio_summary": {"speechiness": 0.2}
                }
            }
        })))
        .mount(&server)
        .await;

    let track = Track::new(client(&server));
    let profile = track.profile("TR1").await.unwrap();

    let summary = profile.audio_summary.unwrap();
    assert_eq!(summary["speechiness"], json!(0.2));
}

#[tokio::test]
async fn test_profile_without_id_fails_before_any_request() {
    let server = MockServer::start().await;

    let track = Track::new(client(&server));
    let err = track.profile("").await.unwrap_err();
    assert!(matches!(err, MelographError::MissingArgument("id")));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "validation must precede transport");
}

#[tokio::test]
async fn test_upload_streams_file_and_returns_receipt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/track/upload"))
        .and(query_param("filetype", "mp3"))
        .and(query_param("api_key", API_KEY))
        .and(header("content-type", "application/octet-stream"))
        .and(header("content-length", "14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "status": {"code": 0, "message": "Success"},
                "track": {"id": "TRNEW1", "status": "pending"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"fake mp3 bytes").unwrap();

    let track = Track::new(client(&server));
    let receipt = track.upload(file.path()).await.unwrap();

    assert_eq!(receipt.id, "TRNEW1");
    assert_eq!(receipt.status.as_deref(), Some("pending"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, b"fake mp3 bytes");
}

#[tokio::test]
async fn test_upload_without_path_fails_before_any_request() {
    let server = MockServer::start().await;

    let track = Track::new(client(&server));
    let err = track.upload("").await.unwrap_err();
    assert!(matches!(err, MelographError::MissingArgument("file_path")));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_upload_surfaces_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/track/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"status": {"code": 5, "message": "Unsupported file type"}}
        })))
        .mount(&server)
        .await;

    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not audio").unwrap();

    let track = Track::new(client(&server));
    let err = track.upload(file.path()).await.unwrap_err();

    assert!(matches!(err, MelographError::Api { code: 5, .. }));
}

#[tokio::test]
async fn test_upload_url_posts_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/track/upload"))
        .and(query_param("url", "http://example.com/song.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "status": {"code": 0},
                "track": {"id": "TRNEW2", "status": "pending"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let track = Track::new(client(&server));
    let receipt = track.upload_url("http://example.com/song.mp3").await.unwrap();

    assert_eq!(receipt.id, "TRNEW2");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_upload_url_without_url_fails_before_any_request() {
    let server = MockServer::start().await;

    let track = Track::new(client(&server));
    let err = track.upload_url("").await.unwrap_err();
    assert!(matches!(err, MelographError::MissingArgument("url")));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}
