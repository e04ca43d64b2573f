//! End-to-end: a posted event flows through the queue and the external
//! converter, and the artifact lands in the viewer's public tree.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use tempfile::TempDir;

use viewbridge_api::setup::routes::setup_routes;
use viewbridge_api::state::AppState;
use viewbridge_api::{ConversionPipeline, ConversionQueue};
use viewbridge_core::{Config, ConversionRoots, ConversionSettings};

fn user_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-platform-user-id"),
        HeaderValue::from_static("u1"),
    )
}

async fn write_copying_converter(dir: &Path, output_root: &Path) -> std::path::PathBuf {
    let script = dir.join("convert.sh");
    tokio::fs::write(
        &script,
        format!(
            concat!(
                "out=\"{}/$3\"\n",
                "mkdir -p \"$out\"\n",
                "base=$(basename \"$1\")\n",
                "cp \"$1\" \"$out/${{base%.*}}.esob\"\n",
            ),
            output_root.display()
        ),
    )
    .await
    .unwrap();
    script
}

#[tokio::test]
async fn posted_attachment_is_converted_and_published() {
    let dir = TempDir::new().unwrap();
    let data_root = dir.path().join("data");
    let output_root = dir.path().join("out");
    let viewer_root = dir.path().join("viewer");
    for root in [&data_root, &output_root, &viewer_root] {
        tokio::fs::create_dir_all(root).await.unwrap();
    }

    let script = write_copying_converter(dir.path(), &output_root).await;
    let source = data_root.join("files").join("report.docx");
    tokio::fs::create_dir_all(source.parent().unwrap()).await.unwrap();
    tokio::fs::write(&source, b"document bytes").await.unwrap();

    let settings = ConversionSettings {
        roots: ConversionRoots {
            data_root,
            output_root: output_root.clone(),
            viewer_public_root: viewer_root.clone(),
        },
        converter_runtime: "sh".to_string(),
        converter_script: script,
        converter_timeout_secs: 10,
    };

    let config = Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        conversion: Some(settings.clone()),
        viewer: None,
        platform: None,
        queue_size: 8,
        max_concurrent_conversions: 2,
        http_client_timeout_secs: 5,
    };

    let queue = ConversionQueue::new(ConversionPipeline::new(settings), 8, 2);
    let state = Arc::new(AppState {
        config: config.clone(),
        queue: Some(queue),
        platform: None,
        viewer: None,
    });
    let server = TestServer::new(setup_routes(&config, state).unwrap()).unwrap();

    let (name, value) = user_header();
    let response = server
        .post("/api/v1/events/attachments-posted")
        .add_header(name, value)
        .json(&serde_json::json!({
            "post_id": "p1",
            "attachments": [{
                "file_id": "f1",
                "file_name": "report.docx",
                "storage_path": "files/report.docx"
            }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    let final_path = viewer_root
        .join("public")
        .join("OUT")
        .join("p1")
        .join("report.esob");
    let converted = output_root.join("p1").join("report.esob");
    for _ in 0..100 {
        // Done once the artifact is published and the converter's own
        // output copy is cleaned up.
        if tokio::fs::try_exists(&final_path).await.unwrap()
            && !tokio::fs::try_exists(&converted).await.unwrap()
        {
            assert_eq!(
                tokio::fs::read(&final_path).await.unwrap(),
                b"document bytes"
            );
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("artifact never appeared at {}", final_path.display());
}
