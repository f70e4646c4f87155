use deckwatch::host::{DeckConnection, FileConnection};
use deckwatch::service::icon::data_uri;

fn icon_path() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("deckwatch_icon_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("key.svg")
}

#[tokio::test]
async fn set_image_writes_the_svg_without_the_uri_prefix() {
    let path = icon_path();
    let connection = FileConnection::new(path.clone());

    connection
        .set_image(&data_uri("<svg>icon</svg>"))
        .await
        .expect("write should succeed");

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "<svg>icon</svg>");
}

#[tokio::test]
async fn default_image_removes_the_file_and_tolerates_absence() {
    let path = icon_path();
    let connection = FileConnection::new(path.clone());

    connection.set_image(&data_uri("<svg/>")).await.unwrap();
    connection.set_default_image().await.unwrap();
    assert!(!path.exists());

    // Resetting an already-reset key is fine.
    connection.set_default_image().await.unwrap();
}
