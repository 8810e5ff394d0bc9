//! Tests for filesystem storage backend.

use vimirror_error::{StorageErrorKind, VimirrorErrorKind};
use vimirror_storage::{DuplicationBehavior, FileSystemStorage, MediaStorage};
use tempfile::TempDir;

fn source_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_create_and_list_folder() {
    let root = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();

    assert!(!storage.has_folder("videos/vimeo").await.unwrap());
    assert!(storage.list_files("videos/vimeo").await.unwrap().is_empty());

    storage.create_folder("/videos/vimeo/").await.unwrap();
    assert!(storage.has_folder("videos/vimeo").await.unwrap());
    assert!(root.path().join("videos").join("vimeo").is_dir());
}

#[tokio::test]
async fn test_add_file_and_list() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();
    storage.create_folder("vimeo").await.unwrap();

    let source = source_file(&scratch, "download.part", b"video bytes");
    let stored = storage
        .add_file(&source, "vimeo", "clip.mp4", DuplicationBehavior::Replace)
        .await
        .unwrap();

    assert_eq!(stored, "clip.mp4");
    assert_eq!(storage.list_files("vimeo").await.unwrap(), vec!["clip.mp4"]);
    assert_eq!(
        std::fs::read(root.path().join("vimeo/clip.mp4")).unwrap(),
        b"video bytes"
    );
    // The source stays for the caller to clean up
    assert!(source.exists());
}

#[tokio::test]
async fn test_replace_overwrites_existing_file() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();
    storage.create_folder("vimeo").await.unwrap();

    let first = source_file(&scratch, "first", b"old");
    let second = source_file(&scratch, "second", b"new");
    storage
        .add_file(&first, "vimeo", "clip.mp4", DuplicationBehavior::Replace)
        .await
        .unwrap();
    let stored = storage
        .add_file(&second, "vimeo", "clip.mp4", DuplicationBehavior::Replace)
        .await
        .unwrap();

    assert_eq!(stored, "clip.mp4");
    assert_eq!(storage.list_files("vimeo").await.unwrap().len(), 1);
    assert_eq!(std::fs::read(root.path().join("vimeo/clip.mp4")).unwrap(), b"new");
}

#[tokio::test]
async fn test_rename_picks_next_free_name() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();
    storage.create_folder("vimeo").await.unwrap();

    let source = source_file(&scratch, "source", b"data");
    for _ in 0..3 {
        storage
            .add_file(&source, "vimeo", "clip.mp4", DuplicationBehavior::Rename)
            .await
            .unwrap();
    }

    assert_eq!(
        storage.list_files("vimeo").await.unwrap(),
        vec!["clip.mp4", "clip_1.mp4", "clip_2.mp4"]
    );
}

#[tokio::test]
async fn test_cancel_reports_collision() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();
    storage.create_folder("vimeo").await.unwrap();

    let source = source_file(&scratch, "source", b"data");
    storage
        .add_file(&source, "vimeo", "clip.mp4", DuplicationBehavior::Cancel)
        .await
        .unwrap();
    let result = storage
        .add_file(&source, "vimeo", "clip.mp4", DuplicationBehavior::Cancel)
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.kind(),
        VimirrorErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::Collision(_))
    ));
}

#[tokio::test]
async fn test_add_file_requires_existing_folder() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();

    let source = source_file(&scratch, "source", b"data");
    let result = storage
        .add_file(&source, "missing", "clip.mp4", DuplicationBehavior::Replace)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_paths_cannot_escape_root() {
    let root = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin").unwrap();

    assert!(storage.create_folder("../outside").await.is_err());

    storage.create_folder("vimeo").await.unwrap();
    let source = source_file(&scratch, "source", b"data");
    let result = storage
        .add_file(&source, "vimeo", "../escape.mp4", DuplicationBehavior::Replace)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_public_path() {
    let root = TempDir::new().unwrap();
    let storage = FileSystemStorage::new(root.path(), "/fileadmin/").unwrap();

    assert_eq!(
        storage.public_path("/videos/vimeo/", "clip.mp4"),
        "/fileadmin/videos/vimeo/clip.mp4"
    );
    assert_eq!(storage.public_path("", "clip.mp4"), "/fileadmin/clip.mp4");
}
