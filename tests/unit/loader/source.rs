use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "framescrub_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[tokio::test]
async fn memory_source_returns_inserted_bytes() {
    let src = MemoryFrameSource::new();
    assert!(src.is_empty());
    src.insert("a001.png", vec![1, 2, 3]);
    assert_eq!(src.len(), 1);
    assert_eq!(src.fetch("a001.png").await.unwrap(), vec![1, 2, 3]);

    let err = src.fetch("a002.png").await.unwrap_err();
    assert!(matches!(err, ScrubError::Load(_)));
}

#[tokio::test]
async fn fs_source_resolves_relative_to_root() {
    let tmp = temp_dir("fs_source");
    std::fs::create_dir_all(tmp.join("seq")).unwrap();
    std::fs::write(tmp.join("seq").join("f001.jpg"), b"bytes").unwrap();

    let src = FsFrameSource::new(&tmp);
    assert_eq!(src.root(), tmp.as_path());
    assert_eq!(src.fetch("seq/f001.jpg").await.unwrap(), b"bytes".to_vec());
    assert_eq!(src.fetch("./seq/f001.jpg").await.unwrap(), b"bytes".to_vec());

    let err = src.fetch("seq/f002.jpg").await.unwrap_err();
    assert!(err.to_string().contains("f002.jpg"));

    std::fs::remove_dir_all(&tmp).ok();
}
