//! Loading manager configs from disk.

use std::io::Write;

use picbuf_core::{PictureBuffer, PictureFormat, PictureManager};
use picbuf_mem::{ConfigError, MemConfig, MemManager};
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(yaml.as_bytes()).expect("write config");
    file
}

#[test]
fn test_from_file() {
    let file = write_config(
        "format: yuv422p\nhprepend: 8\nhappend: 8\nvprepend: 1\nvappend: 1\nalign: 1\n",
    );
    let config = MemConfig::from_file(file.path()).unwrap();
    assert_eq!(config.format().unwrap(), PictureFormat::yuv422p());

    let manager = MemManager::with_config(&config).unwrap();
    assert_eq!(manager.margins(), (8, 8, 1, 1));

    let picture = manager.alloc(16, 4).unwrap();
    assert_eq!(picture.plane_desc("y8").unwrap().stride, 32);
    assert_eq!(picture.plane_desc("u8").unwrap().stride, 16);
    assert_eq!(picture.allocated_size().vsize, 6);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = MemConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn test_invalid_file() {
    let file = write_config("format: [1, 2]\n");
    assert!(MemConfig::from_file(file.path()).is_err());
}
