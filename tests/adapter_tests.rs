//! Every local adapter variant describing the same fixture image.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use file_source::{
    BufferedStream, Contents, FileSource, FileStream, FileStreamAdapter, GenericStreamAdapter,
    LocalFile, LocalFileAdapter, LocalPathAdapter, SourceAdapter, SourceRef, StringAdapter,
    UploadedFile, UploadedFileAdapter,
};

const FIXTURE_SIZE: u64 = 8444;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plank.png")
}

fn fixture_bytes() -> Vec<u8> {
    fs::read(fixture_path()).unwrap()
}

fn canonical_fixture() -> String {
    fs::canonicalize(fixture_path())
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

fn read_all(contents: Contents<'_>) -> Vec<u8> {
    match contents {
        Contents::Bytes(bytes) => bytes.to_vec(),
        Contents::Stream(mut reader) => {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).unwrap();
            buf
        }
    }
}

fn assert_describes_fixture(adapter: &dyn SourceAdapter) {
    assert!(adapter.valid(), "{} should be valid", adapter.kind());
    assert_eq!(adapter.size(), Some(FIXTURE_SIZE), "{}", adapter.kind());
    assert_eq!(adapter.mime_type().as_deref(), Some("image/png"), "{}", adapter.kind());
    assert_eq!(
        adapter.extension(),
        adapter
            .filename()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())),
        "{}",
        adapter.kind()
    );
    assert_eq!(read_all(adapter.contents().unwrap()), fixture_bytes(), "{}", adapter.kind());
}

#[test]
fn test_local_file() {
    let adapter = LocalFileAdapter::new(LocalFile::new(fixture_path()));
    assert_describes_fixture(&adapter);
    assert_eq!(adapter.path(), Some(canonical_fixture()));
    assert_eq!(adapter.filename().as_deref(), Some("plank.png"));
    assert_eq!(adapter.extension().as_deref(), Some("png"));
    assert!(!adapter.contents().unwrap().is_stream());
    assert!(matches!(adapter.source(), SourceRef::LocalFile(f) if f.path() == fixture_path()));
}

#[test]
fn test_uploaded_file() {
    let upload = UploadedFile::new(fixture_path(), "plank.png")
        .with_mime_type("image/png")
        .with_size(FIXTURE_SIZE)
        .with_error_code(0)
        .with_test_mode(true);
    let adapter = UploadedFileAdapter::new(upload.clone());
    assert_describes_fixture(&adapter);
    assert_eq!(adapter.path(), Some(canonical_fixture()));
    assert_eq!(adapter.filename().as_deref(), Some("plank.png"));
    assert!(matches!(adapter.source(), SourceRef::UploadedFile(u) if *u == upload));
}

#[test]
fn test_uploaded_file_under_temp_name() {
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("phpA1b2C3");
    fs::copy(fixture_path(), &temp).unwrap();

    let adapter = UploadedFileAdapter::new(UploadedFile::new(&temp, "Plank.PNG"));
    assert_describes_fixture(&adapter);
    assert_eq!(adapter.filename().as_deref(), Some("Plank.PNG"));
    assert_eq!(adapter.extension().as_deref(), Some("png"));
    assert!(adapter.path().unwrap().ends_with("phpA1b2C3"));
}

#[test]
fn test_local_path() {
    let adapter = LocalPathAdapter::new(fixture_path());
    assert_describes_fixture(&adapter);
    assert_eq!(adapter.path(), Some(canonical_fixture()));
    assert_eq!(adapter.filename().as_deref(), Some("plank.png"));
    assert!(matches!(adapter.source(), SourceRef::LocalPath(p) if p == fixture_path()));
}

#[test]
fn test_string() {
    let data = Bytes::from(fixture_bytes());
    let adapter = StringAdapter::new(data.clone());
    assert!(adapter.valid());
    assert!(adapter.path().is_none());
    assert!(adapter.filename().is_none());
    assert!(adapter.extension().is_none());
    assert_eq!(adapter.mime_type().as_deref(), Some("image/png"));
    assert_eq!(adapter.size(), Some(data.len() as u64));
    assert_eq!(adapter.size(), Some(FIXTURE_SIZE));

    let Contents::Bytes(contents) = adapter.contents().unwrap() else {
        panic!("buffers hand out bytes");
    };
    assert_eq!(contents, data);
    assert!(matches!(adapter.source(), SourceRef::String(b) if *b == data));
}

#[test]
fn test_file_stream_from_bare_handle() {
    let file = File::open(fixture_path()).unwrap();
    let adapter = FileStreamAdapter::new(Some(&file));
    assert_describes_fixture(&adapter);
    assert!(adapter.contents().unwrap().is_stream());
    if cfg!(target_os = "linux") {
        assert_eq!(adapter.path(), Some(canonical_fixture()));
        assert_eq!(adapter.filename().as_deref(), Some("plank.png"));
    }
    let SourceRef::FileStream(Some(handle)) = adapter.source() else {
        panic!("unexpected source {:?}", adapter.source());
    };
    assert!(std::ptr::eq(handle.file(), &file));
}

#[test]
fn test_file_stream_from_wrapper() {
    let stream = FileStream::open(fixture_path()).unwrap();
    let adapter = FileStreamAdapter::new(Some(&stream));
    assert_describes_fixture(&adapter);
    assert_eq!(adapter.path(), Some(canonical_fixture()));
    assert_eq!(adapter.filename().as_deref(), Some("plank.png"));
    assert_eq!(adapter.extension().as_deref(), Some("png"));
}

#[test]
fn test_generic_stream() {
    let cell = RefCell::new(Cursor::new(fixture_bytes()));
    let adapter = GenericStreamAdapter::new(Some(&cell));
    assert_describes_fixture(&adapter);
    assert_eq!(adapter.path().as_deref(), Some("memory"));
    assert!(adapter.filename().is_none());
    assert!(adapter.extension().is_none());
}

#[cfg(unix)]
fn spawn_cat() -> std::process::Child {
    std::process::Command::new("cat")
        .arg(fixture_path())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap()
}

#[cfg(unix)]
#[test]
fn test_generic_stream_over_pipe() {
    use std::os::fd::OwnedFd;

    let mut child = spawn_cat();
    let pipe = File::from(OwnedFd::from(child.stdout.take().unwrap()));
    let adapter = GenericStreamAdapter::new(Some(&pipe));
    assert!(adapter.valid());
    assert!(adapter.size().is_none());
    // A bare pipe cannot be looked into without consuming it.
    assert!(adapter.mime_type().is_none());
    assert_eq!(read_all(adapter.contents().unwrap()), fixture_bytes());
    child.wait().unwrap();
}

#[cfg(unix)]
#[test]
fn test_generic_stream_over_buffered_pipe() {
    let mut child = spawn_cat();
    let stream = BufferedStream::new(child.stdout.take().unwrap());
    let adapter = GenericStreamAdapter::new(Some(&stream));
    assert!(adapter.valid());
    assert!(adapter.size().is_none());
    assert_eq!(adapter.mime_type().as_deref(), Some("image/png"));
    assert_eq!(read_all(adapter.contents().unwrap()), fixture_bytes());
    child.wait().unwrap();
}

#[test]
fn test_source_is_identity() {
    let file = File::open(fixture_path()).unwrap();
    let cell = RefCell::new(Cursor::new(fixture_bytes()));
    let string = StringAdapter::new(fixture_bytes());
    let stream = FileStreamAdapter::new(Some(&file));
    let generic = GenericStreamAdapter::new(Some(&cell));

    let SourceRef::String(buf) = string.source() else {
        panic!("unexpected source");
    };
    assert!(std::ptr::eq(buf, string.get_source()));

    assert!(matches!(
        stream.source(),
        SourceRef::FileStream(Some(h)) if std::ptr::eq(h.file(), &file)
    ));

    let SourceRef::GenericStream(Some(s)) = generic.source() else {
        panic!("unexpected source");
    };
    assert!(std::ptr::addr_eq(s, &cell));
}

#[test]
fn test_all_variants_through_trait_objects() {
    let file = File::open(fixture_path()).unwrap();
    let stream = FileStream::open(fixture_path()).unwrap();
    let cell = RefCell::new(Cursor::new(fixture_bytes()));

    let adapters: Vec<Box<dyn SourceAdapter + '_>> = vec![
        Box::new(LocalFileAdapter::new(LocalFile::new(fixture_path()))),
        Box::new(UploadedFileAdapter::new(UploadedFile::new(
            fixture_path(),
            "plank.png",
        ))),
        Box::new(LocalPathAdapter::new(fixture_path())),
        Box::new(StringAdapter::new(fixture_bytes())),
        Box::new(FileStreamAdapter::new(Some(&file))),
        Box::new(FileStreamAdapter::new(Some(&stream))),
        Box::new(GenericStreamAdapter::new(Some(&cell))),
    ];

    let kinds: Vec<FileSource> = adapters.iter().map(|a| a.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FileSource::LocalFile,
            FileSource::UploadedFile,
            FileSource::LocalPath,
            FileSource::String,
            FileSource::FileStream,
            FileSource::FileStream,
            FileSource::GenericStream,
        ]
    );
    for adapter in &adapters {
        assert!(adapter.valid());
        assert_eq!(adapter.size(), Some(FIXTURE_SIZE));
        assert_eq!(adapter.mime_type().as_deref(), Some("image/png"));
        assert_eq!(adapter.source().kind(), adapter.kind());
    }
}

#[test]
fn test_checksums_agree_across_variants() {
    let file = File::open(fixture_path()).unwrap();
    let from_path = LocalPathAdapter::new(fixture_path())
        .contents()
        .unwrap()
        .checksum()
        .unwrap();
    let from_stream = FileStreamAdapter::new(Some(&file))
        .contents()
        .unwrap()
        .checksum()
        .unwrap();
    let from_buffer = StringAdapter::new(fixture_bytes())
        .contents()
        .unwrap()
        .checksum()
        .unwrap();
    assert_eq!(from_path, from_stream);
    assert_eq!(from_path, from_buffer);
    assert_eq!(from_path.len(), 64);
}
