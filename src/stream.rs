//! Borrowed stream handles and the readers built on them.
//!
//! Adapters never own these handles. Whoever opened a stream closes it; an
//! adapter only reads through a shared reference for the length of a call.

use std::cell::RefCell;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, CONTENT_LENGTH};
use reqwest::StatusCode;

use crate::config::HttpConfig;
use crate::detection::SNIFF_LEN;
use crate::error::Result;

/// A readable stream usable through a shared reference.
///
/// Implemented for [`File`] (which reads through `&File`), for any
/// `RefCell<S>` where `S: Read + Seek`, such as an in-memory cursor, and for
/// [`BufferedStream`], which wraps readers that cannot seek.
pub trait SharedStream {
    fn read_shared(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Fails with an error on streams that cannot seek.
    fn seek_shared(&self, pos: SeekFrom) -> io::Result<u64>;

    /// Up to `len` leading bytes, leaving the read position where it was.
    ///
    /// The default rewinds to the start and seeks back afterwards, so it only
    /// works on seekable streams.
    fn peek_shared(&self, len: usize) -> io::Result<Vec<u8>> {
        let position = self.seek_shared(SeekFrom::Current(0))?;
        self.seek_shared(SeekFrom::Start(0))?;
        let head = read_up_to(ByRef(self), len);
        self.seek_shared(SeekFrom::Start(position))?;
        head
    }

    /// Whether the handle is open and usable right now. Says nothing about
    /// seekability.
    fn is_live(&self) -> bool;
}

impl<S: Read + Seek> SharedStream for RefCell<S> {
    fn read_shared(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.try_borrow_mut().map_err(busy)?.read(buf)
    }

    fn seek_shared(&self, pos: SeekFrom) -> io::Result<u64> {
        self.try_borrow_mut().map_err(busy)?.seek(pos)
    }

    fn is_live(&self) -> bool {
        self.try_borrow_mut().is_ok()
    }
}

impl SharedStream for File {
    fn read_shared(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut file: &File = self;
        file.read(buf)
    }

    fn seek_shared(&self, pos: SeekFrom) -> io::Result<u64> {
        let mut file: &File = self;
        file.seek(pos)
    }

    fn is_live(&self) -> bool {
        self.metadata().is_ok()
    }
}

/// A non-seekable reader, such as a pipe, socket or child process output,
/// made peekable.
///
/// Reads go through an internal buffer, so [`SharedStream::peek_shared`]
/// returns the next unread bytes without taking them from later readers.
pub struct BufferedStream<R> {
    inner: RefCell<BufReader<R>>,
}

impl<R: Read> BufferedStream<R> {
    /// Wrap `reader`, buffering enough to sniff its leading bytes.
    pub fn new(reader: R) -> Self {
        Self {
            inner: RefCell::new(BufReader::with_capacity(SNIFF_LEN, reader)),
        }
    }

    /// The wrapped reader. Bytes still sitting in the buffer are dropped.
    pub fn into_inner(self) -> R {
        self.inner.into_inner().into_inner()
    }
}

impl<R: Read> SharedStream for BufferedStream<R> {
    fn read_shared(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.try_borrow_mut().map_err(busy)?.read(buf)
    }

    fn seek_shared(&self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "buffered stream cannot seek",
        ))
    }

    fn peek_shared(&self, len: usize) -> io::Result<Vec<u8>> {
        peek_buffered(&mut *self.inner.try_borrow_mut().map_err(busy)?, len)
    }

    fn is_live(&self) -> bool {
        self.inner.try_borrow_mut().is_ok()
    }
}

impl<R> fmt::Debug for BufferedStream<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffered = self.inner.try_borrow().map(|r| r.buffer().len()).ok();
        f.debug_struct("BufferedStream")
            .field("buffered", &buffered)
            .finish()
    }
}

/// A [`Read`] view over a shared stream, continuing from its current position.
pub struct StreamReader<'a> {
    stream: &'a dyn SharedStream,
}

impl<'a> StreamReader<'a> {
    /// Read `stream` from wherever it currently is.
    pub fn new(stream: &'a dyn SharedStream) -> Self {
        Self { stream }
    }
}

impl Read for StreamReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read_shared(buf)
    }
}

struct ByRef<'a, S: ?Sized>(&'a S);

impl<S: SharedStream + ?Sized> Read for ByRef<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read_shared(buf)
    }
}

/// Total length of a seekable stream, leaving the stream where it was.
pub(crate) fn seek_len(stream: &dyn SharedStream) -> io::Result<u64> {
    let position = stream.seek_shared(SeekFrom::Current(0))?;
    let end = stream.seek_shared(SeekFrom::End(0))?;
    stream.seek_shared(SeekFrom::Start(position))?;
    Ok(end)
}

pub(crate) fn read_up_to<R: Read>(reader: R, len: usize) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(len.min(SNIFF_LEN));
    reader.take(len as u64).read_to_end(&mut head)?;
    Ok(head)
}

fn peek_buffered<R: Read>(reader: &mut BufReader<R>, len: usize) -> io::Result<Vec<u8>> {
    let buffered = reader.fill_buf()?;
    Ok(buffered[..buffered.len().min(len)].to_vec())
}

fn busy<E>(_: E) -> io::Error {
    io::Error::other("stream is already borrowed")
}

/// An open local file that remembers the path it was opened against.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    path: PathBuf,
}

impl FileStream {
    /// Open `path` for reading, recording its canonical form.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = fs::canonicalize(path)?;
        let file = File::open(&path)?;
        Ok(Self { file, path })
    }

    /// Wrap an already-open file with the path it was opened against.
    pub fn from_parts(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
        }
    }

    /// The open file.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// The path the file was opened against.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A borrowed handle on an open local file: either a bare [`File`] or a
/// [`FileStream`] that knows its own path.
#[derive(Debug, Clone, Copy)]
pub enum FileHandle<'a> {
    /// A bare file.
    Raw(&'a File),
    /// A file with its recorded path.
    Wrapped(&'a FileStream),
}

impl<'a> FileHandle<'a> {
    /// The underlying file, however it was handed over.
    pub fn file(&self) -> &'a File {
        match *self {
            FileHandle::Raw(file) => file,
            FileHandle::Wrapped(stream) => stream.file(),
        }
    }

    /// The local path backing this handle.
    ///
    /// A wrapper answers from what it recorded. A bare file is asked the
    /// operating system, which only Linux answers here.
    pub fn backing_path(&self) -> Option<PathBuf> {
        match *self {
            FileHandle::Raw(file) => fd_path(file),
            FileHandle::Wrapped(stream) => Some(stream.path().to_path_buf()),
        }
    }
}

impl<'a> From<&'a File> for FileHandle<'a> {
    fn from(file: &'a File) -> Self {
        FileHandle::Raw(file)
    }
}

impl<'a> From<&'a FileStream> for FileHandle<'a> {
    fn from(stream: &'a FileStream) -> Self {
        FileHandle::Wrapped(stream)
    }
}

#[cfg(target_os = "linux")]
fn fd_path(file: &File) -> Option<PathBuf> {
    use std::os::fd::AsRawFd;

    let link = format!("/proc/self/fd/{}", file.as_raw_fd());
    let target = fs::read_link(link).ok()?;
    // Pipes and sockets resolve to things like "pipe:[1234]"; unlinked files
    // get a " (deleted)" suffix.
    let unlinked = target.to_string_lossy().ends_with(" (deleted)");
    (target.is_absolute() && !unlinked).then_some(target)
}

#[cfg(not(target_os = "linux"))]
fn fd_path(_file: &File) -> Option<PathBuf> {
    None
}

/// An open HTTP response body, with the URL and headers it was opened with.
///
/// Reading goes through `&HttpStream`. Bytes consumed by a reader are gone;
/// [`HttpStream::peek`] looks at buffered bytes without consuming them.
pub struct HttpStream {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: RefCell<BufReader<Response>>,
}

impl HttpStream {
    /// Open `url` with a default-configured client.
    pub fn open(url: &str) -> Result<Self> {
        let client = HttpConfig::default().client()?;
        Self::open_with(&client, url)
    }

    /// Open `url` with the given client. Non-2xx statuses are open failures.
    pub fn open_with(client: &Client, url: &str) -> Result<Self> {
        let response = client.get(url).send()?.error_for_status()?;
        tracing::debug!(url, status = %response.status(), "HTTP stream opened");
        Ok(Self {
            url: url.to_string(),
            status: response.status(),
            headers: response.headers().clone(),
            body: RefCell::new(BufReader::with_capacity(SNIFF_LEN, response)),
        })
    }

    /// The URL this stream was opened against, before any redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Status of the response; always a success for an opened stream.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers as received.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value, if present and valid UTF-8.
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// The declared body length.
    pub fn content_length(&self) -> Option<u64> {
        self.header(CONTENT_LENGTH)?.trim().parse().ok()
    }

    /// Up to `len` of the next unread bytes, without consuming them.
    ///
    /// Only what the transport has already delivered into the buffer is
    /// returned, so this may be shorter than `len` even mid-body.
    pub fn peek(&self, len: usize) -> io::Result<Vec<u8>> {
        peek_buffered(&mut *self.body.try_borrow_mut().map_err(busy)?, len)
    }
}

impl Read for &HttpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.try_borrow_mut().map_err(busy)?.read(buf)
    }
}

impl fmt::Debug for HttpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStream")
            .field("url", &self.url)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_peek_restores_position() {
        let cell = RefCell::new(Cursor::new(b"0123456789".to_vec()));
        cell.borrow_mut().set_position(4);
        let head = cell.peek_shared(3).unwrap();
        assert_eq!(head, b"012");
        assert_eq!(cell.borrow().position(), 4);
    }

    #[test]
    fn test_buffered_stream_peek_keeps_bytes() {
        let stream = BufferedStream::new(&b"%PDF-1.7 body"[..]);
        assert!(stream.is_live());
        assert_eq!(stream.peek_shared(4).unwrap(), b"%PDF");
        assert_eq!(stream.peek_shared(4).unwrap(), b"%PDF");

        let mut out = String::new();
        StreamReader::new(&stream).read_to_string(&mut out).unwrap();
        assert_eq!(out, "%PDF-1.7 body");
    }

    #[test]
    fn test_buffered_stream_cannot_seek() {
        let stream = BufferedStream::new(&b"abc"[..]);
        let err = stream.seek_shared(SeekFrom::Current(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert!(seek_len(&stream).is_err());
        assert!(stream.is_live());
    }

    #[test]
    fn test_busy_stream_is_not_live() {
        let cell = RefCell::new(Cursor::new(b"abc".to_vec()));
        let _guard = cell.borrow_mut();
        assert!(!cell.is_live());
        assert!(cell.peek_shared(2).is_err());
    }

    #[test]
    fn test_seek_len_restores_position() {
        let cell = RefCell::new(Cursor::new(vec![0u8; 42]));
        cell.borrow_mut().set_position(7);
        assert_eq!(seek_len(&cell).unwrap(), 42);
        assert_eq!(cell.borrow().position(), 7);
    }

    #[test]
    fn test_stream_reader_continues_from_position() {
        let cell = RefCell::new(Cursor::new(b"hello world".to_vec()));
        cell.borrow_mut().set_position(6);
        let mut out = String::new();
        StreamReader::new(&cell).read_to_string(&mut out).unwrap();
        assert_eq!(out, "world");
    }

    #[test]
    fn test_busy_stream_is_an_error_not_a_panic() {
        let cell = RefCell::new(Cursor::new(b"abc".to_vec()));
        let _guard = cell.borrow_mut();
        assert!(cell.read_shared(&mut [0u8; 2]).is_err());
    }

    #[test]
    fn test_file_stream_records_canonical_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"data").unwrap();
        let stream = FileStream::open(tmp.path()).unwrap();
        assert_eq!(stream.path(), fs::canonicalize(tmp.path()).unwrap());
        let handle = FileHandle::from(&stream);
        assert_eq!(handle.backing_path().as_deref(), Some(stream.path()));
    }

    #[test]
    fn test_file_stream_from_parts() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"data").unwrap();
        let file = File::open(tmp.path()).unwrap();
        let stream = FileStream::from_parts(file, "/srv/uploads/data.bin");
        assert_eq!(stream.path(), Path::new("/srv/uploads/data.bin"));
        assert_eq!(stream.file().metadata().unwrap().len(), 4);
        assert_eq!(
            FileHandle::from(&stream).backing_path(),
            Some(PathBuf::from("/srv/uploads/data.bin"))
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_raw_handle_backing_path() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = File::open(tmp.path()).unwrap();
        let handle = FileHandle::from(&file);
        assert_eq!(
            handle.backing_path(),
            Some(fs::canonicalize(tmp.path()).unwrap())
        );
    }
}
