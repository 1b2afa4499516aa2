// File: src/results/file.rs
// Purpose: File results from memory, streams, the web root and absolute paths

use axum::async_trait;
use axum::body::Bytes;
use axum::http::{header, HeaderValue};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::sink::ResponseSink;

const CHUNK_SIZE: usize = 64 * 1024;

/// Content type and download name shared by every file result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOptions {
    pub content_type: String,
    /// Sent as an attachment under this name when set.
    pub download_name: Option<String>,
}

impl FileOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            download_name: None,
        }
    }

    fn apply(&self, sink: &mut dyn ResponseSink, length: Option<u64>) -> Result<(), ResultError> {
        sink.set_content_type(&self.content_type)?;
        sink.insert_header(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"))?;
        if let Some(length) = length {
            sink.insert_header(header::CONTENT_LENGTH, HeaderValue::from(length))?;
        }
        if let Some(name) = &self.download_name {
            let value = HeaderValue::from_str(&content_disposition(name))
                .map_err(|_| ResultError::invalid(format!("invalid download name '{name}'")))?;
            sink.insert_header(header::CONTENT_DISPOSITION, value)?;
        }
        Ok(())
    }
}

/// `attachment; filename="x"; filename*=UTF-8''x` with the plain name
/// reduced to ASCII and quotes escaped.
pub fn content_disposition(name: &str) -> String {
    let ascii: String = name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let quoted = ascii.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        quoted,
        urlencoding::encode(name)
    )
}

async fn copy_to_sink<R>(mut reader: R, sink: &mut dyn ResponseSink) -> Result<(), ResultError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            return Ok(());
        }
        sink.write(Bytes::copy_from_slice(&buffer[..read])).await?;
    }
}

fn open_error(path: &Path, err: io::Error) -> ResultError {
    match err.kind() {
        io::ErrorKind::NotFound => ResultError::FileNotFound(path.to_path_buf()),
        _ => ResultError::Transport(err),
    }
}

async fn send_file(path: &Path, options: &FileOptions, sink: &mut dyn ResponseSink) -> Result<(), ResultError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| open_error(path, err))?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(ResultError::FileNotFound(path.to_path_buf()));
    }
    options.apply(sink, Some(metadata.len()))?;
    copy_to_sink(file, sink).await
}

macro_rules! file_modifiers {
    ($ty:ty) => {
        impl $ty {
            /// Offer the file as a download under `name`.
            pub fn download_name(mut self, name: impl Into<String>) -> Self {
                self.options.download_name = Some(name.into());
                self
            }

            pub fn options(&self) -> &FileOptions {
                &self.options
            }
        }
    };
}

// ============================================================================
// FileContentResult
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Contents {
    Bytes(Bytes),
    /// Read whole when the result executes.
    Path(PathBuf),
}

/// Bytes sent in one write, e.g. a generated spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContentResult {
    contents: Contents,
    options: FileOptions,
}

impl FileContentResult {
    pub fn new(contents: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            contents: Contents::Bytes(contents.into()),
            options: FileOptions::new(content_type),
        }
    }

    /// Contents of the file at `path`, loaded with `tokio::fs` on execute.
    pub fn read(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        Self {
            contents: Contents::Path(path.into()),
            options: FileOptions::new(content_type),
        }
    }
}

file_modifiers!(FileContentResult);

#[async_trait]
impl ActionResult for FileContentResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let FileContentResult { contents, options } = *self;
        let contents = match contents {
            Contents::Bytes(bytes) => bytes,
            Contents::Path(path) => tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|err| open_error(&path, err))?,
        };
        options.apply(sink, Some(contents.len() as u64))?;
        if contents.is_empty() {
            return Ok(());
        }
        sink.write(contents).await
    }
}

// ============================================================================
// FileStreamResult
// ============================================================================

enum Source {
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// Opened when the result executes.
    Path(PathBuf),
}

/// Any async reader, copied to the response in chunks.
pub struct FileStreamResult {
    source: Source,
    options: FileOptions,
}

impl FileStreamResult {
    pub fn new<R>(stream: R, content_type: impl Into<String>) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            source: Source::Reader(Box::new(stream)),
            options: FileOptions::new(content_type),
        }
    }

    /// Stream the file at `path`. Nothing is opened until execute.
    pub fn open(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        Self {
            source: Source::Path(path.into()),
            options: FileOptions::new(content_type),
        }
    }
}

impl fmt::Debug for FileStreamResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStreamResult")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

file_modifiers!(FileStreamResult);

#[async_trait]
impl ActionResult for FileStreamResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let FileStreamResult { source, options } = *self;
        let stream: Box<dyn AsyncRead + Send + Unpin> = match source {
            Source::Reader(reader) => reader,
            Source::Path(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .map_err(|err| open_error(&path, err))?;
                Box::new(file)
            }
        };
        options.apply(sink, None)?;
        copy_to_sink(stream, sink).await
    }
}

// ============================================================================
// VirtualFileResult
// ============================================================================

/// A file under the web root, addressed as `/css/site.css` or `~/css/site.css`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFileResult {
    path: String,
    options: FileOptions,
}

impl VirtualFileResult {
    pub fn new(path: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            options: FileOptions::new(content_type),
        }
    }

    /// Map the virtual path under `web_root`. Paths escaping the root
    /// resolve to nothing.
    pub fn resolve(&self, web_root: &Path) -> Option<PathBuf> {
        let relative = self.path.trim_start_matches('~').trim_start_matches(['/', '\\']);
        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return None;
        }
        Some(web_root.join(relative))
    }
}

file_modifiers!(VirtualFileResult);

#[async_trait]
impl ActionResult for VirtualFileResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let path = self
            .resolve(&ctx.settings.web_root)
            .ok_or_else(|| ResultError::FileNotFound(PathBuf::from(&self.path)))?;
        send_file(&path, &self.options, sink).await
    }
}

// ============================================================================
// PhysicalFileResult
// ============================================================================

/// A file anywhere on disk, by absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalFileResult {
    path: PathBuf,
    options: FileOptions,
}

impl PhysicalFileResult {
    pub fn new(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Result<Self, ResultError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(ResultError::invalid(format!(
                "path '{}' was not rooted",
                path.display()
            )));
        }
        Ok(Self {
            path,
            options: FileOptions::new(content_type),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

file_modifiers!(PhysicalFileResult);

#[async_trait]
impl ActionResult for PhysicalFileResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        send_file(&self.path, &self.options, sink).await
    }
}
