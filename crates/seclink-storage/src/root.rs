//! The shared files root and its path safety rules.

use std::path::{Component, Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use seclink_core::error::{AppError, ErrorKind};
use seclink_core::result::AppResult;

use crate::mime::content_type_for;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// A file opened for redemption.
///
/// Dropping the value (for example when a client disconnects mid-download)
/// drops the stream and closes the underlying file handle.
pub struct SharedFile {
    /// Canonical absolute path of the file.
    pub path: PathBuf,
    /// Name suggested to the client for saving.
    pub filename: String,
    /// Size in bytes at open time.
    pub size: u64,
    /// Guessed MIME type.
    pub content_type: &'static str,
    /// File contents in chunks.
    pub stream: ByteStream,
}

impl std::fmt::Debug for SharedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedFile")
            .field("path", &self.path)
            .field("filename", &self.filename)
            .field("size", &self.size)
            .finish()
    }
}

/// A shareable file found under the root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileEntry {
    /// Path relative to the root, `/`-separated.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modification time, if the platform reports one.
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// The single directory subtree from which files may be shared.
///
/// [`FileRoot::resolve`] is the only way a relative path becomes an
/// absolute one, so link creation and link redemption apply identical
/// checks.
#[derive(Debug, Clone)]
pub struct FileRoot {
    /// Canonical absolute root.
    root: PathBuf,
}

impl FileRoot {
    /// Open the root, creating the directory if needed.
    pub async fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to create files root: {}", root.display()),
                e,
            )
        })?;
        let root = fs::canonicalize(root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to canonicalize files root: {}", root.display()),
                e,
            )
        })?;

        info!(root = %root.display(), "Files root ready");
        Ok(Self { root })
    }

    /// The canonical root directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Fail unless `other` and the root are disjoint (neither contains the other).
    pub async fn ensure_disjoint(&self, other: impl AsRef<Path>) -> AppResult<()> {
        let other = other.as_ref();
        let other = fs::canonicalize(other).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to canonicalize {}", other.display()),
                e,
            )
        })?;

        if other.starts_with(&self.root) || self.root.starts_with(&other) {
            return Err(AppError::configuration(format!(
                "{} overlaps the files root {}",
                other.display(),
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Resolve `relative` to a canonical path of an existing regular file
    /// inside the root.
    ///
    /// Returns `Unsafe` for anything that would land outside the root, either
    /// lexically (`..`, absolute paths) or after following symlinks, and
    /// `NotFound` for an in-root path that is missing or not a regular file.
    pub async fn resolve(&self, relative: &str) -> AppResult<PathBuf> {
        let requested = Path::new(relative);
        if !is_lexically_contained(requested) {
            return Err(AppError::unsafe_path(format!(
                "Path escapes the files root: {relative}"
            )));
        }

        let canonical = match fs::canonicalize(self.root.join(requested)).await {
            Ok(path) => path,
            Err(e) => return Err(resolve_error(relative, e)),
        };

        if !canonical.starts_with(&self.root) {
            return Err(AppError::unsafe_path(format!(
                "Path resolves outside the files root: {relative}"
            )));
        }

        let meta = fs::metadata(&canonical)
            .await
            .map_err(|e| resolve_error(relative, e))?;
        if !meta.is_file() || is_partial_upload(&canonical) {
            return Err(AppError::not_found(format!("Not a regular file: {relative}")));
        }

        Ok(canonical)
    }

    /// Resolve `relative` and open it for streaming.
    pub async fn open_file(&self, relative: &str) -> AppResult<SharedFile> {
        let path = self.resolve(relative).await?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| resolve_error(relative, e))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| resolve_error(relative, e))?
            .len();

        let filename = Path::new(relative)
            .file_name()
            .or_else(|| path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());

        let stream = ReaderStream::new(file);
        Ok(SharedFile {
            content_type: content_type_for(&filename),
            filename,
            path,
            size,
            stream: Box::pin(stream),
        })
    }

    /// List every regular file under the root, sorted by relative path.
    ///
    /// Symlinks are not followed or listed, and neither are uploads still in
    /// progress.
    pub async fn list_files(&self) -> AppResult<Vec<FileEntry>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !file_type.is_file() || is_partial_upload(&path) {
                    continue;
                }

                let Ok(relative) = path.strip_prefix(&self.root) else {
                    continue;
                };
                let meta = entry.metadata().await?;
                files.push(FileEntry {
                    path: to_slash(relative),
                    size_bytes: meta.len(),
                    modified: meta.modified().ok().map(chrono::DateTime::from),
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Save an uploaded file directly under the root and return its size.
    ///
    /// `filename` must be a single path component. The data is written to a
    /// uniquely named `.partial` sibling first and renamed into place once
    /// complete, so a half-written upload is never shareable under its final
    /// name. Concurrent uploads of the same name each complete whole; the
    /// last rename wins.
    pub async fn save_upload<S>(&self, filename: &str, stream: S) -> AppResult<u64>
    where
        S: Stream<Item = Result<Bytes, std::io::Error>>,
    {
        if !is_safe_file_name(filename) {
            return Err(AppError::unsafe_path(format!(
                "Upload file name is not allowed: {filename}"
            )));
        }

        let target = self.root.join(filename);
        let partial = self.root.join(format!(
            ".{filename}.{:016x}{PARTIAL_SUFFIX}",
            rand::random::<u64>()
        ));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&partial)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Io,
                    format!("Failed to create file: {filename}"),
                    e,
                )
            })?;

        let mut stream = std::pin::pin!(stream);
        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    discard(&partial).await;
                    return Err(AppError::with_source(ErrorKind::Io, "Upload stream failed", e));
                }
            };
            total_bytes += chunk.len() as u64;
            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                discard(&partial).await;
                return Err(AppError::with_source(ErrorKind::Io, "Failed to write chunk", e));
            }
        }

        let flushed = file.flush().await;
        drop(file);
        if let Err(e) = flushed {
            discard(&partial).await;
            return Err(AppError::with_source(ErrorKind::Io, "Failed to flush file", e));
        }

        if let Err(e) = fs::rename(&partial, &target).await {
            discard(&partial).await;
            return Err(AppError::with_source(
                ErrorKind::Io,
                format!("Failed to move upload into place: {filename}"),
                e,
            ));
        }

        debug!(filename, bytes = total_bytes, "Saved upload");
        Ok(total_bytes)
    }
}

/// Suffix of in-progress upload files.
const PARTIAL_SUFFIX: &str = ".partial";

/// Whether `path` names an upload that has not been moved into place yet.
fn is_partial_upload(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(PARTIAL_SUFFIX))
}

/// Whether `path` stays under its base when interpreted purely lexically.
fn is_lexically_contained(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Whether `name` is usable as a single file name directly under the root.
fn is_safe_file_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." || name.ends_with(PARTIAL_SUFFIX) {
        return false;
    }
    !name.chars().any(|ch| matches!(ch, '/' | '\\' | '\0'))
}

fn resolve_error(relative: &str, err: std::io::Error) -> AppError {
    match err.kind() {
        std::io::ErrorKind::NotFound => {
            AppError::with_source(ErrorKind::NotFound, format!("File not found: {relative}"), err)
        }
        // Interior NUL bytes and similar malformed paths.
        std::io::ErrorKind::InvalidInput => AppError::with_source(
            ErrorKind::Unsafe,
            format!("Malformed path: {relative}"),
            err,
        ),
        _ => AppError::with_source(
            ErrorKind::Io,
            format!("Failed to access file: {relative}"),
            err,
        ),
    }
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
