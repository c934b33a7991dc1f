use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::dev_print;
use crate::error::UploadError;
use crate::multipart::{DecodedFile, Form};
use crate::Options;

/// Name used when a declared filename sanitizes to nothing.
const FALLBACK_FILENAME: &str = "upload";
const MAX_COLLISION_ATTEMPTS: usize = 1000;

/// Where a decoded file ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub field_name: String,
    /// Filename as declared by the client.
    pub original_filename: String,
    /// Filename actually written, after sanitizing and collision renaming.
    pub filename: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Writes uploads into a single directory. Paths are always built from
/// [`sanitize_filename`], and existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(options.upload_path())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn save(&self, file: &DecodedFile) -> Result<StoredFile, UploadError> {
        fs::create_dir_all(&self.dir).await?;

        let filename = sanitize_filename(&file.filename);
        let (stem, extension) = split_extension(&filename);

        for attempt in 0..MAX_COLLISION_ATTEMPTS {
            let candidate = match attempt {
                0 => filename.clone(),
                n => format!("{} ({}){}", stem, n, extension),
            };
            let path = self.dir.join(&candidate);

            let handle = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(handle) => handle,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            write_or_remove(handle, &path, &file.content).await?;

            dev_print!("stored upload {:?} ({} bytes)", path, file.len());
            return Ok(StoredFile {
                field_name: file.field_name.clone(),
                original_filename: file.filename.clone(),
                filename: candidate,
                path,
                size: file.len(),
            });
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for {:?} in {:?}", filename, self.dir),
        )
        .into())
    }

    /// Saves every file of the form in order. Stops at the first failure;
    /// files written before it are left in place.
    pub async fn save_all(&self, form: &Form) -> Result<Vec<StoredFile>, UploadError> {
        let mut stored = Vec::with_capacity(form.files().len());
        for file in form.files() {
            stored.push(self.save(file).await?);
        }
        Ok(stored)
    }
}

// A failed write removes the file it created, so a truncated upload never
// occupies a name.
async fn write_or_remove<W>(mut handle: W, path: &Path, content: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let result = match handle.write_all(content).await {
        Ok(()) => handle.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        drop(handle);
        dev_print!("removing partial upload {:?}: {}", path, e);
        let _ = fs::remove_file(path).await;
        return Err(e);
    }
    Ok(())
}

/// Reduces a client-supplied filename to a single safe path component.
///
/// Keeps only the last segment after `/` or `\`, drops control characters and
/// leading dots, and falls back to `upload` when nothing is left.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().trim_start_matches('.').trim();

    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => filename.split_at(pos),
        _ => (filename, ""),
    }
}
