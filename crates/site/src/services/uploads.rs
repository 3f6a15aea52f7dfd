//! File upload storage.
//!
//! Uploaded files are written under a single directory with a generated name
//! `rmt_<unix-millis>_<12 random [a-z0-9]><ext>` and served statically at
//! [`PUBLIC_PREFIX`]. The client's file name only contributes its extension.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::seq::IndexedRandom;
use thiserror::Error;

/// URL path the upload directory is mounted at.
pub const PUBLIC_PREFIX: &str = "/uploads";

const NAME_PREFIX: &str = "rmt_";
const RANDOM_SUFFIX_LEN: usize = 12;
const MAX_EXTENSION_LEN: usize = 10;
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Errors from writing or removing uploaded files.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    Empty,
    #[error("upload I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A file that has been written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Generated file name, e.g. `rmt_1718000000000_k3j9x0a1b2c3.png`.
    pub file_name: String,
    /// Public URL path, e.g. `/uploads/rmt_...png`.
    pub public_path: String,
}

/// Writes uploads into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a freshly generated name derived from `original_name`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Empty` for a zero-length body and
    /// `UploadError::Io` if the directory or file cannot be written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = generate_file_name(original_name);
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        tracing::info!(
            file_name = %file_name,
            original_name = %original_name,
            size = bytes.len(),
            "Stored upload"
        );

        Ok(StoredUpload {
            public_path: format!("{PUBLIC_PREFIX}/{file_name}"),
            file_name,
        })
    }

    /// Remove the file behind a public upload URL.
    ///
    /// URLs outside [`PUBLIC_PREFIX`] (external links, nested paths) are
    /// ignored. Returns whether a file was deleted; an already-missing file
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the file exists but cannot be removed.
    pub async fn remove_by_url(&self, url: &str) -> Result<bool, UploadError> {
        let Some(file_name) = file_name_from_url(url) else {
            return Ok(false);
        };

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Build a new upload name keeping only a sane extension from `original_name`.
#[must_use]
pub fn generate_file_name(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .filter_map(|_| CHARSET.choose(&mut rng).copied().map(char::from))
        .collect();

    let ext = extension_of(original_name)
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    format!("{NAME_PREFIX}{millis}_{suffix}{ext}")
}

/// Lower-cased extension of the last path component, if it is 1-10 ASCII
/// alphanumerics.
fn extension_of(original_name: &str) -> Option<String> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// The bare file name for a URL directly under [`PUBLIC_PREFIX`].
fn file_name_from_url(url: &str) -> Option<&str> {
    let name = url.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.starts_with('.');
    is_plain.then_some(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_generated_shape(name: &str, expected_ext: &str) {
        let rest = name.strip_prefix(NAME_PREFIX).unwrap();
        let rest = rest.strip_suffix(expected_ext).unwrap();
        let (millis, suffix) = rest.split_once('_').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix.len(), RANDOM_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_generate_file_name_keeps_lowercased_extension() {
        let name = generate_file_name("Bridge Saw Photo.JPG");
        assert_generated_shape(&name, ".jpg");
    }

    #[test]
    fn test_generate_file_name_drops_unsafe_extensions() {
        assert_generated_shape(&generate_file_name("noext"), "");
        assert_generated_shape(&generate_file_name(".bashrc"), "");
        assert_generated_shape(&generate_file_name("evil.ph p"), "");
        assert_generated_shape(&generate_file_name("a.verylongextension"), "");
    }

    #[test]
    fn test_generate_file_name_ignores_path_components() {
        let name = generate_file_name("../../etc/cron.d/job.sh");
        assert_generated_shape(&name, ".sh");
        assert!(!name.contains('/'));

        let name = generate_file_name(r"C:\Users\me\clip.MP4");
        assert_generated_shape(&name, ".mp4");
    }

    #[test]
    fn test_generated_names_differ() {
        assert_ne!(generate_file_name("a.png"), generate_file_name("a.png"));
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url("/uploads/rmt_1_abc.png"), Some("rmt_1_abc.png"));
        assert_eq!(file_name_from_url("/uploads/../secret"), None);
        assert_eq!(file_name_from_url("/uploads/"), None);
        assert_eq!(file_name_from_url("/uploadsx/a.png"), None);
        assert_eq!(file_name_from_url("https://cdn.example.com/a.png"), None);
    }

    #[tokio::test]
    async fn test_save_writes_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let stored = store.save("brochure.PDF", b"%PDF-1.7").await.unwrap();

        assert_eq!(stored.public_path, format!("/uploads/{}", stored.file_name));
        assert_ne!(stored.file_name, "brochure.PDF");
        let on_disk = tokio::fs::read(store.dir().join(&stored.file_name))
            .await
            .unwrap();
        assert_eq!(on_disk, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_save_rejects_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        assert!(matches!(
            store.save("a.png", b"").await,
            Err(UploadError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_remove_by_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let stored = store.save("a.png", b"png").await.unwrap();

        assert!(store.remove_by_url(&stored.public_path).await.unwrap());
        assert!(!store.remove_by_url(&stored.public_path).await.unwrap());
        assert!(
            !store
                .remove_by_url("https://cdn.example.com/a.png")
                .await
                .unwrap()
        );
    }
}
