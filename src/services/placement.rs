//! Upload placement: decides where an uploaded file lives on disk, writes
//! it under a collision-resistant name, and reports the normalized
//! root-relative path that gets persisted alongside the catalog record.

use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::entities::media::MediaType;

/// Random suffix space; wide enough that same-millisecond placements
/// never collide in practice.
const SUFFIX_SPACE: u32 = 1_000_000_000;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("No file was attached to the upload")]
    MissingFile,

    #[error(
        "File type mismatch: you selected \"{declared}\" but the uploaded file is \"{detected}\""
    )]
    TypeMismatch { declared: String, detected: String },

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful placement.
#[derive(Debug, Clone)]
pub struct PlacedFile {
    /// Forward-slash path starting with the storage root folder name,
    /// e.g. `uploads/images/file-1712-42.jpg`.
    pub relative_path: String,
}

pub struct PlacementService {
    root: PathBuf,
    root_name: String,
}

impl PlacementService {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root_name = root
            .file_name()
            .map_or_else(|| "uploads".to_string(), |n| n.to_string_lossy().into_owned());

        Self { root, root_name }
    }

    /// Writes the uploaded bytes under `<root>/<images|videos>/` and returns
    /// the normalized relative path. Rejects the upload when the declared
    /// type does not match the file's detected MIME major type.
    pub async fn place(
        &self,
        field_name: &str,
        original_name: &str,
        content_type: Option<&str>,
        declared: MediaType,
        bytes: &[u8],
    ) -> Result<PlacedFile, PlacementError> {
        let detected = detect_major_type(content_type, original_name);
        if detected != declared.as_str() {
            return Err(PlacementError::TypeMismatch {
                declared: declared.as_str().to_string(),
                detected,
            });
        }

        let dir = self.root.join(declared.dir_name());
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
        }

        let filename = unique_filename(field_name, original_name);
        let dest = dir.join(&filename);

        fs::write(&dest, bytes).await?;

        let relative_path = normalize_relative(&dest, &self.root_name);
        info!(path = %relative_path, bytes = bytes.len(), "Placed uploaded file");

        Ok(PlacedFile { relative_path })
    }
}

/// MIME major type of the upload: the multipart part's declared content
/// type when present, else a guess from the filename extension.
fn detect_major_type(content_type: Option<&str>, original_name: &str) -> String {
    if let Some(ct) = content_type
        && let Some(major) = ct.split('/').next()
        && !major.is_empty()
    {
        return major.to_string();
    }

    mime_guess::from_path(original_name)
        .first()
        .map_or_else(|| "unknown".to_string(), |m| m.type_().as_str().to_string())
}

fn unique_filename(field_name: &str, original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::rng().random_range(0..SUFFIX_SPACE);
    unique_filename_at(field_name, original_name, millis, suffix)
}

fn unique_filename_at(field_name: &str, original_name: &str, millis: i64, suffix: u32) -> String {
    let ext = Path::new(original_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    format!("{field_name}-{millis}-{suffix}{ext}")
}

/// Rewrites a stored path to forward slashes, relative, starting with the
/// storage root folder name. When the root never appears in the path, falls
/// back to `<root>/<last two segments>`.
fn normalize_relative(path: &Path, root_name: &str) -> String {
    let flat = path.to_string_lossy().replace('\\', "/");
    let segments: Vec<&str> = flat
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if let Some(pos) = segments.iter().position(|s| *s == root_name) {
        return segments[pos..].join("/");
    }

    let tail_start = segments.len().saturating_sub(2);
    let tail = segments[tail_start..].join("/");
    format!("{root_name}/{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn filename_keeps_original_extension() {
        let name = unique_filename_at("file", "holiday.mp4", 1_700_000_000_000, 7);
        assert_eq!(name, "file-1700000000000-7.mp4");
    }

    #[test]
    fn filename_without_extension() {
        let name = unique_filename_at("file", "raw", 1_700_000_000_000, 7);
        assert_eq!(name, "file-1700000000000-7");
    }

    #[test]
    fn same_millisecond_names_never_collide_across_suffixes() {
        let millis = 1_700_000_000_000;
        let names: HashSet<String> = (0..1000)
            .map(|suffix| unique_filename_at("file", "a.jpg", millis, suffix))
            .collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn normalize_rewrites_os_separators() {
        let path = Path::new("uploads\\videos\\file-1-2.mp4");
        assert_eq!(
            normalize_relative(path, "uploads"),
            "uploads/videos/file-1-2.mp4"
        );
    }

    #[test]
    fn normalize_strips_leading_segments_up_to_root() {
        let path = Path::new("/srv/app/uploads/images/file-1-2.jpg");
        assert_eq!(
            normalize_relative(path, "uploads"),
            "uploads/images/file-1-2.jpg"
        );
    }

    #[test]
    fn normalize_reconstructs_when_root_is_missing() {
        let path = Path::new("/tmp/elsewhere/images/file-1-2.jpg");
        assert_eq!(
            normalize_relative(path, "uploads"),
            "uploads/images/file-1-2.jpg"
        );
    }

    #[test]
    fn detects_major_type_from_content_type_first() {
        assert_eq!(detect_major_type(Some("image/png"), "clip.mp4"), "image");
    }

    #[test]
    fn falls_back_to_extension_when_content_type_is_absent() {
        assert_eq!(detect_major_type(None, "clip.mp4"), "video");
        assert_eq!(detect_major_type(None, "photo.jpg"), "image");
        assert_eq!(detect_major_type(None, "mystery.bin"), "application");
    }

    #[tokio::test]
    async fn place_rejects_declared_video_with_image_payload() {
        let service = PlacementService::new("uploads");
        let err = service
            .place("file", "photo.png", Some("image/png"), MediaType::Video, b"x")
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("video"));
        assert!(message.contains("image"));
    }

    #[tokio::test]
    async fn place_writes_bytes_and_returns_root_relative_path() {
        let root = std::env::temp_dir()
            .join(format!(
                "mediaspace-place-{}-{}",
                chrono::Utc::now().timestamp_millis(),
                rand::rng().random_range(0..SUFFIX_SPACE)
            ))
            .join("uploads");

        let service = PlacementService::new(&root);
        let placed = service
            .place("file", "photo.png", Some("image/png"), MediaType::Image, b"abc")
            .await
            .expect("placement failed");

        assert!(placed.relative_path.starts_with("uploads/images/file-"));
        assert!(placed.relative_path.ends_with(".png"));

        let on_disk = root.join(
            placed
                .relative_path
                .strip_prefix("uploads/")
                .expect("relative path must start with the root folder"),
        );
        let bytes = tokio::fs::read(&on_disk).await.expect("file missing");
        assert_eq!(bytes, b"abc");

        tokio::fs::remove_dir_all(root.parent().unwrap()).await.ok();
    }
}
