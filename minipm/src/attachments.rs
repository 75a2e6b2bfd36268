//! Task attachment cache.
//!
//! Images attached to tasks are copied into a dedicated cache directory under
//! a filename derived from the task id plus the source's extension, so lookup
//! never needs an index — it just probes a fixed list of common extensions.
//! Every operation degrades rather than blocks: a failed copy hands the
//! caller back the original path, a missing file on delete is not an error.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// Extensions probed (and cleaned up) in order.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

pub struct AttachmentCache {
    dir: PathBuf,
}

impl AttachmentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory. Idempotent; called implicitly by the
    /// other operations.
    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Copy `source` into the cache as `{task_id}.{ext}`, replacing any
    /// previous attachment for the task. On failure the original path is
    /// returned so the caller can keep using the uncached image.
    pub async fn cache_image(&self, source: &str, task_id: &str) -> String {
        match self.try_cache(source, task_id).await {
            Ok(cached) => cached,
            Err(e) => {
                log::error!("failed to cache image for task {task_id}: {e}");
                source.to_string()
            }
        }
    }

    async fn try_cache(&self, source: &str, task_id: &str) -> io::Result<String> {
        self.init().await?;
        let ext = infer_extension(source);
        let dest = self.dir.join(format!("{task_id}.{ext}"));
        // Replace a stale copy if one exists; the delete itself may not fail
        // the operation.
        match fs::remove_file(&dest).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::copy(source, &dest).await?;
        Ok(dest.to_string_lossy().into_owned())
    }

    /// Look up a task's cached image by probing the extension list in order.
    pub async fn cached_image(&self, task_id: &str) -> Option<String> {
        for ext in IMAGE_EXTENSIONS {
            let candidate = self.dir.join(format!("{task_id}.{ext}"));
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                return Some(candidate.to_string_lossy().into_owned());
            }
        }
        None
    }

    /// Remove any cached image for the task, whatever its extension.
    pub async fn delete_cached_image(&self, task_id: &str) {
        for ext in IMAGE_EXTENSIONS {
            let candidate = self.dir.join(format!("{task_id}.{ext}"));
            match fs::remove_file(&candidate).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => log::error!("failed to delete cached image {candidate:?}: {e}"),
            }
        }
    }

    /// Remove the whole cache directory and recreate it empty.
    pub async fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        self.init().await
    }

    /// Total size in bytes of everything cached; 0 when the directory is
    /// missing or unreadable.
    pub async fn cache_size(&self) -> u64 {
        let mut total = 0;
        let Ok(mut entries) = fs::read_dir(&self.dir).await else {
            return 0;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Ok(meta) = entry.metadata().await {
                if meta.is_file() {
                    total += meta.len();
                }
            }
        }
        total
    }
}

/// Extension of a source path or URI: text after the last dot, query string
/// stripped, falling back to `jpg` when there is nothing usable.
fn infer_extension(source: &str) -> &str {
    let Some((_, tail)) = source.rsplit_once('.') else {
        return "jpg";
    };
    let ext = tail.split('?').next().unwrap_or_default();
    if ext.is_empty() || ext.contains('/') {
        "jpg"
    } else {
        ext
    }
}
