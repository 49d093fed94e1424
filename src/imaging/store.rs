use image::ImageFormat;
use std::path::{Path, PathBuf};

/// What became of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// A PNG was written.
    Saved {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    /// Nothing usable was written; the reason is for logs and events.
    Missing { path: PathBuf, reason: String },
}

impl ImageOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ImageOutcome::Saved { .. })
    }

    pub fn path(&self) -> &Path {
        match self {
            ImageOutcome::Saved { path, .. } | ImageOutcome::Missing { path, .. } => path,
        }
    }
}

/// Decode `bytes` and write them as a PNG at `path`, creating parent dirs.
///
/// Never fails: absent or empty bytes, undecodable data and I/O errors are
/// logged and reported as [`ImageOutcome::Missing`]. An existing file at
/// `path` is overwritten on success and removed otherwise.
pub fn save_image(bytes: Option<&[u8]>, path: &Path) -> ImageOutcome {
    let Some(bytes) = bytes.filter(|b| !b.is_empty()) else {
        tracing::error!(path = %path.display(), "no image data to save");
        return discard_image(path, "no image data");
    };

    match write_png(bytes, path) {
        Ok((width, height)) => {
            tracing::info!(path = %path.display(), width, height, "saved image");
            ImageOutcome::Saved {
                path: path.to_path_buf(),
                width,
                height,
            }
        }
        Err(reason) => {
            tracing::error!(path = %path.display(), %reason, "error saving image");
            discard_image(path, reason)
        }
    }
}

/// Mark the image at `path` missing for this run.
///
/// Paths are shared between runs, so a file left by an earlier run is
/// deleted; a missing image must not be served in its place.
pub fn discard_image(path: &Path, reason: impl Into<String>) -> ImageOutcome {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = %path.display(), "removed image from an earlier run"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::error!(path = %path.display(), error = %e, "cannot remove stale image"),
    }
    ImageOutcome::Missing {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn write_png(bytes: &[u8], path: &Path) -> Result<(u32, u32), String> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
    }
    let img = image::load_from_memory(bytes).map_err(|e| format!("cannot decode image: {}", e))?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| format!("cannot write PNG: {}", e))?;
    Ok((img.width(), img.height()))
}
