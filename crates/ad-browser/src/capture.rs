//! Artifact capture
//!
//! Writes the full-page completion screenshot that serves as the run's
//! proof of submission. Filenames embed a millisecond epoch stamp so they
//! are never reused within a run.

use std::fs;
use std::path::{Path, PathBuf};

use headless_chrome::protocol::cdp::Page;
use serde::Deserialize;
use tracing::info;

use crate::error::{BrowserError, Result};
use crate::session::BrowserSession;

#[derive(Debug, Deserialize)]
struct PageExtent {
    width: f64,
    height: f64,
}

/// Capture a full-page PNG into `dir` (created on first use) and return
/// the absolute path of the written file.
pub fn capture_full_page(session: &BrowserSession, dir: &str, name: &str) -> Result<PathBuf> {
    let dir = absolute_dir(dir)?;
    fs::create_dir_all(&dir)?;

    let stamp = chrono::Utc::now().timestamp_millis();
    let path = artifact_path(&dir, name, stamp);

    let extent = page_extent(session)?;
    let clip = Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width,
        height: extent.height,
        scale: 1.0,
    };

    let bytes = session
        .tab()
        .capture_screenshot(
            Page::CaptureScreenshotFormatOption::Png,
            None,
            Some(clip),
            true,
        )
        .map_err(|e| BrowserError::Screenshot(format!("Failed to capture screenshot: {}", e)))?;

    fs::write(&path, bytes)?;
    info!("Screenshot taken: {}", path.display());

    Ok(path)
}

/// Compose the artifact filename: fixed prefix plus capture timestamp.
pub fn artifact_path(dir: &Path, name: &str, epoch_millis: i64) -> PathBuf {
    dir.join(format!("{}_{}.png", name, epoch_millis))
}

fn absolute_dir(dir: &str) -> Result<PathBuf> {
    let path = Path::new(dir);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn page_extent(session: &BrowserSession) -> Result<PageExtent> {
    let value = session.eval_json(
        "JSON.stringify({ width: document.documentElement.scrollWidth, \
         height: document.documentElement.scrollHeight })",
    )?;
    serde_json::from_value(value)
        .map_err(|e| BrowserError::Screenshot(format!("Failed to measure page: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_embeds_stamp() {
        let path = artifact_path(Path::new("/tmp/shots"), "final_step_payment", 1700000000123);
        assert_eq!(
            path,
            PathBuf::from("/tmp/shots/final_step_payment_1700000000123.png")
        );
    }

    #[test]
    fn test_artifact_paths_differ_by_stamp() {
        let dir = Path::new("shots");
        let a = artifact_path(dir, "final_step_payment", 1);
        let b = artifact_path(dir, "final_step_payment", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_absolute_dir_passthrough() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = absolute_dir(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn test_relative_dir_is_anchored() {
        let resolved = absolute_dir("screenshots").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("screenshots"));
    }
}
