//! Rasterizer bridge: poster markup → PNG file via headless Chrome.

use std::ffi::OsStr;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use image::{ImageFormat, ImageReader};
use thiserror::Error;

use crate::poster::PosterDocument;

/// Flags for running Chrome on constrained servers.
pub const CHROME_FLAGS: &[&str] = &[
    "--no-sandbox",
    "--disable-gpu",
    "--hide-scrollbars",
    "--disable-dev-shm-usage",
    "--disable-software-rasterizer",
];

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    #[error("Rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns poster markup into an image file.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Render `document` and write a PNG to `dest`.
    async fn rasterize(&self, document: &PosterDocument, dest: &Path) -> Result<(), RasterError>;
}

/// Headless Chrome rasterizer. Launches a fresh browser per poster so a hung
/// renderer never outlives its request.
#[derive(Debug, Clone)]
pub struct ChromeRasterizer {
    chrome_path: Option<PathBuf>,
    timeout: Duration,
}

impl ChromeRasterizer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            chrome_path: find_chrome(),
            timeout,
        }
    }

    pub fn with_chrome_path(mut self, path: PathBuf) -> Self {
        self.chrome_path = Some(path);
        self
    }
}

#[async_trait]
impl Rasterizer for ChromeRasterizer {
    async fn rasterize(&self, document: &PosterDocument, dest: &Path) -> Result<(), RasterError> {
        let work_dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(work_dir).map_err(|source| RasterError::Io {
            path: work_dir.to_path_buf(),
            source,
        })?;

        let (width, height) = document.format.dimensions();
        let chrome_path = self.chrome_path.clone();
        let timeout = self.timeout;

        let png = capture_with_timeout(&document.html, work_dir, timeout, move |page| {
            capture_png(chrome_path, page, width, height, timeout)
        })
        .await?;

        validate_png(&png)?;

        std::fs::write(dest, &png).map_err(|source| RasterError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %dest.display(),
            variant = %document.variant_id,
            bytes = png.len(),
            "Poster rasterized"
        );
        Ok(())
    }
}

/// Write `html` to a private temp file in `work_dir`, run `capture` on it on a
/// blocking thread and give up after `timeout`. The temp file is removed on
/// every path.
async fn capture_with_timeout<F>(
    html: &str,
    work_dir: &Path,
    timeout: Duration,
    capture: F,
) -> Result<Vec<u8>, RasterError>
where
    F: FnOnce(&Path) -> Result<Vec<u8>, RasterError> + Send + 'static,
{
    // Chrome loads the markup from disk so relative fetches behave like a page
    let mut markup = tempfile::Builder::new()
        .prefix(".chefart-")
        .suffix(".html")
        .tempfile_in(work_dir)
        .map_err(|source| RasterError::Io {
            path: work_dir.to_path_buf(),
            source,
        })?;
    if let Err(source) = markup.write_all(html.as_bytes()) {
        return Err(RasterError::Io {
            path: markup.path().to_path_buf(),
            source,
        });
    }

    let page = markup.path().to_path_buf();
    let task = tokio::task::spawn_blocking(move || capture(&page));
    let result = tokio::time::timeout(timeout, task).await;

    let markup_path = markup.path().to_path_buf();
    if let Err(e) = markup.close() {
        tracing::debug!(path = %markup_path.display(), error = %e, "Failed to remove poster markup");
    }

    match result {
        Err(_) => Err(RasterError::Timeout(timeout)),
        Ok(Err(join_error)) => Err(RasterError::Unavailable(join_error.to_string())),
        Ok(Ok(captured)) => captured,
    }
}

fn capture_png(
    chrome_path: Option<PathBuf>,
    page: &Path,
    width: u32,
    height: u32,
    timeout: Duration,
) -> Result<Vec<u8>, RasterError> {
    let unavailable = |what: &str, e: &dyn std::fmt::Display| {
        RasterError::Unavailable(format!("{}: {}", what, e))
    };

    let page_url = url::Url::from_file_path(page)
        .map_err(|_| RasterError::Unavailable(format!("Bad poster path {}", page.display())))?;

    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .sandbox(false)
        .window_size(Some((width, height)))
        .idle_browser_timeout(timeout)
        .args(CHROME_FLAGS.iter().map(OsStr::new).collect())
        .path(chrome_path);
    let options = builder
        .build()
        .map_err(|e| unavailable("Invalid launch options", &e))?;

    tracing::debug!(width, height, "Launching headless Chrome");
    let browser = Browser::new(options).map_err(|e| unavailable("Failed to launch browser", &e))?;
    let tab = browser
        .new_tab()
        .map_err(|e| unavailable("Failed to create tab", &e))?;
    tab.set_default_timeout(timeout);

    tab.navigate_to(page_url.as_str())
        .map_err(|e| unavailable("Failed to open poster", &e))?
        .wait_until_navigated()
        .map_err(|e| unavailable("Poster did not finish loading", &e))?;

    let clip = Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: f64::from(width),
        height: f64::from(height),
        scale: 1.0,
    };

    tab.capture_screenshot(
        Page::CaptureScreenshotFormatOption::Png,
        None,
        Some(clip),
        true,
    )
    .map_err(|e| unavailable("Failed to capture screenshot", &e))
}

/// Reject captures that are not a decodable PNG header.
pub fn validate_png(data: &[u8]) -> Result<(u32, u32), RasterError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| RasterError::Unavailable(format!("Unreadable capture: {}", e)))?;

    if reader.format() != Some(ImageFormat::Png) {
        return Err(RasterError::Unavailable(
            "Capture is not a PNG image".to_string(),
        ));
    }

    reader
        .into_dimensions()
        .map_err(|e| RasterError::Unavailable(format!("Corrupt PNG capture: {}", e)))
}

/// Find a Chrome/Chromium executable: `CHROME` env var first, then the
/// Playwright cache. `None` lets headless_chrome use its own detection.
pub fn find_chrome() -> Option<PathBuf> {
    if let Ok(chrome_path) = std::env::var("CHROME") {
        let path = PathBuf::from(&chrome_path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Using Chrome from CHROME env var");
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "CHROME points at a missing file");
    }

    let playwright_cache = dirs::home_dir()?.join(".cache/ms-playwright");
    let mut chrome_dirs: Vec<_> = std::fs::read_dir(&playwright_cache)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("chromium-"))
        .collect();
    // Newest version first
    chrome_dirs.sort_by_key(|d| std::cmp::Reverse(d.file_name()));

    chrome_dirs.iter().find_map(|dir| {
        ["chrome-linux64/chrome", "chrome-linux/chrome"]
            .iter()
            .map(|sub| dir.path().join(sub))
            .find(|p| p.exists())
            .inspect(|p| tracing::debug!(path = %p.display(), "Found Chrome in Playwright cache"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FormatSpec, StylePreset};
    use image::{ImageBuffer, Rgb};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chefart-raster-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn html_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "html"))
            .collect()
    }

    fn document() -> PosterDocument {
        PosterDocument {
            html: "<p>Crispy Fried Egg</p>".to_string(),
            style: StylePreset::DEFAULT,
            format: FormatSpec::DEFAULT,
            variant_id: "A".to_string(),
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_validate_png_accepts_png() {
        assert_eq!(validate_png(&png_bytes(4, 3)).unwrap(), (4, 3));
    }

    #[test]
    fn test_validate_png_rejects_other_data() {
        assert!(matches!(
            validate_png(b"not an image"),
            Err(RasterError::Unavailable(_))
        ));
        assert!(validate_png(&[]).is_err());
    }

    #[test]
    fn test_chrome_flags_disable_sandbox_and_gpu() {
        assert!(CHROME_FLAGS.contains(&"--no-sandbox"));
        assert!(CHROME_FLAGS.contains(&"--disable-gpu"));
        assert!(CHROME_FLAGS.contains(&"--hide-scrollbars"));
    }

    #[tokio::test]
    async fn test_capture_reads_markup_then_removes_it() {
        let dir = scratch_dir();

        let bytes = capture_with_timeout("<p>egg</p>", &dir, Duration::from_secs(5), |page| {
            std::fs::read(page).map_err(|e| RasterError::Unavailable(e.to_string()))
        })
        .await
        .unwrap();

        assert_eq!(bytes, b"<p>egg</p>");
        assert!(html_files(&dir).is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_hung_capture_times_out_and_removes_markup() {
        let dir = scratch_dir();
        let timeout = Duration::from_millis(50);

        let result = capture_with_timeout("<p>egg</p>", &dir, timeout, |_page| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Vec::new())
        })
        .await;

        match result {
            Err(RasterError::Timeout(t)) => assert_eq!(t, timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(html_files(&dir).is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_rasterize_leaves_existing_html_alone() {
        let dir = scratch_dir();
        let user_file = dir.join("poster.html");
        std::fs::write(&user_file, "USER DATA").unwrap();

        let rasterizer = ChromeRasterizer::new(Duration::from_secs(5))
            .with_chrome_path(PathBuf::from("/nonexistent/chrome"));
        let result = rasterizer.rasterize(&document(), &dir.join("poster.png")).await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&user_file).unwrap(), "USER DATA");
        assert_eq!(html_files(&dir), vec![user_file]);
        assert!(!dir.join("poster.png").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
