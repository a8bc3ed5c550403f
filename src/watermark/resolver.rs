//! Watermark image resolution.
//!
//! Turns a locator string into a decoded image. Locators are tried as, in
//! order:
//!
//! - `data:<media-type>[;base64],<payload>` inline payloads
//! - absolute filesystem paths
//! - paths relative to the asset being rendered
//! - paths relative to the nearest ancestor web root (e.g. `wwwroot`)
//! - paths relative to the base directory (default: working directory)
//!
//! A `data:` locator that does not decode to an image goes through the path
//! lookups unchanged.
//!
//! Every failure is logged at debug and treated as "no watermark".

use base64::Engine;
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::WatermarkError;

/// Default marker directory name for the web root.
pub const DEFAULT_WEB_ROOT_NAME: &str = "wwwroot";

/// Parsed form of a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkSource<'a> {
    /// Inline `data:` payload, already decoded to raw bytes
    Inline(Vec<u8>),
    /// Malformed `data:` locator
    InvalidInline,
    Path(&'a Path),
}

impl<'a> WatermarkSource<'a> {
    pub fn parse(locator: &'a str) -> Self {
        let is_data_uri = locator
            .get(..5)
            .map(|scheme| scheme.eq_ignore_ascii_case("data:"))
            .unwrap_or(false);
        if !is_data_uri {
            return WatermarkSource::Path(Path::new(locator));
        }

        match decode_data_uri(&locator[5..]) {
            Some(bytes) => WatermarkSource::Inline(bytes),
            None => WatermarkSource::InvalidInline,
        }
    }
}

fn decode_data_uri(rest: &str) -> Option<Vec<u8>> {
    let (header, payload) = rest.split_once(',')?;
    let is_base64 = header
        .rsplit(';')
        .next()
        .map(|param| param.trim().eq_ignore_ascii_case("base64"))
        .unwrap_or(false);

    if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .ok()
    } else {
        Some(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Decode an encoded image, sniffing the format from its bytes.
pub fn decode_image_bytes(data: &[u8]) -> Result<DynamicImage, WatermarkError> {
    image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| WatermarkError::DecodeError(e.to_string()))?
        .decode()
        .map_err(|e| WatermarkError::DecodeError(e.to_string()))
}

/// Resolves watermark locators against the filesystem.
#[derive(Debug, Clone)]
pub struct WatermarkResolver {
    web_root_name: String,
    base_dir: Option<PathBuf>,
}

impl Default for WatermarkResolver {
    fn default() -> Self {
        Self::new(DEFAULT_WEB_ROOT_NAME, None)
    }
}

impl WatermarkResolver {
    pub fn new(web_root_name: impl Into<String>, base_dir: Option<PathBuf>) -> Self {
        Self {
            web_root_name: web_root_name.into(),
            base_dir,
        }
    }

    pub fn web_root_name(&self) -> &str {
        &self.web_root_name
    }

    /// Resolve a locator to a decoded image.
    ///
    /// `asset_path` is the file being rendered; relative locators are first
    /// looked up next to it.
    pub fn resolve(&self, locator: &str, asset_path: &Path) -> Option<DynamicImage> {
        let path = match WatermarkSource::parse(locator) {
            WatermarkSource::Inline(bytes) => match decode_image_bytes(&bytes) {
                Ok(image) => return Some(image),
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        "Inline watermark payload is not an image, trying as path"
                    );
                    Path::new(locator)
                }
            },
            WatermarkSource::InvalidInline => {
                tracing::debug!("Malformed data URI watermark locator, trying as path");
                Path::new(locator)
            }
            WatermarkSource::Path(path) => path,
        };

        if path.as_os_str().is_empty() {
            return None;
        }

        for candidate in self.candidates(path, asset_path) {
            if !candidate.is_file() {
                continue;
            }
            match load_file(&candidate) {
                Ok(image) => {
                    tracing::debug!(path = %candidate.display(), "Resolved watermark image");
                    return Some(image);
                }
                Err(e) => {
                    tracing::debug!(
                        path = %candidate.display(),
                        error = %e,
                        "Watermark candidate could not be loaded"
                    );
                }
            }
        }

        tracing::debug!(locator = %locator, asset = %asset_path.display(), "Watermark not found");
        None
    }

    /// Filesystem locations to try, in priority order
    fn candidates(&self, path: &Path, asset_path: &Path) -> Vec<PathBuf> {
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }

        let mut candidates = Vec::new();
        if let Some(asset_dir) = asset_path.parent() {
            candidates.push(asset_dir.join(path));
            if let Some(web_root) = asset_dir
                .ancestors()
                .find(|dir| dir.file_name().map(|n| n == self.web_root_name.as_str()).unwrap_or(false))
            {
                candidates.push(web_root.join(path));
            }
        }
        match &self.base_dir {
            Some(base) => candidates.push(base.join(path)),
            None => candidates.push(path.to_path_buf()),
        }
        candidates
    }
}

fn load_file(path: &Path) -> Result<DynamicImage, WatermarkError> {
    let data = std::fs::read(path).map_err(|e| WatermarkError::DecodeError(e.to_string()))?;
    decode_image_bytes(&data)
}
