//! Image resolution for the document rendition.
//!
//! Every image reference in the content (profile photo, logos, project
//! screenshots) is made absolute, loaded once, decoded, flattened onto white
//! and stored Flate-compressed so the PDF writer can embed it as-is. A
//! reference that cannot be resolved, fetched or decoded is left out of the
//! catalog; builders then simply omit the image.

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{write::ZlibEncoder, Compression};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::CvData;
use crate::projects::all_images;

/// Longest side, in pixels, an embedded image is downscaled to.
const MAX_IMAGE_SIDE: u32 = 600;
const CONCURRENT_FETCHES: usize = 4;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image reference '{0}' cannot be resolved")]
    Unresolvable(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to decode image: {0}")]
    Decode(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Decoded images
// ────────────────────────────────────────────────────────────────────────────

/// An image ready for embedding: 8-bit RGB, zlib-compressed.
pub struct LoadedImage {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("source", &self.source)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl LoadedImage {
    /// Width in points when drawn at `height` points tall.
    pub fn width_at(&self, height: f32) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        height * self.width as f32 / self.height as f32
    }
}

/// Decodes PNG or JPEG bytes into an embeddable image.
pub fn decode(source: &str, bytes: &[u8]) -> Result<LoadedImage, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let decoded = if decoded.width() > MAX_IMAGE_SIDE || decoded.height() > MAX_IMAGE_SIDE {
        decoded.thumbnail(MAX_IMAGE_SIDE, MAX_IMAGE_SIDE)
    } else {
        decoded
    };

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::Decode("empty image".to_string()));
    }

    // Transparent pixels are composited onto the white page.
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        for channel in [r, g, b] {
            rgb.push(((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8);
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&rgb)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    let data = encoder.finish().map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(LoadedImage {
        source: source.to_string(),
        width,
        height,
        data,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

/// Loaded images keyed by the reference exactly as it appears in the content.
#[derive(Debug, Default, Clone)]
pub struct ImageCatalog {
    images: HashMap<String, Arc<LoadedImage>>,
}

impl ImageCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, image: LoadedImage) {
        self.images.insert(reference.into(), Arc::new(image));
    }

    pub fn get(&self, reference: &str) -> Option<Arc<LoadedImage>> {
        self.images.get(reference).cloned()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Every image reference the document may embed, de-duplicated.
pub fn image_references(cv: &CvData) -> Vec<String> {
    let mut refs = BTreeSet::new();
    refs.extend(cv.personal_info.profile_image.clone());
    for exp in &cv.experiences {
        refs.extend(exp.logos.iter().cloned());
    }
    for formation in &cv.formations {
        refs.extend(formation.image.clone());
    }
    for project in &cv.projects {
        refs.extend(all_images(project).into_iter().map(|i| i.url.clone()));
    }
    for rec in &cv.recommendations {
        refs.extend(rec.logo.clone());
    }
    refs.into_iter().filter(|r| !r.trim().is_empty()).collect()
}

/// Makes a reference absolute against `origin`. `data:` URIs and absolute URLs pass through.
pub fn absolutize(reference: &str, origin: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("data:")
        || reference.starts_with("http://")
        || reference.starts_with("https://")
    {
        return Some(reference.to_string());
    }
    let origin = origin.trim_end_matches('/');
    let path = reference.trim_start_matches("./").trim_start_matches('/');
    Some(format!("{origin}/{path}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

/// Loads image bytes from the local asset root first, then over HTTP.
#[derive(Clone)]
pub struct ImageResolver {
    asset_root: PathBuf,
    public_origin: String,
    client: reqwest::Client,
}

impl ImageResolver {
    /// `timeout` bounds each HTTP fetch, from connect to the last body byte.
    pub fn new(
        asset_root: impl Into<PathBuf>,
        public_origin: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ImageError::Client)?;
        Ok(Self {
            asset_root: asset_root.into(),
            public_origin: public_origin.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Loads every image the content references. Failures are logged and omitted.
    pub async fn load_catalog(&self, cv: &CvData) -> ImageCatalog {
        let refs = image_references(cv);
        let loaded: Vec<(String, Result<LoadedImage, ImageError>)> = stream::iter(refs)
            .map(|reference| async move {
                let result = self.load(&reference).await;
                (reference, result)
            })
            .buffer_unordered(CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut catalog = ImageCatalog::empty();
        for (reference, result) in loaded {
            match result {
                Ok(image) => catalog.insert(reference, image),
                Err(e) => warn!(image = %reference, error = %e, "omitting image from document"),
            }
        }
        debug!(images = catalog.len(), "image catalog loaded");
        catalog
    }

    pub async fn load(&self, reference: &str) -> Result<LoadedImage, ImageError> {
        let bytes = self.fetch(reference).await?;
        decode(reference, &bytes)
    }

    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageError> {
        let url = absolutize(reference, &self.public_origin)
            .ok_or_else(|| ImageError::Unresolvable(reference.to_string()))?;

        if let Some(payload) = url.strip_prefix("data:") {
            return decode_data_uri(payload).ok_or_else(|| ImageError::Unresolvable(reference.to_string()));
        }

        if let Some(path) = self.local_path(&url) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "image not in asset root, fetching over http");
                }
                Err(source) => return Err(ImageError::Io { path, source }),
            }
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ImageError::Http {
                url: url.clone(),
                source,
            })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ImageError::Http { url, source })?;
        Ok(bytes.to_vec())
    }

    /// Maps a URL under the public origin onto the asset root.
    fn local_path(&self, url: &str) -> Option<PathBuf> {
        let path = url.strip_prefix(&self.public_origin)?;
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.asset_root.join(relative))
    }
}

fn decode_data_uri(payload: &str) -> Option<Vec<u8>> {
    let (meta, data) = payload.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(data.trim()).ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
    use std::io::Cursor;

    pub(crate) fn make_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_absolutize() {
        let origin = "https://cv.example.org";
        assert_eq!(
            absolutize("/images/a.png", origin).as_deref(),
            Some("https://cv.example.org/images/a.png")
        );
        assert_eq!(
            absolutize("images/a.png", origin).as_deref(),
            Some("https://cv.example.org/images/a.png")
        );
        assert_eq!(
            absolutize("https://cdn.example.org/x.jpg", origin).as_deref(),
            Some("https://cdn.example.org/x.jpg")
        );
        assert_eq!(absolutize("  ", origin), None);
    }

    #[test]
    fn test_decode_flattens_and_downscales() {
        let image = decode("big.png", &make_png(1200, 300)).unwrap();
        assert_eq!(image.width, MAX_IMAGE_SIDE);
        assert_eq!(image.height, 150);
        assert!((image.width_at(30.0) - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("x", b"not an image"), Err(ImageError::Decode(_))));
    }

    #[tokio::test]
    async fn test_loads_from_asset_root_and_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/logo.png"), make_png(10, 10)).unwrap();

        let resolver = ImageResolver::new(dir.path(), "http://127.0.0.1:9", DEFAULT_FETCH_TIMEOUT).unwrap();
        let image = resolver.load("/images/logo.png").await.unwrap();
        assert_eq!((image.width, image.height), (10, 10));

        let uri = format!("data:image/png;base64,{}", STANDARD.encode(make_png(4, 2)));
        let image = resolver.load(&uri).await.unwrap();
        assert_eq!((image.width, image.height), (4, 2));
    }

    #[tokio::test]
    async fn test_unreachable_image_is_omitted_from_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path(), "http://127.0.0.1:9", DEFAULT_FETCH_TIMEOUT).unwrap();
        let mut cv = (*crate::content::ContentBundle::bundled().unwrap().get(crate::models::Language::En)).clone();
        cv.personal_info.profile_image = Some("/images/missing.png".to_string());
        cv.experiences.iter_mut().for_each(|e| e.logos.clear());
        cv.formations.iter_mut().for_each(|f| f.image = None);
        cv.recommendations.iter_mut().for_each(|r| r.logo = None);
        cv.projects.clear();

        let catalog = resolver.load_catalog(&cv).await;
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_stalled_image_host_times_out() {
        // Accepts connections at the socket level but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path(), origin.as_str(), Duration::from_millis(200)).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), resolver.load(&format!("{origin}/slow.png")))
            .await
            .expect("fetch should give up on its own");
        assert!(matches!(result, Err(ImageError::Http { .. })));
        drop(listener);
    }

    #[test]
    fn test_local_path_rejects_traversal() {
        let resolver = ImageResolver::new("/srv/public", "http://localhost:8080", DEFAULT_FETCH_TIMEOUT).unwrap();
        assert_eq!(
            resolver.local_path("http://localhost:8080/images/a.png?v=2"),
            Some(PathBuf::from("/srv/public/images/a.png"))
        );
        assert_eq!(resolver.local_path("http://localhost:8080/../etc/passwd"), None);
        assert_eq!(resolver.local_path("https://elsewhere.org/a.png"), None);
    }
}
