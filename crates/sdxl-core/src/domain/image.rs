//! Generated image payloads.
//!
//! The service returns images inline as data URIs.  Only JPEG data URIs whose
//! payload is valid standard base64 are accepted; anything else the server
//! sends is dropped by the codec before it reaches the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// The exact prefix every accepted image entry starts with.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Returns `true` if `candidate` is a JPEG data URI with a valid base64 body.
///
/// The prefix check is done first, so a non-JPEG entry is rejected no matter
/// how well-formed its payload is.
///
/// ```rust
/// use sdxl_core::is_valid_jpeg_data_uri;
///
/// assert!(is_valid_jpeg_data_uri("data:image/jpeg;base64,/9j/4AA="));
/// assert!(!is_valid_jpeg_data_uri("data:image/png;base64,/9j/4AA="));
/// assert!(!is_valid_jpeg_data_uri("data:image/jpeg;base64,not base64!"));
/// ```
pub fn is_valid_jpeg_data_uri(candidate: &str) -> bool {
    match candidate.strip_prefix(JPEG_DATA_URI_PREFIX) {
        Some(payload) => STANDARD.decode(payload).is_ok(),
        None => false,
    }
}

/// A validated `data:image/jpeg;base64,...` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUri(String);

impl ImageDataUri {
    /// Wraps `candidate` if it passes [`is_valid_jpeg_data_uri`].
    pub fn parse(candidate: impl Into<String>) -> Option<Self> {
        let candidate = candidate.into();
        is_valid_jpeg_data_uri(&candidate).then_some(Self(candidate))
    }

    /// The full data URI, prefix included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base64 body after the prefix.
    pub fn payload(&self) -> &str {
        &self.0[JPEG_DATA_URI_PREFIX.len()..]
    }

    /// Decodes the body into raw JPEG bytes.
    ///
    /// # Errors
    ///
    /// Cannot fail for values built through [`ImageDataUri::parse`]; the
    /// `Result` is kept so callers do not need an `unwrap`.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.payload())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ImageDataUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The non-empty, ordered list of images returned by one generation call.
///
/// Order is the order the server listed them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImages(Vec<ImageDataUri>);

impl GeneratedImages {
    /// Returns `None` when `images` is empty.
    pub fn new(images: Vec<ImageDataUri>) -> Option<Self> {
        (!images.is_empty()).then_some(Self(images))
    }

    /// The image a single-result caller should display.
    pub fn first(&self) -> &ImageDataUri {
        // Non-empty by construction.
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageDataUri> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ImageDataUri> {
        self.0
    }
}

impl IntoIterator for GeneratedImages {
    type Item = ImageDataUri;
    type IntoIter = std::vec::IntoIter<ImageDataUri>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a GeneratedImages {
    type Item = &'a ImageDataUri;
    type IntoIter = std::slice::Iter<'a, ImageDataUri>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
