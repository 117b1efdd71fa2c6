//! Presentation styles understood by the remote SDXL service.
//!
//! The service expects the style as a literal string token inside the
//! parameter frame (for example `"Pixel art"`).  Callers usually pick a style
//! from a numbered list, so lookup is by ordinal index and is total: any index
//! outside the list falls back to [`Style::NoStyle`] instead of failing.

use std::fmt;
use std::str::FromStr;

/// A named presentation style, in the order the service lists them.
///
/// The ordinal position of each variant in [`Style::ALL`] is its index for
/// [`Style::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// Sentinel meaning "apply no style preset".
    #[default]
    NoStyle,
    Cinematic,
    Photographic,
    Anime,
    Manga,
    DigitalArt,
    PixelArt,
    FantasyArt,
    Neonpunk,
    ThreeDModel,
}

impl Style {
    /// Every style in ordinal order.
    pub const ALL: [Style; 10] = [
        Style::NoStyle,
        Style::Cinematic,
        Style::Photographic,
        Style::Anime,
        Style::Manga,
        Style::DigitalArt,
        Style::PixelArt,
        Style::FantasyArt,
        Style::Neonpunk,
        Style::ThreeDModel,
    ];

    /// Returns the style at ordinal `index`.
    ///
    /// Negative or too-large indices yield [`Style::NoStyle`].
    ///
    /// ```rust
    /// use sdxl_core::Style;
    ///
    /// assert_eq!(Style::from_index(3), Style::Anime);
    /// assert_eq!(Style::from_index(-1), Style::NoStyle);
    /// assert_eq!(Style::from_index(99), Style::NoStyle);
    /// ```
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }

    /// The exact token the service expects in the parameter frame.
    pub const fn token(self) -> &'static str {
        match self {
            Style::NoStyle => "(No style)",
            Style::Cinematic => "Cinematic",
            Style::Photographic => "Photographic",
            Style::Anime => "Anime",
            Style::Manga => "Manga",
            Style::DigitalArt => "Digital Art",
            Style::PixelArt => "Pixel art",
            Style::FantasyArt => "Fantasy art",
            Style::Neonpunk => "Neonpunk",
            Style::ThreeDModel => "3D Model",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when parsing a style name that matches no token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style: {0}")]
pub struct UnknownStyle(pub String);

impl FromStr for Style {
    type Err = UnknownStyle;

    /// Parses a style token, ignoring ASCII case (`"pixel art"` → `PixelArt`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.token().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
