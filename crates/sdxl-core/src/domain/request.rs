//! The caller's generation request.

use crate::domain::style::Style;

/// Default guidance scale used when the caller does not choose one.
pub const DEFAULT_CFG_SCALE: f64 = 7.5;

/// Everything the caller provides for one generation attempt.
///
/// Prompt and negative prompt are stored untranslated; the client replaces
/// them with their translations just before submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    /// How strictly the generator follows the prompt.
    pub cfg_scale: f64,
    pub style: Style,
}

impl GenerationRequest {
    /// A request for `prompt` with an empty negative prompt, guidance scale
    /// 7.5 and no style.
    ///
    /// ```rust
    /// use sdxl_core::{GenerationRequest, Style};
    ///
    /// let req = GenerationRequest::new("a lighthouse at dusk")
    ///     .with_style(Style::Cinematic)
    ///     .with_cfg_scale(9.0);
    /// assert_eq!(req.negative_prompt, "");
    /// assert_eq!(req.style.token(), "Cinematic");
    /// ```
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: String::new(),
            cfg_scale: DEFAULT_CFG_SCALE,
            style: Style::NoStyle,
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }

    pub fn with_cfg_scale(mut self, cfg_scale: f64) -> Self {
        self.cfg_scale = cfg_scale;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}
