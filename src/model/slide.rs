//! Slide descriptions.

use crate::units::RgbColor;
use serde::{Deserialize, Serialize};

/// One content slide: a title, optional bullet lines, an optional picture
/// and optional speaker notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Title text, written verbatim
    pub title: String,

    /// Body lines in display order, one paragraph each
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,

    /// Key of a resolved asset to show beside the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Speaker notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Background to re-apply after the slide has been created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<RgbColor>,
}

impl SlideSpec {
    /// A slide with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the body lines.
    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    /// Show the asset registered under `key`.
    pub fn with_image(mut self, key: impl Into<String>) -> Self {
        self.image = Some(key.into());
        self
    }

    /// Attach speaker notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Re-apply `color` as the background once the slide exists.
    pub fn with_background(mut self, color: RgbColor) -> Self {
        self.background = Some(color);
        self
    }
}

/// The opening slide, built on the title layout's placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSlideSpec {
    pub title: String,

    /// Subtitle lines, one paragraph each
    #[serde(default)]
    pub subtitle: Vec<String>,

    pub title_color: RgbColor,

    pub subtitle_color: RgbColor,
}

impl TitleSlideSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: Vec::new(),
            title_color: RgbColor::WHITE,
            subtitle_color: RgbColor::new(221, 221, 221),
        }
    }

    pub fn with_subtitle<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtitle = lines.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let spec = SlideSpec::new("X")
            .with_bullets(["a", "b", "a"])
            .with_image("lat")
            .with_notes("say this");
        assert_eq!(spec.title, "X");
        assert_eq!(spec.bullets, vec!["a", "b", "a"]);
        assert_eq!(spec.image.as_deref(), Some("lat"));
        assert_eq!(spec.notes.as_deref(), Some("say this"));
        assert_eq!(spec.background, None);
    }

    #[test]
    fn test_optional_fields_omitted_in_json() {
        let json = serde_json::to_string(&SlideSpec::new("Only title")).unwrap();
        assert_eq!(json, r#"{"title":"Only title"}"#);

        let back: SlideSpec = serde_json::from_str(&json).unwrap();
        assert!(back.bullets.is_empty());
        assert!(back.notes.is_none());
    }
}
