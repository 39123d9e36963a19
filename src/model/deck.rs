//! Deck-level description: canvas, theme, geometry, assets and slides.

use super::{SlideSpec, TitleSlideSpec};
use crate::asset::AssetRef;
use crate::container::check_xml_text;
use crate::error::{Error, Result};
use crate::units::{inches, Emu, RgbColor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Package metadata written to docProps/core.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckMetadata {
    /// Presentation title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Colours and font sizes shared by every slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: RgbColor,
    pub title_color: RgbColor,
    pub body_color: RgbColor,
    /// Title size in points
    pub title_size_pt: f64,
    /// Body size in points
    pub body_size_pt: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: RgbColor::new(0, 51, 102),
            title_color: RgbColor::WHITE,
            body_color: RgbColor::WHITE,
            title_size_pt: 32.0,
            body_size_pt: 18.0,
        }
    }
}

/// An axis-aligned box on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Emu,
    pub y: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    /// Build a rect from inch values.
    pub fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: inches(x),
            y: inches(y),
            width: inches(width),
            height: inches(height),
        }
    }

    /// Right edge.
    pub fn right(&self) -> Emu {
        self.x + self.width
    }
}

/// Fixed positions for the elements of a content slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub title: Rect,
    pub body: Rect,
    /// Top-left corner of the picture
    pub picture_x: Emu,
    pub picture_y: Emu,
    /// Display width of the picture; height follows the aspect ratio
    pub picture_width: Emu,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: Rect::from_inches(0.5, 0.3, 12.0, 0.8),
            body: Rect::from_inches(0.5, 1.5, 7.5, 5.5),
            picture_x: inches(8.5),
            picture_y: inches(1.8),
            picture_width: inches(4.2),
        }
    }
}

impl Layout {
    /// Reject geometry where the picture would overlap the body box.
    pub fn validate(&self) -> Result<()> {
        if self.picture_width.get() <= 0 {
            return Err(Error::InvalidData(
                "picture width must be positive".to_string(),
            ));
        }
        if self.picture_x < self.body.right() {
            return Err(Error::InvalidData(format!(
                "picture starts at {} EMU but the body box ends at {} EMU",
                self.picture_x,
                self.body.right()
            )));
        }
        Ok(())
    }
}

/// A complete, static deck definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSpec {
    #[serde(default)]
    pub metadata: DeckMetadata,

    /// Canvas width
    pub width: Emu,

    /// Canvas height
    pub height: Emu,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub layout: Layout,

    /// Assets resolved before the first slide is built
    #[serde(default)]
    pub assets: Vec<AssetRef>,

    pub title_slide: TitleSlideSpec,

    /// Content slides in display order
    #[serde(default)]
    pub slides: Vec<SlideSpec>,
}

impl DeckSpec {
    /// Total slides the deck produces, title slide included.
    pub fn slide_count(&self) -> usize {
        self.slides.len() + 1
    }

    /// Look up an asset by key.
    pub fn asset(&self, key: &str) -> Option<&AssetRef> {
        self.assets.iter().find(|a| a.key == key)
    }

    /// Check internal consistency before any I/O happens.
    pub fn validate(&self) -> Result<()> {
        if self.width.get() <= 0 || self.height.get() <= 0 {
            return Err(Error::InvalidData(format!(
                "canvas must have a positive size, got {}x{} EMU",
                self.width, self.height
            )));
        }
        self.layout.validate()?;

        let mut keys = HashSet::new();
        let mut files = HashSet::new();
        for asset in &self.assets {
            if !keys.insert(asset.key.as_str()) {
                return Err(Error::InvalidData(format!(
                    "duplicate asset key: {}",
                    asset.key
                )));
            }
            if !files.insert(asset.file_name.as_str()) {
                return Err(Error::InvalidData(format!(
                    "asset file name used twice: {}",
                    asset.file_name
                )));
            }
        }

        for (index, slide) in self.slides.iter().enumerate() {
            if slide.title.trim().is_empty() {
                return Err(Error::InvalidData(format!(
                    "slide {} has an empty title",
                    index + 2
                )));
            }
            if let Some(ref key) = slide.image {
                if !keys.contains(key.as_str()) {
                    return Err(Error::UnknownAsset(key.clone()));
                }
            }
        }

        self.texts().try_for_each(check_xml_text)
    }

    /// Every piece of text that ends up in the package.
    fn texts(&self) -> impl Iterator<Item = &str> {
        let metadata = [
            &self.metadata.title,
            &self.metadata.author,
            &self.metadata.subject,
        ]
        .into_iter()
        .filter_map(|t| t.as_deref());
        let title_slide = std::iter::once(self.title_slide.title.as_str())
            .chain(self.title_slide.subtitle.iter().map(String::as_str));
        let slides = self.slides.iter().flat_map(|s| {
            std::iter::once(s.title.as_str())
                .chain(s.bullets.iter().map(String::as_str))
                .chain(s.notes.as_deref())
        });
        metadata.chain(title_slide).chain(slides)
    }

    /// Load a deck from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Parse a deck from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let deck: DeckSpec = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_deck() -> DeckSpec {
        DeckSpec {
            metadata: DeckMetadata::default(),
            width: inches(13.33),
            height: inches(7.5),
            theme: Theme::default(),
            layout: Layout::default(),
            assets: vec![AssetRef::new("a", "https://example.org/a.jpg", "a.jpg")],
            title_slide: TitleSlideSpec::new("Deck"),
            slides: vec![
                SlideSpec::new("X").with_bullets(["a", "b"]),
                SlideSpec::new("Y").with_image("a"),
            ],
        }
    }

    #[test]
    fn test_default_layout_does_not_overlap() {
        let layout = Layout::default();
        layout.validate().unwrap();
        assert!(layout.picture_x >= layout.body.right());
    }

    #[test]
    fn test_overlapping_layout_rejected() {
        let layout = Layout {
            body: Rect::from_inches(0.5, 1.5, 9.0, 5.5),
            picture_x: inches(5.5),
            ..Layout::default()
        };
        assert!(matches!(layout.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_validate_ok() {
        let deck = small_deck();
        deck.validate().unwrap();
        assert_eq!(deck.slide_count(), 3);
        assert!(deck.asset("a").is_some());
    }

    #[test]
    fn test_validate_unknown_image_key() {
        let mut deck = small_deck();
        deck.slides.push(SlideSpec::new("Z").with_image("nope"));
        assert!(matches!(deck.validate(), Err(Error::UnknownAsset(k)) if k == "nope"));
    }

    #[test]
    fn test_validate_duplicate_file_name() {
        let mut deck = small_deck();
        deck.assets
            .push(AssetRef::new("b", "https://example.org/b.jpg", "a.jpg"));
        assert!(matches!(deck.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_validate_empty_title() {
        let mut deck = small_deck();
        deck.slides.push(SlideSpec::new("  "));
        assert!(matches!(deck.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_validate_control_characters() {
        let mut deck = small_deck();
        deck.slides[0].bullets.push("Ca\u{1}P".to_string());
        assert!(matches!(deck.validate(), Err(Error::InvalidData(_))));

        let mut deck = small_deck();
        deck.slides[1].notes = Some("line\u{b}break".to_string());
        assert!(matches!(deck.validate(), Err(Error::InvalidData(_))));

        let mut deck = small_deck();
        deck.metadata.author = Some("\u{7}".to_string());
        assert!(matches!(deck.validate(), Err(Error::InvalidData(_))));

        let mut deck = small_deck();
        deck.title_slide.subtitle.push("tab\tand\r\nnewline are fine".to_string());
        deck.validate().unwrap();
    }

    #[test]
    fn test_json_with_control_character_rejected() {
        let json = r##"{
            "width": 9144000,
            "height": 6858000,
            "title_slide": {"title": "T\u0001", "title_color": "#FFFFFF", "subtitle_color": "#DDDDDD"}
        }"##;
        assert!(matches!(DeckSpec::from_json(json), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_defaults() {
        let deck = small_deck();
        let json = deck.to_json().unwrap();
        let back = DeckSpec::from_json(&json).unwrap();
        assert_eq!(back, deck);
    }

    #[test]
    fn test_json_minimal_deck_uses_theme_defaults() {
        let json = r##"{
            "width": 9144000,
            "height": 6858000,
            "title_slide": {"title": "T", "title_color": "#FFFFFF", "subtitle_color": "#DDDDDD"},
            "slides": [{"title": "One", "bullets": ["x"]}]
        }"##;
        let deck = DeckSpec::from_json(json).unwrap();
        assert_eq!(deck.theme, Theme::default());
        assert_eq!(deck.layout, Layout::default());
        assert_eq!(deck.slides[0].bullets, vec!["x"]);
    }
}
