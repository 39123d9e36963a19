//! What a written presentation contains, as read back from the package.

use super::DeckMetadata;
use serde::{Deserialize, Serialize};

/// A picture found on a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureOutline {
    /// Shape name (cNvPr/@name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package path of the media part, e.g. `ppt/media/image1.jpeg`
    pub media_path: String,

    /// Displayed width in EMU
    pub width: i64,

    /// Displayed height in EMU
    pub height: i64,

    /// Embedded image bytes
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// One slide as found in the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideOutline {
    /// Slide index (0-based)
    pub index: usize,

    /// Text of the title shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Paragraph texts of every other text shape, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_boxes: Vec<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pictures: Vec<PictureOutline>,

    /// Speaker notes, paragraphs joined with `\n`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Solid background colour (`RRGGBB`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl SlideOutline {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// All body paragraphs, flattened across text boxes.
    pub fn body_paragraphs(&self) -> Vec<&str> {
        self.text_boxes
            .iter()
            .flat_map(|b| b.iter().map(String::as_str))
            .collect()
    }
}

/// A presentation as read back from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOutline {
    pub metadata: DeckMetadata,

    /// Canvas width in EMU
    pub width: i64,

    /// Canvas height in EMU
    pub height: i64,

    #[serde(default)]
    pub slides: Vec<SlideOutline>,
}

impl DeckOutline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_slide(&mut self, slide: SlideOutline) {
        self.slides.push(slide);
    }

    /// Total number of pictures across all slides.
    pub fn picture_count(&self) -> usize {
        self.slides.iter().map(|s| s.pictures.len()).sum()
    }

    /// Plain text listing: title, body lines and notes per slide.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for slide in &self.slides {
            if let Some(ref title) = slide.title {
                text.push_str(title);
                text.push('\n');
            }
            for line in slide.body_paragraphs() {
                text.push_str(line);
                text.push('\n');
            }
            if let Some(ref notes) = slide.notes {
                text.push_str("--- Notes ---\n");
                text.push_str(notes);
                text.push('\n');
            }
            text.push('\n');
        }
        text.trim().to_string()
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to JSON string (compact).
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let mut deck = DeckOutline::new();
        let mut slide = SlideOutline::new(0);
        slide.title = Some("X".to_string());
        slide.text_boxes.push(vec!["a".to_string(), "b".to_string()]);
        slide.notes = Some("n".to_string());
        deck.add_slide(slide);

        assert_eq!(deck.plain_text(), "X\na\nb\n--- Notes ---\nn");
    }

    #[test]
    fn test_json_skips_image_bytes() {
        let mut deck = DeckOutline::new();
        let mut slide = SlideOutline::new(0);
        slide.pictures.push(PictureOutline {
            name: Some("Picture 4".to_string()),
            media_path: "ppt/media/image1.png".to_string(),
            width: 10,
            height: 5,
            data: vec![1, 2, 3],
        });
        deck.add_slide(slide);

        let json = deck.to_json_compact().unwrap();
        assert!(json.contains("ppt/media/image1.png"));
        assert!(!json.contains("\"data\""));
        assert_eq!(deck.picture_count(), 1);
    }
}
