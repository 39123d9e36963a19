//! Read a written presentation back into a [`DeckOutline`].

use crate::container::{rel_types, OoxmlContainer, Relationships};
use crate::detect::ensure_pptx_bytes;
use crate::error::{Error, Result};
use crate::model::{DeckOutline, PictureOutline, SlideOutline};
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Slide reference from presentation.xml.
#[derive(Debug, Clone)]
struct SlideRef {
    rel_id: String,
}

/// A text shape found in a slide or notes part.
#[derive(Debug, Default)]
struct TextFrame {
    name: String,
    /// `p:ph/@type`, or `"obj"` for a placeholder without a type
    placeholder: Option<String>,
    paragraphs: Vec<String>,
    has_text_body: bool,
}

impl TextFrame {
    fn is_title(&self) -> bool {
        match self.placeholder.as_deref() {
            Some("title") | Some("ctrTitle") => true,
            Some(_) => false,
            None => self.name.starts_with("Title"),
        }
    }
}

#[derive(Debug, Default)]
struct PictureRef {
    name: Option<String>,
    rel_id: Option<String>,
    width: i64,
    height: i64,
}

/// Everything pulled out of one slide-like part.
#[derive(Debug, Default)]
struct PartContent {
    background: Option<String>,
    frames: Vec<TextFrame>,
    pictures: Vec<PictureRef>,
}

/// Reads slides, text, pictures and notes from a PPTX package.
pub struct DeckReader {
    container: OoxmlContainer,
    slides: Vec<SlideRef>,
    relationships: Relationships,
}

impl DeckReader {
    /// Open a PPTX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        ensure_pptx_bytes(&data)?;
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let relationships = container.read_relationships("ppt/presentation.xml")?;
        let xml = container.read_xml("ppt/presentation.xml")?;
        let slides = Self::parse_slide_list(&xml)?;

        Ok(Self {
            container,
            slides,
            relationships,
        })
    }

    /// Number of slides listed in presentation.xml.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Underlying container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    fn parse_slide_list(xml: &str) -> Result<Vec<SlideRef>> {
        let mut slides = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().local_name().as_ref() == b"sldId" =>
                {
                    // r:id; the unprefixed id is the numeric slide id
                    let rel_id = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() != b"id" && a.key.local_name().as_ref() == b"id")
                        .map(|a| String::from_utf8_lossy(&a.value).to_string());
                    if let Some(rel_id) = rel_id {
                        slides.push(SlideRef { rel_id });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(slides)
    }

    fn parse_slide_size(xml: &str) -> Result<(i64, i64)> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().local_name().as_ref() == b"sldSz" =>
                {
                    let cx = attr_i64(e, b"cx").unwrap_or(0);
                    let cy = attr_i64(e, b"cy").unwrap_or(0);
                    return Ok((cx, cy));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Err(Error::MissingComponent("p:sldSz".to_string()))
    }

    /// Read the whole presentation.
    pub fn read(&self) -> Result<DeckOutline> {
        let mut deck = DeckOutline::new();
        deck.metadata = self.container.parse_core_metadata()?;

        let (width, height) =
            Self::parse_slide_size(&self.container.read_xml("ppt/presentation.xml")?)?;
        deck.width = width;
        deck.height = height;

        for (index, slide_ref) in self.slides.iter().enumerate() {
            let rel = self.relationships.get(&slide_ref.rel_id).ok_or_else(|| {
                Error::MissingComponent(format!("relationship {}", slide_ref.rel_id))
            })?;
            let slide_path = OoxmlContainer::resolve_path("ppt/presentation.xml", &rel.target);
            deck.add_slide(self.read_slide(index, &slide_path)?);
        }

        Ok(deck)
    }

    fn read_slide(&self, index: usize, slide_path: &str) -> Result<SlideOutline> {
        let xml = self.container.read_xml(slide_path)?;
        let rels = self.container.read_relationships(slide_path)?;
        let content = parse_part(&xml)?;

        let mut slide = SlideOutline::new(index);
        slide.background = content.background;

        for frame in content.frames {
            if !frame.has_text_body {
                continue;
            }
            if slide.title.is_none() && frame.is_title() {
                slide.title = Some(frame.paragraphs.join("\n"));
            } else {
                slide.text_boxes.push(frame.paragraphs);
            }
        }

        for pic in content.pictures {
            let Some(rel_id) = pic.rel_id else { continue };
            let rel = rels
                .get(&rel_id)
                .ok_or_else(|| Error::MissingComponent(format!("{} in {}", rel_id, slide_path)))?;
            let media_path = OoxmlContainer::resolve_path(slide_path, &rel.target);
            let data = self.container.read_binary(&media_path)?;
            slide.pictures.push(PictureOutline {
                name: pic.name,
                media_path,
                width: pic.width,
                height: pic.height,
                data,
            });
        }

        slide.notes = self.read_notes(slide_path, &rels)?;
        Ok(slide)
    }

    /// Notes text of a slide: paragraphs of the notes body placeholder.
    fn read_notes(&self, slide_path: &str, rels: &Relationships) -> Result<Option<String>> {
        let Some(rel) = rels.get_by_type(rel_types::NOTES_SLIDE).first().copied() else {
            return Ok(None);
        };
        let notes_path = OoxmlContainer::resolve_path(slide_path, &rel.target);

        let content = parse_part(&self.container.read_xml(&notes_path)?)?;
        let paragraphs: Vec<String> = content
            .frames
            .into_iter()
            .filter(|f| f.placeholder.as_deref() == Some("body"))
            .flat_map(|f| f.paragraphs)
            .collect();

        if paragraphs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(paragraphs.join("\n")))
        }
    }
}

impl std::fmt::Debug for DeckReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckReader")
            .field("slides", &self.slides.len())
            .finish()
    }
}

fn attr_string(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .map(|a| {
            a.unescape_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).to_string())
        })
}

fn attr_i64(e: &BytesStart<'_>, name: &[u8]) -> Option<i64> {
    attr_string(e, name).and_then(|v| v.parse().ok())
}

/// Single pass over a slide or notes part.
fn parse_part(xml: &str) -> Result<PartContent> {
    let mut content = PartContent::default();
    let mut reader = quick_xml::Reader::from_str(xml);
    // a:t content keeps its leading spaces
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut in_bg = false;
    let mut frame: Option<TextFrame> = None;
    let mut picture: Option<PictureRef> = None;
    let mut in_pic_sppr = false;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().local_name().as_ref() {
                    b"bg" if !is_empty => in_bg = true,
                    b"srgbClr" if in_bg => {
                        content.background = attr_string(e, b"val");
                    }
                    b"sp" if !is_empty => frame = Some(TextFrame::default()),
                    b"pic" if !is_empty => picture = Some(PictureRef::default()),
                    b"cNvPr" => {
                        let name = attr_string(e, b"name");
                        if let Some(ref mut f) = frame {
                            f.name = name.unwrap_or_default();
                        } else if let Some(ref mut p) = picture {
                            p.name = name;
                        }
                    }
                    b"ph" => {
                        if let Some(ref mut f) = frame {
                            f.placeholder =
                                Some(attr_string(e, b"type").unwrap_or_else(|| "obj".to_string()));
                        }
                    }
                    b"txBody" => {
                        if let Some(ref mut f) = frame {
                            f.has_text_body = true;
                        }
                    }
                    b"p" if frame.is_some() => {
                        if is_empty {
                            if let Some(ref mut f) = frame {
                                f.paragraphs.push(String::new());
                            }
                        } else {
                            paragraph = Some(String::new());
                        }
                    }
                    b"t" if paragraph.is_some() && !is_empty => in_text = true,
                    b"blip" => {
                        if let Some(ref mut p) = picture {
                            p.rel_id = attr_string(e, b"embed");
                        }
                    }
                    b"spPr" if picture.is_some() && !is_empty => in_pic_sppr = true,
                    b"ext" if in_pic_sppr => {
                        if let Some(ref mut p) = picture {
                            p.width = attr_i64(e, b"cx").unwrap_or(0);
                            p.height = attr_i64(e, b"cy").unwrap_or(0);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if in_text => {
                if let Some(ref mut text) = paragraph {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| Error::XmlParse(err.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(ref e) => match e.name().local_name().as_ref() {
                b"bg" => in_bg = false,
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(text), Some(f)) = (paragraph.take(), frame.as_mut()) {
                        f.paragraphs.push(text);
                    }
                }
                b"sp" => {
                    if let Some(f) = frame.take() {
                        content.frames.push(f);
                    }
                }
                b"spPr" => in_pic_sppr = false,
                b"pic" => {
                    if let Some(p) = picture.take() {
                        content.pictures.push(p);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(content)
}
