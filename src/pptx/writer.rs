//! In-memory presentation, built slide by slide and written once.

use super::parts::{
    self, PartInventory, PictureShape, Placeholder, Shape, SlideKind, SlidePart, TextShape,
    TextStyle,
};
use super::template::{self, BLANK_LAYOUT, TITLE_LAYOUT};
use crate::asset::ResolvedAssets;
use crate::container::{rel_types, write_atomic, PackageWriter, Relationships};
use crate::error::{Error, Result};
use crate::model::{DeckMetadata, DeckSpec, Layout, SlideSpec, Theme, TitleSlideSpec};
use crate::picture::{ImageFormat, ImageInfo};
use crate::units::{Emu, RgbColor};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Refers to a slide that has already been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlideHandle(usize);

impl SlideHandle {
    /// Zero-based position in the deck.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An image file embedded once, however many slides show it.
#[derive(Debug, Clone)]
struct MediaPart {
    source: PathBuf,
    format: ImageFormat,
    data: Vec<u8>,
}

impl MediaPart {
    fn part_name(&self, index: usize) -> String {
        format!("image{}.{}", index + 1, self.format.extension())
    }
}

/// A presentation under construction.
///
/// Every mutating call takes the value and hands it back, so a document
/// has exactly one owner until [`Presentation::save`] consumes it.
///
/// # Example
///
/// ```no_run
/// use vetdeck::asset::ResolvedAssets;
/// use vetdeck::model::{SlideSpec, TitleSlideSpec};
/// use vetdeck::pptx::Presentation;
/// use vetdeck::units::inches;
///
/// let doc = Presentation::new(inches(13.33), inches(7.5));
/// let (doc, _) = doc.append_title_slide(&TitleSlideSpec::new("Deck"))?;
/// let (doc, _) = doc.append_slide(
///     &SlideSpec::new("Agenda").with_bullets(["One", "Two"]),
///     &ResolvedAssets::new(),
/// )?;
/// doc.save("deck.pptx")?;
/// # Ok::<(), vetdeck::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Presentation {
    width: Emu,
    height: Emu,
    theme: Theme,
    layout: Layout,
    metadata: DeckMetadata,
    slides: Vec<SlidePart>,
    media: Vec<MediaPart>,
}

impl Presentation {
    /// Create an empty presentation with the given canvas size.
    pub fn new(width: Emu, height: Emu) -> Self {
        Self {
            width,
            height,
            theme: Theme::default(),
            layout: Layout::default(),
            metadata: DeckMetadata::default(),
            slides: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Create an empty presentation using a deck's canvas, theme, layout
    /// and metadata.
    pub fn from_deck(deck: &DeckSpec) -> Self {
        Self::new(deck.width, deck.height)
            .with_theme(deck.theme.clone())
            .with_layout(deck.layout)
            .with_metadata(deck.metadata.clone())
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_metadata(mut self, metadata: DeckMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn width(&self) -> Emu {
        self.width
    }

    pub fn height(&self) -> Emu {
        self.height
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Number of distinct media parts.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Append the opening slide on the title layout.
    pub fn append_title_slide(mut self, spec: &TitleSlideSpec) -> Result<(Self, SlideHandle)> {
        let mut slide = SlidePart::new(SlideKind::Title);
        slide.background = Some(self.theme.background);

        let id = slide.next_shape_id();
        slide.shapes.push(Shape::Text(TextShape {
            id,
            name: format!("Title {}", id),
            placeholder: Some(Placeholder::CenteredTitle),
            rect: None,
            paragraphs: vec![spec.title.clone()],
            style: TextStyle {
                size_pt: None,
                bold: false,
                color: spec.title_color,
            },
        }));

        if !spec.subtitle.is_empty() {
            let id = slide.next_shape_id();
            slide.shapes.push(Shape::Text(TextShape {
                id,
                name: format!("Subtitle {}", id),
                placeholder: Some(Placeholder::Subtitle),
                rect: None,
                paragraphs: spec.subtitle.clone(),
                style: TextStyle {
                    size_pt: None,
                    bold: false,
                    color: spec.subtitle_color,
                },
            }));
        }

        let handle = self.push_slide(slide);
        debug!("slide {}: title slide {:?}", handle.0 + 1, spec.title);
        Ok((self, handle))
    }

    /// Append one content slide on the blank layout.
    ///
    /// The picture, when present, is read from the path `assets` maps its
    /// key to and embedded byte for byte.
    pub fn append_slide(
        mut self,
        spec: &SlideSpec,
        assets: &ResolvedAssets,
    ) -> Result<(Self, SlideHandle)> {
        let mut slide = SlidePart::new(SlideKind::Content);
        slide.background = Some(self.theme.background);

        let id = slide.next_shape_id();
        slide.shapes.push(Shape::Text(TextShape {
            id,
            name: format!("Title {}", id),
            placeholder: None,
            rect: Some(self.layout.title),
            paragraphs: vec![spec.title.clone()],
            style: TextStyle {
                size_pt: Some(self.theme.title_size_pt),
                bold: true,
                color: self.theme.title_color,
            },
        }));

        if !spec.bullets.is_empty() {
            let id = slide.next_shape_id();
            slide.shapes.push(Shape::Text(TextShape {
                id,
                name: format!("Content {}", id),
                placeholder: None,
                rect: Some(self.layout.body),
                paragraphs: spec.bullets.clone(),
                style: TextStyle {
                    size_pt: Some(self.theme.body_size_pt),
                    bold: false,
                    color: self.theme.body_color,
                },
            }));
        }

        if let Some(ref key) = spec.image {
            let path = assets.path(key)?;
            let media = self.embed(path)?;
            let info = ImageInfo::probe(&self.media[media].data)?;
            let cx = self.layout.picture_width.get();
            let id = slide.next_shape_id();
            slide.shapes.push(Shape::Picture(PictureShape {
                id,
                name: format!("Picture {}", id),
                descr: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                media,
                x: self.layout.picture_x,
                y: self.layout.picture_y,
                cx,
                cy: info.scaled_height(cx),
            }));
        }

        slide.notes = spec.notes.clone();

        let handle = self.push_slide(slide);
        debug!("slide {}: {:?}", handle.0 + 1, spec.title);
        Ok((self, handle))
    }

    /// Apply a solid background to a slide that already exists.
    pub fn set_background(mut self, handle: SlideHandle, color: RgbColor) -> Result<Self> {
        let slide = self.slides.get_mut(handle.0).ok_or_else(|| {
            Error::InvalidData(format!("no slide at index {}", handle.0))
        })?;
        slide.background = Some(color);
        Ok(self)
    }

    /// Serialize the whole package into memory.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut pkg = PackageWriter::new();

        let notes_total = self.slides.iter().filter(|s| s.notes.is_some()).count();
        let has_notes = notes_total > 0;

        let inventory = PartInventory {
            slides: self.slides.len(),
            notes_slides: notes_total,
            media_formats: self.media.iter().map(|m| m.format).collect(),
        };
        pkg.add_xml("[Content_Types].xml", &parts::content_types_xml(&inventory)?)?;

        let mut root_rels = Relationships::new();
        root_rels.push(rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml");
        root_rels.push(rel_types::CORE_PROPERTIES, "docProps/core.xml");
        root_rels.push(rel_types::EXTENDED_PROPERTIES, "docProps/app.xml");
        pkg.add_xml("_rels/.rels", &root_rels.to_xml()?)?;
        pkg.add_xml("docProps/core.xml", &parts::core_xml(&self.metadata)?)?;
        pkg.add_xml(
            "docProps/app.xml",
            &parts::app_xml(self.slides.len(), notes_total)?,
        )?;

        // presentation.xml and its relationships
        let mut pres_rels = Relationships::new();
        let master_rel = pres_rels.push(rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        let slide_rels: Vec<String> = (1..=self.slides.len())
            .map(|n| pres_rels.push(rel_types::SLIDE, format!("slides/slide{}.xml", n)))
            .collect();
        let notes_master_rel = if has_notes {
            Some(pres_rels.push(rel_types::NOTES_MASTER, "notesMasters/notesMaster1.xml"))
        } else {
            None
        };
        pres_rels.push(rel_types::PRES_PROPS, "presProps.xml");
        pres_rels.push(rel_types::VIEW_PROPS, "viewProps.xml");
        pres_rels.push(rel_types::THEME, "theme/theme1.xml");
        pres_rels.push(rel_types::TABLE_STYLES, "tableStyles.xml");

        pkg.add_xml(
            "ppt/presentation.xml",
            &parts::presentation_xml(
                self.width,
                self.height,
                &master_rel,
                notes_master_rel.as_deref(),
                &slide_rels,
            )?,
        )?;
        pkg.add_xml("ppt/_rels/presentation.xml.rels", &pres_rels.to_xml()?)?;
        pkg.add_xml("ppt/presProps.xml", &template::pres_props_xml()?)?;
        pkg.add_xml("ppt/viewProps.xml", &template::view_props_xml()?)?;
        pkg.add_xml("ppt/tableStyles.xml", &template::table_styles_xml()?)?;

        // master, layouts and theme
        let mut master_rels = Relationships::new();
        master_rels.push(rel_types::SLIDE_LAYOUT, format!("../slideLayouts/{}", TITLE_LAYOUT));
        master_rels.push(rel_types::SLIDE_LAYOUT, format!("../slideLayouts/{}", BLANK_LAYOUT));
        master_rels.push(rel_types::THEME, "../theme/theme1.xml");
        pkg.add_xml(
            "ppt/slideMasters/slideMaster1.xml",
            &template::slide_master_xml(self.width, self.height)?,
        )?;
        pkg.add_xml(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &master_rels.to_xml()?,
        )?;

        let mut layout_rels = Relationships::new();
        layout_rels.push(rel_types::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        let layout_rels = layout_rels.to_xml()?;
        pkg.add_xml(
            &format!("ppt/slideLayouts/{}", TITLE_LAYOUT),
            &template::title_layout_xml(self.width, self.height)?,
        )?;
        pkg.add_xml(
            &format!("ppt/slideLayouts/_rels/{}.rels", TITLE_LAYOUT),
            &layout_rels,
        )?;
        pkg.add_xml(
            &format!("ppt/slideLayouts/{}", BLANK_LAYOUT),
            &template::blank_layout_xml()?,
        )?;
        pkg.add_xml(
            &format!("ppt/slideLayouts/_rels/{}.rels", BLANK_LAYOUT),
            &layout_rels,
        )?;
        pkg.add_xml("ppt/theme/theme1.xml", &template::theme_xml("Office Theme")?)?;

        if has_notes {
            let mut rels = Relationships::new();
            rels.push(rel_types::THEME, "../theme/theme2.xml");
            pkg.add_xml("ppt/notesMasters/notesMaster1.xml", &template::notes_master_xml()?)?;
            pkg.add_xml(
                "ppt/notesMasters/_rels/notesMaster1.xml.rels",
                &rels.to_xml()?,
            )?;
            pkg.add_xml("ppt/theme/theme2.xml", &template::theme_xml("Notes Theme")?)?;
        }

        // slides and notes
        let mut notes_number = 0;
        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            let mut rels = Relationships::new();
            let layout = match slide.kind {
                SlideKind::Title => TITLE_LAYOUT,
                SlideKind::Content => BLANK_LAYOUT,
            };
            rels.push(rel_types::SLIDE_LAYOUT, format!("../slideLayouts/{}", layout));

            let picture_rels: Vec<String> = slide
                .pictures()
                .map(|pic| {
                    let target = format!("../media/{}", self.media[pic.media].part_name(pic.media));
                    rels.push(rel_types::IMAGE, target)
                })
                .collect();

            if let Some(ref notes) = slide.notes {
                notes_number += 1;
                let notes_part = format!("notesSlide{}.xml", notes_number);
                rels.push(rel_types::NOTES_SLIDE, format!("../notesSlides/{}", notes_part));

                let mut notes_rels = Relationships::new();
                notes_rels.push(rel_types::NOTES_MASTER, "../notesMasters/notesMaster1.xml");
                notes_rels.push(rel_types::SLIDE, format!("../slides/slide{}.xml", number));
                pkg.add_xml(
                    &format!("ppt/notesSlides/{}", notes_part),
                    &parts::notes_slide_xml(notes)?,
                )?;
                pkg.add_xml(
                    &format!("ppt/notesSlides/_rels/{}.rels", notes_part),
                    &notes_rels.to_xml()?,
                )?;
            }

            pkg.add_xml(
                &format!("ppt/slides/slide{}.xml", number),
                &parts::slide_xml(slide, &picture_rels)?,
            )?;
            pkg.add_xml(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &rels.to_xml()?,
            )?;
        }

        for (index, media) in self.media.iter().enumerate() {
            pkg.add_binary(&format!("ppt/media/{}", media.part_name(index)), &media.data)?;
        }

        debug!(
            "serialized {} slides, {} notes, {} media parts",
            self.slides.len(),
            notes_total,
            self.media.len()
        );
        pkg.finish()
    }

    /// Serialize and write the package to `path`.
    ///
    /// The file is created only after serialization has succeeded, and is
    /// moved into place from a temporary sibling once fully written.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let slides = self.slides.len();
        let bytes = self.to_bytes()?;
        write_atomic(path, &bytes)?;
        info!(
            "saved {} slides ({} bytes) to {}",
            slides,
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    fn push_slide(&mut self, slide: SlidePart) -> SlideHandle {
        self.slides.push(slide);
        SlideHandle(self.slides.len() - 1)
    }

    /// Media index for `path`, reading the file on first use.
    fn embed(&mut self, path: &Path) -> Result<usize> {
        if let Some(index) = self.media.iter().position(|m| m.source == path) {
            return Ok(index);
        }
        let data = fs::read(path)?;
        let format = ImageFormat::detect_from_bytes(&data).ok_or_else(|| {
            Error::Image(format!("unrecognized image format: {}", path.display()))
        })?;
        self.media.push(MediaPart {
            source: path.to_path_buf(),
            format,
            data,
        });
        Ok(self.media.len() - 1)
    }
}
