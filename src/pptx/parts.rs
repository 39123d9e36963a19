//! XML generators for the per-deck parts: slides, notes, presentation,
//! content types and document properties.

use super::template::{group_props, open_root, XML_DECL};
use crate::container::escape_xml_text;
use crate::detect::PPTX_CONTENT_TYPE;
use crate::error::{Error, Result};
use crate::model::{DeckMetadata, Rect};
use crate::picture::ImageFormat;
use crate::units::{Emu, RgbColor};
use std::fmt::Write as FmtWrite;

pub(crate) const SLIDE_CT: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub(crate) const SLIDE_LAYOUT_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
pub(crate) const SLIDE_MASTER_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
pub(crate) const NOTES_SLIDE_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
pub(crate) const NOTES_MASTER_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
pub(crate) const THEME_CT: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
pub(crate) const PRES_PROPS_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
pub(crate) const VIEW_PROPS_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
pub(crate) const TABLE_STYLES_CT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
pub(crate) const CORE_CT: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub(crate) const APP_CT: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Notes page size (portrait letter), the PowerPoint default.
pub(crate) const NOTES_WIDTH: i64 = 6_858_000;
pub(crate) const NOTES_HEIGHT: i64 = 9_144_000;

/// Character formatting applied to every run of a text shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextStyle {
    /// Size in points; `None` inherits from the layout
    pub size_pt: Option<f64>,
    pub bold: bool,
    pub color: RgbColor,
}

/// Placeholder a text shape fills on the title layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    CenteredTitle,
    Subtitle,
}

impl Placeholder {
    fn ph_xml(self) -> &'static str {
        match self {
            Self::CenteredTitle => r#"<p:ph type="ctrTitle"/>"#,
            Self::Subtitle => r#"<p:ph type="subTitle" idx="1"/>"#,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextShape {
    pub id: u32,
    pub name: String,
    pub placeholder: Option<Placeholder>,
    /// Explicit position; placeholders without one inherit the layout's
    pub rect: Option<Rect>,
    pub paragraphs: Vec<String>,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PictureShape {
    pub id: u32,
    pub name: String,
    pub descr: String,
    /// Index into the presentation's media list
    pub media: usize,
    pub x: Emu,
    pub y: Emu,
    pub cx: i64,
    pub cy: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    Text(TextShape),
    Picture(PictureShape),
}

/// Which layout a slide is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlideKind {
    Title,
    Content,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlidePart {
    pub kind: SlideKind,
    pub background: Option<RgbColor>,
    pub shapes: Vec<Shape>,
    pub notes: Option<String>,
}

impl SlidePart {
    pub fn new(kind: SlideKind) -> Self {
        Self {
            kind,
            background: None,
            shapes: Vec::new(),
            notes: None,
        }
    }

    /// Next free shape id; id 1 belongs to the shape tree itself.
    pub fn next_shape_id(&self) -> u32 {
        self.shapes.len() as u32 + 2
    }

    pub fn pictures(&self) -> impl Iterator<Item = &PictureShape> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture(p) => Some(p),
            Shape::Text(_) => None,
        })
    }
}

fn write_solid_fill(xml: &mut String, color: RgbColor) -> Result<()> {
    write!(
        xml,
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
        color.to_hex()
    )?;
    Ok(())
}

fn write_xfrm(xml: &mut String, x: Emu, y: Emu, cx: i64, cy: i64) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        x, y, cx, cy
    )?;
    Ok(())
}

fn write_paragraph(xml: &mut String, text: &str, style: &TextStyle) -> Result<()> {
    xml.push_str("<a:p><a:r>");
    xml.push_str(r#"<a:rPr lang="en-US""#);
    if let Some(size) = style.size_pt {
        write!(xml, r#" sz="{}""#, (size * 100.0).round() as i64)?;
    }
    if style.bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    write_solid_fill(xml, style.color)?;
    xml.push_str("</a:rPr>");
    write!(xml, "<a:t>{}</a:t>", escape_xml_text(text)?)?;
    xml.push_str("</a:r></a:p>");
    Ok(())
}

fn write_text_shape(xml: &mut String, shape: &TextShape) -> Result<()> {
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/>"#,
        shape.id,
        escape_xml_text(&shape.name)?
    )?;
    match shape.placeholder {
        Some(ph) => {
            xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
            write!(xml, "<p:nvPr>{}</p:nvPr>", ph.ph_xml())?;
        }
        None => xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/>"#),
    }
    xml.push_str("</p:nvSpPr>");

    match shape.rect {
        Some(rect) => {
            xml.push_str("<p:spPr>");
            write_xfrm(xml, rect.x, rect.y, rect.width.get(), rect.height.get())?;
            xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
            if shape.placeholder.is_none() {
                xml.push_str("<a:noFill/>");
            }
            xml.push_str("</p:spPr>");
        }
        None => xml.push_str("<p:spPr/>"),
    }

    xml.push_str("<p:txBody>");
    if shape.placeholder.is_some() {
        xml.push_str("<a:bodyPr/>");
    } else {
        xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:noAutofit/></a:bodyPr>"#);
    }
    xml.push_str("<a:lstStyle/>");
    if shape.paragraphs.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }
    for text in &shape.paragraphs {
        write_paragraph(xml, text, &shape.style)?;
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_picture(xml: &mut String, pic: &PictureShape, rel_id: &str) -> Result<()> {
    write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}" descr="{}"/>"#,
        pic.id,
        escape_xml_text(&pic.name)?,
        escape_xml_text(&pic.descr)?
    )?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
    write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
        rel_id
    )?;
    xml.push_str("<p:spPr>");
    write_xfrm(xml, pic.x, pic.y, pic.cx, pic.cy)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
    Ok(())
}

/// `ppt/slides/slideN.xml`. `picture_rels` holds the image relationship id
/// of each picture, in shape order.
pub(crate) fn slide_xml(slide: &SlidePart, picture_rels: &[String]) -> Result<String> {
    let mut xml = String::with_capacity(2048 + slide.shapes.len() * 1024);
    open_root(&mut xml, "p:sld")?;
    xml.push_str("<p:cSld>");
    if let Some(color) = slide.background {
        xml.push_str("<p:bg><p:bgPr>");
        write_solid_fill(&mut xml, color)?;
        xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
    }
    xml.push_str("<p:spTree>");
    xml.push_str(group_props());

    let mut pictures = picture_rels.iter();
    for shape in &slide.shapes {
        match shape {
            Shape::Text(text) => write_text_shape(&mut xml, text)?,
            Shape::Picture(pic) => {
                let rel_id = pictures.next().ok_or_else(|| {
                    Error::Xml(format!("no relationship for picture {}", pic.id))
                })?;
                write_picture(&mut xml, pic, rel_id)?;
            }
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

/// `ppt/notesSlides/notesSlideN.xml`; each line of `notes` is a paragraph.
pub(crate) fn notes_slide_xml(notes: &str) -> Result<String> {
    let mut xml = String::with_capacity(1024 + notes.len());
    open_root(&mut xml, "p:notes")?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(group_props());
    xml.push_str(concat!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
        r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
        r#"<p:txBody><a:bodyPr/><a:lstStyle/>"#,
    ));
    let notes = notes.replace("\r\n", "\n").replace('\r', "\n");
    for line in notes.split('\n') {
        write!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            escape_xml_text(line)?
        )?;
    }
    xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

/// `ppt/presentation.xml`. Slide ids start at 256.
pub(crate) fn presentation_xml(
    width: Emu,
    height: Emu,
    master_rel: &str,
    notes_master_rel: Option<&str>,
    slide_rels: &[String],
) -> Result<String> {
    let mut xml = String::with_capacity(1024 + slide_rels.len() * 48);
    open_root(&mut xml, r#"p:presentation saveSubsetFonts="1""#)?;
    write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="{}"/></p:sldMasterIdLst>"#,
        super::template::SLIDE_MASTER_ID,
        master_rel
    )?;
    if let Some(rel) = notes_master_rel {
        write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            rel
        )?;
    }
    if !slide_rels.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (i, rel) in slide_rels.iter().enumerate() {
            write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, rel)?;
        }
        xml.push_str("</p:sldIdLst>");
    }
    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/>"#,
        width, height, NOTES_WIDTH, NOTES_HEIGHT
    )?;
    xml.push_str("<p:defaultTextStyle>");
    xml.push_str(r#"<a:lvl1pPr marL="0" algn="l" defTabSz="914400"><a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>"#);
    xml.push_str("</p:defaultTextStyle>");
    xml.push_str("</p:presentation>");
    Ok(xml)
}

/// Inventory of the parts `[Content_Types].xml` must declare.
#[derive(Debug, Clone, Default)]
pub(crate) struct PartInventory {
    pub slides: usize,
    /// Number of notes slides
    pub notes_slides: usize,
    pub media_formats: Vec<ImageFormat>,
}

/// `[Content_Types].xml`.
pub(crate) fn content_types_xml(parts: &PartInventory) -> Result<String> {
    let mut xml = String::with_capacity(2048 + parts.slides * 256);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut seen: Vec<ImageFormat> = Vec::new();
    for format in &parts.media_formats {
        if !seen.contains(format) {
            seen.push(*format);
            write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                format.extension(),
                format.mime_type()
            )?;
        }
    }

    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".to_string(), PPTX_CONTENT_TYPE),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), SLIDE_MASTER_CT),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), SLIDE_LAYOUT_CT),
        ("/ppt/slideLayouts/slideLayout2.xml".to_string(), SLIDE_LAYOUT_CT),
        ("/ppt/theme/theme1.xml".to_string(), THEME_CT),
        ("/ppt/presProps.xml".to_string(), PRES_PROPS_CT),
        ("/ppt/viewProps.xml".to_string(), VIEW_PROPS_CT),
        ("/ppt/tableStyles.xml".to_string(), TABLE_STYLES_CT),
        ("/docProps/core.xml".to_string(), CORE_CT),
        ("/docProps/app.xml".to_string(), APP_CT),
    ];
    if parts.notes_slides > 0 {
        overrides.push(("/ppt/notesMasters/notesMaster1.xml".to_string(), NOTES_MASTER_CT));
        overrides.push(("/ppt/theme/theme2.xml".to_string(), THEME_CT));
    }
    for n in 1..=parts.slides {
        overrides.push((format!("/ppt/slides/slide{}.xml", n), SLIDE_CT));
    }
    for n in 1..=parts.notes_slides {
        overrides.push((format!("/ppt/notesSlides/notesSlide{}.xml", n), NOTES_SLIDE_CT));
    }

    for (part, content_type) in overrides {
        write!(
            xml,
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part, content_type
        )?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

/// `docProps/core.xml`.
pub(crate) fn core_xml(metadata: &DeckMetadata) -> Result<String> {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    if let Some(ref title) = metadata.title {
        write!(xml, "<dc:title>{}</dc:title>", escape_xml_text(title)?)?;
    }
    if let Some(ref subject) = metadata.subject {
        write!(xml, "<dc:subject>{}</dc:subject>", escape_xml_text(subject)?)?;
    }
    if let Some(ref author) = metadata.author {
        write!(xml, "<dc:creator>{}</dc:creator>", escape_xml_text(author)?)?;
    }
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

/// `docProps/app.xml`.
pub(crate) fn app_xml(slides: usize, notes: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties""#,
        r#" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
    ));
    write!(
        xml,
        "<Application>vetdeck {}</Application><PresentationFormat>Custom</PresentationFormat><Slides>{}</Slides><Notes>{}</Notes>",
        env!("CARGO_PKG_VERSION"),
        slides,
        notes
    )?;
    xml.push_str("</Properties>");
    Ok(xml)
}
