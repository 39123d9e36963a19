//! Fixed package parts: theme, masters and the two slide layouts.
//!
//! Only what a conforming reader needs is included. Placeholder geometry
//! scales with the canvas so decks that are not 16:9 still look right.

use crate::error::Result;
use crate::units::Emu;
use std::fmt::Write as FmtWrite;

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Id of the only slide master in `p:sldMasterIdLst`.
pub(crate) const SLIDE_MASTER_ID: u32 = 2_147_483_648;

/// Layout used for the opening slide.
pub(crate) const TITLE_LAYOUT: &str = "slideLayout1.xml";

/// Layout used for every content slide.
pub(crate) const BLANK_LAYOUT: &str = "slideLayout2.xml";

const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

const GROUP_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Opening tag of a PresentationML root element with the usual namespaces.
pub(crate) fn open_root(xml: &mut String, element: &str) -> Result<()> {
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<{} xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        element, NS_A, NS_R, NS_P
    )?;
    Ok(())
}

/// Empty shape-tree header shared by every slide-like part.
pub(crate) fn group_props() -> &'static str {
    GROUP_PROPS
}

/// A placeholder shape used by masters and layouts.
fn placeholder(
    xml: &mut String,
    id: u32,
    name: &str,
    ph: &str,
    geometry: Option<(i64, i64, i64, i64)>,
    prompt: &str,
) -> Result<()> {
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr>"#,
        id, name, ph
    )?;
    match geometry {
        Some((x, y, cx, cy)) => write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            x, y, cx, cy
        )?,
        None => xml.push_str("<p:spPr/>"),
    }
    write!(
        xml,
        r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        prompt
    )?;
    Ok(())
}

/// Scale a canvas dimension by a ratio.
fn frac(total: Emu, ratio: f64) -> i64 {
    (total.get() as f64 * ratio) as i64
}

/// Slide master with title and body placeholders.
pub(crate) fn slide_master_xml(width: Emu, height: Emu) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    open_root(&mut xml, "p:sldMaster")?;
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str("<p:spTree>");
    xml.push_str(GROUP_PROPS);
    placeholder(
        &mut xml,
        2,
        "Title Placeholder 1",
        r#"<p:ph type="title"/>"#,
        Some((
            frac(width, 0.0688),
            frac(height, 0.0532),
            frac(width, 0.8625),
            frac(height, 0.1933),
        )),
        "Click to edit Master title style",
    )?;
    placeholder(
        &mut xml,
        3,
        "Text Placeholder 2",
        r#"<p:ph type="body" idx="1"/>"#,
        Some((
            frac(width, 0.0688),
            frac(height, 0.2662),
            frac(width, 0.8625),
            frac(height, 0.6345),
        )),
        "Click to edit Master text styles",
    )?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    xml.push_str("<p:sldLayoutIdLst>");
    write!(
        xml,
        r#"<p:sldLayoutId id="{}" r:id="rId1"/><p:sldLayoutId id="{}" r:id="rId2"/>"#,
        SLIDE_MASTER_ID + 1,
        SLIDE_MASTER_ID + 2
    )?;
    xml.push_str("</p:sldLayoutIdLst>");
    xml.push_str("<p:txStyles>");
    xml.push_str(concat!(
        r#"<p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="4400" kern="1200">"#,
        r#"<a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/>"#,
        r#"</a:defRPr></a:lvl1pPr></p:titleStyle>"#,
        r#"<p:bodyStyle><a:lvl1pPr marL="0" indent="0" algn="l"><a:buNone/><a:defRPr sz="2800" kern="1200">"#,
        r#"<a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/>"#,
        r#"</a:defRPr></a:lvl1pPr></p:bodyStyle>"#,
        r#"<p:otherStyle><a:lvl1pPr algn="l"><a:defRPr sz="1800" kern="1200">"#,
        r#"<a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:otherStyle>"#,
    ));
    xml.push_str("</p:txStyles>");
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

/// "Title Slide" layout: centred title and subtitle placeholders.
pub(crate) fn title_layout_xml(width: Emu, height: Emu) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    open_root(&mut xml, r#"p:sldLayout type="title" preserve="1""#)?;
    xml.push_str(r#"<p:cSld name="Title Slide"><p:spTree>"#);
    xml.push_str(GROUP_PROPS);
    placeholder(
        &mut xml,
        2,
        "Title 1",
        r#"<p:ph type="ctrTitle"/>"#,
        Some((
            frac(width, 0.125),
            frac(height, 0.1637),
            frac(width, 0.75),
            frac(height, 0.3481),
        )),
        "Click to edit Master title style",
    )?;
    placeholder(
        &mut xml,
        3,
        "Subtitle 2",
        r#"<p:ph type="subTitle" idx="1"/>"#,
        Some((
            frac(width, 0.125),
            frac(height, 0.5252),
            frac(width, 0.75),
            frac(height, 0.2414),
        )),
        "Click to edit Master subtitle style",
    )?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

/// "Blank" layout: no placeholders, every shape is positioned explicitly.
pub(crate) fn blank_layout_xml() -> Result<String> {
    let mut xml = String::with_capacity(1024);
    open_root(&mut xml, r#"p:sldLayout type="blank" preserve="1""#)?;
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(GROUP_PROPS);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

/// Notes master with slide-image and notes-body placeholders.
pub(crate) fn notes_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(2048);
    open_root(&mut xml, "p:notesMaster")?;
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str("<p:spTree>");
    xml.push_str(GROUP_PROPS);
    placeholder(
        &mut xml,
        2,
        "Slide Image Placeholder 1",
        r#"<p:ph type="sldImg" idx="2"/>"#,
        Some((381000, 685800, 6096000, 3429000)),
        "",
    )?;
    placeholder(
        &mut xml,
        3,
        "Notes Placeholder 2",
        r#"<p:ph type="body" sz="quarter" idx="1"/>"#,
        Some((685800, 4400550, 5486400, 3600450)),
        "Click to edit Master text styles",
    )?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(CLR_MAP);
    xml.push_str("</p:notesMaster>");
    Ok(xml)
}

/// Office-style theme. Used by both the slide master and the notes master.
pub(crate) fn theme_xml(name: &str) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(xml, r#"<a:theme xmlns:a="{}" name="{}">"#, NS_A, name)?;
    xml.push_str("<a:themeElements>");
    xml.push_str(concat!(
        r#"<a:clrScheme name="Office">"#,
        r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
        r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
        r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2>"#,
        r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#,
        r#"<a:accent1><a:srgbClr val="4472C4"/></a:accent1>"#,
        r#"<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#,
        r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>"#,
        r#"<a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#,
        r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#,
        r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#,
        r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#,
        r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
        r#"</a:clrScheme>"#,
        r#"<a:fontScheme name="Office">"#,
        r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
        r#"</a:fontScheme>"#,
        r#"<a:fmtScheme name="Office">"#,
        r#"<a:fillStyleLst>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="50000"/></a:schemeClr></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="80000"/></a:schemeClr></a:solidFill>"#,
        r#"</a:fillStyleLst>"#,
        r#"<a:lnStyleLst>"#,
        r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"</a:lnStyleLst>"#,
        r#"<a:effectStyleLst>"#,
        r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
        r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
        r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
        r#"</a:effectStyleLst>"#,
        r#"<a:bgFillStyleLst>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="90000"/></a:schemeClr></a:solidFill>"#,
        r#"</a:bgFillStyleLst>"#,
        r#"</a:fmtScheme>"#,
    ));
    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    Ok(xml)
}

pub(crate) fn pres_props_xml() -> Result<String> {
    let mut xml = String::with_capacity(256);
    open_root(&mut xml, "p:presentationPr")?;
    xml.push_str("</p:presentationPr>");
    Ok(xml)
}

pub(crate) fn view_props_xml() -> Result<String> {
    let mut xml = String::with_capacity(512);
    open_root(&mut xml, "p:viewPr")?;
    xml.push_str(concat!(
        r#"<p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
        r#"<p:gridSpacing cx="76200" cy="76200"/>"#,
    ));
    xml.push_str("</p:viewPr>");
    Ok(xml)
}

pub(crate) fn table_styles_xml() -> Result<String> {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        NS_A
    )?;
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::inches;

    fn assert_well_formed(xml: &str) {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut depth = 0i32;
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Start(_)) => depth += 1,
                Ok(quick_xml::events::Event::End(_)) => depth -= 1,
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => panic!("malformed XML: {}", e),
                _ => {}
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_templates_are_well_formed() {
        let (w, h) = (inches(13.33), inches(7.5));
        assert_well_formed(&slide_master_xml(w, h).unwrap());
        assert_well_formed(&title_layout_xml(w, h).unwrap());
        assert_well_formed(&blank_layout_xml().unwrap());
        assert_well_formed(&notes_master_xml().unwrap());
        assert_well_formed(&theme_xml("Office Theme").unwrap());
        assert_well_formed(&pres_props_xml().unwrap());
        assert_well_formed(&view_props_xml().unwrap());
        assert_well_formed(&table_styles_xml().unwrap());
    }

    #[test]
    fn test_master_lists_both_layouts() {
        let xml = slide_master_xml(inches(10.0), inches(7.5)).unwrap();
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483650" r:id="rId2"/>"#));
    }

    #[test]
    fn test_title_layout_scales_with_canvas() {
        let xml = title_layout_xml(Emu(8_000_000), Emu(6_000_000)).unwrap();
        assert!(xml.contains(r#"<a:off x="1000000""#));
        assert!(xml.contains(r#"cx="6000000""#));
    }
}
