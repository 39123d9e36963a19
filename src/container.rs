//! ZIP container abstraction for OOXML packages.
//!
//! [`OoxmlContainer`] reads parts out of an existing package,
//! [`PackageWriter`] assembles a new one part by part.

use crate::error::{Error, Result};
use crate::model::DeckMetadata;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Relationship type URIs used by presentation packages.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const NOTES_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Check that `s` holds only characters XML 1.0 can carry.
///
/// Control characters other than tab, line feed and carriage return have no
/// representation in XML 1.0, escaped or not.
pub fn check_xml_text(s: &str) -> Result<()> {
    match s.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(Error::InvalidData(format!(
            "character U+{:04X} cannot be written to XML: {:?}",
            c as u32, s
        ))),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape text content, rejecting characters XML cannot represent.
pub fn escape_xml_text(s: &str) -> Result<String> {
    check_xml_text(s)?;
    Ok(escape_xml(s))
}

/// Write `data` to `path` through a temporary file in the same directory.
///
/// `path` either receives the complete content or is left untouched; the
/// temporary file is removed when anything fails.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".vetdeck-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships of one part.
///
/// Keeps insertion order so a written .rels file lists entries the way they
/// were added.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Relationships in insertion order
    pub entries: Vec<Relationship>,
    /// Map from relationship ID to index in `entries`
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.entries
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .collect()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), self.entries.len());
        self.entries.push(rel);
    }

    /// Add an internal relationship under the next free `rIdN` and return that id.
    pub fn push(&mut self, rel_type: &str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.add(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a .rels part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.entries.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.entries {
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            )?;
            if rel.external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        Ok(xml)
    }
}

/// Path of the .rels part that belongs to `part_path`.
///
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path_for(part_path: &str) -> String {
    if part_path.is_empty() || part_path == "/" {
        return "_rels/.rels".to_string();
    }
    match part_path.rfind('/') {
        Some(i) => format!("{}/_rels/{}.rels", &part_path[..i], &part_path[i + 1..]),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Decode XML part bytes, dropping a UTF-8 byte order mark if present.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Read access to an OOXML package.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vetdeck::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("Rickets_in_the_Dog.pptx")?;
    /// assert!(container.exists("ppt/presentation.xml"));
    /// # Ok::<(), vetdeck::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// List parts whose name starts with `prefix`.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Read the relationships of a part; a part without a .rels file has none.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(&rels_path_for(part_path)) {
            Ok(c) => c,
            Err(Error::MissingComponent(_)) => return Ok(Relationships::new()),
            Err(e) => return Err(e),
        };

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().unwrap_or_default().to_string();
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Parse core metadata from docProps/core.xml.
    pub fn parse_core_metadata(&self) -> Result<DeckMetadata> {
        let mut meta = DeckMetadata::default();

        if let Ok(xml) = self.read_xml("docProps/core.xml") {
            let mut reader = quick_xml::Reader::from_str(&xml);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();
            let mut current_element: Option<String> = None;

            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(quick_xml::events::Event::Start(e)) => {
                        let name = e.name();
                        current_element =
                            Some(String::from_utf8_lossy(name.local_name().as_ref()).to_string());
                    }
                    Ok(quick_xml::events::Event::Text(e)) => {
                        if let Some(ref elem) = current_element {
                            let text = e.unescape().unwrap_or_default().to_string();
                            match elem.as_str() {
                                "title" => meta.title = Some(text),
                                "creator" => meta.author = Some(text),
                                "subject" => meta.subject = Some(text),
                                _ => {}
                            }
                        }
                    }
                    Ok(quick_xml::events::Event::End(_)) => {
                        current_element = None;
                    }
                    Ok(quick_xml::events::Event::Eof) => break,
                    Err(_) => break,
                    _ => {}
                }
                buf.clear();
            }
        }

        Ok(meta)
    }

    /// Resolve a relationship target against the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

/// Builds a package in memory.
///
/// Nothing touches the filesystem until the caller writes the finished
/// bytes, so a failure half-way leaves no output file behind.
pub struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    parts: Vec<String>,
}

impl PackageWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            parts: Vec::new(),
        }
    }

    /// Add an XML part (deflated).
    pub fn add_xml(&mut self, path: &str, xml: &str) -> Result<()> {
        self.add_part(path, xml.as_bytes(), CompressionMethod::Deflated)
    }

    /// Add a binary part. Media is stored as-is since it is already compressed.
    pub fn add_binary(&mut self, path: &str, data: &[u8]) -> Result<()> {
        self.add_part(path, data, CompressionMethod::Stored)
    }

    fn add_part(&mut self, path: &str, data: &[u8], method: CompressionMethod) -> Result<()> {
        if self.parts.iter().any(|p| p == path) {
            return Err(Error::InvalidData(format!("duplicate package part: {}", path)));
        }
        let options = SimpleFileOptions::default().compression_method(method);
        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        self.parts.push(path.to_string());
        Ok(())
    }

    /// Part names written so far, in order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/presentation.xml", "slides/slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for(""), "_rels/.rels");
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::new();
        let first = rels.push(rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml");
        let second = rels.push(rel_types::IMAGE, "../media/image1.jpeg");

        assert_eq!(first, "rId1");
        assert_eq!(second, "rId2");
        assert_eq!(rels.get("rId2").unwrap().target, "../media/image1.jpeg");
        assert!(rels.get("rId3").is_none());
        assert_eq!(rels.get_by_type(rel_types::IMAGE).len(), 1);
    }

    #[test]
    fn test_relationships_xml() {
        let mut rels = Relationships::new();
        rels.push(rel_types::IMAGE, "../media/a&b.png");
        let xml = rels.to_xml().unwrap();
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains("a&amp;b.png"));
    }

    #[test]
    fn test_write_then_read_package() {
        let mut writer = PackageWriter::new();
        let mut rels = Relationships::new();
        rels.push(rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml");
        writer.add_xml("_rels/.rels", &rels.to_xml().unwrap()).unwrap();
        writer.add_xml("ppt/presentation.xml", "<p:presentation/>").unwrap();
        writer.add_binary("ppt/media/image1.png", &[1, 2, 3]).unwrap();
        assert_eq!(writer.parts().len(), 3);

        let bytes = writer.finish().unwrap();
        let container = OoxmlContainer::from_bytes(bytes).unwrap();
        assert!(container.exists("ppt/presentation.xml"));
        assert_eq!(container.read_binary("ppt/media/image1.png").unwrap(), vec![1, 2, 3]);
        assert_eq!(container.list_files_with_prefix("ppt/").len(), 2);

        let package_rels = container.read_relationships("").unwrap();
        assert_eq!(
            package_rels.get("rId1").unwrap().target,
            "ppt/presentation.xml"
        );
        assert!(container
            .read_relationships("ppt/presentation.xml")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let mut writer = PackageWriter::new();
        writer.add_xml("a.xml", "<a/>").unwrap();
        assert!(matches!(
            writer.add_xml("a.xml", "<a/>"),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_decode_strips_bom() {
        assert_eq!(decode_xml_bytes(b"\xEF\xBB\xBF<?xml>").unwrap(), "<?xml>");
        assert_eq!(decode_xml_bytes(b"<?xml>").unwrap(), "<?xml>");
    }

    #[test]
    fn test_check_xml_text() {
        check_xml_text("Ca:P 1.2–1.4 : 1\tok\n").unwrap();
        assert!(matches!(check_xml_text("Ca\u{1}P"), Err(Error::InvalidData(_))));
        assert!(matches!(check_xml_text("tab\u{b}"), Err(Error::InvalidData(_))));
        assert!(matches!(check_xml_text("\u{FFFF}"), Err(Error::InvalidData(_))));
        assert_eq!(escape_xml_text("a & b").unwrap(), "a &amp; b");
    }

    #[test]
    fn test_write_atomic_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"old content that is longer").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("deck.pptx")]);
    }

    #[test]
    fn test_write_atomic_failure_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();

        // the target is an existing directory, so the final rename fails
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), b"x").unwrap();
        assert!(matches!(write_atomic(&target, b"data"), Err(Error::Io(_))));
        assert!(target.is_dir());

        let missing = dir.path().join("no-such-dir").join("deck.pptx");
        assert!(matches!(write_atomic(&missing, b"data"), Err(Error::Io(_))));
        assert!(!missing.exists());

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("occupied")]);
    }

    #[test]
    fn test_missing_part() {
        let bytes = PackageWriter::new().finish().unwrap();
        let container = OoxmlContainer::from_bytes(bytes).unwrap();
        assert!(matches!(
            container.read_xml("ppt/presentation.xml"),
            Err(Error::MissingComponent(_))
        ));
    }
}
