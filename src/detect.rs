//! Presentation package detection.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type of the main presentation part.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Check that the file at `path` is a PPTX package.
///
/// # Example
///
/// ```no_run
/// use vetdeck::detect::ensure_pptx_path;
///
/// ensure_pptx_path("Rickets_in_the_Dog.pptx")?;
/// # Ok::<(), vetdeck::Error>(())
/// ```
pub fn ensure_pptx_path(path: impl AsRef<Path>) -> Result<()> {
    let file = File::open(path.as_ref())?;
    ensure_pptx_reader(BufReader::new(file))
}

/// Check that `data` is a PPTX package.
pub fn ensure_pptx_bytes(data: &[u8]) -> Result<()> {
    if !is_zip_file(data) {
        return Err(Error::NotPptx("not a ZIP archive".to_string()));
    }
    ensure_pptx_reader(std::io::Cursor::new(data))
}

/// Check that the archive behind `reader` is a PPTX package.
///
/// `[Content_Types].xml` must declare the presentation main part; archives
/// without it but with a `ppt/presentation.xml` part are accepted as well.
pub fn ensure_pptx_reader<R: Read + Seek>(reader: R) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(PPTX_CONTENT_TYPE)
        || archive.file_names().any(|n| n == "ppt/presentation.xml")
    {
        Ok(())
    } else {
        Err(Error::NotPptx(
            "package has no presentation part".to_string(),
        ))
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
