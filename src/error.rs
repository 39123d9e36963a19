//! Error types for the vetdeck library.

use std::io;
use thiserror::Error;

/// Result type alias for vetdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching assets or building a deck.
///
/// Every variant is fatal to a build: nothing is retried and no partial
/// output file is written.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The network request for an asset could not be completed.
    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Underlying transport error
        message: String,
    },

    /// The server answered an asset request with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Status code returned by the server
        status: u16,
    },

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error generating XML content.
    #[error("XML write error: {0}")]
    Xml(String),

    /// Invalid or malformed data (deck definition, slide handle, file name).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A slide references an asset key that was never resolved.
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Image bytes could not be recognized.
    #[error("Image error: {0}")]
    Image(String),

    /// Error reading or writing a JSON deck definition.
    #[error("JSON error: {0}")]
    Json(String),

    /// The file is not a PowerPoint presentation package.
    #[error("Not a PPTX package: {0}")]
    NotPptx(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
