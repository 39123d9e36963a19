//! # vetdeck
//!
//! Builds the "Rickets in the Dog" teaching deck as a PowerPoint (.pptx)
//! file from a declarative slide table.
//!
//! Reference images are downloaded into a local cache only when they are not
//! already there; slides are appended to an in-memory presentation in order;
//! the file is written once at the end.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vetdeck::{build, content, BuildOptions};
//!
//! let options = BuildOptions::new()
//!     .with_output("Rickets_in_the_Dog.pptx")
//!     .with_cache_dir("assets");
//! let path = build(&content::rickets_in_the_dog(), &options)?;
//! println!("Presentation saved → {}", path.display());
//! # Ok::<(), vetdeck::Error>(())
//! ```
//!
//! ## Reading a deck back
//!
//! ```no_run
//! use vetdeck::inspect;
//!
//! let outline = inspect("Rickets_in_the_Dog.pptx")?;
//! for slide in &outline.slides {
//!     println!("{}: {:?}", slide.index + 1, slide.title);
//! }
//! # Ok::<(), vetdeck::Error>(())
//! ```

pub mod asset;
pub mod container;
pub mod content;
pub mod deck;
pub mod detect;
pub mod error;
pub mod model;
pub mod options;
pub mod picture;
pub mod pptx;
pub mod units;

// Re-exports
pub use asset::{AssetCache, AssetRef, Fetch, HttpFetcher, ResolvedAssets};
pub use deck::{build, build_deck, build_with, DocumentBackend};
pub use error::{Error, Result};
pub use model::{
    DeckMetadata, DeckOutline, DeckSpec, Layout, PictureOutline, Rect, SlideOutline, SlideSpec,
    Theme, TitleSlideSpec,
};
pub use options::BuildOptions;
pub use pptx::{DeckReader, Presentation, SlideHandle};
pub use units::{inches, Emu, RgbColor};

use std::path::Path;

/// Read a presentation file back into an outline.
///
/// # Example
///
/// ```no_run
/// let outline = vetdeck::inspect("Rickets_in_the_Dog.pptx")?;
/// println!("Slides: {}", outline.slides.len());
/// # Ok::<(), vetdeck::Error>(())
/// ```
pub fn inspect(path: impl AsRef<Path>) -> Result<DeckOutline> {
    DeckReader::open(path)?.read()
}

/// Read a presentation from bytes.
pub fn inspect_bytes(data: &[u8]) -> Result<DeckOutline> {
    DeckReader::from_bytes(data.to_vec())?.read()
}

/// Extract the plain text of a presentation: titles, body lines and notes.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(inspect(path)?.plain_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_missing_file() {
        assert!(matches!(
            inspect("does-not-exist.pptx"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_inspect_bytes_round_trip() {
        let doc = Presentation::new(inches(10.0), inches(7.5));
        let (doc, _) = doc
            .append_title_slide(&TitleSlideSpec::new("Deck").with_subtitle(["one", "two"]))
            .unwrap();
        let outline = inspect_bytes(&doc.to_bytes().unwrap()).unwrap();

        assert_eq!(outline.width, inches(10.0).get());
        assert_eq!(outline.slides.len(), 1);
        assert_eq!(outline.slides[0].title.as_deref(), Some("Deck"));
        assert_eq!(outline.slides[0].text_boxes, vec![vec!["one", "two"]]);
    }
}
