//! Deck assembly: resolve assets, append slides in order, save once.

use crate::asset::{AssetCache, Fetch, HttpFetcher, ResolvedAssets};
use crate::error::Result;
use crate::model::{DeckSpec, SlideSpec, TitleSlideSpec};
use crate::options::BuildOptions;
use crate::pptx::{Presentation, SlideHandle};
use crate::units::RgbColor;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// The document operations a deck build needs.
///
/// Each call takes the document and returns it, so the build threads one
/// value through every step and `save` ends its life.
pub trait DocumentBackend: Sized {
    /// Reference to an appended slide.
    type Slide: Copy + std::fmt::Debug;

    /// Create an empty document with the deck's canvas, theme and layout.
    fn create_document(deck: &DeckSpec) -> Result<Self>;

    fn append_title_slide(self, spec: &TitleSlideSpec) -> Result<(Self, Self::Slide)>;

    fn append_slide(self, spec: &SlideSpec, assets: &ResolvedAssets)
        -> Result<(Self, Self::Slide)>;

    /// Replace the background of a slide created earlier.
    fn set_background(self, slide: Self::Slide, color: RgbColor) -> Result<Self>;

    fn save(self, path: &Path) -> Result<()>;
}

impl DocumentBackend for Presentation {
    type Slide = SlideHandle;

    fn create_document(deck: &DeckSpec) -> Result<Self> {
        Ok(Presentation::from_deck(deck))
    }

    fn append_title_slide(self, spec: &TitleSlideSpec) -> Result<(Self, SlideHandle)> {
        Presentation::append_title_slide(self, spec)
    }

    fn append_slide(self, spec: &SlideSpec, assets: &ResolvedAssets) -> Result<(Self, SlideHandle)> {
        Presentation::append_slide(self, spec, assets)
    }

    fn set_background(self, slide: SlideHandle, color: RgbColor) -> Result<Self> {
        Presentation::set_background(self, slide, color)
    }

    fn save(self, path: &Path) -> Result<()> {
        Presentation::save(self, path)
    }
}

/// Append every slide of `deck` to a fresh document.
///
/// A slide's background override is applied right after the slide is
/// appended. The first error stops the build.
pub fn build_deck<B: DocumentBackend>(deck: &DeckSpec, assets: &ResolvedAssets) -> Result<B> {
    let doc = B::create_document(deck)?;
    let (mut doc, _) = doc.append_title_slide(&deck.title_slide)?;

    for spec in &deck.slides {
        let (next, slide) = doc.append_slide(spec, assets)?;
        doc = match spec.background {
            Some(color) => {
                debug!("re-applying background {} to {:?}", color, slide);
                next.set_background(slide, color)?
            }
            None => next,
        };
    }

    Ok(doc)
}

/// Build `deck` and write it to `options.output`, downloading missing
/// assets over HTTP.
///
/// # Example
///
/// ```no_run
/// use vetdeck::{build, content, BuildOptions};
///
/// let path = build(&content::rickets_in_the_dog(), &BuildOptions::default())?;
/// println!("Presentation saved → {}", path.display());
/// # Ok::<(), vetdeck::Error>(())
/// ```
pub fn build(deck: &DeckSpec, options: &BuildOptions) -> Result<PathBuf> {
    let fetcher = HttpFetcher::build(options.timeout, &options.user_agent)?;
    build_with(deck, options, fetcher)
}

/// Like [`build`], with a caller-supplied fetcher.
pub fn build_with<F: Fetch>(deck: &DeckSpec, options: &BuildOptions, fetcher: F) -> Result<PathBuf> {
    deck.validate()?;

    let cache = AssetCache::new(&options.cache_dir, fetcher);
    let assets = cache.resolve_all(&deck.assets)?;
    info!(
        "{} assets ready in {}",
        assets.len(),
        options.cache_dir.display()
    );

    let doc: Presentation = build_deck(deck, &assets)?;
    DocumentBackend::save(doc, &options.output)?;
    Ok(options.output.clone())
}
