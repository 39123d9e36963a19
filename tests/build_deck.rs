//! End-to-end builds of the built-in deck, read back from the written file.
//!
//! Downloads go through an in-memory fetcher, so these tests need no network.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use vetdeck::{build_with, content, inspect, BuildOptions, DeckOutline, Error, Fetch, Result};

/// Serves fixed bodies and records every URL it is asked for.
struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn for_builtin_deck() -> Self {
        let mut bodies = HashMap::new();
        for (asset, (w, h)) in content::assets().into_iter().zip([(60, 40), (30, 50)]) {
            bodies.insert(asset.url, jpeg(w, h));
        }
        Self {
            bodies,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| Error::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 120, 120]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

fn options_in(dir: &Path) -> BuildOptions {
    BuildOptions::new()
        .with_output(dir.join(content::OUTPUT_FILE))
        .with_cache_dir(dir.join("cache"))
}

fn build_builtin(dir: &Path, fetcher: &FakeFetcher) -> DeckOutline {
    let options = options_in(dir);
    let path = build_with(&content::rickets_in_the_dog(), &options, fetcher).unwrap();
    assert_eq!(path, options.output);
    inspect(&path).unwrap()
}

#[test]
fn test_slide_count_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());
    let deck = content::rickets_in_the_dog();

    assert_eq!(outline.slides.len(), 11);
    assert_eq!(outline.slides[0].title.as_deref(), Some("Rickets in the Dog"));
    for (slide, spec) in outline.slides[1..].iter().zip(&deck.slides) {
        assert_eq!(slide.title.as_deref(), Some(spec.title.as_str()));
    }
}

#[test]
fn test_canvas_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());

    assert_eq!(outline.width, 12_188_952);
    assert_eq!(outline.height, 6_858_000);
    assert_eq!(outline.metadata.title.as_deref(), Some("Rickets in the Dog"));
}

#[test]
fn test_title_slide_subtitle_lines() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());

    assert_eq!(
        outline.slides[0].body_paragraphs(),
        vec![
            "Etiology – Clinical Signs – Diagnosis – Treatment – Management",
            "Veterinary Continuing Education",
        ]
    );
}

#[test]
fn test_bullets_are_exact_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());
    let deck = content::rickets_in_the_dog();

    for (slide, spec) in outline.slides[1..].iter().zip(&deck.slides) {
        assert_eq!(slide.text_boxes.len(), 1, "{}", spec.title);
        assert_eq!(slide.text_boxes[0], spec.bullets, "{}", spec.title);
    }

    // leading spaces of sub-points survive the round trip
    let etiology = &outline.slides[3];
    assert_eq!(etiology.text_boxes[0][1], "  – All-meat diet → low Ca, low vitamin D");
}

#[test]
fn test_pictures_embed_fetched_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::for_builtin_deck();
    let outline = build_builtin(dir.path(), &fetcher);
    let assets = content::assets();

    assert_eq!(outline.picture_count(), 2);

    let imaging = &outline.slides[6];
    assert_eq!(imaging.title.as_deref(), Some("Diagnosis – Imaging"));
    assert_eq!(imaging.pictures.len(), 1);
    assert_eq!(imaging.pictures[0].data, fetcher.bodies[&assets[0].url]);

    let gallery = &outline.slides[7];
    assert_eq!(gallery.pictures.len(), 1);
    assert_eq!(gallery.pictures[0].data, fetcher.bodies[&assets[1].url]);
}

#[test]
fn test_picture_geometry_keeps_aspect_ratio() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());
    let width = vetdeck::inches(4.2).get();

    // 60x40 and 30x50 pixel images
    let lateral = &outline.slides[6].pictures[0];
    assert_eq!(lateral.width, width);
    assert_eq!(lateral.height, width * 40 / 60);

    let ap = &outline.slides[7].pictures[0];
    assert_eq!(ap.width, width);
    assert_eq!(ap.height, width * 50 / 30);
}

#[test]
fn test_notes_on_four_slides() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());
    let deck = content::rickets_in_the_dog();

    assert!(outline.slides[0].notes.is_none());
    for (slide, spec) in outline.slides[1..].iter().zip(&deck.slides) {
        assert_eq!(slide.notes, spec.notes, "{}", spec.title);
    }
    assert_eq!(
        outline.slides.iter().filter(|s| s.notes.is_some()).count(),
        4
    );
}

#[test]
fn test_every_slide_has_dark_blue_background() {
    let dir = tempfile::tempdir().unwrap();
    let outline = build_builtin(dir.path(), &FakeFetcher::for_builtin_deck());

    for slide in &outline.slides {
        assert_eq!(slide.background.as_deref(), Some("003366"), "slide {}", slide.index);
    }
}

#[test]
fn test_cache_hit_skips_network() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::for_builtin_deck();

    build_builtin(dir.path(), &fetcher);
    assert_eq!(fetcher.call_count(), 2);

    fs::remove_file(dir.path().join(content::OUTPUT_FILE)).unwrap();
    build_builtin(dir.path(), &fetcher);
    assert_eq!(fetcher.call_count(), 2);
}

#[test]
fn test_existing_cache_file_used_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    fs::create_dir_all(&cache).unwrap();

    let seeded = jpeg(10, 10);
    fs::write(cache.join("rickets_lateral.jpg"), &seeded).unwrap();

    let fetcher = FakeFetcher::for_builtin_deck();
    let outline = build_builtin(dir.path(), &fetcher);

    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(outline.slides[6].pictures[0].data, seeded);
}

#[test]
fn test_failed_download_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = FakeFetcher::for_builtin_deck();
    let ap_url = content::assets()[1].url.clone();
    fetcher.bodies.remove(&ap_url);

    let options = options_in(dir.path());
    let result = build_with(&content::rickets_in_the_dog(), &options, &fetcher);

    assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
    assert!(!options.output.exists());
    // the first asset was cached before the failure
    assert!(dir.path().join("cache/rickets_lateral.jpg").exists());
    assert!(!dir.path().join("cache/rickets_ap.jpg").exists());
}

#[test]
fn test_builtin_deck_json_round_trip() {
    let deck = content::rickets_in_the_dog();
    let json = deck.to_json().unwrap();
    let back = vetdeck::DeckSpec::from_json(&json).unwrap();
    assert_eq!(back, deck);
}

#[test]
fn test_unwritable_output_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::for_builtin_deck();
    let options = BuildOptions::new()
        .with_output(dir.path().join("missing").join(content::OUTPUT_FILE))
        .with_cache_dir(dir.path().join("cache"));

    let result = build_with(&content::rickets_in_the_dog(), &options, &fetcher);

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!options.output.exists());
    let mut entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["cache"]);
}

#[test]
fn test_control_character_in_deck_rejected_before_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = FakeFetcher::for_builtin_deck();
    let mut deck = content::rickets_in_the_dog();
    deck.slides[2].bullets[0].push('\u{1}');

    let options = options_in(dir.path());
    let result = build_with(&deck, &options, &fetcher);

    assert!(matches!(result, Err(Error::InvalidData(_))));
    assert_eq!(fetcher.call_count(), 0);
    assert!(!options.output.exists());
}

#[test]
fn test_crlf_notes_read_back_as_lines() {
    let dir = tempfile::tempdir().unwrap();
    let mut deck = content::rickets_in_the_dog();
    deck.slides[0].notes = Some("first point\r\nsecond point".to_string());

    let options = options_in(dir.path());
    let path = build_with(&deck, &options, &FakeFetcher::for_builtin_deck()).unwrap();
    let outline = inspect(&path).unwrap();

    assert_eq!(
        outline.slides[1].notes.as_deref(),
        Some("first point\nsecond point")
    );
}
