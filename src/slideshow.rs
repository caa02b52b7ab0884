//! Pipeline driver: discover → captions → assemble → render.

use crate::assemble::{self, AssembleError, SlideDeck};
use crate::captions::{self, CaptionError};
use crate::config::{ConfigError, SlideshowConfig};
use crate::discover::{self, DiscoverError};
use crate::render::{RenderError, Renderer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SlideshowError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error(transparent)]
    Caption(#[from] CaptionError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a run produced.
#[derive(Debug)]
pub struct Report {
    pub images: Vec<PathBuf>,
    pub deck: SlideDeck,
    /// `None` for a dry run.
    pub written: Option<PathBuf>,
}

/// Discover, caption and assemble the slides for the images in `dir`.
///
/// Relative paths in `config` are resolved against `dir`. Fails before any
/// image is read when the caption file has the wrong number of records.
pub fn build_deck(
    dir: &Path,
    config: &SlideshowConfig,
) -> Result<(Vec<PathBuf>, SlideDeck), SlideshowError> {
    let delimiter = config.delimiter_byte()?;

    info!(dir = %dir.display(), extensions = ?config.extensions, "discovering images");
    let images = discover::discover(dir, config.extensions.as_slice())?;

    let caption_path = config.caption_file.as_ref().map(|c| dir.join(c));
    let captions = captions::resolve_captions(caption_path.as_deref(), images.len(), delimiter)?;

    info!(count = images.len(), embed = config.embed_images, "assembling slides");
    let deck = assemble::assemble(&images, &captions, config.embed_images)?;
    Ok((images, deck))
}

/// Run the whole pipeline and write the document.
///
/// The deck is complete before the renderer touches the output path.
pub fn make_slides(
    dir: &Path,
    config: &SlideshowConfig,
    renderer: &Renderer,
) -> Result<Report, SlideshowError> {
    let (images, deck) = build_deck(dir, config)?;

    let out_path = dir.join(&config.out_file);
    renderer.write(&config.template_file, &deck, &out_path)?;

    Ok(Report {
        images,
        deck,
        written: Some(out_path),
    })
}

/// Like [`make_slides`] but stops before rendering.
pub fn dry_run(dir: &Path, config: &SlideshowConfig) -> Result<Report, SlideshowError> {
    let (images, deck) = build_deck(dir, config)?;
    Ok(Report {
        images,
        deck,
        written: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BUNDLED_TEMPLATE_NAME;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use std::fs;
    use tempfile::TempDir;

    fn gallery(names: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in names {
            fs::write(tmp.path().join(name), format!("bytes of {name}")).unwrap();
        }
        tmp
    }

    fn run(dir: &Path, config: &SlideshowConfig) -> Result<Report, SlideshowError> {
        let renderer = Renderer::new(None).unwrap();
        make_slides(dir, config, &renderer)
    }

    #[test]
    fn slides_follow_filename_order() {
        let tmp = gallery(&["b.png", "a.png"]);
        let report = run(tmp.path(), &SlideshowConfig::default()).unwrap();

        let slides = &report.deck.slides;
        assert_eq!(slides.len(), 2);
        assert_eq!((slides[0].number, slides[0].source.as_str()), (1, "a.png"));
        assert_eq!((slides[1].number, slides[1].source.as_str()), (2, "b.png"));
        assert!(slides.iter().all(|s| s.caption.is_empty()));
        assert!(tmp.path().join("out.html").exists());
    }

    #[test]
    fn captions_follow_sorted_images() {
        let tmp = gallery(&["c.jpg", "a.png", "b.gif"]);
        fs::write(tmp.path().join("captions.csv"), "alpha\nbravo\ncharlie\n").unwrap();
        let config = SlideshowConfig {
            caption_file: Some("captions.csv".into()),
            ..Default::default()
        };

        let report = run(tmp.path(), &config).unwrap();
        let pairs: Vec<(&str, &str)> = report
            .deck
            .slides
            .iter()
            .map(|s| (s.source.as_str(), s.caption.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("a.png", "alpha"), ("b.gif", "bravo"), ("c.jpg", "charlie")]
        );
    }

    #[test]
    fn caption_mismatch_writes_nothing() {
        let tmp = gallery(&["a.png", "b.png"]);
        fs::write(tmp.path().join("captions.csv"), "one\ntwo\nthree\n").unwrap();
        let config = SlideshowConfig {
            caption_file: Some("captions.csv".into()),
            ..Default::default()
        };

        let err = run(tmp.path(), &config).unwrap_err();
        assert!(matches!(
            err,
            SlideshowError::Caption(CaptionError::LengthMismatch {
                captions: 3,
                images: 2
            })
        ));
        assert!(err.to_string().contains("3 vs. 2"));
        assert!(!tmp.path().join("out.html").exists());
    }

    #[test]
    fn ext_filter_limits_discovery() {
        let tmp = gallery(&["a.png", "b.jpg", "c.webp"]);
        let config = SlideshowConfig {
            extensions: vec!["webp".into()],
            ..Default::default()
        };

        let report = run(tmp.path(), &config).unwrap();
        assert_eq!(report.deck.total_slides(), 1);
        assert_eq!(report.deck.slides[0].source, "c.webp");
    }

    #[test]
    fn embedded_images_round_trip() {
        let tmp = gallery(&["a.png"]);
        let config = SlideshowConfig {
            embed_images: true,
            ..Default::default()
        };

        let report = run(tmp.path(), &config).unwrap();
        let uri = &report.deck.slides[0].source;
        let payload = uri.strip_prefix("data:image/.png;base64,").unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), b"bytes of a.png");
    }

    #[test]
    fn empty_directory_renders_empty_slideshow() {
        let tmp = TempDir::new().unwrap();
        let report = run(tmp.path(), &SlideshowConfig::default()).unwrap();

        assert!(report.deck.is_empty());
        assert!(tmp.path().join("out.html").exists());
    }

    #[test]
    fn output_is_idempotent() {
        let tmp = gallery(&["a.png", "b.png"]);
        let config = SlideshowConfig {
            embed_images: true,
            ..Default::default()
        };

        run(tmp.path(), &config).unwrap();
        let first = fs::read(tmp.path().join("out.html")).unwrap();
        run(tmp.path(), &config).unwrap();
        let second = fs::read(tmp.path().join("out.html")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_template_writes_nothing() {
        let tmp = gallery(&["a.png"]);
        let config = SlideshowConfig {
            template_file: "missing.html.j2".into(),
            ..Default::default()
        };

        let err = run(tmp.path(), &config).unwrap_err();
        assert!(matches!(err, SlideshowError::Render(RenderError::Template(_))));
        assert!(!tmp.path().join("out.html").exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = gallery(&["a.png"]);
        let report = dry_run(tmp.path(), &SlideshowConfig::default()).unwrap();

        assert_eq!(report.deck.total_slides(), 1);
        assert!(report.written.is_none());
        assert!(!tmp.path().join("out.html").exists());
    }

    #[test]
    fn default_template_name_is_bundled() {
        assert_eq!(SlideshowConfig::default().template_file, BUNDLED_TEMPLATE_NAME);
    }
}
