//! Slide assembly.
//!
//! Stage 3 of the slideshow pipeline. Pairs each discovered image with its
//! 1-based position and the caption at the same index, and decides how the
//! document will reference the image:
//!
//! - **Linked** (default): the bare file name. The document is expected to be
//!   served from the image directory.
//! - **Embedded**: a `data:` URI carrying the base64-encoded file bytes, so the
//!   document is self-contained.
//!
//! ## Data URI media type
//!
//! The media subtype is the file's literal suffix, leading dot included:
//! `a.png` becomes `data:image/.png;base64,...` and `a.jpg` becomes
//! `data:image/.jpg;base64,...`. There is no MIME table lookup.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("cannot read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{captions} captions for {images} images")]
    LengthMismatch { captions: usize, images: usize },
}

/// One rendered unit of the slideshow.
///
/// Field names are the template's view of a slide: `number`, `filename`,
/// `caption`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// 1-based position in filename order.
    pub number: usize,
    /// Bare file name, or a `data:` URI when embedding.
    #[serde(rename = "filename")]
    pub source: String,
    /// May be empty.
    pub caption: String,
}

/// The ordered slides of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    pub fn total_slides(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Build slides from sorted images and their captions.
///
/// `images` must already be in slide order. Image files are only read when
/// `embed` is set.
pub fn assemble(
    images: &[PathBuf],
    captions: &[String],
    embed: bool,
) -> Result<SlideDeck, AssembleError> {
    if captions.len() != images.len() {
        return Err(AssembleError::LengthMismatch {
            captions: captions.len(),
            images: images.len(),
        });
    }

    let mut slides = Vec::with_capacity(images.len());
    for (idx, image) in images.iter().enumerate() {
        let source = if embed {
            data_uri(image)?
        } else {
            file_name(image)
        };
        let slide = Slide {
            number: idx + 1,
            source,
            caption: captions[idx].clone(),
        };
        debug!(number = slide.number, image = %image.display(), "assembled slide");
        slides.push(slide);
    }

    Ok(SlideDeck { slides })
}

/// Encode an image file as `data:image/<suffix>;base64,<payload>`.
pub fn data_uri(path: &Path) -> Result<String, AssembleError> {
    let bytes = fs::read(path).map_err(|source| AssembleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!(
        "data:image/{};base64,{}",
        literal_suffix(path),
        STANDARD.encode(bytes)
    ))
}

/// Final suffix of the file name including the dot, or empty if none.
fn literal_suffix(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
