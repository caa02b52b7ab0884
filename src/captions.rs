//! Caption loading.
//!
//! Stage 2 of the slideshow pipeline. Captions come from an optional delimited
//! text file, one record per image, matched to images strictly by position
//! after the images are sorted by filename:
//!
//! ```text
//! captions.csv            images (sorted)
//! Sunrise over the bay →  001 a.png
//! "Dinner, day two"    →  002 b.png
//! Last light           →  003 c.png
//! ```
//!
//! Only the first field of each record is used, so a caption containing the
//! delimiter must be quoted. There is no header row. Blank lines produce no
//! record and therefore do not count as captions.

use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("cannot read caption file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed caption file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Captions file wrong length: {captions} vs. {images}")]
    LengthMismatch { captions: usize, images: usize },
}

/// Read every caption from a delimited file, in file order.
pub fn load_captions(path: &Path, delimiter: u8) -> Result<Vec<String>, CaptionError> {
    let file = File::open(path).map_err(|source| CaptionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);

    let mut captions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| CaptionError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        captions.push(record.get(0).unwrap_or_default().to_string());
    }

    debug!(file = %path.display(), count = captions.len(), "loaded captions");
    Ok(captions)
}

/// Captions for `image_count` images.
///
/// With a caption file, its record count must equal `image_count`. Without
/// one, every image gets an empty caption.
pub fn resolve_captions(
    path: Option<&Path>,
    image_count: usize,
    delimiter: u8,
) -> Result<Vec<String>, CaptionError> {
    let Some(path) = path else {
        return Ok(vec![String::new(); image_count]);
    };

    let captions = load_captions(path, delimiter)?;
    if captions.len() != image_count {
        return Err(CaptionError::LengthMismatch {
            captions: captions.len(),
            images: image_count,
        });
    }
    Ok(captions)
}
