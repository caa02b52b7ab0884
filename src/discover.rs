//! Image discovery.
//!
//! Stage 1 of the slideshow pipeline. Lists the files of a single directory
//! (no recursion) whose names match `*.<ext>` for any of the requested
//! extensions and returns them in filename order.
//!
//! ## Ordering
//!
//! `read_dir` yields entries in whatever order the filesystem likes. Slides are
//! numbered by position, so the result is always sorted by file name, byte-wise
//! and case-sensitive: `B.png` sorts before `a.png`.
//!
//! ## Matching
//!
//! Matching is on the literal name suffix, the way a shell glob behaves on a
//! case-sensitive filesystem: `*.png` picks up `photo.png` and `x.tar.png`, but
//! not `PHOTO.PNG`. Directories are skipped even when their name matches.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("cannot list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Find images in `dir` matching any of `extensions`.
///
/// Extensions may be given with or without a leading dot. A file matched by
/// more than one extension is listed once.
pub fn discover<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>, DiscoverError> {
    let io_err = |source| DiscoverError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let suffixes: Vec<String> = extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .collect();

    // Keyed by file name so the set iterates in slide order.
    let mut found: BTreeSet<(OsString, PathBuf)> = BTreeSet::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name();
        if !matches_any(&name, &suffixes) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        debug!(file = %path.display(), "discovered image");
        found.insert((name, path));
    }

    if found.is_empty() {
        warn!(dir = %dir.display(), ?suffixes, "no images found");
    }

    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// True when `name` is `<something>.<ext>` for one of the suffixes.
fn matches_any(name: &OsString, suffixes: &[String]) -> bool {
    let name = name.to_string_lossy();
    suffixes
        .iter()
        .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str()))
}
