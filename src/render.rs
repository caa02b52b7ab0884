//! Template rendering.
//!
//! Stage 4 of the slideshow pipeline. Renders the slide deck through a
//! [Tera](https://keats.github.io/tera/) template and writes the document.
//!
//! ## Template lookup
//!
//! Templates are looked up by name. The tool ships one template,
//! `template.html.j2`, compiled into the binary. A template directory, when
//! configured, is loaded on top of it: every non-hidden file under the
//! directory becomes a template named by its path relative to the directory
//! (`partials/nav.html`), and a file named `template.html.j2` replaces the
//! bundled one.
//!
//! ## Template variables
//!
//! | Variable | Type | |
//! |----------|------|---|
//! | `images` | list of slides | each with `number`, `filename`, `caption` |
//! | `total_slides` | integer | number of slides |
//!
//! ## Escaping
//!
//! Auto-escaping is on for `.html`, `.htm`, `.xml` and `.j2` templates, so a
//! caption like `<b>hi</b>` renders as text. Use the `safe` filter to opt out.
//!
//! ## Writing
//!
//! The document is rendered fully in memory, written to a hidden sibling file
//! and renamed over the output path. An existing output file is replaced
//! without confirmation; a failed run leaves it untouched.

use crate::assemble::SlideDeck;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Name of the template compiled into the binary.
pub const BUNDLED_TEMPLATE_NAME: &str = "template.html.j2";

/// Source of the bundled template, printed by `--gen-template`.
pub const BUNDLED_TEMPLATE: &str = include_str!("../templates/template.html.j2");

const AUTOESCAPE_SUFFIXES: &[&str] = &[".html", ".htm", ".xml", ".j2"];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("template directory {0} does not exist")]
    MissingTemplateDir(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Template environment for one run.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Build a renderer from the bundled template plus `template_dir`, if any.
    ///
    /// Every template is parsed up front, so a syntax error in any file of the
    /// directory fails here rather than at render time.
    pub fn new(template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(BUNDLED_TEMPLATE_NAME, BUNDLED_TEMPLATE)?;

        if let Some(dir) = template_dir {
            let files = template_files(dir)?;
            debug!(dir = %dir.display(), count = files.len(), "loading templates");
            tera.add_template_files(files)?;
        }

        tera.autoescape_on(AUTOESCAPE_SUFFIXES.to_vec());
        Ok(Self { tera })
    }

    /// Names of all loaded templates, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Render `template` with the deck bound as `images` and `total_slides`.
    pub fn render(&self, template: &str, deck: &SlideDeck) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("images", &deck.slides);
        context.insert("total_slides", &deck.total_slides());
        Ok(self.tera.render(template, &context)?)
    }

    /// Render `template` and write the result to `out_path`.
    pub fn write(
        &self,
        template: &str,
        deck: &SlideDeck,
        out_path: &Path,
    ) -> Result<(), RenderError> {
        let html = self.render(template, deck)?;
        write_replacing(out_path, html.as_bytes())?;
        info!(
            out = %out_path.display(),
            bytes = html.len(),
            slides = deck.total_slides(),
            "wrote slideshow"
        );
        Ok(())
    }
}

/// Every file under `dir`, paired with its `/`-separated relative name.
fn template_files(dir: &Path) -> Result<Vec<(PathBuf, Option<String>)>, RenderError> {
    if !dir.is_dir() {
        return Err(RenderError::MissingTemplateDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| RenderError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((entry.path().to_path_buf(), Some(name)));
    }
    Ok(files)
}

/// Write through a hidden sibling file and rename it over `path`.
fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), RenderError> {
    let io_err = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "slideshow".to_string());
    let staging = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(e) = fs::write(&staging, contents) {
        let _ = fs::remove_file(&staging);
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(io_err(e));
    }
    Ok(())
}
