//! # make-slideshow
//!
//! Builds a single HTML slideshow from the images in a directory. Each image
//! becomes one slide; slides are numbered in filename order and can carry a
//! caption from a sidecar file. Images are either referenced by file name or
//! inlined as base64 data URIs, which makes the document self-contained.
//!
//! # Pipeline
//!
//! One run is a straight line through four stages:
//!
//! ```text
//! 1. Discover   dir/*.{png,jpg,gif}   →  sorted image paths
//! 2. Captions   captions.csv          →  one caption per image (or empty)
//! 3. Assemble   images + captions     →  SlideDeck (file names or data URIs)
//! 4. Render     SlideDeck + template  →  out.html
//! ```
//!
//! The caption count is checked in stage 2, before any image is read, and the
//! output file is only touched in stage 4 once the whole deck exists. A run
//! that fails never leaves a partial document behind.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Stage 1 — lists matching image files in filename order |
//! | [`captions`] | Stage 2 — reads the caption file and checks its length |
//! | [`assemble`] | Stage 3 — builds [`assemble::Slide`] records, encodes data URIs |
//! | [`render`] | Stage 4 — Tera template environment and atomic document write |
//! | [`slideshow`] | Runs the stages in order and reports what was produced |
//! | [`config`] | `slideshow.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Templates
//!
//! Templates use Tera's Jinja-style syntax and see two variables, `images`
//! and `total_slides`. A default `template.html.j2` is compiled into the
//! binary; `--template_dir` adds user templates that take precedence over it.

pub mod assemble;
pub mod captions;
pub mod config;
pub mod discover;
pub mod output;
pub mod render;
pub mod slideshow;
