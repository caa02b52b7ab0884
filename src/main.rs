use clap::{ArgAction, Parser};
use make_slideshow::config::{self, ConfigError, SlideshowConfig};
use make_slideshow::output;
use make_slideshow::render::{self, Renderer};
use make_slideshow::slideshow::{self, SlideshowError};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        "dev@unknown"
    } else {
        // Called once per process
        Box::leak(format!("dev@{hash}").into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "make-slideshow")]
#[command(about = "Make a web slideshow from a group of images")]
#[command(long_about = "\
Make a web slideshow from a group of images

Every png, jpg and gif file in the image directory becomes a slide, numbered
in filename order. Captions, one per line, can come from a delimited file:

  photos/
  ├── slideshow.toml     # Optional defaults (see --gen-config)
  ├── captions.csv       # Line 1 → a.png, line 2 → b.jpg, ...
  ├── a.png
  ├── b.jpg
  └── c.gif

Relative paths are resolved against the image directory.")]
#[command(version = version_string())]
struct Cli {
    /// File to generate [default: out.html]
    #[arg(long = "out_file", value_name = "PATH")]
    out_file: Option<String>,

    /// Inline images as base64 data URIs instead of linking to them
    #[arg(long = "embed_images")]
    embed_images: bool,

    /// Name of the template to render [default: template.html.j2]
    #[arg(long = "template_file", value_name = "NAME")]
    template_file: Option<String>,

    /// Directory of templates that override the bundled one
    #[arg(long = "template_dir", value_name = "DIR")]
    template_dir: Option<String>,

    /// File that contains captions (new line for each slide)
    #[arg(long = "caption_file", value_name = "PATH")]
    caption_file: Option<String>,

    /// Extension of images. Default is gif, png, and jpg
    #[arg(long = "ext", value_name = "EXT")]
    ext: Option<String>,

    /// Directory containing the images
    #[arg(long, default_value = ".", value_name = "DIR")]
    dir: PathBuf,

    /// Config file [default: <dir>/slideshow.toml, if present]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List the slides without writing the document
    #[arg(long)]
    dry_run: bool,

    /// Print a stock slideshow.toml with all options documented
    #[arg(long)]
    gen_config: bool,

    /// Print the bundled template
    #[arg(long)]
    gen_template: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of the file config.
    fn apply(&self, mut config: SlideshowConfig) -> Result<SlideshowConfig, ConfigError> {
        if let Some(out_file) = &self.out_file {
            config.out_file = out_file.clone();
        }
        if self.embed_images {
            config.embed_images = true;
        }
        if let Some(template_file) = &self.template_file {
            config.template_file = template_file.clone();
        }
        if let Some(template_dir) = &self.template_dir {
            config.template_dir = Some(template_dir.clone());
        }
        if let Some(caption_file) = &self.caption_file {
            config.caption_file = Some(caption_file.clone());
        }
        if let Some(ext) = &self.ext {
            config.extensions = vec![ext.clone()];
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), SlideshowError> {
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    if cli.gen_template {
        print!("{}", render::BUNDLED_TEMPLATE);
        return Ok(());
    }

    let config = cli.apply(load_file_config(cli)?)?;
    tracing::debug!(?config, "resolved config");

    if cli.dry_run {
        let report = slideshow::dry_run(&cli.dir, &config)?;
        output::print_report(&report);
        return Ok(());
    }

    let template_dir = config.template_dir.as_ref().map(|d| cli.dir.join(d));
    let renderer = Renderer::new(template_dir.as_deref())?;
    let report = slideshow::make_slides(&cli.dir, &config, &renderer)?;
    output::print_report(&report);
    Ok(())
}

/// An explicit `--config` must exist; the implicit one is optional.
fn load_file_config(cli: &Cli) -> Result<SlideshowConfig, ConfigError> {
    match &cli.config {
        Some(path) if !path.exists() => Err(ConfigError::Validation(format!(
            "config file {} not found",
            path.display()
        ))),
        Some(path) => config::load_config(path),
        None => config::load_config(&config::default_config_path(&cli.dir)),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// The error message followed by any underlying causes it does not already mention.
fn describe(err: &SlideshowError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
