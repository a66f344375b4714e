use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::cli::Opts;
use crate::config;
use crate::error::{BillingError, ConfigError};
use crate::pdf::{PdfError, PdfWriter, WeasyPrint};
use crate::slug::output_filename;
use crate::templates::{file_uri, RenderContext};

use askama::Template;
use clap::CommandFactory;
use thiserror::Error;

/// Locations used by a single invoice generation.
#[derive(Debug, Clone)]
pub struct Job {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub logo: PathBuf,
    /// Base for relative references inside the rendered HTML.
    pub assets_dir: PathBuf,
}

impl Job {
    fn from_opts(config_path: PathBuf, opts: Opts) -> Result<Self, RunError> {
        let assets_dir = match opts.assets_dir {
            Some(dir) => dir,
            None => executable_dir()?,
        };
        Ok(Self {
            config_path,
            output_dir: opts
                .output_dir
                .unwrap_or_else(|| assets_dir.join("invoices")),
            logo: opts.logo.unwrap_or_else(|| assets_dir.join("logo.png")),
            assets_dir,
        })
    }
}

fn executable_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    Ok(exe
        .parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn usage() -> String {
    Opts::command().render_usage().to_string()
}

pub fn run(opts: Opts) -> Result<PathBuf, RunError> {
    let config_path = match opts.config.clone() {
        Some(path) => path,
        None => return Err(RunError::Usage(usage())),
    };
    let writer = WeasyPrint::locate(&opts.weasyprint)?;
    let job = Job::from_opts(config_path, opts)?;
    generate(&job, &writer)
}

pub fn generate(job: &Job, writer: &impl PdfWriter) -> Result<PathBuf, RunError> {
    let config = config::load(&job.config_path)?;
    log::info!(
        "loaded invoice {} for {} with {} items",
        config.invoice_id_display(),
        config.client.name,
        config.items.len()
    );

    if !job.logo.exists() {
        log::warn!("Logo not found at {}", job.logo.display());
    }
    let context = RenderContext::new(&config, file_uri(&job.logo)?)?;
    log::debug!("rate mode: {}", context.show_rate);
    let html = context.render()?;

    fs::create_dir_all(&job.output_dir)?;
    let output = job.output_dir.join(output_filename(&config));
    writer.write_pdf(&html, &job.assets_dir, &output)?;

    Ok(output)
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Usage(String),

    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Template Error: {source}")]
    Template {
        #[from]
        source: askama::Error,
    },

    #[error("{source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("{source}")]
    Billing {
        #[from]
        source: BillingError,
    },

    #[error("{source}")]
    Pdf {
        #[from]
        source: PdfError,
    },
}
