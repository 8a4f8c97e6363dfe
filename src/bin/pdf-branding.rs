//! PDF Branding CLI tool
//!
//! A command-line tool for stamping a logo and footer onto PDF reports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pdf_branding::branding::{Branding, DirAssetSource};
use pdf_branding::drive::MockDrive;
use pdf_branding::layout::TextCentering;
use pdf_branding::pdf::{extract_metadata, stamp_bytes, StampOptions};
use pdf_branding::share::{share_message, whatsapp_url};
use pdf_branding::source::{filename_from_url, normalize_drive_url};

/// PDF Branding - Stamp a logo and footer onto PDF reports
#[derive(Parser)]
#[command(name = "pdf-branding")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Stamp every report with assets/logo.png and assets/Footer.png
    pdf-branding stamp reports/*.pdf -o processed

    # Use a specific logo and a text footer instead of an image
    pdf-branding stamp report.pdf --logo brand.jpg --footer-text \"Confidential\"

    # Mock-upload a stamped report and print a share link
    pdf-branding upload processed/report.pdf
    pdf-branding share processed/report.pdf")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp logo and footer onto one or more PDFs
    Stamp {
        /// Input PDF files. Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Directory for stamped output (file names are kept)
        #[arg(short, long, default_value = "processed")]
        output_dir: PathBuf,

        /// Directory holding logo.png and Footer.png
        #[arg(long, default_value = "assets")]
        assets_dir: PathBuf,

        /// Logo image (PNG or JPEG), overrides the assets directory
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Footer image (PNG or JPEG), overrides the assets directory
        #[arg(long)]
        footer: Option<PathBuf>,

        /// Footer text, drawn only when there is no footer image
        #[arg(long)]
        footer_text: Option<String>,

        /// Center footer text on measured glyph widths instead of 3pt per character
        #[arg(long)]
        measured_centering: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    /// Store a PDF on the mock drive and print the receipt as JSON
    Upload {
        /// PDF file to upload
        input: PathBuf,

        /// Directory standing in for the drive
        #[arg(long, default_value = "drive_uploads")]
        drive_dir: PathBuf,

        /// Name to store the file under (defaults to the input file name)
        #[arg(long)]
        filename: Option<String>,
    },

    /// Print the share message and WhatsApp link for a report
    Share {
        /// Report file path or URL
        input: String,
    },

    /// Show the download URL and file name used for a report URL
    ResolveUrl {
        /// Report URL (Google Drive view links are rewritten)
        url: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Stamp {
            inputs, output_dir, assets_dir, logo, footer, footer_text, measured_centering,
        } => {
            cmd_stamp(
                inputs, output_dir, assets_dir, logo, footer, footer_text, measured_centering,
            )
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Upload { input, drive_dir, filename } => cmd_upload(&input, drive_dir, filename),
        Commands::Share { input } => cmd_share(&input),
        Commands::ResolveUrl { url } => cmd_resolve_url(&url),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> pdf_branding::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matched = false;
            let entries = glob(&pattern)
                .map_err(|e| pdf_branding::Error::InvalidGlob(format!("{}: {}", pattern, e)))?;
            for entry in entries {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => warn!("glob error for {}: {}", pattern, e),
                }
            }
            if !matched {
                return Err(pdf_branding::Error::NoFilesMatched(pattern));
            }
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// Explicit asset paths win; anything not given comes from the assets directory
fn load_branding(assets_dir: &Path, logo: Option<&Path>, footer: Option<&Path>) -> Result<Branding> {
    Branding::load_with_overrides(&DirAssetSource::new(assets_dir), logo, footer)
        .with_context(|| format!("Failed to load branding from {}", assets_dir.display()))
}

/// Stamp one file and write it into `output_dir`
fn stamp_file(input: &Path, output_dir: &Path, options: &StampOptions) -> Result<PathBuf> {
    let bytes = std::fs::read(input).with_context(|| format!("Cannot read {}", input.display()))?;
    let stamped = stamp_bytes(&bytes, options)?;

    let name = input
        .file_name()
        .with_context(|| format!("{} has no file name", input.display()))?;
    let output = output_dir.join(name);
    std::fs::write(&output, stamped).with_context(|| format!("Cannot write {}", output.display()))?;

    Ok(output)
}

/// Stamp each input independently; one failure does not stop the rest
fn cmd_stamp(
    inputs: Vec<String>,
    output_dir: PathBuf,
    assets_dir: PathBuf,
    logo: Option<PathBuf>,
    footer: Option<PathBuf>,
    footer_text: Option<String>,
    measured_centering: bool,
) -> Result<()> {
    let inputs = expand_globs(inputs)?;

    let branding = load_branding(&assets_dir, logo.as_deref(), footer.as_deref())?;
    let centering = if measured_centering {
        TextCentering::Measured
    } else {
        TextCentering::CharEstimate
    };
    let options = branding.stamp_options(footer_text, centering);

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Cannot create {}", output_dir.display()))?;

    info!("Stamping {} PDF file(s)...", inputs.len());

    let mut written = HashSet::new();
    let mut failed = 0usize;
    for input in &inputs {
        let name = input.display();
        if let Some(file_name) = input.file_name() {
            if !written.insert(file_name.to_os_string()) {
                failed += 1;
                error!(
                    "Failed to process {}: another input already wrote {} to {}",
                    name,
                    file_name.to_string_lossy(),
                    output_dir.display()
                );
                continue;
            }
        }
        match stamp_file(input, &output_dir, &options) {
            Ok(output) => info!("Processed {} -> {}", name, output.display()),
            Err(e) => {
                failed += 1;
                error!("Failed to process {}: {:#}", name, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, inputs.len());
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let metadata = extract_metadata(input)
        .with_context(|| format!("Cannot read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    for (i, size) in metadata.page_sizes.iter().enumerate() {
        println!("  Page {}: {} x {} pt", i + 1, size.width, size.height);
    }

    Ok(())
}

/// Mock-upload a PDF
fn cmd_upload(input: &Path, drive_dir: PathBuf, filename: Option<String>) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Cannot read {}", input.display()))?;

    let filename = match filename {
        Some(name) => name,
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", input.display()))?,
    };

    let receipt = MockDrive::new(drive_dir).upload(&filename, &bytes)?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    Ok(())
}

/// Print share text for a report
fn cmd_share(input: &str) -> Result<()> {
    let filename = if input.starts_with("http://") || input.starts_with("https://") {
        filename_from_url(input)
    } else {
        Path::new(input)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", input))?
    };

    let message = share_message(&filename);
    println!("{}", message);
    println!("{}", whatsapp_url(&message));

    Ok(())
}

/// Print the resolved download URL and file name
fn cmd_resolve_url(url: &str) -> Result<()> {
    println!("URL: {}", normalize_drive_url(url));
    println!("File: {}", filename_from_url(url));
    Ok(())
}
