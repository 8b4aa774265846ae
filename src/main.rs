use clap::{Parser, Subcommand};
use photo_manifest::config::{self, BuildConfig};
use photo_manifest::imaging::RustBackend;
use photo_manifest::{manifest, output, process};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photo-manifest")]
#[command(about = "Build a photo manifest and optimized images for a static site")]
#[command(long_about = "\
Build a photo manifest and optimized images for a static site

Every JPEG under the source directory becomes one manifest entry. An optional
YAML sidecar with the same name supplies metadata.

Source structure:

  photos/
  ├── a/
  │   ├── sunset.jpg               # Image (.jpg/.jpeg/.JPG/.JPEG)
  │   └── sunset.yml               # Sidecar (.yml or .yaml, optional)
  └── b/
      └── sunset.jpg               # Same name elsewhere → slug sunset-2

Sidecar keys (all optional):
  title, date, slug, location, description   scalars
  categories, tags                           scalar or list

Settings come from the environment (PHOTOS_CDN_BASE_URL, PHOTOS_MAX_WIDTH,
PHOTOS_JPEG_QUALITY, PHOTOS_WEBP_QUALITY, PHOTOS_DISABLE_SHARP).
Run 'photo-manifest gen-config' to print them with their effective values.")]
#[command(version)]
struct Cli {
    /// Photo source directory
    #[arg(long, default_value = "photos", global = true)]
    source: PathBuf,

    /// Directory the served images are written to
    #[arg(long, default_value = "site/public/photos", global = true)]
    public_dir: PathBuf,

    /// Manifest output path
    #[arg(long, default_value = "site/src/generated/manifest.json", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Process photos and write the manifest (default)
    Build,
    /// List the categories of an existing manifest
    Categories,
    /// Print the recognised settings with their effective values
    GenConfig,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let build_config = BuildConfig::from_env()?;
            let backend = RustBackend::new();

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_process_event(&event);
                }
            });
            let result = process::process(
                &cli.source,
                &cli.public_dir,
                &build_config,
                &backend,
                Some(tx),
            );
            printer.join().ok();
            let result = result?;

            manifest::write_manifest(&cli.output, &result.manifest)?;
            tracing::info!(
                path = %cli.output.display(),
                items = result.manifest.len(),
                "manifest written"
            );
            output::print_build_summary(&result, &cli.output);
        }
        Command::Categories => {
            let loaded = manifest::load_manifest(&cli.output)?;
            output::print_categories(&manifest::category_list(&loaded.entries));
        }
        Command::GenConfig => {
            let build_config = BuildConfig::from_env()?;
            print!("{}", config::env_template(&build_config));
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
