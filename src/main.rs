use clap::{Parser, Subcommand};
use photoshelf::catalog::{self, Catalog};
use photoshelf::config::{self, SiteConfig};
use photoshelf::derivatives::{self, DerivativeReport};
use photoshelf::imaging::Quality;
use photoshelf::taxonomy::{self, Indices};
use photoshelf::{cache, generate, output};
use std::path::{Path, PathBuf};

/// Shared flags for commands that produce derivatives.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Ignore existing derivatives and re-encode every tier of every photo
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "photoshelf")]
#[command(about = "Static site generator for a CSV photo catalog")]
#[command(long_about = "\
Static site generator for a CSV photo catalog

One row per photograph. Categories and tags become gallery pages, every
photo gets its own page linked in catalog order, and each original is
resized into five JPEG tiers.

Project structure:

  project/
  ├── config.toml        # Optional, see 'photoshelf gen-config'
  ├── photos.csv         # filename,title,year,location,camera,lens,film,
  │                      # developer,description,tags,category
  ├── originals/         # Source images named in the catalog
  ├── templates/         # Optional overrides: base/index/gallery/photo.html
  └── assets/            # Optional, copied to the output root

Output:

  dist/
  ├── index.html, gallery.html, gallery-<slug>.html, tag-<slug>.html
  ├── images/<key>.html
  └── photos/{thumb,small,medium,large,xlarge}/<filename>")]
#[command(version)]
struct Cli {
    /// Project directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the catalog and show its categories and tags
    Check,
    /// Generate the five derivative tiers for every photo
    Images(CacheArgs),
    /// Render the HTML pages
    Pages,
    /// Run everything: check, images, pages
    Build(CacheArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let (catalog, indices) = load_catalog(&config, &cli.source)?;
            output::print_catalog_output(&catalog, &indices);
            output::print_warnings(&indices.collisions());
            println!("==> Catalog is valid");
        }
        Command::Images(cache_args) => {
            let config = config::load_config(&cli.source)?;
            let (catalog, _) = load_catalog(&config, &cli.source)?;
            init_thread_pool(&config.processing);
            let report = run_derivatives(&config, &catalog, &cli.source, &cli.output, &cache_args)?;
            output::print_derivative_report(&report);
        }
        Command::Pages => {
            let config = config::load_config(&cli.source)?;
            let (catalog, indices) = load_catalog(&config, &cli.source)?;
            let report = generate::generate(&catalog, &indices, &config, &cli.source, &cli.output)?;
            output::print_site_output(&report);
            output::print_warnings(&report.collisions);
        }
        Command::Build(cache_args) => {
            let config = config::load_config(&cli.source)?;

            println!("==> Stage 1: Checking {}", cli.source.display());
            let (catalog, indices) = load_catalog(&config, &cli.source)?;
            output::print_catalog_output(&catalog, &indices);

            println!("==> Stage 2: Generating derivatives");
            init_thread_pool(&config.processing);
            let derivative_report =
                run_derivatives(&config, &catalog, &cli.source, &cli.output, &cache_args)?;
            output::print_derivative_report(&derivative_report);

            println!("==> Stage 3: Rendering pages \u{2192} {}", cli.output.display());
            let site_report =
                generate::generate(&catalog, &indices, &config, &cli.source, &cli.output)?;
            output::print_site_output(&site_report);
            output::print_warnings(&site_report.collisions);

            if derivative_report.has_failures() {
                println!(
                    "==> Build complete with {} failed derivatives: {}",
                    derivative_report.failed(),
                    cli.output.display()
                );
            } else {
                println!("==> Build complete: {}", cli.output.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load and validate the catalog, including the originals check, and index it.
fn load_catalog(
    config: &SiteConfig,
    source: &Path,
) -> Result<(Catalog, Indices), catalog::LoadError> {
    let catalog = catalog::load(&config.catalog_path(source), &config.originals_dir(source))?;
    let indices = taxonomy::build_indices(&catalog);
    Ok((catalog, indices))
}

/// Run the derivative pipeline with a printer thread draining progress events.
fn run_derivatives(
    config: &SiteConfig,
    catalog: &Catalog,
    source: &Path,
    output_dir: &Path,
    cache_args: &CacheArgs,
) -> Result<DerivativeReport, derivatives::PipelineError> {
    let root = derivatives::derivative_root(output_dir);
    let strategy = cache::select(config.images.cache, &root, !cache_args.no_cache);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_derivative_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = derivatives::generate(
        catalog,
        &config.originals_dir(source),
        &root,
        Quality::new(config.images.quality),
        strategy.as_ref(),
        Some(tx),
    );
    // The sender is dropped with `generate`, which ends the printer loop.
    let _ = printer.join();
    result
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
