use clap::{Parser, Subcommand};
use docsite::{config, generate, navigation, output, scan, types::Manifest};
use std::path::{Path, PathBuf};

/// Shared flags for commands that write the site.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the output cache and rewrite every page
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("DOCSITE_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("DOCSITE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docsite")]
#[command(about = "Static documentation site generator for component libraries")]
#[command(long_about = "\
Static documentation site generator for component libraries

The navigation is declared in navigation.toml and becomes a route tree.
Every internal link in that tree is backed by a markdown page or by one
section of a package's documentation.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── navigation.toml              # Navigation (optional, stock layout otherwise)
  ├── assets/                      # Copied to the output root
  ├── pages/
  │   ├── index.md                 # \"/\"
  │   └── getting-started/
  │       └── quick-start.md       # \"/getting-started/quick-start\"
  └── packages/
      └── button/
          ├── demos/               # \"/packages/button/demos\"
          │   └── 010-Text-Buttons.md
          ├── sassdoc.json         # \"/packages/button/sassdoc\"
          ├── installation.md      # Optional override
          └── api.md               # \"/packages/button/api\"

Routes without a markdown file render as placeholders.

Run 'docsite gen-config' for a documented config.toml and
'docsite gen-navigation' for the stock navigation.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".docsite-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the HTML site from the scanned manifest
    Generate(CacheArgs),
    /// Run the full pipeline: scan → generate
    Build(CacheArgs),
    /// Validate content directory without building
    Check,
    /// Print the route tree as JSON
    Routes,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the stock navigation.toml
    GenNavigation,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate(cache_args) => {
            let manifest = generate::load_manifest(&manifest_path(&cli.temp_dir))?;
            init_thread_pool(&manifest.config.processing);
            let report =
                generate::generate(&manifest, &cli.output, &cli.source, !cache_args.no_cache)?;
            output::print_generate_output(&report);
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let report =
                generate::generate(&manifest, &cli.output, &cli.source, !cache_args.no_cache)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Routes => {
            let routes = scan::scan_routes(&cli.source)?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenNavigation => {
            print!("{}", navigation::stock_navigation_toml());
        }
    }

    Ok(())
}

fn manifest_path(temp_dir: &Path) -> PathBuf {
    temp_dir.join("manifest.json")
}

fn write_manifest(manifest: &Manifest, temp_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(manifest_path(temp_dir), json)?;
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
