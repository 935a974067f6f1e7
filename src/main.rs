use cellar::{config, logging, output, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cellar")]
#[command(about = "Content collection loader for the winery site")]
#[command(long_about = "\
Content collection loader for the winery site

Discovers news posts and stories, validates their front matter, and writes
a manifest the site renderer consumes.

Project structure:

  site/
  ├── config.toml                      # Site config (optional)
  └── src/
      ├── assets/                      # Shared images
      └── content/
          ├── news/
          │   ├── harvest-fest.mdx     # id: harvest-fest
          │   └── 2024/
          │       └── spring-release.mdx
          └── stories/
              └── founders/
                  └── index.mdx        # id: founders

Front matter:
  title, description, date     required
  featuredImage                image path relative to the document
  featuredImageAlt             alt text
  pinned, draft                booleans, default false

Run 'cellar gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".cellar-temp", global = true)]
    temp_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load both collections and write the manifest
    Scan,
    /// Validate content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: cannot initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Scan => {
            let manifest = load(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let manifest_path = cli.temp_dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            info!(path = %manifest_path.display(), "wrote manifest");
            output::print_scan_output(&manifest);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = load(&cli.source)?;
            output::print_scan_output(&manifest);
            println!("==> Content is valid: {}", output::format_check_summary(&manifest));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load(source: &Path) -> Result<scan::Manifest, Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    init_thread_pool(&site_config.processing);
    Ok(scan::scan_with_config(source, &site_config)?)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    debug!(threads, "initializing thread pool");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
