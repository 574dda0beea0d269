use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};
use std::time::Instant;
use webify::{config, output, site};

#[derive(Parser)]
#[command(name = "webify")]
#[command(about = "Compile a content tree into JSON records for a static site")]
#[command(long_about = "\
Compile a content tree into JSON records for a static site

The directory holding webify.json is the source root. Every file under it is
mirrored into the output directory:

  content/
  ├── webify.json                  # Site config; its directory is the root
  ├── about.md                     # Front matter → dist/about.json
  ├── blog/
  │   ├── first-post.md            # In the 'blog' section → pageType \"post\"
  │   └── cover.png                # Copied verbatim
  ├── README.md                    # No front matter → copied verbatim
  └── .git/                        # Hidden paths are never read

Every page is also listed in dist/site.json together with the site fields.

Metadata resolution (first available wins):
  Title:  front matter title → file name without extension
  Path:   front matter path → source path, extension stripped
  Date:   front matter date → file modification time

Run 'webify gen-config' to print a starter webify.json.")]
#[command(version)]
struct Cli {
    /// Output directory (overrides build.output in the config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Show per-file progress
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: records, copies and site.json
    Build {
        /// Config file, or a directory containing webify.json
        config: Option<PathBuf>,
    },
    /// Show what a build would do without writing anything
    Check {
        /// Config file, or a directory containing webify.json
        config: Option<PathBuf>,
    },
    /// Print a starter webify.json with every option filled in
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match &cli.command {
        Command::Build { config } => {
            let (root, site_config) = load(config.as_deref())?;
            let output_dir = resolve_output(&cli, &root, &site_config);
            init_thread_pool(&site_config.build);

            let started = Instant::now();
            let (tx, rx) = std::sync::mpsc::channel::<site::BuildEvent>();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    log::log!(event.level(), "{}", output::format_build_event(&event));
                }
            });
            let result = site::build(&root, &output_dir, &site_config, Some(tx));
            if printer.join().is_err() {
                log::error!("progress printer panicked");
            }
            let manifest = result?;
            if !cli.quiet {
                output::print_summary(&manifest, started.elapsed());
            }
        }
        Command::Check { config } => {
            let (root, site_config) = load(config.as_deref())?;
            let output_dir = resolve_output(&cli, &root, &site_config);
            log::info!("Checking {}", root.display());
            let planned = site::plan(&root, &output_dir, &site_config)?;
            output::print_check_output(&planned);
            if planned.iter().any(|(_, disposition)| disposition.is_err()) {
                return Err("some files would fail to build".into());
            }
        }
        Command::GenConfig => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config::example_config())?
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
}

/// Locate and load the config; the config file's directory is the source root.
fn load(arg: Option<&Path>) -> Result<(PathBuf, config::SiteConfig), config::ConfigError> {
    let path = config::resolve_config_path(arg)?;
    let site_config = config::load_config(&path)?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((root, site_config))
}

/// `--output` wins over `build.output`.
fn resolve_output(cli: &Cli, root: &Path, site_config: &config::SiteConfig) -> PathBuf {
    match &cli.output {
        Some(dir) => dir.clone(),
        None => site_config.output_dir(root),
    }
}

/// Initialize the rayon thread pool based on build config.
///
/// Caps at the number of available CPU cores; the config can lower it, not raise it.
fn init_thread_pool(build: &config::BuildOptions) {
    let threads = config::effective_threads(build);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
