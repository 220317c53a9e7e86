use anyhow::Context;
use clap::{Parser, Subcommand};
use mcr_gradletools::{
    check_all_mirrors, download_gradle, process_gradle_dir, CacheStore, DownloadOutcome,
    ToolConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mcr-gradletools")]
#[command(about = "Gradle mirror downloader and repair tool for MCreator", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Cache directory (default: ~/.mcrgradletool/cache)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Timeout for a single mirror probe (e.g. "10s")
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    probe_timeout: Option<Duration>,

    /// Timeout for a full archive download (e.g. "5m")
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    download_timeout: Option<Duration>,

    /// Verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the availability of every mirror
    CheckMirrors,

    /// Clear the Gradle download cache
    ClearCache {
        /// Only list cached files, do not delete anything
        #[arg(short, long)]
        list: bool,
    },

    /// Download a Gradle distribution into the cache
    Download {
        /// Gradle version (e.g. 8.7)
        #[arg(short = 'v', long = "version")]
        gradle_version: String,

        /// Distribution edition: bin or all
        #[arg(short, long, default_value = "bin")]
        edition: String,
    },

    /// Repair stale Gradle downloads in MCreator's Gradle directory
    Gradle {
        /// MCreator Gradle distribution directory (default: ~/.mcreator/gradle/wrapper/dists)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Show version information
    #[command(visible_aliases = ["v", "ver"])]
    Version,
}

impl Args {
    fn config(&self) -> ToolConfig {
        let mut config = ToolConfig::from_env();
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(timeout) = self.probe_timeout {
            config.probe_timeout = timeout;
        }
        if let Some(timeout) = self.download_timeout {
            config.download_timeout = timeout;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("mcr_gradletools={}", log_level))
        .with_target(false)
        .init();

    let config = args.config();

    if let Err(e) = run(args.command, &config).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Option<Command>, config: &ToolConfig) -> anyhow::Result<()> {
    let Some(command) = command else {
        print_overview();
        return Ok(());
    };

    match command {
        Command::CheckMirrors => check_mirrors(config).await,
        Command::ClearCache { list } => clear_cache(config, list),
        Command::Download {
            gradle_version,
            edition,
        } => download(config, &gradle_version, &edition).await,
        Command::Gradle { path } => {
            let root = path.unwrap_or_else(|| config.gradle_dir.clone());
            process_gradle_dir(config, &root)
                .await
                .context("Failed to repair MCreator Gradle downloads")?;
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

async fn check_mirrors(config: &ToolConfig) -> anyhow::Result<()> {
    info!("Checking mirror availability...");
    let report = check_all_mirrors(config)
        .await
        .context("Failed to check mirrors")?;

    println!("\n✅ Available mirrors ({}):", report.available.len());
    for mirror in &report.available {
        println!("  ✓ {}", mirror);
    }

    println!("\n❌ Unavailable mirrors ({}):", report.unavailable.len());
    for mirror in &report.unavailable {
        println!("  ✗ {}", mirror);
    }

    println!(
        "\nTotal: {} mirrors, {} available, {} unavailable",
        report.total(),
        report.available.len(),
        report.unavailable.len()
    );
    Ok(())
}

fn clear_cache(config: &ToolConfig, list_only: bool) -> anyhow::Result<()> {
    let store = CacheStore::new(&config.cache_dir);
    let files = store.list().context("Failed to list cache files")?;

    if files.is_empty() {
        println!("Cache directory is empty");
        return Ok(());
    }

    if list_only {
        println!("Files in cache directory ({}):", store.dir().display());
    } else {
        println!("About to delete {} cached file(s):", files.len());
    }
    for (i, file) in files.iter().enumerate() {
        println!("  {}. {}", i + 1, file);
    }

    if list_only {
        println!("Total: {} file(s)", files.len());
        return Ok(());
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt("Delete these files?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")?;
    if !confirmed {
        println!("Cancelled");
        return Ok(());
    }

    let removed = store.clear().context("Failed to clear cache")?;
    println!("✅ Cache cleared ({} file(s) removed)", removed);
    Ok(())
}

async fn download(config: &ToolConfig, version: &str, edition: &str) -> anyhow::Result<()> {
    let outcome = download_gradle(config, version, edition)
        .await
        .context("Failed to download Gradle")?;

    match outcome {
        DownloadOutcome::Cached(path) => {
            println!(
                "Gradle {} ({}) is already cached: {}",
                version,
                edition,
                path.display()
            );
        }
        DownloadOutcome::Downloaded { path, mirror, .. } => {
            println!(
                "✅ Gradle {} ({}) downloaded from {}: {}",
                version,
                edition,
                mirror,
                path.display()
            );
        }
    }
    Ok(())
}

fn print_version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Repository: {}", env!("CARGO_PKG_REPOSITORY"));
    println!("Authors: {}", env!("CARGO_PKG_AUTHORS"));
    println!("\n{}", env!("CARGO_PKG_DESCRIPTION"));
}

fn print_overview() {
    println!("mcr-gradletools - Gradle management for MCreator");
    println!("Use '--help' to see all options");
    println!("Commands:");
    println!("  check-mirrors - check mirror availability");
    println!("  clear-cache   - clear the Gradle download cache");
    println!("  download      - download a specific Gradle version");
    println!("  gradle        - repair MCreator's stale Gradle downloads");
    println!("  version       - show version information");
}
