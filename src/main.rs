// ABOUTME: Main entry point for mdimg CLI
// ABOUTME: Merges config file and flags, then runs or previews the rehosting pass

use clap::{Args, Parser, Subcommand};
use mdimg::config::Config;
use mdimg::process::ImageOutcome;
use mdimg::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdimg")]
#[command(about = "Upload images referenced from markdown notes and rewrite their links", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: <config dir>/mdimg/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Overrides {
    /// Root directory of markdown notes
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Upload endpoint accepting multipart `file` posts
    #[arg(long, global = true)]
    upload_url: Option<String>,
    /// Convert ![[name]] embeds before collecting
    #[arg(long, global = true, conflicts_with = "no_obs2md")]
    obs2md: bool,
    /// Leave ![[name]] embeds alone
    #[arg(long, global = true)]
    no_obs2md: bool,
    /// Read images from local files next to each note
    #[arg(long, global = true, conflicts_with = "remote")]
    local: bool,
    /// Download images from their URLs before uploading
    #[arg(long, global = true)]
    remote: bool,
    /// Network timeout in seconds (0 disables it)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.dir {
            config.markdown_dir = dir;
        }
        if let Some(url) = self.upload_url {
            config.upload_url = url;
        }
        if self.obs2md {
            config.obs2md = true;
        }
        if self.no_obs2md {
            config.obs2md = false;
        }
        if self.local {
            config.local_upload = true;
        }
        if self.remote {
            config.local_upload = false;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = Some(secs);
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Upload every referenced image and rewrite links (default)
    Run,
    /// List the image references a run would process, changing nothing
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    mdimg::logging::init_tracing(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.overrides.apply(&mut config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&config).await,
        Commands::Scan => cmd_scan(&config),
    }
}

async fn cmd_run(config: &Config) -> Result<()> {
    println!(
        "Processing {} -> {}",
        config.markdown_dir.display(),
        config.upload_url
    );

    let report = mdimg::process::run(config).await?;

    for (source, outcome) in &report.outcomes {
        match outcome {
            ImageOutcome::Uploaded { url } => println!("  ✓ {}\n    -> {}", source, url),
            ImageOutcome::Failed { reason } => println!("  ✗ {}\n    {}", source, reason),
        }
    }

    println!(
        "\n{} uploaded, {} failed, {} document(s) rewritten",
        report.uploaded(),
        report.failed(),
        report.documents_rewritten
    );

    if !report.mapping.is_empty() {
        println!("Conversion map:");
        for (name, url) in &report.mapping {
            println!("  {} -> {}", name, url);
        }
    }

    Ok(())
}

fn cmd_scan(config: &Config) -> Result<()> {
    let sources = mdimg::process::scan_directory(config)?;

    if sources.is_empty() {
        println!("No image references found in {}", config.markdown_dir.display());
        return Ok(());
    }

    println!("Found {} image reference(s):", sources.len());
    for source in &sources {
        println!("  {}", source);
    }

    Ok(())
}
