// src/main.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use JobSifter::config::{load_scraper_config, ScraperConfig};
use JobSifter::data_model::FetchMode;
use JobSifter::error::{Result, ScrapeError};
use JobSifter::executor::{PipelineExecutor, RunSummary};

// Define command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Filters job-posting URLs down to software-development roles", long_about = None)]
struct Args {
    /// Path to the newline-delimited job URL list
    #[arg(short, long, default_value = "joburl.txt")]
    url_file: PathBuf,

    /// Path to the scraper configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured fetch mode
    #[arg(long, value_enum)]
    fetch_mode: Option<FetchMode>,

    /// Emit matched postings as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber; default to info if RUST_LOG is not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => load_scraper_config(path)?,
        None => ScraperConfig::default(),
    };
    if let Some(mode) = args.fetch_mode {
        config.fetch_mode = mode;
    }
    config.validate()?;

    if args.validate_config {
        println!("Configuration OK");
        return Ok(());
    }

    let urls = read_url_file(&args.url_file)?;
    if urls.is_empty() {
        println!("文件中没有找到有效链接: {}", args.url_file.display());
        return Ok(());
    }
    info!(count = urls.len(), file = %args.url_file.display(), mode = ?config.fetch_mode, "Loaded job URLs");

    let executor = PipelineExecutor::from_config(&config)?;

    let abort = Arc::new(AtomicBool::new(false));
    {
        let abort = Arc::clone(&abort);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; finishing the current URL then stopping");
                abort.store(true, Ordering::Relaxed);
            }
        });
    }

    let summary = executor.run(&urls, &abort).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.matches)?);
    } else {
        print_report(&summary);
    }

    Ok(())
}

/// One absolute URL per line; blank lines ignored.
fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ScrapeError::ConfigError(format!(
            "Failed to read URL file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn print_report(summary: &RunSummary) {
    println!("\n筛选结果:");
    if summary.matches.is_empty() {
        println!("未找到招聘软件开发人员的职位");
    } else {
        for (i, job) in summary.matches.iter().enumerate() {
            println!("{}. {}", i + 1, job.title);
            println!("   URL: {}", job.url);
            println!("   匹配理由: {}", job.reason);
            println!();
        }
    }
    println!(
        "共处理 {} 个链接，匹配 {} 个，跳过 {} 个。",
        summary.processed + summary.skipped,
        summary.matches.len(),
        summary.skipped
    );
}
