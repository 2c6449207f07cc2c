//! Moodlens CLI
//!
//! Command-line interface for Moodlens operations:
//! - Analyze a CSV export locally
//! - Show dashboard statistics
//! - Import entries into a running server
//! - Check status

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use moodlens::analysis::{
    AnalysisResult, DashboardSnapshot, EngineConfig, PatternAnalysisEngine, RunContinuity,
};
use moodlens::config::{Config, GeneratorConfig, LoggingConfig};
use moodlens::entries::{CsvEntryImporter, EntrySeries};
use moodlens::generator::ChatCompletionsClient;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "moodlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mood pattern analysis for daily tracking data")]
#[command(long_about = "Moodlens analyses daily mood, energy and sleep entries.\nIt detects possible elevated or low periods and summarises trends.\nIt does not provide medical diagnoses.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:5000", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContinuityArg {
    /// Missing days break a run
    Calendar,
    /// Runs continue across missing days
    EntryOrder,
}

impl From<ContinuityArg> for RunContinuity {
    fn from(arg: ContinuityArg) -> Self {
        match arg {
            ContinuityArg::Calendar => RunContinuity::CalendarDays,
            ContinuityArg::EntryOrder => RunContinuity::EntryOrder,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze entries from a CSV file
    Analyze {
        /// Path to CSV file
        path: PathBuf,
        /// Ask the configured external generator for the summary
        #[arg(long)]
        external: bool,
        /// How consecutive days are decided (default: from config)
        #[arg(long, value_enum)]
        continuity: Option<ContinuityArg>,
    },

    /// Show statistics for entries in a CSV file
    Stats {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Import entries from CSV into a running server
    Import {
        /// Path to CSV file
        path: PathBuf,
        /// User the entries belong to
        #[arg(short, long)]
        user: String,
        /// Date format of the date column (strftime format)
        #[arg(long, default_value = "%Y-%m-%d")]
        date_format: String,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_default();

    let logging = LoggingConfig {
        level: if cli.verbose { "debug" } else { "warn" }.to_string(),
        ..config.logging.clone()
    };
    moodlens::logging::init_tracing(&logging).context("failed to initialise logging")?;

    match cli.command {
        Commands::Analyze {
            path,
            external,
            continuity,
        } => {
            let series = load_series(&path)?;

            let mut engine_config = EngineConfig::from(&config);
            if let Some(continuity) = continuity {
                engine_config.continuity = continuity.into();
            }
            let engine = PatternAnalysisEngine::new(engine_config);

            let client = if external {
                external_generator(&config.generator)?
            } else {
                None
            };

            let result = match &client {
                Some(client) => engine.analyze_with_generator(&series, client).await,
                None => engine.analyze(&series),
            };

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => print_analysis(&series, &result),
            }
        }

        Commands::Stats { path } => {
            let series = load_series(&path)?;
            let snapshot = PatternAnalysisEngine::new(EngineConfig::from(&config)).snapshot(&series);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                OutputFormat::Table => print_snapshot(&snapshot),
            }
        }

        Commands::Import {
            path,
            user,
            date_format,
            dry_run,
        } => {
            let importer = CsvEntryImporter::new().with_date_format(&date_format);
            let result = importer
                .import(&path)
                .with_context(|| format!("failed to read {:?}", path))?;

            println!(
                "Parsed {} entries ({} rows failed)",
                result.rows_processed, result.rows_failed
            );
            for error in &result.errors {
                eprintln!("  {}", error);
            }

            if dry_run {
                println!("Dry run: nothing sent to {}", cli.api_url);
                return Ok(());
            }

            let client = reqwest::Client::new();
            let url = format!("{}/api/v1/users/{}/entries", cli.api_url, user);
            let mut imported = 0;
            let mut failed = 0;

            for entry in &result.entries {
                let response = client
                    .post(&url)
                    .json(entry)
                    .send()
                    .await
                    .with_context(|| format!("cannot reach Moodlens API at {}", cli.api_url))?;

                if response.status().is_success() {
                    imported += 1;
                } else {
                    failed += 1;
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    eprintln!("  {}: failed ({}): {}", entry.date, status, text);
                }
            }

            println!("Imported {} entries for {} ({} failed)", imported, user, failed);
            if failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let response = reqwest::Client::new()
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    if cli.format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!("Moodlens v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Entry store: {}", health["store"].as_str().unwrap_or("unknown"));
                    println!("Generator: {}", health["generator"].as_str().unwrap_or("unknown"));

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Cannot connect to Moodlens API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Moodlens API server is running:");
                    eprintln!("  cargo run --bin moodlens-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = moodlens::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Generator client for `--external`, or `None` when disabled in config
fn external_generator(config: &GeneratorConfig) -> anyhow::Result<Option<ChatCompletionsClient>> {
    if !config.enabled {
        eprintln!("External summary generator is disabled in config; using rule-based summary");
        return Ok(None);
    }

    let client = ChatCompletionsClient::new(config.clone())
        .context("failed to create generator client")?;
    Ok(Some(client))
}

/// Read a CSV export into a series, reporting skipped rows on stderr
fn load_series(path: &Path) -> anyhow::Result<EntrySeries> {
    if !path.exists() {
        bail!("File not found: {:?}", path);
    }

    let result = CsvEntryImporter::new()
        .import(path)
        .with_context(|| format!("failed to read {:?}", path))?;

    if result.rows_failed > 0 {
        eprintln!("Skipped {} invalid rows:", result.rows_failed);
        for error in &result.errors {
            eprintln!("  {}", error);
        }
    }

    Ok(EntrySeries::new(result.entries)?)
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_analysis(series: &EntrySeries, result: &AnalysisResult) {
    if let (Some(first), Some(last)) = (series.entries().first(), series.latest()) {
        println!("Period: {} .. {} ({} entries)", first.date, last.date, result.entry_count);
    } else {
        println!("Period: no entries");
    }
    println!();

    if !result.is_complete() {
        println!("{}", result.summary_text);
        return;
    }

    if let Some(stats) = &result.statistics {
        println!(
            "Wellness: {:.1} (mood {:.1}, sleep {:.1}, stability {:.1})",
            stats.wellness.total,
            stats.wellness.mood_score,
            stats.wellness.sleep_score,
            stats.wellness.stability_score
        );
    }
    if let Some(metrics) = &result.metrics {
        println!("Mood stability:     {:>5.1}", metrics.mood_stability);
        println!("Sleep quality:      {:>5.1}", metrics.sleep_quality);
        println!("Energy consistency: {:>5.1}", metrics.energy_consistency);
    }
    if let Some(trends) = &result.trends {
        println!();
        println!("Week over week:");
        println!(
            "  Mood {:+.1}%  Sleep {:+.1}%  Volatility {:+.1}%  Wellness {:+.1}%",
            trends.mood, trends.sleep, trends.volatility, trends.wellness
        );
    }

    println!();
    if result.patterns.is_empty() {
        println!("No patterns detected");
    } else {
        println!("{:<12} {:<12} {:<12} {:>5}  {}", "Type", "Start", "End", "Days", "Severity");
        println!("{}", "-".repeat(55));
        for pattern in &result.patterns {
            println!(
                "{:<12} {:<12} {:<12} {:>5}  {}",
                pattern.kind.to_string(),
                pattern.start_date.to_string(),
                pattern.end_date.to_string(),
                pattern.duration_days,
                pattern.severity
            );
        }
    }

    println!();
    println!("{}", result.summary_text);
    if let Some(error) = &result.generator_error {
        println!("(external summary unavailable: {})", error);
    }

    println!();
    for recommendation in &result.recommendations {
        println!("- {}", recommendation);
    }
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    let stats = &snapshot.statistics;

    if stats.entry_count == 0 {
        println!("No entries");
        return;
    }

    println!("Entries:          {}", stats.entry_count);
    println!("Average mood:     {:.2}", stats.average_mood);
    println!("Mood volatility:  {:.2}", stats.mood_volatility);
    println!("Mood range:       {} .. {}", stats.mood_range.min, stats.mood_range.max);
    println!("Average sleep:    {:.1}h", stats.average_sleep);
    println!("Wellness:         {:.1}", stats.wellness.total);
    println!(
        "Streak:           {} days (longest {})",
        stats.streaks.current, stats.streaks.longest
    );
    if let Some(energy) = stats.dominant_energy {
        println!("Dominant energy:  {}", energy);
    }

    println!();
    println!("{:<10} {:>5}", "Energy", "Days");
    println!("{}", "-".repeat(16));
    for (level, count) in &stats.energy_distribution {
        println!("{:<10} {:>5}", level.as_str(), count);
    }
}
