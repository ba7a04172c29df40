use clap::Parser;
use cookie_labeler::core::engine::{format_sample, format_stats, label_from_config};
use cookie_labeler::core::fetcher::TrackerList;
use cookie_labeler::core::ConfigProvider;
use cookie_labeler::utils::error::ErrorSeverity;
use cookie_labeler::utils::{logger, validation::Validate};
use cookie_labeler::TomlConfig;
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-labeler")]
#[command(about = "Cookie labeler driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "labeler.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the cache force_refresh setting from config
    #[arg(long)]
    force_refresh: Option<bool>,

    /// Dry run - show sources, cache state and paths without downloading or labeling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based cookie labeler");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 套用命令列覆蓋設定
    if let Some(force) = args.force_refresh {
        config.cache.force_refresh = Some(force);
        tracing::info!("🔧 force_refresh overridden to: {}", force);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let samples = config.samples();
    match label_from_config(config, samples).await {
        Ok(summary) => {
            println!("{}", format_stats(&summary.stats));
            println!("📁 Output saved to: {}", summary.output_path);
            for record in &summary.samples {
                println!("\n{}", format_sample(record));
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Labeling failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Labeler: {} v{}",
        config.labeler.name,
        config.labeler.version.as_deref().unwrap_or("-")
    );
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Cache: {}", config.cache_dir());
    println!("  Force refresh: {}", config.force_refresh());
    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    let sources = config.sources();
    let fetch = config.fetch_settings();

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📡 Tracker Lists:");
    for list in TrackerList::ALL {
        let cached = Path::new(config.cache_dir()).join(list.cache_file()).exists();
        let action = if config.force_refresh() || !cached {
            "download"
        } else {
            "use cache"
        };
        println!("  {} ({}): {}", list.name(), action, list.url(&sources));
    }
    println!(
        "  Timeout: {}s, Attempts: {}, Retry delay: {}s",
        fetch.timeout_seconds, fetch.retry_attempts, fetch.retry_delay_seconds
    );

    println!();
    println!("💾 Cookies:");
    let input_exists = Path::new(config.input_path()).exists();
    println!(
        "  Input: {} ({})",
        config.input_path(),
        if input_exists { "found" } else { "missing" }
    );
    println!("  Output: {}", config.output_path());

    println!();
    println!("✅ Dry run analysis complete.");
}
