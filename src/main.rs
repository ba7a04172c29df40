use clap::Parser;
use cookie_labeler::core::engine::{
    build_classifier, format_sample, format_stats, label_with_classifier, LabelRunSummary,
};
use cookie_labeler::utils::error::ErrorSeverity;
use cookie_labeler::utils::{logger, validation::Validate};
use cookie_labeler::CliConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting cookie-labeler");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let samples = config.samples;
    match run(config, samples).await {
        Ok(None) => {}
        Ok(Some(summary)) => {
            println!();
            println!("{}", format_stats(&summary.stats));
            println!(
                "✓ Saved {} labeled cookies to {}",
                summary.stats.total(),
                summary.output_path
            );

            if !summary.samples.is_empty() {
                println!("\nSample labeled cookies:");
                for record in &summary.samples {
                    println!("\n{}", format_sample(record));
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Labeling failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
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

/// 先準備追蹤清單 (快取會被建立)，再檢查輸入檔；沒有輸入檔時回傳 `None`
async fn run(
    config: CliConfig,
    samples: usize,
) -> cookie_labeler::Result<Option<LabelRunSummary>> {
    let classifier = build_classifier(&config).await?;

    if !std::path::Path::new(&config.input).exists() {
        println!("No cookie data found at {}", config.input);
        println!("Collect cookies first, then run this command again.");
        return Ok(None);
    }

    label_with_classifier(config, classifier, samples).await.map(Some)
}
