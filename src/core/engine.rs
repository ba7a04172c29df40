use crate::config::cli::LocalStorage;
use crate::core::classifier::CookieClassifier;
use crate::core::fetcher::TrackerListFetcher;
use crate::core::pipeline::LabelingPipeline;
use crate::core::{ConfigProvider, CookieRecord, Pipeline};
use crate::domain::model::LabelStats;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct LabelRunSummary {
    pub output_path: String,
    pub stats: LabelStats,
    pub samples: Vec<CookieRecord>,
}

pub struct LabelEngine<P: Pipeline> {
    pipeline: P,
    sample_size: usize,
}

impl<P: Pipeline> LabelEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            sample_size: 5,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub async fn run(&self) -> Result<LabelRunSummary> {
        tracing::info!("🏷️ Starting cookie labeling...");

        // Extract
        let cookies = self.pipeline.extract().await?;
        tracing::info!("Found {} cookies to label", cookies.len());

        // Transform
        let result = self.pipeline.transform(cookies).await?;
        tracing::info!("Labeled {} cookies", result.labeled_cookies.len());

        // Load
        let output_path = self.pipeline.load(&result).await?;
        tracing::info!(
            "✓ Saved {} labeled cookies to {}",
            result.labeled_cookies.len(),
            output_path
        );

        let samples = result
            .labeled_cookies
            .iter()
            .take(self.sample_size)
            .cloned()
            .collect();

        Ok(LabelRunSummary {
            output_path,
            stats: result.stats,
            samples,
        })
    }
}

/// 依設定建立追蹤資料庫後標記輸入檔
pub async fn label_from_config<C: ConfigProvider>(
    config: C,
    sample_size: usize,
) -> Result<LabelRunSummary> {
    let classifier = build_classifier(&config).await?;
    label_with_classifier(config, classifier, sample_size).await
}

/// 下載或讀取快取中的追蹤清單並建立分類器，不需要輸入檔
pub async fn build_classifier<C: ConfigProvider>(config: &C) -> Result<CookieClassifier> {
    let fetcher = TrackerListFetcher::new(
        LocalStorage::new(config.cache_dir()),
        config.sources(),
        config.fetch_settings(),
    )?;
    let database = fetcher.initialize(config.force_refresh()).await?;
    CookieClassifier::new(database)
}

pub async fn label_with_classifier<C: ConfigProvider>(
    config: C,
    classifier: CookieClassifier,
    sample_size: usize,
) -> Result<LabelRunSummary> {
    // 相對路徑以目前工作目錄為基準
    let pipeline = LabelingPipeline::new(LocalStorage::new("."), config, classifier);
    LabelEngine::new(pipeline)
        .with_sample_size(sample_size)
        .run()
        .await
}

/// 分類統計表，依分類名稱排序
pub fn format_stats(stats: &LabelStats) -> String {
    let rule = "=".repeat(50);
    let mut lines = vec!["Labeling Results:".to_string(), rule.clone()];

    for (category, count) in stats.sorted_by_name() {
        lines.push(format!(
            "  {:<15}: {:>5} ({:>5.1}%)",
            category.as_str(),
            count,
            stats.percentage(category)
        ));
    }

    lines.push(rule);
    lines.join("\n")
}

pub fn format_sample(record: &CookieRecord) -> String {
    let text = |key: &str| record.get_str(key).unwrap_or_default().to_string();
    let confidence = record
        .data
        .get("label_confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let sources: Vec<&str> = record
        .data
        .get("label_sources")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|s| s.as_str()).collect())
        .unwrap_or_default();
    let sources = if sources.is_empty() {
        "none".to_string()
    } else {
        sources.join(", ")
    };

    format!(
        "  Cookie: {}\n  Domain: {}\n  Label: {} (confidence: {:.2})\n  Reason: {}\n  Sources: {}",
        text("name"),
        text("domain"),
        text("label"),
        confidence,
        text("label_reason"),
        sources
    )
}
