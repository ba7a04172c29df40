use crate::core::classifier::CookieClassifier;
use crate::core::{ConfigProvider, CookieRecord, LabelingResult, Pipeline, Storage};
use crate::utils::error::{LabelerError, Result};
use serde_json::Value;

/// 讀取 cookie JSON 陣列，標記後寫出
pub struct LabelingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    classifier: CookieClassifier,
}

impl<S: Storage, C: ConfigProvider> LabelingPipeline<S, C> {
    pub fn new(storage: S, config: C, classifier: CookieClassifier) -> Self {
        Self {
            storage,
            config,
            classifier,
        }
    }

    pub fn classifier(&self) -> &CookieClassifier {
        &self.classifier
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LabelingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<CookieRecord>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading cookies from: {}", input_path);

        let raw = self.storage.read_file(input_path).await?;
        let json_data: Value = serde_json::from_slice(&raw)?;

        let Value::Array(items) = json_data else {
            return Err(LabelerError::ProcessingError {
                message: format!("{} must contain a JSON array of cookies", input_path),
            });
        };

        let total = items.len();
        let records: Vec<CookieRecord> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(obj) => Some(CookieRecord::new(obj)),
                _ => None,
            })
            .collect();

        if records.len() < total {
            tracing::warn!(
                "Skipped {} non-object entries in {}",
                total - records.len(),
                input_path
            );
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<CookieRecord>) -> Result<LabelingResult> {
        Ok(self.classifier.label_batch(data))
    }

    async fn load(&self, result: &LabelingResult) -> Result<String> {
        let output_path = self.config.output_path();
        let json_data = serde_json::to_string_pretty(&result.labeled_cookies)?;

        tracing::debug!(
            "Writing {} labeled cookies ({} bytes) to storage",
            result.labeled_cookies.len(),
            json_data.len()
        );
        self.storage
            .write_file(output_path, json_data.as_bytes())
            .await?;

        Ok(output_path.to_string())
    }
}
