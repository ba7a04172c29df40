use crate::domain::model::{CookieRecord, FetchSettings, LabelingResult, TrackerSources};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn cache_dir(&self) -> &str;
    fn force_refresh(&self) -> bool;
    fn sources(&self) -> TrackerSources;
    fn fetch_settings(&self) -> FetchSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<CookieRecord>>;
    async fn transform(&self, data: Vec<CookieRecord>) -> Result<LabelingResult>;
    async fn load(&self, result: &LabelingResult) -> Result<String>;
}
