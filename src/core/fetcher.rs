use crate::core::domain_index::{TrackerDatabase, TrackerDatabaseBuilder};
use crate::core::list_parser::{parse_disconnect_list, parse_filter_list};
use crate::domain::model::{Category, FetchSettings, TrackerSources};
use crate::domain::ports::Storage;
use crate::utils::error::{LabelerError, Result};
use reqwest::Client;
use std::time::Duration;

pub const EASYLIST_CACHE: &str = "easylist.txt";
pub const EASYPRIVACY_CACHE: &str = "easyprivacy.txt";
pub const DISCONNECT_CACHE: &str = "disconnect.json";

/// 追蹤清單的種類，決定解析方式與歸屬分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerList {
    EasyList,
    EasyPrivacy,
    Disconnect,
}

impl TrackerList {
    pub const ALL: [TrackerList; 3] = [
        TrackerList::EasyList,
        TrackerList::EasyPrivacy,
        TrackerList::Disconnect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrackerList::EasyList => "EasyList",
            TrackerList::EasyPrivacy => "EasyPrivacy",
            TrackerList::Disconnect => "Disconnect.me",
        }
    }

    pub fn cache_file(&self) -> &'static str {
        match self {
            TrackerList::EasyList => EASYLIST_CACHE,
            TrackerList::EasyPrivacy => EASYPRIVACY_CACHE,
            TrackerList::Disconnect => DISCONNECT_CACHE,
        }
    }

    pub fn url<'a>(&self, sources: &'a TrackerSources) -> &'a str {
        match self {
            TrackerList::EasyList => &sources.easylist,
            TrackerList::EasyPrivacy => &sources.easyprivacy,
            TrackerList::Disconnect => &sources.disconnect,
        }
    }
}

/// 下載追蹤清單到快取目錄並解析成 [`TrackerDatabase`]
pub struct TrackerListFetcher<S: Storage> {
    cache: S,
    sources: TrackerSources,
    settings: FetchSettings,
    client: Client,
}

impl<S: Storage> TrackerListFetcher<S> {
    pub fn new(cache: S, sources: TrackerSources, settings: FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            cache,
            sources,
            settings,
            client,
        })
    }

    /// 下載並解析
    pub async fn initialize(&self, force_refresh: bool) -> Result<TrackerDatabase> {
        self.download_tracker_lists(force_refresh).await?;
        let database = self.load_tracker_database().await?;

        tracing::info!("✅ Tracker database ready");
        tracing::info!("  Advertising domains: {}", database.advertising().len());
        tracing::info!("  Analytics domains: {}", database.analytics().len());
        tracing::info!("  Social domains: {}", database.social().len());
        tracing::info!("  Total tracker domains: {}", database.total_unique());

        Ok(database)
    }

    /// 下載快取中缺少的清單；`force_refresh` 時全部重新下載
    pub async fn download_tracker_lists(&self, force_refresh: bool) -> Result<()> {
        tracing::info!("📥 Downloading tracker lists...");

        for list in TrackerList::ALL {
            if !force_refresh && self.cache.exists(list.cache_file()).await {
                tracing::debug!("{} already cached, skipping download", list.name());
                continue;
            }

            let url = list.url(&self.sources);
            tracing::info!("  Downloading {} from {}", list.name(), url);
            let body = self.download_with_retry(url).await?;
            self.cache.write_file(list.cache_file(), &body).await?;
        }

        Ok(())
    }

    async fn download_with_retry(&self, url: &str) -> Result<Vec<u8>> {
        let attempts = self.settings.retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.download(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < attempts => {
                    tracing::warn!("  Retry {}/{} for {}: {}", attempt, attempts, url, e);
                    tokio::time::sleep(Duration::from_secs(self.settings.retry_delay_seconds))
                        .await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("  Failed to download {}: {}", url, e);
                    return Err(LabelerError::DownloadError {
                        url: url.to_string(),
                        attempts,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        tracing::debug!("{} responded with {}", url, response.status());
        Ok(response.bytes().await?.to_vec())
    }

    /// 解析快取中現有的清單，缺少的檔案略過
    pub async fn load_tracker_database(&self) -> Result<TrackerDatabase> {
        tracing::info!("🔍 Parsing tracker lists...");
        let mut builder = TrackerDatabase::builder();

        for list in TrackerList::ALL {
            match self.read_cached(list).await? {
                Some(content) => add_list(&mut builder, list, &content),
                None => tracing::warn!(
                    "{} cache file '{}' not found, skipping",
                    list.name(),
                    list.cache_file()
                ),
            }
        }

        Ok(builder.build())
    }

    async fn read_cached(&self, list: TrackerList) -> Result<Option<String>> {
        if !self.cache.exists(list.cache_file()).await {
            return Ok(None);
        }
        let bytes = self.cache.read_file(list.cache_file()).await?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// 將單一清單內容加入 builder，Disconnect 解析失敗只記錄 log
pub fn add_list(builder: &mut TrackerDatabaseBuilder, list: TrackerList, content: &str) {
    match list {
        TrackerList::EasyList => {
            let domains = parse_filter_list(content);
            tracing::info!("  EasyList: {} advertising domains", domains.len());
            builder.add_domains(Category::Advertising, domains);
        }
        TrackerList::EasyPrivacy => {
            let domains = parse_filter_list(content);
            tracing::info!("  EasyPrivacy: {} tracking domains", domains.len());
            builder.add_domains(Category::Analytics, domains);
        }
        TrackerList::Disconnect => match parse_disconnect_list(content) {
            Ok(parsed) => {
                for (category, domains) in parsed.into_categories() {
                    builder.add_domains(category, domains);
                }
                tracing::info!("  Disconnect.me:");
                tracing::info!("    Advertising: {} domains", builder.len(Category::Advertising));
                tracing::info!("    Analytics: {} domains", builder.len(Category::Analytics));
                tracing::info!("    Social: {} domains", builder.len(Category::Social));
            }
            Err(e) => tracing::error!("  Error parsing Disconnect.me: {}", e),
        },
    }
}
