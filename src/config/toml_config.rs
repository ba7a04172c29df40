use crate::core::ConfigProvider;
use crate::domain::model::{FetchSettings, TrackerSources};
use crate::utils::error::{LabelerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub labeler: LabelerSection,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelerSection {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub easylist: Option<String>,
    pub easyprivacy: Option<String>,
    pub disconnect: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub dir: Option<String>,
    pub force_refresh: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub samples: Option<usize>,
}

const DEFAULT_CACHE_DIR: &str = "data/tracker_lists";
const DEFAULT_SAMPLES: usize = 5;

fn env_var_pattern() -> &'static Regex {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap())
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LabelerError::MissingConfigError {
                field: format!("config file {}", path.display()),
            },
            _ => LabelerError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LabelerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRACKER_MIRROR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn samples(&self) -> usize {
        self.output.samples.unwrap_or(DEFAULT_SAMPLES)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn cache_dir(&self) -> &str {
        self.cache.dir.as_deref().unwrap_or(DEFAULT_CACHE_DIR)
    }

    fn force_refresh(&self) -> bool {
        self.cache.force_refresh.unwrap_or(false)
    }

    fn sources(&self) -> TrackerSources {
        let defaults = TrackerSources::default();
        TrackerSources {
            easylist: self.sources.easylist.clone().unwrap_or(defaults.easylist),
            easyprivacy: self.sources.easyprivacy.clone().unwrap_or(defaults.easyprivacy),
            disconnect: self.sources.disconnect.clone().unwrap_or(defaults.disconnect),
        }
    }

    fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            timeout_seconds: self.fetch.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            retry_attempts: self.fetch.retry_attempts.unwrap_or(defaults.retry_attempts),
            retry_delay_seconds: self
                .fetch
                .retry_delay_seconds
                .unwrap_or(defaults.retry_delay_seconds),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.path", self.input_path())?;
        validation::validate_path("output.path", self.output_path())?;
        validation::validate_path("cache.dir", self.cache_dir())?;

        let sources = self.sources();
        validation::validate_url("sources.easylist", &sources.easylist)?;
        validation::validate_url("sources.easyprivacy", &sources.easyprivacy)?;
        validation::validate_url("sources.disconnect", &sources.disconnect)?;

        let fetch = self.fetch_settings();
        validation::validate_positive_number("fetch.retry_attempts", fetch.retry_attempts, 1)?;
        validation::validate_range("fetch.timeout_seconds", fetch.timeout_seconds, 1, 600)?;

        Ok(())
    }
}
