pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{FetchSettings, TrackerSources};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cookie-labeler")]
#[command(about = "Label browser cookies using EasyList, EasyPrivacy and Disconnect.me tracker databases")]
pub struct CliConfig {
    #[arg(long, default_value = "data/raw/cookies.json")]
    pub input: String,

    #[arg(long, default_value = "data/processed/labeled_cookies_ground_truth.json")]
    pub output: String,

    #[arg(long, default_value = "data/tracker_lists")]
    pub cache_dir: String,

    #[arg(long, help = "Re-download tracker lists even when cached")]
    pub force_refresh: bool,

    #[arg(long, default_value = TrackerSources::EASYLIST_URL)]
    pub easylist_url: String,

    #[arg(long, default_value = TrackerSources::EASYPRIVACY_URL)]
    pub easyprivacy_url: String,

    #[arg(long, default_value = TrackerSources::DISCONNECT_URL)]
    pub disconnect_url: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "3")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "2")]
    pub retry_delay_seconds: u64,

    #[arg(long, default_value = "5", help = "Number of labeled samples to print")]
    pub samples: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn cache_dir(&self) -> &str {
        &self.cache_dir
    }

    fn force_refresh(&self) -> bool {
        self.force_refresh
    }

    fn sources(&self) -> TrackerSources {
        TrackerSources {
            easylist: self.easylist_url.clone(),
            easyprivacy: self.easyprivacy_url.clone(),
            disconnect: self.disconnect_url.clone(),
        }
    }

    fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout_seconds: self.timeout_seconds,
            retry_attempts: self.retry_attempts,
            retry_delay_seconds: self.retry_delay_seconds,
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output", &self.output)?;
        validation::validate_path("cache_dir", &self.cache_dir)?;
        validation::validate_url("easylist_url", &self.easylist_url)?;
        validation::validate_url("easyprivacy_url", &self.easyprivacy_url)?;
        validation::validate_url("disconnect_url", &self.disconnect_url)?;
        validation::validate_positive_number("retry_attempts", self.retry_attempts, 1)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["cookie-labeler"]);

        assert_eq!(config.input, "data/raw/cookies.json");
        assert_eq!(config.cache_dir, "data/tracker_lists");
        assert_eq!(config.sources(), TrackerSources::default());
        assert_eq!(config.fetch_settings(), FetchSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_zero_retries() {
        let config = CliConfig::parse_from(["cookie-labeler", "--retry-attempts", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_rejects_non_http_source() {
        let config = CliConfig::parse_from([
            "cookie-labeler",
            "--disconnect-url",
            "file:///tmp/services.json",
        ]);
        assert!(config.validate().is_err());
    }
}
