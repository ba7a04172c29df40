pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use crate::core::{
    classifier::CookieClassifier,
    domain_index::{DomainSet, TrackerDatabase},
    engine::LabelEngine,
    fetcher::TrackerListFetcher,
    pipeline::LabelingPipeline,
};
pub use domain::model::{Category, Cookie, CookieRecord, LabelStats, Verdict};
pub use utils::error::{LabelerError, Result};
