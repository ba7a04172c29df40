pub mod classifier;
pub mod domain_index;
pub mod engine;
pub mod fetcher;
pub mod list_parser;
pub mod normalize;
pub mod patterns;
pub mod pipeline;

pub use crate::domain::model::{CookieRecord, LabelingResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
