pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod presentation;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::AppConfig;

pub use adapters::GeminiClient;
pub use crate::core::{analysis::AnalysisClient, ingestion::UploadFile};
pub use domain::model::AnalysisResult;
pub use presentation::{Session, UploadDisposition, ViewState};
pub use utils::error::{AppError, Result};
