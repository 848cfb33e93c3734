pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{gemini::GeminiVisionClient, storage::LocalStorage};
pub use app::server::{build_router, AppState};
pub use config::{AppConfig, ServerArgs, VisionSettings};
pub use crate::core::{analyzer::StyleAnalyzer, parser::ResponseParser, prompt::PromptBuilder};
pub use domain::model::{AnalysisStatus, ColorEntry, StyleAnalysis};
pub use utils::error::{ModelErrorKind, Result, StyleError};
