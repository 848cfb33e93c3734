pub mod analyzer;
pub mod parser;
pub mod prompt;

pub use crate::domain::model::{AnalysisStatus, ColorEntry, StyleAnalysis};
pub use crate::domain::ports::{Storage, VisionClient};
pub use crate::utils::error::Result;
