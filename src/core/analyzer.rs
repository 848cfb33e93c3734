use crate::core::parser::ResponseParser;
use crate::core::prompt::PromptBuilder;
use crate::domain::model::{AnalysisStatus, StyleAnalysis};
use crate::domain::ports::VisionClient;
use crate::utils::error::{ModelErrorKind, StyleError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const MISSING_KEY_MESSAGE: &str = "Valid Gemini API key is required. Please update your .env file with a valid API key from https://ai.google.dev/";
const INVALID_KEY_MESSAGE: &str =
    "Your Gemini API key is invalid. Please check your .env file and update with a valid API key.";

/// Runs one analysis: prompt, vision call, parse. Never returns an error.
pub struct StyleAnalyzer {
    client: Arc<dyn VisionClient>,
    prompt: PromptBuilder,
    parser: ResponseParser,
}

impl StyleAnalyzer {
    pub fn new(client: Arc<dyn VisionClient>, include_color_analysis: bool) -> Self {
        Self {
            client,
            prompt: PromptBuilder::new(include_color_analysis),
            parser: ResponseParser::new(include_color_analysis),
        }
    }

    pub async fn analyze(&self, image_data: &[u8], mime_type: &str) -> StyleAnalysis {
        self.analyze_with_cancel(image_data, mime_type, &CancellationToken::new())
            .await
    }

    pub async fn analyze_with_cancel(
        &self,
        image_data: &[u8],
        mime_type: &str,
        cancel: &CancellationToken,
    ) -> StyleAnalysis {
        let prompt = self.prompt.build();
        match self
            .client
            .invoke(image_data, mime_type, prompt, cancel)
            .await
        {
            Ok(raw) => self.parser.parse(&raw),
            Err(err) => {
                tracing::error!(error = %err, "Style analysis failed");
                error_record(&err)
            }
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub fn includes_color_analysis(&self) -> bool {
        self.prompt.includes_color_analysis()
    }
}

/// Renderable record for a failed vision call.
pub fn error_record(err: &StyleError) -> StyleAnalysis {
    if err.is_config_error() {
        return StyleAnalysis::failure(
            AnalysisStatus::ConfigError,
            "Error",
            MISSING_KEY_MESSAGE.to_string(),
        );
    }

    match err {
        StyleError::ModelError {
            kind: ModelErrorKind::InvalidCredential,
            ..
        } => StyleAnalysis::failure(
            AnalysisStatus::ModelError,
            "API Error",
            INVALID_KEY_MESSAGE.to_string(),
        ),
        StyleError::ModelError { message, .. } => StyleAnalysis::failure(
            AnalysisStatus::ModelError,
            "Error",
            format!("Error analyzing image: {}", message),
        ),
        other => StyleAnalysis::failure(
            AnalysisStatus::ModelError,
            "Error",
            format!("Error analyzing image: {}", other),
        ),
    }
}
