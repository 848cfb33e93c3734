use serde::{Deserialize, Serialize};

pub const FALLBACK_TITLE: &str = "Interior Style";

/// How a `StyleAnalysis` was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    ModelError,
    ConfigError,
    ParseFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub hex: String,
    pub name: String,
}

impl ColorEntry {
    pub fn new(hex: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            name: name.into(),
        }
    }
}

/// Result of analysing one room photo.
///
/// Built once per request through the constructors below and never mutated
/// afterwards. `colors` is `None` when no color analysis applies (title-only
/// mode and error records) and is then omitted from the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleAnalysis {
    style_title: String,
    style_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    colors: Option<Vec<ColorEntry>>,
    status: AnalysisStatus,
}

impl StyleAnalysis {
    /// A successful parse. The caller guarantees a non-empty title.
    pub(crate) fn parsed(
        style_title: String,
        style_description: String,
        colors: Option<Vec<ColorEntry>>,
    ) -> Self {
        debug_assert!(!style_title.is_empty());
        Self {
            style_title,
            style_description,
            colors,
            status: AnalysisStatus::Ok,
        }
    }

    /// The degraded record used when the text does not follow the grammar.
    pub fn fallback(raw_text: &str, with_colors: bool) -> Self {
        Self {
            style_title: FALLBACK_TITLE.to_string(),
            style_description: raw_text.to_string(),
            colors: with_colors.then(Vec::new),
            status: AnalysisStatus::ParseFallback,
        }
    }

    pub(crate) fn failure(
        status: AnalysisStatus,
        style_title: &str,
        style_description: String,
    ) -> Self {
        Self {
            style_title: style_title.to_string(),
            style_description,
            colors: None,
            status,
        }
    }

    pub fn style_title(&self) -> &str {
        &self.style_title
    }

    pub fn style_description(&self) -> &str {
        &self.style_description
    }

    pub fn colors(&self) -> Option<&[ColorEntry]> {
        self.colors.as_deref()
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == AnalysisStatus::Ok
    }
}
