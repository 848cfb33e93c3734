pub mod cli;
pub mod credential;
pub mod toml_config;

pub use cli::ServerArgs;
pub use credential::{ApiKey, Credential};
pub use toml_config::TomlConfig;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Everything the Gemini adapter needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct VisionSettings {
    pub credential: Credential,
    pub model: String,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl VisionSettings {
    pub fn new(credential: Credential, api_base_url: impl Into<String>) -> Self {
        Self {
            credential,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: api_base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub static_dir: String,
    pub max_upload_mb: usize,
    pub include_color_analysis: bool,
    pub vision: VisionSettings,
}

impl AppConfig {
    /// 讀取 CLI 參數與（可選的）設定檔，合併並驗證
    pub fn resolve(args: ServerArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        let config = Self::from_parts(args, file);
        config.validate()?;
        Ok(config)
    }

    /// CLI flags win over the file, the file wins over defaults.
    pub fn from_parts(args: ServerArgs, file: TomlConfig) -> Self {
        let server = file.server();
        let vision = file.vision();

        let credential = Credential::classify(args.api_key.as_deref().or(vision.api_key.as_deref()));
        let timeout_secs = args
            .timeout_secs
            .or(vision.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            host: args
                .host
                .or(server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(server.port).unwrap_or(DEFAULT_PORT),
            upload_dir: args
                .upload_dir
                .or(server.upload_dir)
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            static_dir: args
                .static_dir
                .or(server.static_dir)
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            max_upload_mb: args
                .max_upload_mb
                .or(server.max_upload_mb)
                .unwrap_or(DEFAULT_MAX_UPLOAD_MB),
            include_color_analysis: !args.no_color_analysis
                && vision.include_color_analysis.unwrap_or(true),
            vision: VisionSettings {
                credential,
                model: args
                    .model
                    .or(vision.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base_url: args
                    .api_base_url
                    .or(vision.api_base_url)
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_path("server.upload_dir", &self.upload_dir)?;
        validation::validate_path("server.static_dir", &self.static_dir)?;
        validation::validate_range("server.max_upload_mb", self.max_upload_mb, 1, 100)?;
        validation::validate_url("vision.api_base_url", &self.vision.api_base_url)?;
        validation::validate_non_empty_string("vision.model", &self.vision.model)?;
        validation::validate_range("vision.timeout_secs", self.vision.timeout.as_secs(), 1, 600)?;
        Ok(())
    }
}
