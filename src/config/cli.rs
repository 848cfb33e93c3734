use clap::Parser;
use std::path::PathBuf;

/// Command line flags. Unset values fall back to the config file, then to
/// built-in defaults (see `AppConfig::from_parts`).
#[derive(Clone, Default, Parser)]
#[command(name = "interior-style")]
#[command(about = "Detect the interior design style of a room photo with Gemini")]
pub struct ServerArgs {
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, help = "Directory uploaded images are written to")]
    pub upload_dir: Option<String>,

    #[arg(long, help = "Directory served under /static")]
    pub static_dir: Option<String>,

    #[arg(long, help = "Gemini model name")]
    pub model: Option<String>,

    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Seconds to wait for the vision model")]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    #[arg(long, help = "Only detect the style, skip the color palette")]
    pub no_color_analysis: bool,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
