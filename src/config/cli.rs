use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "face-fortune")]
#[command(about = "AI physiognomy reading: appearance score, commentary, poem and today's fortune")]
pub struct CliConfig {
    /// Image to analyze; repeat to read several photos one after another
    #[arg(long = "image", required = true)]
    pub images: Vec<PathBuf>,

    /// TOML file with [service] and [generation] sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub api_endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory that receives one rendered HTML page per image
    #[arg(long)]
    pub html_output: Option<String>,

    #[arg(long, help = "Print results as JSON instead of text")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 預設值 → 設定檔 → 命令列參數 → 環境變數中的 API Key。
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file: {}", path.display());
            config = TomlConfig::from_file(path)?.apply_to(config);
        }

        if let Some(endpoint) = &self.api_endpoint {
            config.api_endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_seconds = timeout;
        }

        Ok(config.with_env_credentials())
    }
}
