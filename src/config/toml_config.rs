use crate::config::AppConfig;
use crate::utils::error::{AppError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: Option<ServiceConfig>,
    pub generation: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 以檔案中有設定的值覆蓋 `base`。
    pub fn apply_to(&self, mut base: AppConfig) -> AppConfig {
        if let Some(service) = &self.service {
            if let Some(endpoint) = &service.endpoint {
                base.api_endpoint = endpoint.clone();
            }
            if let Some(model) = &service.model {
                base.model = model.clone();
            }
            // 未被替換的 ${VAR} 視為未設定
            if let Some(key) = service.api_key.as_ref().filter(|k| !k.starts_with("${")) {
                base.api_key = Some(key.clone());
            }
            if let Some(timeout) = service.timeout_seconds {
                base.timeout_seconds = timeout;
            }
        }
        if let Some(temperature) = self.generation.as_ref().and_then(|g| g.temperature) {
            base.temperature = temperature;
        }
        base
    }
}
