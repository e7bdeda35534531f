use thiserror::Error;

/// 上傳或分析失敗時顯示給使用者的唯一訊息。
pub const GENERIC_FAILURE_MESSAGE: &str =
    "AI 也就是打了个盹，请重试一下吧 (API Key 可能未配置或配额不足)";

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read image '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image '{name}' is empty")]
    Empty { name: String },

    #[error("Unsupported file type '{mime_type}', expected image/*")]
    NotAnImage { mime_type: String },

    #[error("Malformed data URL: {reason}")]
    MalformedDataUrl { reason: String },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("API credential is not configured")]
    MissingCredential,

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No response text received from the model")]
    EmptyResponse,

    #[error("Response is not a valid analysis: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Field '{field}' does not conform: {reason}")]
    NonConforming { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Image ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AppError {
    /// 上傳流程中的錯誤（讀檔或分析）一律合併成同一則訊息，其餘錯誤照實顯示。
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Ingestion(_) | AppError::Analysis(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            AppError::ConfigError { message } => format!("配置错误: {}", message),
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("配置项 {} 无效: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::Ingestion(_) => "确认文件存在且为有效的图片，然后重新上传",
            AppError::Analysis(AnalysisError::MissingCredential) => {
                "设置 API_KEY 环境变量或在配置文件的 [service] 中填写 api_key"
            }
            AppError::Analysis(_) => "检查 API Key 与配额后重新上传",
            AppError::ConfigError { .. } | AppError::InvalidConfigValueError { .. } => {
                "检查命令行参数与配置文件"
            }
            AppError::IoError(_) | AppError::SerializationError(_) => "检查输出目录是否可写",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
