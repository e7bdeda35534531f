use crate::utils::error::{AppError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Gemini API 基底位址：http(s)，且不可帶 query 或 fragment（會接上 `/models/...`）。
pub fn validate_endpoint(field_name: &str, endpoint: &str) -> Result<()> {
    validate_url(field_name, endpoint)?;
    let has_extras = Url::parse(endpoint)
        .map(|url| url.query().is_some() || url.fragment().is_some())
        .unwrap_or(false);
    if has_extras {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: endpoint.to_string(),
            reason: "Endpoint must not carry a query string or fragment".to_string(),
        });
    }
    Ok(())
}

/// 取樣溫度，Gemini 接受 0.0 到 2.0。
pub fn validate_temperature(field_name: &str, temperature: f32) -> Result<()> {
    validate_range(field_name, temperature, 0.0, 2.0)
}

/// 模型呼叫逾時，至少一秒。
pub fn validate_timeout_seconds(field_name: &str, seconds: u64) -> Result<()> {
    validate_positive_number(field_name, seconds, 1)
}

/// HTML 報告輸出目錄；已存在時必須是目錄。
pub fn validate_output_dir(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    let target = std::path::Path::new(path);
    if target.exists() && !target.is_dir() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path exists and is not a directory".to_string(),
        });
    }
    Ok(())
}

fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 比較皆為 false，需以反向條件排除
    if !(value >= min && value <= max) {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
