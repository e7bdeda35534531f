use serde::{Deserialize, Serialize};

/// 模型回傳的觀相結果，欄位名稱與回應 schema 一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    pub appearance_score: f64,
    pub compliment: String,
    pub poem: String,
    pub fortune_score: f64,
    pub fortune_advice: String,
}

/// 送往模型的圖片：不含 data URL 前綴的 base64 內容與原始 MIME 類型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

/// `data:<mime>;base64,<body>` 形式的預覽字串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    pub fn from_payload(payload: &ImagePayload) -> Self {
        Self(format!("data:{};base64,{}", payload.mime_type, payload.data))
    }

    /// Parses an existing data URL. Only base64 data URLs are accepted.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let url = Self(raw.into());
        if url.split().is_some() {
            Some(url)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `(mime_type, base64_body)`.
    pub fn split(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        let (header, body) = rest.split_once(',')?;
        let mime = header.strip_suffix(";base64")?;
        Some((mime, body))
    }

    pub fn to_payload(&self) -> Option<ImagePayload> {
        self.split().map(|(mime, body)| ImagePayload {
            mime_type: mime.to_string(),
            data: body.to_string(),
        })
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 讀檔完成後的兩個產物：預覽用 data URL 與傳輸用 payload。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedImage {
    pub preview: DataUrl,
    pub payload: ImagePayload,
    pub byte_len: usize,
}
