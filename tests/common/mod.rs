#![allow(dead_code)]

use face_fortune::adapters::gemini::{DEFAULT_MODEL, DEFAULT_TIMEOUT};
use face_fortune::{AnalysisClient, GeminiClient};
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

pub const API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-flash-latest:generateContent";

pub const JPEG_BYTES: [u8; 12] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0xFF, 0xD9,
];

pub fn sample_analysis() -> Value {
    json!({
        "appearanceScore": 88,
        "compliment": "眉清目秀，神采内敛，气度从容。",
        "poem": "镜中人面如春晓，气质清雅胜群芳。",
        "fortuneScore": 92,
        "fortuneAdvice": "今日宜静心处事，贵人在东南。"
    })
}

/// 把模型輸出的文字包成 generateContent 回應。
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub fn gemini_client(base_url: &str) -> GeminiClient {
    gemini_client_with_timeout(base_url, DEFAULT_TIMEOUT)
}

pub fn gemini_client_with_timeout(base_url: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(base_url, DEFAULT_MODEL, Some(API_KEY.to_string()), timeout).unwrap()
}

pub fn analysis_client(base_url: &str) -> AnalysisClient<GeminiClient> {
    AnalysisClient::new(gemini_client(base_url))
}

pub fn jpeg_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(&JPEG_BYTES).unwrap();
    file
}
