//! Three-state view machine: Idle, Loading, Result.
//!
//! Preview generation and remote analysis settle independently, so `Loading`
//! buffers whichever arrives first. Every event carries the ticket of the
//! upload that produced it; events for any other ticket are dropped.

use crate::domain::model::{AnalysisResult, DataUrl};
use crate::utils::error::{AppError, IngestionError, GENERIC_FAILURE_MESSAGE};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadTicket(pub(crate) u64);

impl std::fmt::Display for UploadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle {
        error: Option<String>,
    },
    Loading {
        ticket: UploadTicket,
        preview: Option<DataUrl>,
        pending: Option<(AnalysisResult, DateTime<Utc>)>,
    },
    Result {
        preview: DataUrl,
        data: AnalysisResult,
        analyzed_at: DateTime<Utc>,
    },
}

#[derive(Debug)]
pub enum SessionEvent {
    PreviewReady {
        ticket: UploadTicket,
        preview: DataUrl,
    },
    PreviewFailed {
        ticket: UploadTicket,
        error: IngestionError,
    },
    AnalysisSucceeded {
        ticket: UploadTicket,
        result: AnalysisResult,
    },
    AnalysisFailed {
        ticket: UploadTicket,
        error: AppError,
    },
}

impl SessionEvent {
    pub fn ticket(&self) -> UploadTicket {
        match self {
            SessionEvent::PreviewReady { ticket, .. }
            | SessionEvent::PreviewFailed { ticket, .. }
            | SessionEvent::AnalysisSucceeded { ticket, .. }
            | SessionEvent::AnalysisFailed { ticket, .. } => *ticket,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Idle { error: None }
    }
}

impl ViewState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Idle { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            ViewState::Result { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn preview(&self) -> Option<&DataUrl> {
        match self {
            ViewState::Loading { preview, .. } => preview.as_ref(),
            ViewState::Result { preview, .. } => Some(preview),
            ViewState::Idle { .. } => None,
        }
    }

    pub fn ticket(&self) -> Option<UploadTicket> {
        match self {
            ViewState::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// 開始新的上傳；清除舊的錯誤、圖片與結果。載入中則回傳 `None` 表示忽略。
    pub fn begin(&self, ticket: UploadTicket) -> Option<Self> {
        if self.is_loading() {
            return None;
        }
        Some(ViewState::Loading {
            ticket,
            preview: None,
            pending: None,
        })
    }

    pub fn apply(self, event: SessionEvent) -> Self {
        let (ticket, preview, pending) = match self {
            ViewState::Loading {
                ticket,
                preview,
                pending,
            } => (ticket, preview, pending),
            other => {
                tracing::debug!("Dropping event for {} outside of loading", event.ticket());
                return other;
            }
        };

        if event.ticket() != ticket {
            tracing::debug!("Dropping stale event for {} (current {})", event.ticket(), ticket);
            return ViewState::Loading {
                ticket,
                preview,
                pending,
            };
        }

        match event {
            SessionEvent::PreviewReady { preview, .. } => match pending {
                Some((data, analyzed_at)) => ViewState::Result {
                    preview,
                    data,
                    analyzed_at,
                },
                None => ViewState::Loading {
                    ticket,
                    preview: Some(preview),
                    pending: None,
                },
            },
            SessionEvent::AnalysisSucceeded { result, .. } => {
                let analyzed_at = Utc::now();
                match preview {
                    Some(preview) => ViewState::Result {
                        preview,
                        data: result,
                        analyzed_at,
                    },
                    None => {
                        tracing::debug!("Analysis for {} finished before preview", ticket);
                        ViewState::Loading {
                            ticket,
                            preview: None,
                            pending: Some((result, analyzed_at)),
                        }
                    }
                }
            }
            SessionEvent::PreviewFailed { error, .. } => {
                Self::failed(ticket, &AppError::Ingestion(error))
            }
            SessionEvent::AnalysisFailed { error, .. } => Self::failed(ticket, &error),
        }
    }

    fn failed(ticket: UploadTicket, error: &AppError) -> Self {
        tracing::error!("Upload {} failed: {}", ticket, error);
        tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
        ViewState::Idle {
            error: Some(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// 背景工作全數結束卻沒有送出結果（例如 task panic）。
    pub fn interrupted(self) -> Self {
        match self {
            ViewState::Loading { ticket, .. } => {
                tracing::error!("Upload {} lost its background tasks before settling", ticket);
                ViewState::Idle {
                    error: Some(GENERIC_FAILURE_MESSAGE.to_string()),
                }
            }
            other => other,
        }
    }

    /// 回到初始狀態：清除圖片、結果與錯誤。載入中的請求請用 `cancel`。
    pub fn reset(self) -> Self {
        if self.is_loading() {
            return self;
        }
        ViewState::default()
    }

    pub fn cancel(self) -> Self {
        match self {
            ViewState::Loading { ticket, .. } => {
                tracing::info!("Upload {} cancelled", ticket);
                ViewState::default()
            }
            other => other,
        }
    }
}
