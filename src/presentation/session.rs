//! Drives one user session: uploads, the two background reads, reset and cancel.

use crate::core::analysis::AnalysisClient;
use crate::core::ingestion::{read_payload, read_preview, UploadFile};
use crate::domain::ports::StructuredGenerationClient;
use crate::presentation::state::{SessionEvent, UploadTicket, ViewState};
use crate::presentation::view::Screen;
use crate::utils::error::AppError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDisposition {
    Started(UploadTicket),
    /// 已有請求進行中，本次上傳被忽略。
    Busy,
    /// 不是圖片，靜默忽略。
    Ignored,
}

pub struct Session<G: StructuredGenerationClient + 'static> {
    client: Arc<AnalysisClient<G>>,
    state: ViewState,
    next_ticket: u64,
    /// 每次上傳一條新通道；兩個 task 都結束後通道即關閉。
    events_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    tasks: Vec<JoinHandle<()>>,
}

impl<G: StructuredGenerationClient + 'static> Session<G> {
    pub fn new(client: AnalysisClient<G>) -> Self {
        Self {
            client: Arc::new(client),
            state: ViewState::default(),
            next_ticket: 1,
            events_rx: None,
            tasks: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        Screen::from_state(&self.state)
    }

    /// Starts preview generation and analysis for `file` as two independent tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select_file(&mut self, file: UploadFile) -> UploadDisposition {
        if !file.is_image() {
            tracing::debug!("Ignoring non-image upload '{}' ({})", file.name(), file.mime_type());
            return UploadDisposition::Ignored;
        }

        let ticket = UploadTicket(self.next_ticket);
        match self.state.begin(ticket) {
            Some(loading) => self.state = loading,
            None => {
                tracing::info!("Upload '{}' ignored: analysis in progress", file.name());
                return UploadDisposition::Busy;
            }
        }
        self.next_ticket += 1;
        self.tasks.retain(|t| !t.is_finished());

        tracing::info!("Upload {} started: '{}' ({})", ticket, file.name(), file.mime_type());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.events_rx = Some(events_rx);

        let preview_tx = events_tx.clone();
        let preview_file = file.clone();
        self.tasks.push(tokio::spawn(async move {
            let event = match read_preview(&preview_file).await {
                Ok(preview) => SessionEvent::PreviewReady { ticket, preview },
                Err(error) => SessionEvent::PreviewFailed { ticket, error },
            };
            let _ = preview_tx.send(event);
        }));

        let analysis_tx = events_tx;
        let client = Arc::clone(&self.client);
        self.tasks.push(tokio::spawn(async move {
            let outcome = async {
                let payload = read_payload(&file).await?;
                let result = client.analyze(&payload).await?;
                Ok::<_, AppError>(result)
            }
            .await;

            let event = match outcome {
                Ok(result) => SessionEvent::AnalysisSucceeded { ticket, result },
                Err(error) => SessionEvent::AnalysisFailed { ticket, error },
            };
            let _ = analysis_tx.send(event);
        }));

        UploadDisposition::Started(ticket)
    }

    /// Waits for the next background event and applies it.
    ///
    /// If both tasks of the current upload are gone without settling it (a
    /// task panicked), the upload fails with the generic error.
    pub async fn next_event(&mut self) -> &ViewState {
        let event = match self.events_rx.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        };

        let current = std::mem::take(&mut self.state);
        self.state = match event {
            Some(event) => current.apply(event),
            None => {
                self.events_rx = None;
                current.interrupted()
            }
        };
        &self.state
    }

    /// 持續處理事件直到離開 Loading。
    pub async fn settle(&mut self) -> &ViewState {
        while self.state.is_loading() {
            self.next_event().await;
        }
        &self.state
    }

    pub fn reset(&mut self) {
        if !self.state.is_loading() {
            self.events_rx = None;
        }
        let current = std::mem::take(&mut self.state);
        self.state = current.reset();
    }

    /// 放棄進行中的請求；之後到達的舊事件會被丟棄。
    pub fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.events_rx = None;
        let current = std::mem::take(&mut self.state);
        self.state = current.cancel();
    }
}

impl<G: StructuredGenerationClient + 'static> Drop for Session<G> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
