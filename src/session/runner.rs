//! Request runner: carries outbound requests to the backend off the UI thread.
//!
//! [`RequestRunner`] receives [`ChatRequest`]s over a `tokio::sync::mpsc`
//! channel, performs each on the tokio runtime and sends a [`RunnerEvent`]
//! back for the UI to drain on its next frame.
//!
//! ```text
//! ChatRequest (text / image)
//!   └─▶ answer_with_fallback ──▶ RunnerEvent::Answer(reply or apology)
//!
//! ChatRequest (audio)
//!   └─▶ transport.transcribe ──▶ RunnerEvent::Transcript(Ok | Err)
//! ```
//!
//! The UI only ever has one chat request and one transcription in flight,
//! so each request gets its own task; a slow transcription does not hold
//! up a chat reply.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::transport::{answer_with_fallback, ChatRequest, ChatTransport, Endpoint, TransportError};

/// Results delivered back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    /// Assistant reply to append; already replaced by an apology on failure.
    Answer(String),
    /// Outcome of a transcription request.
    Transcript(Result<String, TransportError>),
}

pub struct RequestRunner {
    transport: Arc<dyn ChatTransport>,
}

impl RequestRunner {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Perform one request and describe the outcome.
    pub async fn handle(&self, request: ChatRequest) -> RunnerEvent {
        handle_request(self.transport.as_ref(), &request).await
    }

    /// Run until `request_rx` is closed.
    ///
    /// Spawn this on the tokio runtime from `main()`.
    pub async fn run(
        self,
        mut request_rx: mpsc::Receiver<ChatRequest>,
        event_tx: mpsc::Sender<RunnerEvent>,
    ) {
        while let Some(request) = request_rx.recv().await {
            let transport = Arc::clone(&self.transport);
            let event_tx = event_tx.clone();

            tokio::spawn(async move {
                let event = handle_request(transport.as_ref(), &request).await;
                if event_tx.send(event).await.is_err() {
                    log::debug!("runner: UI gone, dropping result");
                }
            });
        }

        log::info!("runner: request channel closed, shutting down");
    }
}

async fn handle_request(transport: &dyn ChatTransport, request: &ChatRequest) -> RunnerEvent {
    match request.endpoint() {
        Endpoint::Transcribe => {
            let result = request.send(transport).await;
            if let Err(e) = &result {
                log::warn!("runner: transcription failed: {e}");
            }
            RunnerEvent::Transcript(result)
        }
        Endpoint::Text | Endpoint::Image => {
            RunnerEvent::Answer(answer_with_fallback(transport, request).await)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioClip;
    use crate::chat::Attachment;
    use crate::transport::testing::RecordingTransport;
    use crate::transport::{CONNECTION_FALLBACK, IMAGE_FALLBACK};

    fn clip() -> AudioClip {
        AudioClip::encode(&[0.1; 1_600], 16_000).unwrap()
    }

    #[tokio::test]
    async fn text_request_yields_answer() {
        let runner = RequestRunner::new(Arc::new(RecordingTransport::answering("42")));
        let event = runner.handle(ChatRequest::chat("q", None)).await;
        assert_eq!(event, RunnerEvent::Answer("42".into()));
    }

    #[tokio::test]
    async fn failed_text_request_yields_connection_apology() {
        let runner =
            RequestRunner::new(Arc::new(RecordingTransport::failing(TransportError::Timeout)));
        let event = runner.handle(ChatRequest::chat("q", None)).await;
        assert_eq!(event, RunnerEvent::Answer(CONNECTION_FALLBACK.into()));
    }

    #[tokio::test]
    async fn failed_image_request_yields_image_apology() {
        let runner =
            RequestRunner::new(Arc::new(RecordingTransport::failing(TransportError::Status(502))));
        let image = Attachment::from_bytes("x.jpg", vec![1]).unwrap();
        let event = runner.handle(ChatRequest::chat("", Some(image))).await;
        assert_eq!(event, RunnerEvent::Answer(IMAGE_FALLBACK.into()));
    }

    #[tokio::test]
    async fn transcription_errors_are_passed_through() {
        let runner =
            RequestRunner::new(Arc::new(RecordingTransport::failing(TransportError::Status(500))));
        let event = runner.handle(ChatRequest::transcription(clip())).await;
        assert_eq!(event, RunnerEvent::Transcript(Err(TransportError::Status(500))));
    }

    #[tokio::test]
    async fn run_delivers_one_event_per_request() {
        let transport = Arc::new(RecordingTransport::answering("ok"));
        let runner = RequestRunner::new(transport.clone());
        let (request_tx, request_rx) = mpsc::channel(4);
        let (event_tx, mut event_rx) = mpsc::channel(4);

        let handle = tokio::spawn(runner.run(request_rx, event_tx));
        request_tx.send(ChatRequest::chat("hello", None)).await.unwrap();
        request_tx.send(ChatRequest::transcription(clip())).await.unwrap();
        drop(request_tx);

        let mut events = vec![event_rx.recv().await.unwrap(), event_rx.recv().await.unwrap()];
        handle.await.unwrap();

        events.sort_by_key(|e| matches!(e, RunnerEvent::Transcript(_)));
        assert_eq!(events[0], RunnerEvent::Answer("ok".into()));
        assert_eq!(events[1], RunnerEvent::Transcript(Ok("ok".into())));
        assert_eq!(transport.calls().len(), 2);
    }
}
