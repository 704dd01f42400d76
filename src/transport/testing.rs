//! In-process [`ChatTransport`] double for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::audio::AudioClip;
use crate::chat::Attachment;

use super::client::{ChatTransport, TransportError};

/// Replies with a fixed result and records every call as a short string:
/// `text:<query>`, `image:<file>:<query>` or `transcribe:<bytes>`.
pub struct RecordingTransport {
    reply: Result<String, TransportError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: TransportError) -> Self {
        Self {
            reply: Err(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(call);
        self.reply.clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn ask_text(&self, query: &str) -> Result<String, TransportError> {
        self.record(format!("text:{query}"))
    }

    async fn ask_image(&self, image: &Attachment, query: &str) -> Result<String, TransportError> {
        self.record(format!("image:{}:{query}", image.file_name))
    }

    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TransportError> {
        self.record(format!("transcribe:{}", clip.wav.len()))
    }
}
