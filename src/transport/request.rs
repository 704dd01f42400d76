//! Composed requests and endpoint selection.
//!
//! A [`ChatRequest`] is what the composer (or the recording workflow)
//! produces.  It always maps to exactly one [`Endpoint`]:
//!
//! ```text
//! audio present        → /transcribe
//! else image present   → /chat/image
//! else                 → /chat/text
//! ```

use crate::audio::AudioClip;
use crate::chat::Attachment;

use super::client::{ChatTransport, TransportError};

/// The three backend routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Text,
    Image,
    Transcribe,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Text => "/chat/text",
            Endpoint::Image => "/chat/image",
            Endpoint::Transcribe => "/transcribe",
        }
    }
}

/// One outbound request: text, optional image, optional audio.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub text: String,
    pub image: Option<Attachment>,
    pub audio: Option<AudioClip>,
}

impl ChatRequest {
    /// A chat question, with or without an image.
    pub fn chat(text: impl Into<String>, image: Option<Attachment>) -> Self {
        Self {
            text: text.into(),
            image,
            audio: None,
        }
    }

    /// A transcription of a finished recording.
    pub fn transcription(clip: AudioClip) -> Self {
        Self {
            text: String::new(),
            image: None,
            audio: Some(clip),
        }
    }

    /// The single endpoint this request goes to.
    pub fn endpoint(&self) -> Endpoint {
        if self.audio.is_some() {
            Endpoint::Transcribe
        } else if self.image.is_some() {
            Endpoint::Image
        } else {
            Endpoint::Text
        }
    }

    /// Issue exactly one call on `transport`, chosen by [`endpoint`](Self::endpoint).
    pub async fn send(&self, transport: &dyn ChatTransport) -> Result<String, TransportError> {
        if let Some(clip) = &self.audio {
            return transport.transcribe(clip).await;
        }
        if let Some(image) = &self.image {
            return transport.ask_image(image, &self.text).await;
        }
        transport.ask_text(&self.text).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
