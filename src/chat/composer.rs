//! The input composer: draft text, pending image, busy gate.
//!
//! The pending image and its preview are one `Option<Attachment>`, so they
//! are always present or absent together.  `busy` is set when a request is
//! handed out by [`Composer::submit`] and cleared by [`Composer::finish`];
//! while it is set, submitting does nothing.

use super::attachment::Attachment;
use super::conversation::{Conversation, Message};
use crate::transport::ChatRequest;

#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: String,
    attachment: Option<Attachment>,
    busy: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Mutable draft for the text field widget.
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Attach an image, replacing any previous one.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether [`submit`](Self::submit) would do anything right now.
    pub fn can_submit(&self) -> bool {
        !self.busy && (!self.draft.trim().is_empty() || self.attachment.is_some())
    }

    /// Move the draft into the conversation and hand back the request to send.
    ///
    /// Returns `None` (and changes nothing) while busy or when there is
    /// nothing to send.
    pub fn submit(&mut self, conversation: &mut Conversation) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }

        let text = std::mem::take(&mut self.draft);
        let image = self.attachment.take();

        conversation.push(Message::user(&text, image.clone()));
        self.busy = true;

        Some(ChatRequest::chat(text, image))
    }

    /// Record the reply to the in-flight request and reopen the composer.
    pub fn finish(&mut self, conversation: &mut Conversation, answer: String) {
        if !self.busy {
            log::warn!("composer: reply arrived with no request in flight");
        }
        conversation.push(Message::assistant(answer));
        self.busy = false;
    }

    /// Append a voice transcript to the draft, space-separated.
    ///
    /// Blank transcripts leave the draft alone.
    pub fn merge_transcript(&mut self, transcript: &str) {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return;
        }
        if !self.draft.is_empty() {
            self.draft.push(' ');
        }
        self.draft.push_str(transcript);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
