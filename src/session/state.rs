//! Chat session state owned by the UI thread.
//!
//! [`ChatSession`] is the single source of truth for everything the window
//! shows: the conversation, the composer, the recording modal (if open) and
//! any transient notices.  The egui update loop owns it directly; requests
//! leave through the values its methods return and replies come back
//! through [`ChatSession::receive_answer`] and
//! [`ChatSession::receive_transcript`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::InputDevice;
use crate::chat::{Attachment, Composer, Conversation};
use crate::config::{AppConfig, AudioConfig};
use crate::recording::{RecordingPhase, RecordingWorkflow};
use crate::render::export_html;
use crate::transport::{ChatRequest, TransportError, TRANSCRIPTION_FALLBACK};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A short message shown above the composer, then dismissed automatically.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: Instant,
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

pub struct ChatSession {
    conversation: Conversation,
    composer: Composer,
    /// `None` while the recording modal is closed.
    recorder: Option<RecordingWorkflow>,
    notices: Vec<Notice>,
    audio: AudioConfig,
}

impl ChatSession {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            conversation: Conversation::new(Some(config.ui.greeting.as_str())),
            composer: Composer::new(),
            recorder: None,
            notices: Vec::new(),
            audio: config.audio.clone(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn recorder(&self) -> Option<&RecordingWorkflow> {
        self.recorder.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    // ── Chat ─────────────────────────────────────────────────────────────

    /// Submit the composer contents.  `None` if busy or nothing to send.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        let request = self.composer.submit(&mut self.conversation)?;
        log::debug!("session: submitting to {}", request.endpoint().path());
        Some(request)
    }

    pub fn receive_answer(&mut self, answer: String) {
        self.composer.finish(&mut self.conversation, answer);
    }

    /// Attach an image file, reporting problems as a notice.
    pub fn attach_file(&mut self, path: &Path, now: Instant) {
        match Attachment::load(path) {
            Ok(attachment) => self.composer.attach(attachment),
            Err(e) => self.raise(NoticeKind::Error, e.to_string(), now),
        }
    }

    /// Attach an image already in memory (drag-and-drop on some platforms).
    pub fn attach_bytes(&mut self, file_name: &str, bytes: Vec<u8>, now: Instant) {
        match Attachment::from_bytes(file_name, bytes) {
            Ok(attachment) => self.composer.attach(attachment),
            Err(e) => self.raise(NoticeKind::Error, e.to_string(), now),
        }
    }

    // ── Recording ────────────────────────────────────────────────────────

    /// Open the recording modal in its idle phase.
    pub fn open_recorder(&mut self) {
        if self.recorder.is_none() {
            self.recorder = Some(RecordingWorkflow::new(
                self.audio.sample_rate,
                self.audio.max_recording_secs,
            ));
        }
    }

    /// Start capturing.  A device failure closes the modal and raises a notice.
    pub fn start_recording(&mut self, device: &dyn InputDevice, now: Instant) {
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        if let Err(e) = recorder.start(device, now) {
            self.recorder = None;
            self.raise(NoticeKind::Error, e.to_string(), now);
        }
    }

    /// Advance the open recording.  Returns the transcription request when
    /// the length limit stopped it.
    pub fn poll_recording(&mut self, now: Instant) -> Option<ChatRequest> {
        let limit_reached = self.recorder.as_mut()?.poll(now);
        if limit_reached {
            log::info!(
                "session: recording reached {}s limit, stopping",
                self.audio.max_recording_secs
            );
            return self.stop_recording(now);
        }
        None
    }

    /// Stop capturing and return the transcription request.
    pub fn stop_recording(&mut self, now: Instant) -> Option<ChatRequest> {
        let recorder = self.recorder.as_mut()?;
        match recorder.stop() {
            Ok(clip) => Some(ChatRequest::transcription(clip)),
            Err(e) => {
                // An encoding failure has already released the device.
                if matches!(recorder.phase(), RecordingPhase::Idle) {
                    self.recorder = None;
                }
                self.raise(NoticeKind::Error, e.to_string(), now);
                None
            }
        }
    }

    /// Abort the recording.  Ignored once transcription is under way.
    pub fn cancel_recording(&mut self) {
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        match recorder.cancel() {
            Ok(()) => self.recorder = None,
            Err(e) => log::debug!("session: {e}"),
        }
    }

    /// Deliver the transcription result and close the modal.
    ///
    /// A failure is logged with its cause; the notice carries a fixed
    /// message only.
    pub fn receive_transcript(&mut self, result: Result<String, TransportError>, now: Instant) {
        let Some(recorder) = self.recorder.take() else {
            log::warn!("session: transcript arrived with no recording open");
            return;
        };
        if let Err(e) = recorder.complete(result, &mut self.composer) {
            log::warn!("session: {e}");
            self.raise(NoticeKind::Error, TRANSCRIPTION_FALLBACK.to_string(), now);
        }
    }

    // ── Transcript export ────────────────────────────────────────────────

    /// Save the conversation as HTML under `dir`.
    pub fn export_transcript(&mut self, title: &str, dir: &Path, now: Instant) -> Option<PathBuf> {
        match export_html(&self.conversation, title, dir, chrono::Local::now()) {
            Ok(path) => {
                self.raise(NoticeKind::Info, format!("Saved {}", path.display()), now);
                Some(path)
            }
            Err(e) => {
                log::warn!("session: transcript export failed: {e}");
                self.raise(NoticeKind::Error, e.to_string(), now);
                None
            }
        }
    }

    // ── Notices ──────────────────────────────────────────────────────────

    pub fn raise(&mut self, kind: NoticeKind, message: String, now: Instant) {
        self.notices.push(Notice {
            kind,
            message,
            raised_at: now,
        });
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn expire_notices(&mut self, now: Instant) {
        self.notices
            .retain(|n| now.saturating_duration_since(n.raised_at) < NOTICE_TTL);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
