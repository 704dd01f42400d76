//! "Copied!" feedback for code block copy buttons.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a copy button reads "Copied!" after a click.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Identifies one code block: (message index, block index).
pub type BlockKey = (usize, usize);

/// Tracks which copy buttons were clicked recently.
#[derive(Debug, Default)]
pub struct CopyFlags {
    copied_at: HashMap<BlockKey, Instant>,
}

impl CopyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, key: BlockKey, now: Instant) {
        self.copied_at.insert(key, now);
    }

    /// Whether the button for `key` should currently read "Copied!".
    pub fn is_copied(&self, key: BlockKey, now: Instant) -> bool {
        self.copied_at
            .get(&key)
            .is_some_and(|&at| now.saturating_duration_since(at) < COPY_FEEDBACK)
    }

    /// Forget flags whose feedback window has passed.
    pub fn expire(&mut self, now: Instant) {
        self.copied_at
            .retain(|_, at| now.saturating_duration_since(*at) < COPY_FEEDBACK);
    }

    /// Whether any button is still showing feedback (the UI keeps repainting).
    pub fn any_active(&self) -> bool {
        !self.copied_at.is_empty()
    }
}
